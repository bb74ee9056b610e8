//! General requirements (skills, prerequisite quests, quest points) and item
//! requirement references

use crate::lexical::calls::{self, constructor_calls, parse_int, qualified_constant};
use crate::lexical::lists::{find_list_literals, identifiers_in};
use crate::record::SkillRequirement;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static LIST_ADD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z_]\w*\s*\.\s*add\s*\(").unwrap());

static ROMAN_NUMERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:X{1,3}(?:IX|IV|V?I{0,3})|IX|IV|V?I{1,3}|V)$").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneralRequirements {
    pub skills: Vec<SkillRequirement>,
    pub quests: Vec<String>,
    pub quest_points: Option<i64>,
}

pub fn extract_general_requirements(body: &str) -> GeneralRequirements {
    GeneralRequirements {
        skills: extract_skill_requirements(body),
        quests: extract_quest_requirements(body),
        quest_points: extract_quest_point_requirement(body),
    }
}

/// Every `new SkillRequirement(Skill.<ID>, <int>, ...)`
pub fn extract_skill_requirements(body: &str) -> Vec<SkillRequirement> {
    constructor_calls(body, "SkillRequirement")
        .iter()
        .filter_map(|call| {
            let args = call.arguments();
            let skill = qualified_constant(args.first()?, "Skill")?;
            let level = parse_int(args.get(1)?)?;
            Some(SkillRequirement {
                skill_name: skill.to_string(),
                level,
            })
        })
        .collect()
}

/// Prerequisite quests by display name, deduplicated in first-seen order
pub fn extract_quest_requirements(body: &str) -> Vec<String> {
    let mut seen = HashSet::new();

    constructor_calls(body, "QuestRequirement")
        .iter()
        .filter_map(|call| {
            let args = call.arguments();
            qualified_constant(args.first()?, "QuestHelperQuest").map(quest_display_name)
        })
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

/// First `new QuestPointRequirement(<int>)`
pub fn extract_quest_point_requirement(body: &str) -> Option<i64> {
    constructor_calls(body, "QuestPointRequirement")
        .iter()
        .find_map(|call| match call.arguments().as_slice() {
            [points] => parse_int(points),
            _ => None,
        })
}

/// `DRUIDIC_RITUAL` to `Druidic Ritual`; roman numerals stay uppercase
pub fn quest_display_name(identifier: &str) -> String {
    identifier
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            if ROMAN_NUMERAL.is_match(word) {
                return word.to_string();
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Variable names listed by `getItemRequirements`, in source order.
///
/// Both inline list literals and `<list>.add(<ident>)` calls contribute;
/// arguments that are not bare identifiers are dropped.
pub fn extract_item_references(body: &str) -> Vec<String> {
    let mut found: Vec<(usize, Vec<String>)> = find_list_literals(body)
        .into_iter()
        .map(|list| (list.start, list.identifiers))
        .collect();

    for add in LIST_ADD.find_iter(body) {
        let open_paren = add.end() - 1;
        if let Some(call) = calls::call_at(body, add.start(), open_paren) {
            found.push((add.start(), identifiers_in(call.args)));
        }
    }

    found.sort_by_key(|(offset, _)| *offset);
    found.into_iter().flat_map(|(_, names)| names).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERAL: &str = r#"
        ArrayList<Requirement> req = new ArrayList<>();
        req.add(new QuestRequirement(QuestHelperQuest.DRUIDIC_RITUAL, QuestState.FINISHED));
        req.add(new SkillRequirement(Skill.HERBLORE, 25, true));
        req.add(new QuestRequirement(QuestHelperQuest.COOKS_ASSISTANT, QuestState.FINISHED));
        req.add(new SkillRequirement(Skill.AGILITY, 1_0));
        req.add(new QuestRequirement(QuestHelperQuest.DRUIDIC_RITUAL, QuestState.FINISHED));
        req.add(new QuestPointRequirement(12));
        req.add(new QuestPointRequirement(40));
        return req;
    "#;

    #[test]
    fn test_skill_requirements() {
        let skills = extract_skill_requirements(GENERAL);
        assert_eq!(
            skills,
            vec![
                SkillRequirement {
                    skill_name: "HERBLORE".to_string(),
                    level: 25
                },
                SkillRequirement {
                    skill_name: "AGILITY".to_string(),
                    level: 10
                },
            ]
        );
    }

    #[test]
    fn test_quest_requirements_deduplicated_first_seen() {
        assert_eq!(
            extract_quest_requirements(GENERAL),
            vec!["Druidic Ritual", "Cooks Assistant"]
        );
    }

    #[test]
    fn test_first_quest_point_requirement() {
        assert_eq!(extract_quest_point_requirement(GENERAL), Some(12));
        assert_eq!(extract_quest_point_requirement("return null;"), None);

        let general = extract_general_requirements(GENERAL);
        assert_eq!(general.quest_points, Some(12));
        assert_eq!(general.skills.len(), 2);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(quest_display_name("DRUIDIC_RITUAL"), "Druidic Ritual");
        assert_eq!(quest_display_name("X_MARKS_THE_SPOT"), "X Marks The Spot");
        assert_eq!(quest_display_name("DESERT_TREASURE_II"), "Desert Treasure II");
        assert_eq!(quest_display_name("MONKEY_MADNESS_I"), "Monkey Madness I");
        assert_eq!(quest_display_name("RECIPE_FOR_DISASTER_XIV"), "Recipe For Disaster XIV");
        assert_eq!(quest_display_name("MIXED_VILLAGE"), "Mixed Village");
    }

    #[test]
    fn test_item_references_from_list_literal() {
        let body = "return Arrays.asList(bucket, pot, egg.highlighted(), flour);";
        assert_eq!(extract_item_references(body), vec!["bucket", "pot", "flour"]);
    }

    #[test]
    fn test_item_references_from_add_calls() {
        let body = r#"
            ArrayList<ItemRequirement> reqs = new ArrayList<>();
            reqs.add(bucket);
            reqs.add(new ItemRequirement("Pot", ItemID.POT));
            reqs.addAll(List.of(egg, milk));
            reqs.add(flour);
            return reqs;
        "#;
        assert_eq!(
            extract_item_references(body),
            vec!["bucket", "egg", "milk", "flour"]
        );
    }
}
