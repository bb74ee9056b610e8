//! Quest-point and experience rewards

use crate::lexical::calls::{constructor_calls, parse_int, qualified_constant};
use crate::record::ExperienceReward;

/// First `new QuestPointReward(<int>)`, or 0
pub fn extract_quest_points(body: &str) -> i64 {
    constructor_calls(body, "QuestPointReward")
        .iter()
        .find_map(|call| match call.arguments().as_slice() {
            [points] => parse_int(points),
            _ => None,
        })
        .unwrap_or(0)
}

/// Every `new ExperienceReward(Skill.<ID>, <int>)` in source order
pub fn extract_experience_rewards(body: &str) -> Vec<ExperienceReward> {
    constructor_calls(body, "ExperienceReward")
        .iter()
        .filter_map(|call| {
            let args = call.arguments();
            let skill = qualified_constant(args.first()?, "Skill")?;
            let xp = parse_int(args.get(1)?)?;
            Some(ExperienceReward {
                skill: skill.to_string(),
                xp,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quest_points() {
        assert_eq!(extract_quest_points("return new QuestPointReward(5);"), 5);
        assert_eq!(
            extract_quest_points("new QuestPointReward(POINTS); new QuestPointReward(2);"),
            2
        );
        assert_eq!(extract_quest_points("return null;"), 0);
        assert_eq!(extract_quest_points(""), 0);
    }

    #[test]
    fn test_experience_order_and_duplicates() {
        let body = r#"
            return Arrays.asList(
                new ExperienceReward(Skill.COOKING, 500),
                new ExperienceReward(Skill.FIREMAKING, 250),
                new ExperienceReward(Skill.COOKING, 500),
                new ExperienceReward(Skill.MINING, 12_500)
            );
        "#;

        let rewards = extract_experience_rewards(body);
        let pairs: Vec<(&str, i64)> = rewards.iter().map(|r| (r.skill.as_str(), r.xp)).collect();
        assert_eq!(
            pairs,
            vec![
                ("COOKING", 500),
                ("FIREMAKING", 250),
                ("COOKING", 500),
                ("MINING", 12_500)
            ]
        );
    }

    #[test]
    fn test_experience_skips_unrecognised_shapes() {
        let body = "new ExperienceReward(skill, 100); new ExperienceReward(Skill.AGILITY, XP);";
        assert!(extract_experience_rewards(body).is_empty());
    }
}
