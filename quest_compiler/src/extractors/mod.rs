//! Call-pattern extractors
//!
//! Each extractor is a pure function over a member body (or the whole
//! source) and returns an empty or default value when its construct is
//! absent. [`extract_all`] locates the members once and runs every
//! extractor over its span.

pub mod lamp;
pub mod panels;
pub mod requirements;
pub mod rewards;
pub mod steps;

pub use lamp::extract_lamp_reward;
pub use panels::extract_panels;
pub use requirements::{extract_general_requirements, extract_item_references, GeneralRequirements};
pub use rewards::{extract_experience_rewards, extract_quest_points};
pub use steps::{extract_steps, StepTable};

use crate::config::constants::members;
use crate::logging::codes;
use crate::record::{PanelGrouping, RequirementSet, RewardSet};
use crate::reference_resolution::{build_alias_graph, AliasGraph};
use crate::source::SourceUnit;

/// Every member the extractors read, in the order they are located
pub const EXTRACTED_MEMBERS: &[&str] = &[
    members::QUEST_POINT_REWARD,
    members::EXPERIENCE_REWARDS,
    members::GENERAL_REQUIREMENTS,
    members::ITEM_REQUIREMENTS,
    members::PANELS,
    members::SETUP_REQUIREMENTS,
];

/// Raw extractor output for one source, before references are resolved
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub rewards: RewardSet,
    /// `item_references` still holds variable names at this point
    pub requirements: RequirementSet,
    pub steps: StepTable,
    pub panels: Vec<PanelGrouping>,
    pub aliases: AliasGraph,
    /// Members that were not declared (or could not be delimited)
    pub missing_members: Vec<&'static str>,
}

impl Extraction {
    pub fn is_member_missing(&self, member_name: &str) -> bool {
        self.missing_members.contains(&member_name)
    }
}

pub fn extract_all(unit: &SourceUnit) -> Extraction {
    let mut missing_members = Vec::new();

    let quest_point_body = member_body(unit, members::QUEST_POINT_REWARD, &mut missing_members);
    let experience_body = member_body(unit, members::EXPERIENCE_REWARDS, &mut missing_members);
    let general_body = member_body(unit, members::GENERAL_REQUIREMENTS, &mut missing_members);
    let item_body = member_body(unit, members::ITEM_REQUIREMENTS, &mut missing_members);
    let panels_body = member_body(unit, members::PANELS, &mut missing_members);
    let setup_body = member_body(unit, members::SETUP_REQUIREMENTS, &mut missing_members);

    let general = extract_general_requirements(general_body);

    let extraction = Extraction {
        rewards: RewardSet {
            quest_points: extract_quest_points(quest_point_body),
            experience_rewards: extract_experience_rewards(experience_body),
            lamp_reward: extract_lamp_reward(unit.text()),
        },
        requirements: RequirementSet {
            skill_requirements: general.skills,
            quest_requirements: general.quests,
            quest_point_requirement: general.quest_points,
            item_references: extract_item_references(item_body),
        },
        steps: extract_steps(unit.text()),
        panels: extract_panels(panels_body),
        aliases: build_alias_graph(setup_body),
        missing_members,
    };

    for member_name in &extraction.missing_members {
        crate::log_warning!(code = codes::extraction::MEMBER_NOT_FOUND, "Member not found; using defaults",
            "member" => member_name
        );
    }

    crate::log_debug!("Members extracted",
        "steps" => extraction.steps.len(),
        "panels" => extraction.panels.len(),
        "direct_requirements" => extraction.aliases.direct_count(),
        "aliases" => extraction.aliases.alias_count()
    );

    extraction
}

/// Body text of a member, or `""` when it is missing
fn member_body<'a>(
    unit: &'a SourceUnit,
    member_name: &'static str,
    missing: &mut Vec<&'static str>,
) -> &'a str {
    match unit.member(member_name) {
        Some(span) => span.text(),
        None => {
            missing.push(member_name);
            ""
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ExperienceReward;

    const IMP_CATCHER: &str = r#"
package com.questhelper.helpers.quests.impcatcher;

public class ImpCatcher extends BasicQuestHelper
{
    ItemRequirement blackBead, redBead, whiteBead, yellowBead, amulet;
    QuestStep moveToTower, turnInQuest;

    @Override
    protected void setupRequirements()
    {
        blackBead = new ItemRequirement("Black bead", ItemID.BLACK_BEAD);
        redBead = new ItemRequirement("Red bead", ItemID.RED_BEAD);
        whiteBead = new ItemRequirement("White bead", ItemID.WHITE_BEAD);
        yellowBead = new ItemRequirement("Yellow " + "bead", ItemID.YELLOW_BEAD);
        amulet = new ItemRequirement("Amulet of accuracy", ItemID.AMULET_OF_ACCURACY);
    }

    public void setupSteps()
    {
        moveToTower = new ObjectStep(this, ObjectID.STAIRCASE, new WorldPoint(3103, 3159, 0),
            "Head to the Wizards' Tower and climb to the top.");
        turnInQuest = new NpcStep(this, NpcID.WIZARD_MIZGOG, new WorldPoint(3103, 3163, 2),
            "Talk to Wizard Mizgog with the " + "beads.", blackBead, redBead, whiteBead, yellowBead);
    }

    @Override
    public List<ItemRequirement> getItemRequirements()
    {
        return Arrays.asList(blackBead, redBead, whiteBead, yellowBead);
    }

    @Override
    public QuestPointReward getQuestPointReward()
    {
        return new QuestPointReward(1);
    }

    @Override
    public List<ExperienceReward> getExperienceRewards()
    {
        return Collections.singletonList(new ExperienceReward(Skill.MAGIC, 875));
    }

    @Override
    public List<PanelDetails> getPanels()
    {
        List<PanelDetails> allSteps = new ArrayList<>();
        allSteps.add(new PanelDetails("Bring Mizgog his beads", Arrays.asList(moveToTower, turnInQuest),
            blackBead, redBead, whiteBead, yellowBead));
        return allSteps;
    }
}
"#;

    #[test]
    fn test_extract_all_members() {
        let unit = SourceUnit::new("Imp Catcher", IMP_CATCHER);
        let extraction = extract_all(&unit);

        assert_eq!(extraction.rewards.quest_points, 1);
        assert_eq!(
            extraction.rewards.experience_rewards,
            vec![ExperienceReward {
                skill: "MAGIC".to_string(),
                xp: 875
            }]
        );
        assert_eq!(extraction.rewards.lamp_reward, None);
        assert_eq!(
            extraction.requirements.item_references,
            vec!["blackBead", "redBead", "whiteBead", "yellowBead"]
        );
        assert_eq!(extraction.steps.len(), 2);
        assert_eq!(extraction.panels.len(), 1);
        assert_eq!(extraction.aliases.resolve("yellowBead"), Some("Yellow bead"));
        assert_eq!(extraction.missing_members, vec![members::GENERAL_REQUIREMENTS]);
    }

    #[test]
    fn test_empty_source_gives_defaults() {
        let extraction = extract_all(&SourceUnit::new("Nothing", ""));

        assert_eq!(extraction.rewards, RewardSet::default());
        assert_eq!(extraction.requirements, RequirementSet::default());
        assert!(extraction.steps.is_empty());
        assert!(extraction.panels.is_empty());
        assert_eq!(extraction.missing_members.len(), EXTRACTED_MEMBERS.len());
        assert!(extraction.is_member_missing(members::PANELS));
    }
}
