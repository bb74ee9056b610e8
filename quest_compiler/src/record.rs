//! Quest data model: extraction intermediates and the persisted record

use serde::{Deserialize, Serialize};

/// Coordinate in the game's native grid; not bounds-checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: i32,
    pub y: i32,
    pub plane: i32,
}

impl WorldPoint {
    pub fn new(x: i32, y: i32, plane: i32) -> Self {
        Self { x, y, plane }
    }
}

/// A step variable bound to its location and description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub variable_name: String,
    pub description: String,
    pub point: WorldPoint,
}

/// Titled, ordered step references from one `PanelDetails`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelGrouping {
    pub title: String,
    pub step_references: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceReward {
    pub skill: String,
    pub xp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LampReward {
    pub skills: String,
    pub value: i64,
    pub quantity: i64,
}

impl Default for LampReward {
    fn default() -> Self {
        Self {
            skills: "Any".to_string(),
            value: 0,
            quantity: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRequirement {
    pub skill_name: String,
    pub level: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewardSet {
    pub quest_points: i64,
    pub experience_rewards: Vec<ExperienceReward>,
    pub lamp_reward: Option<LampReward>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementSet {
    pub skill_requirements: Vec<SkillRequirement>,
    /// Display names, first-seen order, no duplicates
    pub quest_requirements: Vec<String>,
    pub quest_point_requirement: Option<i64>,
    /// Unresolved variable names from `getItemRequirements`
    pub item_references: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelStep {
    pub step_description: String,
    #[serde(rename = "worldpoint")]
    pub world_point: WorldPoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestPanel {
    pub panel_name: String,
    pub steps: Vec<PanelStep>,
}

/// Canonical output for one quest, written as `<key>.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestRecord {
    pub name: String,
    pub quest_points: i64,
    pub experience_rewards: Vec<ExperienceReward>,
    #[serde(rename = "lampRewards")]
    pub lamp_reward: Option<LampReward>,
    pub skill_requirements: Vec<SkillRequirement>,
    pub quest_requirements: Vec<String>,
    pub quest_point_requirement: Option<i64>,
    pub item_requirements: Vec<String>,
    #[serde(rename = "steps")]
    pub panels: Vec<QuestPanel>,
}

impl QuestRecord {
    pub fn step_count(&self) -> usize {
        self.panels.iter().map(|panel| panel.steps.len()).sum()
    }
}
