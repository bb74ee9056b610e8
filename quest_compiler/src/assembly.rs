//! Record assembly: panels from step references, item requirements through
//! the alias graph

use crate::extractors::{Extraction, StepTable};
use crate::logging::codes;
use crate::record::{PanelGrouping, PanelStep, QuestPanel, QuestRecord};
use crate::reference_resolution::{AliasGraph, Resolution};
use std::collections::HashSet;

/// An assembled record plus the references that were dropped on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembly {
    pub record: QuestRecord,
    /// Panel references with no matching step, as `(panel, reference)`
    pub dangling_steps: Vec<(String, String)>,
    /// Item requirement names that did not resolve to display text
    pub unresolved_items: Vec<String>,
}

pub fn assemble(name: &str, extraction: &Extraction) -> Assembly {
    let mut dangling_steps = Vec::new();
    let panels = extraction
        .panels
        .iter()
        .map(|grouping| assemble_panel(grouping, &extraction.steps, &mut dangling_steps))
        .collect();

    let (item_requirements, unresolved_items) =
        resolve_items(&extraction.requirements.item_references, &extraction.aliases);

    let rewards = &extraction.rewards;
    let requirements = &extraction.requirements;

    Assembly {
        record: QuestRecord {
            name: name.to_string(),
            quest_points: rewards.quest_points,
            experience_rewards: rewards.experience_rewards.clone(),
            lamp_reward: rewards.lamp_reward.clone(),
            skill_requirements: requirements.skill_requirements.clone(),
            quest_requirements: requirements.quest_requirements.clone(),
            quest_point_requirement: requirements.quest_point_requirement,
            item_requirements,
            panels,
        },
        dangling_steps,
        unresolved_items,
    }
}

fn assemble_panel(
    grouping: &PanelGrouping,
    steps: &StepTable,
    dangling: &mut Vec<(String, String)>,
) -> QuestPanel {
    let mut panel_steps = Vec::with_capacity(grouping.step_references.len());

    for reference in &grouping.step_references {
        match steps.get(reference) {
            Some(step) => panel_steps.push(PanelStep {
                step_description: step.description.clone(),
                world_point: step.point,
            }),
            None => {
                crate::log_warning!(code = codes::extraction::DANGLING_STEP_REFERENCE,
                    "Dropping panel reference with no step",
                    "panel" => &grouping.title,
                    "reference" => reference
                );
                dangling.push((grouping.title.clone(), reference.clone()));
            }
        }
    }

    QuestPanel {
        panel_name: grouping.title.clone(),
        steps: panel_steps,
    }
}

/// Resolved display texts, first occurrence kept, plus the names that failed
fn resolve_items(references: &[String], aliases: &AliasGraph) -> (Vec<String>, Vec<String>) {
    let mut seen = HashSet::new();
    let mut resolved = Vec::new();
    let mut unresolved = Vec::new();

    for reference in references {
        match aliases.resolve_detailed(reference) {
            Resolution::Resolved { display, .. } => {
                if seen.insert(display) {
                    resolved.push(display.to_string());
                }
            }
            Resolution::Missing { last } => {
                crate::log_warning!(code = codes::extraction::UNRESOLVED_REFERENCE,
                    "Item requirement has no display text",
                    "variable" => reference,
                    "unbound" => last
                );
                unresolved.push(reference.clone());
            }
            Resolution::Cycle { repeated } => {
                crate::log_warning!(code = codes::extraction::ALIAS_CYCLE,
                    "Item requirement aliases form a cycle",
                    "variable" => reference,
                    "repeated" => repeated
                );
                unresolved.push(reference.clone());
            }
        }
    }

    (resolved, unresolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{StepRecord, WorldPoint};

    fn step(name: &str, description: &str, x: i32) -> StepRecord {
        StepRecord {
            variable_name: name.to_string(),
            description: description.to_string(),
            point: WorldPoint::new(x, 3200, 0),
        }
    }

    fn extraction_with_steps() -> Extraction {
        let mut extraction = Extraction::default();
        extraction.steps.insert_first(step("talkToCook", "Talk to the cook.", 3206));
        extraction.steps.insert_first(step("getEgg", "Pick up an egg.", 3230));
        extraction
    }

    #[test]
    fn test_missing_step_dropped_without_disturbing_siblings() {
        let mut extraction = extraction_with_steps();
        extraction.panels = vec![PanelGrouping {
            title: "Start".to_string(),
            step_references: vec![
                "talkToCook".to_string(),
                "missingStep".to_string(),
                "getEgg".to_string(),
            ],
        }];

        let assembly = assemble("Cook's Assistant", &extraction);
        let panel = &assembly.record.panels[0];

        assert_eq!(panel.panel_name, "Start");
        let descriptions: Vec<&str> = panel.steps.iter().map(|s| s.step_description.as_str()).collect();
        assert_eq!(descriptions, vec!["Talk to the cook.", "Pick up an egg."]);
        assert_eq!(panel.steps[1].world_point, WorldPoint::new(3230, 3200, 0));
        assert_eq!(
            assembly.dangling_steps,
            vec![("Start".to_string(), "missingStep".to_string())]
        );
    }

    #[test]
    fn test_dangling_reference_logged_with_code() {
        use crate::logging::{self, LoggingService, MemoryLogger};
        use std::sync::Arc;

        // Another test may have installed the global service first
        let _ = logging::init_global_logging_with_service(Arc::new(LoggingService::new(
            Arc::new(MemoryLogger::new()),
            logging::LogLevel::Debug,
        )));

        let mut extraction = extraction_with_steps();
        extraction.panels = vec![PanelGrouping {
            title: "Finish".to_string(),
            step_references: vec!["returnToCook".to_string()],
        }];

        let quest = "Dangling Step Quest";
        logging::with_input_context(quest, 0, || assemble(quest, &extraction));

        let events = logging::try_get_global_error_collector()
            .map(|collector| collector.get_input_events(quest))
            .unwrap_or_default();
        assert!(events.iter().any(|event| {
            event.code == codes::extraction::DANGLING_STEP_REFERENCE
                && event.context.get("reference").map(String::as_str) == Some("returnToCook")
        }));
    }

    #[test]
    fn test_empty_panel_kept() {
        let mut extraction = extraction_with_steps();
        extraction.panels = vec![
            PanelGrouping {
                title: "Nothing here".to_string(),
                step_references: vec![],
            },
            PanelGrouping {
                title: "Repeat".to_string(),
                step_references: vec!["getEgg".to_string(), "getEgg".to_string()],
            },
        ];

        let record = assemble("Q", &extraction).record;
        assert_eq!(record.panels.len(), 2);
        assert!(record.panels[0].steps.is_empty());
        assert_eq!(record.panels[1].steps.len(), 2);
        assert_eq!(record.step_count(), 2);
    }

    #[test]
    fn test_items_resolved_deduplicated_and_filtered() {
        let mut extraction = Extraction::default();
        extraction.aliases.add_direct("bucket", "Bucket of milk");
        extraction.aliases.add_direct("egg", "Egg");
        extraction.aliases.add_alias("bucketHighlighted", "bucket");
        extraction.aliases.add_alias("loop", "loop");
        extraction.requirements.item_references = ["egg", "bucketHighlighted", "ghost", "bucket", "loop", "egg"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let assembly = assemble("Q", &extraction);
        assert_eq!(assembly.record.item_requirements, vec!["Egg", "Bucket of milk"]);
        assert_eq!(assembly.unresolved_items, vec!["ghost", "loop"]);
    }

    #[test]
    fn test_record_carries_extracted_fields() {
        let mut extraction = Extraction::default();
        extraction.rewards.quest_points = 5;
        extraction.requirements.quest_requirements = vec!["Druidic Ritual".to_string()];
        extraction.requirements.quest_point_requirement = Some(12);

        let record = assemble("Rune Mysteries", &extraction).record;
        assert_eq!(record.name, "Rune Mysteries");
        assert_eq!(record.quest_points, 5);
        assert_eq!(record.quest_requirements, vec!["Druidic Ritual"]);
        assert_eq!(record.quest_point_requirement, Some(12));
        assert_eq!(record.lamp_reward, None);
        assert!(record.panels.is_empty());
    }
}
