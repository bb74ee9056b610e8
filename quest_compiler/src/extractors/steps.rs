//! Step-variable assignments bound to a `WorldPoint` and description

use crate::lexical::calls::{self, constructor_calls, parse_int};
use crate::lexical::literal::read_string;
use crate::record::{StepRecord, WorldPoint};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Step kinds in scan order; earlier kinds win a shared variable name
pub const STEP_KINDS: &[&str] = &["NpcStep", "ObjectStep"];

static NPC_STEP: LazyLock<Regex> = LazyLock::new(|| step_assignment("NpcStep"));
static OBJECT_STEP: LazyLock<Regex> = LazyLock::new(|| step_assignment("ObjectStep"));

fn step_assignment(kind: &str) -> Regex {
    Regex::new(&format!(r"\b([A-Za-z_]\w*)\s*=\s*new\s+{}\s*\(", kind)).unwrap()
}

fn assignment_pattern(kind: &str) -> Option<&'static Regex> {
    match kind {
        "NpcStep" => Some(&*NPC_STEP),
        "ObjectStep" => Some(&*OBJECT_STEP),
        _ => None,
    }
}

/// Step records keyed by variable name; the first binding for a name is kept
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepTable {
    steps: HashMap<String, StepRecord>,
    order: Vec<String>,
}

impl StepTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless the name is already bound; returns whether it was added
    pub fn insert_first(&mut self, record: StepRecord) -> bool {
        if self.steps.contains_key(&record.variable_name) {
            return false;
        }
        self.order.push(record.variable_name.clone());
        self.steps.insert(record.variable_name.clone(), record);
        true
    }

    pub fn get(&self, variable_name: &str) -> Option<&StepRecord> {
        self.steps.get(variable_name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Records in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &StepRecord> {
        self.order.iter().filter_map(|name| self.steps.get(name))
    }
}

/// All recognised step assignments in the whole source
pub fn extract_steps(source: &str) -> StepTable {
    let mut table = StepTable::new();

    for kind in STEP_KINDS {
        let Some(pattern) = assignment_pattern(kind) else {
            continue;
        };

        for caps in pattern.captures_iter(source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            let Some(call) = calls::call_at(source, whole.start(), whole.end() - 1) else {
                continue;
            };

            match parse_step_call(call.text) {
                Some((point, description)) => {
                    table.insert_first(StepRecord {
                        variable_name: name.as_str().to_string(),
                        description,
                        point,
                    });
                }
                None => {
                    crate::log_debug!("Skipping step without readable location or description",
                        "step" => name.as_str(),
                        "kind" => kind
                    );
                }
            }
        }
    }

    table
}

/// WorldPoint and description from the text of one step constructor call
fn parse_step_call(call_text: &str) -> Option<(WorldPoint, String)> {
    let world_point = constructor_calls(call_text, "WorldPoint").into_iter().next()?;

    let coordinates = world_point
        .arguments()
        .iter()
        .map(|arg| parse_int(arg).and_then(|v| i32::try_from(v).ok()))
        .collect::<Option<Vec<i32>>>()?;
    let [x, y, plane] = coordinates.as_slice() else {
        return None;
    };

    let quote = call_text[world_point.end..].find('"')? + world_point.end;
    let description = read_string(call_text, quote)?.value;

    Some((WorldPoint::new(*x, *y, *plane), description))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concatenated_npc_description() {
        let source = r#"step1 = new NpcStep(this, npc, new WorldPoint(3206,3214,0), "Talk to " + "the chef.");"#;
        let table = extract_steps(source);

        let step = table.get("step1").unwrap();
        assert_eq!(step.description, "Talk to the chef.");
        assert_eq!(step.point, WorldPoint::new(3206, 3214, 0));
    }

    #[test]
    fn test_object_steps_and_negative_coordinates() {
        let source = r#"
            climbDown = new ObjectStep(this, ObjectID.LADDER, new WorldPoint(-1_024, 9_600, 1),
                "Climb down the ladder.", lantern);
        "#;
        let step = extract_steps(source).get("climbDown").cloned().unwrap();
        assert_eq!(step.point, WorldPoint::new(-1024, 9600, 1));
        assert_eq!(step.description, "Climb down the ladder.");
    }

    #[test]
    fn test_npc_binding_wins_over_object() {
        let source = r#"
            shared = new ObjectStep(this, 1, new WorldPoint(1, 1, 1), "Object version");
            shared = new NpcStep(this, 2, new WorldPoint(2, 2, 0), "Npc version");
            shared = new NpcStep(this, 3, new WorldPoint(3, 3, 0), "Later npc version");
        "#;
        let table = extract_steps(source);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("shared").unwrap().description, "Npc version");
    }

    #[test]
    fn test_unreadable_steps_skipped() {
        let source = r#"
            noPoint = new NpcStep(this, 1, "No location");
            noText = new NpcStep(this, 1, new WorldPoint(1, 2, 0), DESCRIPTION);
            badPoint = new NpcStep(this, 1, new WorldPoint(x, 2, 0), "Bad point");
            good = new NpcStep(this, 1, new WorldPoint(1, 2, 0), "Good");
        "#;
        let table = extract_steps(source);
        assert_eq!(table.len(), 1);
        assert!(table.get("good").is_some());
        assert!(table.get("noText").is_none());
    }

    #[test]
    fn test_discovery_order() {
        let source = r#"
            b = new ObjectStep(this, 1, new WorldPoint(1, 1, 0), "B");
            a = new NpcStep(this, 1, new WorldPoint(1, 1, 0), "A");
            c = new NpcStep(this, 1, new WorldPoint(1, 1, 0), "C");
        "#;
        let table = extract_steps(source);
        let names: Vec<&str> = table.iter().map(|s| s.variable_name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
    }
}
