//! Display name to class name, source path and output key

use crate::config::constants::{batch, fetch};

/// `"Cook's Assistant"` to `"CooksAssistant"`.
///
/// Apostrophes are removed, the rest is split on whitespace and punctuation,
/// and each word has its first letter capitalised with the rest kept as written,
/// so `"Dragon Slayer II"` becomes `"DragonSlayerII"`.
pub fn class_name_for(display_name: &str) -> String {
    display_name
        .chars()
        .filter(|c| *c != '\'' && *c != '\u{2019}')
        .collect::<String>()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(title_case)
        .collect()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars)
            .collect(),
        None => String::new(),
    }
}

/// `<classname lowercased>/<ClassName>.java`, relative to the source root
pub fn source_relative_path(class_name: &str) -> String {
    format!(
        "{}/{}.{}",
        class_name.to_lowercase(),
        class_name,
        fetch::SOURCE_EXTENSION
    )
}

/// Full fetch location under `base`
pub fn source_url(base: &str, class_name: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        source_relative_path(class_name)
    )
}

/// Output key for a declared class name
pub fn output_key(class_name: &str) -> String {
    class_name.to_lowercase()
}

/// `<key>.json`
pub fn record_file_name(key: &str) -> String {
    format!("{}.{}", key, batch::RECORD_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name_derivation() {
        assert_eq!(class_name_for("Cook's Assistant"), "CooksAssistant");
        assert_eq!(class_name_for("Imp Catcher"), "ImpCatcher");
        assert_eq!(class_name_for("X Marks the Spot"), "XMarksTheSpot");
        assert_eq!(
            class_name_for("Recipe for Disaster - Another Cook's Quest"),
            "RecipeForDisasterAnotherCooksQuest"
        );
        assert_eq!(class_name_for("Desert Treasure II: The Fallen Empire"), "DesertTreasureIITheFallenEmpire");
        assert_eq!(class_name_for("Pirate’s Treasure"), "PiratesTreasure");
        assert_eq!(class_name_for(""), "");
    }

    #[test]
    fn test_roman_numerals_and_inner_capitals_kept() {
        assert_eq!(class_name_for("Dragon Slayer II"), "DragonSlayerII");
        assert_eq!(class_name_for("Recipe for Disaster - Freeing King Awowogei"), "RecipeForDisasterFreeingKingAwowogei");
        assert_eq!(class_name_for("Monkey Madness I"), "MonkeyMadnessI");
        assert_eq!(class_name_for("The Fremennik Isles"), "TheFremennikIsles");
        assert_eq!(
            source_url("https://x", &class_name_for("Dragon Slayer II")),
            "https://x/dragonslayerii/DragonSlayerII.java"
        );
    }

    #[test]
    fn test_source_locations() {
        assert_eq!(
            source_relative_path("CooksAssistant"),
            "cooksassistant/CooksAssistant.java"
        );
        assert_eq!(
            source_url("https://host/quests/", "ImpCatcher"),
            "https://host/quests/impcatcher/ImpCatcher.java"
        );
    }

    #[test]
    fn test_output_naming() {
        assert_eq!(output_key("CooksAssistant"), "cooksassistant");
        assert_eq!(record_file_name("cooksassistant"), "cooksassistant.json");
    }
}
