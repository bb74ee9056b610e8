//! Compile-time defaults and limits

pub mod fetch {
    /// Raw source root of the quest helper repository
    pub const DEFAULT_SOURCE_BASE_URL: &str =
        "https://raw.githubusercontent.com/Zoinkwiz/quest-helper/master/src/main/java/com/questhelper/helpers/quests";

    /// Fixed User-Agent sent with every source request
    pub const USER_AGENT: &str = concat!("quest-scraper/", env!("CARGO_PKG_VERSION"));

    pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

    /// Largest source accepted from a fetcher (4MB)
    /// Helper classes are a few hundred KB at most
    pub const MAX_SOURCE_SIZE: u64 = 4 * 1024 * 1024;

    /// Source file extension appended to the derived class name
    pub const SOURCE_EXTENSION: &str = "java";
}

pub mod batch {
    /// Upper bound for `max_threads`
    pub const MAX_WORKER_THREADS: usize = 32;

    pub const DEFAULT_OUTPUT_DIR: &str = "quests";

    pub const RECORD_EXTENSION: &str = "json";

    /// Written next to the records when reporting is enabled
    pub const BATCH_REPORT_FILE: &str = "_batch_report.json";
}

pub mod logging {
    /// Events retained by `MemoryLogger`
    pub const LOG_BUFFER_SIZE: usize = 10_000;

    /// Events collected per quest before the collector stops recording
    pub const MAX_LOG_EVENTS_PER_INPUT: usize = 100;

    pub const MAX_LOG_MESSAGE_LENGTH: usize = 2_048;
}

/// Member names read from a quest helper class
pub mod members {
    pub const QUEST_POINT_REWARD: &str = "getQuestPointReward";
    pub const EXPERIENCE_REWARDS: &str = "getExperienceRewards";
    pub const GENERAL_REQUIREMENTS: &str = "getGeneralRequirements";
    pub const ITEM_REQUIREMENTS: &str = "getItemRequirements";
    pub const PANELS: &str = "getPanels";
    pub const SETUP_REQUIREMENTS: &str = "setupRequirements";
}
