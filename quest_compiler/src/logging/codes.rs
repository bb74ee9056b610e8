//! Consolidated log codes and classification system
//!
//! Single source of truth for every code the extraction pipeline emits, together
//! with the behavioral metadata used when formatting and summarizing a run.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl CodeMetadata {
    const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
}

/// Source fetch error codes
pub mod fetch {
    use super::Code;

    pub const NETWORK_ERROR: Code = Code::new("E101");
    pub const HTTP_STATUS: Code = Code::new("E102");
    pub const TIMEOUT: Code = Code::new("E103");
    pub const SOURCE_NOT_FOUND: Code = Code::new("E104");
    pub const SOURCE_TOO_LARGE: Code = Code::new("E105");
    pub const INVALID_ENCODING: Code = Code::new("E106");
}

/// Extraction codes. Structural absence is reported at debug level only.
pub mod extraction {
    use super::Code;

    pub const MEMBER_NOT_FOUND: Code = Code::new("E201");
    pub const UNRESOLVED_REFERENCE: Code = Code::new("E202");
    pub const ALIAS_CYCLE: Code = Code::new("E203");
    pub const UNREADABLE_LITERAL: Code = Code::new("E204");
    pub const DANGLING_STEP_REFERENCE: Code = Code::new("E205");
}

/// Record persistence error codes
pub mod persistence {
    use super::Code;

    pub const OUTPUT_DIRECTORY: Code = Code::new("E301");
    pub const WRITE_FAILED: Code = Code::new("E302");
    pub const SERIALIZATION_FAILED: Code = Code::new("E303");
}

/// Approved-input list error codes
pub mod input_list {
    use super::Code;

    pub const UNREADABLE: Code = Code::new("E401");
    pub const MALFORMED: Code = Code::new("E402");
    pub const EMPTY: Code = Code::new("E403");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const SOURCE_FETCHED: Code = Code::new("I010");
    pub const EXTRACTION_COMPLETE: Code = Code::new("I020");
    pub const RECORD_WRITTEN: Code = Code::new("I030");
    pub const INPUT_LIST_LOADED: Code = Code::new("I040");
    pub const BATCH_COMPLETE: Code = Code::new("I050");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static CODE_REGISTRY: OnceLock<HashMap<&'static str, CodeMetadata>> = OnceLock::new();

const REGISTERED_CODES: &[CodeMetadata] = &[
    // System
    CodeMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        true,
        "Critical internal error",
        "File a bug report with the failing quest source attached",
    ),
    CodeMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        false,
        true,
        "Logging or runtime initialization failed",
        "Check that the process is only initialized once",
    ),
    CodeMetadata::new(
        "ERR003",
        "System",
        Severity::Critical,
        false,
        true,
        "Invalid configuration",
        "Fix the configuration file or QUEST_* environment variables",
    ),
    // Fetch
    CodeMetadata::new(
        "E101",
        "Fetch",
        Severity::High,
        true,
        false,
        "Network error while fetching quest source",
        "Check connectivity and the configured source base URL",
    ),
    CodeMetadata::new(
        "E102",
        "Fetch",
        Severity::High,
        true,
        false,
        "Source server returned a non-success status",
        "Verify the quest name maps to an existing helper class",
    ),
    CodeMetadata::new(
        "E103",
        "Fetch",
        Severity::High,
        true,
        false,
        "Source fetch timed out",
        "Raise the fetch timeout or retry the run",
    ),
    CodeMetadata::new(
        "E104",
        "Fetch",
        Severity::High,
        true,
        false,
        "Quest source not found",
        "Verify the quest name maps to an existing helper class",
    ),
    CodeMetadata::new(
        "E105",
        "Fetch",
        Severity::Medium,
        true,
        false,
        "Quest source exceeds the maximum accepted size",
        "Raise the source size limit if the file is legitimate",
    ),
    CodeMetadata::new(
        "E106",
        "Fetch",
        Severity::Medium,
        true,
        false,
        "Quest source is not valid UTF-8",
        "Check the source encoding",
    ),
    // Extraction
    CodeMetadata::new(
        "E201",
        "Extraction",
        Severity::Low,
        true,
        false,
        "Expected member not declared in source",
        "None required; the related fields use their defaults",
    ),
    CodeMetadata::new(
        "E202",
        "Extraction",
        Severity::Low,
        true,
        false,
        "Requirement reference could not be resolved to a display name",
        "Check the setupRequirements member for the variable's construction",
    ),
    CodeMetadata::new(
        "E203",
        "Extraction",
        Severity::Medium,
        true,
        false,
        "Requirement alias chain forms a cycle",
        "Inspect the alias assignments in setupRequirements",
    ),
    CodeMetadata::new(
        "E204",
        "Extraction",
        Severity::Low,
        true,
        false,
        "String literal could not be reconstructed",
        "Check for unterminated literals near the reported offset",
    ),
    CodeMetadata::new(
        "E205",
        "Extraction",
        Severity::Low,
        true,
        false,
        "Panel references a step with no recognized assignment",
        "None required; the step is omitted from the panel",
    ),
    // Persistence
    CodeMetadata::new(
        "E301",
        "Persistence",
        Severity::High,
        true,
        false,
        "Output directory could not be created",
        "Check permissions on the output directory",
    ),
    CodeMetadata::new(
        "E302",
        "Persistence",
        Severity::High,
        true,
        false,
        "Quest record could not be written",
        "Check disk space and permissions on the output directory",
    ),
    CodeMetadata::new(
        "E303",
        "Persistence",
        Severity::High,
        true,
        false,
        "Quest record could not be serialized",
        "File a bug report with the failing quest source attached",
    ),
    // Input list
    CodeMetadata::new(
        "E401",
        "InputList",
        Severity::Critical,
        false,
        true,
        "Approved quest list could not be read",
        "Check the path passed to the scraper",
    ),
    CodeMetadata::new(
        "E402",
        "InputList",
        Severity::Critical,
        false,
        true,
        "Approved quest list is not a JSON object of booleans",
        "Fix the quest list file",
    ),
    CodeMetadata::new(
        "E403",
        "InputList",
        Severity::Low,
        true,
        false,
        "Approved quest list contains no approved entries",
        "Mark at least one quest as true",
    ),
];

fn get_code_registry() -> &'static HashMap<&'static str, CodeMetadata> {
    CODE_REGISTRY.get_or_init(|| {
        REGISTERED_CODES
            .iter()
            .map(|metadata| (metadata.code, metadata.clone()))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_code_metadata(code: &str) -> Option<&'static CodeMetadata> {
    get_code_registry().get(code)
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_code_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
