//! Item-requirement reference resolution
//!
//! Builds an [`AliasGraph`] from the `setupRequirements` body and resolves
//! variable names listed by `getItemRequirements` to their display text.
//! Resolution is iterative with a visited set, so alias cycles end as
//! unresolved instead of recursing.

pub mod types;

pub use types::{AliasGraph, Resolution};

use crate::lexical::literal::read_string;
use regex::Regex;
use std::sync::LazyLock;

static DIRECT_REQUIREMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\b([A-Za-z_]\w*)\s*=\s*new\s+(?:ItemRequirements|ItemRequirement|FollowerItemRequirement)\s*\(\s*""#,
    )
    .unwrap()
});

static MODIFIED_ALIAS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b([A-Za-z_]\w*)\s*=\s*([A-Za-z_]\w*)\s*\.\s*(?:highlighted\s*\(\s*\)|quantity\s*\()",
    )
    .unwrap()
});

/// Collect direct bindings and alias links from a setup body
pub fn build_alias_graph(setup_body: &str) -> AliasGraph {
    let mut graph = AliasGraph::new();

    for caps in DIRECT_REQUIREMENT.captures_iter(setup_body) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        // The pattern ends on the opening quote of the display argument
        match read_string(setup_body, whole.end() - 1) {
            Some(read) => graph.add_direct(name.as_str(), read.value),
            None => crate::log_warning!(code = crate::logging::codes::extraction::UNREADABLE_LITERAL,
                "Unreadable requirement display text",
                "variable" => name.as_str()
            ),
        }
    }

    for caps in MODIFIED_ALIAS.captures_iter(setup_body) {
        if let (Some(name), Some(base)) = (caps.get(1), caps.get(2)) {
            graph.add_alias(name.as_str(), base.as_str());
        }
    }

    graph
}
