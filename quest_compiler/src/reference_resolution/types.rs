//! Alias graph and resolution outcomes

use std::collections::HashMap;

/// Outcome of resolving one item-requirement variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Display text reached through `depth` alias links
    Resolved { display: &'a str, depth: usize },
    /// The chain ended at a name with no binding
    Missing { last: &'a str },
    /// The chain revisited `repeated`
    Cycle { repeated: &'a str },
}

impl<'a> Resolution<'a> {
    pub fn display(&self) -> Option<&'a str> {
        match self {
            Resolution::Resolved { display, .. } => Some(display),
            _ => None,
        }
    }
}

/// Variable bindings from `setupRequirements`: direct display strings plus
/// `<alias> = <base>.highlighted()` / `.quantity(..)` links
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasGraph {
    pub(super) direct: HashMap<String, String>,
    pub(super) aliases: HashMap<String, String>,
}

impl AliasGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to display text unless it is already bound
    pub fn add_direct(&mut self, name: impl Into<String>, display: impl Into<String>) {
        self.direct.entry(name.into()).or_insert_with(|| display.into());
    }

    /// Link `name` to `base` unless it is already linked
    pub fn add_alias(&mut self, name: impl Into<String>, base: impl Into<String>) {
        self.aliases.entry(name.into()).or_insert_with(|| base.into());
    }

    pub fn direct_count(&self) -> usize {
        self.direct.len()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Follow alias links iteratively until a direct binding is found.
    ///
    /// A direct binding takes precedence over an alias of the same name.
    pub fn resolve_detailed<'a>(&'a self, name: &'a str) -> Resolution<'a> {
        let mut visited: Vec<&str> = Vec::new();
        let mut current = name;

        loop {
            if let Some(display) = self.direct.get(current) {
                return Resolution::Resolved {
                    display,
                    depth: visited.len(),
                };
            }

            if visited.contains(&current) {
                return Resolution::Cycle { repeated: current };
            }
            visited.push(current);

            match self.aliases.get(current) {
                Some(base) => current = base,
                None => return Resolution::Missing { last: current },
            }
        }
    }

    pub fn resolve<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        self.resolve_detailed(name).display()
    }
}
