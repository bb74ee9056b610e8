use super::locator;
use regex::Regex;
use std::sync::LazyLock;

static PUBLIC_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bpublic\s+(?:(?:abstract|final)\s+)*class\s+([A-Za-z_$][\w$]*)").unwrap());

/// One fetched quest helper source, immutable once created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    name: String,
    text: String,
}

impl SourceUnit {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Display name the source was fetched for
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Class name from the first `public class <Name>` declaration
    pub fn declared_class_name(&self) -> Option<&str> {
        PUBLIC_CLASS
            .captures(&self.text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    pub fn member<'a>(&'a self, member_name: &'a str) -> Option<MemberSpan<'a>> {
        locator::locate(&self.text, member_name)
    }
}

/// Borrowed body of one member, without its delimiting braces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberSpan<'a> {
    source: &'a str,
    member_name: &'a str,
    start: usize,
    end: usize,
}

impl<'a> MemberSpan<'a> {
    pub(crate) fn new(source: &'a str, member_name: &'a str, start: usize, end: usize) -> Self {
        Self {
            source,
            member_name,
            start,
            end,
        }
    }

    pub fn text(&self) -> &'a str {
        &self.source[self.start..self.end]
    }

    pub fn member_name(&self) -> &'a str {
        self.member_name
    }

    /// Byte offset of the first body character in the source
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset of the closing brace in the source
    pub fn end(&self) -> usize {
        self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_class_name() {
        let unit = SourceUnit::new(
            "Cook's Assistant",
            "package x;\n\npublic class CooksAssistant extends BasicQuestHelper\n{\n}",
        );
        assert_eq!(unit.declared_class_name(), Some("CooksAssistant"));

        let final_class = SourceUnit::new("X", "public final class ImpCatcher {}");
        assert_eq!(final_class.declared_class_name(), Some("ImpCatcher"));

        let none = SourceUnit::new("X", "class Hidden {}");
        assert_eq!(none.declared_class_name(), None);
    }

    #[test]
    fn test_member_span_borrows_unit() {
        let unit = SourceUnit::new("X", "int getQuestPointReward() { return 5; }");
        let span = unit.member("getQuestPointReward").unwrap();
        assert_eq!(span.text().trim(), "return 5;");
        assert_eq!(&unit.text()[span.start()..span.end()], span.text());
    }
}
