//! Constructor-call scanning and top-level argument splitting
//!
//! Parenthesis matching skips string and char literals so a `)` or `,` inside
//! a description does not end a call or split an argument.

/// One `new <Type>(...)` occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite<'a> {
    /// Offset of `new`
    pub start: usize,
    /// Offset just past the closing `)`
    pub end: usize,
    /// Offset of the first argument character
    pub args_start: usize,
    /// Text between the parentheses
    pub args: &'a str,
    /// Whole call text from `new` to `)`
    pub text: &'a str,
}

impl<'a> CallSite<'a> {
    /// Top-level arguments, trimmed
    pub fn arguments(&self) -> Vec<&'a str> {
        split_top_level_args(self.args)
    }
}

/// Every `new <type_name>(...)` in `text`, in source order
pub fn constructor_calls<'a>(text: &'a str, type_name: &str) -> Vec<CallSite<'a>> {
    let bytes = text.as_bytes();
    let mut calls = Vec::new();

    for (start, _) in text.match_indices("new") {
        if start > 0 && continues_word(bytes[start - 1]) {
            continue;
        }

        let type_start = skip_whitespace(bytes, start + 3);
        if type_start == start + 3 || !text[type_start..].starts_with(type_name) {
            continue;
        }

        let type_end = type_start + type_name.len();
        if bytes.get(type_end).is_some_and(|b| continues_word(*b)) {
            continue;
        }

        let open_paren = skip_whitespace(bytes, type_end);
        if bytes.get(open_paren) != Some(&b'(') {
            continue;
        }

        if let Some(site) = call_at(text, start, open_paren) {
            calls.push(site);
        }
    }

    calls
}

/// Build a call site from the offset of its `(`; `start` is where the call
/// expression begins.
pub fn call_at(text: &str, start: usize, open_paren: usize) -> Option<CallSite<'_>> {
    let close = matching_paren(text, open_paren)?;
    Some(CallSite {
        start,
        end: close + 1,
        args_start: open_paren + 1,
        args: &text[open_paren + 1..close],
        text: &text[start..close + 1],
    })
}

/// Offset of the `)` matching the `(` at `open_paren`
pub fn matching_paren(text: &str, open_paren: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open_paren) != Some(&b'(') {
        return None;
    }

    let mut depth = 0usize;
    let mut pos = open_paren;

    while pos < bytes.len() {
        match bytes[pos] {
            b'"' | b'\'' => pos = skip_quoted(bytes, pos)?,
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
            _ => {}
        }
        pos += 1;
    }

    None
}

/// Split at commas not nested inside `()`, `[]`, `{}` or literals.
/// Empty input gives no arguments.
pub fn split_top_level_args(args: &str) -> Vec<&str> {
    let bytes = args.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut part_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            b'"' | b'\'' => match skip_quoted(bytes, pos) {
                Some(closing) => pos = closing,
                None => break,
            },
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth -= 1,
            b',' if depth == 0 => {
                parts.push(args[part_start..pos].trim());
                part_start = pos + 1;
            }
            _ => {}
        }
        pos += 1;
    }

    let last = args[part_start..].trim();
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last);
    }

    parts
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Integer literal with optional sign and `_` separators
pub fn parse_int(token: &str) -> Option<i64> {
    let cleaned: String = token.trim().chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// `Prefix.IDENT` with a well-formed identifier, returning `IDENT`
pub fn qualified_constant<'a>(token: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = token.trim().strip_prefix(prefix)?.trim_start();
    let ident = rest.strip_prefix('.')?.trim_start();
    is_identifier(ident).then_some(ident)
}

fn continues_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b == b'.'
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// From an opening quote, the offset of its closing quote
fn skip_quoted(bytes: &[u8], open: usize) -> Option<usize> {
    let quote = bytes[open];
    let mut pos = open + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 1,
            b if b == quote => return Some(pos),
            _ => {}
        }
        pos += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_calls_in_order() {
        let text = r#"a(new ExperienceReward(Skill.COOKING, 300)); b = new ExperienceReward (Skill.FIREMAKING, 1_250);"#;
        let calls = constructor_calls(text, "ExperienceReward");

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].arguments(), vec!["Skill.COOKING", "300"]);
        assert_eq!(calls[1].arguments(), vec!["Skill.FIREMAKING", "1_250"]);
        assert!(calls[0].text.starts_with("new ExperienceReward("));
        assert!(calls[0].text.ends_with("300)"));
    }

    #[test]
    fn test_constructor_requires_exact_type() {
        let text = "new ItemRequirements(\"x\"); renew ItemRequirement(\"y\"); new ItemRequirement(\"z\")";
        let calls = constructor_calls(text, "ItemRequirement");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].arguments(), vec!["\"z\""]);
    }

    #[test]
    fn test_parens_inside_literals_ignored() {
        let text = r#"new NpcStep(this, NpcID.COOK, new WorldPoint(1, 2, 0), "Talk (again) to the cook, then :)")"#;
        let calls = constructor_calls(text, "NpcStep");
        assert_eq!(calls.len(), 1);

        let args = calls[0].arguments();
        assert_eq!(args.len(), 4);
        assert_eq!(args[2], "new WorldPoint(1, 2, 0)");
        assert_eq!(args[3], r#""Talk (again) to the cook, then :)""#);
    }

    #[test]
    fn test_split_nested_args() {
        assert_eq!(
            split_top_level_args(" a, f(b, c), new int[]{1, 2}, 'x' "),
            vec!["a", "f(b, c)", "new int[]{1, 2}", "'x'"]
        );
        assert!(split_top_level_args("   ").is_empty());
        assert_eq!(split_top_level_args("a,"), vec!["a", ""]);
    }

    #[test]
    fn test_identifier_filter() {
        assert!(is_identifier("talkToCook"));
        assert!(is_identifier("_step2"));
        assert!(!is_identifier("2step"));
        assert!(!is_identifier("a.b"));
        assert!(!is_identifier("new Foo()"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn test_parse_int_variants() {
        assert_eq!(parse_int("3206"), Some(3206));
        assert_eq!(parse_int(" -12 "), Some(-12));
        assert_eq!(parse_int("1_000_000"), Some(1_000_000));
        assert_eq!(parse_int("x"), None);
        assert_eq!(parse_int(""), None);
    }

    #[test]
    fn test_qualified_constant() {
        assert_eq!(qualified_constant("Skill.COOKING", "Skill"), Some("COOKING"));
        assert_eq!(
            qualified_constant(" QuestHelperQuest . DRUIDIC_RITUAL", "QuestHelperQuest"),
            Some("DRUIDIC_RITUAL")
        );
        assert_eq!(qualified_constant("Skills.COOKING", "Skill"), None);
        assert_eq!(qualified_constant("COOKING", "Skill"), None);
    }

    #[test]
    fn test_unterminated_call() {
        assert!(constructor_calls("new PanelDetails(\"a\", List.of(x)", "PanelDetails").is_empty());
    }
}
