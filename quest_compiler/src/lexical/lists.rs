//! Inline list literals: `Arrays.asList(..)`, `List.of(..)`,
//! `Collections.singletonList(..)`

use super::calls::{self, is_identifier};

/// Recognised list-construction prefixes, each ending at its `(`
pub const LIST_SYNTAXES: &[&str] = &["Arrays.asList", "List.of", "Collections.singletonList"];

/// An inline list found in a larger text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListLiteral {
    /// Offset of the list expression in the scanned text
    pub start: usize,
    /// Well-formed identifiers in argument order
    pub identifiers: Vec<String>,
}

/// Parse `expression` if it is exactly one inline list literal.
///
/// Returns `None` for any other expression shape. Arguments that are not
/// bare identifiers are dropped.
pub fn parse_list_expression(expression: &str) -> Option<Vec<String>> {
    let expression = expression.trim();

    for syntax in LIST_SYNTAXES {
        let Some(rest) = expression.strip_prefix(syntax) else {
            continue;
        };

        let open_paren = expression.len() - rest.trim_start().len();
        if expression.as_bytes().get(open_paren) != Some(&b'(') {
            continue;
        }

        let close = calls::matching_paren(expression, open_paren)?;
        if !expression[close + 1..].trim().is_empty() {
            return None;
        }

        return Some(identifiers_in(&expression[open_paren + 1..close]));
    }

    None
}

/// Every inline list literal in `text`, in source order
pub fn find_list_literals(text: &str) -> Vec<ListLiteral> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();

    for syntax in LIST_SYNTAXES {
        for (start, _) in text.match_indices(syntax) {
            // `List.of` also matches inside `ImmutableList.of`
            if start > 0 && (bytes[start - 1].is_ascii_alphanumeric() || bytes[start - 1] == b'_') {
                continue;
            }

            let mut open_paren = start + syntax.len();
            while bytes.get(open_paren).is_some_and(|b| b.is_ascii_whitespace()) {
                open_paren += 1;
            }

            if let Some(close) = calls::matching_paren(text, open_paren) {
                found.push(ListLiteral {
                    start,
                    identifiers: identifiers_in(&text[open_paren + 1..close]),
                });
            }
        }
    }

    found.sort_by_key(|list| list.start);
    found
}

/// Split arguments at top level and keep only bare identifiers
pub fn identifiers_in(args: &str) -> Vec<String> {
    calls::split_top_level_args(args)
        .into_iter()
        .filter(|arg| is_identifier(arg))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_three_syntaxes() {
        assert_eq!(
            parse_list_expression("Arrays.asList(step1, step2)"),
            Some(vec!["step1".to_string(), "step2".to_string()])
        );
        assert_eq!(
            parse_list_expression(" List.of( a ,b ) "),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(
            parse_list_expression("Collections.singletonList(talkToCook)"),
            Some(vec!["talkToCook".to_string()])
        );
    }

    #[test]
    fn test_malformed_entries_dropped() {
        assert_eq!(
            parse_list_expression("Arrays.asList(a, 3b, c.d, new X(), \"s\", _e)"),
            Some(vec!["a".to_string(), "_e".to_string()])
        );
        assert_eq!(parse_list_expression("List.of()"), Some(vec![]));
    }

    #[test]
    fn test_other_expressions_rejected() {
        assert_eq!(parse_list_expression("steps"), None);
        assert_eq!(parse_list_expression("new ArrayList<>(x)"), None);
        assert_eq!(parse_list_expression("List.of(a).subList(0, 1)"), None);
        assert_eq!(parse_list_expression("List.of(a"), None);
    }

    #[test]
    fn test_find_list_literals_in_order() {
        let text = "return Arrays.asList(bucket, egg);\nreqs.addAll(List.of(milk));\nImmutableList.of(nope);";
        let lists = find_list_literals(text);

        assert_eq!(lists.len(), 2);
        assert_eq!(lists[0].identifiers, vec!["bucket", "egg"]);
        assert_eq!(lists[1].identifiers, vec!["milk"]);
        assert!(lists[0].start < lists[1].start);
    }
}
