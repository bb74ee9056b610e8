//! Method-body location by brace-depth scanning
//!
//! A declaration is recognised by its exact name, preceded by a return type
//! (so call sites like `x.getPanels()` or `return getPanels();` are skipped),
//! followed by a balanced parameter list, an optional `throws` clause and `{`.
//!
//! Braces are counted one at a time without regard to string or comment
//! contents; a `{` or `}` inside a literal in the body shifts the span.

use super::unit::MemberSpan;

/// Locate the body of `member_name` in `source`.
///
/// The returned span excludes the delimiting braces. Returns `None` when no
/// declaration matches or the body is not closed before end of text.
pub fn locate<'a>(source: &'a str, member_name: &'a str) -> Option<MemberSpan<'a>> {
    if member_name.is_empty() {
        return None;
    }

    for (index, _) in source.match_indices(member_name) {
        let name_end = index + member_name.len();

        if !is_name_boundary(source, index, name_end) {
            continue;
        }

        if !preceded_by_return_type(&source[..index]) {
            continue;
        }

        let Some(open_brace) = body_open_brace(source, name_end) else {
            continue;
        };

        // The first real declaration decides: an unbalanced body is absence.
        let close_brace = matching_close_brace(source, open_brace)?;
        return Some(MemberSpan::new(
            source,
            member_name,
            open_brace + 1,
            close_brace,
        ));
    }

    None
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn is_name_boundary(source: &str, start: usize, end: usize) -> bool {
    let bytes = source.as_bytes();
    let before_ok = start == 0 || !is_identifier_byte(bytes[start - 1]);
    let after_ok = end >= bytes.len() || !is_identifier_byte(bytes[end]);
    before_ok && after_ok
}

/// The token before a declared name is its return type: an identifier,
/// a closing generic `>` or an array `]`.
fn preceded_by_return_type(prefix: &str) -> bool {
    let trimmed = prefix.trim_end();
    let Some(&last) = trimmed.as_bytes().last() else {
        return false;
    };

    if last == b'>' || last == b']' {
        return true;
    }

    if !is_identifier_byte(last) {
        return false;
    }

    let word_start = trimmed
        .bytes()
        .rposition(|b| !is_identifier_byte(b))
        .map(|p| p + 1)
        .unwrap_or(0);

    // Keywords that can precede a call expression
    !matches!(
        &trimmed[word_start..],
        "return" | "new" | "throw" | "else" | "case"
    )
}

/// From just past the member name, expect `( ... )`, an optional throws
/// clause, then `{`. Returns the offset of that `{`.
fn body_open_brace(source: &str, name_end: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut pos = skip_whitespace(bytes, name_end);

    if bytes.get(pos) != Some(&b'(') {
        return None;
    }

    let mut depth = 0usize;
    while pos < bytes.len() {
        match bytes[pos] {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            b'{' | b'}' | b';' => return None,
            _ => {}
        }
        pos += 1;
    }

    if pos >= bytes.len() {
        return None;
    }

    pos = skip_whitespace(bytes, pos + 1);

    if source[pos..].starts_with("throws") {
        let clause_end = source[pos..].find(['{', ';'])? + pos;
        pos = clause_end;
    }

    (bytes.get(pos) == Some(&b'{')).then_some(pos)
}

fn matching_close_brace(source: &str, open_brace: usize) -> Option<usize> {
    let mut depth = 0usize;

    for (offset, byte) in source.as_bytes()[open_brace..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open_brace + offset);
                }
            }
            _ => {}
        }
    }

    None
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}
