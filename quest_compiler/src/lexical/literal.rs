//! Java string literal reconstruction across `+` concatenation

/// A reconstructed literal and where it ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadString {
    pub value: String,
    /// Byte offset just past the final closing quote
    pub end: usize,
}

/// Read the literal starting at `open_quote`, following `"a" + "b"` chains.
///
/// A backslash takes the next character verbatim and is itself dropped; there
/// is no escape table. Fragments are joined without a separator. Returns
/// `None` when `open_quote` is not a `"` or any fragment is unterminated.
pub fn read_string(source: &str, open_quote: usize) -> Option<ReadString> {
    let bytes = source.as_bytes();
    if bytes.get(open_quote) != Some(&b'"') {
        return None;
    }

    let mut value = String::new();
    let mut quote = open_quote;

    loop {
        let end = read_fragment(source, quote, &mut value)?;

        let operator = skip_whitespace(bytes, end);
        if bytes.get(operator) == Some(&b'+') {
            let next = skip_whitespace(bytes, operator + 1);
            if bytes.get(next) == Some(&b'"') {
                quote = next;
                continue;
            }
        }

        return Some(ReadString { value, end });
    }
}

/// Convenience for callers holding a trimmed argument that should be a literal
pub fn read_string_argument(argument: &str) -> Option<String> {
    let trimmed = argument.trim_start();
    read_string(trimmed, 0).map(|read| read.value)
}

fn read_fragment(source: &str, open_quote: usize, out: &mut String) -> Option<usize> {
    let body_start = open_quote + 1;
    let mut chars = source[body_start..].char_indices();

    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' => {
                let (_, escaped) = chars.next()?;
                out.push(escaped);
            }
            '"' => return Some(body_start + offset + 1),
            _ => out.push(c),
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
