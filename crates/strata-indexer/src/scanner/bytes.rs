//! Byte-level scanning helpers.
//!
//! Everything here works on raw `&[u8]` slices borrowed from the file
//! buffer. Nothing is decoded to text until a match has been found.

/// Iterate over lines, without the trailing `\n` or `\r\n`.
pub fn lines(data: &[u8]) -> impl Iterator<Item = &[u8]> {
    data.split(|b| *b == b'\n')
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

/// Trim ASCII whitespace from both ends.
pub fn trim(bytes: &[u8]) -> &[u8] {
    trim_start(trim_end(bytes))
}

pub fn trim_start(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}

pub fn trim_end(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |i| i + 1);
    &bytes[..end]
}

/// Offset of the first occurrence of `needle` at or after `from`.
pub fn find_from(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || from >= haystack.len() || needle.len() > haystack.len() - from {
        return None;
    }
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|i| i + from)
}

/// Whether the byte can be part of an identifier.
pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

/// Whether a keyword occurs at `at` as a standalone token.
///
/// Keywords that start with an identifier byte must not be glued to a
/// preceding identifier. Keywords that end with an identifier byte must be
/// followed by whitespace.
pub fn keyword_at(line: &[u8], keyword: &[u8], at: usize) -> bool {
    let (Some(&first), Some(&last)) = (keyword.first(), keyword.last()) else {
        return false;
    };

    if is_ident_byte(first) && at > 0 && is_ident_byte(line[at - 1]) {
        return false;
    }

    let end = at + keyword.len();
    if is_ident_byte(last) {
        return line.get(end).is_some_and(|b| b.is_ascii_whitespace());
    }
    true
}

/// First whitespace-delimited word, after leading whitespace.
pub fn first_word(bytes: &[u8]) -> &[u8] {
    let bytes = trim_start(bytes);
    let end = bytes
        .iter()
        .position(|b| b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[..end]
}

/// Strip ASCII punctuation (except `_`) from both ends.
pub fn trim_punctuation(bytes: &[u8]) -> &[u8] {
    let is_punct = |b: &u8| b.is_ascii_punctuation() && *b != b'_';
    let start = bytes.iter().position(|b| !is_punct(b)).unwrap_or(bytes.len());
    let bytes = &bytes[start..];
    let end = bytes.iter().rposition(|b| !is_punct(b)).map_or(0, |i| i + 1);
    &bytes[..end]
}

/// Contents of the first `"`, `'` or `` ` `` quoted token.
pub fn quoted(bytes: &[u8]) -> Option<&[u8]> {
    let open = bytes.iter().position(|b| matches!(b, b'"' | b'\'' | b'`'))?;
    let quote = bytes[open];
    let rest = &bytes[open + 1..];
    let close = rest.iter().position(|b| *b == quote)?;
    Some(&rest[..close])
}

/// Contents of a quoted token that starts the slice, after leading
/// whitespace. Quotes later in the slice are ignored.
pub fn leading_quoted(bytes: &[u8]) -> Option<&[u8]> {
    let bytes = trim_start(bytes);
    match bytes.first() {
        Some(b'"' | b'\'' | b'`') => quoted(bytes),
        _ => None,
    }
}

/// Leading identifier-like token, cut at whitespace or a delimiter.
pub fn identifier(bytes: &[u8]) -> &[u8] {
    let bytes = trim_start(bytes);
    let end = bytes
        .iter()
        .position(|b| {
            b.is_ascii_whitespace()
                || matches!(
                    b,
                    b'(' | b')'
                        | b'{'
                        | b'}'
                        | b'<'
                        | b'>'
                        | b'['
                        | b']'
                        | b':'
                        | b';'
                        | b','
                        | b'='
                )
        })
        .unwrap_or(bytes.len());
    &bytes[..end]
}

/// Lossy conversion for matched tokens.
pub fn to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_strip_crlf() {
        let data = b"one\r\ntwo\nthree";
        let collected: Vec<&[u8]> = lines(data).collect();
        assert_eq!(collected, vec![&b"one"[..], &b"two"[..], &b"three"[..]]);
    }

    #[test]
    fn test_trim() {
        assert_eq!(trim(b"  \tabc \n"), b"abc");
        assert_eq!(trim(b"   "), b"");
        assert_eq!(trim(b""), b"");
    }

    #[test]
    fn test_find_from() {
        assert_eq!(find_from(b"abcabc", b"bc", 0), Some(1));
        assert_eq!(find_from(b"abcabc", b"bc", 2), Some(4));
        assert_eq!(find_from(b"abc", b"abcd", 0), None);
        assert_eq!(find_from(b"abc", b"", 0), None);
    }

    #[test]
    fn test_keyword_boundaries() {
        assert!(keyword_at(b"pub fn main()", b"fn", 4));
        assert!(!keyword_at(b"define_fn x", b"fn", 7));
        assert!(!keyword_at(b"fnord", b"fn", 0));
        assert!(keyword_at(b"require('x')", b"require(", 0));
    }

    #[test]
    fn test_tokens() {
        assert_eq!(first_word(b"  std::io; rest"), b"std::io;");
        assert_eq!(trim_punctuation(b"<stdio.h>"), b"stdio.h");
        assert_eq!(trim_punctuation(b"__init__;"), b"__init__");
        assert_eq!(quoted(b"x from './mod';"), Some(&b"./mod"[..]));
        assert_eq!(quoted(b"no quotes"), None);
        assert_eq!(leading_quoted(b"  'dotenv').config()"), Some(&b"dotenv"[..]));
        assert_eq!(leading_quoted(b"VERSION \"1.2.3\""), None);
        assert_eq!(identifier(b" foo() {}"), b"foo");
        assert_eq!(identifier(b"Bar<T>: Baz"), b"Bar");
    }
}
