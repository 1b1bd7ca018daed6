//! Byte-level scanning helpers for locating delimited regions in manifest text.
//!
//! Quoted strings (with backslash escapes) and `/* */` comments are skipped, so
//! a brace inside a file name or comment never counts as structure. All
//! returned offsets point at ASCII delimiters and are therefore valid `str`
//! boundaries.

use regex::Regex;

/// Why a block could not be resolved to an insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMiss {
    NotFound,
    Ambiguous,
    Unbalanced,
    MissingMemberList,
}

/// Offset of the `{` that opens the definition of `anchor`.
///
/// A definition is the anchor token followed by an optional comment, `=` and
/// `{`. Plain references (e.g. list items) do not count. More than one
/// definition is ambiguous.
pub fn find_definition(text: &str, anchor: &str) -> Result<usize, ScanMiss> {
    let anchor = anchor.trim();
    if anchor.is_empty() {
        return Err(ScanMiss::NotFound);
    }
    let pattern = format!(
        r"(?:^|[^0-9A-Za-z_]){}\s*(?:/\*.*?\*/\s*)?=\s*\{{",
        regex::escape(anchor)
    );
    let re = Regex::new(&pattern).map_err(|_| ScanMiss::NotFound)?;

    let mut opens = re
        .find_iter(text)
        .map(|m| m.end() - 1)
        .filter(|&open| depth_before(text, 0, open).is_some());
    let first = opens.next().ok_or(ScanMiss::NotFound)?;
    if opens.next().is_some() {
        return Err(ScanMiss::Ambiguous);
    }
    Ok(first)
}

/// Offset of the delimiter closing the one at `open` (`{` or `(`).
pub fn matching_close(text: &str, open: usize) -> Result<usize, ScanMiss> {
    let bytes = text.as_bytes();
    match bytes.get(open) {
        Some(b'{') | Some(b'(') => {}
        _ => return Err(ScanMiss::Unbalanced),
    }

    let mut stack: Vec<u8> = Vec::new();
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => i = skip_string(bytes, i).ok_or(ScanMiss::Unbalanced)?,
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_comment(bytes, i).ok_or(ScanMiss::Unbalanced)?
            }
            b'{' => stack.push(b'}'),
            b'(' => stack.push(b')'),
            c @ (b'}' | b')') => {
                if stack.pop() != Some(c) {
                    return Err(ScanMiss::Unbalanced);
                }
                if stack.is_empty() {
                    return Ok(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    Err(ScanMiss::Unbalanced)
}

/// Offset of the `)` closing the `key = ( ... )` list directly inside the
/// block spanning `open..=close`.
///
/// A block without that list yields `MissingMemberList`, so a group that has
/// no `children` key receives nothing even though the block itself is valid.
pub fn member_list_close(
    text: &str,
    open: usize,
    close: usize,
    key: &str,
) -> Result<usize, ScanMiss> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ScanMiss::MissingMemberList);
    }
    let pattern = format!(r"(?:^|[^0-9A-Za-z_]){}\s*=\s*\(", regex::escape(key));
    let re = Regex::new(&pattern).map_err(|_| ScanMiss::MissingMemberList)?;

    let body = &text[open + 1..close];
    for m in re.find_iter(body) {
        let list_open = open + 1 + m.end() - 1;
        if depth_before(text, open, list_open) == Some(1) {
            return matching_close(text, list_open);
        }
    }
    Err(ScanMiss::MissingMemberList)
}

/// Nesting depth at `pos` when scanning from `from`, or `None` when `pos`
/// falls inside a string or comment.
fn depth_before(text: &str, from: usize, pos: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth: usize = 0;
    let mut i = from;
    while i < pos {
        match bytes[i] {
            b'"' => {
                i = skip_string(bytes, i)?;
                if i >= pos {
                    return None;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_comment(bytes, i)?;
                if i >= pos {
                    return None;
                }
            }
            b'{' | b'(' => depth += 1,
            b'}' | b')' => depth = depth.saturating_sub(1),
            _ => {}
        }
        i += 1;
    }
    Some(depth)
}

/// Index of the closing quote for the string opening at `start`.
fn skip_string(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Index of the `/` ending the comment opening at `start`.
fn skip_comment(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return Some(i + 1);
        }
        i += 1;
    }
    None
}

/// Where to splice text so it lands right before the delimiter at `delim`.
///
/// Returns the offset and whether a leading newline is needed. When only
/// indentation precedes the delimiter on its line, the splice goes at the start
/// of that line and no existing line is touched.
pub fn insertion_point(text: &str, delim: usize) -> (usize, bool) {
    let line_start = text[..delim].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let only_indent = text[line_start..delim].bytes().all(|b| b == b' ' || b == b'\t');
    if only_indent {
        (line_start, false)
    } else {
        (delim, true)
    }
}
