//! Balanced-bracket scanning over raw logic text.
//!
//! The extractors never regex their way across brace boundaries; they find
//! an opening bracket and ask the scanner for its match. The scanner skips
//! string literals (single, double, backtick) and `//`/`/* */` comments so
//! nested bodies are not truncated at the first inner brace. Regex literals
//! are not recognized; a `/` inside one may be misread as a comment start,
//! which is an accepted imprecision.

/// Byte offset of the bracket matching the one at `open`.
///
/// `open` must point at `(`, `{` or `[`. Returns `None` when the text ends
/// before the bracket closes.
pub fn matching_bracket(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let open_b = *bytes.get(open)?;
    let close_b = match open_b {
        b'(' => b')',
        b'{' => b'}',
        b'[' => b']',
        _ => return None,
    };

    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'"' || b == b'\'' || b == b'`' {
            i = skip_string(bytes, i);
            continue;
        }
        if b == b'/' && i + 1 < bytes.len() {
            if bytes[i + 1] == b'/' {
                i = skip_line(bytes, i);
                continue;
            }
            if bytes[i + 1] == b'*' {
                i = skip_block_comment(bytes, i);
                continue;
            }
        }
        if b == open_b {
            depth += 1;
        } else if b == close_b {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// Content span `(start, end)` of the first `{ ... }` block at or after
/// `from`, exclusive of the braces themselves.
pub fn brace_block(text: &str, from: usize) -> Option<(usize, usize)> {
    let open = text[from..].find('{')? + from;
    let close = matching_bracket(text, open)?;
    Some((open + 1, close))
}

/// Content span of the first `( ... )` group at or after `from`.
pub fn paren_group(text: &str, from: usize) -> Option<(usize, usize)> {
    let open = text[from..].find('(')? + from;
    let close = matching_bracket(text, open)?;
    Some((open + 1, close))
}

/// Split `text` on separators that sit at bracket depth zero, outside
/// strings and comments. Returns `(offset, piece)` pairs; empty pieces are
/// dropped.
pub fn split_top_level<'a>(text: &'a str, seps: &[char]) -> Vec<(usize, &'a str)> {
    let bytes = text.as_bytes();
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'"' || b == b'\'' || b == b'`' {
            i = skip_string(bytes, i);
            continue;
        }
        if b == b'/' && i + 1 < bytes.len() {
            if bytes[i + 1] == b'/' {
                i = skip_line(bytes, i);
                continue;
            }
            if bytes[i + 1] == b'*' {
                i = skip_block_comment(bytes, i);
                continue;
            }
        }
        match b {
            b'(' | b'{' | b'[' => depth += 1,
            b')' | b'}' | b']' => depth = depth.saturating_sub(1),
            _ if depth == 0 && seps.contains(&(b as char)) => {
                push_piece(&mut pieces, text, start, i);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    push_piece(&mut pieces, text, start, bytes.len());
    pieces
}

/// Number of entries in an object or array literal body (the text between
/// the brackets). This is an estimate from static source text only.
pub fn entry_count(body: &str) -> usize {
    split_top_level(body, &[',', ';']).len()
}

fn push_piece<'a>(pieces: &mut Vec<(usize, &'a str)>, text: &'a str, start: usize, end: usize) {
    let piece = &text[start..end];
    if !piece.trim().is_empty() {
        pieces.push((start, piece));
    }
}

/// Skip a string literal starting at `i`; returns the index after the
/// closing quote (or the end of text for an unterminated literal).
fn skip_string(bytes: &[u8], i: usize) -> usize {
    let quote = bytes[i];
    let mut j = i + 1;
    while j < bytes.len() {
        if bytes[j] == b'\\' {
            j += 2;
            continue;
        }
        if bytes[j] == quote {
            return j + 1;
        }
        j += 1;
    }
    bytes.len()
}

fn skip_line(bytes: &[u8], i: usize) -> usize {
    let mut j = i;
    while j < bytes.len() && bytes[j] != b'\n' {
        j += 1;
    }
    j
}

fn skip_block_comment(bytes: &[u8], i: usize) -> usize {
    let mut j = i + 2;
    while j + 1 < bytes.len() {
        if bytes[j] == b'*' && bytes[j + 1] == b'/' {
            return j + 2;
        }
        j += 1;
    }
    bytes.len()
}
