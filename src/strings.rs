use std::str;

/// Characters which may be escaped with a backslash in inline content.
pub const ESCAPABLE: &[u8] = b"\\'*_{}[]()#+-.!";

pub fn is_escapable(ch: u8) -> bool {
    ESCAPABLE.contains(&ch)
}

pub fn is_space_or_tab(ch: u8) -> bool {
    matches!(ch, 9 | 32)
}

pub fn isspace(ch: u8) -> bool {
    matches!(ch, 9 | 10 | 11 | 12 | 13 | 32)
}

/// Width of the UTF-8 sequence introduced by the lead byte `b`; 1 for
/// continuation and invalid bytes so that scanning always makes progress.
pub fn utf8_width(b: u8) -> usize {
    match b {
        0x00..=0x7f => 1,
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => 1,
    }
}

/// Decode the character at the front of `bytes`, returning it with its byte
/// width.  Malformed sequences decode as U+FFFD with width 1.
pub fn decode_char(bytes: &[u8]) -> Option<(char, usize)> {
    let &lead = bytes.first()?;
    let width = utf8_width(lead);
    if width == 1 {
        if lead < 0x80 {
            return Some((lead as char, 1));
        }
        return Some((char::REPLACEMENT_CHARACTER, 1));
    }
    match bytes.get(..width).map(str::from_utf8) {
        Some(Ok(s)) => s.chars().next().map(|c| (c, width)),
        _ => Some((char::REPLACEMENT_CHARACTER, 1)),
    }
}

/// Index of the end of the line starting at or containing `from`: the
/// position of the next `\n`, or the end of the buffer.
pub fn line_end(bytes: &[u8], from: usize) -> usize {
    let matcher = jetscii::bytes!(b'\n');
    match matcher.find(&bytes[from..]) {
        Some(offset) => from + offset,
        None => bytes.len(),
    }
}

/// Whether the line beginning at `bytes[0]` contains only spaces and tabs.
/// An empty slice is blank.
pub fn is_blank(bytes: &[u8]) -> bool {
    for &c in bytes {
        match c {
            b'\n' => return true,
            b' ' | b'\t' => (),
            _ => return false,
        }
    }
    true
}

/// Byte length of the complete blank lines at the front of `bytes`.
pub fn blank_lines(bytes: &[u8]) -> usize {
    let mut len = 0;
    loop {
        let eol = line_end(bytes, len);
        if eol >= bytes.len() || !is_blank(&bytes[len..eol]) {
            return len;
        }
        len = eol + 1;
    }
}

/// Width of the one-level indent (four spaces or a tab) at the front of
/// `bytes`, if there is one.
pub fn indent_width(bytes: &[u8]) -> Option<usize> {
    if bytes.first() == Some(&b'\t') {
        Some(1)
    } else if bytes.starts_with(b"    ") {
        Some(4)
    } else {
        None
    }
}

/// Length of a bullet list marker and the whitespace following it.
pub fn bullet_marker_width(bytes: &[u8]) -> Option<usize> {
    match bytes {
        [b'-' | b'*' | b'+', ws, ..] if is_space_or_tab(*ws) => {
            Some(1 + bytes[1..].iter().take_while(|&&b| is_space_or_tab(b)).count())
        }
        _ => None,
    }
}

/// Length of an ordered list marker (`12.` and whitespace).
pub fn ordered_marker_width(bytes: &[u8]) -> Option<usize> {
    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 || bytes.get(digits) != Some(&b'.') {
        return None;
    }
    match bytes.get(digits + 1) {
        Some(&ws) if is_space_or_tab(ws) => Some(
            digits + 1 + bytes[digits + 1..].iter().take_while(|&&b| is_space_or_tab(b)).count(),
        ),
        _ => None,
    }
}

/// Whether the line at the front of `bytes` is a horizontal rule: three or
/// more of one of `*`, `-`, `+` or `_`, optionally separated by single spaces.
pub fn is_rule(bytes: &[u8]) -> bool {
    let marker = match bytes.first() {
        Some(&c @ (b'*' | b'-' | b'+' | b'_')) => c,
        _ => return false,
    };
    let line = rtrim_slice(&bytes[..line_end(bytes, 0)]);

    let mut count = 0;
    let mut i = 0;
    while i < line.len() {
        if line[i] == marker {
            count += 1;
            i += 1;
        } else if line[i] == b' ' && line.get(i + 1) == Some(&marker) {
            i += 1;
        } else {
            return false;
        }
    }
    count >= 3
}

/// Whether the line at the front of `bytes` is a setext underline of
/// `=` or `-`, returning the character.
pub fn setext_underline(bytes: &[u8]) -> Option<u8> {
    let line = rtrim_slice(&bytes[..line_end(bytes, 0)]);
    match line.first() {
        Some(&c @ (b'=' | b'-')) if line.iter().all(|&b| b == c) => Some(c),
        _ => None,
    }
}

pub fn trim_trailing_newlines(mut i: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n'] = i {
        i = rest;
    }
    i
}

pub fn ltrim_slice(mut i: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = i {
        if isspace(*first) {
            i = rest;
        } else {
            break;
        }
    }
    i
}

pub fn rtrim_slice(mut i: &[u8]) -> &[u8] {
    while let [rest @ .., last] = i {
        if isspace(*last) {
            i = rest;
        } else {
            break;
        }
    }
    i
}

pub fn trim_slice(mut i: &[u8]) -> &[u8] {
    i = ltrim_slice(i);
    i = rtrim_slice(i);
    i
}

/// Strip `#`s and whitespace from both ends of a heading's text.
pub fn trim_hashes(line: &[u8]) -> &[u8] {
    let is_mark = |b: &u8| *b == b'#' || isspace(*b);
    let start = line.iter().position(|b| !is_mark(b)).unwrap_or(line.len());
    let end = line.iter().rposition(|b| !is_mark(b)).map_or(start, |i| i + 1);
    &line[start..end]
}

/// Normalize `\r\n` and lone `\r` to `\n`, and drop a leading byte-order
/// mark.
pub fn normalize_newlines(input: &[u8]) -> Vec<u8> {
    let input = input.strip_prefix(b"\xef\xbb\xbf").unwrap_or(input);
    let mut out = Vec::with_capacity(input.len());
    let matcher = jetscii::bytes!(b'\r');

    let mut ix = 0;
    while ix < input.len() {
        match matcher.find(&input[ix..]) {
            Some(offset) => {
                out.extend_from_slice(&input[ix..ix + offset]);
                out.push(b'\n');
                ix += offset + 1;
                if input.get(ix) == Some(&b'\n') {
                    ix += 1;
                }
            }
            None => {
                out.extend_from_slice(&input[ix..]);
                break;
            }
        }
    }
    out
}

/// Normalize a reference label: trim it, collapse internal whitespace and
/// case-fold it.
pub fn normalize_label(i: &str) -> String {
    let i = i.trim();
    let mut v = String::with_capacity(i.len());
    let mut last_was_whitespace = false;
    for c in i.chars() {
        if c.is_whitespace() {
            if !last_was_whitespace {
                last_was_whitespace = true;
                v.push(' ');
            }
        } else {
            last_was_whitespace = false;
            v.push(c);
        }
    }
    caseless::default_case_fold_str(&v)
}

/// Drop the backslash from each escaped punctuation character.
pub fn unescape(v: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(v.len());
    let mut i = 0;
    while i < v.len() {
        if v[i] == b'\\' && i + 1 < v.len() && is_escapable(v[i + 1]) {
            i += 1;
        }
        out.push(v[i]);
        i += 1;
    }
    out
}

pub fn to_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
