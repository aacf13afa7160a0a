//! Byte-level scanning helpers shared by the brace scanner and the chunker.
//!
//! Every delimiter we care about is ASCII, so scanning the UTF-8 bytes
//! directly yields valid `str` offsets.

/// Region a line starts in, carried over from the previous line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Carry {
    #[default]
    Code,
    /// Inside a `/* */` comment opened on an earlier line.
    BlockComment,
    /// Inside a verbatim `@"…"` string opened on an earlier line.
    VerbatimString,
}

/// A brace found in code (outside strings and comments).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brace {
    Open,
    Close,
}

/// Skip over non-code regions: comments (`//`, `#`, `/* */`) and string
/// literals (`"…"`, `'…'`, verbatim `@"…"`).
///
/// Returns `Some(new_position)` if `i` is at the start of a non-code region,
/// where `new_position` is the first byte after the region (clamped to the
/// input length when the region is unterminated).
/// Returns `None` if `i` is not at the start of a non-code region.
pub fn skip_non_code(bytes: &[u8], i: usize) -> Option<usize> {
    if i >= bytes.len() {
        return Some(bytes.len());
    }

    // Line comments run to the end of the chunk
    if bytes[i] == b'#' || starts_with(bytes, i, b"//") {
        let mut j = i + 1;
        while j < bytes.len() && bytes[j] != b'\n' {
            j += 1;
        }
        return Some(bytes.len().min(j + 1));
    }

    if starts_with(bytes, i, b"/*") {
        return Some(find(bytes, i + 2, b"*/").map_or(bytes.len(), |p| p + 2));
    }

    // Verbatim string: no escapes, `""` stands for a quote
    if starts_with(bytes, i, b"@\"") {
        return Some(verbatim_end(bytes, i + 2).unwrap_or(bytes.len()));
    }

    if bytes[i] == b'"' || bytes[i] == b'\'' {
        let quote = bytes[i];
        let mut j = i + 1;
        while j < bytes.len() && bytes[j] != quote {
            if bytes[j] == b'\\' {
                j += 1;
            }
            j += 1;
        }
        return Some(if j < bytes.len() { j + 1 } else { bytes.len() });
    }

    None
}

/// Positions of every code brace in `text`, in order.
pub fn braces(text: &str) -> Vec<(usize, Brace)> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if let Some(skip) = skip_non_code(bytes, i) {
            i = skip;
            continue;
        }
        match bytes[i] {
            b'{' => found.push((i, Brace::Open)),
            b'}' => found.push((i, Brace::Close)),
            _ => {}
        }
        i += 1;
    }

    found
}

/// Offset where code resumes in `text` when the line starts in `carry`, or
/// `None` when the carried region does not close on this line.
pub fn resume_at(text: &str, carry: Carry) -> Option<usize> {
    let bytes = text.as_bytes();
    match carry {
        Carry::Code => Some(0),
        Carry::BlockComment => find(bytes, 0, b"*/").map(|p| p + 2),
        Carry::VerbatimString => verbatim_end(bytes, 0),
    }
}

/// Region still open at the end of `text`, given the region open at its start.
pub fn carry_after(text: &str, carry: Carry) -> Carry {
    let bytes = text.as_bytes();
    let Some(mut i) = resume_at(text, carry) else {
        return carry;
    };

    while i < bytes.len() {
        if starts_with(bytes, i, b"/*") && find(bytes, i + 2, b"*/").is_none() {
            return Carry::BlockComment;
        }
        if starts_with(bytes, i, b"@\"") && verbatim_end(bytes, i + 2).is_none() {
            return Carry::VerbatimString;
        }
        if let Some(skip) = skip_non_code(bytes, i) {
            i = skip;
            continue;
        }
        i += 1;
    }

    Carry::Code
}

/// Whether `text` holds nothing but comments (at least one), given whether a
/// block comment was open at its start.
pub fn is_comment_only(text: &str, open_at_start: bool) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    let mut in_block = open_at_start;
    let mut saw_comment = open_at_start;

    loop {
        if in_block {
            match find(bytes, i, b"*/") {
                Some(p) => {
                    i = p + 2;
                    in_block = false;
                }
                None => return true,
            }
        }
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            return saw_comment;
        }
        if bytes[i] == b'#' || starts_with(bytes, i, b"//") {
            return true;
        }
        if starts_with(bytes, i, b"/*") {
            in_block = true;
            saw_comment = true;
            i += 2;
            continue;
        }
        return false;
    }
}

/// First byte after the quote closing a verbatim string whose body starts at
/// `from`. A doubled `""` is an escaped quote.
fn verbatim_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut j = from;
    while j < bytes.len() {
        if bytes[j] == b'"' {
            if bytes.get(j + 1) == Some(&b'"') {
                j += 2;
                continue;
            }
            return Some(j + 1);
        }
        j += 1;
    }
    None
}

fn starts_with(bytes: &[u8], i: usize, needle: &[u8]) -> bool {
    bytes[i..].starts_with(needle)
}

fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}
