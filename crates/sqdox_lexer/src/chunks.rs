//! Splits a source file into the line chunks the filter consumes.
//!
//! Lines holding nothing but comments are flagged so the driver can pass
//! them through untouched; doc comments must reach Doxygen verbatim. The
//! same goes for the lines of a multi-line verbatim string, and for the head
//! of a line that closes a comment or string opened earlier.

use crate::scan::{carry_after, is_comment_only, resume_at, Carry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Code,
    Comment,
    /// The whole line lies inside a verbatim string.
    Literal,
}

/// One line of source, split from its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// 1-based line number.
    pub line: usize,
    /// Tail of a comment or verbatim string carried over from earlier lines.
    pub lead: &'a str,
    pub body: &'a str,
    /// `"\n"`, `"\r\n"`, or empty on an unterminated last line.
    pub ending: &'a str,
    pub kind: ChunkKind,
}

/// Iterator over the line chunks of a source.
pub struct Chunks<'a> {
    lines: std::str::SplitInclusive<'a, char>,
    line: usize,
    carry: Carry,
}

pub fn chunks(source: &str) -> Chunks<'_> {
    Chunks {
        lines: source.split_inclusive('\n'),
        line: 0,
        carry: Carry::Code,
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        let raw = self.lines.next()?;
        self.line += 1;

        let ending_len = if raw.ends_with("\r\n") {
            2
        } else if raw.ends_with('\n') {
            1
        } else {
            0
        };
        let (text, ending) = raw.split_at(raw.len() - ending_len);

        let carry = self.carry;
        self.carry = carry_after(text, carry);

        let (lead, body, kind) = if carry == Carry::BlockComment && is_comment_only(text, true) {
            ("", text, ChunkKind::Comment)
        } else {
            match resume_at(text, carry) {
                Some(at) => {
                    let (lead, body) = text.split_at(at);
                    let kind = if is_comment_only(body, false) {
                        ChunkKind::Comment
                    } else {
                        ChunkKind::Code
                    };
                    (lead, body, kind)
                }
                None => ("", text, ChunkKind::Literal),
            }
        };

        Some(Chunk {
            line: self.line,
            lead,
            body,
            ending,
            kind,
        })
    }
}
