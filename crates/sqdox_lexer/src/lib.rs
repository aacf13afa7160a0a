//! Chunk-level primitives for Squirrel source.
//!
//! Nothing here keeps state between chunks except the chunker's carry: the
//! block comment or verbatim string a line starts in. The primitives report positions; the filter decides what to rewrite:
//!
//! - `chunks`: split a source into line chunks, flagging comment-only lines
//!   and lines inside multi-line verbatim strings
//! - `patterns`: class headers, function names, declarations, keywords,
//!   parameter-list spans
//! - `scan`: brace positions outside strings and comments

pub mod chunks;
pub mod patterns;
pub mod scan;

use std::ops::Range;

pub use chunks::{chunks, Chunk, ChunkKind, Chunks};
pub use scan::{braces, Brace};

/// Replace `range` of `text` with `replacement`.
pub fn splice(text: &str, range: Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..range.start]);
    out.push_str(replacement);
    out.push_str(&text[range.end..]);
    out
}

/// Insert `insertion` at byte offset `at`.
pub fn insert(text: &str, at: usize, insertion: &str) -> String {
    splice(text, at..at, insertion)
}
