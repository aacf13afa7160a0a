//! Brace depth and class-body boundaries across chunks.
//!
//! Input is never validated: an unbalanced brace shifts every later
//! decision that depends on depth, and nothing reports it.

use sqdox_lexer::{braces, Brace};
use tracing::debug;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScopeTracker {
    depth: usize,
    awaiting_class_body: bool,
    /// Depth at which the current class body was opened; the class ends when
    /// a `}` brings the depth back here.
    class_depth: Option<usize>,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// A class header was seen and its opening brace has not been found yet.
    pub fn awaiting_class_body(&self) -> bool {
        self.awaiting_class_body
    }

    /// Inside a class body, waiting for its closing brace.
    pub fn in_class(&self) -> bool {
        self.class_depth.is_some()
    }

    /// Depth of the outermost level inside the current class body.
    pub fn class_body_depth(&self) -> Option<usize> {
        self.class_depth.map(|d| d + 1)
    }

    pub fn on_class_header_seen(&mut self) {
        self.awaiting_class_body = true;
    }

    /// The caller is expected to insert the visibility-section marker right
    /// after the opening brace.
    pub fn on_class_body_open(&mut self) {
        self.awaiting_class_body = false;
        self.class_depth = Some(self.depth);
    }

    /// Advance the depth over every code brace in `chunk`. The brace that
    /// closes the current class gets a `;` appended.
    pub fn consume(&mut self, chunk: &str) -> String {
        let mut out = String::with_capacity(chunk.len() + 1);
        let mut copied = 0;

        for (pos, brace) in braces(chunk) {
            match brace {
                Brace::Open => self.depth += 1,
                Brace::Close => {
                    if self.depth == 0 {
                        debug!("closing brace at depth 0");
                    } else {
                        self.depth -= 1;
                    }
                    if self.class_depth == Some(self.depth) {
                        out.push_str(&chunk[copied..=pos]);
                        out.push(';');
                        copied = pos + 1;
                        self.class_depth = None;
                        debug!(depth = self.depth, "class body closed");
                    }
                }
            }
        }

        out.push_str(&chunk[copied..]);
        out
    }
}
