//! Error types for the filter.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    /// A `function Class::name` definition names a class that no `class`
    /// header declared earlier in the file.
    #[error("member function refers to undeclared class '{class}'")]
    UnknownClass { class: String },

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<FilterError>,
    },

    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl FilterError {
    /// Attach the 1-based source line the error was raised on.
    pub fn at_line(self, line: usize) -> Self {
        FilterError::AtLine {
            line,
            source: Box::new(self),
        }
    }
}

pub type FilterResult<T> = Result<T, FilterError>;
