//! Shared vocabulary for the Squirrel-to-Doxygen filter.
//!
//! Holds the feature flags that select which rewrite stages run and the
//! marker comments the filter injects for non-public symbols:
//! - `FilterConfig`: immutable per-run configuration
//! - `Marker`: `@internal` / `@private` doc comments

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Doc comment injected in front of a symbol that follows the private-naming
/// convention (leading underscore).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    /// File-scope symbol: hidden from the public API but kept for internal docs.
    Internal,
    /// Outermost level of a class body.
    Private,
}

impl Marker {
    pub fn as_str(self) -> &'static str {
        match self {
            Marker::Internal => " /** @internal */ ",
            Marker::Private => " /** @private */ ",
        }
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feature flags controlling which filter stages are active.
///
/// Operator substitution and class-header detection always run; every later
/// stage has its own switch. Switching a stage off never reorders the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Keep the `function` keyword in front of declarations.
    pub keep_function_keyword: bool,
    /// Name constructors after their class.
    pub normalize_constructors: bool,
    /// Keep the `constructor` keyword and append the class name after it,
    /// instead of replacing the keyword with the class name.
    pub keep_constructor_name: bool,
    /// Register member functions per class (in-body and `Class::name` forms).
    pub track_class_functions: bool,
    /// Annotate `_`-prefixed symbols and never register them as out-of-body members.
    pub hide_private_symbols: bool,
    /// Track braces to find the end of each class body.
    pub check_end_of_class: bool,
    /// Insert `public:` right after the opening brace of a class body.
    pub public_section_marker: bool,
    /// Rewrite `require(` / `import(` into `#include `.
    pub normalize_includes: bool,
    /// Prefix parameters with types inferred from their names and defaults.
    pub infer_parameter_types: bool,
    /// Apply the `config.nut` / `constants.nut` special cases.
    pub file_kind_rewrites: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            keep_function_keyword: true,
            normalize_constructors: true,
            keep_constructor_name: true,
            track_class_functions: true,
            hide_private_symbols: true,
            check_end_of_class: true,
            public_section_marker: true,
            normalize_includes: true,
            infer_parameter_types: true,
            file_kind_rewrites: true,
        }
    }
}

/// Error raised when a configuration document cannot be read.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid filter configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

impl FilterConfig {
    /// Parse a TOML document. Missing keys keep their default value.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Whether brace tracking runs. Function tracking needs the class end,
    /// so it forces block bookkeeping on.
    pub fn tracks_blocks(&self) -> bool {
        self.check_end_of_class || self.track_class_functions
    }
}
