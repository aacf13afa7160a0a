//! Rewrites Squirrel (`.nut`) scripts into pseudo C++ that Doxygen can read.
//!
//! The filter is a stateful, line-by-line text rewriter, not a parser. It
//! tracks brace depth and class bodies across lines, records the member
//! functions of every class, and applies a fixed sequence of heuristic
//! substitutions:
//!
//! - `<-` → `=`, `extends` → `:`
//! - `public:` at the start of each class body, `;` after its end
//! - `@private` / `@internal` markers before `_`-prefixed symbols
//! - `constructor` named after its class
//! - parameter types guessed from names and default values
//! - `require(` / `import(` → `#include `
//! - fixed declarations in `config.nut` and `constants.nut`

pub mod error;
pub mod file_kind;
pub mod params;
pub mod pipeline;
pub mod registry;
pub mod scope;
pub mod visibility;

use std::path::Path;

use sqdox_lexer::{chunks, ChunkKind};
use sqdox_syntax::FilterConfig;

pub use error::{FilterError, FilterResult};
pub use file_kind::FileKind;
pub use pipeline::Filter;
pub use registry::{ClassId, ClassRecord, ClassRegistry};
pub use scope::ScopeTracker;

/// Filter a whole source. `file_name` selects the `config.nut` /
/// `constants.nut` special cases by suffix.
///
/// Comment-only lines, the lines of multi-line verbatim strings and line
/// endings are copied verbatim; every other line goes through the pipeline.
pub fn filter_source(source: &str, file_name: &str, config: &FilterConfig) -> FilterResult<String> {
    let mut filter = Filter::new(file_name, config.clone());

    for chunk in chunks(source) {
        filter.pass_through(chunk.lead);
        match chunk.kind {
            ChunkKind::Comment | ChunkKind::Literal => filter.pass_through(chunk.body),
            ChunkKind::Code => filter
                .filter_chunk(chunk.body)
                .map_err(|e| e.at_line(chunk.line))?,
        }
        filter.pass_through(chunk.ending);
    }

    Ok(filter.finish())
}

/// Read and filter the file at `path`.
pub fn filter_file(path: &Path, config: &FilterConfig) -> FilterResult<String> {
    let source = std::fs::read_to_string(path).map_err(|source| FilterError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    filter_source(&source, &path.to_string_lossy(), config)
}
