//! Marker comments for `_`-prefixed symbols.
//!
//! Only one declaration per chunk is looked at, and a declaration whose name
//! sits on a later line than its keyword is missed. The `@internal` marker at
//! file scope is known not to hide every symbol it should; Doxygen sometimes
//! attaches it to the wrong entity.

use sqdox_lexer::{insert, patterns};
use sqdox_syntax::Marker;

use crate::scope::ScopeTracker;

/// Leading underscore marks a symbol as not part of the public API.
pub fn is_private(name: &str) -> bool {
    name.starts_with('_')
}

/// Marker that applies at the current position, if declarations here are
/// annotated at all: file scope gets `@internal`, the outermost level of a
/// class body gets `@private`, anything nested deeper gets nothing.
pub fn marker_for(scope: &ScopeTracker) -> Option<Marker> {
    if scope.depth() == 0 {
        Some(Marker::Internal)
    } else if scope.class_body_depth() == Some(scope.depth()) {
        Some(Marker::Private)
    } else {
        None
    }
}

/// Insert `marker` before a private variable and before the `enum` keyword
/// of a private enumeration.
pub fn annotate_declarations(text: &str, marker: Marker) -> String {
    let mut out = match patterns::variable(text) {
        Some(decl) if is_private(decl.name) => insert(text, decl.marker_at, marker.as_str()),
        _ => text.to_string(),
    };

    if let Some(at) = patterns::enumeration(&out)
        .filter(|decl| is_private(decl.name))
        .map(|decl| decl.marker_at)
    {
        out = insert(&out, at, marker.as_str());
    }

    out
}
