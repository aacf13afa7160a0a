//! Detection primitives. Each one looks at a single chunk and reports the
//! byte positions of what it found; rewriting is left to the caller.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::scan::{braces, Brace};

fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("invalid built-in pattern")
}

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| pattern(r"<-"));
static EXTENDS: LazyLock<Regex> = LazyLock::new(|| pattern(r"\bextends\b"));
static CLASS_HEADER: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^\s*class\s+([A-Za-z_][A-Za-z0-9_]*)"));
static FUNCTION_NAME: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\bfunction\s+([A-Za-z_][A-Za-z0-9_]*)"));
static QUALIFIED_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"\bfunction\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?:\.|::)\s*([A-Za-z_][A-Za-z0-9_]*)")
});
static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"^\s*(?:(?:local|static|const)\s+)?([A-Za-z_][A-Za-z0-9_]*)\s*=(?:[^=]|$)")
});
static ENUM: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^\s*(enum)\s+([A-Za-z_][A-Za-z0-9_]*)"));
static CONSTRUCTOR: LazyLock<Regex> = LazyLock::new(|| pattern(r"\bconstructor\b"));
static FUNCTION_KEYWORD: LazyLock<Regex> = LazyLock::new(|| pattern(r"\bfunction\s+"));
static REQUIRE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\brequire\s*\("));
static IMPORT: LazyLock<Regex> = LazyLock::new(|| pattern(r"\bimport\s*\("));
static PARAMETER_LIST: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\b(?:function|constructor)\b[^(]*\(([^)]+)\)"));
static OPEN_PARAMETER_LIST: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"\b(?:function|constructor)\b[^(]*\(([^)]*)$"));
static CONTINUED_PARAMETER_LIST: LazyLock<Regex> = LazyLock::new(|| pattern(r"^\s*([^)]*)"));

/// A `class Name` header at the start of a chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHeader<'a> {
    pub name: &'a str,
    /// Byte offset just after the class name.
    pub end: usize,
}

/// A `function name` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionName<'a> {
    /// Offset of the `function` keyword.
    pub keyword_start: usize,
    pub name: &'a str,
}

/// A `function Class.name` or `function Class::name` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedFunction<'a> {
    pub keyword_start: usize,
    pub class: &'a str,
    pub name: &'a str,
    /// Offset just after the member name.
    pub end: usize,
}

/// A declaration whose name may need a visibility marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration<'a> {
    pub name: &'a str,
    /// Where a marker belongs: the identifier for variables, the `enum`
    /// keyword for enumerations.
    pub marker_at: usize,
}

/// First `<-` slot operator.
pub fn assignment(text: &str) -> Option<Range<usize>> {
    ASSIGNMENT.find(text).map(|m| m.range())
}

/// First `extends` keyword.
pub fn inheritance(text: &str) -> Option<Range<usize>> {
    EXTENDS.find(text).map(|m| m.range())
}

pub fn class_header(text: &str) -> Option<ClassHeader<'_>> {
    let caps = CLASS_HEADER.captures(text)?;
    let name = caps.get(1)?;
    Some(ClassHeader {
        name: name.as_str(),
        end: name.end(),
    })
}

/// Offset of the first code `{` at or after `from`.
pub fn block_start(text: &str, from: usize) -> Option<usize> {
    braces(text)
        .into_iter()
        .find(|&(pos, brace)| pos >= from && brace == Brace::Open)
        .map(|(pos, _)| pos)
}

pub fn function_name(text: &str) -> Option<FunctionName<'_>> {
    let caps = FUNCTION_NAME.captures(text)?;
    Some(FunctionName {
        keyword_start: caps.get(0)?.start(),
        name: caps.get(1)?.as_str(),
    })
}

pub fn qualified_function(text: &str) -> Option<QualifiedFunction<'_>> {
    let caps = QUALIFIED_FUNCTION.captures(text)?;
    let name = caps.get(2)?;
    Some(QualifiedFunction {
        keyword_start: caps.get(0)?.start(),
        class: caps.get(1)?.as_str(),
        name: name.as_str(),
        end: name.end(),
    })
}

/// `[local|static|const] name =` at the start of a chunk. `==` is not a declaration.
pub fn variable(text: &str) -> Option<Declaration<'_>> {
    let name = VARIABLE.captures(text)?.get(1)?;
    Some(Declaration {
        name: name.as_str(),
        marker_at: name.start(),
    })
}

/// `enum Name` at the start of a chunk.
pub fn enumeration(text: &str) -> Option<Declaration<'_>> {
    let caps = ENUM.captures(text)?;
    Some(Declaration {
        name: caps.get(2)?.as_str(),
        marker_at: caps.get(1)?.start(),
    })
}

pub fn constructor(text: &str) -> Option<Range<usize>> {
    CONSTRUCTOR.find(text).map(|m| m.range())
}

/// The `function` keyword together with the blanks that follow it.
/// Anonymous `function(` is not matched.
pub fn function_keyword(text: &str) -> Option<Range<usize>> {
    FUNCTION_KEYWORD.find(text).map(|m| m.range())
}

/// `require(`, opening parenthesis included.
pub fn require(text: &str) -> Option<Range<usize>> {
    REQUIRE.find(text).map(|m| m.range())
}

/// `import(`, opening parenthesis included.
pub fn import(text: &str) -> Option<Range<usize>> {
    IMPORT.find(text).map(|m| m.range())
}

/// Span between the parentheses of a one-line, non-empty function or
/// constructor signature.
pub fn parameter_list(text: &str) -> Option<Range<usize>> {
    PARAMETER_LIST.captures(text)?.get(1).map(|m| m.range())
}

/// Span from the `(` of a signature whose parameter list is not closed on
/// this chunk, to the end of the chunk.
pub fn open_parameter_list(text: &str) -> Option<Range<usize>> {
    OPEN_PARAMETER_LIST.captures(text)?.get(1).map(|m| m.range())
}

/// Span from the first non-blank byte of a continuation chunk up to its
/// first `)` or the end of the chunk.
pub fn continued_parameter_list(text: &str) -> Option<Range<usize>> {
    CONTINUED_PARAMETER_LIST.captures(text)?.get(1).map(|m| m.range())
}

/// Whether a pending parameter list closes in this chunk.
pub fn closes_parameter_list(text: &str) -> bool {
    text.contains(')')
}
