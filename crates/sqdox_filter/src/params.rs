//! Parameter type inference from naming conventions and default values.
//!
//! Squirrel parameters carry no types. Doxygen renders signatures far better
//! with them, so each parameter is prefixed with a type guessed from, in
//! order: a table of known name prefixes, a primitive-type prefix baked into
//! the name (`boolVisible`), and finally the default value. The first rule
//! that matches wins; a parameter no rule recognises is left as it is.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use sqdox_lexer::splice;

/// Name prefixes with a known type, checked in order.
const PREFIX_RULES: &[(&[&str], &str)] = &[
    (&["companyID"], "int"),
    (&["storyPageID"], "int"),
    (&["element"], "GSText"),
    (&["pageDate", "date"], "GSDate"),
    (&["event"], "GSEventStoryPageButtonClick"),
    (&["vehicleSummary"], "StructSummaryVehicleStats"),
    (&["buttonReference"], "StoryPageButtonFormatting"),
    (&["allVehicleStats"], "array< StructVehicleTypeStatsItem, 4>"),
    (&["vehicleType"], "int"),
    (&["tbl"], "StructScriptSavedData"),
    (&["tableToLog"], "SQTable"),
    (
        &[
            "balanceChange",
            "lastYearBalance",
            "secondToLastYearBalance",
            "idleBalance",
            "totalAmount",
        ],
        "int",
    ),
    (
        &[
            "logLevel",
            "version",
            "fromVersion",
            "toVersion",
            "buttonId",
            "lastActiveTime",
            "forceTimeUnit",
            "inactiveSeconds",
            "totalSeconds",
            "ratio",
        ],
        "int",
    ),
    (
        &[
            "memberKey",
            "memberValue",
            "customText",
            "message",
            "tableIdentifier",
            "prependText",
        ],
        "string",
    ),
];

static TYPED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(bool|int|float|string)[A-Za-z0-9_]+$").expect("invalid pattern"));
static BOOL_DEFAULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=\s*(?:true|false)$").expect("invalid pattern"));
static INT_DEFAULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=\s*\d+$").expect("invalid pattern"));
static STRING_DEFAULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"=\s*"[^"]+"$"#).expect("invalid pattern"));

/// Split a parameter list on every comma.
///
/// Commas nested inside a default value such as `f(a, b)` split too; this is
/// not parenthesis-aware and keeps one fragment per comma-separated piece.
pub fn split_parameters(list: &str) -> Vec<&str> {
    list.split(',').collect()
}

/// Type guessed for a trimmed parameter fragment, if any rule applies.
pub fn infer_type(fragment: &str) -> Option<&'static str> {
    if let Some((_, ty)) = PREFIX_RULES
        .iter()
        .find(|(prefixes, _)| prefixes.iter().any(|p| fragment.starts_with(p)))
    {
        return Some(*ty);
    }

    if let Some(caps) = TYPED_NAME.captures(fragment) {
        return match caps.get(1).map(|m| m.as_str()) {
            Some("bool") => Some("bool"),
            Some("int") => Some("int"),
            Some("float") => Some("float"),
            Some("string") => Some("string"),
            _ => None,
        };
    }

    if BOOL_DEFAULT.is_match(fragment) {
        Some("bool")
    } else if INT_DEFAULT.is_match(fragment) {
        Some("int")
    } else if STRING_DEFAULT.is_match(fragment) {
        Some("string")
    } else {
        None
    }
}

/// Trim a fragment and prefix it with its inferred type.
pub fn annotate_parameter(fragment: &str) -> String {
    let fragment = fragment.trim();
    match infer_type(fragment) {
        Some(ty) => format!("{ty} {fragment}"),
        None => fragment.to_string(),
    }
}

/// Annotate every parameter of a list and rejoin them with `", "`.
///
/// A list cut off after a comma (the open tail of a multi-line signature)
/// ends with the comma, not with a dangling blank.
pub fn annotate_list(list: &str) -> String {
    let fragments = split_parameters(list);
    let open_tail = fragments.last().is_some_and(|f| f.trim().is_empty());
    let joined = fragments
        .into_iter()
        .map(annotate_parameter)
        .collect::<Vec<_>>()
        .join(", ");
    if open_tail {
        joined.trim_end().to_string()
    } else {
        joined
    }
}

/// Annotate the parameter list occupying `span` of `text`.
pub fn rewrite_span(text: &str, span: Range<usize>) -> String {
    let annotated = annotate_list(&text[span.clone()]);
    splice(text, span, &annotated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_table() {
        assert_eq!(infer_type("companyID"), Some("int"));
        assert_eq!(infer_type("elementTitle"), Some("GSText"));
        assert_eq!(infer_type("dateFrom"), Some("GSDate"));
        assert_eq!(infer_type("tblSaved"), Some("StructScriptSavedData"));
        assert_eq!(
            infer_type("allVehicleStats"),
            Some("array< StructVehicleTypeStatsItem, 4>")
        );
        assert_eq!(infer_type("message = \"hi\""), Some("string"));
        assert_eq!(infer_type("ratio"), Some("int"));
    }

    #[test]
    fn table_wins_over_default_value() {
        assert_eq!(infer_type("logLevel = \"x\""), Some("int"));
    }

    #[test]
    fn primitive_prefixed_names() {
        assert_eq!(infer_type("boolVisible"), Some("bool"));
        assert_eq!(infer_type("intCount"), Some("int"));
        assert_eq!(infer_type("floatScale"), Some("float"));
        assert_eq!(infer_type("stringName"), Some("string"));
        // The bare word is not a convention
        assert_eq!(infer_type("bool"), None);
        // Naming rule needs the whole fragment to be an identifier
        assert_eq!(infer_type("intCount = 3.5"), None);
    }

    #[test]
    fn default_values() {
        assert_eq!(infer_type("enabled = true"), Some("bool"));
        assert_eq!(infer_type("enabled=false"), Some("bool"));
        assert_eq!(infer_type("count=5"), Some("int"));
        assert_eq!(infer_type("name = \"abc\""), Some("string"));
        assert_eq!(infer_type("scale = 1.5"), None);
        assert_eq!(infer_type("name = \"\""), None);
        assert_eq!(infer_type("x"), None);
    }

    #[test]
    fn list_preserves_count_and_order() {
        let list = "companyID,  x, count=5 ,flag = true";
        let annotated = annotate_list(list);
        assert_eq!(annotated, "int companyID, x, int count=5, bool flag = true");
        assert_eq!(
            split_parameters(&annotated).len(),
            split_parameters(list).len()
        );
    }

    #[test]
    fn nested_parentheses_split_naively() {
        let fragments = split_parameters("a = max(1, 2), b");
        assert_eq!(fragments, vec!["a = max(1", " 2)", " b"]);
    }

    #[test]
    fn empty_fragments_are_kept() {
        assert_eq!(annotate_list("a,,b"), "a, , b");
    }

    #[test]
    fn open_tail_ends_at_comma() {
        assert_eq!(annotate_list("companyID,"), "int companyID,");
        assert_eq!(annotate_list("x, logLevel,  "), "x, int logLevel,");
    }

    #[test]
    fn rewrite_in_place() {
        let text = "function Foo::bar(companyID, count=5) {}";
        let out = rewrite_span(text, 18..36);
        assert_eq!(out, "function Foo::bar(int companyID, int count=5) {}");
    }
}
