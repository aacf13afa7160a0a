//! The per-chunk rewrite pipeline.
//!
//! Stage order is fixed; later stages rely on the rewrites of earlier ones
//! (constructor normalization needs the registered class, parameter
//! inference needs the `function` keyword still in place):
//!
//! 1. `<-` → `=`, `extends` → `:`
//! 2. class header registration
//! 3. class body open, `public:` after the brace
//! 4. member function detection
//! 5. visibility markers
//! 6. constructor naming
//! 7. `function` keyword elision
//! 8. `require(` / `import(` → `#include `
//! 9. brace bookkeeping, `;` after the class body
//! 10. parameter types
//! 11. `config.nut` / `constants.nut` rewrites

use sqdox_lexer::{insert, patterns, splice};
use sqdox_syntax::{FilterConfig, Marker};
use tracing::debug;

use crate::error::FilterResult;
use crate::file_kind::FileKind;
use crate::params;
use crate::registry::ClassRegistry;
use crate::scope::ScopeTracker;
use crate::visibility::{self, is_private};

/// Keyword inserted at the opening brace of every class body.
pub const PUBLIC_SECTION: &str = "public:";

/// Filter state for one file. Feed it chunks in source order, then `finish`.
#[derive(Debug)]
pub struct Filter {
    config: FilterConfig,
    file_kind: Option<FileKind>,
    scope: ScopeTracker,
    registry: ClassRegistry,
    /// An out-of-body member's parameter list is still open.
    awaiting_params: bool,
    output: String,
}

/// What the function-detection stage found that later stages care about.
#[derive(Debug, Default, Clone, Copy)]
struct Detected {
    /// A new out-of-body member opened a parameter list it did not close.
    opened_params: bool,
}

impl Filter {
    pub fn new(file_name: &str, config: FilterConfig) -> Self {
        Self {
            config,
            file_kind: FileKind::from_file_name(file_name),
            scope: ScopeTracker::new(),
            registry: ClassRegistry::new(),
            awaiting_params: false,
            output: String::new(),
        }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn scope(&self) -> &ScopeTracker {
        &self.scope
    }

    pub fn awaiting_params(&self) -> bool {
        self.awaiting_params
    }

    /// Output accumulated so far.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Append text that must not be rewritten (comments, line endings).
    pub fn pass_through(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// Run one code chunk through every stage and append the result.
    pub fn filter_chunk(&mut self, chunk: &str) -> FilterResult<()> {
        let continuing_params = self.awaiting_params;

        let mut text = substitute_operators(chunk);
        let header_end = self.detect_class_header(&text);
        text = self.open_class_body(text, header_end);

        let mut detected = Detected::default();
        if self.config.track_class_functions {
            (text, detected) = self.detect_functions(text)?;
        }
        if self.config.hide_private_symbols {
            text = self.annotate_visibility(text);
        }
        if self.config.normalize_constructors {
            text = self.normalize_constructor(text);
        }
        if !self.config.keep_function_keyword {
            text = elide_function_keyword(text);
        }
        if self.config.normalize_includes {
            text = normalize_includes(text);
        }
        if self.config.tracks_blocks() {
            text = self.scope.consume(&text);
        }
        if self.config.infer_parameter_types {
            text = infer_parameters(text, continuing_params, detected.opened_params);
        }
        if self.config.file_kind_rewrites {
            if let Some(kind) = self.file_kind {
                text = kind.rewrite(&text);
            }
        }

        self.output.push_str(&text);
        Ok(())
    }

    /// Flush the output buffer.
    pub fn finish(self) -> String {
        self.output
    }

    /// Returns the offset just after the class name, or 0 when the chunk has
    /// no class header.
    fn detect_class_header(&mut self, text: &str) -> usize {
        let Some(header) = patterns::class_header(text) else {
            return 0;
        };
        self.registry.register_class(header.name);
        self.scope.on_class_header_seen();
        header.end
    }

    fn open_class_body(&mut self, text: String, from: usize) -> String {
        if !self.scope.awaiting_class_body() {
            return text;
        }
        let Some(brace) = patterns::block_start(&text, from) else {
            return text;
        };
        self.scope.on_class_body_open();
        if self.config.public_section_marker {
            insert(&text, brace + 1, PUBLIC_SECTION)
        } else {
            text
        }
    }

    /// Inside a class body, `function name` registers an in-body member.
    /// At file scope, `function Class::name` registers an out-of-body member.
    fn detect_functions(&mut self, text: String) -> FilterResult<(String, Detected)> {
        let mut detected = Detected::default();

        if self.awaiting_params && patterns::closes_parameter_list(&text) {
            self.awaiting_params = false;
        }

        if self.scope.in_class() {
            let Some(function) = patterns::function_name(&text) else {
                return Ok((text, detected));
            };
            self.registry.record_member_inside(function.name);
            if self.config.hide_private_symbols && is_private(function.name) {
                let at = function.keyword_start;
                return Ok((insert(&text, at, Marker::Private.as_str()), detected));
            }
        } else if self.scope.depth() == 0 {
            let Some(function) = patterns::qualified_function(&text) else {
                return Ok((text, detected));
            };
            if self.config.hide_private_symbols && is_private(function.name) {
                self.registry.activate(function.class)?;
                debug!(class = function.class, function = function.name, "private member not registered");
            } else if self.registry.record_member_outside(function.class, function.name)? {
                self.awaiting_params = !patterns::closes_parameter_list(&text[function.end..]);
                detected.opened_params = self.awaiting_params;
            }
        }

        Ok((text, detected))
    }

    fn annotate_visibility(&self, text: String) -> String {
        match visibility::marker_for(&self.scope) {
            Some(marker) => visibility::annotate_declarations(&text, marker),
            None => text,
        }
    }

    fn normalize_constructor(&self, text: String) -> String {
        let Some(keyword) = patterns::constructor(&text) else {
            return text;
        };
        let Some(class) = self.registry.latest().map(|c| c.name()) else {
            debug!("constructor outside any class");
            return text;
        };
        if self.config.keep_constructor_name {
            insert(&text, keyword.end, &format!(" {class}"))
        } else {
            splice(&text, keyword, class)
        }
    }
}

fn substitute_operators(chunk: &str) -> String {
    let mut text = match patterns::assignment(chunk) {
        Some(range) => splice(chunk, range, "="),
        None => chunk.to_string(),
    };
    if let Some(range) = patterns::inheritance(&text) {
        text = splice(&text, range, ":");
    }
    text
}

fn elide_function_keyword(text: String) -> String {
    match patterns::function_keyword(&text) {
        Some(range) => splice(&text, range, ""),
        None => text,
    }
}

/// The closing `)` is left in place; Doxygen ignores it.
fn normalize_includes(mut text: String) -> String {
    if let Some(range) = patterns::require(&text) {
        text = splice(&text, range, "#include ");
    }
    if let Some(range) = patterns::import(&text) {
        text = splice(&text, range, "#include ");
    }
    text
}

/// Type the parameter list of a one-line signature, or the part of a
/// multi-line out-of-body signature that this chunk holds.
fn infer_parameters(text: String, continuing: bool, opened: bool) -> String {
    let span = patterns::parameter_list(&text)
        .or_else(|| opened.then(|| patterns::open_parameter_list(&text)).flatten())
        .or_else(|| continuing.then(|| patterns::continued_parameter_list(&text)).flatten());

    match span {
        Some(span) if !text[span.clone()].trim().is_empty() => params::rewrite_span(&text, span),
        _ => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(file_name: &str, config: FilterConfig, lines: &[&str]) -> (Vec<String>, Filter) {
        let mut filter = Filter::new(file_name, config);
        let mut out = Vec::new();
        for line in lines {
            let before = filter.output().len();
            filter.filter_chunk(line).unwrap();
            out.push(filter.output()[before..].to_string());
        }
        (out, filter)
    }

    fn run_default(lines: &[&str]) -> (Vec<String>, Filter) {
        run("main.nut", FilterConfig::default(), lines)
    }

    #[test]
    fn one_line_class_with_private_member() {
        let (out, filter) = run_default(&["class Foo extends Bar { function _secret(x) {} }"]);
        assert_eq!(
            out[0],
            "class Foo : Bar {public:  /** @private */ function _secret(x) {} };"
        );
        let foo = filter.registry().get(filter.registry().lookup("Foo").unwrap());
        assert_eq!(foo.members_inside(), ["_secret"]);
        assert!(!filter.scope().in_class());
    }

    #[test]
    fn qualified_member_gets_typed_parameters() {
        let (out, filter) = run_default(&[
            "class Foo {",
            "}",
            "function Foo.bar(companyID, count=5) {}",
        ]);
        assert_eq!(out[0], "class Foo {public:");
        assert_eq!(out[1], "};");
        assert_eq!(out[2], "function Foo.bar(int companyID, int count=5) {}");
        let foo = filter.registry().get(filter.registry().lookup("Foo").unwrap());
        assert_eq!(foo.members_outside(), ["bar"]);
        assert!(!filter.awaiting_params());
    }

    #[test]
    fn unknown_class_propagates() {
        let mut filter = Filter::new("main.nut", FilterConfig::default());
        let err = filter.filter_chunk("function Ghost::run() {}").unwrap_err();
        assert!(err.to_string().contains("Ghost"), "{err}");
    }

    #[test]
    fn plain_assignment_is_left_alone() {
        let (out, _) = run_default(&["local x = 5;"]);
        assert_eq!(out[0], "local x = 5;");
    }

    #[test]
    fn slot_assignment_is_translated() {
        let (out, _) = run_default(&["local _x <- 5;"]);
        assert_eq!(out[0], "local  /** @internal */ _x = 5;");
    }

    #[test]
    fn unrecognised_text_is_unchanged() {
        let lines = [
            "x = y + 1;",
            "print(\"hello\");",
            "",
            "    while (i < 10) i++;",
        ];
        let (out, _) = run_default(&lines);
        assert_eq!(out, lines);
    }

    #[test]
    fn private_member_is_never_registered_outside() {
        let (_, filter) = run_default(&[
            "class Foo {",
            "  function _hidden() {}",
            "}",
            "function Foo::_hidden() {}",
            "function Foo::_other() {}",
        ]);
        let foo = filter.registry().get(filter.registry().lookup("Foo").unwrap());
        assert_eq!(foo.members_inside(), ["_hidden"]);
        assert!(foo.members_outside().is_empty());
    }

    #[test]
    fn private_member_registered_when_not_hiding() {
        let config = FilterConfig {
            hide_private_symbols: false,
            ..FilterConfig::default()
        };
        let (out, filter) = run("main.nut", config, &["class Foo {", "}", "function Foo::_other() {}"]);
        let foo = filter.registry().get(filter.registry().lookup("Foo").unwrap());
        assert_eq!(foo.members_outside(), ["_other"]);
        assert_eq!(out[2], "function Foo::_other() {}");
    }

    #[test]
    fn class_members_get_private_marker() {
        let (out, _) = run_default(&["class Foo", "{", "  _count = 0;", "  name = null;", "}"]);
        assert_eq!(out[1], "{public:");
        assert_eq!(out[2], "   /** @private */ _count = 0;");
        assert_eq!(out[3], "  name = null;");
        assert_eq!(out[4], "};");
    }

    #[test]
    fn nested_declarations_are_not_annotated() {
        let (out, _) = run_default(&["function f() {", "  local _tmp = 1;", "}"]);
        assert_eq!(out[1], "  local _tmp = 1;");
    }

    #[test]
    fn constructor_keeps_keyword_and_gains_class_name() {
        let (out, _) = run_default(&["class Foo {", "  constructor(companyID) {", "  }", "}"]);
        assert_eq!(out[1], "  constructor Foo(int companyID) {");
    }

    #[test]
    fn constructor_replaced_by_class_name() {
        let config = FilterConfig {
            keep_constructor_name: false,
            ..FilterConfig::default()
        };
        let (out, _) = run("main.nut", config, &["class Foo {", "  constructor(companyID) {"]);
        // Without a `constructor`/`function` keyword no parameter list is typed
        assert_eq!(out[1], "  Foo(companyID) {");
    }

    #[test]
    fn constructor_named_after_latest_header() {
        let (out, _) = run_default(&[
            "class Foo {}",
            "class Bar {}",
            "function Foo::make() {",
            "  constructor(companyID)",
        ]);
        assert_eq!(out[3], "  constructor Bar(int companyID)");
    }

    #[test]
    fn constructor_untouched_when_disabled() {
        let config = FilterConfig {
            normalize_constructors: false,
            ..FilterConfig::default()
        };
        let (out, filter) = run("main.nut", config, &["class Foo {", "  constructor() {}"]);
        assert!(filter.config().keep_constructor_name);
        assert_eq!(out[1], "  constructor() {}");
    }

    #[test]
    fn function_keyword_elided_when_configured() {
        let config = FilterConfig {
            keep_function_keyword: false,
            ..FilterConfig::default()
        };
        let (out, filter) = run("main.nut", config, &["class Foo {", "  function run(count=1) {"]);
        assert_eq!(out[1], "  run(count=1) {");
        let foo = filter.registry().get(filter.registry().lookup("Foo").unwrap());
        assert_eq!(foo.members_inside(), ["run"]);
    }

    #[test]
    fn includes_are_normalized() {
        let (out, _) = run_default(&["require(\"util.nut\");", "import(\"queue\", \"Queue\", 2);"]);
        assert_eq!(out[0], "#include \"util.nut\");");
        assert_eq!(out[1], "#include \"queue\", \"Queue\", 2);");
    }

    #[test]
    fn multi_line_signature_is_typed() {
        let (out, filter) = run_default(&[
            "class Log {}",
            "function Log::Write(logLevel,",
            "                    message = \"\",",
            "                    tbl) {",
            "}",
        ]);
        assert_eq!(out[0], "class Log {public:};");
        assert_eq!(out[1], "function Log::Write(int logLevel,");
        assert_eq!(out[2], "                    string message = \"\",");
        assert_eq!(out[3], "                    StructScriptSavedData tbl) {");
        assert!(!filter.awaiting_params());
    }

    #[test]
    fn constants_file_dispatch() {
        let (out, _) = run_default(&["ScriptMinVersionToLoad <- 3;"]);
        assert_eq!(out[0], "ScriptMinVersionToLoad = 3;");

        let (out, _) = run(
            "ai/constants.nut",
            FilterConfig::default(),
            &["ScriptMinVersionToLoad <- 3;"],
        );
        assert_eq!(out[0], "int ScriptMinVersionToLoad = 3;");
    }

    #[test]
    fn disabled_stages_keep_order_of_others() {
        let config = FilterConfig {
            public_section_marker: false,
            hide_private_symbols: false,
            infer_parameter_types: false,
            ..FilterConfig::default()
        };
        let (out, _) = run("main.nut", config, &["class Foo { function _x(companyID) {} }"]);
        assert_eq!(out[0], "class Foo { function _x(companyID) {} };");
    }

    #[test]
    fn without_block_tracking_class_never_ends() {
        let config = FilterConfig {
            track_class_functions: false,
            check_end_of_class: false,
            ..FilterConfig::default()
        };
        let (out, filter) = run("main.nut", config, &["class Foo {", "}"]);
        assert_eq!(out[1], "}");
        assert!(filter.scope().in_class());
        assert_eq!(filter.scope().depth(), 0);
    }
}
