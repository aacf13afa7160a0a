//! Special cases for the two files holding a script's global declarations.

use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_CONFIG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^::(ScriptConfig.+)$").expect("invalid pattern"));

/// Global constants with a fixed type, whatever their declared value.
const TYPED_CONSTANTS: &[(&str, &str)] = &[
    ("ScriptMinVersionToLoad", "int"),
    ("ScriptLastUpdateDate", "string"),
    ("SecondsPerGameDay", "float"),
    ("TicksPerGameDay", "int"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// `config.nut`: holds the `::ScriptConfig` table.
    Config,
    /// `constants.nut`: holds versioning and timing globals.
    Constants,
}

impl FileKind {
    /// Dispatch on the file name suffix.
    pub fn from_file_name(name: &str) -> Option<Self> {
        if name.ends_with("constants.nut") {
            Some(FileKind::Constants)
        } else if name.ends_with("config.nut") {
            Some(FileKind::Config)
        } else {
            None
        }
    }

    pub fn rewrite(self, chunk: &str) -> String {
        match self {
            FileKind::Config => rewrite_config(chunk),
            FileKind::Constants => rewrite_constants(chunk),
        }
    }
}

/// `::ScriptConfig = …` becomes a declaration of the config struct type.
fn rewrite_config(chunk: &str) -> String {
    match SCRIPT_CONFIG.captures(chunk).and_then(|caps| caps.get(1)) {
        Some(rest) => format!(" StructGameScriptConfig {}", rest.as_str()),
        None => chunk.to_string(),
    }
}

fn rewrite_constants(chunk: &str) -> String {
    let mut out = chunk.to_string();
    for (name, ty) in TYPED_CONSTANTS {
        if out.starts_with(name) {
            out = format!("{ty} {out}");
        }
    }
    out
}
