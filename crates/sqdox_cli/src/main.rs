use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use sqdox_syntax::FilterConfig;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive (e.g. `debug`).
const LOG_ENV: &str = "SQDOX_LOG";
/// Environment variable naming a TOML file with filter flags.
const CONFIG_ENV: &str = "SQDOX_CONFIG";

#[derive(Parser)]
#[command(
    name = "sqdox",
    version,
    about = "Filter a Squirrel (.nut) script into Doxygen-readable text on stdout"
)]
struct Cli {
    /// Squirrel source file.
    file: PathBuf,
}

struct NoTimestamp;

impl FormatTime for NoTimestamp {
    fn format_time(&self, _w: &mut Writer<'_>) -> std::fmt::Result {
        Ok(())
    }
}

fn main() -> ExitCode {
    // Doxygen reads stdout, so diagnostics only ever go to stderr
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_timer(NoTimestamp)
            .with_writer(std::io::stderr)
            .init();
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprint!("{e}");
            return ExitCode::from(1);
        }
    };

    match run(&cli.file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(file: &Path) -> Result<()> {
    let config = load_config()?;
    tracing::debug!(?config, "filter configuration");

    eprintln!("Filtering file {}.", file.display());
    let output = sqdox_filter::filter_file(file, &config)
        .with_context(|| format!("failed to filter {}", file.display()))?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

fn load_config() -> Result<FilterConfig> {
    let Some(path) = std::env::var_os(CONFIG_ENV) else {
        return Ok(FilterConfig::default());
    };
    let path = PathBuf::from(path);
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    FilterConfig::from_toml_str(&source)
        .with_context(|| format!("failed to load config {}", path.display()))
}
