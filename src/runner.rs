//! Command-line runner: loads document descriptions and writes snapshots.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use log::{debug, error, info, warn};

use crate::cli::Args;
use crate::config::ExportConfig;
use crate::export::{build_snapshot, persist, render};
use crate::memory::MemDocument;

/// Suffix of snapshot files written next to their input.
pub const SNAPSHOT_SUFFIX: &str = "snapshot.json";

/// Per-run counters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    /// Items left out across all documents (`--skip-failed-items`).
    pub skipped_items: usize,
}

impl RunSummary {
    pub fn all_ok(&self) -> bool {
        self.failed == 0
    }
}

/// Initialize env_logger from verbosity flags.
///
/// 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace.
/// Console logging respects `RUST_LOG`; file logging uses the flag level.
pub fn init_logger(verbosity: u8, log_file: Option<&Path>) -> anyhow::Result<()> {
    let log_level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    if let Some(log_path) = log_file {
        let file = std::fs::File::create(log_path)
            .with_context(|| format!("Create log file error: {}", log_path.display()))?;
        env_logger::Builder::new()
            .filter_level(log_level)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
        info!("Logging to file: {} (level: {:?})", log_path.display(), log_level);
    } else {
        let default_level = match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .format_timestamp_millis()
            .init();
    }
    Ok(())
}

/// Snapshot path for `input`: `shot.json` -> `shot.snapshot.json`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    input.with_file_name(format!("{}.{}", stem, SNAPSHOT_SUFFIX))
}

/// Export one document description to `output`. Returns the number of
/// items left out.
pub fn export_file(input: &Path, output: &Path, config: &ExportConfig) -> anyhow::Result<usize> {
    let document = MemDocument::from_json_file(input)?;
    let snapshot = build_snapshot(&document, config)
        .with_context(|| format!("Export error: {}", input.display()))?;
    for failure in &snapshot.failures {
        warn!("{}: item {} left out: {}", input.display(), failure.index, failure.message);
    }
    let text = render(&snapshot)?;
    persist(&text, output)?;
    info!("{} -> {} ({} items)", input.display(), output.display(), snapshot.items.len());
    Ok(snapshot.failures.len())
}

/// Export every input; one failing document does not stop the others.
pub fn run(args: &Args) -> anyhow::Result<RunSummary> {
    if args.output.is_some() && args.inputs.len() > 1 {
        bail!("--output takes a single input, got {}", args.inputs.len());
    }
    let config = args.export_config()?;
    debug!("Export config: {:?}", config);

    let mut summary = RunSummary::default();
    for input in &args.inputs {
        let output = args.output.clone().unwrap_or_else(|| default_output_path(input));
        match export_file(input, &output, &config) {
            Ok(skipped) => {
                summary.succeeded += 1;
                summary.skipped_items += skipped;
            }
            Err(e) => {
                error!("{:#}", e);
                eprintln!("FAILED {}: {:#}", input.display(), e);
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}
