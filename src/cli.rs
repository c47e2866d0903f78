use clap::Parser;
use std::path::PathBuf;

use crate::config::{CollectionStrategy, EXPORT_VERSION, ExportConfig};

// Build version with snapshot format info
const VERSION_INFO: &str = const_format::concatcp!(
    env!("CARGO_PKG_VERSION"), "\n",
    "Snapshot format: ", EXPORT_VERSION, "\n",
    "Target: ", std::env::consts::ARCH, "-", std::env::consts::OS
);

/// Export compositing project documents to canonical JSON snapshots
#[derive(Parser, Debug)]
#[command(author, version = VERSION_INFO, about, long_about = None)]
pub struct Args {
    /// Document description files to export (JSON)
    #[arg(value_name = "FILE", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output path (single input only; default: <input>.snapshot.json next to each input)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Export configuration file (JSON, camelCase keys)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Attribute collection strategy (overrides config file)
    #[arg(short = 's', long = "strategy", value_enum, value_name = "STRATEGY")]
    pub strategy: Option<CollectionStrategy>,

    /// Maximum property-group depth (overrides config file)
    #[arg(short = 'd', long = "max-depth", value_name = "N")]
    pub max_depth: Option<usize>,

    /// Attribute name the reflective strategy skips, added to the skip set (repeatable)
    #[arg(long = "skip", value_name = "NAME")]
    pub skip: Vec<String>,

    /// Leave failing items out instead of failing the document
    #[arg(long = "skip-failed-items")]
    pub skip_failed_items: bool,

    /// Write log to file instead of stderr
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Args {
    /// Export config: config file (or defaults) with command-line overrides applied.
    pub fn export_config(&self) -> anyhow::Result<ExportConfig> {
        let mut config = match &self.config {
            Some(path) => ExportConfig::from_json_file(path)?,
            None => ExportConfig::default(),
        };
        if let Some(strategy) = self.strategy {
            config.collection_strategy = strategy;
        }
        if let Some(depth) = self.max_depth {
            config.max_property_depth = depth;
        }
        config.skip_attribute_names.extend(self.skip.iter().cloned());
        if self.skip_failed_items {
            config.skip_failed_items = true;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "aep-snapshot",
            "doc.json",
            "--strategy",
            "reflective",
            "--max-depth",
            "4",
            "--skip",
            "comment",
            "--skip",
            "label",
            "--skip-failed-items",
            "-vv",
        ]);
        assert_eq!(args.verbosity, 2);
        let config = args.export_config().unwrap();
        assert_eq!(config.collection_strategy, CollectionStrategy::Reflective);
        assert_eq!(config.max_property_depth, 4);
        assert!(config.skips("comment"));
        assert!(config.skips("label"));
        assert!(config.skips("parentFolder"));
        assert!(config.skip_failed_items);
    }

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["aep-snapshot", "a.json", "b.json"]);
        assert_eq!(args.inputs.len(), 2);
        assert_eq!(args.export_config().unwrap(), ExportConfig::default());
    }

    #[test]
    fn test_requires_input() {
        assert!(Args::try_parse_from(["aep-snapshot"]).is_err());
    }
}
