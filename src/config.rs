//! Export configuration.
//!
//! All options are plain data passed into `build_snapshot`; nothing is
//! process-global. A config can be loaded from a JSON file (camelCase keys,
//! every key optional) and adjusted from the command line.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Snapshot format version written as `exportVersion`.
pub const EXPORT_VERSION: &str = "1.0";

/// Property-group recursion bound.
pub const DEFAULT_MAX_PROPERTY_DEPTH: usize = 10;

/// Attributes the reflective strategy never reads.
///
/// Back-references and owning collections would re-enter structure that is
/// exported elsewhere; selection is UI state; files and sources get
/// dedicated handling; the rest is the host object model's own plumbing.
pub const DEFAULT_SKIP_ATTRIBUTES: &[&str] = &[
    // Back-references and owning collections
    "parentFolder",
    "parent",
    "parentProperty",
    "propertyGroup",
    "containingComp",
    "usedIn",
    "rootFolder",
    "items",
    "item",
    "layers",
    "layer",
    "renderQueue",
    // Selection / UI state
    "selected",
    "selection",
    "selectedLayers",
    "selectedProperties",
    "activeItem",
    // Dedicated handling
    "file",
    "mainSource",
    "proxySource",
    "source",
    "marker",
    "markerProperty",
    // Object model plumbing
    "reflect",
    "__proto__",
    "constructor",
    "prototype",
    "toSource",
    "toString",
    "valueOf",
];

/// How generic node attributes are discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CollectionStrategy {
    /// Explicit per-kind attribute name lists.
    #[default]
    AllowList,
    /// Every readable attribute minus the skip set.
    Reflective,
}

/// Options for one export call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportConfig {
    pub collection_strategy: CollectionStrategy,
    /// Deepest property-group level still emitted (root group = 0).
    pub max_property_depth: usize,
    /// Used by the reflective strategy only.
    pub skip_attribute_names: BTreeSet<String>,
    /// Leave failing items out of the snapshot instead of failing the build.
    pub skip_failed_items: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            collection_strategy: CollectionStrategy::default(),
            max_property_depth: DEFAULT_MAX_PROPERTY_DEPTH,
            skip_attribute_names: default_skip_set(),
            skip_failed_items: false,
        }
    }
}

impl ExportConfig {
    /// Default config using the reflective strategy.
    pub fn reflective() -> Self {
        Self {
            collection_strategy: CollectionStrategy::Reflective,
            ..Self::default()
        }
    }

    pub fn with_max_property_depth(mut self, depth: usize) -> Self {
        self.max_property_depth = depth;
        self
    }

    pub fn with_skip_failed_items(mut self, skip: bool) -> Self {
        self.skip_failed_items = skip;
        self
    }

    /// Whether the reflective collector must leave `name` out.
    pub fn skips(&self, name: &str) -> bool {
        self.skip_attribute_names.contains(name)
    }

    /// Load a config from a JSON file. Missing keys keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Read config error: {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Parse config error: {}", path.display()))
    }
}

/// The default skip set as an owned set.
pub fn default_skip_set() -> BTreeSet<String> {
    DEFAULT_SKIP_ATTRIBUTES.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ExportConfig::default();
        assert_eq!(config.collection_strategy, CollectionStrategy::AllowList);
        assert_eq!(config.max_property_depth, 10);
        assert!(config.skips("parentFolder"));
        assert!(config.skips("usedIn"));
        assert!(!config.skips("name"));
        assert!(!config.skip_failed_items);
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{"collectionStrategy": "reflective", "maxPropertyDepth": 3}"#;
        let config: ExportConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.collection_strategy, CollectionStrategy::Reflective);
        assert_eq!(config.max_property_depth, 3);
        assert_eq!(config.skip_attribute_names, default_skip_set());
    }

    #[test]
    fn test_custom_skip_set_replaces_default() {
        let config: ExportConfig =
            serde_json::from_str(r#"{"skipAttributeNames": ["comment"]}"#).unwrap();
        assert!(config.skips("comment"));
        assert!(!config.skips("parentFolder"));
        assert_eq!(config.collection_strategy, CollectionStrategy::AllowList);
    }

    #[test]
    fn test_from_json_file() {
        let path =
            std::env::temp_dir().join(format!("aep_snapshot_config_{}.json", std::process::id()));
        fs::write(&path, r#"{"skipFailedItems": true}"#).unwrap();
        let config = ExportConfig::from_json_file(&path).unwrap();
        assert!(config.skip_failed_items);
        let _ = fs::remove_file(&path);

        assert!(ExportConfig::from_json_file(&path).is_err());
    }
}
