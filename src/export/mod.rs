//! Document-tree export.
//!
//! Walks a borrowed [`Document`](crate::host::Document) top-down and builds
//! a serde-serializable [`Snapshot`]:
//!
//! ```text
//! build_snapshot
//!   └── export_item ──┬── export_layer ──┬── walk_group (transform, effects)
//!                     │                  │     └── export_property ── extract_keyframes
//!                     │                  └── extract_markers
//!                     ├── extract_markers
//!                     └── export_footage_source
//!   └── export_render_queue ── settings, output modules
//! ```
//!
//! Failures are handled at three levels:
//! - field: folded into `FieldValue::Error` / `FieldValue::Undefined`
//! - property child: skipped, siblings continue
//! - layer / item: returned as [`ExportError`] to the builder

pub mod attr_schemas;
pub mod attrs;
pub mod dispatch;
pub mod keyframes;
pub mod keys;
pub mod markers;
pub mod property_tree;
pub mod render_queue;
pub mod snapshot;

use std::path::PathBuf;

use crate::host::ReadError;

pub use attrs::{
    Attributes, FieldValue, collect, collect_allow_list, collect_reflective, collect_settings,
};
pub use dispatch::{
    FootageSourceSnapshot, ItemSnapshot, LayerSnapshot, export_footage_source, export_item,
    export_layer,
};
pub use keyframes::{KeyframeSnapshot, extract_keyframes};
pub use markers::{MarkerSnapshot, extract_markers};
pub use property_tree::{
    PropertyGroupSnapshot, PropertyNodeSnapshot, PropertySnapshot, export_property, walk_group,
};
pub use render_queue::{RenderQueueSnapshot, export_render_queue};
pub use snapshot::{ItemFailure, Snapshot, build_snapshot, persist, render};

/// Error raised while exporting a node or writing a snapshot.
#[derive(Debug)]
pub enum ExportError {
    /// Node-level read failure.
    Node(ReadError),
    /// Layer at 1-based `index` failed.
    Layer { index: usize, source: Box<ExportError> },
    /// Item at 1-based `index` failed.
    Item { index: usize, source: Box<ExportError> },
    Serialize(serde_json::Error),
    Io { path: PathBuf, source: std::io::Error },
}

impl ExportError {
    pub fn layer(index: usize, source: impl Into<ExportError>) -> Self {
        ExportError::Layer { index, source: Box::new(source.into()) }
    }

    pub fn item(index: usize, source: impl Into<ExportError>) -> Self {
        ExportError::Item { index, source: Box::new(source.into()) }
    }
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::Node(e) => write!(f, "{}", e),
            ExportError::Layer { index, source } => write!(f, "layer {}: {}", index, source),
            ExportError::Item { index, source } => write!(f, "item {}: {}", index, source),
            ExportError::Serialize(e) => write!(f, "serialize error: {}", e),
            ExportError::Io { path, source } => {
                write!(f, "write error {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Node(e) => Some(e),
            ExportError::Layer { source, .. } | ExportError::Item { source, .. } => {
                Some(source.as_ref())
            }
            ExportError::Serialize(e) => Some(e),
            ExportError::Io { source, .. } => Some(source),
        }
    }
}

impl From<ReadError> for ExportError {
    fn from(e: ReadError) -> Self {
        ExportError::Node(e)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        ExportError::Serialize(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_chain() {
        let err = ExportError::item(3, ExportError::layer(2, ReadError::new("Object is invalid")));
        assert_eq!(err.to_string(), "item 3: layer 2: Object is invalid");
        let layer = err.source().unwrap();
        assert!(layer.source().is_some());
    }
}
