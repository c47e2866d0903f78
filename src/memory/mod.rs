//! In-memory host: plain data implementing every host trait.
//!
//! Two uses:
//! - tests build documents with the builder methods (`MemItem::composition(..).with_layer(..)`)
//! - the command-line tool loads a *document description* (JSON captured
//!   from a live host) with [`MemDocument::from_json_file`]
//!
//! Description layout:
//!
//! ```text
//! {
//!   "hostVersion": "24.0x51", "file": {"path": "...", "name": "..."},
//!   "attributes": { "bitsPerChannel": 8, ... },
//!   "items": [
//!     {"kind": "composition", "attributes": {...}, "parentFolder": {"id": 3, "name": "Comps"},
//!      "layers": [{"kind": "av", "attributes": {...}, "transform": {group}, "effects": {group}}],
//!      "markers": [{"time": 1.0, "attributes": {"comment": "hit"}}]},
//!     {"kind": "footage", "file": {...}, "mainSource": {"kind": "solid", "attributes": {...}}},
//!     {"kind": "folder", "childItemIds": [4, 5]}
//!   ],
//!   "renderQueue": {"items": [{"compName": "Main", "render": true, "settings": {...},
//!                              "outputModules": [{"attributes": {...}, "settings": {...}}]}]}
//! }
//! group = {"name": "...", "matchName": "...",
//!          "children": [{"node": "property", ...}, {"node": "group", ...}]}
//! ```
//!
//! Attribute values follow the sentinel conventions of [`MemAttr`]. Any node
//! may carry `"failure": "msg"` to make its access fail.

mod attr;
mod items;
mod properties;
mod render_queue;

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

pub use attr::{MemAttr, MemObject, host_value};
pub use items::{
    MemComposition, MemFolder, MemFootage, MemItem, MemItemKind, MemLayer, MemMarker,
    MemMarkerTrack, MemSource,
};
pub use properties::{
    MemExpression, MemGroup, MemKeyframe, MemNode, MemProperty, MemSpatial, MemTemporal,
};
pub use render_queue::{MemOutputModule, MemRenderQueue, MemRenderQueueItem};

use crate::host::{Document, FileRef, HostObject, HostValue, Item, ReadError, RenderQueue};

/// Element at 1-based `index`.
fn nth<'a, T>(items: &'a [T], what: &str, index: usize) -> Result<&'a T, ReadError> {
    index
        .checked_sub(1)
        .and_then(|i| items.get(i))
        .ok_or_else(|| ReadError::out_of_range(what, index, items.len()))
}

/// `HostObject` through the node's `attributes` table.
macro_rules! attributes_host_object {
    ($($ty:ty),* $(,)?) => {
        $(
            impl HostObject for $ty {
                fn attribute_names(&self) -> Vec<String> {
                    self.attributes.attribute_names()
                }

                fn read(&self, name: &str) -> Result<HostValue, ReadError> {
                    self.attributes.read(name)
                }
            }
        )*
    };
}

attributes_host_object!(
    MemDocument,
    MemItem,
    MemLayer,
    MemSource,
    MemGroup,
    MemProperty,
    MemRenderQueue,
    MemRenderQueueItem,
    MemOutputModule,
);

/// Whole in-memory project.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemDocument {
    pub attributes: MemObject,
    pub file: Option<FileRef>,
    pub host_version: Option<String>,
    pub host_build: Option<String>,
    pub items: Vec<MemItem>,
    pub render_queue: Option<MemRenderQueue>,
}

impl MemDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: impl Into<HostValue>) -> Self {
        self.attributes = self.attributes.with(name, value);
        self
    }

    pub fn with_item(mut self, item: MemItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_file(mut self, file: FileRef) -> Self {
        self.file = Some(file);
        self
    }

    pub fn with_host_version(mut self, version: &str, build: &str) -> Self {
        self.host_version = Some(version.to_string());
        self.host_build = Some(build.to_string());
        self
    }

    pub fn with_render_queue(mut self, queue: MemRenderQueue) -> Self {
        self.render_queue = Some(queue);
        self
    }

    /// Parse a document description.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let mut doc: MemDocument = serde_json::from_str(json).context("Parse document error")?;
        doc.rebuild_indices();
        Ok(doc)
    }

    /// Load a document description from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Read document error: {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Load document error: {}", path.display()))
    }

    /// Fill property indices left out of a description from child positions.
    pub fn rebuild_indices(&mut self) {
        for item in &mut self.items {
            item.rebuild_indices();
        }
    }
}

impl Document for MemDocument {
    fn num_items(&self) -> usize {
        self.items.len()
    }

    fn item(&self, index: usize) -> Result<&dyn Item, ReadError> {
        let item = nth(&self.items, "item", index)?;
        match &item.failure {
            Some(msg) => Err(ReadError::new(msg.clone())),
            None => Ok(item),
        }
    }

    fn file(&self) -> Option<FileRef> {
        self.file.clone()
    }

    fn host_version(&self) -> Option<String> {
        self.host_version.clone()
    }

    fn host_build(&self) -> Option<String> {
        self.host_build.clone()
    }

    fn render_queue(&self) -> Option<&dyn RenderQueue> {
        self.render_queue.as_ref().map(|queue| queue as &dyn RenderQueue)
    }
}
