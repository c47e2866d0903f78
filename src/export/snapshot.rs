//! Project snapshot building, rendering and persistence.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::ExportError;
use super::attr_schemas::PROJECT_SCHEMA;
use super::attrs::{Attributes, FieldValue, collect};
use super::dispatch::{ItemSnapshot, export_item};
use super::keys::ROOT_RESERVED;
use super::render_queue::{RenderQueueSnapshot, export_render_queue};
use crate::config::{EXPORT_VERSION, ExportConfig};
use crate::host::Document;

/// Project name written for a never-saved project.
pub const UNTITLED: &str = "Untitled";

/// Whole-document snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub export_version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_build: Option<String>,
    /// Full path of the project file, null when unsaved.
    pub project_file: Option<String>,
    pub project_name: String,
    #[serde(flatten)]
    pub attributes: Attributes,
    pub items: Vec<ItemSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_queue: Option<RenderQueueSnapshot>,
    /// Items left out under `skip_failed_items`.
    #[serde(skip)]
    pub failures: Vec<ItemFailure>,
}

/// Item that failed and was left out of the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    /// 1-based item index.
    pub index: usize,
    pub message: String,
}

impl Snapshot {
    pub fn item_by_id(&self, id: i64) -> Option<&ItemSnapshot> {
        self.items.iter().find(|item| attribute(item, "id").and_then(Value::as_i64) == Some(id))
    }

    pub fn item_by_name(&self, name: &str) -> Option<&ItemSnapshot> {
        self.items.iter().find(|item| attribute(item, "name").and_then(Value::as_str) == Some(name))
    }
}

fn attribute<'a>(item: &'a ItemSnapshot, name: &str) -> Option<&'a Value> {
    item.attributes.get(name).and_then(FieldValue::as_value)
}

/// Build the snapshot of `document`.
///
/// Items are exported in document order. The first failing item fails the
/// build unless `config.skip_failed_items` is set, in which case it is left
/// out and recorded in [`Snapshot::failures`].
pub fn build_snapshot(
    document: &dyn Document,
    config: &ExportConfig,
) -> Result<Snapshot, ExportError> {
    let num_items = document.num_items();
    log::debug!("Exporting {} items ({:?})", num_items, config.collection_strategy);

    let (project_file, project_name) = match document.file() {
        Some(file) => (Some(file.path), file.name),
        None => (None, UNTITLED.to_string()),
    };

    let mut items = Vec::with_capacity(num_items);
    let mut failures = Vec::new();
    for index in 1..=num_items {
        let result = document
            .item(index)
            .map_err(ExportError::from)
            .and_then(|item| export_item(item, config))
            .map_err(|e| ExportError::item(index, e));
        match result {
            Ok(item) => {
                log::debug!("item {}: {}", index, item.type_name());
                items.push(item);
            }
            Err(e) if config.skip_failed_items => {
                log::warn!("Skipping {}", e);
                failures.push(ItemFailure { index, message: e.to_string() });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(Snapshot {
        export_version: EXPORT_VERSION,
        host_version: document.host_version(),
        host_build: document.host_build(),
        project_file,
        project_name,
        attributes: collect(document, &[&PROJECT_SCHEMA], config).without(ROOT_RESERVED),
        items,
        render_queue: export_render_queue(document.render_queue(), config),
        failures,
    })
}

/// Render as pretty-printed JSON (two-space indent).
pub fn render(snapshot: &Snapshot) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

/// Write rendered text to `path`, creating parent directories.
pub fn persist(text: &str, path: &Path) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io { path: path.to_path_buf(), source };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, text).map_err(io_err)
}
