//! Render queue export: queue entries, their render settings and output modules.
//!
//! Settings objects are read name by name like any other attribute set, so a
//! single unreadable setting becomes an error sentinel. A settings object
//! that cannot be obtained at all is replaced by one error sentinel.

use serde::Serialize;

use super::attr_schemas::{OUTPUT_MODULE_SCHEMA, RENDER_QUEUE_ITEM_SCHEMA, RENDER_QUEUE_SCHEMA};
use super::attrs::{Attributes, FieldValue, collect, collect_settings};
use super::keys::{OUTPUT_MODULE_RESERVED, RENDER_QUEUE_ITEM_RESERVED, RENDER_QUEUE_RESERVED};
use crate::config::ExportConfig;
use crate::host::{HostObject, OutputModule, ReadError, RenderQueue, RenderQueueItem};

/// Exported render queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderQueueSnapshot {
    #[serde(flatten)]
    pub attributes: Attributes,
    pub num_items: usize,
    pub items: Vec<RenderQueueItemSnapshot>,
}

/// One queue entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderQueueItemSnapshot {
    #[serde(flatten)]
    pub attributes: Attributes,
    pub comp_name: FieldValue,
    pub render: FieldValue,
    pub settings: SettingsSnapshot,
    pub output_modules: Vec<OutputModuleSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputModuleSnapshot {
    #[serde(flatten)]
    pub attributes: Attributes,
    pub settings: SettingsSnapshot,
}

/// Settings map, or the error sentinel when the object itself is unreadable.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SettingsSnapshot {
    Settings(Attributes),
    Unreadable(FieldValue),
}

impl SettingsSnapshot {
    fn read(result: Result<&dyn HostObject, ReadError>) -> Self {
        match result {
            Ok(settings) => SettingsSnapshot::Settings(collect_settings(settings)),
            Err(e) => SettingsSnapshot::Unreadable(FieldValue::Error(e.to_string())),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        match self {
            SettingsSnapshot::Settings(attrs) => attrs.get(name),
            SettingsSnapshot::Unreadable(_) => None,
        }
    }
}

/// Export the render queue; `None` when the document has none.
///
/// An entry or output module that cannot be accessed is left out with a
/// warning; `numItems` still reports the host's count.
pub fn export_render_queue(
    queue: Option<&dyn RenderQueue>,
    config: &ExportConfig,
) -> Option<RenderQueueSnapshot> {
    let queue = queue?;
    let num_items = queue.num_items();
    let mut items = Vec::with_capacity(num_items);
    for index in 1..=num_items {
        match queue.item(index) {
            Ok(item) => items.push(export_queue_item(item, config)),
            Err(e) => log::warn!("Render queue item {} skipped: {}", index, e),
        }
    }
    log::debug!("Render queue: {} of {} items", items.len(), num_items);

    Some(RenderQueueSnapshot {
        attributes: collect(queue, &[&RENDER_QUEUE_SCHEMA], config).without(RENDER_QUEUE_RESERVED),
        num_items,
        items,
    })
}

fn export_queue_item(
    item: &dyn RenderQueueItem,
    config: &ExportConfig,
) -> RenderQueueItemSnapshot {
    let mut output_modules = Vec::with_capacity(item.num_output_modules());
    for index in 1..=item.num_output_modules() {
        match item.output_module(index) {
            Ok(module) => output_modules.push(export_output_module(module, config)),
            Err(e) => log::warn!("Output module {} skipped: {}", index, e),
        }
    }

    RenderQueueItemSnapshot {
        attributes: collect(item, &[&RENDER_QUEUE_ITEM_SCHEMA], config)
            .without(RENDER_QUEUE_ITEM_RESERVED),
        comp_name: FieldValue::from_result(item.comp_name()),
        render: FieldValue::from_result(item.render()),
        settings: SettingsSnapshot::read(item.settings()),
        output_modules,
    }
}

fn export_output_module(module: &dyn OutputModule, config: &ExportConfig) -> OutputModuleSnapshot {
    OutputModuleSnapshot {
        attributes: collect(module, &[&OUTPUT_MODULE_SCHEMA], config)
            .without(OUTPUT_MODULE_RESERVED),
        settings: SettingsSnapshot::read(module.settings()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemObject, MemOutputModule, MemRenderQueue, MemRenderQueueItem};
    use serde_json::json;

    fn queue() -> MemRenderQueue {
        let settings = MemObject::new().with("Format", "QuickTime").with("Crop", false);
        let om = MemOutputModule::new(settings).with("name", "Lossless");
        let busy = MemOutputModule::new(MemObject::new()).failing_settings("Module is busy");
        MemRenderQueue::new()
            .with_item(
                MemRenderQueueItem::new("Comp 1", MemObject::new().with("Quality", "Best"))
                    .with("comment", "final")
                    .with_output_module(om)
                    .with_output_module(busy),
            )
            .with_item(MemRenderQueueItem::new("Comp 2", MemObject::new()).with_render(false))
            .with_item(MemRenderQueueItem::new("Gone", MemObject::new()).failing("Item is invalid"))
    }

    #[test]
    fn test_absent_queue() {
        assert!(export_render_queue(None, &ExportConfig::default()).is_none());
    }

    #[test]
    fn test_items_and_output_modules() {
        let queue = queue();
        let snapshot = export_render_queue(Some(&queue), &ExportConfig::default()).unwrap();
        assert_eq!(snapshot.num_items, 3);
        assert_eq!(snapshot.items.len(), 2);

        let json = serde_json::to_value(&snapshot).unwrap();
        let first = &json["items"][0];
        assert_eq!(first["compName"], "Comp 1");
        assert_eq!(first["render"], true);
        assert_eq!(first["comment"], "final");
        assert_eq!(first["settings"], json!({"Quality": "Best"}));
        assert_eq!(first["outputModules"][0]["name"], "Lossless");
        assert_eq!(first["outputModules"][0]["settings"]["Crop"], false);
        assert_eq!(first["outputModules"][1]["settings"], json!({"_error": "Module is busy"}));
        assert_eq!(json["items"][1]["render"], false);
        assert_eq!(json["items"][1]["outputModules"], json!([]));
    }

    #[test]
    fn test_settings_guarded_per_name() {
        let item = MemRenderQueueItem::new(
            "Comp 1",
            MemObject::new()
                .with("Quality", "Draft")
                .with_failure("Resolution", "Setting unavailable"),
        );
        let snapshot = export_queue_item(&item, &ExportConfig::default());
        assert_eq!(snapshot.settings.get("Quality"), Some(&FieldValue::Value(json!("Draft"))));
        assert!(snapshot.settings.get("Resolution").is_some_and(FieldValue::is_error));
    }
}
