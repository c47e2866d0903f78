//! Per-kind export of items, layers and footage sources.
//!
//! Each family is a closed enum on the host side (`ItemKind`, `LayerKind`,
//! `SourceKind`) and a tagged enum on the snapshot side, so every kind is
//! matched exhaustively in both directions.

use serde::Serialize;

use super::ExportError;
use super::attr_schemas::{
    AV_ITEM_SCHEMA, AV_LAYER_SCHEMA, AttrSchema, COMP_SCHEMA, FILE_SOURCE_SCHEMA,
    FOOTAGE_SOURCE_SCHEMA, ITEM_SCHEMA, LAYER_SCHEMA, LIGHT_LAYER_SCHEMA, SOLID_SOURCE_SCHEMA,
};
use super::attrs::{Attributes, collect};
use super::keys::{ITEM_RESERVED, LAYER_RESERVED, SOURCE_RESERVED};
use super::markers::{MarkerSnapshot, extract_markers};
use super::property_tree::{PropertyGroupSnapshot, PropertyNodeSnapshot, walk_group};
use crate::config::ExportConfig;
use crate::host::{
    Composition, FileRef, Folder, Footage, FootageSource, Item, ItemKind, Layer, LayerKind,
    PropertyGroup, PropertyNode, SourceKind,
};

// ============================================================================
// Layers
// ============================================================================

/// Exported layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerSnapshot {
    #[serde(flatten)]
    pub attributes: Attributes,
    #[serde(flatten)]
    pub variant: LayerVariant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    pub markers: Vec<MarkerSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<PropertyGroupSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effects: Option<Vec<PropertyGroupSnapshot>>,
}

/// Layer kind with its kind-specific fields, tagged by `layerType`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layerType")]
pub enum LayerVariant {
    #[serde(rename = "CameraLayer")]
    Camera,
    #[serde(rename = "LightLayer")]
    Light,
    #[serde(rename = "TextLayer")]
    Text(AvSource),
    #[serde(rename = "ShapeLayer")]
    Shape(AvSource),
    #[serde(rename = "AVLayer")]
    Av(AvSource),
    #[serde(rename = "Layer")]
    Generic,
}

impl LayerVariant {
    fn new(kind: LayerKind, source: AvSource) -> Self {
        match kind {
            LayerKind::Camera => LayerVariant::Camera,
            LayerKind::Light => LayerVariant::Light,
            LayerKind::Text => LayerVariant::Text(source),
            LayerKind::Shape => LayerVariant::Shape(source),
            LayerKind::Av => LayerVariant::Av(source),
            LayerKind::Generic => LayerVariant::Generic,
        }
    }

    pub fn kind(&self) -> LayerKind {
        match self {
            LayerVariant::Camera => LayerKind::Camera,
            LayerVariant::Light => LayerKind::Light,
            LayerVariant::Text(_) => LayerKind::Text,
            LayerVariant::Shape(_) => LayerKind::Shape,
            LayerVariant::Av(_) => LayerKind::Av,
            LayerVariant::Generic => LayerKind::Generic,
        }
    }
}

/// Source item reference of an AV-family layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
}

fn layer_schemas(kind: LayerKind) -> Vec<&'static AttrSchema> {
    match kind {
        LayerKind::Light => vec![&LAYER_SCHEMA, &LIGHT_LAYER_SCHEMA],
        LayerKind::Text | LayerKind::Shape | LayerKind::Av => vec![&LAYER_SCHEMA, &AV_LAYER_SCHEMA],
        LayerKind::Camera | LayerKind::Generic => vec![&LAYER_SCHEMA],
    }
}

/// Export one layer.
///
/// The parent reference is a node-level read: its failure fails the layer.
pub fn export_layer(
    layer: &dyn Layer,
    config: &ExportConfig,
) -> Result<LayerSnapshot, ExportError> {
    let kind = layer.kind();
    let attributes = collect(layer, &layer_schemas(kind), config).without(LAYER_RESERVED);

    let source = match layer.source() {
        Some(item) if kind.is_av() => {
            AvSource { source_id: Some(item.id), source_name: Some(item.name) }
        }
        _ => AvSource::default(),
    };

    let parent = layer.parent()?;
    let (parent_id, parent_index, parent_name) = match parent {
        Some(p) => (p.id, Some(p.index), Some(p.name)),
        None => (None, None, None),
    };

    Ok(LayerSnapshot {
        attributes,
        variant: LayerVariant::new(kind, source),
        parent_id,
        parent_index,
        parent_name,
        markers: extract_markers(layer.markers()),
        transform: walk_group(layer.transform(), 0, config),
        effects: layer.effects().map(|parade| export_effects(parade, config)),
    })
}

/// Each effect of the parade is walked as its own root.
fn export_effects(parade: &dyn PropertyGroup, config: &ExportConfig) -> Vec<PropertyGroupSnapshot> {
    let mut effects = Vec::new();
    for index in 1..=parade.num_properties() {
        match parade.property(index) {
            Ok(PropertyNode::Group(effect)) => effects.extend(walk_group(Some(effect), 0, config)),
            Ok(PropertyNode::Property(_)) => {
                log::debug!("Effect parade entry {} is not a group", index)
            }
            Err(e) => log::warn!("Effect {} skipped: {}", index, e),
        }
    }
    effects
}

// ============================================================================
// Footage sources
// ============================================================================

/// Exported footage source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FootageSourceSnapshot {
    #[serde(flatten)]
    pub attributes: Attributes,
    pub source_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

fn source_schemas(kind: SourceKind) -> Vec<&'static AttrSchema> {
    match kind {
        SourceKind::Solid => vec![&FOOTAGE_SOURCE_SCHEMA, &SOLID_SOURCE_SCHEMA],
        SourceKind::File => vec![&FOOTAGE_SOURCE_SCHEMA, &FILE_SOURCE_SCHEMA],
        SourceKind::Placeholder | SourceKind::Generic => vec![&FOOTAGE_SOURCE_SCHEMA],
    }
}

/// Export a footage source; `None` in gives `None` out (serialized as null).
pub fn export_footage_source(
    source: Option<&dyn FootageSource>,
    config: &ExportConfig,
) -> Option<FootageSourceSnapshot> {
    let source = source?;
    let kind = source.kind();
    let file = match kind {
        SourceKind::File => source.file(),
        _ => None,
    };
    let (file_path, file_name) = split_file(file);
    Some(FootageSourceSnapshot {
        attributes: collect(source, &source_schemas(kind), config).without(SOURCE_RESERVED),
        source_type: kind.type_name(),
        file_path,
        file_name,
    })
}

fn split_file(file: Option<FileRef>) -> (Option<String>, Option<String>) {
    match file {
        Some(f) => (Some(f.path), Some(f.name)),
        None => (None, None),
    }
}

// ============================================================================
// Items
// ============================================================================

/// Exported project item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSnapshot {
    #[serde(flatten)]
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_folder_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_folder_name: Option<String>,
    #[serde(flatten)]
    pub variant: ItemVariant,
}

/// Item kind with its kind-specific fields, tagged by `itemType`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "itemType")]
pub enum ItemVariant {
    #[serde(rename = "CompItem")]
    Composition(CompositionSnapshot),
    #[serde(rename = "FootageItem")]
    Footage(FootageSnapshot),
    #[serde(rename = "FolderItem")]
    Folder(FolderSnapshot),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionSnapshot {
    pub markers: Vec<MarkerSnapshot>,
    pub layers: Vec<LayerSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FootageSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    pub main_source: Option<FootageSourceSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderSnapshot {
    pub num_items: usize,
    pub child_item_ids: Vec<i64>,
}

impl ItemSnapshot {
    pub fn type_name(&self) -> &'static str {
        match self.variant {
            ItemVariant::Composition(_) => "CompItem",
            ItemVariant::Footage(_) => "FootageItem",
            ItemVariant::Folder(_) => "FolderItem",
        }
    }

    pub fn layers(&self) -> &[LayerSnapshot] {
        match &self.variant {
            ItemVariant::Composition(c) => &c.layers,
            _ => &[],
        }
    }
}

/// Export one item with its whole subtree.
pub fn export_item(item: &dyn Item, config: &ExportConfig) -> Result<ItemSnapshot, ExportError> {
    let (schemas, variant) = match item.kind() {
        ItemKind::Composition(comp) => (
            vec![&ITEM_SCHEMA, &AV_ITEM_SCHEMA, &COMP_SCHEMA],
            ItemVariant::Composition(export_composition(comp, config)?),
        ),
        ItemKind::Footage(footage) => (
            vec![&ITEM_SCHEMA, &AV_ITEM_SCHEMA],
            ItemVariant::Footage(export_footage(footage, config)),
        ),
        ItemKind::Folder(folder) => {
            (vec![&ITEM_SCHEMA], ItemVariant::Folder(export_folder(folder)?))
        }
    };
    let attributes = collect(item, &schemas, config).without(ITEM_RESERVED);

    let (parent_folder_id, parent_folder_name) = match item.parent_folder()? {
        Some(folder) => (Some(folder.id), Some(folder.name)),
        None => (None, None),
    };

    Ok(ItemSnapshot { attributes, parent_folder_id, parent_folder_name, variant })
}

fn export_composition(
    comp: &dyn Composition,
    config: &ExportConfig,
) -> Result<CompositionSnapshot, ExportError> {
    let num_layers = comp.num_layers();
    let mut layers = Vec::with_capacity(num_layers);
    for index in 1..=num_layers {
        let layer = comp
            .layer(index)
            .map_err(|e| ExportError::layer(index, e))
            .and_then(|layer| {
                export_layer(layer, config).map_err(|e| ExportError::layer(index, e))
            })?;
        log::debug!("  layer {}: {}", index, layer.variant_name());
        layers.push(layer);
    }
    Ok(CompositionSnapshot { markers: extract_markers(comp.markers()), layers })
}

fn export_footage(footage: &dyn Footage, config: &ExportConfig) -> FootageSnapshot {
    let (file_path, file_name) = split_file(footage.file());
    let main_source = export_footage_source(footage.main_source(), config);
    FootageSnapshot { file_path, file_name, main_source }
}

fn export_folder(folder: &dyn Folder) -> Result<FolderSnapshot, ExportError> {
    let child_item_ids = folder.child_item_ids()?;
    Ok(FolderSnapshot { num_items: child_item_ids.len(), child_item_ids })
}

impl LayerSnapshot {
    pub fn variant_name(&self) -> &'static str {
        self.variant.kind().type_name()
    }

    /// Property of the transform group by match name.
    pub fn transform_property(&self, match_name: &str) -> Option<&PropertyNodeSnapshot> {
        self.transform.as_ref()?.child(match_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::FieldValue;
    use crate::host::{HostValue, ItemRef, LayerRef, PropertyValueType};
    use crate::memory::{
        MemGroup, MemItem, MemLayer, MemMarker, MemMarkerTrack, MemProperty, MemSource,
    };
    use serde_json::json;

    #[test]
    fn test_layer_variants() {
        let config = ExportConfig::default();
        for kind in [
            LayerKind::Camera,
            LayerKind::Light,
            LayerKind::Text,
            LayerKind::Shape,
            LayerKind::Av,
            LayerKind::Generic,
        ] {
            let layer = MemLayer::new(kind, 1, "L");
            let snapshot = export_layer(&layer, &config).unwrap();
            assert_eq!(snapshot.variant.kind(), kind);
            assert_eq!(snapshot.variant_name(), kind.type_name());
            let json = serde_json::to_value(&snapshot).unwrap();
            assert_eq!(json["layerType"], kind.type_name());
            assert_eq!(json["enabled"], true);
            assert_eq!(json["name"], "L");
            assert_eq!(json["index"], 1);
        }
    }

    #[test]
    fn test_light_and_av_attributes() {
        let config = ExportConfig::default();
        let light = MemLayer::new(LayerKind::Light, 1, "Key")
            .with("lightType", 4401.0)
            .with("threeDLayer", true);
        let json = serde_json::to_value(export_layer(&light, &config).unwrap()).unwrap();
        assert_eq!(json["lightType"], 4401);
        assert!(json.get("threeDLayer").is_none());

        let solid = MemLayer::new(LayerKind::Av, 2, "Red Solid")
            .with("threeDLayer", false)
            .with_source(ItemRef { id: 7, name: "Red Solid".into() });
        let json = serde_json::to_value(export_layer(&solid, &config).unwrap()).unwrap();
        assert_eq!(json["threeDLayer"], false);
        assert_eq!(json["sourceId"], 7);
        assert_eq!(json["sourceName"], "Red Solid");
    }

    #[test]
    fn test_camera_ignores_source() {
        let cam = MemLayer::new(LayerKind::Camera, 1, "Camera 1")
            .with_source(ItemRef { id: 3, name: "x".into() });
        let snapshot = export_layer(&cam, &ExportConfig::default()).unwrap();
        let json = serde_json::to_value(snapshot).unwrap();
        assert!(json.get("sourceId").is_none());
    }

    #[test]
    fn test_parent_reference() {
        let config = ExportConfig::default();
        let parent = LayerRef { id: Some(11), index: 1, name: "Null 1".into() };
        let child = MemLayer::new(LayerKind::Av, 2, "Child").with_parent(parent);
        let json = serde_json::to_value(export_layer(&child, &config).unwrap()).unwrap();
        assert_eq!(json["parentId"], 11);
        assert_eq!(json["parentIndex"], 1);
        assert_eq!(json["parentName"], "Null 1");

        let broken =
            MemLayer::new(LayerKind::Av, 3, "Broken").with_parent_failure("Object is invalid");
        assert!(matches!(export_layer(&broken, &config), Err(ExportError::Node(_))));
    }

    #[test]
    fn test_effects_and_markers() {
        let effects = MemGroup::new("Effects", "ADBE Effect Parade")
            .with_group(MemGroup::new("Blur", "ADBE Gaussian Blur 2").with_enabled(false))
            .with_group(MemGroup::new("Glow", "ADBE Glo2"));
        let layer = MemLayer::new(LayerKind::Av, 1, "FX")
            .with_effects(effects)
            .with_markers(
                MemMarkerTrack::new().with_marker(MemMarker::new(1.0).with("comment", "hit")),
            );
        let snapshot = export_layer(&layer, &ExportConfig::default()).unwrap();
        let effects = snapshot.effects.as_ref().unwrap();
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[0].enabled, Some(false));
        assert_eq!(effects[1].property_index, 2);
        assert_eq!(snapshot.markers.len(), 1);
        assert_eq!(snapshot.markers[0].comment, FieldValue::Value(json!("hit")));
        assert!(snapshot.transform.is_none());
    }

    #[test]
    fn test_footage_sources() {
        let config = ExportConfig::default();
        let solid = MemSource::new(SourceKind::Solid)
            .with("color", [1.0, 0.0, 0.0])
            .with("hasAlpha", false);
        let json = serde_json::to_value(export_footage_source(Some(&solid), &config)).unwrap();
        assert_eq!(json["sourceType"], "SolidSource");
        assert_eq!(json["color"], json!([1, 0, 0]));
        assert!(json.get("filePath").is_none());

        let file = MemSource::new(SourceKind::File)
            .with_file(FileRef { path: "/footage/a.mov".into(), name: "a.mov".into() });
        let json = serde_json::to_value(export_footage_source(Some(&file), &config)).unwrap();
        assert_eq!(json["sourceType"], "FileSource");
        assert_eq!(json["fileName"], "a.mov");
        // Listed but never set on the source
        assert_eq!(json["missingFootagePath"], json!({"_undefined": true}));

        let none = serde_json::to_value(export_footage_source(None, &config)).unwrap();
        assert_eq!(none, serde_json::Value::Null);
    }

    #[test]
    fn test_footage_item_without_source() {
        let item = MemItem::footage(5, "missing.png", None);
        let snapshot = export_item(&item, &ExportConfig::default()).unwrap();
        let json = serde_json::to_value(snapshot).unwrap();
        assert_eq!(json["itemType"], "FootageItem");
        assert_eq!(json["mainSource"], serde_json::Value::Null);
        assert!(json.get("parentFolderId").is_none());
    }

    #[test]
    fn test_layer_failure_carries_index() {
        let comp = MemItem::composition(1, "Main")
            .with_layer(MemLayer::new(LayerKind::Av, 1, "ok"))
            .with_layer(MemLayer::new(LayerKind::Av, 2, "bad").failing("Layer is invalid"));
        let err = export_item(&comp, &ExportConfig::default()).unwrap_err();
        assert!(matches!(err, ExportError::Layer { index: 2, .. }));
        assert_eq!(err.to_string(), "layer 2: Layer is invalid");
    }

    #[test]
    fn test_reflective_item_attributes() {
        let comp = MemItem::composition(1, "Main")
            .with("frameRate", 29.97)
            .with("usedIn", HostValue::Array(vec![]))
            .with("itemType", "shadowed")
            .in_folder(ItemRef { id: 9, name: "Comps".into() });
        let snapshot = export_item(&comp, &ExportConfig::reflective()).unwrap();
        assert_eq!(snapshot.attributes.get("frameRate"), Some(&FieldValue::Value(json!(29.97))));
        assert!(!snapshot.attributes.contains("usedIn"));
        assert_eq!(snapshot.parent_folder_id, Some(9));
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["itemType"], "CompItem");
        assert_eq!(json["parentFolderName"], "Comps");
    }

    #[test]
    fn test_transform_walked() {
        let opacity =
            MemProperty::new("Opacity", "ADBE Opacity", PropertyValueType::OneD).with_value(50.0);
        let transform = MemGroup::new("Transform", "ADBE Transform Group").with_property(opacity);
        let layer = MemLayer::new(LayerKind::Av, 1, "Solid").with_transform(transform);
        let snapshot = export_layer(&layer, &ExportConfig::default()).unwrap();
        let opacity = snapshot
            .transform_property("ADBE Opacity")
            .and_then(PropertyNodeSnapshot::as_property)
            .unwrap();
        assert_eq!(opacity.value, Some(FieldValue::Value(json!(50))));
    }
}
