//! In-memory items, layers, footage sources and marker tracks.

use serde::Deserialize;

use super::{MemAttr, MemGroup, MemObject, nth};
use crate::host::{
    Composition, FileRef, Folder, Footage, FootageSource, HostObject, HostValue, Item, ItemKind,
    ItemRef, Layer, LayerKind, LayerRef, MarkerTrack, PropertyGroup, ReadError, SourceKind,
};

// ============================================================================
// Items
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemItem {
    #[serde(default)]
    pub attributes: MemObject,
    #[serde(default)]
    pub parent_folder: Option<ItemRef>,
    /// Accessing this item from the document fails with this message.
    #[serde(default)]
    pub failure: Option<String>,
    #[serde(flatten)]
    pub kind: MemItemKind,
}

/// Item payload, tagged by `kind` in descriptions.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MemItemKind {
    Composition(MemComposition),
    Footage(MemFootage),
    Folder(MemFolder),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemComposition {
    pub layers: Vec<MemLayer>,
    pub markers: Option<MemMarkerTrack>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemFootage {
    pub file: Option<FileRef>,
    pub main_source: Option<MemSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemFolder {
    pub child_item_ids: Vec<i64>,
}

impl MemItem {
    fn with_kind(id: i64, name: &str, kind: MemItemKind) -> Self {
        Self {
            attributes: MemObject::new().with("name", name).with("id", id),
            parent_folder: None,
            failure: None,
            kind,
        }
    }

    pub fn composition(id: i64, name: &str) -> Self {
        Self::with_kind(id, name, MemItemKind::Composition(MemComposition::default()))
    }

    pub fn footage(id: i64, name: &str, main_source: Option<MemSource>) -> Self {
        Self::with_kind(id, name, MemItemKind::Footage(MemFootage { file: None, main_source }))
    }

    pub fn folder(id: i64, name: &str, child_item_ids: Vec<i64>) -> Self {
        Self::with_kind(id, name, MemItemKind::Folder(MemFolder { child_item_ids }))
    }

    pub fn with(mut self, name: &str, value: impl Into<HostValue>) -> Self {
        self.attributes = self.attributes.with(name, value);
        self
    }

    pub fn in_folder(mut self, folder: ItemRef) -> Self {
        self.parent_folder = Some(folder);
        self
    }

    /// Append a layer; ignored unless this is a composition.
    pub fn with_layer(mut self, layer: MemLayer) -> Self {
        if let MemItemKind::Composition(comp) = &mut self.kind {
            comp.layers.push(layer);
        }
        self
    }

    /// Set the composition marker track; ignored unless this is a composition.
    pub fn with_markers(mut self, track: MemMarkerTrack) -> Self {
        if let MemItemKind::Composition(comp) = &mut self.kind {
            comp.markers = Some(track);
        }
        self
    }

    /// Set the backing file; ignored unless this is footage.
    pub fn with_file(mut self, file: FileRef) -> Self {
        if let MemItemKind::Footage(footage) = &mut self.kind {
            footage.file = Some(file);
        }
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub(super) fn rebuild_indices(&mut self) {
        if let MemItemKind::Composition(comp) = &mut self.kind {
            for layer in &mut comp.layers {
                layer.rebuild_indices();
            }
        }
    }
}

impl Item for MemItem {
    fn kind(&self) -> ItemKind<'_> {
        match &self.kind {
            MemItemKind::Composition(c) => ItemKind::Composition(c),
            MemItemKind::Footage(f) => ItemKind::Footage(f),
            MemItemKind::Folder(f) => ItemKind::Folder(f),
        }
    }

    fn parent_folder(&self) -> Result<Option<ItemRef>, ReadError> {
        Ok(self.parent_folder.clone())
    }
}

impl Composition for MemComposition {
    fn num_layers(&self) -> usize {
        self.layers.len()
    }

    fn layer(&self, index: usize) -> Result<&dyn Layer, ReadError> {
        let layer = nth(&self.layers, "layer", index)?;
        match &layer.failure {
            Some(msg) => Err(ReadError::new(msg.clone())),
            None => Ok(layer),
        }
    }

    fn markers(&self) -> Option<&dyn MarkerTrack> {
        self.markers.as_ref().map(|m| m as &dyn MarkerTrack)
    }
}

impl Footage for MemFootage {
    fn file(&self) -> Option<FileRef> {
        self.file.clone()
    }

    fn main_source(&self) -> Option<&dyn FootageSource> {
        self.main_source.as_ref().map(|s| s as &dyn FootageSource)
    }
}

impl Folder for MemFolder {
    fn child_item_ids(&self) -> Result<Vec<i64>, ReadError> {
        Ok(self.child_item_ids.clone())
    }
}

// ============================================================================
// Layers
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemLayer {
    pub kind: LayerKind,
    #[serde(default)]
    pub attributes: MemObject,
    #[serde(default)]
    pub source: Option<ItemRef>,
    #[serde(default)]
    pub parent: Option<LayerRef>,
    /// Reading the parent reference fails with this message.
    #[serde(default)]
    pub parent_failure: Option<String>,
    /// Accessing this layer from its composition fails with this message.
    #[serde(default)]
    pub failure: Option<String>,
    #[serde(default)]
    pub markers: Option<MemMarkerTrack>,
    #[serde(default)]
    pub transform: Option<MemGroup>,
    #[serde(default)]
    pub effects: Option<MemGroup>,
}

/// Switches every new layer starts with.
const LAYER_SWITCHES: &[(&str, bool)] =
    &[("enabled", true), ("locked", false), ("shy", false), ("solo", false)];

const AV_LAYER_SWITCHES: &[(&str, bool)] = &[
    ("adjustmentLayer", false),
    ("audioEnabled", true),
    ("collapseTransformation", false),
    ("effectsActive", true),
    ("environmentLayer", false),
    ("frameBlending", false),
    ("guideLayer", false),
    ("motionBlur", false),
    ("preserveTransparency", false),
    ("threeDLayer", false),
    ("timeRemapEnabled", false),
];

impl MemLayer {
    /// Layer with the host's default switches for `kind`.
    pub fn new(kind: LayerKind, index: usize, name: &str) -> Self {
        let mut attributes = MemObject::new().with("name", name).with("index", index as f64);
        let av_switches = if kind.is_av() { AV_LAYER_SWITCHES } else { &[] };
        for &(switch, on) in LAYER_SWITCHES.iter().chain(av_switches) {
            attributes = attributes.with(switch, on);
        }
        Self {
            kind,
            attributes,
            source: None,
            parent: None,
            parent_failure: None,
            failure: None,
            markers: None,
            transform: None,
            effects: None,
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<HostValue>) -> Self {
        self.attributes = self.attributes.with(name, value);
        self
    }

    pub fn with_source(mut self, source: ItemRef) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_parent(mut self, parent: LayerRef) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_parent_failure(mut self, message: &str) -> Self {
        self.parent_failure = Some(message.to_string());
        self
    }

    pub fn with_markers(mut self, track: MemMarkerTrack) -> Self {
        self.markers = Some(track);
        self
    }

    pub fn with_transform(mut self, transform: MemGroup) -> Self {
        self.transform = Some(transform);
        self
    }

    pub fn with_effects(mut self, effects: MemGroup) -> Self {
        self.effects = Some(effects);
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    fn rebuild_indices(&mut self) {
        for group in [&mut self.transform, &mut self.effects].into_iter().flatten() {
            group.rebuild_indices();
        }
    }
}

impl Layer for MemLayer {
    fn kind(&self) -> LayerKind {
        self.kind
    }

    fn source(&self) -> Option<ItemRef> {
        self.source.clone()
    }

    fn parent(&self) -> Result<Option<LayerRef>, ReadError> {
        match &self.parent_failure {
            Some(msg) => Err(ReadError::new(msg.clone())),
            None => Ok(self.parent.clone()),
        }
    }

    fn markers(&self) -> Option<&dyn MarkerTrack> {
        self.markers.as_ref().map(|m| m as &dyn MarkerTrack)
    }

    fn transform(&self) -> Option<&dyn PropertyGroup> {
        self.transform.as_ref().map(|g| g as &dyn PropertyGroup)
    }

    fn effects(&self) -> Option<&dyn PropertyGroup> {
        self.effects.as_ref().map(|g| g as &dyn PropertyGroup)
    }
}

// ============================================================================
// Footage sources
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemSource {
    pub kind: SourceKind,
    #[serde(default)]
    pub attributes: MemObject,
    #[serde(default)]
    pub file: Option<FileRef>,
}

impl MemSource {
    pub fn new(kind: SourceKind) -> Self {
        Self { kind, attributes: MemObject::new(), file: None }
    }

    pub fn with(mut self, name: &str, value: impl Into<HostValue>) -> Self {
        self.attributes = self.attributes.with(name, value);
        self
    }

    pub fn with_file(mut self, file: FileRef) -> Self {
        self.file = Some(file);
        self
    }
}

impl FootageSource for MemSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn file(&self) -> Option<FileRef> {
        self.file.clone()
    }
}

// ============================================================================
// Markers
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct MemMarkerTrack {
    markers: Vec<MemMarker>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemMarker {
    pub time: MemAttr,
    pub attributes: MemObject,
    /// Reading the marker value object fails with this message.
    pub failure: Option<String>,
}

impl MemMarkerTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_marker(mut self, marker: MemMarker) -> Self {
        self.markers.push(marker);
        self
    }
}

impl MemMarker {
    pub fn new(time: f64) -> Self {
        Self { time: MemAttr::value(time), ..Self::default() }
    }

    /// Marker whose value object cannot be read.
    pub fn failing(time: f64, message: &str) -> Self {
        Self { failure: Some(message.to_string()), ..Self::new(time) }
    }

    pub fn with(mut self, name: &str, value: impl Into<HostValue>) -> Self {
        self.attributes = self.attributes.with(name, value);
        self
    }

    pub fn with_failure(mut self, name: &str, message: &str) -> Self {
        self.attributes = self.attributes.with_failure(name, message);
        self
    }
}

impl MarkerTrack for MemMarkerTrack {
    fn num_keys(&self) -> usize {
        self.markers.len()
    }

    fn key_time(&self, index: usize) -> Result<f64, ReadError> {
        nth(&self.markers, "marker", index)?.time.read_f64()
    }

    fn key_value(&self, index: usize) -> Result<&dyn HostObject, ReadError> {
        let marker = nth(&self.markers, "marker", index)?;
        match &marker.failure {
            Some(msg) => Err(ReadError::new(msg.clone())),
            None => Ok(&marker.attributes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_kinds() {
        let comp = MemItem::composition(1, "Main")
            .with_layer(MemLayer::new(LayerKind::Camera, 1, "Camera 1"));
        match comp.kind() {
            ItemKind::Composition(c) => assert_eq!(c.num_layers(), 1),
            _ => panic!("expected composition"),
        }
        // Layer builders on non-compositions are no-ops
        let folder =
            MemItem::folder(2, "Folder", vec![1]).with_layer(MemLayer::new(LayerKind::Av, 1, "x"));
        assert!(matches!(folder.kind(), ItemKind::Folder(_)));
    }

    #[test]
    fn test_layer_access() {
        let comp = MemComposition {
            layers: vec![
                MemLayer::new(LayerKind::Av, 1, "ok"),
                MemLayer::new(LayerKind::Av, 2, "bad").failing("Layer is invalid"),
            ],
            markers: None,
        };
        assert!(comp.layer(1).is_ok());
        assert_eq!(comp.layer(2).err().map(|e| e.to_string()), Some("Layer is invalid".into()));
        assert!(comp.layer(3).is_err());
    }

    #[test]
    fn test_marker_track() {
        let track = MemMarkerTrack::new().with_marker(MemMarker::new(1.5).with("comment", "a"));
        assert_eq!(track.key_time(1).unwrap(), 1.5);
        assert_eq!(track.key_value(1).unwrap().read("comment").unwrap(), HostValue::from("a"));
        assert!(track.key_time(2).is_err());
    }
}
