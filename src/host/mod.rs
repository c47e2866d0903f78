//! Host object model: the interface a compositing application exposes to the exporter.
//!
//! The exporter never owns or mutates host data. It borrows a [`Document`]
//! and walks it through the traits below:
//!
//! ```text
//! Document
//!   └── Item (Composition | Footage | Folder)
//!         ├── Composition ── Layer ── Transform / Effects (PropertyGroup)
//!         │                     └── MarkerTrack
//!         ├── Footage ── FootageSource
//!         └── Folder ── child item ids
//!   └── RenderQueue ── RenderQueueItem ── OutputModule
//!
//! PropertyGroup
//!   └── PropertyNode (Property | PropertyGroup)   recursive
//! ```
//!
//! Every node is also a [`HostObject`]: it can list its attribute names and
//! read any attribute by name. Reads are fallible one by one, which is what
//! lets the exporter isolate a single bad attribute.
//!
//! Indices are 1-based throughout, matching the host's addressing.

pub mod kinds;
pub mod value;

use serde::{Deserialize, Serialize};

pub use kinds::{KeyframeInterpolationType, LayerKind, PropertyType, PropertyValueType, SourceKind};
pub use value::HostValue;

/// Failure of a single host read, carrying the host's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadError {
    message: String,
}

impl ReadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    /// Accessor the node does not implement.
    pub fn unsupported(what: &str) -> Self {
        Self::new(format!("{} is not available on this object", what))
    }

    /// 1-based index outside `1..=count`.
    pub fn out_of_range(what: &str, index: usize, count: usize) -> Self {
        Self::new(format!("{} index {} out of range 1..={}", what, index, count))
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ReadError {}

/// File on disk referenced by a project, footage item or file source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Full platform path.
    pub path: String,
    /// File name without directory.
    pub name: String,
}

/// Back-reference to an item (never ownership).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: i64,
    pub name: String,
}

/// Back-reference to a layer in the same composition (never ownership).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRef {
    #[serde(default)]
    pub id: Option<i64>,
    pub index: usize,
    pub name: String,
}

/// Keyframe ease for one dimension of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyframeEase {
    pub speed: f64,
    pub influence: f64,
}

impl KeyframeEase {
    pub fn new(speed: f64, influence: f64) -> Self {
        Self { speed, influence }
    }
}

/// Attribute access shared by every host node.
pub trait HostObject {
    /// Names of the node's readable attributes, in host enumeration order.
    ///
    /// The order is not stable across host versions; consumers must treat
    /// the result as a set.
    fn attribute_names(&self) -> Vec<String>;

    /// Read one attribute. Names the node does not know read as `Undefined`.
    fn read(&self, name: &str) -> Result<HostValue, ReadError>;
}

/// Root of an open project.
pub trait Document: HostObject {
    fn num_items(&self) -> usize;

    /// Item at 1-based `index`, in the host's item order.
    fn item(&self, index: usize) -> Result<&dyn Item, ReadError>;

    /// Project file, `None` for a never-saved project.
    fn file(&self) -> Option<FileRef> {
        None
    }

    fn host_version(&self) -> Option<String> {
        None
    }

    fn host_build(&self) -> Option<String> {
        None
    }

    fn render_queue(&self) -> Option<&dyn RenderQueue> {
        None
    }
}

/// Item variant with its kind-specific interface.
#[derive(Clone, Copy)]
pub enum ItemKind<'a> {
    Composition(&'a dyn Composition),
    Footage(&'a dyn Footage),
    Folder(&'a dyn Folder),
}

/// Top-level project entry.
pub trait Item: HostObject {
    fn kind(&self) -> ItemKind<'_>;

    /// Containing folder; `None` when the item sits in the project root.
    fn parent_folder(&self) -> Result<Option<ItemRef>, ReadError>;
}

pub trait Composition {
    fn num_layers(&self) -> usize;

    /// Layer at 1-based `index`.
    fn layer(&self, index: usize) -> Result<&dyn Layer, ReadError>;

    /// Composition marker track.
    fn markers(&self) -> Option<&dyn MarkerTrack>;
}

pub trait Footage {
    /// Backing file, if file-backed.
    fn file(&self) -> Option<FileRef>;

    fn main_source(&self) -> Option<&dyn FootageSource>;
}

pub trait Folder {
    /// Ids of the direct children, in folder order.
    fn child_item_ids(&self) -> Result<Vec<i64>, ReadError>;
}

pub trait Layer: HostObject {
    fn kind(&self) -> LayerKind;

    /// Source item of an AV layer.
    fn source(&self) -> Option<ItemRef> {
        None
    }

    /// Parent layer; the host does not prevent cycles and neither do we.
    fn parent(&self) -> Result<Option<LayerRef>, ReadError>;

    fn markers(&self) -> Option<&dyn MarkerTrack>;

    /// Transform group (`ADBE Transform Group`).
    fn transform(&self) -> Option<&dyn PropertyGroup>;

    /// Effect parade (`ADBE Effect Parade`); each child group is one effect.
    fn effects(&self) -> Option<&dyn PropertyGroup>;
}

pub trait FootageSource: HostObject {
    fn kind(&self) -> SourceKind;

    /// Backing file of a file source.
    fn file(&self) -> Option<FileRef> {
        None
    }
}

pub trait RenderQueue: HostObject {
    fn num_items(&self) -> usize;

    /// Queue entry at 1-based `index`.
    fn item(&self, index: usize) -> Result<&dyn RenderQueueItem, ReadError>;
}

pub trait RenderQueueItem: HostObject {
    /// Name of the composition this entry renders.
    fn comp_name(&self) -> Result<String, ReadError>;

    /// "Render" checkbox.
    fn render(&self) -> Result<bool, ReadError>;

    /// Render settings object; its attribute names are the setting names.
    fn settings(&self) -> Result<&dyn HostObject, ReadError>;

    fn num_output_modules(&self) -> usize;

    /// Output module at 1-based `index`.
    fn output_module(&self, index: usize) -> Result<&dyn OutputModule, ReadError>;
}

pub trait OutputModule: HostObject {
    /// Output module settings object, read like render settings.
    fn settings(&self) -> Result<&dyn HostObject, ReadError>;
}

/// Time-indexed marker sequence of a composition or layer.
pub trait MarkerTrack {
    fn num_keys(&self) -> usize;

    fn key_time(&self, index: usize) -> Result<f64, ReadError>;

    /// Marker value object at 1-based `index`.
    fn key_value(&self, index: usize) -> Result<&dyn HostObject, ReadError>;
}

/// Child of a property group.
#[derive(Clone, Copy)]
pub enum PropertyNode<'a> {
    Property(&'a dyn Property),
    Group(&'a dyn PropertyGroup),
}

impl PropertyNode<'_> {
    pub fn name(&self) -> Result<String, ReadError> {
        match self {
            PropertyNode::Property(p) => p.name(),
            PropertyNode::Group(g) => g.name(),
        }
    }

    pub fn match_name(&self) -> Result<String, ReadError> {
        match self {
            PropertyNode::Property(p) => p.match_name(),
            PropertyNode::Group(g) => g.match_name(),
        }
    }
}

/// Identity shared by properties and property groups.
pub trait PropertyBase: HostObject {
    fn name(&self) -> Result<String, ReadError>;

    /// Stable machine identifier, independent of UI language.
    fn match_name(&self) -> Result<String, ReadError>;

    /// 1-based position within the parent group.
    fn property_index(&self) -> Result<usize, ReadError>;
}

pub trait PropertyGroup: PropertyBase {
    fn group_type(&self) -> PropertyType;

    /// Enabled switch of effects and similar toggleable groups.
    fn enabled(&self) -> Option<bool> {
        None
    }

    fn num_properties(&self) -> usize;

    /// Child at 1-based `index`.
    fn property(&self, index: usize) -> Result<PropertyNode<'_>, ReadError>;
}

/// Leaf property.
///
/// Only `value_type`, `value`, `num_keys`, `key_time` and `key_value` are
/// required; the optional accessors default to "not available", which the
/// exporter treats as an inapplicable feature.
pub trait Property: PropertyBase {
    fn value_type(&self) -> PropertyValueType;

    fn value(&self) -> Result<HostValue, ReadError>;

    fn can_set_expression(&self) -> bool {
        false
    }

    fn expression(&self) -> Result<String, ReadError> {
        Err(ReadError::unsupported("expression"))
    }

    fn expression_enabled(&self) -> Result<bool, ReadError> {
        Err(ReadError::unsupported("expressionEnabled"))
    }

    fn expression_error(&self) -> Result<String, ReadError> {
        Err(ReadError::unsupported("expressionError"))
    }

    fn is_spatial(&self) -> bool {
        self.value_type().is_spatial()
    }

    fn is_temporally_interpolatable(&self) -> bool {
        self.value_type().supports_temporal_ease()
    }

    fn num_keys(&self) -> usize;

    fn key_time(&self, index: usize) -> Result<f64, ReadError>;

    fn key_value(&self, index: usize) -> Result<HostValue, ReadError>;

    fn key_in_interpolation_type(
        &self,
        _index: usize,
    ) -> Result<KeyframeInterpolationType, ReadError> {
        Err(ReadError::unsupported("keyInInterpolationType"))
    }

    fn key_out_interpolation_type(
        &self,
        _index: usize,
    ) -> Result<KeyframeInterpolationType, ReadError> {
        Err(ReadError::unsupported("keyOutInterpolationType"))
    }

    fn key_in_spatial_tangent(&self, _index: usize) -> Result<Vec<f64>, ReadError> {
        Err(ReadError::unsupported("keyInSpatialTangent"))
    }

    fn key_out_spatial_tangent(&self, _index: usize) -> Result<Vec<f64>, ReadError> {
        Err(ReadError::unsupported("keyOutSpatialTangent"))
    }

    fn key_spatial_auto_bezier(&self, _index: usize) -> Result<bool, ReadError> {
        Err(ReadError::unsupported("keySpatialAutoBezier"))
    }

    fn key_spatial_continuous(&self, _index: usize) -> Result<bool, ReadError> {
        Err(ReadError::unsupported("keySpatialContinuous"))
    }

    fn key_roving(&self, _index: usize) -> Result<bool, ReadError> {
        Err(ReadError::unsupported("keyRoving"))
    }

    fn key_in_temporal_ease(&self, _index: usize) -> Result<Vec<KeyframeEase>, ReadError> {
        Err(ReadError::unsupported("keyInTemporalEase"))
    }

    fn key_out_temporal_ease(&self, _index: usize) -> Result<Vec<KeyframeEase>, ReadError> {
        Err(ReadError::unsupported("keyOutTemporalEase"))
    }

    fn key_temporal_auto_bezier(&self, _index: usize) -> Result<bool, ReadError> {
        Err(ReadError::unsupported("keyTemporalAutoBezier"))
    }

    fn key_temporal_continuous(&self, _index: usize) -> Result<bool, ReadError> {
        Err(ReadError::unsupported("keyTemporalContinuous"))
    }
}
