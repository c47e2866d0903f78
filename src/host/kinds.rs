//! Closed sets of node kinds and host enumerations.
//!
//! Every family the exporter dispatches on (layers, footage sources,
//! property groups) is a plain enum so that adding a kind is a
//! compile-checked change in every `match`.

use serde::{Deserialize, Serialize};

/// Layer variant, most specific first.
///
/// Text, Shape and Av are the AV family: they reference a source item and
/// carry the AV layer attribute set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerKind {
    Camera,
    Light,
    Text,
    Shape,
    Av,
    Generic,
}

impl LayerKind {
    /// Host class name written as `layerType`.
    pub fn type_name(self) -> &'static str {
        match self {
            LayerKind::Camera => "CameraLayer",
            LayerKind::Light => "LightLayer",
            LayerKind::Text => "TextLayer",
            LayerKind::Shape => "ShapeLayer",
            LayerKind::Av => "AVLayer",
            LayerKind::Generic => "Layer",
        }
    }

    pub fn is_av(self) -> bool {
        matches!(self, LayerKind::Text | LayerKind::Shape | LayerKind::Av)
    }
}

/// Footage source variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceKind {
    Solid,
    File,
    Placeholder,
    Generic,
}

impl SourceKind {
    /// Host class name written as `sourceType`.
    pub fn type_name(self) -> &'static str {
        match self {
            SourceKind::Solid => "SolidSource",
            SourceKind::File => "FileSource",
            SourceKind::Placeholder => "PlaceholderSource",
            SourceKind::Generic => "FootageSource",
        }
    }
}

/// `PropertyType` of the host: leaf property or one of the two group kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    Property,
    #[default]
    NamedGroup,
    IndexedGroup,
}

/// `PropertyValueType` of the host, spelled the way its scripting API spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PropertyValueType {
    #[serde(rename = "NO_VALUE")]
    NoValue,
    #[serde(rename = "ThreeD_SPATIAL")]
    ThreeDSpatial,
    #[serde(rename = "ThreeD")]
    ThreeD,
    #[serde(rename = "TwoD_SPATIAL")]
    TwoDSpatial,
    #[serde(rename = "TwoD")]
    TwoD,
    #[default]
    #[serde(rename = "OneD")]
    OneD,
    #[serde(rename = "COLOR")]
    Color,
    #[serde(rename = "CUSTOM_VALUE")]
    CustomValue,
    #[serde(rename = "MARKER")]
    Marker,
    #[serde(rename = "LAYER_INDEX")]
    LayerIndex,
    #[serde(rename = "MASK_INDEX")]
    MaskIndex,
    #[serde(rename = "SHAPE")]
    Shape,
    #[serde(rename = "TEXT_DOCUMENT")]
    TextDocument,
}

impl PropertyValueType {
    /// Spatial values carry in/out tangents, auto-bezier, continuous and roving.
    pub fn is_spatial(self) -> bool {
        matches!(self, PropertyValueType::TwoDSpatial | PropertyValueType::ThreeDSpatial)
    }

    /// Continuously variable values support temporal ease.
    ///
    /// Discrete values (layer/mask indices, text documents, markers, custom
    /// data) only hold between keys, so ease is meaningless for them.
    pub fn supports_temporal_ease(self) -> bool {
        matches!(
            self,
            PropertyValueType::OneD
                | PropertyValueType::TwoD
                | PropertyValueType::TwoDSpatial
                | PropertyValueType::ThreeD
                | PropertyValueType::ThreeDSpatial
                | PropertyValueType::Color
                | PropertyValueType::Shape
        )
    }
}

/// `KeyframeInterpolationType` of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyframeInterpolationType {
    Linear,
    Bezier,
    Hold,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_kind_names() {
        assert_eq!(LayerKind::Av.type_name(), "AVLayer");
        assert_eq!(LayerKind::Generic.type_name(), "Layer");
        assert!(LayerKind::Text.is_av());
        assert!(!LayerKind::Camera.is_av());
        assert!(!LayerKind::Light.is_av());
    }

    #[test]
    fn test_value_type_capabilities() {
        assert!(PropertyValueType::TwoDSpatial.is_spatial());
        assert!(!PropertyValueType::OneD.is_spatial());
        assert!(PropertyValueType::OneD.supports_temporal_ease());
        assert!(!PropertyValueType::LayerIndex.supports_temporal_ease());
        assert!(!PropertyValueType::TextDocument.supports_temporal_ease());
        assert!(PropertyValueType::ThreeDSpatial.supports_temporal_ease());
    }

    #[test]
    fn test_host_spelling() {
        let v = serde_json::to_value(PropertyValueType::TwoDSpatial).unwrap();
        assert_eq!(v, "TwoD_SPATIAL");
        let t = serde_json::to_value(KeyframeInterpolationType::Linear).unwrap();
        assert_eq!(t, "LINEAR");
        let g = serde_json::to_value(PropertyType::IndexedGroup).unwrap();
        assert_eq!(g, "INDEXED_GROUP");
    }
}
