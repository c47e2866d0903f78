//! Keyframe extraction for animatable properties.
//!
//! Time and value are always present on a keyframe record. Everything else
//! is optional and read in independent groups:
//! - in/out interpolation, each on its own
//! - spatial group (tangents, auto-bezier, continuous, roving), spatial properties only
//! - temporal group (ease, auto-bezier, continuous), interpolatable value types only
//!
//! A failure inside a group drops that group and nothing else.

use serde::Serialize;
use serde_json::Value;

use super::attrs::FieldValue;
use crate::host::value::number_to_json;
use crate::host::{KeyframeEase, KeyframeInterpolationType, Property, ReadError};

/// One keyframe of a property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyframeSnapshot {
    /// 1-based key index.
    pub index: usize,
    pub time: FieldValue,
    pub value: FieldValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_interpolation_type: Option<KeyframeInterpolationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_interpolation_type: Option<KeyframeInterpolationType>,
    #[serde(flatten)]
    pub spatial: Option<SpatialKeyframe>,
    #[serde(flatten)]
    pub temporal: Option<TemporalKeyframe>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialKeyframe {
    pub in_spatial_tangent: Value,
    pub out_spatial_tangent: Value,
    pub spatial_auto_bezier: bool,
    pub spatial_continuous: bool,
    pub roving: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporalKeyframe {
    pub in_temporal_ease: Vec<EaseSnapshot>,
    pub out_temporal_ease: Vec<EaseSnapshot>,
    pub temporal_auto_bezier: bool,
    pub temporal_continuous: bool,
}

/// Ease of one value dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EaseSnapshot {
    pub speed: Value,
    pub influence: Value,
}

impl From<KeyframeEase> for EaseSnapshot {
    fn from(ease: KeyframeEase) -> Self {
        Self {
            speed: number_to_json(ease.speed),
            influence: number_to_json(ease.influence),
        }
    }
}

/// Extract all keyframes of `property`, in key order.
///
/// Returns an empty vec for a property without keys.
pub fn extract_keyframes(property: &dyn Property) -> Vec<KeyframeSnapshot> {
    let num_keys = property.num_keys();
    if num_keys == 0 {
        return Vec::new();
    }
    let spatial = property.is_spatial();
    let temporal = property.is_temporally_interpolatable();

    (1..=num_keys)
        .map(|index| KeyframeSnapshot {
            index,
            time: FieldValue::from_result(property.key_time(index)),
            value: FieldValue::required(property.key_value(index)),
            in_interpolation_type: property.key_in_interpolation_type(index).ok(),
            out_interpolation_type: property.key_out_interpolation_type(index).ok(),
            spatial: if spatial {
                optional_group(read_spatial(property, index), "spatial", index)
            } else {
                None
            },
            temporal: if temporal {
                optional_group(read_temporal(property, index), "temporal", index)
            } else {
                None
            },
        })
        .collect()
}

fn optional_group<T>(result: Result<T, ReadError>, group: &str, index: usize) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            log::trace!("key {}: {} group omitted: {}", index, group, e);
            None
        }
    }
}

fn read_spatial(property: &dyn Property, index: usize) -> Result<SpatialKeyframe, ReadError> {
    Ok(SpatialKeyframe {
        in_spatial_tangent: numbers(&property.key_in_spatial_tangent(index)?),
        out_spatial_tangent: numbers(&property.key_out_spatial_tangent(index)?),
        spatial_auto_bezier: property.key_spatial_auto_bezier(index)?,
        spatial_continuous: property.key_spatial_continuous(index)?,
        roving: property.key_roving(index)?,
    })
}

fn read_temporal(property: &dyn Property, index: usize) -> Result<TemporalKeyframe, ReadError> {
    Ok(TemporalKeyframe {
        in_temporal_ease: ease_list(property.key_in_temporal_ease(index)?),
        out_temporal_ease: ease_list(property.key_out_temporal_ease(index)?),
        temporal_auto_bezier: property.key_temporal_auto_bezier(index)?,
        temporal_continuous: property.key_temporal_continuous(index)?,
    })
}

fn ease_list(eases: Vec<KeyframeEase>) -> Vec<EaseSnapshot> {
    eases.into_iter().map(Into::into).collect()
}

fn numbers(values: &[f64]) -> Value {
    Value::Array(values.iter().copied().map(number_to_json).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostValue, PropertyValueType};
    use crate::memory::{MemKeyframe, MemProperty, MemSpatial, MemTemporal};
    use serde_json::json;

    fn spatial() -> MemSpatial {
        MemSpatial {
            in_tangent: vec![0.0, 0.0],
            out_tangent: vec![10.5, 0.0],
            auto_bezier: false,
            continuous: true,
            roving: false,
        }
    }

    fn temporal(dims: usize) -> MemTemporal {
        MemTemporal {
            in_ease: vec![KeyframeEase::new(0.0, 16.666667); dims],
            out_ease: vec![KeyframeEase::new(0.0, 33.0); dims],
            auto_bezier: false,
            continuous: false,
        }
    }

    #[test]
    fn test_no_keys() {
        let prop =
            MemProperty::new("Opacity", "ADBE Opacity", PropertyValueType::OneD).with_value(100.0);
        assert!(extract_keyframes(&prop).is_empty());
    }

    #[test]
    fn test_spatial_property_shape() {
        let key = |time: f64, x: f64| {
            MemKeyframe::linear(time, [x, 50.0]).with_spatial(spatial()).with_temporal(temporal(1))
        };
        let prop = MemProperty::new("Position", "ADBE Position", PropertyValueType::TwoDSpatial)
            .with_keyframe(key(0.0, 0.0))
            .with_keyframe(key(5.0, 100.0));

        let keys = extract_keyframes(&prop);
        assert_eq!(keys.len(), 2);
        let json = serde_json::to_value(&keys[0]).unwrap();
        assert_eq!(json["index"], 1);
        assert_eq!(json["time"], 0);
        assert_eq!(json["value"], json!([0, 50]));
        assert_eq!(json["inInterpolationType"], "LINEAR");
        assert_eq!(json["outInterpolationType"], "LINEAR");
        assert_eq!(json["outSpatialTangent"], json!([10.5, 0]));
        assert_eq!(json["spatialContinuous"], true);
        assert_eq!(json["inTemporalEase"].as_array().unwrap().len(), 1);
        assert_eq!(keys[1].time, FieldValue::Value(json!(5)));
    }

    #[test]
    fn test_non_spatial_has_no_tangents() {
        let key = MemKeyframe::linear(0.0, [100.0, 100.0, 100.0])
            .with_spatial(spatial())
            .with_temporal(temporal(3));
        let prop =
            MemProperty::new("Scale", "ADBE Scale", PropertyValueType::ThreeD).with_keyframe(key);

        let json = serde_json::to_value(&extract_keyframes(&prop)[0]).unwrap();
        let spatial_keys = [
            "inSpatialTangent",
            "outSpatialTangent",
            "spatialAutoBezier",
            "spatialContinuous",
            "roving",
        ];
        for key in spatial_keys {
            assert!(json.get(key).is_none(), "unexpected {}", key);
        }
        assert_eq!(json["outTemporalEase"].as_array().unwrap().len(), 3);
        assert_eq!(json["outTemporalEase"][0], json!({"speed": 0, "influence": 33}));
    }

    #[test]
    fn test_discrete_value_has_no_ease() {
        let prop =
            MemProperty::new("Layer", "ADBE Layer Control-0001", PropertyValueType::LayerIndex)
                .with_keyframe(MemKeyframe::new(0.0, 1.0).with_temporal(temporal(1)));

        let json = serde_json::to_value(&extract_keyframes(&prop)[0]).unwrap();
        let temporal_keys =
            ["inTemporalEase", "outTemporalEase", "temporalAutoBezier", "temporalContinuous"];
        for key in temporal_keys {
            assert!(json.get(key).is_none(), "unexpected {}", key);
        }
        // Interpolation was never set
        assert!(json.get("inInterpolationType").is_none());
    }

    #[test]
    fn test_mandatory_fields_keep_shape() {
        let prop = MemProperty::new("Rotation", "ADBE Rotate Z", PropertyValueType::OneD)
            .with_keyframe(MemKeyframe::new(1.0, HostValue::Undefined))
            .with_keyframe(MemKeyframe::failing_value(2.0, "Unable to read key value"));

        let keys = extract_keyframes(&prop);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].value, FieldValue::Undefined);
        assert_eq!(keys[1].value, FieldValue::Error("Unable to read key value".into()));
        assert_eq!(keys[1].time, FieldValue::Value(json!(2)));
        // Temporal data missing on an interpolatable property: group omitted
        assert!(keys[0].temporal.is_none());
    }
}
