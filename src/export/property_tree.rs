//! Recursive export of property groups (transform, effects, nested groups).
//!
//! The walk is bounded by `ExportConfig::max_property_depth`. The root group
//! is depth 0; a group deeper than the bound is left out together with its
//! whole subtree. There is no visited set: the bound alone stops cycles.
//!
//! A child that cannot be read is skipped with a warning. Its siblings are
//! still exported.

use serde::Serialize;

use super::attr_schemas::{PROPERTY_GROUP_SCHEMA, PROPERTY_SCHEMA};
use super::attrs::{Attributes, FieldValue, collect};
use super::keyframes::{KeyframeSnapshot, extract_keyframes};
use super::keys::{MN_MARKER, PROPERTY_RESERVED};
use crate::config::ExportConfig;
use crate::host::{
    Property, PropertyGroup, PropertyNode, PropertyType, PropertyValueType, ReadError,
};

/// Exported property group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyGroupSnapshot {
    pub name: String,
    pub match_name: String,
    pub property_index: usize,
    pub property_type: PropertyType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(flatten)]
    pub attributes: Attributes,
    pub properties: Vec<PropertyNodeSnapshot>,
}

/// Exported leaf property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySnapshot {
    pub name: String,
    pub match_name: String,
    pub property_index: usize,
    pub property_type: PropertyType,
    pub property_value_type: PropertyValueType,
    /// Absent when the current value is not simple.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,
    pub can_set_expression: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_enabled: Option<FieldValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_error: Option<FieldValue>,
    #[serde(flatten)]
    pub attributes: Attributes,
    pub num_keys: usize,
    pub keyframes: Vec<KeyframeSnapshot>,
}

/// Child of an exported group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyNodeSnapshot {
    Property(PropertySnapshot),
    Group(PropertyGroupSnapshot),
}

impl PropertyNodeSnapshot {
    pub fn match_name(&self) -> &str {
        match self {
            PropertyNodeSnapshot::Property(p) => &p.match_name,
            PropertyNodeSnapshot::Group(g) => &g.match_name,
        }
    }

    pub fn as_group(&self) -> Option<&PropertyGroupSnapshot> {
        match self {
            PropertyNodeSnapshot::Group(g) => Some(g),
            PropertyNodeSnapshot::Property(_) => None,
        }
    }

    pub fn as_property(&self) -> Option<&PropertySnapshot> {
        match self {
            PropertyNodeSnapshot::Property(p) => Some(p),
            PropertyNodeSnapshot::Group(_) => None,
        }
    }
}

impl PropertyGroupSnapshot {
    /// Direct child by match name.
    pub fn child(&self, match_name: &str) -> Option<&PropertyNodeSnapshot> {
        self.properties.iter().find(|c| c.match_name() == match_name)
    }

    /// Number of group levels below this one, 0 for a group with no subgroups.
    pub fn nesting_depth(&self) -> usize {
        self.properties
            .iter()
            .filter_map(PropertyNodeSnapshot::as_group)
            .map(|g| 1 + g.nesting_depth())
            .max()
            .unwrap_or(0)
    }
}

/// Walk `group` at `depth`.
///
/// `None` when the group is absent, lies beyond the depth bound, or its own
/// identity cannot be read.
pub fn walk_group(
    group: Option<&dyn PropertyGroup>,
    depth: usize,
    config: &ExportConfig,
) -> Option<PropertyGroupSnapshot> {
    let group = group?;
    if depth > config.max_property_depth {
        log::trace!("depth {} beyond bound {}, subtree omitted", depth, config.max_property_depth);
        return None;
    }
    match export_group(group, depth, config) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            log::warn!("Property group skipped: {}", e);
            None
        }
    }
}

fn export_group(
    group: &dyn PropertyGroup,
    depth: usize,
    config: &ExportConfig,
) -> Result<PropertyGroupSnapshot, ReadError> {
    let name = group.name()?;
    let match_name = group.match_name()?;
    let property_index = group.property_index()?;

    let mut properties = Vec::new();
    for index in 1..=group.num_properties() {
        match export_child(group, index, depth, config) {
            Ok(Some(child)) => properties.push(child),
            Ok(None) => {}
            Err(e) => log::warn!("Property {} of '{}' skipped: {}", index, name, e),
        }
    }

    Ok(PropertyGroupSnapshot {
        name,
        match_name,
        property_index,
        property_type: group.group_type(),
        enabled: group.enabled(),
        attributes: collect(group, &[&PROPERTY_GROUP_SCHEMA], config).without(PROPERTY_RESERVED),
        properties,
    })
}

fn export_child(
    group: &dyn PropertyGroup,
    index: usize,
    depth: usize,
    config: &ExportConfig,
) -> Result<Option<PropertyNodeSnapshot>, ReadError> {
    let child = group.property(index)?;
    if child.match_name()? == MN_MARKER {
        return Ok(None);
    }
    match child {
        PropertyNode::Property(property) => {
            Ok(Some(PropertyNodeSnapshot::Property(export_property(property, config)?)))
        }
        PropertyNode::Group(sub) => {
            if depth + 1 > config.max_property_depth {
                log::trace!("'{}' beyond depth bound, omitted", sub.name().unwrap_or_default());
                return Ok(None);
            }
            Ok(Some(PropertyNodeSnapshot::Group(export_group(sub, depth + 1, config)?)))
        }
    }
}

/// Export one leaf property.
///
/// Identity failures are returned to the caller; everything else is guarded
/// per field.
pub fn export_property(
    property: &dyn Property,
    config: &ExportConfig,
) -> Result<PropertySnapshot, ReadError> {
    let name = property.name()?;
    let match_name = property.match_name()?;
    let property_index = property.property_index()?;
    log::trace!("property {} ({})", name, match_name);

    let can_set_expression = property.can_set_expression();
    let (expression, expression_enabled, expression_error) = if can_set_expression {
        (
            Some(FieldValue::from_result(property.expression())),
            Some(FieldValue::from_result(property.expression_enabled())),
            Some(FieldValue::from_result(property.expression_error())),
        )
    } else {
        (None, None, None)
    };

    let keyframes = extract_keyframes(property);
    Ok(PropertySnapshot {
        name,
        match_name,
        property_index,
        property_type: PropertyType::Property,
        property_value_type: property.value_type(),
        value: FieldValue::from_read(property.value()),
        can_set_expression,
        expression,
        expression_enabled,
        expression_error,
        attributes: collect(property, &[&PROPERTY_SCHEMA], config).without(PROPERTY_RESERVED),
        num_keys: keyframes.len(),
        keyframes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostObject, HostValue};
    use crate::memory::{MemGroup, MemKeyframe, MemProperty};
    use serde_json::json;

    fn amount(value: f64) -> MemProperty {
        MemProperty::new("Amount", "ADBE Amount", PropertyValueType::OneD).with_value(value)
    }

    fn property_json(prop: &MemProperty) -> serde_json::Value {
        serde_json::to_value(export_property(prop, &ExportConfig::default()).unwrap()).unwrap()
    }

    /// Chain of `levels` nested groups under a root, each holding one property.
    fn nested(levels: usize) -> MemGroup {
        let mut group = MemGroup::new(format!("Level {}", levels), format!("ADBE Group {}", levels))
            .with_property(amount(levels as f64));
        for level in (0..levels).rev() {
            group = MemGroup::new(format!("Level {}", level), format!("ADBE Group {}", level))
                .with_property(amount(level as f64))
                .with_group(group);
        }
        group
    }

    #[test]
    fn test_within_bound() {
        let root = nested(3);
        let snapshot = walk_group(Some(&root), 0, &ExportConfig::default()).unwrap();
        assert_eq!(snapshot.nesting_depth(), 3);
        let l1 = snapshot.child("ADBE Group 1").and_then(PropertyNodeSnapshot::as_group).unwrap();
        assert_eq!(l1.properties.len(), 2);
        assert_eq!(l1.property_index, 2);
    }

    #[test]
    fn test_depth_bound() {
        let root = nested(5);
        let config = ExportConfig::default().with_max_property_depth(3);
        let snapshot = walk_group(Some(&root), 0, &config).unwrap();
        assert_eq!(snapshot.nesting_depth(), 3);

        // Deepest kept group has its property but no subgroup
        let mut group = &snapshot;
        for level in 1..=3 {
            group = group
                .child(&format!("ADBE Group {}", level))
                .and_then(PropertyNodeSnapshot::as_group)
                .unwrap();
        }
        assert_eq!(group.properties.len(), 1);
        assert!(group.child("ADBE Group 4").is_none());

        assert!(walk_group(Some(&root), 4, &config).is_none());
        assert!(walk_group(None, 0, &config).is_none());
    }

    /// Group that contains itself, like a host structure with a back-edge.
    struct Mirror;

    impl HostObject for Mirror {
        fn attribute_names(&self) -> Vec<String> {
            Vec::new()
        }

        fn read(&self, _name: &str) -> Result<HostValue, ReadError> {
            Ok(HostValue::Undefined)
        }
    }

    impl crate::host::PropertyBase for Mirror {
        fn name(&self) -> Result<String, ReadError> {
            Ok("Mirror".into())
        }

        fn match_name(&self) -> Result<String, ReadError> {
            Ok("ADBE Mirror".into())
        }

        fn property_index(&self) -> Result<usize, ReadError> {
            Ok(1)
        }
    }

    impl PropertyGroup for Mirror {
        fn group_type(&self) -> PropertyType {
            PropertyType::NamedGroup
        }

        fn num_properties(&self) -> usize {
            1
        }

        fn property(&self, _index: usize) -> Result<PropertyNode<'_>, ReadError> {
            Ok(PropertyNode::Group(self))
        }
    }

    #[test]
    fn test_cycle_terminates() {
        let snapshot = walk_group(Some(&Mirror), 0, &ExportConfig::default()).unwrap();
        assert_eq!(snapshot.nesting_depth(), 10);
    }

    #[test]
    fn test_marker_group_and_failed_child_skipped() {
        let root = MemGroup::new("Transform", "ADBE Transform Group")
            .with_group(MemGroup::new("Marker", MN_MARKER))
            .with_property(
                MemProperty::new("Broken", "ADBE Broken", PropertyValueType::OneD)
                    .failing("Object is invalid"),
            )
            .with_property(
                MemProperty::new("Opacity", "ADBE Opacity", PropertyValueType::OneD)
                    .with_value(100.0),
            );

        let snapshot = walk_group(Some(&root), 0, &ExportConfig::default()).unwrap();
        assert_eq!(snapshot.properties.len(), 1);
        let opacity =
            snapshot.child("ADBE Opacity").and_then(PropertyNodeSnapshot::as_property).unwrap();
        assert_eq!(opacity.property_index, 3);
        assert_eq!(opacity.value, Some(FieldValue::Value(json!(100))));
    }

    #[test]
    fn test_property_record() {
        let prop = MemProperty::new("Position", "ADBE Position", PropertyValueType::TwoDSpatial)
            .with_value([960.0, 540.0])
            .with_expression("wiggle(2, 10)", true, "")
            .with_attr("isTimeVarying", true)
            .with_keyframe(MemKeyframe::linear(0.0, [0.0, 50.0]));

        let json = property_json(&prop);
        assert_eq!(json["propertyType"], "PROPERTY");
        assert_eq!(json["propertyValueType"], "TwoD_SPATIAL");
        assert_eq!(json["value"], json!([960, 540]));
        assert_eq!(json["canSetExpression"], true);
        assert_eq!(json["expression"], "wiggle(2, 10)");
        assert_eq!(json["expressionEnabled"], true);
        assert_eq!(json["isTimeVarying"], true);
        assert_eq!(json["numKeys"], 1);
    }

    #[test]
    fn test_non_simple_value_omitted() {
        let prop =
            MemProperty::new("Source Text", "ADBE Text Document", PropertyValueType::TextDocument)
                .with_value(HostValue::Object("TextDocument".into()));
        let json = property_json(&prop);
        assert!(json.get("value").is_none());
        assert!(json.get("expression").is_none());
        assert_eq!(json["keyframes"], json!([]));
    }

    #[test]
    fn test_unreadable_value() {
        let prop = MemProperty::new("Opacity", "ADBE Opacity", PropertyValueType::OneD)
            .with_value_failure("Value is not available at this time");
        let json = property_json(&prop);
        assert_eq!(json["value"], json!({"_error": "Value is not available at this time"}));
        assert_eq!(json["matchName"], "ADBE Opacity");
    }

    #[test]
    fn test_enabled_flag() {
        let effect = MemGroup::new("Gaussian Blur", "ADBE Gaussian Blur 2").with_enabled(false);
        let snapshot = walk_group(Some(&effect), 0, &ExportConfig::default()).unwrap();
        let json = serde_json::to_value(snapshot).unwrap();
        assert_eq!(json["enabled"], false);
        assert_eq!(json["propertyType"], "NAMED_GROUP");
        assert_eq!(json["properties"], json!([]));
    }
}
