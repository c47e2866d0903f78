//! In-memory property groups, properties and keyframes.

use serde::Deserialize;

use super::{MemAttr, MemObject, nth};
use crate::host::{
    HostValue, KeyframeEase, KeyframeInterpolationType, Property, PropertyBase, PropertyGroup,
    PropertyNode, PropertyType, PropertyValueType, ReadError,
};

/// Child of a [`MemGroup`], tagged by `node` in descriptions.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "node", rename_all = "camelCase")]
pub enum MemNode {
    Property(MemProperty),
    Group(MemGroup),
}

impl MemNode {
    fn failure(&self) -> Option<&String> {
        match self {
            MemNode::Property(p) => p.failure.as_ref(),
            MemNode::Group(g) => g.failure.as_ref(),
        }
    }

    fn set_index(&mut self, index: usize) {
        match self {
            MemNode::Property(p) => {
                if p.property_index == 0 {
                    p.property_index = index;
                }
            }
            MemNode::Group(g) => {
                if g.property_index == 0 {
                    g.property_index = index;
                }
                g.rebuild_indices();
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemGroup {
    pub name: String,
    pub match_name: String,
    /// 1-based; 0 means "position in parent", filled by `rebuild_indices`.
    #[serde(default)]
    pub property_index: usize,
    #[serde(default)]
    pub group_type: PropertyType,
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub attributes: MemObject,
    /// Accessing this group from its parent fails with this message.
    #[serde(default)]
    pub failure: Option<String>,
    #[serde(default)]
    pub children: Vec<MemNode>,
}

impl MemGroup {
    pub fn new(name: impl Into<String>, match_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            match_name: match_name.into(),
            property_index: 1,
            group_type: PropertyType::NamedGroup,
            enabled: None,
            attributes: MemObject::new(),
            failure: None,
            children: Vec::new(),
        }
    }

    pub fn with_group_type(mut self, group_type: PropertyType) -> Self {
        self.group_type = group_type;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<HostValue>) -> Self {
        self.attributes = self.attributes.with(name, value);
        self
    }

    pub fn with_property(mut self, mut property: MemProperty) -> Self {
        property.property_index = self.children.len() + 1;
        self.children.push(MemNode::Property(property));
        self
    }

    pub fn with_group(mut self, mut group: MemGroup) -> Self {
        group.property_index = self.children.len() + 1;
        self.children.push(MemNode::Group(group));
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Fill unset child indices from child positions, recursively.
    pub fn rebuild_indices(&mut self) {
        if self.property_index == 0 {
            self.property_index = 1;
        }
        for (i, child) in self.children.iter_mut().enumerate() {
            child.set_index(i + 1);
        }
    }
}

impl PropertyBase for MemGroup {
    fn name(&self) -> Result<String, ReadError> {
        Ok(self.name.clone())
    }

    fn match_name(&self) -> Result<String, ReadError> {
        Ok(self.match_name.clone())
    }

    fn property_index(&self) -> Result<usize, ReadError> {
        Ok(self.property_index)
    }
}

impl PropertyGroup for MemGroup {
    fn group_type(&self) -> PropertyType {
        self.group_type
    }

    fn enabled(&self) -> Option<bool> {
        self.enabled
    }

    fn num_properties(&self) -> usize {
        self.children.len()
    }

    fn property(&self, index: usize) -> Result<PropertyNode<'_>, ReadError> {
        let child = nth(&self.children, "property", index)?;
        if let Some(msg) = child.failure() {
            return Err(ReadError::new(msg.clone()));
        }
        Ok(match child {
            MemNode::Property(p) => PropertyNode::Property(p),
            MemNode::Group(g) => PropertyNode::Group(g),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemExpression {
    pub text: String,
    pub enabled: bool,
    pub error: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemProperty {
    pub name: String,
    pub match_name: String,
    #[serde(default)]
    pub property_index: usize,
    #[serde(default)]
    pub value_type: PropertyValueType,
    #[serde(default)]
    pub value: MemAttr,
    #[serde(default)]
    pub can_set_expression: bool,
    #[serde(default)]
    pub expression: Option<MemExpression>,
    #[serde(default)]
    pub attributes: MemObject,
    #[serde(default)]
    pub failure: Option<String>,
    #[serde(default)]
    pub keyframes: Vec<MemKeyframe>,
}

impl MemProperty {
    pub fn new(
        name: impl Into<String>,
        match_name: impl Into<String>,
        value_type: PropertyValueType,
    ) -> Self {
        Self {
            name: name.into(),
            match_name: match_name.into(),
            property_index: 1,
            value_type,
            value: MemAttr::default(),
            can_set_expression: false,
            expression: None,
            attributes: MemObject::new(),
            failure: None,
            keyframes: Vec::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<HostValue>) -> Self {
        self.value = MemAttr::value(value);
        self
    }

    pub fn with_value_failure(mut self, message: &str) -> Self {
        self.value = MemAttr::fails(message);
        self
    }

    pub fn with_expression(mut self, text: &str, enabled: bool, error: &str) -> Self {
        self.can_set_expression = true;
        self.expression = Some(MemExpression { text: text.into(), enabled, error: error.into() });
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<HostValue>) -> Self {
        self.attributes = self.attributes.with(name, value);
        self
    }

    pub fn with_keyframe(mut self, keyframe: MemKeyframe) -> Self {
        self.keyframes.push(keyframe);
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    fn key(&self, index: usize) -> Result<&MemKeyframe, ReadError> {
        nth(&self.keyframes, "key", index)
    }

    fn spatial(&self, index: usize) -> Result<&MemSpatial, ReadError> {
        if !self.is_spatial() {
            return Err(ReadError::new("spatial data is only available on spatial properties"));
        }
        self.key(index)?
            .spatial
            .as_ref()
            .ok_or_else(|| ReadError::unsupported("spatial keyframe data"))
    }

    fn temporal(&self, index: usize) -> Result<&MemTemporal, ReadError> {
        if !self.is_temporally_interpolatable() {
            return Err(ReadError::new("temporal ease is not available for this value type"));
        }
        self.key(index)?
            .temporal
            .as_ref()
            .ok_or_else(|| ReadError::unsupported("temporal keyframe data"))
    }

    fn expression_field<T>(
        &self,
        what: &str,
        get: impl FnOnce(&MemExpression) -> T,
    ) -> Result<T, ReadError>
    where
        T: Default,
    {
        if !self.can_set_expression {
            return Err(ReadError::unsupported(what));
        }
        Ok(self.expression.as_ref().map(get).unwrap_or_default())
    }
}

impl PropertyBase for MemProperty {
    fn name(&self) -> Result<String, ReadError> {
        Ok(self.name.clone())
    }

    fn match_name(&self) -> Result<String, ReadError> {
        Ok(self.match_name.clone())
    }

    fn property_index(&self) -> Result<usize, ReadError> {
        Ok(self.property_index)
    }
}

impl Property for MemProperty {
    fn value_type(&self) -> PropertyValueType {
        self.value_type
    }

    fn value(&self) -> Result<HostValue, ReadError> {
        self.value.read()
    }

    fn can_set_expression(&self) -> bool {
        self.can_set_expression
    }

    fn expression(&self) -> Result<String, ReadError> {
        self.expression_field("expression", |e| e.text.clone())
    }

    fn expression_enabled(&self) -> Result<bool, ReadError> {
        self.expression_field("expressionEnabled", |e| e.enabled)
    }

    fn expression_error(&self) -> Result<String, ReadError> {
        self.expression_field("expressionError", |e| e.error.clone())
    }

    fn num_keys(&self) -> usize {
        self.keyframes.len()
    }

    fn key_time(&self, index: usize) -> Result<f64, ReadError> {
        self.key(index)?.time.read_f64()
    }

    fn key_value(&self, index: usize) -> Result<HostValue, ReadError> {
        self.key(index)?.value.read()
    }

    fn key_in_interpolation_type(
        &self,
        index: usize,
    ) -> Result<KeyframeInterpolationType, ReadError> {
        self.key(index)?
            .in_interpolation
            .ok_or_else(|| ReadError::unsupported("keyInInterpolationType"))
    }

    fn key_out_interpolation_type(
        &self,
        index: usize,
    ) -> Result<KeyframeInterpolationType, ReadError> {
        self.key(index)?
            .out_interpolation
            .ok_or_else(|| ReadError::unsupported("keyOutInterpolationType"))
    }

    fn key_in_spatial_tangent(&self, index: usize) -> Result<Vec<f64>, ReadError> {
        Ok(self.spatial(index)?.in_tangent.clone())
    }

    fn key_out_spatial_tangent(&self, index: usize) -> Result<Vec<f64>, ReadError> {
        Ok(self.spatial(index)?.out_tangent.clone())
    }

    fn key_spatial_auto_bezier(&self, index: usize) -> Result<bool, ReadError> {
        Ok(self.spatial(index)?.auto_bezier)
    }

    fn key_spatial_continuous(&self, index: usize) -> Result<bool, ReadError> {
        Ok(self.spatial(index)?.continuous)
    }

    fn key_roving(&self, index: usize) -> Result<bool, ReadError> {
        Ok(self.spatial(index)?.roving)
    }

    fn key_in_temporal_ease(&self, index: usize) -> Result<Vec<KeyframeEase>, ReadError> {
        Ok(self.temporal(index)?.in_ease.clone())
    }

    fn key_out_temporal_ease(&self, index: usize) -> Result<Vec<KeyframeEase>, ReadError> {
        Ok(self.temporal(index)?.out_ease.clone())
    }

    fn key_temporal_auto_bezier(&self, index: usize) -> Result<bool, ReadError> {
        Ok(self.temporal(index)?.auto_bezier)
    }

    fn key_temporal_continuous(&self, index: usize) -> Result<bool, ReadError> {
        Ok(self.temporal(index)?.continuous)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemKeyframe {
    pub time: MemAttr,
    pub value: MemAttr,
    pub in_interpolation: Option<KeyframeInterpolationType>,
    pub out_interpolation: Option<KeyframeInterpolationType>,
    pub spatial: Option<MemSpatial>,
    pub temporal: Option<MemTemporal>,
}

impl MemKeyframe {
    pub fn new(time: f64, value: impl Into<HostValue>) -> Self {
        Self {
            time: MemAttr::value(time),
            value: MemAttr::value(value),
            ..Self::default()
        }
    }

    /// Key with linear in and out interpolation.
    pub fn linear(time: f64, value: impl Into<HostValue>) -> Self {
        let linear = KeyframeInterpolationType::Linear;
        Self::new(time, value).with_interpolation(linear, linear)
    }

    /// Key whose value read fails.
    pub fn failing_value(time: f64, message: &str) -> Self {
        Self {
            time: MemAttr::value(time),
            value: MemAttr::fails(message),
            ..Self::default()
        }
    }

    pub fn with_interpolation(
        mut self,
        key_in: KeyframeInterpolationType,
        key_out: KeyframeInterpolationType,
    ) -> Self {
        self.in_interpolation = Some(key_in);
        self.out_interpolation = Some(key_out);
        self
    }

    pub fn with_spatial(mut self, spatial: MemSpatial) -> Self {
        self.spatial = Some(spatial);
        self
    }

    pub fn with_temporal(mut self, temporal: MemTemporal) -> Self {
        self.temporal = Some(temporal);
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemSpatial {
    pub in_tangent: Vec<f64>,
    pub out_tangent: Vec<f64>,
    pub auto_bezier: bool,
    pub continuous: bool,
    pub roving: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemTemporal {
    pub in_ease: Vec<KeyframeEase>,
    pub out_ease: Vec<KeyframeEase>,
    pub auto_bezier: bool,
    pub continuous: bool,
}
