//! Static allow-list schemas for every node kind.
//!
//! Each schema lists the attribute names the allow-list strategy reads for
//! one host class. A node is collected against the chain of schemas of its
//! class hierarchy (e.g. a composition reads ITEM, AV_ITEM then COMP).

/// Named list of attributes for one host class.
#[derive(Debug)]
pub struct AttrSchema {
    pub type_name: &'static str,
    pub attrs: &'static [&'static str],
}

impl AttrSchema {
    pub const fn new(type_name: &'static str, attrs: &'static [&'static str]) -> Self {
        Self { type_name, attrs }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attrs.contains(&name)
    }
}

// ============================================================================
// Project
// ============================================================================

const PROJECT_ATTRS: &[&str] = &[
    // Color
    "bitsPerChannel",
    "colorManagementSystem",
    "compensateForSceneReferredProfiles",
    "linearBlending",
    "linearizeWorkingSpace",
    "lutInterpolationMethod",
    "ocioConfigurationFile",
    "workingGamma",
    "workingSpace",
    // Time display
    "displayStartFrame",
    "feetFramesFilmType",
    "footageTimecodeDisplayStartType",
    "framesCountType",
    "framesUseFeetFrames",
    "timeDisplayType",
    // Misc
    "expressionEngine",
    "gpuAccelType",
    "numItems",
    "revision",
    "transparencyGridThumbnails",
];

pub static PROJECT_SCHEMA: AttrSchema = AttrSchema::new("Project", PROJECT_ATTRS);

// ============================================================================
// Items
// ============================================================================

const ITEM_ATTRS: &[&str] = &["name", "id", "comment", "typeName", "label"];

pub static ITEM_SCHEMA: AttrSchema = AttrSchema::new("Item", ITEM_ATTRS);

const AV_ITEM_ATTRS: &[&str] = &[
    "duration",
    "footageMissing",
    "frameDuration",
    "frameRate",
    "hasAudio",
    "hasVideo",
    "height",
    "pixelAspect",
    "time",
    "useProxy",
    "width",
];

pub static AV_ITEM_SCHEMA: AttrSchema = AttrSchema::new("AVItem", AV_ITEM_ATTRS);

const COMP_ATTRS: &[&str] = &[
    "bgColor",
    "displayStartFrame",
    "displayStartTime",
    "draft3d",
    "dropFrame",
    "frameBlending",
    "hideShyLayers",
    "motionBlur",
    "motionBlurAdaptiveSampleLimit",
    "motionBlurSamplesPerFrame",
    "numLayers",
    "preserveNestedFrameRate",
    "preserveNestedResolution",
    "renderer",
    "renderers",
    "resolutionFactor",
    "shutterAngle",
    "shutterPhase",
    "workAreaDuration",
    "workAreaStart",
];

pub static COMP_SCHEMA: AttrSchema = AttrSchema::new("CompItem", COMP_ATTRS);

// ============================================================================
// Layers
// ============================================================================

const LAYER_ATTRS: &[&str] = &[
    // Identity
    "name",
    "index",
    "id",
    "comment",
    "label",
    "isNameSet",
    // Switches
    "enabled",
    "locked",
    "shy",
    "solo",
    "nullLayer",
    "hasVideo",
    "autoOrient",
    // Timing
    "inPoint",
    "outPoint",
    "startTime",
    "stretch",
    "time",
];

pub static LAYER_SCHEMA: AttrSchema = AttrSchema::new("Layer", LAYER_ATTRS);

const AV_LAYER_ATTRS: &[&str] = &[
    // Compositing
    "adjustmentLayer",
    "blendingMode",
    "environmentLayer",
    "guideLayer",
    "preserveTransparency",
    "quality",
    "samplingQuality",
    "threeDLayer",
    "threeDPerChar",
    // Audio
    "audioActive",
    "audioEnabled",
    "hasAudio",
    // Time
    "canSetTimeRemapEnabled",
    "timeRemapEnabled",
    "frameBlending",
    "frameBlendingType",
    "motionBlur",
    // Track matte
    "hasTrackMatte",
    "isTrackMatte",
    "trackMatteType",
    // Misc
    "canSetCollapseTransformation",
    "collapseTransformation",
    "effectsActive",
    "isNameFromSource",
    "width",
    "height",
];

pub static AV_LAYER_SCHEMA: AttrSchema = AttrSchema::new("AVLayer", AV_LAYER_ATTRS);

pub static LIGHT_LAYER_SCHEMA: AttrSchema = AttrSchema::new("LightLayer", &["lightType"]);

// ============================================================================
// Footage sources
// ============================================================================

const FOOTAGE_SOURCE_ATTRS: &[&str] = &[
    "alphaMode",
    "conformFrameRate",
    "displayFrameRate",
    "fieldSeparationType",
    "hasAlpha",
    "highQualityFieldSeparation",
    "invertAlpha",
    "isStill",
    "loop",
    "nativeFrameRate",
    "premulColor",
    "removePulldown",
];

pub static FOOTAGE_SOURCE_SCHEMA: AttrSchema =
    AttrSchema::new("FootageSource", FOOTAGE_SOURCE_ATTRS);

pub static SOLID_SOURCE_SCHEMA: AttrSchema = AttrSchema::new("SolidSource", &["color"]);

pub static FILE_SOURCE_SCHEMA: AttrSchema = AttrSchema::new("FileSource", &["missingFootagePath"]);

// ============================================================================
// Properties
// ============================================================================

const PROPERTY_ATTRS: &[&str] = &[
    "isTimeVarying",
    "isModified",
    "canVaryOverTime",
    "unitsText",
    "hasMin",
    "hasMax",
    "minValue",
    "maxValue",
    "dimensionsSeparated",
    "isSeparationFollower",
    "isSeparationLeader",
    "separationDimension",
];

pub static PROPERTY_SCHEMA: AttrSchema = AttrSchema::new("Property", PROPERTY_ATTRS);

const PROPERTY_GROUP_ATTRS: &[&str] =
    &["active", "canSetEnabled", "elided", "isEffect", "isMask", "isModified"];

pub static PROPERTY_GROUP_SCHEMA: AttrSchema =
    AttrSchema::new("PropertyGroup", PROPERTY_GROUP_ATTRS);

// ============================================================================
// Render queue
// ============================================================================

pub static RENDER_QUEUE_SCHEMA: AttrSchema =
    AttrSchema::new("RenderQueue", &["canQueueInAME", "queueNotify", "rendering"]);

const RENDER_QUEUE_ITEM_ATTRS: &[&str] = &[
    "comment",
    "elapsedSeconds",
    "logType",
    "queueItemNotify",
    "skipFrames",
    "startTime",
    "status",
    "timeSpanDuration",
    "timeSpanStart",
];

pub static RENDER_QUEUE_ITEM_SCHEMA: AttrSchema =
    AttrSchema::new("RenderQueueItem", RENDER_QUEUE_ITEM_ATTRS);

const OUTPUT_MODULE_ATTRS: &[&str] = &["name", "includeSourceXMP", "postRenderAction"];

pub static OUTPUT_MODULE_SCHEMA: AttrSchema = AttrSchema::new("OutputModule", OUTPUT_MODULE_ATTRS);
