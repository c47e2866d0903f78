//! Snapshot key and match-name constants.
//!
//! Records with typed fields flatten their collected attributes next to
//! those fields; the `*_RESERVED` lists name the keys a record writes itself
//! so a collected attribute can never shadow one.

// === Match names ===
/// Marker property of a layer, exported separately from the property tree
pub const MN_MARKER: &str = "ADBE Marker";

// === Snapshot root ===
pub const K_EXPORT_VERSION: &str = "exportVersion";
pub const K_HOST_VERSION: &str = "hostVersion";
pub const K_HOST_BUILD: &str = "hostBuild";
pub const K_PROJECT_FILE: &str = "projectFile";
pub const K_PROJECT_NAME: &str = "projectName";
pub const K_ITEMS: &str = "items";
pub const K_RENDER_QUEUE: &str = "renderQueue";

// === Items ===
pub const K_ITEM_TYPE: &str = "itemType";
pub const K_PARENT_FOLDER_ID: &str = "parentFolderId";
pub const K_PARENT_FOLDER_NAME: &str = "parentFolderName";
pub const K_LAYERS: &str = "layers";
pub const K_MARKERS: &str = "markers";
pub const K_FILE_PATH: &str = "filePath";
pub const K_FILE_NAME: &str = "fileName";
pub const K_MAIN_SOURCE: &str = "mainSource";
pub const K_NUM_ITEMS: &str = "numItems";
pub const K_CHILD_ITEM_IDS: &str = "childItemIds";

// === Layers ===
pub const K_LAYER_TYPE: &str = "layerType";
pub const K_SOURCE_ID: &str = "sourceId";
pub const K_SOURCE_NAME: &str = "sourceName";
pub const K_PARENT_ID: &str = "parentId";
pub const K_PARENT_INDEX: &str = "parentIndex";
pub const K_PARENT_NAME: &str = "parentName";
pub const K_TRANSFORM: &str = "transform";
pub const K_EFFECTS: &str = "effects";

// === Sources ===
pub const K_SOURCE_TYPE: &str = "sourceType";

// === Render queue ===
pub const K_COMP_NAME: &str = "compName";
pub const K_RENDER: &str = "render";
pub const K_SETTINGS: &str = "settings";
pub const K_OUTPUT_MODULES: &str = "outputModules";

// === Property tree ===
pub const K_NAME: &str = "name";
pub const K_MATCH_NAME: &str = "matchName";
pub const K_PROPERTY_INDEX: &str = "propertyIndex";
pub const K_PROPERTY_TYPE: &str = "propertyType";
pub const K_PROPERTY_VALUE_TYPE: &str = "propertyValueType";
pub const K_ENABLED: &str = "enabled";
pub const K_PROPERTIES: &str = "properties";
pub const K_VALUE: &str = "value";
pub const K_CAN_SET_EXPRESSION: &str = "canSetExpression";
pub const K_EXPRESSION: &str = "expression";
pub const K_EXPRESSION_ENABLED: &str = "expressionEnabled";
pub const K_EXPRESSION_ERROR: &str = "expressionError";
pub const K_NUM_KEYS: &str = "numKeys";
pub const K_KEYFRAMES: &str = "keyframes";

// === Reserved sets ===
pub const ROOT_RESERVED: &[&str] = &[
    K_EXPORT_VERSION,
    K_HOST_VERSION,
    K_HOST_BUILD,
    K_PROJECT_FILE,
    K_PROJECT_NAME,
    K_ITEMS,
    K_RENDER_QUEUE,
];

pub const ITEM_RESERVED: &[&str] = &[
    K_ITEM_TYPE,
    K_PARENT_FOLDER_ID,
    K_PARENT_FOLDER_NAME,
    K_LAYERS,
    K_MARKERS,
    K_FILE_PATH,
    K_FILE_NAME,
    K_MAIN_SOURCE,
    K_NUM_ITEMS,
    K_CHILD_ITEM_IDS,
];

pub const LAYER_RESERVED: &[&str] = &[
    K_LAYER_TYPE,
    K_SOURCE_ID,
    K_SOURCE_NAME,
    K_PARENT_ID,
    K_PARENT_INDEX,
    K_PARENT_NAME,
    K_MARKERS,
    K_TRANSFORM,
    K_EFFECTS,
];

pub const SOURCE_RESERVED: &[&str] = &[K_SOURCE_TYPE, K_FILE_PATH, K_FILE_NAME];

pub const RENDER_QUEUE_RESERVED: &[&str] = &[K_NUM_ITEMS, K_ITEMS];

pub const RENDER_QUEUE_ITEM_RESERVED: &[&str] =
    &[K_COMP_NAME, K_RENDER, K_SETTINGS, K_OUTPUT_MODULES];

pub const OUTPUT_MODULE_RESERVED: &[&str] = &[K_SETTINGS];

pub const PROPERTY_RESERVED: &[&str] = &[
    K_NAME,
    K_MATCH_NAME,
    K_PROPERTY_INDEX,
    K_PROPERTY_TYPE,
    K_PROPERTY_VALUE_TYPE,
    K_ENABLED,
    K_PROPERTIES,
    K_VALUE,
    K_CAN_SET_EXPRESSION,
    K_EXPRESSION,
    K_EXPRESSION_ENABLED,
    K_EXPRESSION_ERROR,
    K_NUM_KEYS,
    K_KEYFRAMES,
];
