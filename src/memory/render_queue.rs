//! In-memory render queue.

use serde::Deserialize;

use super::{MemObject, nth};
use crate::host::{HostObject, HostValue, OutputModule, ReadError, RenderQueue, RenderQueueItem};

fn failed(failure: &Option<String>) -> Result<(), ReadError> {
    match failure {
        Some(msg) => Err(ReadError::new(msg.clone())),
        None => Ok(()),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemRenderQueue {
    pub attributes: MemObject,
    pub items: Vec<MemRenderQueueItem>,
}

impl MemRenderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, item: MemRenderQueueItem) -> Self {
        self.items.push(item);
        self
    }
}

impl RenderQueue for MemRenderQueue {
    fn num_items(&self) -> usize {
        self.items.len()
    }

    fn item(&self, index: usize) -> Result<&dyn RenderQueueItem, ReadError> {
        let item = nth(&self.items, "render queue item", index)?;
        failed(&item.failure)?;
        Ok(item)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemRenderQueueItem {
    pub comp_name: String,
    #[serde(default = "render_default")]
    pub render: bool,
    #[serde(default)]
    pub attributes: MemObject,
    #[serde(default)]
    pub settings: MemObject,
    /// Reading the settings object fails with this message.
    #[serde(default)]
    pub settings_failure: Option<String>,
    #[serde(default)]
    pub output_modules: Vec<MemOutputModule>,
    /// Accessing this entry from the queue fails with this message.
    #[serde(default)]
    pub failure: Option<String>,
}

fn render_default() -> bool {
    true
}

impl MemRenderQueueItem {
    pub fn new(comp_name: &str, settings: MemObject) -> Self {
        Self {
            comp_name: comp_name.to_string(),
            render: true,
            attributes: MemObject::new(),
            settings,
            settings_failure: None,
            output_modules: Vec::new(),
            failure: None,
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<HostValue>) -> Self {
        self.attributes = self.attributes.with(name, value);
        self
    }

    pub fn with_render(mut self, render: bool) -> Self {
        self.render = render;
        self
    }

    pub fn with_output_module(mut self, module: MemOutputModule) -> Self {
        self.output_modules.push(module);
        self
    }

    pub fn failing_settings(mut self, message: &str) -> Self {
        self.settings_failure = Some(message.to_string());
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }
}

impl RenderQueueItem for MemRenderQueueItem {
    fn comp_name(&self) -> Result<String, ReadError> {
        Ok(self.comp_name.clone())
    }

    fn render(&self) -> Result<bool, ReadError> {
        Ok(self.render)
    }

    fn settings(&self) -> Result<&dyn HostObject, ReadError> {
        failed(&self.settings_failure)?;
        Ok(&self.settings)
    }

    fn num_output_modules(&self) -> usize {
        self.output_modules.len()
    }

    fn output_module(&self, index: usize) -> Result<&dyn OutputModule, ReadError> {
        let module = nth(&self.output_modules, "output module", index)?;
        failed(&module.failure)?;
        Ok(module)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MemOutputModule {
    pub attributes: MemObject,
    pub settings: MemObject,
    pub settings_failure: Option<String>,
    pub failure: Option<String>,
}

impl MemOutputModule {
    pub fn new(settings: MemObject) -> Self {
        Self { settings, ..Self::default() }
    }

    pub fn with(mut self, name: &str, value: impl Into<HostValue>) -> Self {
        self.attributes = self.attributes.with(name, value);
        self
    }

    pub fn failing_settings(mut self, message: &str) -> Self {
        self.settings_failure = Some(message.to_string());
        self
    }
}

impl OutputModule for MemOutputModule {
    fn settings(&self) -> Result<&dyn HostObject, ReadError> {
        failed(&self.settings_failure)?;
        Ok(&self.settings)
    }
}
