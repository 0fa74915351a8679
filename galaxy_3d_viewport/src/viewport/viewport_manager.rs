/// Named viewport pools
///
/// Editors usually show several viewports at once (3D view, UV editor,
/// previews). The manager owns one pool per name and tears them down
/// through the device when they are removed.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::engine_bail;
use crate::graphics_device::GraphicsDevice;
use crate::viewport::{ViewportConfig, ViewportPool};

const SOURCE: &str = "galaxy3d::ViewportManager";

pub struct ViewportManager {
    config: ViewportConfig,
    viewports: FxHashMap<String, ViewportPool>,
}

impl ViewportManager {
    /// Create an empty manager whose pools use the default configuration
    pub fn new() -> Self {
        Self::with_config(ViewportConfig::default())
    }

    /// Create an empty manager whose pools use `config`
    pub fn with_config(config: ViewportConfig) -> Self {
        Self {
            config,
            viewports: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Create a new named viewport pool
    ///
    /// No GPU resources are allocated until the pool is first bound.
    ///
    /// # Errors
    ///
    /// Returns an error if a viewport with the same name already exists.
    pub fn create_viewport(&mut self, name: &str) -> Result<&mut ViewportPool> {
        match self.viewports.entry(name.to_string()) {
            Entry::Occupied(_) => {
                engine_bail!(SOURCE, InvalidResource, "Viewport '{}' already exists", name);
            }
            Entry::Vacant(entry) => {
                crate::engine_trace!(SOURCE, "Viewport '{}' created", name);
                Ok(entry.insert(ViewportPool::with_config(self.config)))
            }
        }
    }

    /// Get a viewport pool by name
    pub fn viewport(&self, name: &str) -> Option<&ViewportPool> {
        self.viewports.get(name)
    }

    /// Get a mutable viewport pool by name
    pub fn viewport_mut(&mut self, name: &str) -> Option<&mut ViewportPool> {
        self.viewports.get_mut(name)
    }

    /// Destroy a viewport pool and release its GPU resources
    ///
    /// Returns false if no viewport has that name.
    pub fn destroy_viewport(&mut self, device: &mut dyn GraphicsDevice, name: &str) -> bool {
        match self.viewports.remove(name) {
            Some(pool) => {
                pool.destroy(device);
                true
            }
            None => false,
        }
    }

    pub fn viewport_count(&self) -> usize {
        self.viewports.len()
    }

    /// All viewport names, sorted
    pub fn viewport_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.viewports.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Destroy every viewport pool
    pub fn destroy_all(&mut self, device: &mut dyn GraphicsDevice) {
        for (_, pool) in self.viewports.drain() {
            pool.destroy(device);
        }
    }
}

impl Default for ViewportManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "viewport_manager_tests.rs"]
mod tests;
