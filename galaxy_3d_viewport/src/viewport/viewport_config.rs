/// Viewport configuration

use crate::error::Result;
use crate::graphics_device::TextureFormat;
use crate::viewport::{Extent2D, Rect};

/// Formats and sizing rules used by a viewport pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportConfig {
    /// Color attachment format (standard dynamic range)
    pub color_format: TextureFormat,
    /// Depth attachment format
    pub depth_format: TextureFormat,
    /// Debug depth overlay format (half float)
    pub debug_depth_format: TextureFormat,
    /// Pixels added to each rectangle dimension
    ///
    /// The scissor test downstream includes the max edge, so one extra pixel
    /// is needed by default.
    pub edge_padding: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            color_format: TextureFormat::R8G8B8A8_UNORM,
            depth_format: TextureFormat::D24_UNORM,
            debug_depth_format: TextureFormat::R16_SFLOAT,
            edge_padding: 1,
        }
    }
}

impl ViewportConfig {
    /// Pixel extent required to render `rect`
    ///
    /// # Errors
    ///
    /// `InvalidResource` if the rectangle is degenerate or too large.
    pub fn extent_for(&self, rect: &Rect) -> Result<Extent2D> {
        if rect.is_degenerate() {
            crate::engine_bail!("galaxy3d::Viewport", InvalidResource,
                "Degenerate viewport rectangle {:?}", rect);
        }

        let padding = self.edge_padding as i64;
        let width = u32::try_from(rect.size_x() + padding);
        let height = u32::try_from(rect.size_y() + padding);
        match (width, height) {
            (Ok(width), Ok(height)) if width > 0 && height > 0 => Ok(Extent2D::new(width, height)),
            _ => crate::engine_bail!("galaxy3d::Viewport", InvalidResource,
                "Viewport rectangle {:?} has no drawable pixels", rect),
        }
    }
}

#[cfg(test)]
#[path = "viewport_config_tests.rs"]
mod tests;
