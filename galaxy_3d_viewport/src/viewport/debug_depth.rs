/// Debug depth overlay - visualizes a captured depth buffer
///
/// Holds at most one half-float attachment, created and freed through its
/// own calls. Its lifecycle is independent of the viewport framebuffer.

use crate::error::Result;
use crate::graphics_device::{BuiltinProgram, GraphicsDevice, TextureFormat, UniformValue};
use crate::viewport::screen_quad::{self, IMAGE_UNIT};
use crate::viewport::{Attachment, AttachmentKind, Extent2D};

const SOURCE: &str = "galaxy3d::DebugDepth";

#[derive(Debug)]
pub struct DebugDepthOverlay {
    format: TextureFormat,
    attachment: Option<Attachment>,
}

impl DebugDepthOverlay {
    /// Empty overlay storing captures in `format`
    pub fn new(format: TextureFormat) -> Self {
        Self { format, attachment: None }
    }

    /// Allocate the overlay texture
    ///
    /// A previously held texture is freed first. On failure no texture is held.
    pub fn create(&mut self, device: &mut dyn GraphicsDevice, width: u32, height: u32) -> Result<()> {
        self.free(device);

        if width == 0 || height == 0 {
            crate::engine_bail!(SOURCE, InvalidResource,
                "Debug depth overlay size {}x{} is empty", width, height);
        }

        let attachment = Attachment::create(
            device,
            AttachmentKind::DebugDepth,
            self.format,
            Extent2D::new(width, height),
        )?;
        crate::engine_debug!(SOURCE, "Debug depth overlay created ({})", attachment.extent());
        self.attachment = Some(attachment);
        Ok(())
    }

    /// Copy the current target's depth at screen offset (`x`, `y`)
    ///
    /// The copied region has the overlay's own size. No-op when empty.
    pub fn capture(&self, device: &mut dyn GraphicsDevice, x: i32, y: i32) -> Result<()> {
        let Some(attachment) = &self.attachment else {
            crate::engine_trace!(SOURCE, "Capture on an empty overlay ignored");
            return Ok(());
        };

        let texture = attachment.texture();
        device.bind_texture(texture, IMAGE_UNIT)?;
        let result = device.copy_depth_to_texture(texture, x, y, attachment.width(), attachment.height());
        device.unbind_texture(texture);
        result
    }

    /// Draw the overlay as a full-size quad, linearizing depth between the planes
    pub fn draw(&self, device: &mut dyn GraphicsDevice, znear: f32, zfar: f32) -> Result<()> {
        let Some(attachment) = &self.attachment else {
            crate::engine_trace!(SOURCE, "Draw of an empty overlay ignored");
            return Ok(());
        };

        screen_quad::draw_textured_quad(
            device,
            BuiltinProgram::ImageDepth,
            attachment.texture(),
            attachment.width(),
            attachment.height(),
            &[("znear", UniformValue::Float(znear)), ("zfar", UniformValue::Float(zfar))],
        )
    }

    /// Release the overlay texture (no-op when empty)
    pub fn free(&mut self, device: &mut dyn GraphicsDevice) {
        if let Some(attachment) = self.attachment.take() {
            crate::engine_debug!(SOURCE, "Debug depth overlay freed ({})", attachment.extent());
            attachment.destroy(device);
        }
    }

    /// Width in pixels, 0 when empty
    pub fn width(&self) -> u32 {
        self.attachment.as_ref().map_or(0, Attachment::width)
    }

    /// Height in pixels, 0 when empty
    pub fn height(&self) -> u32 {
        self.attachment.as_ref().map_or(0, Attachment::height)
    }

    /// True iff a texture is currently held
    pub fn is_valid(&self) -> bool {
        self.attachment.is_some()
    }

    pub(crate) fn attachment(&self) -> Option<&Attachment> {
        self.attachment.as_ref()
    }
}

impl Default for DebugDepthOverlay {
    fn default() -> Self {
        Self::new(TextureFormat::R16_SFLOAT)
    }
}

#[cfg(test)]
#[path = "debug_depth_tests.rs"]
mod tests;
