/// Attachment - an owned GPU texture used as a render output
///
/// An attachment owns its native texture handle until `destroy()` is called
/// by its owner (a `Framebuffer` or the debug depth overlay). It is neither
/// `Clone` nor `Copy`, so there is exactly one owner at a time.

use crate::error::Result;
use crate::graphics_device::{GraphicsDevice, TextureDesc, TextureFormat, TextureId, TextureUsage};
use crate::viewport::Extent2D;

const SOURCE: &str = "galaxy3d::Attachment";

/// Role of an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentKind {
    /// Color output, later composited to the screen
    Color,
    /// Depth buffer of the viewport framebuffer
    Depth,
    /// Copy of a depth buffer for visualization
    DebugDepth,
}

impl AttachmentKind {
    /// Texture usage required for this role
    pub fn usage(&self) -> TextureUsage {
        match self {
            AttachmentKind::Color => TextureUsage::SAMPLED | TextureUsage::RENDER_TARGET,
            AttachmentKind::Depth => TextureUsage::DEPTH_STENCIL,
            AttachmentKind::DebugDepth => TextureUsage::SAMPLED | TextureUsage::COPY_DST,
        }
    }
}

#[derive(Debug)]
pub struct Attachment {
    texture: TextureId,
    kind: AttachmentKind,
    format: TextureFormat,
    extent: Extent2D,
}

impl Attachment {
    /// Allocate the texture backing a new attachment
    ///
    /// # Errors
    ///
    /// Propagates the device error (`AllocationFailed`, `OutOfMemory`, ...).
    /// Nothing is held on failure.
    pub(crate) fn create(
        device: &mut dyn GraphicsDevice,
        kind: AttachmentKind,
        format: TextureFormat,
        extent: Extent2D,
    ) -> Result<Self> {
        let desc = TextureDesc {
            width: extent.width,
            height: extent.height,
            format,
            usage: kind.usage(),
        };

        let texture = device.create_texture(&desc).map_err(|err| {
            crate::engine_error!(SOURCE, "Failed to create {:?} attachment {} ({:?}): {}",
                kind, extent, format, err);
            err
        })?;

        crate::engine_trace!(SOURCE, "Created {:?} attachment {}", kind, extent);

        Ok(Self { texture, kind, format, extent })
    }

    /// Native texture handle (read-only access for engine passes)
    pub fn texture(&self) -> TextureId {
        self.texture
    }

    pub fn kind(&self) -> AttachmentKind {
        self.kind
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    pub fn extent(&self) -> Extent2D {
        self.extent
    }

    pub fn width(&self) -> u32 {
        self.extent.width
    }

    pub fn height(&self) -> u32 {
        self.extent.height
    }

    /// True if this attachment binds to the depth attachment point
    pub fn is_depth(&self) -> bool {
        self.format.is_depth()
    }

    /// Release the native texture
    pub(crate) fn destroy(self, device: &mut dyn GraphicsDevice) {
        crate::engine_trace!(SOURCE, "Destroying {:?} attachment {}", self.kind, self.extent);
        device.destroy_texture(self.texture);
    }
}

#[cfg(test)]
#[path = "attachment_tests.rs"]
mod tests;
