/// Framebuffer - a GPU framebuffer object and the attachments it owns
///
/// Color attachments occupy ordered slots; a depth attachment goes to the
/// single depth attachment point. The framebuffer is usable for drawing only
/// after `validate()` succeeded, and any attachment change clears that state.

use crate::error::Result;
use crate::graphics_device::{FramebufferId, GraphicsDevice, RenderTargetBinding};
use crate::viewport::{Attachment, Extent2D};

const SOURCE: &str = "galaxy3d::Framebuffer";

/// Number of color slots a framebuffer exposes
pub const MAX_COLOR_SLOTS: u32 = 4;

#[derive(Debug)]
pub struct Framebuffer {
    id: FramebufferId,
    color_slots: Vec<Option<Attachment>>,
    depth: Option<Attachment>,
    valid: bool,
}

impl Framebuffer {
    /// Create an empty framebuffer object
    pub(crate) fn create(device: &mut dyn GraphicsDevice) -> Result<Self> {
        let id = device.create_framebuffer().map_err(|err| {
            crate::engine_error!(SOURCE, "Failed to create framebuffer: {}", err);
            err
        })?;

        Ok(Self {
            id,
            color_slots: (0..MAX_COLOR_SLOTS).map(|_| None).collect(),
            depth: None,
            valid: false,
        })
    }

    /// Native framebuffer handle
    pub fn id(&self) -> FramebufferId {
        self.id
    }

    /// True once `validate()` passed and no attachment changed since
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn is_empty(&self) -> bool {
        self.attachment_count() == 0
    }

    pub fn attachment_count(&self) -> usize {
        self.attachments().count()
    }

    /// Color attachment in `slot`
    pub fn color(&self, slot: u32) -> Option<&Attachment> {
        self.color_slots.get(slot as usize).and_then(Option::as_ref)
    }

    pub fn depth(&self) -> Option<&Attachment> {
        self.depth.as_ref()
    }

    /// All attachments, color slots in ascending order followed by depth
    pub fn attachments(&self) -> impl Iterator<Item = &Attachment> {
        self.color_slots.iter().flatten().chain(self.depth.iter())
    }

    /// Shared size of the attachments (size of the first one if they differ)
    pub fn extent(&self) -> Option<Extent2D> {
        self.attachments().next().map(Attachment::extent)
    }

    /// Render target binding drawing into color `slot`
    pub(crate) fn binding(&self, slot: u32) -> RenderTargetBinding {
        RenderTargetBinding::Framebuffer { framebuffer: self.id, slot }
    }

    /// Attach `attachment`, taking ownership of it
    ///
    /// Depth attachments go to the depth point regardless of `slot`.
    /// On failure the attachment is destroyed.
    pub(crate) fn attach(
        &mut self,
        device: &mut dyn GraphicsDevice,
        attachment: Attachment,
        slot: u32,
    ) -> Result<()> {
        let occupied = if attachment.is_depth() {
            self.depth.is_some()
        } else {
            match self.color_slots.get(slot as usize) {
                Some(current) => current.is_some(),
                None => {
                    attachment.destroy(device);
                    crate::engine_bail!(SOURCE, InvalidResource,
                        "Color slot {} out of range (max {})", slot, MAX_COLOR_SLOTS);
                }
            }
        };
        if occupied {
            let kind = attachment.kind();
            attachment.destroy(device);
            crate::engine_bail!(SOURCE, InvalidResource,
                "Cannot attach {:?} to slot {}: already occupied", kind, slot);
        }

        if let Err(err) = device.attach_texture(self.id, attachment.texture(), slot) {
            crate::engine_error!(SOURCE, "Failed to attach {:?} to slot {}: {}",
                attachment.kind(), slot, err);
            attachment.destroy(device);
            return Err(err);
        }

        self.valid = false;
        if attachment.is_depth() {
            self.depth = Some(attachment);
        } else if let Some(current) = self.color_slots.get_mut(slot as usize) {
            *current = Some(attachment);
        }
        Ok(())
    }

    /// Check that the attachments can be rendered to together
    ///
    /// Dimensions are compared locally first, then the driver completeness
    /// check runs. Validity is cached until the next attachment change.
    pub(crate) fn validate(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        self.valid = false;

        let Some(extent) = self.extent() else {
            crate::engine_bail!(SOURCE, ValidationFailed, "Framebuffer has no attachments");
        };
        if let Some(mismatch) = self.attachments().find(|attachment| attachment.extent() != extent) {
            crate::engine_bail!(SOURCE, ValidationFailed,
                "{:?} attachment is {} but framebuffer is {}",
                mismatch.kind(), mismatch.extent(), extent);
        }

        device.check_framebuffer(self.id).map_err(|err| {
            crate::engine_error!(SOURCE, "Framebuffer {} incomplete: {}", extent, err);
            err
        })?;

        self.valid = true;
        Ok(())
    }

    /// Make color `slot` of this framebuffer the active render target
    pub(crate) fn bind(&self, device: &mut dyn GraphicsDevice, slot: u32) -> Result<()> {
        if !self.valid {
            crate::engine_bail!(SOURCE, InvalidResource, "Bind of a framebuffer that failed validation");
        }
        device.set_render_target(self.binding(slot))
    }

    /// Destroy every attachment, depth first then color slots from last to first
    ///
    /// The framebuffer object itself stays allocated, empty and invalid.
    pub(crate) fn release_attachments(&mut self, device: &mut dyn GraphicsDevice) {
        self.valid = false;

        if let Some(depth) = self.depth.take() {
            device.detach_texture(self.id, depth.texture());
            depth.destroy(device);
        }
        for slot in self.color_slots.iter_mut().rev() {
            if let Some(color) = slot.take() {
                device.detach_texture(self.id, color.texture());
                color.destroy(device);
            }
        }
    }

    /// Release all attachments and the framebuffer object
    pub(crate) fn destroy(mut self, device: &mut dyn GraphicsDevice) {
        self.release_attachments(device);
        device.destroy_framebuffer(self.id);
    }
}

#[cfg(test)]
#[path = "framebuffer_tests.rs"]
mod tests;
