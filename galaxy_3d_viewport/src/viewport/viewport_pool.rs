/// Viewport resource pool - offscreen framebuffer sized to a screen rectangle
///
/// The pool owns one framebuffer with a color and a depth attachment, and
/// the debug depth overlay. Resources are allocated lazily on the first
/// `bind()`, reused while the requested size stays the same, and rebuilt
/// from scratch when it changes.
///
/// # Frame protocol
///
/// ```no_run
/// use galaxy_3d_viewport::galaxy3d::device::GraphicsDevice;
/// use galaxy_3d_viewport::galaxy3d::viewport::{Rect, ViewportPool};
/// use galaxy_3d_viewport::galaxy3d::Result;
///
/// fn draw_frame(device: &mut dyn GraphicsDevice, pool: &mut ViewportPool, region: &Rect) -> Result<()> {
///     pool.bind(device, region)?;
///     // ... draw the scene into the bound framebuffer ...
///
///     // Composites onto the target that was active before bind()
///     pool.unbind(device)
/// }
/// ```

use crate::error::Result;
use crate::graphics_device::{BuiltinProgram, GraphicsDevice, RenderTargetBinding};
use crate::viewport::screen_quad;
use crate::viewport::{
    Attachment, AttachmentKind, DebugDepthOverlay, Extent2D, Framebuffer, Rect, ViewportConfig,
};

const SOURCE: &str = "galaxy3d::Viewport";

/// Color slot the viewport renders into
const VIEWPORT_SLOT: u32 = 0;

/// Read-only view of the pool's GPU buffers for engine-specific passes
///
/// Engines may draw into these between `bind()` and `unbind()` but never
/// resize or free them.
#[derive(Debug, Clone, Copy)]
pub struct ViewportBuffers<'a> {
    pub framebuffer: Option<&'a Framebuffer>,
    pub color: Option<&'a Attachment>,
    pub depth: Option<&'a Attachment>,
}

#[derive(Debug)]
pub struct ViewportPool {
    config: ViewportConfig,
    framebuffer: Option<Framebuffer>,
    /// Size the pool was last built for, None while unset
    size: Option<Extent2D>,
    /// Target active before our framebuffer was bound
    previous_target: Option<RenderTargetBinding>,
    debug_depth: DebugDepthOverlay,
}

impl ViewportPool {
    /// New pool with the default configuration; no GPU resources are allocated
    pub fn create() -> Self {
        Self::with_config(ViewportConfig::default())
    }

    pub fn with_config(config: ViewportConfig) -> Self {
        Self {
            config,
            framebuffer: None,
            size: None,
            previous_target: None,
            debug_depth: DebugDepthOverlay::new(config.debug_depth_format),
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Pixel size of the current buffers, None while unset
    pub fn size(&self) -> Option<Extent2D> {
        self.size
    }

    /// True if a validated framebuffer is ready for drawing
    pub fn is_allocated(&self) -> bool {
        self.framebuffer.as_ref().is_some_and(Framebuffer::is_valid)
    }

    pub fn buffers(&self) -> ViewportBuffers<'_> {
        let framebuffer = self.framebuffer.as_ref();
        ViewportBuffers {
            framebuffer,
            color: framebuffer.and_then(|fb| fb.color(VIEWPORT_SLOT)),
            depth: framebuffer.and_then(Framebuffer::depth),
        }
    }

    pub fn debug_depth(&self) -> &DebugDepthOverlay {
        &self.debug_depth
    }

    pub fn debug_depth_mut(&mut self) -> &mut DebugDepthOverlay {
        &mut self.debug_depth
    }

    /// Prepare the pool for rendering into `rect` and bind its framebuffer
    ///
    /// Buffers are sized `rect` plus the configured edge padding. A matching
    /// size reuses the existing buffers; any other size tears everything down
    /// and rebuilds it.
    ///
    /// # Errors
    ///
    /// On a degenerate rectangle, or any allocation, attachment, validation
    /// or bind failure, the pool is fully torn down and left unset; nothing
    /// of the pool stays bound and the next `unbind()` draws nothing.
    /// The caller may retry on the next frame.
    pub fn bind(&mut self, device: &mut dyn GraphicsDevice, rect: &Rect) -> Result<()> {
        let extent = match self.config.extent_for(rect) {
            Ok(extent) => extent,
            Err(err) => {
                // No usable size: drop the previous frame's buffers too
                self.teardown(device);
                return Err(err);
            }
        };

        if self.is_allocated() && self.size != Some(extent) {
            crate::engine_debug!(SOURCE, "Viewport resized from {} to {}, rebuilding buffers",
                self.size.map_or_else(|| "unset".to_string(), |size| size.to_string()), extent);
            self.teardown(device);
        }

        if !self.is_allocated() {
            if let Err(err) = self.build(device, extent) {
                crate::engine_error!(SOURCE, "Viewport {} unavailable this frame: {}", extent, err);
                self.teardown(device);
                return Err(err);
            }
            crate::engine_debug!(SOURCE, "Viewport buffers allocated ({})", extent);
        }

        let Some(framebuffer) = self.framebuffer.as_ref() else {
            crate::engine_bail!(SOURCE, InvalidResource, "Viewport framebuffer missing after build");
        };

        let current = device.render_target();
        if current.framebuffer() != Some(framebuffer.id()) {
            self.previous_target = Some(current);
        } else {
            crate::engine_trace!(SOURCE, "Viewport framebuffer already bound");
        }

        if let Err(err) = framebuffer.bind(device, VIEWPORT_SLOT) {
            crate::engine_error!(SOURCE, "Failed to bind viewport framebuffer: {}", err);
            self.teardown(device);
            return Err(err);
        }
        Ok(())
    }

    /// Restore the previous target and composite the color buffer onto it
    ///
    /// The color attachment is drawn as a quad covering exactly its pixel
    /// size with the scissor test enabled. No-op if nothing is allocated.
    pub fn unbind(&mut self, device: &mut dyn GraphicsDevice) -> Result<()> {
        let color = self
            .framebuffer
            .as_ref()
            .filter(|fb| fb.is_valid())
            .and_then(|fb| fb.color(VIEWPORT_SLOT));
        let Some(color) = color else {
            crate::engine_trace!(SOURCE, "Unbind of an empty viewport ignored");
            return Ok(());
        };
        let (texture, width, height) = (color.texture(), color.width(), color.height());

        device.unbind_all_textures();
        let previous = self.previous_target.take().unwrap_or_default();
        if let Err(err) = device.set_render_target(previous) {
            crate::engine_warn!(SOURCE, "Previous render target {:?} unavailable ({}), restoring default",
                previous, err);
            if let Err(err) = device.set_render_target(RenderTargetBinding::Default) {
                crate::engine_bail!(SOURCE, "No render target to composite viewport onto: {}", err);
            }
        }

        device.set_scissor_test(true);

        screen_quad::draw_textured_quad(
            device,
            BuiltinProgram::ImageModulateAlpha,
            texture,
            width,
            height,
            &[],
        )
    }

    /// Destroy the attachments, keeping the empty framebuffer object for reuse
    ///
    /// The size becomes unset; the next `bind()` rebuilds the attachments.
    pub fn release_buffers(&mut self, device: &mut dyn GraphicsDevice) {
        self.restore_if_bound(device);
        if let Some(framebuffer) = self.framebuffer.as_mut() {
            if !framebuffer.is_empty() {
                crate::engine_debug!(SOURCE, "Releasing viewport buffers");
            }
            framebuffer.release_attachments(device);
        }
        self.size = None;
    }

    /// Release the debug overlay and every buffer, then drop the pool
    ///
    /// Safe on a pool that was never bound.
    pub fn destroy(mut self, device: &mut dyn GraphicsDevice) {
        self.debug_depth.free(device);
        self.teardown(device);
    }

    fn build(&mut self, device: &mut dyn GraphicsDevice, extent: Extent2D) -> Result<()> {
        self.size = Some(extent);

        if self.framebuffer.is_none() {
            self.framebuffer = Some(Framebuffer::create(device)?);
        }
        let config = self.config;
        let Some(framebuffer) = self.framebuffer.as_mut() else {
            crate::engine_bail!(SOURCE, InvalidResource, "Viewport framebuffer missing");
        };
        framebuffer.release_attachments(device);

        // No multisampling
        let color = Attachment::create(device, AttachmentKind::Color, config.color_format, extent)?;
        framebuffer.attach(device, color, VIEWPORT_SLOT)?;

        let depth = Attachment::create(device, AttachmentKind::Depth, config.depth_format, extent)?;
        framebuffer.attach(device, depth, VIEWPORT_SLOT)?;

        framebuffer.validate(device)
    }

    /// Single cleanup path shared by resize, failure and destroy
    fn teardown(&mut self, device: &mut dyn GraphicsDevice) {
        self.restore_if_bound(device);
        if let Some(framebuffer) = self.framebuffer.take() {
            crate::engine_debug!(SOURCE, "Tearing down viewport framebuffer ({} attachments)",
                framebuffer.attachment_count());
            framebuffer.destroy(device);
        }
        self.previous_target = None;
        self.size = None;
    }

    /// Switch back to the previous target if our framebuffer is the active one
    fn restore_if_bound(&mut self, device: &mut dyn GraphicsDevice) {
        let Some(id) = self.framebuffer.as_ref().map(Framebuffer::id) else {
            return;
        };
        if device.render_target().framebuffer() != Some(id) {
            return;
        }

        let previous = self.previous_target.take().unwrap_or_default();
        if let Err(err) = device.set_render_target(previous) {
            crate::engine_warn!(SOURCE, "Previous render target {:?} unavailable ({}), restoring default",
                previous, err);
            if let Err(err) = device.set_render_target(RenderTargetBinding::Default) {
                crate::engine_error!(SOURCE, "Failed to restore default render target: {}", err);
            }
        }
    }
}

impl Drop for ViewportPool {
    fn drop(&mut self) {
        if self.framebuffer.is_some() || self.debug_depth.is_valid() {
            crate::engine_warn!(SOURCE,
                "Viewport pool dropped with live GPU resources, call destroy() to release them");
        }
    }
}

#[cfg(test)]
#[path = "viewport_pool_tests.rs"]
mod tests;
