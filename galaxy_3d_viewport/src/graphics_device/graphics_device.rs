/// GraphicsDevice trait - explicit driver context for viewport rendering
///
/// Every viewport operation receives the device as a parameter instead of
/// reaching into ambient driver state. Backends keep their native objects in
/// an arena keyed by the handles below; the mock device does the same.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use slotmap::new_key_type;

use crate::error::Result;
use crate::graphics_device::{TextureDesc, TextureInfo};

new_key_type! {
    /// Handle to a native texture owned by the device
    pub struct TextureId;

    /// Handle to a native framebuffer object owned by the device
    pub struct FramebufferId;
}

/// Render destination currently selected on the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderTargetBinding {
    /// The window/default target
    #[default]
    Default,
    /// An offscreen framebuffer, drawing into the given color slot
    Framebuffer {
        /// Bound framebuffer
        framebuffer: FramebufferId,
        /// Active color slot
        slot: u32,
    },
}

impl RenderTargetBinding {
    /// Returns the framebuffer handle if this binding targets one
    pub fn framebuffer(&self) -> Option<FramebufferId> {
        match self {
            RenderTargetBinding::Default => None,
            RenderTargetBinding::Framebuffer { framebuffer, .. } => Some(*framebuffer),
        }
    }
}

/// Built-in shader programs used by the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinProgram {
    /// Textured quad, color modulated by alpha (viewport composite)
    ImageModulateAlpha,
    /// Textured quad linearizing depth between `znear` and `zfar`
    ImageDepth,
}

/// Uniform value passed to a built-in program
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// Integer uniform (sampler units)
    Int(i32),
    /// Float uniform
    Float(f32),
}

/// Vertex of an immediate-mode textured quad
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    /// Texture coordinate (0..1)
    pub tex_coord: [f32; 2],
    /// Screen position in pixels
    pub pos: [f32; 2],
}

impl QuadVertex {
    /// Build a vertex from glam vectors
    pub fn new(tex_coord: Vec2, pos: Vec2) -> Self {
        Self {
            tex_coord: tex_coord.to_array(),
            pos: pos.to_array(),
        }
    }
}

/// Graphics device trait
///
/// Implemented by backend contexts and by the test mock. All calls are
/// synchronous; the driver serializes GPU commands internally.
pub trait GraphicsDevice {
    // ===== TEXTURES =====

    /// Create a texture
    ///
    /// # Errors
    ///
    /// `AllocationFailed` / `OutOfMemory` if the GPU refuses the texture.
    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureId>;

    /// Destroy a texture (unknown handles are ignored)
    fn destroy_texture(&mut self, texture: TextureId);

    /// Get the properties of a live texture
    fn texture_info(&self, texture: TextureId) -> Option<TextureInfo>;

    /// Bind a texture to a sampler unit
    fn bind_texture(&mut self, texture: TextureId, unit: u32) -> Result<()>;

    /// Unbind a texture from whatever unit it is bound to
    fn unbind_texture(&mut self, texture: TextureId);

    /// Unbind every outstanding texture binding
    fn unbind_all_textures(&mut self);

    /// Copy the depth content of the current render target into `texture`
    ///
    /// Reads the `width` x `height` region starting at screen offset (`x`, `y`).
    fn copy_depth_to_texture(
        &mut self,
        texture: TextureId,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<()>;

    // ===== FRAMEBUFFERS =====

    /// Create an empty framebuffer object
    fn create_framebuffer(&mut self) -> Result<FramebufferId>;

    /// Destroy a framebuffer object (unknown handles are ignored)
    fn destroy_framebuffer(&mut self, framebuffer: FramebufferId);

    /// Attach a texture to a framebuffer
    ///
    /// Depth textures go to the depth attachment point, color textures to
    /// color slot `slot`.
    fn attach_texture(&mut self, framebuffer: FramebufferId, texture: TextureId, slot: u32) -> Result<()>;

    /// Detach a texture from a framebuffer
    fn detach_texture(&mut self, framebuffer: FramebufferId, texture: TextureId);

    /// Driver completeness check for the current attachment combination
    ///
    /// # Errors
    ///
    /// `ValidationFailed` if the framebuffer is not complete.
    fn check_framebuffer(&mut self, framebuffer: FramebufferId) -> Result<()>;

    // ===== RENDER TARGET STATE =====

    /// Currently active render target
    fn render_target(&self) -> RenderTargetBinding;

    /// Make `target` the active render destination
    fn set_render_target(&mut self, target: RenderTargetBinding) -> Result<()>;

    /// Enable or disable the scissor test
    fn set_scissor_test(&mut self, enabled: bool);

    // ===== IMMEDIATE DRAWING =====

    /// Bind a built-in program for immediate drawing
    fn bind_program(&mut self, program: BuiltinProgram) -> Result<()>;

    /// Unbind the current program
    fn unbind_program(&mut self);

    /// Set a uniform on the bound program
    fn set_uniform(&mut self, name: &str, value: UniformValue) -> Result<()>;

    /// Draw a four-vertex quad with the bound program and textures
    fn draw_quad(&mut self, vertices: &[QuadVertex; 4]) -> Result<()>;
}
