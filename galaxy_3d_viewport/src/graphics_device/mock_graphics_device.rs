/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Keeps textures and framebuffers in slotmap arenas, records every call in
/// `commands`, captures quad draws and depth copies, and can be told to fail
/// specific driver calls once or permanently.

use rustc_hash::{FxHashMap, FxHashSet};
use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::graphics_device::{
    BuiltinProgram, FramebufferId, GraphicsDevice, QuadVertex, RenderTargetBinding,
    TextureDesc, TextureFormat, TextureId, TextureInfo, UniformValue,
};

/// Driver calls the mock can be told to refuse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockFailure {
    /// `create_framebuffer` returns `AllocationFailed`
    FramebufferCreation,
    /// `create_texture` with this format returns `AllocationFailed`
    TextureCreation(TextureFormat),
    /// `attach_texture` returns `AllocationFailed`
    Attach,
    /// `check_framebuffer` returns `ValidationFailed`
    Validation,
    /// `set_render_target` targeting a framebuffer returns `BackendError`
    BindFramebuffer,
}

// ============================================================================
// Mock resources
// ============================================================================

#[derive(Debug, Clone)]
pub struct MockTexture {
    pub info: TextureInfo,
}

#[derive(Debug, Clone, Default)]
pub struct MockFramebuffer {
    /// Color attachments as (slot, texture)
    pub color: Vec<(u32, TextureId)>,
    pub depth: Option<TextureId>,
}

impl MockFramebuffer {
    fn attached(&self) -> impl Iterator<Item = TextureId> + '_ {
        self.color.iter().map(|(_, texture)| *texture).chain(self.depth)
    }

    fn detach(&mut self, texture: TextureId) {
        self.color.retain(|(_, attached)| *attached != texture);
        if self.depth == Some(texture) {
            self.depth = None;
        }
    }
}

/// A captured `draw_quad` call
#[derive(Debug, Clone, PartialEq)]
pub struct MockDraw {
    pub program: BuiltinProgram,
    /// Bound textures as (unit, texture), sorted by unit
    pub textures: Vec<(u32, TextureId)>,
    pub uniforms: Vec<(String, UniformValue)>,
    pub vertices: [QuadVertex; 4],
    pub target: RenderTargetBinding,
    pub scissor_test: bool,
}

impl MockDraw {
    /// Look up a uniform set before the draw
    pub fn uniform(&self, name: &str) -> Option<UniformValue> {
        self.uniforms
            .iter()
            .rev()
            .find(|(uniform, _)| uniform == name)
            .map(|(_, value)| *value)
    }
}

/// A captured `copy_depth_to_texture` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCopy {
    pub texture: TextureId,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub source: RenderTargetBinding,
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

pub struct MockGraphicsDevice {
    textures: SlotMap<TextureId, MockTexture>,
    framebuffers: SlotMap<FramebufferId, MockFramebuffer>,
    bound_textures: FxHashMap<u32, TextureId>,
    render_target: RenderTargetBinding,
    scissor_test: bool,
    program: Option<BuiltinProgram>,
    uniforms: Vec<(String, UniformValue)>,
    pending_failures: FxHashSet<MockFailure>,
    persistent_failures: FxHashSet<MockFailure>,
    max_texture_size: u32,
    textures_created: usize,
    framebuffers_created: usize,
    pub commands: Vec<String>,
    pub draws: Vec<MockDraw>,
    pub copies: Vec<MockCopy>,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self {
            textures: SlotMap::with_key(),
            framebuffers: SlotMap::with_key(),
            bound_textures: FxHashMap::default(),
            render_target: RenderTargetBinding::Default,
            scissor_test: false,
            program: None,
            uniforms: Vec::new(),
            pending_failures: FxHashSet::default(),
            persistent_failures: FxHashSet::default(),
            max_texture_size: 16384,
            textures_created: 0,
            framebuffers_created: 0,
            commands: Vec::new(),
            draws: Vec::new(),
            copies: Vec::new(),
        }
    }

    /// Refuse the next matching driver call
    pub fn fail_once(&mut self, failure: MockFailure) {
        self.pending_failures.insert(failure);
    }

    /// Refuse every matching driver call until `clear_failures`
    pub fn fail_always(&mut self, failure: MockFailure) {
        self.persistent_failures.insert(failure);
    }

    pub fn clear_failures(&mut self) {
        self.pending_failures.clear();
        self.persistent_failures.clear();
    }

    /// Textures larger than this in either dimension fail with `OutOfMemory`
    pub fn set_max_texture_size(&mut self, size: u32) {
        self.max_texture_size = size;
    }

    pub fn live_texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn live_framebuffer_count(&self) -> usize {
        self.framebuffers.len()
    }

    /// Total number of successful texture creations
    pub fn textures_created(&self) -> usize {
        self.textures_created
    }

    /// Total number of successful framebuffer creations
    pub fn framebuffers_created(&self) -> usize {
        self.framebuffers_created
    }

    pub fn texture(&self, texture: TextureId) -> Option<&MockTexture> {
        self.textures.get(texture)
    }

    pub fn framebuffer(&self, framebuffer: FramebufferId) -> Option<&MockFramebuffer> {
        self.framebuffers.get(framebuffer)
    }

    pub fn scissor_test(&self) -> bool {
        self.scissor_test
    }

    pub fn bound_program(&self) -> Option<BuiltinProgram> {
        self.program
    }

    pub fn bound_texture(&self, unit: u32) -> Option<TextureId> {
        self.bound_textures.get(&unit).copied()
    }

    pub fn bound_texture_count(&self) -> usize {
        self.bound_textures.len()
    }

    /// Number of recorded calls with the given name
    pub fn command_count(&self, name: &str) -> usize {
        self.commands.iter().filter(|command| command.as_str() == name).count()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
        self.draws.clear();
        self.copies.clear();
    }

    fn record(&mut self, command: &str) {
        self.commands.push(command.to_string());
    }

    fn take_failure(&mut self, failure: MockFailure) -> bool {
        self.persistent_failures.contains(&failure) || self.pending_failures.remove(&failure)
    }
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureId> {
        self.record("create_texture");
        if self.take_failure(MockFailure::TextureCreation(desc.format)) {
            return Err(Error::AllocationFailed(format!("mock refused {:?} texture", desc.format)));
        }
        if desc.width == 0 || desc.height == 0 {
            return Err(Error::InvalidResource(format!(
                "texture size {}x{} is empty", desc.width, desc.height
            )));
        }
        if desc.width > self.max_texture_size || desc.height > self.max_texture_size {
            return Err(Error::OutOfMemory);
        }

        self.textures_created += 1;
        Ok(self.textures.insert(MockTexture { info: TextureInfo::from(desc) }))
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.record("destroy_texture");
        if self.textures.remove(texture).is_some() {
            self.bound_textures.retain(|_, bound| *bound != texture);
            for framebuffer in self.framebuffers.values_mut() {
                framebuffer.detach(texture);
            }
        }
    }

    fn texture_info(&self, texture: TextureId) -> Option<TextureInfo> {
        self.textures.get(texture).map(|texture| texture.info)
    }

    fn bind_texture(&mut self, texture: TextureId, unit: u32) -> Result<()> {
        self.record("bind_texture");
        if !self.textures.contains_key(texture) {
            return Err(Error::InvalidResource("bind of unknown texture".to_string()));
        }
        self.bound_textures.insert(unit, texture);
        Ok(())
    }

    fn unbind_texture(&mut self, texture: TextureId) {
        self.record("unbind_texture");
        self.bound_textures.retain(|_, bound| *bound != texture);
    }

    fn unbind_all_textures(&mut self) {
        self.record("unbind_all_textures");
        self.bound_textures.clear();
    }

    fn copy_depth_to_texture(
        &mut self,
        texture: TextureId,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    ) -> Result<()> {
        self.record("copy_depth_to_texture");
        let info = self
            .texture_info(texture)
            .ok_or_else(|| Error::InvalidResource("copy into unknown texture".to_string()))?;
        if width > info.width || height > info.height {
            return Err(Error::InvalidResource(format!(
                "copy region {}x{} exceeds texture {}x{}",
                width, height, info.width, info.height
            )));
        }
        self.copies.push(MockCopy {
            texture,
            x,
            y,
            width,
            height,
            source: self.render_target,
        });
        Ok(())
    }

    fn create_framebuffer(&mut self) -> Result<FramebufferId> {
        self.record("create_framebuffer");
        if self.take_failure(MockFailure::FramebufferCreation) {
            return Err(Error::AllocationFailed("mock refused framebuffer".to_string()));
        }
        self.framebuffers_created += 1;
        Ok(self.framebuffers.insert(MockFramebuffer::default()))
    }

    fn destroy_framebuffer(&mut self, framebuffer: FramebufferId) {
        self.record("destroy_framebuffer");
        if self.framebuffers.remove(framebuffer).is_some()
            && self.render_target.framebuffer() == Some(framebuffer)
        {
            // Deleting the bound framebuffer reverts to the default target
            self.render_target = RenderTargetBinding::Default;
        }
    }

    fn attach_texture(&mut self, framebuffer: FramebufferId, texture: TextureId, slot: u32) -> Result<()> {
        self.record("attach_texture");
        let info = self
            .texture_info(texture)
            .ok_or_else(|| Error::InvalidResource("attach of unknown texture".to_string()))?;
        if !self.framebuffers.contains_key(framebuffer) {
            return Err(Error::InvalidResource("attach to unknown framebuffer".to_string()));
        }
        if self.take_failure(MockFailure::Attach) {
            return Err(Error::AllocationFailed("mock refused attachment".to_string()));
        }

        let Some(target) = self.framebuffers.get_mut(framebuffer) else {
            return Err(Error::InvalidResource("attach to unknown framebuffer".to_string()));
        };
        if info.format.is_depth() {
            target.depth = Some(texture);
        } else {
            target.color.retain(|(attached_slot, _)| *attached_slot != slot);
            target.color.push((slot, texture));
        }
        Ok(())
    }

    fn detach_texture(&mut self, framebuffer: FramebufferId, texture: TextureId) {
        self.record("detach_texture");
        if let Some(target) = self.framebuffers.get_mut(framebuffer) {
            target.detach(texture);
        }
    }

    fn check_framebuffer(&mut self, framebuffer: FramebufferId) -> Result<()> {
        self.record("check_framebuffer");
        let Some(target) = self.framebuffers.get(framebuffer) else {
            return Err(Error::InvalidResource("check of unknown framebuffer".to_string()));
        };

        let sizes: Vec<(u32, u32)> = target
            .attached()
            .filter_map(|texture| self.textures.get(texture))
            .map(|texture| (texture.info.width, texture.info.height))
            .collect();

        if self.take_failure(MockFailure::Validation) {
            return Err(Error::ValidationFailed("mock reported incomplete framebuffer".to_string()));
        }
        match sizes.first() {
            None => Err(Error::ValidationFailed("framebuffer has no attachments".to_string())),
            Some(first) if sizes.iter().any(|size| size != first) => {
                Err(Error::ValidationFailed("attachment sizes differ".to_string()))
            }
            Some(_) => Ok(()),
        }
    }

    fn render_target(&self) -> RenderTargetBinding {
        self.render_target
    }

    fn set_render_target(&mut self, target: RenderTargetBinding) -> Result<()> {
        self.record("set_render_target");
        if let Some(framebuffer) = target.framebuffer() {
            if !self.framebuffers.contains_key(framebuffer) {
                return Err(Error::InvalidResource("bind of unknown framebuffer".to_string()));
            }
            if self.take_failure(MockFailure::BindFramebuffer) {
                return Err(Error::BackendError("mock refused framebuffer bind".to_string()));
            }
        }
        self.render_target = target;
        Ok(())
    }

    fn set_scissor_test(&mut self, enabled: bool) {
        self.record("set_scissor_test");
        self.scissor_test = enabled;
    }

    fn bind_program(&mut self, program: BuiltinProgram) -> Result<()> {
        self.record("bind_program");
        self.program = Some(program);
        self.uniforms.clear();
        Ok(())
    }

    fn unbind_program(&mut self) {
        self.record("unbind_program");
        self.program = None;
        self.uniforms.clear();
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) -> Result<()> {
        self.record("set_uniform");
        if self.program.is_none() {
            return Err(Error::InvalidResource(format!("uniform '{}' set without a program", name)));
        }
        self.uniforms.push((name.to_string(), value));
        Ok(())
    }

    fn draw_quad(&mut self, vertices: &[QuadVertex; 4]) -> Result<()> {
        self.record("draw_quad");
        let Some(program) = self.program else {
            return Err(Error::InvalidResource("draw without a program".to_string()));
        };

        let mut textures: Vec<(u32, TextureId)> =
            self.bound_textures.iter().map(|(unit, texture)| (*unit, *texture)).collect();
        textures.sort_by_key(|(unit, _)| *unit);

        self.draws.push(MockDraw {
            program,
            textures,
            uniforms: self.uniforms.clone(),
            vertices: *vertices,
            target: self.render_target,
            scissor_test: self.scissor_test,
        });
        Ok(())
    }
}
