/// Immediate-mode textured quad used to present viewport textures

use glam::Vec2;

use crate::error::Result;
use crate::graphics_device::{BuiltinProgram, GraphicsDevice, QuadVertex, TextureId, UniformValue};

/// Sampler unit the presented texture is bound to
pub const IMAGE_UNIT: u32 = 0;

/// Quad covering (0,0)-(width,height) in screen pixels, texture (0,0)-(1,1)
pub fn screen_quad(width: f32, height: f32) -> [QuadVertex; 4] {
    [
        QuadVertex::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 0.0)),
        QuadVertex::new(Vec2::new(1.0, 0.0), Vec2::new(width, 0.0)),
        QuadVertex::new(Vec2::new(1.0, 1.0), Vec2::new(width, height)),
        QuadVertex::new(Vec2::new(0.0, 1.0), Vec2::new(0.0, height)),
    ]
}

/// Draw `texture` as a `width` x `height` quad with a built-in program
///
/// The texture and program are unbound again even if the draw fails.
pub(crate) fn draw_textured_quad(
    device: &mut dyn GraphicsDevice,
    program: BuiltinProgram,
    texture: TextureId,
    width: u32,
    height: u32,
    uniforms: &[(&str, UniformValue)],
) -> Result<()> {
    device.bind_program(program)?;

    let result = draw_bound(device, texture, width, height, uniforms);

    device.unbind_texture(texture);
    device.unbind_program();
    result
}

fn draw_bound(
    device: &mut dyn GraphicsDevice,
    texture: TextureId,
    width: u32,
    height: u32,
    uniforms: &[(&str, UniformValue)],
) -> Result<()> {
    device.bind_texture(texture, IMAGE_UNIT)?;
    for (name, value) in uniforms {
        device.set_uniform(name, *value)?;
    }
    device.set_uniform("image", UniformValue::Int(IMAGE_UNIT as i32))?;
    device.draw_quad(&screen_quad(width as f32, height as f32))
}

#[cfg(test)]
#[path = "screen_quad_tests.rs"]
mod tests;
