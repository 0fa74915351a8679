/// Texture formats, usage flags, texture descriptor and texture info

use bitflags::bitflags;

/// Pixel format of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    /// Standard dynamic range color (8 bits per channel)
    R8G8B8A8_UNORM,
    /// Half-float single channel (debug depth visualization)
    R16_SFLOAT,
    /// 24-bit depth
    D24_UNORM,
    /// 32-bit float depth
    D32_FLOAT,
}

impl TextureFormat {
    /// Returns true for depth formats
    pub fn is_depth(&self) -> bool {
        matches!(self, TextureFormat::D24_UNORM | TextureFormat::D32_FLOAT)
    }
}

bitflags! {
    /// Texture usage flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureUsage: u32 {
        /// Texture can be sampled in shaders
        const SAMPLED = 1 << 0;
        /// Texture can be used as a color render target
        const RENDER_TARGET = 1 << 1;
        /// Texture can be used as a depth attachment
        const DEPTH_STENCIL = 1 << 2;
        /// Texture can receive framebuffer copies
        const COPY_DST = 1 << 3;
    }
}

/// Descriptor for creating a texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Usage flags
    pub usage: TextureUsage,
}

/// Read-only properties of a created texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel format
    pub format: TextureFormat,
    /// Usage flags
    pub usage: TextureUsage,
}

impl From<&TextureDesc> for TextureInfo {
    fn from(desc: &TextureDesc) -> Self {
        Self {
            width: desc.width,
            height: desc.height,
            format: desc.format,
            usage: desc.usage,
        }
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
