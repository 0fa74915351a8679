/// Graphics device module - driver context trait and GPU resource types

// Module declarations
pub mod graphics_device;
pub mod texture;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use texture::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
