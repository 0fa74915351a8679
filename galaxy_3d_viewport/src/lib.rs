/*!
# Galaxy 3D Viewport

Offscreen viewport resources for the Galaxy 3D engine.

A viewport pool owns the GPU buffers needed to render a scene into a
rectangular screen region: one framebuffer with a color and a depth
attachment, plus an optional debug overlay that visualizes a captured
depth buffer. Buffers are allocated lazily, reused while the region keeps
its size, and rebuilt when it changes.

All driver access goes through the `GraphicsDevice` trait, passed
explicitly to every call, so the pool can be driven by any backend or by
a recording test device.

## Architecture

- **GraphicsDevice**: Driver context trait (textures, framebuffers, targets, quad draws)
- **Attachment**: Owned render output texture
- **Framebuffer**: Framebuffer object and its attachments
- **ViewportPool**: Lazily sized framebuffer with bind/unbind protocol
- **DebugDepthOverlay**: Depth capture and visualization
- **ViewportManager**: Named viewport pools
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod viewport;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Driver context trait and GPU resource types
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Viewport sub-module
    pub mod viewport {
        pub use crate::viewport::*;
    }
}

// Re-export math library at crate root
pub use glam;
