/// Viewport module - offscreen render buffers sized to a screen region

// Module declarations
pub mod rect;
pub mod viewport_config;
pub mod attachment;
pub mod framebuffer;
pub mod screen_quad;
pub mod debug_depth;
pub mod viewport_pool;
pub mod viewport_manager;

// Re-export main types
pub use rect::{Rect, Extent2D};
pub use viewport_config::ViewportConfig;
pub use attachment::{Attachment, AttachmentKind};
pub use framebuffer::{Framebuffer, MAX_COLOR_SLOTS};
pub use debug_depth::DebugDepthOverlay;
pub use viewport_pool::{ViewportPool, ViewportBuffers};
pub use viewport_manager::ViewportManager;
