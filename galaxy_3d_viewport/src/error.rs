//! Error types for the Galaxy3D viewport
//!
//! This module defines the error types used by the viewport resource pool,
//! the debug depth overlay and the graphics device abstraction.

use std::fmt;

/// Result type for Galaxy3D viewport operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D viewport errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backend-specific error (driver call failed for another reason)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (unknown handle, degenerate rectangle, occupied slot, etc.)
    InvalidResource(String),

    /// GPU refused to create a texture or framebuffer object
    AllocationFailed(String),

    /// Attachments were created but the framebuffer is not complete
    ValidationFailed(String),
}

impl Error {
    /// Returns true if the GPU refused to allocate a resource
    ///
    /// Covers both explicit allocation refusals and out-of-memory conditions.
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, Error::AllocationFailed(_) | Error::OutOfMemory)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::AllocationFailed(msg) => write!(f, "Allocation failed: {}", msg),
            Error::ValidationFailed(msg) => write!(f, "Validation failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
