//! Shared domain models for the overlay-scan workspace.
//!
//! This crate centralizes lightweight data structures used across the frame
//! source, recognizer, and CLI crates. Keep it backend-agnostic and avoid
//! heavy dependencies so every crate can depend on it without pulling native
//! SDKs.

mod frame;
mod region;

use thiserror::Error;

pub use frame::{GrayFrame, RegionView};
pub use region::{RegionBounds, RegionDescriptor, RegionSet, Strategy, TextRole};

pub type FrameResult<T> = Result<T, FrameError>;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("backend {backend} is not supported in this build")]
    Unsupported { backend: &'static str },

    #[error("{backend} backend failed: {message}")]
    BackendFailure {
        backend: &'static str,
        message: String,
    },

    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("invalid frame: {reason}")]
    InvalidFrame { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    pub fn unsupported(backend: &'static str) -> Self {
        Self::Unsupported { backend }
    }

    pub fn backend_failure(backend: &'static str, message: impl Into<String>) -> Self {
        Self::BackendFailure {
            backend,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
