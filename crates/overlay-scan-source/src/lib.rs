pub mod backends;
pub mod config;
pub mod source;

pub use config::{Backend, Configuration};
pub use source::{DynFrameSource, FrameSource, SourceMetadata};

pub use overlay_scan_types::{FrameError, FrameResult, GrayFrame};
