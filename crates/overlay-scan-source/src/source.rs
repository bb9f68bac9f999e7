use std::time::Duration;

use overlay_scan_types::{FrameResult, GrayFrame};

pub type DynFrameSource = Box<dyn FrameSource>;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SourceMetadata {
    pub duration: Option<Duration>,
    pub fps: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub total_frames: Option<u64>,
}

impl SourceMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration_and_fps(duration: Duration, fps: f64) -> Self {
        Self {
            duration: Some(duration),
            fps: Some(fps),
            ..Default::default()
        }
    }

    pub fn calculate_total_frames(&self) -> Option<u64> {
        if let Some(total) = self.total_frames {
            return Some(total);
        }

        if let (Some(duration), Some(fps)) = (self.duration, self.fps) {
            let total = (duration.as_secs_f64() * fps).round();
            if total.is_finite() && total >= 0.0 {
                return Some(total as u64);
            }
        }

        None
    }
}

/// Seekable sequential access to a decoded video's intensity frames.
///
/// Decoding itself lives behind this trait; the extraction pipeline only
/// ever seeks to a target frame index and reads the frame positioned there.
pub trait FrameSource: Send {
    fn metadata(&self) -> SourceMetadata {
        SourceMetadata::default()
    }

    /// Frames per second of the underlying stream.
    fn fps(&self) -> f64;

    /// Position the source so the next [`read_next`](Self::read_next)
    /// returns the frame at `frame_index`.
    fn seek(&mut self, frame_index: u64) -> FrameResult<()>;

    /// Read the frame at the current position, advancing by one.
    /// `Ok(None)` signals end-of-stream and is not an error.
    fn read_next(&mut self) -> FrameResult<Option<GrayFrame>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_total_frames_derived_from_duration() {
        let metadata = SourceMetadata::with_duration_and_fps(Duration::from_secs(4), 25.0);
        assert_eq!(metadata.calculate_total_frames(), Some(100));
    }

    #[test]
    fn metadata_explicit_total_wins() {
        let mut metadata = SourceMetadata::with_duration_and_fps(Duration::from_secs(4), 25.0);
        metadata.total_frames = Some(42);
        assert_eq!(metadata.calculate_total_frames(), Some(42));
    }
}
