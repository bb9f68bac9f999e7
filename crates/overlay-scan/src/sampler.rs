use overlay_scan_types::{FrameError, FrameResult};

/// Which frames a run visits and the relative timestamp of each visit.
///
/// Sampling is strictly frame-count-based: sample `k` maps to absolute frame
/// `start_frame + k * interval_frames` and relative time
/// `k * interval_frames / fps`, and the range check compares that same
/// relative time against `end_time - start_time`. Constructed once per run,
/// read-only afterwards.
#[derive(Debug, Clone)]
pub struct SamplingPlan {
    fps: f64,
    start_time: f64,
    end_time: f64,
    interval_frames: u32,
    start_frame: u64,
}

impl SamplingPlan {
    pub fn new(
        fps: f64,
        start_time: f64,
        end_time: f64,
        interval_frames: u32,
    ) -> FrameResult<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(FrameError::configuration(format!(
                "fps must be a positive number, got {fps}"
            )));
        }
        if !start_time.is_finite() || start_time < 0.0 {
            return Err(FrameError::configuration(format!(
                "start_time must be non-negative, got {start_time}"
            )));
        }
        if !end_time.is_finite() || end_time <= start_time {
            return Err(FrameError::configuration(format!(
                "end_time ({end_time}) must be greater than start_time ({start_time})"
            )));
        }
        // An interval of zero would never advance; reject rather than coerce.
        if interval_frames == 0 {
            return Err(FrameError::configuration(
                "interval_frames must be at least 1",
            ));
        }
        Ok(Self {
            fps,
            start_time,
            end_time,
            interval_frames,
            start_frame: (start_time * fps).floor() as u64,
        })
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn start_frame(&self) -> u64 {
        self.start_frame
    }

    pub fn interval_frames(&self) -> u32 {
        self.interval_frames
    }

    /// Absolute frame index visited by sample `k`.
    pub fn frame_index(&self, k: u64) -> u64 {
        self.start_frame + k * self.interval_frames as u64
    }

    /// Timestamp of sample `k` relative to the run's start.
    pub fn relative_time(&self, k: u64) -> f64 {
        k as f64 * self.interval_frames as f64 / self.fps
    }

    pub fn in_range(&self, k: u64) -> bool {
        self.relative_time(k) < self.end_time - self.start_time
    }

    /// Number of samples the plan implies; extraction may stop earlier on
    /// source exhaustion.
    pub fn expected_samples(&self) -> u64 {
        let span = self.end_time - self.start_time;
        let per_sample = self.interval_frames as f64 / self.fps;
        (span / per_sample).ceil() as u64
    }
}
