use std::path::PathBuf;
use std::time::Duration;

use overlay_scan_types::{FrameResult, GrayFrame};

use crate::source::{DynFrameSource, FrameSource, SourceMetadata};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 360;
const STRIDE: usize = 640;
const FRAME_COUNT: u64 = 600;
const FPS: f64 = 30.0;

/// Rows covered by the synthetic progress bar.
const BAR_TOP: usize = 300;
const BAR_BOTTOM: usize = 340;

/// Deterministic synthetic source used when no real decoder is wired in.
///
/// Frames carry a row gradient plus a horizontal progress bar whose fill
/// fraction advances linearly with the frame index, so a horizontal-bar
/// region over rows 300..340 produces a rising signal.
pub struct MockSource {
    _input: Option<PathBuf>,
    cursor: u64,
}

impl MockSource {
    fn new(input: Option<PathBuf>) -> Self {
        Self {
            _input: input,
            cursor: 0,
        }
    }

    fn render(&self, index: u64) -> FrameResult<GrayFrame> {
        let mut data = vec![0u8; STRIDE * HEIGHT as usize];
        for (row, chunk) in data.chunks_mut(STRIDE).enumerate() {
            let value = ((row as u64 + index) % 256) as u8;
            chunk.fill(value);
        }
        let fill = index as f64 / FRAME_COUNT as f64;
        let boundary = (fill * WIDTH as f64) as usize;
        for row in BAR_TOP..BAR_BOTTOM {
            let row_data = &mut data[row * STRIDE..row * STRIDE + WIDTH as usize];
            for (x, px) in row_data.iter_mut().enumerate() {
                *px = if x < boundary { 230 } else { 20 };
            }
        }
        Ok(GrayFrame::from_owned(WIDTH, HEIGHT, STRIDE, data)?.with_frame_index(Some(index)))
    }
}

impl FrameSource for MockSource {
    fn metadata(&self) -> SourceMetadata {
        SourceMetadata {
            duration: Some(Duration::from_secs_f64(FRAME_COUNT as f64 / FPS)),
            fps: Some(FPS),
            width: Some(WIDTH),
            height: Some(HEIGHT),
            total_frames: Some(FRAME_COUNT),
        }
    }

    fn fps(&self) -> f64 {
        FPS
    }

    fn seek(&mut self, frame_index: u64) -> FrameResult<()> {
        self.cursor = frame_index;
        Ok(())
    }

    fn read_next(&mut self) -> FrameResult<Option<GrayFrame>> {
        if self.cursor >= FRAME_COUNT {
            return Ok(None);
        }
        let frame = self.render(self.cursor)?;
        self.cursor += 1;
        Ok(Some(frame))
    }
}

pub fn boxed_mock(input: Option<PathBuf>) -> FrameResult<DynFrameSource> {
    Ok(Box::new(MockSource::new(input)))
}
