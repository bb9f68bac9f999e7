use std::fmt;
use std::sync::Arc;

use crate::region::RegionBounds;
use crate::{FrameError, FrameResult};

/// Single-channel intensity frame as produced by a frame source.
///
/// Rows are `stride` bytes apart; only the first `width` bytes of each row
/// carry pixel data. The buffer is shared so frames can be handed to an
/// observer without copying.
#[derive(Clone)]
pub struct GrayFrame {
    width: u32,
    height: u32,
    stride: usize,
    frame_index: Option<u64>,
    data: Arc<[u8]>,
}

impl fmt::Debug for GrayFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrayFrame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .field("frame_index", &self.frame_index)
            .field("bytes", &self.data.len())
            .finish()
    }
}

impl GrayFrame {
    pub fn from_owned(
        width: u32,
        height: u32,
        stride: usize,
        data: Vec<u8>,
    ) -> FrameResult<Self> {
        if stride < width as usize {
            return Err(FrameError::InvalidFrame {
                reason: format!("stride {} is smaller than width {}", stride, width),
            });
        }
        let required =
            stride
                .checked_mul(height as usize)
                .ok_or_else(|| FrameError::InvalidFrame {
                    reason: "calculated plane length overflowed".into(),
                })?;
        if data.len() < required {
            return Err(FrameError::InvalidFrame {
                reason: format!(
                    "insufficient plane bytes: got {} expected at least {}",
                    data.len(),
                    required
                ),
            });
        }
        Ok(Self {
            width,
            height,
            stride,
            frame_index: None,
            data: Arc::from(data.into_boxed_slice()),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn frame_index(&self) -> Option<u64> {
        self.frame_index
    }

    pub fn with_frame_index(mut self, index: Option<u64>) -> Self {
        self.frame_index = index;
        self
    }

    /// Borrow the rectangle described by `bounds` out of this frame.
    ///
    /// Returns `None` when the bounds fall outside the frame; callers treat
    /// that as a missing reading rather than an error.
    pub fn crop(&self, bounds: &RegionBounds) -> Option<RegionView<'_>> {
        if bounds.x2 > self.width || bounds.y2 > self.height {
            return None;
        }
        Some(RegionView {
            width: bounds.width(),
            height: bounds.height(),
            stride: self.stride,
            data: &self.data[bounds.y1 as usize * self.stride + bounds.x1 as usize..],
        })
    }
}

/// Borrowed window into a [`GrayFrame`].
///
/// `data` starts at the window's top-left pixel; rows remain `stride` bytes
/// apart in the parent frame's buffer.
#[derive(Clone, Copy)]
pub struct RegionView<'a> {
    width: u32,
    height: u32,
    stride: usize,
    data: &'a [u8],
}

impl<'a> RegionView<'a> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn row(&self, y: u32) -> &'a [u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize]
    }

    pub fn pixel(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.stride + x as usize]
    }

    /// Copy the window into a contiguous row-major buffer.
    pub fn to_contiguous(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            out.extend_from_slice(self.row(y));
        }
        out
    }
}

impl fmt::Debug for RegionView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionView")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::RegionBounds;

    fn frame_4x3() -> GrayFrame {
        // stride 5, one padding byte per row
        let mut data = vec![0u8; 15];
        for y in 0..3usize {
            for x in 0..4usize {
                data[y * 5 + x] = (y * 10 + x) as u8;
            }
        }
        GrayFrame::from_owned(4, 3, 5, data).expect("frame")
    }

    #[test]
    fn from_owned_rejects_short_buffers() {
        let err = GrayFrame::from_owned(4, 3, 5, vec![0u8; 10]).unwrap_err();
        assert!(matches!(err, FrameError::InvalidFrame { .. }));
    }

    #[test]
    fn from_owned_rejects_stride_below_width() {
        let err = GrayFrame::from_owned(4, 3, 2, vec![0u8; 20]).unwrap_err();
        assert!(matches!(err, FrameError::InvalidFrame { .. }));
    }

    #[test]
    fn crop_respects_stride() {
        let frame = frame_4x3();
        let bounds = RegionBounds::new(1, 1, 4, 3).unwrap();
        let view = frame.crop(&bounds).expect("view");
        assert_eq!(view.width(), 3);
        assert_eq!(view.height(), 2);
        assert_eq!(view.row(0), &[11, 12, 13]);
        assert_eq!(view.row(1), &[21, 22, 23]);
        assert_eq!(view.pixel(2, 1), 23);
        assert_eq!(view.to_contiguous(), vec![11, 12, 13, 21, 22, 23]);
    }

    #[test]
    fn crop_outside_frame_is_none() {
        let frame = frame_4x3();
        let bounds = RegionBounds::new(1, 1, 5, 3).unwrap();
        assert!(frame.crop(&bounds).is_none());
    }
}
