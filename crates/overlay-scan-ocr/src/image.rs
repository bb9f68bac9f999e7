use std::fmt;

use overlay_scan_types::RegionView;

use crate::error::OcrError;

/// Owned 8-bit gray image handed to a recognizer.
///
/// Owned rather than borrowed because the recognizer adapter may run an
/// enhancement pass over the pixels before recognition.
#[derive(Clone)]
pub struct RegionImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RegionImage {
    pub fn from_parts(width: u32, height: u32, data: Vec<u8>) -> Result<Self, OcrError> {
        let required = (width as usize)
            .checked_mul(height as usize)
            .ok_or(OcrError::ImageOverflow { width, height })?;
        if data.len() != required {
            return Err(OcrError::ImageSizeMismatch {
                provided: data.len(),
                required,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_view(view: &RegionView<'_>) -> Self {
        Self {
            width: view.width(),
            height: view.height(),
            data: view.to_contiguous(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn pixel(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }
}

impl fmt::Debug for RegionImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_validates_length() {
        assert!(RegionImage::from_parts(2, 2, vec![0; 4]).is_ok());
        let err = RegionImage::from_parts(2, 2, vec![0; 3]).unwrap_err();
        assert!(matches!(err, OcrError::ImageSizeMismatch { .. }));
    }
}
