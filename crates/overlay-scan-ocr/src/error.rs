use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("image data length {provided} does not match width * height ({required})")]
    ImageSizeMismatch { provided: usize, required: usize },
    #[error("image dimensions overflowed while validating width * height (width={width}, height={height})")]
    ImageOverflow { width: u32, height: u32 },
    #[error("backend error: {message}")]
    Backend { message: String },
}

impl OcrError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
