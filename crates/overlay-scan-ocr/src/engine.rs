use crate::error::OcrError;
use crate::image::RegionImage;
use crate::response::TextCandidate;

/// Common interface for all text recognizers.
///
/// Implementations return candidates ordered best-first; an empty list means
/// the recognizer saw no text in the region.
pub trait TextRecognizer: Send + Sync {
    fn name(&self) -> &'static str;

    fn warm_up(&self) -> Result<(), OcrError> {
        Ok(())
    }

    fn recognize(&self, image: &RegionImage) -> Result<Vec<TextCandidate>, OcrError>;
}

/// Placeholder recognizer used while a real backend is not wired.
#[derive(Debug, Default)]
pub struct NoopRecognizer;

impl TextRecognizer for NoopRecognizer {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn recognize(&self, _: &RegionImage) -> Result<Vec<TextCandidate>, OcrError> {
        Ok(Vec::new())
    }
}
