use tracing::{debug, info};

use overlay_scan_ocr::{RegionImage, TextRecognizer};
use overlay_scan_types::{RegionView, TextRole};

use crate::normalize::normalize_text;

const CONTRAST_SCALE: f32 = 1.1;
const CONTRAST_OFFSET: f32 = -40.0;

/// Unsharp mask: a normalized 5x5 low-pass complement around a strongly
/// negative center, scaled by -1/256. Counteracts compression blur on small
/// overlay text after the contrast pass.
const SHARPEN_KERNEL: [[f32; 5]; 5] = {
    const W: [[f32; 5]; 5] = [
        [1.0, 4.0, 6.0, 4.0, 1.0],
        [4.0, 16.0, 24.0, 16.0, 4.0],
        [6.0, 24.0, -476.0, 24.0, 6.0],
        [4.0, 16.0, 24.0, 16.0, 4.0],
        [1.0, 4.0, 6.0, 4.0, 1.0],
    ];
    let mut k = W;
    let mut r = 0;
    while r < 5 {
        let mut c = 0;
        while c < 5 {
            k[r][c] = -(1.0 / 256.0) * W[r][c];
            c += 1;
        }
        r += 1;
    }
    k
};

/// One region's recognizer outcome. `confidence` is present whenever the
/// recognizer produced a candidate, even when that candidate failed the
/// threshold and `text` is absent.
#[derive(Debug, Clone, Default)]
pub struct TextObservation {
    pub text: Option<String>,
    pub confidence: Option<f32>,
}

/// Wraps the external recognition capability with optional pre-enhancement
/// and confidence filtering.
pub struct RegionRecognizer<'a> {
    engine: &'a dyn TextRecognizer,
    enhance_contrast: bool,
    confidence_threshold: f32,
}

impl<'a> RegionRecognizer<'a> {
    pub fn new(
        engine: &'a dyn TextRecognizer,
        enhance_contrast: bool,
        confidence_threshold: f32,
    ) -> Self {
        Self {
            engine,
            enhance_contrast,
            confidence_threshold,
        }
    }

    pub fn read_text(&self, view: &RegionView<'_>, role: TextRole) -> TextObservation {
        let mut image = RegionImage::from_view(view);
        if self.enhance_contrast {
            enhance(&mut image);
        }

        let candidates = match self.engine.recognize(&image) {
            Ok(candidates) => candidates,
            Err(err) => {
                debug!(engine = self.engine.name(), error = %err, "recognizer failed for region");
                return TextObservation::default();
            }
        };

        let Some(best) = candidates.first() else {
            return TextObservation::default();
        };

        if best.confidence < self.confidence_threshold {
            debug!(
                text = %best.text,
                confidence = best.confidence,
                threshold = self.confidence_threshold,
                "candidate below confidence threshold"
            );
            return TextObservation {
                text: None,
                confidence: Some(best.confidence),
            };
        }

        let cleaned = normalize_text(&best.text, role);
        info!(text = %cleaned, confidence = best.confidence, "found text");
        TextObservation {
            text: Some(cleaned),
            confidence: Some(best.confidence),
        }
    }
}

/// Fixed linear contrast/brightness adjustment followed by the sharpen
/// convolution. Applied before recognition when contrast enhancement is on.
pub fn enhance(image: &mut RegionImage) {
    for px in image.data_mut() {
        let scaled = *px as f32 * CONTRAST_SCALE + CONTRAST_OFFSET;
        *px = scaled.abs().round().min(255.0) as u8;
    }
    convolve_5x5(image, &SHARPEN_KERNEL);
}

/// 5x5 convolution with reflected borders (edge pixel not repeated), output
/// saturated to the 8-bit range.
fn convolve_5x5(image: &mut RegionImage, kernel: &[[f32; 5]; 5]) {
    let width = image.width() as i64;
    let height = image.height() as i64;
    let source = image.data().to_vec();

    let reflect = |index: i64, len: i64| -> usize {
        let mut i = index;
        if i < 0 {
            i = -i;
        }
        if i >= len {
            i = 2 * len - 2 - i;
        }
        i.clamp(0, len - 1) as usize
    };

    let out = image.data_mut();
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0f32;
            for (ky, row) in kernel.iter().enumerate() {
                let sy = reflect(y + ky as i64 - 2, height);
                for (kx, weight) in row.iter().enumerate() {
                    let sx = reflect(x + kx as i64 - 2, width);
                    acc += weight * source[sy * width as usize + sx] as f32;
                }
            }
            out[(y * width + x) as usize] = acc.round().clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_scan_ocr::{OcrError, TextCandidate};

    struct FixedRecognizer(Vec<TextCandidate>);

    impl TextRecognizer for FixedRecognizer {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn recognize(&self, _: &RegionImage) -> Result<Vec<TextCandidate>, OcrError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenRecognizer;

    impl TextRecognizer for BrokenRecognizer {
        fn name(&self) -> &'static str {
            "broken"
        }

        fn recognize(&self, _: &RegionImage) -> Result<Vec<TextCandidate>, OcrError> {
            Err(OcrError::backend("recognizer crashed"))
        }
    }

    fn sample_view_observation(engine: &dyn TextRecognizer, threshold: f32) -> TextObservation {
        use overlay_scan_types::{GrayFrame, RegionBounds};
        let frame = GrayFrame::from_owned(8, 8, 8, vec![100; 64]).unwrap();
        let bounds = RegionBounds::new(0, 0, 8, 8).unwrap();
        let view = frame.crop(&bounds).unwrap();
        RegionRecognizer::new(engine, false, threshold).read_text(&view, TextRole::Numeric)
    }

    #[test]
    fn below_threshold_keeps_confidence_but_no_value() {
        let engine = FixedRecognizer(vec![TextCandidate::new("1O5", 0.2)]);
        let observation = sample_view_observation(&engine, 0.3);
        assert!(observation.text.is_none());
        assert_eq!(observation.confidence, Some(0.2));
    }

    #[test]
    fn top_candidate_is_normalized() {
        let engine = FixedRecognizer(vec![
            TextCandidate::new("1O5", 0.9),
            TextCandidate::new("185", 0.4),
        ]);
        let observation = sample_view_observation(&engine, 0.3);
        assert_eq!(observation.text.as_deref(), Some("105"));
        assert_eq!(observation.confidence, Some(0.9));
    }

    #[test]
    fn recognizer_failure_yields_empty_observation() {
        let observation = sample_view_observation(&BrokenRecognizer, 0.3);
        assert!(observation.text.is_none());
        assert!(observation.confidence.is_none());
    }

    #[test]
    fn enhancement_is_identity_scale_on_constant_images() {
        // The kernel weights sum to exactly 1, so a constant image stays
        // constant at the contrast-adjusted level.
        let mut image = RegionImage::from_parts(6, 6, vec![100; 36]).unwrap();
        enhance(&mut image);
        let expected = (100.0f32 * CONTRAST_SCALE + CONTRAST_OFFSET).round() as u8;
        assert!(image.data().iter().all(|&px| px == expected));
    }

    #[test]
    fn contrast_pass_reflects_negative_values() {
        // Matching the absolute-value behavior of the fixed adjustment:
        // dark pixels below the offset fold back up instead of clamping.
        let mut image = RegionImage::from_parts(1, 1, vec![0]).unwrap();
        for px in image.data_mut() {
            let scaled = *px as f32 * CONTRAST_SCALE + CONTRAST_OFFSET;
            *px = scaled.abs().round().min(255.0) as u8;
        }
        assert_eq!(image.data()[0], 40);
    }
}
