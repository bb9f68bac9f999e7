use tracing::debug;

use overlay_scan_types::{GrayFrame, RegionDescriptor, RegionSet, Strategy};

use crate::gauge::{Orientation, bar_position};
use crate::recognize::RegionRecognizer;
use crate::table::{Cell, RegionReading};

/// Extract every region's reading from one frame, in declaration order.
///
/// Regions are isolated from each other: a miss or failure in one leaves its
/// cell absent and never affects the others.
pub fn process_frame(
    frame: &GrayFrame,
    regions: &RegionSet,
    recognizer: &RegionRecognizer<'_>,
) -> Vec<RegionReading> {
    regions
        .iter()
        .map(|region| process_region(frame, region, recognizer))
        .collect()
}

fn process_region(
    frame: &GrayFrame,
    region: &RegionDescriptor,
    recognizer: &RegionRecognizer<'_>,
) -> RegionReading {
    let Some(view) = frame.crop(&region.bounds) else {
        debug!(region = %region.name, "region bounds fall outside the frame");
        return RegionReading::default();
    };

    match region.strategy {
        Strategy::HorizontalBar => RegionReading {
            value: bar_position(&view, Orientation::Horizontal)
                .map(Cell::Number)
                .unwrap_or_default(),
            confidence: None,
        },
        Strategy::VerticalBar => RegionReading {
            value: bar_position(&view, Orientation::Vertical)
                .map(Cell::Number)
                .unwrap_or_default(),
            confidence: None,
        },
        Strategy::Text => {
            let observation = recognizer.read_text(&view, region.text_role());
            RegionReading {
                value: observation.text.map(Cell::Text).unwrap_or_default(),
                confidence: observation.confidence,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_scan_ocr::{OcrError, RegionImage, TextCandidate, TextRecognizer};
    use overlay_scan_types::{RegionBounds, RegionSet};

    struct OneShot(&'static str, f32);

    impl TextRecognizer for OneShot {
        fn name(&self) -> &'static str {
            "one-shot"
        }

        fn recognize(&self, _: &RegionImage) -> Result<Vec<TextCandidate>, OcrError> {
            Ok(vec![TextCandidate::new(self.0, self.1)])
        }
    }

    fn bar_frame() -> GrayFrame {
        // 10x4 frame with a sharp step three columns in.
        let row: [u8; 10] = [10, 10, 10, 200, 200, 200, 200, 200, 200, 200];
        let mut data = Vec::new();
        for _ in 0..4 {
            data.extend_from_slice(&row);
        }
        GrayFrame::from_owned(10, 4, 10, data).unwrap()
    }

    #[test]
    fn bar_and_text_regions_fill_independently() {
        let frame = bar_frame();
        let regions = RegionSet::new(vec![
            RegionDescriptor {
                id: 0,
                name: "fuel".into(),
                bounds: RegionBounds::new(0, 0, 10, 4).unwrap(),
                strategy: Strategy::HorizontalBar,
                role: None,
            },
            RegionDescriptor {
                id: 1,
                name: "speed".into(),
                bounds: RegionBounds::new(0, 0, 4, 4).unwrap(),
                strategy: Strategy::Text,
                role: None,
            },
        ])
        .unwrap();
        let engine = OneShot("105", 0.9);
        let recognizer = RegionRecognizer::new(&engine, false, 0.3);

        let readings = process_frame(&frame, &regions, &recognizer);
        assert_eq!(readings.len(), 2);
        let fill = readings[0].value.as_number().unwrap();
        assert!((fill - 2.0 / 9.0).abs() < 1e-9);
        assert_eq!(readings[1].value, Cell::Text("105".into()));
        assert_eq!(readings[1].confidence, Some(0.9));
    }

    #[test]
    fn out_of_frame_region_is_absent_without_affecting_others() {
        let frame = bar_frame();
        let regions = RegionSet::new(vec![
            RegionDescriptor {
                id: 0,
                name: "beyond".into(),
                bounds: RegionBounds::new(0, 0, 64, 64).unwrap(),
                strategy: Strategy::Text,
                role: None,
            },
            RegionDescriptor {
                id: 1,
                name: "fuel".into(),
                bounds: RegionBounds::new(0, 0, 10, 4).unwrap(),
                strategy: Strategy::HorizontalBar,
                role: None,
            },
        ])
        .unwrap();
        let engine = OneShot("105", 0.9);
        let recognizer = RegionRecognizer::new(&engine, false, 0.3);

        let readings = process_frame(&frame, &regions, &recognizer);
        assert!(readings[0].value.is_absent());
        assert!(readings[1].value.as_number().is_some());
    }
}
