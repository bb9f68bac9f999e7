use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use overlay_scan_ocr::TextRecognizer;
use overlay_scan_source::FrameSource;
use overlay_scan_types::{FrameError, FrameResult, GrayFrame, RegionSet};

use crate::recognize::RegionRecognizer;
use crate::region::process_frame;
use crate::sampler::SamplingPlan;
use crate::table::{ResultTable, SampleRecord};

/// Per-run extraction knobs, built once by the caller and passed by value.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionOptions {
    pub record_confidence: bool,
    pub confidence_threshold: f32,
    pub enhance_contrast: bool,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            record_confidence: false,
            confidence_threshold: 0.3,
            enhance_contrast: false,
        }
    }
}

/// Notification payload handed to an observer after each appended sample.
#[derive(Debug)]
pub struct SampleEvent<'a> {
    pub sample_index: u64,
    pub frame_index: u64,
    pub relative_time: f64,
    pub frame: &'a GrayFrame,
}

/// Optional per-sample hook (progress display, previews). Extraction output
/// is identical whether or not an observer is attached.
pub trait SampleObserver {
    fn sample_recorded(&mut self, event: &SampleEvent<'_>);
}

enum LoopState {
    Init,
    Sampling,
    Draining,
    Done,
}

/// Drive the sampling plan across the frame source and assemble the result
/// table.
///
/// Strictly sequential: each sample's seek, read, and region processing
/// completes before the next frame is requested. End-of-stream and read
/// failures both end the run with the partial table; the stop flag is checked
/// once per sampled frame and ends the run the same way.
pub fn run_extraction(
    source: &mut dyn FrameSource,
    plan: &SamplingPlan,
    regions: &RegionSet,
    engine: &dyn TextRecognizer,
    options: ExtractionOptions,
    mut observer: Option<&mut dyn SampleObserver>,
    stop: &AtomicBool,
) -> FrameResult<ResultTable> {
    engine
        .warm_up()
        .map_err(|err| FrameError::configuration(format!("failed to warm up recognizer: {err}")))?;

    let recognizer = RegionRecognizer::new(
        engine,
        options.enhance_contrast,
        options.confidence_threshold,
    );
    let mut table = ResultTable::new(regions, options.record_confidence);
    let mut k: u64 = 0;
    let mut state = LoopState::Init;

    loop {
        state = match state {
            LoopState::Init => LoopState::Sampling,
            LoopState::Sampling => {
                if stop.load(Ordering::Relaxed) {
                    debug!(samples = table.len(), "stop requested; ending extraction");
                    LoopState::Done
                } else if !plan.in_range(k) {
                    LoopState::Done
                } else {
                    let target = plan.frame_index(k);
                    match source.seek(target).and_then(|_| source.read_next()) {
                        Ok(Some(frame)) => {
                            let readings = process_frame(&frame, regions, &recognizer);
                            let record = SampleRecord {
                                index: k,
                                time: plan.relative_time(k),
                                readings,
                            };
                            table.push(record);
                            if let Some(observer) = observer.as_deref_mut() {
                                observer.sample_recorded(&SampleEvent {
                                    sample_index: k,
                                    frame_index: target,
                                    relative_time: plan.relative_time(k),
                                    frame: &frame,
                                });
                            }
                            k += 1;
                            LoopState::Sampling
                        }
                        Ok(None) => LoopState::Draining,
                        Err(err) => {
                            // Read failures other than end-of-stream drain
                            // identically; the partial table is the result.
                            warn!(frame = target, error = %err, "frame read failed; draining");
                            LoopState::Draining
                        }
                    }
                }
            }
            LoopState::Draining => LoopState::Done,
            LoopState::Done => break,
        };
    }

    Ok(table)
}
