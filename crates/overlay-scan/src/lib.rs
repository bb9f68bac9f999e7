pub mod cli;
pub mod gauge;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod recognize;
pub mod region;
pub mod sampler;
pub mod settings;
pub mod table;

pub use overlay_scan_ocr::{NoopRecognizer, OcrError, RegionImage, TextCandidate, TextRecognizer};
pub use overlay_scan_source::{Backend, Configuration, DynFrameSource, FrameSource, SourceMetadata};
pub use overlay_scan_types::{
    FrameError, FrameResult, GrayFrame, RegionBounds, RegionDescriptor, RegionSet, RegionView,
    Strategy, TextRole,
};

pub use pipeline::{ExtractionOptions, SampleEvent, SampleObserver, run_extraction};
pub use sampler::SamplingPlan;
pub use table::{Cell, RegionReading, ResultTable, SampleRecord, post_process};
