mod engine;
mod error;
mod image;
mod response;

pub use engine::{NoopRecognizer, TextRecognizer};
pub use error::OcrError;
pub use image::RegionImage;
pub use response::TextCandidate;
