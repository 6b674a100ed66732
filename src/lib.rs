pub mod batch;
pub mod client;
pub mod error;
pub mod face;
pub mod overlay;

pub use crate::{
    batch::{BatchConfig, BatchReport, ImageOutcome, output_path_for, run_batch},
    client::{CelebrityRecognizer, RekognitionClient, recognize_file, recognize_file_or_empty},
    error::{RecognitionError, RenderError},
    face::{BoundingBox, CONFIDENCE_THRESHOLD, FaceMatch, PixelRect, Recognition},
    overlay::{Annotator, OverlayStyle, RenderOutcome},
};
