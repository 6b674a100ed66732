use std::path::{Path, PathBuf};

use log::info;

use crate::{
    client::{CelebrityRecognizer, log_recognition_failure, recognize_file},
    overlay::{Annotator, RenderOutcome, log_render_failure},
};

pub const DEFAULT_SUFFIX: &str = "-result";
pub const DEFAULT_EXTENSION: &str = "jpg";

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub images: Vec<PathBuf>,
    /// Appended to each input stem to name its output.
    pub suffix: String,
}

impl BatchConfig {
    pub fn new(images: Vec<PathBuf>) -> Self {
        Self {
            images,
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Annotated { output: PathBuf, drawn: usize },
    NoCelebrities,
    RecognitionFailed(String),
    RenderFailed(String),
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// One entry per input image, in input order.
    pub outcomes: Vec<(PathBuf, ImageOutcome)>,
}

impl BatchReport {
    pub fn annotated(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, ImageOutcome::Annotated { .. }))
            .count()
    }

    pub fn failures(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| {
                matches!(
                    o,
                    ImageOutcome::RecognitionFailed(_) | ImageOutcome::RenderFailed(_)
                )
            })
            .count()
    }
}

/// `dir/photo.png` becomes `dir/photo<suffix>.png`; inputs without an
/// extension get `.jpg`.
pub fn output_path_for(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

    input.with_file_name(format!("{stem}{suffix}.{extension}"))
}

/// Processes every configured image one after another. A failure on one
/// image is logged and recorded, and the batch moves on to the next.
pub async fn run_batch<R: CelebrityRecognizer>(
    recognizer: &R,
    annotator: &Annotator,
    config: &BatchConfig,
) -> BatchReport {
    let mut report = BatchReport::default();

    for path in &config.images {
        let outcome = process_image(recognizer, annotator, path, &config.suffix).await;
        report.outcomes.push((path.clone(), outcome));
    }

    info!(
        "Processed {} images: {} annotated, {} failed",
        report.outcomes.len(),
        report.annotated(),
        report.failures()
    );
    report
}

async fn process_image<R: CelebrityRecognizer>(
    recognizer: &R,
    annotator: &Annotator,
    path: &Path,
    suffix: &str,
) -> ImageOutcome {
    let faces = match recognize_file(recognizer, path).await {
        Ok(recognition) => recognition.faces,
        Err(e) => {
            log_recognition_failure(path, &e);
            return ImageOutcome::RecognitionFailed(e.to_string());
        }
    };

    if faces.is_empty() {
        info!("No celebrities found in image: {}", path.display());
        return ImageOutcome::NoCelebrities;
    }

    let output = output_path_for(path, suffix);
    match annotator.annotate_file(path, &output, &faces) {
        Ok(RenderOutcome::Saved { output, drawn }) => ImageOutcome::Annotated { output, drawn },
        Ok(RenderOutcome::Skipped) => ImageOutcome::NoCelebrities,
        Err(e) => {
            log_render_failure(path, &e);
            ImageOutcome::RenderFailed(e.to_string())
        }
    }
}
