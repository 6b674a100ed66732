use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecognitionError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("recognition service error: {0}")]
    Service(String),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("failed to load font {path}: {reason}")]
    Font { path: PathBuf, reason: String },

    #[error("output path {0} is the source image")]
    OutputIsSource(PathBuf),
}
