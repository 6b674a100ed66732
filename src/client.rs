use std::{future::Future, path::Path};

use aws_sdk_rekognition::{
    config::{BehaviorVersion, Region},
    error::DisplayErrorContext,
    operation::recognize_celebrities::RecognizeCelebritiesOutput,
    primitives::Blob,
    types::{Celebrity, Image},
};
use log::{debug, error};

use crate::{
    error::RecognitionError,
    face::{BoundingBox, FaceMatch, Recognition, UNKNOWN_NAME},
};

/// A remote capability that finds named celebrities in raw image bytes.
pub trait CelebrityRecognizer {
    fn recognize(
        &self,
        image: Vec<u8>,
    ) -> impl Future<Output = Result<Recognition, RecognitionError>> + Send;
}

// --- Client Implementation ---

/// Rekognition handle, built once per batch and shared by every request.
#[derive(Debug, Clone)]
pub struct RekognitionClient {
    client: aws_sdk_rekognition::Client,
}

impl RekognitionClient {
    pub fn new(client: aws_sdk_rekognition::Client) -> Self {
        Self { client }
    }

    /// Loads credentials and region from the standard AWS provider chain.
    /// `region` overrides whatever the chain resolves.
    pub async fn from_env(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let config = loader.load().await;

        Self::new(aws_sdk_rekognition::Client::new(&config))
    }

    fn parse_response(&self, response: &RecognizeCelebritiesOutput) -> Recognition {
        Recognition {
            faces: response
                .celebrity_faces()
                .iter()
                .map(|c| self.parse_celebrity(c))
                .collect(),
            unrecognized: response.unrecognized_faces().len(),
        }
    }

    fn parse_celebrity(&self, celebrity: &Celebrity) -> FaceMatch {
        let bounding_box = celebrity
            .face()
            .and_then(|f| f.bounding_box())
            .map(|b| BoundingBox {
                left: b.left().unwrap_or(0.0),
                top: b.top().unwrap_or(0.0),
                width: b.width().unwrap_or(0.0),
                height: b.height().unwrap_or(0.0),
            })
            .unwrap_or_default();

        FaceMatch {
            name: celebrity.name().unwrap_or(UNKNOWN_NAME).to_string(),
            confidence: celebrity.match_confidence().unwrap_or(0.0),
            bounding_box,
            id: celebrity.id().map(str::to_string),
            urls: celebrity.urls().to_vec(),
        }
    }
}

impl CelebrityRecognizer for RekognitionClient {
    async fn recognize(&self, image: Vec<u8>) -> Result<Recognition, RecognitionError> {
        let response = self
            .client
            .recognize_celebrities()
            .image(Image::builder().bytes(Blob::new(image)).build())
            .send()
            .await
            .map_err(|e| RecognitionError::Service(DisplayErrorContext(e).to_string()))?;

        Ok(self.parse_response(&response))
    }
}

/// Reads `path` and submits its bytes to `recognizer`.
pub async fn recognize_file<R: CelebrityRecognizer>(
    recognizer: &R,
    path: &Path,
) -> Result<Recognition, RecognitionError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| RecognitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let recognition = recognizer.recognize(bytes).await?;
    debug!(
        "{}: {} celebrities, {} unrecognized faces",
        path.display(),
        recognition.faces.len(),
        recognition.unrecognized
    );
    Ok(recognition)
}

/// Fail-open variant of [`recognize_file`]: any failure is logged and
/// replaced by an empty match list so a batch can move on.
pub async fn recognize_file_or_empty<R: CelebrityRecognizer>(
    recognizer: &R,
    path: &Path,
) -> Vec<FaceMatch> {
    match recognize_file(recognizer, path).await {
        Ok(recognition) => recognition.faces,
        Err(e) => {
            log_recognition_failure(path, &e);
            Vec::new()
        }
    }
}

pub(crate) fn log_recognition_failure(path: &Path, e: &RecognitionError) {
    error!("Error recognizing celebrities in {}: {}", path.display(), e);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    /// Scripted recognizer: hands out queued responses in call order.
    pub(crate) struct FakeRecognizer {
        responses: Mutex<Vec<Result<Recognition, RecognitionError>>>,
        pub(crate) calls: AtomicUsize,
    }

    impl FakeRecognizer {
        pub(crate) fn new(mut responses: Vec<Result<Recognition, RecognitionError>>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl CelebrityRecognizer for FakeRecognizer {
        async fn recognize(&self, _image: Vec<u8>) -> Result<Recognition, RecognitionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(Recognition::default()))
        }
    }

    pub(crate) fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("celebs-{}-{}", std::process::id(), name))
    }

    #[tokio::test]
    async fn returns_service_matches() {
        let path = temp_path("client-ok.bin");
        std::fs::write(&path, b"not really a jpeg").unwrap();

        let face = FaceMatch::new("Ada", 99.0, BoundingBox::default());
        let fake = FakeRecognizer::new(vec![Ok(Recognition {
            faces: vec![face.clone()],
            unrecognized: 2,
        })]);

        let recognition = recognize_file(&fake, &path).await.unwrap();
        assert_eq!(recognition.faces, vec![face]);
        assert_eq!(recognition.unrecognized, 2);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn missing_file_is_io_error_without_calling_service() {
        let fake = FakeRecognizer::new(vec![]);
        let err = recognize_file(&fake, &temp_path("does-not-exist.jpg"))
            .await
            .unwrap_err();

        assert!(matches!(err, RecognitionError::Io { .. }));
        assert_eq!(fake.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn service_failure_yields_empty_list() {
        let path = temp_path("client-fail.bin");
        std::fs::write(&path, b"bytes").unwrap();

        let fake = FakeRecognizer::new(vec![Err(RecognitionError::Service(
            "connection reset".into(),
        ))]);
        assert!(recognize_file_or_empty(&fake, &path).await.is_empty());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn parses_celebrity_with_defaults() {
        use aws_sdk_rekognition::types::ComparedFace;

        let config = aws_sdk_rekognition::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        let client = RekognitionClient::new(aws_sdk_rekognition::Client::from_conf(config));

        let named = Celebrity::builder()
            .name("Neymar")
            .id("1a2b")
            .match_confidence(99.5)
            .urls("www.example.org/neymar")
            .face(
                ComparedFace::builder()
                    .bounding_box(
                        aws_sdk_rekognition::types::BoundingBox::builder()
                            .left(0.25)
                            .top(0.5)
                            .width(0.125)
                            .height(0.25)
                            .build(),
                    )
                    .build(),
            )
            .build();
        let parsed = client.parse_celebrity(&named);
        assert_eq!(parsed.name, "Neymar");
        assert_eq!(parsed.confidence, 99.5);
        assert_eq!(parsed.id.as_deref(), Some("1a2b"));
        assert_eq!(parsed.urls, vec!["www.example.org/neymar".to_string()]);
        assert_eq!(
            parsed.bounding_box,
            BoundingBox {
                left: 0.25,
                top: 0.5,
                width: 0.125,
                height: 0.25,
            }
        );

        let bare = client.parse_celebrity(&Celebrity::builder().build());
        assert_eq!(bare.name, UNKNOWN_NAME);
        assert_eq!(bare.confidence, 0.0);
        assert_eq!(bare.bounding_box, BoundingBox::default());
    }
}
