use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::face::{DetectedFace, FaceRepresentation};
use crate::utils::imaging::DecodedImage;

pub mod deepface;

pub use deepface::DeepFaceClient;

/// Face detection and embedding capability.
#[async_trait]
pub trait FaceAnalyzer: Send + Sync {
    /// Locates faces without requiring one to be present. May return an empty list.
    async fn detect_faces(&self, image: &DecodedImage) -> Result<Vec<DetectedFace>, AppError>;

    /// Produces one representation per face. Fails with `FaceAnalysis` when
    /// no face can be found.
    async fn represent(&self, image: &DecodedImage) -> Result<Vec<FaceRepresentation>, AppError>;
}
