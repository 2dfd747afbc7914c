//! Shared fixtures for unit tests.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

use crate::errors::AppError;
use crate::models::face::{DetectedFace, FaceRepresentation, FacialArea};
use crate::recognition::FaceAnalyzer;
use crate::utils::imaging::DecodedImage;

/// Base64 PNG of a solid-colour image.
pub fn png_base64(width: u32, height: u32, color: [u8; 3]) -> String {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)));
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();
    STANDARD.encode(buffer.into_inner())
}

/// Deterministic analyzer: the embedding is the image's mean RGB colour.
/// Pure black images have no face.
pub struct StubAnalyzer;

impl StubAnalyzer {
    pub fn embedding_for(color: [u8; 3]) -> Vec<f32> {
        color.iter().map(|c| *c as f32 / 255.0).collect()
    }

    fn mean_color(image: &DynamicImage) -> [u8; 3] {
        let rgb = image.to_rgb8();
        let count = (rgb.width() * rgb.height()).max(1) as u64;
        let mut sums = [0u64; 3];
        for pixel in rgb.pixels() {
            for (sum, channel) in sums.iter_mut().zip(pixel.0.iter()) {
                *sum += *channel as u64;
            }
        }
        sums.map(|sum| (sum / count) as u8)
    }

    fn whole_image(image: &DynamicImage) -> FacialArea {
        FacialArea { x: 0, y: 0, w: image.width(), h: image.height() }
    }
}

#[async_trait]
impl FaceAnalyzer for StubAnalyzer {
    async fn detect_faces(&self, image: &DecodedImage) -> Result<Vec<DetectedFace>, AppError> {
        tokio::task::yield_now().await;
        if Self::mean_color(&image.image) == [0, 0, 0] {
            return Ok(Vec::new());
        }
        Ok(vec![DetectedFace {
            area: Self::whole_image(&image.image),
            confidence: 1.0,
            crop: image.image.clone(),
        }])
    }

    async fn represent(&self, image: &DecodedImage) -> Result<Vec<FaceRepresentation>, AppError> {
        tokio::task::yield_now().await;
        let color = Self::mean_color(&image.image);
        if color == [0, 0, 0] {
            return Err(AppError::FaceAnalysis("No face detected in image".to_string()));
        }
        Ok(vec![FaceRepresentation {
            embedding: Self::embedding_for(color),
            facial_area: Self::whole_image(&image.image),
            face_confidence: 1.0,
        }])
    }
}
