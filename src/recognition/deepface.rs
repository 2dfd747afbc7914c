//! Client for a DeepFace REST service.
//!
//! Both operations go through the `/represent` endpoint: detection asks for a
//! lenient pass and crops the returned facial areas locally, embedding asks
//! the service to enforce that a face is present.

use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::AppError;
use crate::models::face::{DetectedFace, FaceRepresentation};
use crate::recognition::FaceAnalyzer;
use crate::utils::imaging::{self, DecodedImage};

#[derive(Serialize)]
struct RepresentRequest<'a> {
    img: String,
    model_name: &'a str,
    detector_backend: &'a str,
    enforce_detection: bool,
}

#[derive(Deserialize)]
struct RepresentResponse {
    #[serde(default)]
    results: Vec<FaceRepresentation>,
}

#[derive(Deserialize)]
struct ServiceError {
    #[serde(default)]
    error: String,
}

pub struct DeepFaceClient {
    http: reqwest::Client,
    represent_url: Url,
    model_name: String,
    detector_backend: String,
}

impl DeepFaceClient {
    pub fn new(
        base_url: &Url,
        model_name: &str,
        detector_backend: &str,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let represent_url = base_url
            .join("represent")
            .map_err(|err| AppError::ConfigError(format!("Invalid DeepFace URL: {}", err)))?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::ConfigError(format!("HTTP client: {}", err)))?;

        Ok(Self {
            http,
            represent_url,
            model_name: model_name.to_string(),
            detector_backend: detector_backend.to_string(),
        })
    }

    async fn call_represent(
        &self,
        image: &DecodedImage,
        enforce_detection: bool,
    ) -> Result<Vec<FaceRepresentation>, AppError> {
        let request = RepresentRequest {
            img: imaging::to_png_data_uri(&image.image)?,
            model_name: &self.model_name,
            detector_backend: &self.detector_backend,
            enforce_detection,
        };

        let response = self
            .http
            .post(self.represent_url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|err| AppError::Upstream(err.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::FaceAnalysis(service_error_message(status, &body)));
        }
        if !status.is_success() {
            return Err(AppError::Upstream(format!("DeepFace responded with {}", status)));
        }

        let parsed: RepresentResponse = response
            .json()
            .await
            .map_err(|err| AppError::Upstream(format!("Malformed DeepFace response: {}", err)))?;
        debug!(
            "DeepFace returned {} face(s) (enforce_detection={})",
            parsed.results.len(),
            enforce_detection
        );
        Ok(parsed.results)
    }
}

fn service_error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ServiceError>(body) {
        Ok(parsed) if !parsed.error.is_empty() => parsed.error,
        _ => format!("Face analysis rejected the image ({})", status),
    }
}

#[async_trait]
impl FaceAnalyzer for DeepFaceClient {
    async fn detect_faces(&self, image: &DecodedImage) -> Result<Vec<DetectedFace>, AppError> {
        let results = self.call_represent(image, false).await?;
        Ok(results
            .into_iter()
            .map(|result| DetectedFace {
                area: result.facial_area,
                confidence: result.face_confidence,
                crop: imaging::crop(&image.image, result.facial_area),
            })
            .collect())
    }

    async fn represent(&self, image: &DecodedImage) -> Result<Vec<FaceRepresentation>, AppError> {
        let results = self.call_represent(image, true).await?;
        if results.is_empty() {
            return Err(AppError::FaceAnalysis("No face detected in image".to_string()));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn represent_url_is_joined_under_base() {
        let base = Url::parse("http://faces.internal:5005/").unwrap();
        let client = DeepFaceClient::new(&base, "Facenet", "mtcnn", Duration::from_secs(5)).unwrap();
        assert_eq!(client.represent_url.as_str(), "http://faces.internal:5005/represent");
    }

    #[test]
    fn parses_service_results() {
        let body = json!({
            "results": [{
                "embedding": [0.25, -0.5, 1.0],
                "facial_area": { "x": 12, "y": 8, "w": 40, "h": 44, "left_eye": [20, 18], "right_eye": null },
                "face_confidence": 0.98
            }]
        });

        let parsed: RepresentResponse = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.results.len(), 1);
        assert_eq!(parsed.results[0].embedding, vec![0.25, -0.5, 1.0]);
        assert_eq!(parsed.results[0].facial_area.w, 40);
    }

    #[test]
    fn request_body_carries_model_settings() {
        let request = RepresentRequest {
            img: "data:image/png;base64,AAAA".to_string(),
            model_name: "Facenet",
            detector_backend: "mtcnn",
            enforce_detection: false,
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["model_name"], "Facenet");
        assert_eq!(body["detector_backend"], "mtcnn");
        assert_eq!(body["enforce_detection"], false);
    }

    #[test]
    fn service_error_prefers_reported_reason() {
        let message = service_error_message(
            StatusCode::BAD_REQUEST,
            r#"{"error": "Face could not be detected"}"#,
        );
        assert_eq!(message, "Face could not be detected");

        let fallback = service_error_message(StatusCode::BAD_REQUEST, "<html>");
        assert!(fallback.contains("400"));
    }
}
