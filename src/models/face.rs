use serde::{Deserialize, Serialize};

/// Region of the source image a face was found in, in pixels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct FacialArea {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// One face's embedding as produced by the face analyzer, stored verbatim.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FaceRepresentation {
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub facial_area: FacialArea,
    #[serde(default)]
    pub face_confidence: f32,
}

/// A face located in an image, with its cropped pixels.
#[derive(Debug, Clone)]
pub struct DetectedFace {
    pub area: FacialArea,
    pub confidence: f32,
    pub crop: image::DynamicImage,
}
