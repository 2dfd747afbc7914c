use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

use crate::errors::AppError;
use crate::models::face::FacialArea;

const ACCEPTED_MIME_TYPES: [&str; 6] = [
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/bmp",
    "image/gif",
    "image/tiff",
];

/// An incoming image decoded to pixels, kept entirely in memory.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub mime_type: &'static str,
    pub image: DynamicImage,
}

/// Decodes a base64 payload (optionally wrapped in a `data:` URI) into pixels.
/// Line breaks and other ASCII whitespace inside the payload are ignored.
pub fn decode_base64_image(encoded: &str) -> Result<DecodedImage, AppError> {
    let payload: String = strip_data_uri(encoded.trim())
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(payload)
        .map_err(|err| AppError::BadRequest(format!("Invalid base64 image: {}", err)))?;

    let file_type = infer::get(&bytes)
        .ok_or_else(|| AppError::BadRequest("Unrecognized image type".to_string()))?;
    if !ACCEPTED_MIME_TYPES.contains(&file_type.mime_type()) {
        return Err(AppError::BadRequest(format!(
            "Unsupported image type {}",
            file_type.mime_type()
        )));
    }

    let image = image::load_from_memory(&bytes)
        .map_err(|err| AppError::BadRequest(format!("Unreadable image: {}", err)))?;

    Ok(DecodedImage {
        mime_type: file_type.mime_type(),
        image,
    })
}

fn strip_data_uri(payload: &str) -> &str {
    match payload.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => payload,
    }
}

pub fn encode(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, AppError> {
    let mut buffer = Cursor::new(Vec::new());
    // JPEG has no alpha channel
    let image = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ => image.clone(),
    };
    image
        .write_to(&mut buffer, format)
        .map_err(|err| AppError::InternalServerError(format!("Image encoding failed: {}", err)))?;
    Ok(buffer.into_inner())
}

/// PNG data URI, the form the face analyzer accepts.
pub fn to_png_data_uri(image: &DynamicImage) -> Result<String, AppError> {
    let png = encode(image, ImageFormat::Png)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}

/// Crops `area` out of `image`, clamped to the image bounds.
pub fn crop(image: &DynamicImage, area: FacialArea) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    let x = area.x.min(width.saturating_sub(1));
    let y = area.y.min(height.saturating_sub(1));
    let w = area.w.max(1).min(width - x);
    let h = area.h.max(1).min(height - y);
    image.crop_imm(x, y, w, h)
}
