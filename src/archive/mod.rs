use image::{DynamicImage, ImageFormat};
use log::debug;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::errors::AppError;
use crate::utils::imaging;

const ORIGINALS_DIR: &str = "dbImages";
const FACES_DIR: &str = "Faces";

/// Copies of submitted images and their face crops, kept on disk next to the
/// database. File names embed a per-request id so concurrent requests never
/// share a path.
#[derive(Debug, Clone)]
pub struct ImageArchive {
    root: PathBuf,
}

impl ImageArchive {
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        for dir in [ORIGINALS_DIR, FACES_DIR] {
            tokio::fs::create_dir_all(root.join(dir))
                .await
                .map_err(|err| AppError::ArchiveError(format!("{}: {}", root.display(), err)))?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn store_original(
        &self,
        employee_code: i64,
        request_id: Uuid,
        index: usize,
        image: &DynamicImage,
    ) -> Result<PathBuf, AppError> {
        let name = format!("{}-{}-{}.png", employee_code, request_id, index);
        self.write(self.root.join(ORIGINALS_DIR).join(name), image, ImageFormat::Png)
            .await
    }

    pub async fn store_face(
        &self,
        employee_code: i64,
        request_id: Uuid,
        index: usize,
        face: &DynamicImage,
    ) -> Result<PathBuf, AppError> {
        let name = format!("{}-{}-{}.jpg", employee_code, request_id, index);
        self.write(self.root.join(FACES_DIR).join(name), face, ImageFormat::Jpeg)
            .await
    }

    async fn write(
        &self,
        path: PathBuf,
        image: &DynamicImage,
        format: ImageFormat,
    ) -> Result<PathBuf, AppError> {
        let bytes = imaging::encode(image, format)?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|err| AppError::ArchiveError(format!("{}: {}", path.display(), err)))?;
        debug!("Archived {}", path.display());
        Ok(path)
    }
}
