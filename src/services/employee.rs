use chrono::Utc;
use futures_util::{stream, StreamExt, TryStreamExt};
use log::{debug, info};
use std::sync::Arc;
use uuid::Uuid;

use crate::archive::ImageArchive;
use crate::db::RecordStore;
use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeeDetails, EmployeeUpdate, FaceEntry, NewEmployee};
use crate::models::face::FaceRepresentation;
use crate::recognition::FaceAnalyzer;
use crate::utils::imaging;

pub const DEFAULT_IMAGE_CONCURRENCY: usize = 4;

/// Employee record lifecycle on top of a record store and a face analyzer.
pub struct EmployeeService {
    store: Arc<dyn RecordStore>,
    analyzer: Arc<dyn FaceAnalyzer>,
    archive: Option<ImageArchive>,
    image_concurrency: usize,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn RecordStore>, analyzer: Arc<dyn FaceAnalyzer>) -> Self {
        Self {
            store,
            analyzer,
            archive: None,
            image_concurrency: DEFAULT_IMAGE_CONCURRENCY,
        }
    }

    /// Caps how many images of one request are analysed at the same time.
    pub fn with_image_concurrency(mut self, limit: usize) -> Self {
        self.image_concurrency = limit.max(1);
        self
    }

    pub fn with_archive(mut self, archive: ImageArchive) -> Self {
        self.archive = Some(archive);
        self
    }

    /// Computes embeddings for every image and stores the new record.
    ///
    /// Nothing is inserted unless every image was processed. The employee code
    /// is not checked for duplicates.
    pub async fn create(&self, new_employee: NewEmployee) -> Result<(), AppError> {
        let request_id = Uuid::new_v4();
        let NewEmployee {
            employee_code,
            name,
            gender,
            department,
            images,
        } = new_employee;

        let embeddings: Vec<Vec<FaceRepresentation>> =
            stream::iter(images.iter().enumerate().map(|(index, encoded)| {
                self.process_image(employee_code, &name, request_id, index, encoded)
            }))
            .buffered(self.image_concurrency)
            .try_collect()
            .await?;
        debug!("About to insert {} embedding set(s) for {}", embeddings.len(), name);

        self.store
            .insert_one(FaceEntry {
                employee_code: Some(employee_code),
                name: Some(name),
                gender: Some(gender),
                department: Some(department),
                created_at: Some(Utc::now()),
                embeddings,
                images: Some(images),
            })
            .await?;

        info!("Face entry created for employee {}", employee_code);
        Ok(())
    }

    async fn process_image(
        &self,
        employee_code: i64,
        name: &str,
        request_id: Uuid,
        index: usize,
        encoded: &str,
    ) -> Result<Vec<FaceRepresentation>, AppError> {
        let decoded = imaging::decode_base64_image(encoded)?;
        info!("Image {} opened for {} ({})", index, name, decoded.mime_type);

        let faces = self.analyzer.detect_faces(&decoded).await?;
        debug!("Detected {} face(s) in image {} for {}", faces.len(), index, name);

        if let Some(archive) = &self.archive {
            archive
                .store_original(employee_code, request_id, index, &decoded.image)
                .await?;
            if let Some(face) = faces.first() {
                archive
                    .store_face(employee_code, request_id, index, &face.crop)
                    .await?;
                info!(
                    "Face saved for {} (area {:?}, confidence {:.2})",
                    name, face.area, face.confidence
                );
            }
        }

        let representation = self.analyzer.represent(&decoded).await?;
        info!("Embedding created for {}", name);
        Ok(representation)
    }

    pub async fn list(&self) -> Result<Vec<Employee>, AppError> {
        let entries = self.store.find().await?;
        Ok(entries
            .into_iter()
            .map(|stored| Employee::from(stored.entry))
            .collect())
    }

    pub async fn read(&self, employee_code: i64) -> Result<EmployeeDetails, AppError> {
        info!("Reading employee {}", employee_code);
        self.store
            .find_one(employee_code)
            .await?
            .map(|stored| EmployeeDetails::from(stored.entry))
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))
    }

    /// Replaces name, gender, department and images. Stored embeddings are
    /// kept as they were, so they may no longer match the images.
    pub async fn update(&self, employee_code: i64, update: EmployeeUpdate) -> Result<(), AppError> {
        let stored = self
            .store
            .find_one(employee_code)
            .await?
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

        let modified = self.store.update_one(stored.id, &update).await?;
        if modified == 0 {
            return Err(AppError::NoOpUpdate("No data was updated".to_string()));
        }

        info!("Employee {} updated", employee_code);
        Ok(())
    }

    /// Removes the record if present. Returns whether one was removed.
    pub async fn delete(&self, employee_code: i64) -> Result<bool, AppError> {
        let removed = self.store.find_one_and_delete(employee_code).await?;
        match &removed {
            Some(_) => info!("Employee {} deleted", employee_code),
            None => debug!("Delete requested for unknown employee {}", employee_code),
        }
        Ok(removed.is_some())
    }
}
