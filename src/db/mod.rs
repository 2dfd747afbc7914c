use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::employee::{EmployeeUpdate, FaceEntry, StoredFaceEntry};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgRecordStore;

/// Document collection holding one face entry per employee.
///
/// Lookups by employee code return the oldest matching document; the code is
/// not unique at the storage level.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_one(&self, entry: FaceEntry) -> Result<Uuid, AppError>;

    /// All documents in insertion order.
    async fn find(&self) -> Result<Vec<StoredFaceEntry>, AppError>;

    async fn find_one(&self, employee_code: i64) -> Result<Option<StoredFaceEntry>, AppError>;

    /// Replaces the update's fields on the document with `id`. Returns the
    /// number of documents actually modified: 0 when the id is unknown or the
    /// values were already equal.
    async fn update_one(&self, id: Uuid, update: &EmployeeUpdate) -> Result<u64, AppError>;

    async fn find_one_and_delete(
        &self,
        employee_code: i64,
    ) -> Result<Option<StoredFaceEntry>, AppError>;
}
