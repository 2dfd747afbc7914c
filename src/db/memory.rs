use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::RecordStore;
use crate::errors::AppError;
use crate::models::employee::{EmployeeUpdate, FaceEntry, StoredFaceEntry};

/// Process-local store with the same contract as the Postgres one.
#[derive(Default)]
pub struct InMemoryStore {
    entries: RwLock<Vec<StoredFaceEntry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn insert_one(&self, entry: FaceEntry) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        self.entries.write().await.push(StoredFaceEntry { id, entry });
        Ok(id)
    }

    async fn find(&self) -> Result<Vec<StoredFaceEntry>, AppError> {
        Ok(self.entries.read().await.clone())
    }

    async fn find_one(&self, employee_code: i64) -> Result<Option<StoredFaceEntry>, AppError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .find(|stored| stored.entry.employee_code == Some(employee_code))
            .cloned())
    }

    async fn update_one(&self, id: Uuid, update: &EmployeeUpdate) -> Result<u64, AppError> {
        let mut entries = self.entries.write().await;
        let modified = entries
            .iter_mut()
            .find(|stored| stored.id == id)
            .map(|stored| stored.entry.apply(update))
            .unwrap_or(false);
        Ok(u64::from(modified))
    }

    async fn find_one_and_delete(
        &self,
        employee_code: i64,
    ) -> Result<Option<StoredFaceEntry>, AppError> {
        let mut entries = self.entries.write().await;
        let position = entries
            .iter()
            .position(|stored| stored.entry.employee_code == Some(employee_code));
        Ok(position.map(|index| entries.remove(index)))
    }
}
