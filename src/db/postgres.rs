use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::RecordStore;
use crate::errors::AppError;
use crate::models::employee::{EmployeeUpdate, FaceEntry, StoredFaceEntry};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS face_entries (
    id UUID PRIMARY KEY,
    employee_code BIGINT NOT NULL,
    document JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
)";

const CREATE_CODE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS face_entries_employee_code_idx ON face_entries (employee_code)";

#[derive(sqlx::FromRow)]
struct FaceEntryRow {
    id: Uuid,
    document: Json<FaceEntry>,
}

impl From<FaceEntryRow> for StoredFaceEntry {
    fn from(row: FaceEntryRow) -> Self {
        StoredFaceEntry {
            id: row.id,
            entry: row.document.0,
        }
    }
}

/// Face entries kept as JSONB documents in Postgres.
pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPool::connect(database_url).await?;
        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_CODE_INDEX).execute(&self.pool).await?;
        info!("face_entries schema ready");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert_one(&self, entry: FaceEntry) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        let employee_code = entry.employee_code.unwrap_or(0);
        let created_at = entry.created_at.unwrap_or_else(Utc::now);

        sqlx::query(
            "INSERT INTO face_entries (id, employee_code, document, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(employee_code)
        .bind(Json(&entry))
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find(&self) -> Result<Vec<StoredFaceEntry>, AppError> {
        let rows = sqlx::query_as::<_, FaceEntryRow>(
            "SELECT id, document FROM face_entries ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(StoredFaceEntry::from).collect())
    }

    async fn find_one(&self, employee_code: i64) -> Result<Option<StoredFaceEntry>, AppError> {
        let row = sqlx::query_as::<_, FaceEntryRow>(
            "SELECT id, document FROM face_entries WHERE employee_code = $1 ORDER BY created_at, id LIMIT 1",
        )
        .bind(employee_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(StoredFaceEntry::from))
    }

    async fn update_one(&self, id: Uuid, update: &EmployeeUpdate) -> Result<u64, AppError> {
        let patch = serde_json::to_value(update)
            .map_err(|err| AppError::InternalServerError(err.to_string()))?;

        // jsonb equality is structural, so an unchanged merge touches no row
        let result = sqlx::query(
            "UPDATE face_entries SET document = document || $2 WHERE id = $1 AND document || $2 <> document",
        )
        .bind(id)
        .bind(Json(patch))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn find_one_and_delete(
        &self,
        employee_code: i64,
    ) -> Result<Option<StoredFaceEntry>, AppError> {
        let row = sqlx::query_as::<_, FaceEntryRow>(
            "DELETE FROM face_entries WHERE id = (
                SELECT id FROM face_entries WHERE employee_code = $1 ORDER BY created_at, id LIMIT 1
            ) RETURNING id, document",
        )
        .bind(employee_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(StoredFaceEntry::from))
    }
}
