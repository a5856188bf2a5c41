//! services/api/src/adapters/sqlite.rs
//!
//! This module contains the embedded database adapter, the concrete
//! implementation of the `RecordStore` port against SQLite using `sqlx`.
//! It presents exactly the same observable behavior as the PostgreSQL
//! adapter, so the two backends stay interchangeable.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use medilog_core::domain::{MedicalRecord, RecordDraft};
use medilog_core::ports::{RecordStore, StoreError, StoreResult};
use sqlx::{FromRow, SqlitePool};

use super::seed_drafts;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `RecordStore` port against SQLite.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a new `SqliteStore`.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the `medical_records` table if it does not exist yet.
    ///
    /// Dates and timestamps are stored as ISO-8601 TEXT. Both timestamps are
    /// set by application code, never by store triggers.
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS medical_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                medicine TEXT NOT NULL,
                dosage TEXT NOT NULL,
                duration TEXT NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                condition TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Inserts the example rows when the table is empty.
    pub async fn seed_if_empty(&self) -> StoreResult<()> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM medical_records")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Unexpected(e.to_string()))?;

        if count == 0 {
            for draft in seed_drafts() {
                self.insert(draft).await?;
            }
        }
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct MedicalRecordRow {
    id: i64,
    medicine: String,
    dosage: String,
    duration: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    condition: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MedicalRecordRow {
    fn to_domain(self) -> MedicalRecord {
        MedicalRecord {
            id: self.id,
            medicine: self.medicine,
            dosage: self.dosage,
            duration: self.duration,
            start_date: self.start_date,
            end_date: self.end_date,
            condition: self.condition,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

const COLUMNS: &str =
    "id, medicine, dosage, duration, start_date, end_date, condition, created_at, updated_at";

//=========================================================================================
// `RecordStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl RecordStore for SqliteStore {
    async fn list_all(&self) -> StoreResult<Vec<MedicalRecord>> {
        let rows: Vec<MedicalRecordRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM medical_records ORDER BY start_date DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Unexpected(e.to_string()))?;

        Ok(rows.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<MedicalRecord> {
        let row: MedicalRecordRow =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM medical_records WHERE id = ?1"))
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| match e {
                    sqlx::Error::RowNotFound => {
                        StoreError::NotFound(format!("Record {} not found", id))
                    }
                    _ => StoreError::Unexpected(e.to_string()),
                })?;
        Ok(row.to_domain())
    }

    async fn insert(&self, draft: RecordDraft) -> StoreResult<MedicalRecord> {
        let now = Utc::now();
        let row: MedicalRecordRow = sqlx::query_as(&format!(
            "INSERT INTO medical_records \
             (medicine, dosage, duration, start_date, end_date, condition, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) \
             RETURNING {COLUMNS}"
        ))
        .bind(draft.medicine)
        .bind(draft.dosage)
        .bind(draft.duration)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .bind(draft.condition)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Unexpected(e.to_string()))?;

        Ok(row.to_domain())
    }

    async fn update(&self, id: i64, draft: RecordDraft) -> StoreResult<MedicalRecord> {
        let now = Utc::now();
        let row: Option<MedicalRecordRow> = sqlx::query_as(&format!(
            "UPDATE medical_records \
             SET medicine = ?1, dosage = ?2, duration = ?3, start_date = ?4, \
                 end_date = ?5, condition = ?6, updated_at = ?7 \
             WHERE id = ?8 \
             RETURNING {COLUMNS}"
        ))
        .bind(draft.medicine)
        .bind(draft.dosage)
        .bind(draft.duration)
        .bind(draft.start_date)
        .bind(draft.end_date)
        .bind(draft.condition)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Unexpected(e.to_string()))?;

        row.map(|r| r.to_domain())
            .ok_or_else(|| StoreError::NotFound(format!("Record {} not found", id)))
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM medical_records WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Unexpected(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("Record {} not found", id)));
        }
        Ok(())
    }

    async fn search_by_term(&self, term: &str) -> StoreResult<Vec<MedicalRecord>> {
        let pattern = format!("%{}%", term.to_lowercase());
        let rows: Vec<MedicalRecordRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM medical_records \
             WHERE LOWER(medicine) LIKE ?1 \
                OR LOWER(dosage) LIKE ?1 \
                OR LOWER(COALESCE(condition, '')) LIKE ?1 \
                OR start_date LIKE ?1 \
             ORDER BY start_date DESC, id DESC"
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Unexpected(e.to_string()))?;

        Ok(rows.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Unexpected(e.to_string()))?;
        Ok(())
    }
}
