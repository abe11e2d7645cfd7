//! Captured request rows.

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use mockbin_core::{BinId, LogId, RequestLog};

use crate::{Store, StoreError};

impl Store {
    /// Insert one captured request. Each accepted ingestion call produces
    /// exactly one row; retries from the caller produce additional rows.
    pub async fn insert_log(&self, log: &RequestLog) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO request_logs (id, bin_id, method, headers, query, body, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(log.id.as_str())
        .bind(log.bin_id.as_str())
        .bind(&log.method)
        .bind(&log.headers)
        .bind(&log.query)
        .bind(&log.body)
        .bind(log.created_at.to_rfc3339())
        .execute(self.pool())
        .await?;
        Ok(())
    }

    /// All logs for a bin, in the order storage assigned them.
    pub async fn logs_for_bin(&self, bin_id: &BinId) -> Result<Vec<RequestLog>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, bin_id, method, headers, query, body, created_at
            FROM request_logs WHERE bin_id = ?1 ORDER BY rowid
            "#,
        )
        .bind(bin_id.as_str())
        .fetch_all(self.pool())
        .await?;
        rows.into_iter().map(log_from_row).collect()
    }

    /// Look up one log within a specific bin. Ownership of logs is only ever
    /// proven transitively through the bin, so the bin id is part of the key.
    pub async fn log_for_bin(
        &self,
        bin_id: &BinId,
        log_id: &LogId,
    ) -> Result<Option<RequestLog>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, bin_id, method, headers, query, body, created_at
            FROM request_logs WHERE bin_id = ?1 AND id = ?2
            "#,
        )
        .bind(bin_id.as_str())
        .bind(log_id.as_str())
        .fetch_optional(self.pool())
        .await?;
        row.map(log_from_row).transpose()
    }

    /// Delete one log. Returns the number of rows deleted.
    pub async fn delete_log(&self, log_id: &LogId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM request_logs WHERE id = ?1")
            .bind(log_id.as_str())
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }
}

fn log_from_row(row: SqliteRow) -> Result<RequestLog, StoreError> {
    let created_at = row.get::<String, _>("created_at");
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| StoreError::Decode(format!("created_at: {e}")))?
        .with_timezone(&Utc);
    Ok(RequestLog {
        id: LogId::from(row.get::<String, _>("id")),
        bin_id: BinId::from(row.get::<String, _>("bin_id")),
        method: row.get("method"),
        headers: row.get("headers"),
        query: row.get("query"),
        body: row.get("body"),
        created_at,
    })
}
