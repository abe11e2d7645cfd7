//! Request bin rows, including the cascade delete protocol.

use core::str::FromStr;

use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use mockbin_core::{Bin, BinId, RecordId, UserId};

use crate::{Store, StoreError};

impl Store {
    pub async fn insert_bin(&self, bin: &Bin) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO bins (id, bin_id, user_id) VALUES (?1, ?2, ?3)")
            .bind(bin.id.to_string())
            .bind(bin.bin_id.as_str())
            .bind(bin.user_id.as_str())
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Unscoped lookup by public id. Used by the ingestion path, where any
    /// caller who knows the public id may post; ownership is not checked.
    pub async fn bin_by_public_id(&self, bin_id: &BinId) -> Result<Option<Bin>, StoreError> {
        let row = sqlx::query("SELECT id, bin_id, user_id FROM bins WHERE bin_id = ?1")
            .bind(bin_id.as_str())
            .fetch_optional(self.pool())
            .await?;
        row.map(bin_from_row).transpose()
    }

    /// Owner-scoped lookup; `None` conflates "no such bin" with "not yours".
    pub async fn bin_for_owner(
        &self,
        user_id: &UserId,
        bin_id: &BinId,
    ) -> Result<Option<Bin>, StoreError> {
        let row = sqlx::query(
            "SELECT id, bin_id, user_id FROM bins WHERE bin_id = ?1 AND user_id = ?2",
        )
        .bind(bin_id.as_str())
        .bind(user_id.as_str())
        .fetch_optional(self.pool())
        .await?;
        row.map(bin_from_row).transpose()
    }

    pub async fn bins_for_user(&self, user_id: &UserId) -> Result<Vec<Bin>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, bin_id, user_id FROM bins WHERE user_id = ?1 ORDER BY rowid",
        )
        .bind(user_id.as_str())
        .fetch_all(self.pool())
        .await?;
        rows.into_iter().map(bin_from_row).collect()
    }

    /// Delete a bin and all of its request logs as one transaction.
    ///
    /// Logs go first so a partial failure can only ever leave an orphaned
    /// empty bin, never orphaned logs referencing a dead bin. On SQLite the
    /// transaction makes the pair atomic anyway.
    pub async fn delete_bin_cascading(&self, bin: &Bin) -> Result<(), StoreError> {
        let mut tx = self.pool().begin().await?;
        sqlx::query("DELETE FROM request_logs WHERE bin_id = ?1")
            .bind(bin.bin_id.as_str())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM bins WHERE id = ?1")
            .bind(bin.id.to_string())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

fn bin_from_row(row: SqliteRow) -> Result<Bin, StoreError> {
    let id = RecordId::from_str(&row.get::<String, _>("id"))
        .map_err(|e| StoreError::Decode(e.to_string()))?;
    Ok(Bin {
        id,
        bin_id: BinId::from(row.get::<String, _>("bin_id")),
        user_id: UserId::from(row.get::<String, _>("user_id")),
    })
}
