//! Mock API rows.

use core::str::FromStr;

use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use mockbin_core::{Api, ApiId, RecordId, UserId};

use crate::{Store, StoreError};

impl Store {
    pub async fn insert_api(&self, api: &Api) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO apis (id, api_id, user_id, data) VALUES (?1, ?2, ?3, ?4)")
            .bind(api.id.to_string())
            .bind(api.api_id.as_str())
            .bind(api.user_id.as_str())
            .bind(&api.data)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    /// Look up an api by public id, scoped to its owner.
    ///
    /// A valid public id owned by someone else yields `None`, same as a
    /// nonexistent one; callers cannot distinguish the two.
    pub async fn api_for_owner(
        &self,
        user_id: &UserId,
        api_id: &ApiId,
    ) -> Result<Option<Api>, StoreError> {
        let row = sqlx::query(
            "SELECT id, api_id, user_id, data FROM apis WHERE api_id = ?1 AND user_id = ?2",
        )
        .bind(api_id.as_str())
        .bind(user_id.as_str())
        .fetch_optional(self.pool())
        .await?;
        row.map(api_from_row).transpose()
    }

    pub async fn apis_for_user(&self, user_id: &UserId) -> Result<Vec<Api>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, api_id, user_id, data FROM apis WHERE user_id = ?1 ORDER BY rowid",
        )
        .bind(user_id.as_str())
        .fetch_all(self.pool())
        .await?;
        rows.into_iter().map(api_from_row).collect()
    }

    /// Replace an api's payload in place. Returns the number of rows updated
    /// (zero when no api matches the public id).
    pub async fn update_api_data(&self, api_id: &ApiId, data: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE apis SET data = ?1 WHERE api_id = ?2")
            .bind(data)
            .bind(api_id.as_str())
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete an api by public id. Returns the number of rows deleted.
    pub async fn delete_api(&self, api_id: &ApiId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM apis WHERE api_id = ?1")
            .bind(api_id.as_str())
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }
}

fn api_from_row(row: SqliteRow) -> Result<Api, StoreError> {
    let id = RecordId::from_str(&row.get::<String, _>("id"))
        .map_err(|e| StoreError::Decode(e.to_string()))?;
    Ok(Api {
        id,
        api_id: ApiId::from(row.get::<String, _>("api_id")),
        user_id: UserId::from(row.get::<String, _>("user_id")),
        data: row.get("data"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockbin_core::{Token, User};

    async fn store_with_user(id: &str) -> Store {
        let store = Store::in_memory().await.unwrap();
        let user = User {
            id: UserId::from(id),
            token: Token::generate(),
        };
        store.insert_user_if_absent(&user).await.unwrap();
        store
    }

    #[tokio::test]
    async fn owner_scope_hides_other_users_apis() {
        let store = store_with_user("alice").await;
        let other = User {
            id: UserId::from("bob"),
            token: Token::generate(),
        };
        store.insert_user_if_absent(&other).await.unwrap();

        let api = Api::new(UserId::from("alice"), r#"{"feature":true}"#.to_string());
        store.insert_api(&api).await.unwrap();

        let as_owner = store
            .api_for_owner(&UserId::from("alice"), &api.api_id)
            .await
            .unwrap();
        assert_eq!(as_owner.as_ref().map(|a| a.data.as_str()), Some(r#"{"feature":true}"#));

        let as_other = store
            .api_for_owner(&UserId::from("bob"), &api.api_id)
            .await
            .unwrap();
        assert!(as_other.is_none());
    }

    #[tokio::test]
    async fn update_replaces_payload_verbatim() {
        let store = store_with_user("alice").await;
        let api = Api::new(UserId::from("alice"), "old".to_string());
        store.insert_api(&api).await.unwrap();

        let updated = store
            .update_api_data(&api.api_id, "not json at all {{{")
            .await
            .unwrap();
        assert_eq!(updated, 1);

        let stored = store
            .api_for_owner(&UserId::from("alice"), &api.api_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.data, "not json at all {{{");
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let store = store_with_user("alice").await;
        assert_eq!(
            store
                .update_api_data(&ApiId::from("nope"), "x")
                .await
                .unwrap(),
            0
        );
        assert_eq!(store.delete_api(&ApiId::from("nope")).await.unwrap(), 0);
    }
}
