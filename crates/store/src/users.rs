//! User rows.

use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use mockbin_core::{Token, User, UserId};

use crate::{Store, StoreError};

impl Store {
    /// Insert a user unless one with the same id already exists.
    ///
    /// Safe under concurrent first-sight requests: the unique primary key
    /// makes duplicate inserts no-ops, so the first writer's token wins and
    /// no duplicate rows can persist.
    pub async fn insert_user_if_absent(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO users (id, token) VALUES (?1, ?2) ON CONFLICT (id) DO NOTHING")
            .bind(user.id.as_str())
            .bind(user.token.as_str())
            .execute(self.pool())
            .await?;
        Ok(())
    }

    pub async fn user_by_id(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, token FROM users WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(user_from_row))
    }

    pub async fn user_by_token(&self, token: &Token) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, token FROM users WHERE token = ?1")
            .bind(token.as_str())
            .fetch_optional(self.pool())
            .await?;
        Ok(row.map(user_from_row))
    }
}

fn user_from_row(row: SqliteRow) -> User {
    User {
        id: UserId::from(row.get::<String, _>("id")),
        token: Token::from(row.get::<String, _>("token")),
    }
}
