//! Session and bearer-token resolution.

use thiserror::Error;

use mockbin_core::{Token, User, UserId};
use mockbin_store::{Store, StoreError};

/// Authorization failure at the identity boundary.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No token was presented at all.
    #[error("token not found")]
    MissingToken,

    /// A token was presented but matches no user.
    #[error("invalid token")]
    InvalidToken,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Maps caller credentials to a resolved [`User`].
#[derive(Debug, Clone)]
pub struct IdentityResolver {
    store: Store,
}

impl IdentityResolver {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Session path: find the user for a trusted provider subject, creating
    /// it with a fresh token on first sight.
    ///
    /// Concurrent first requests for the same new subject race on the
    /// insert; the unique key makes the losers' inserts no-ops and the
    /// re-read below returns whichever token landed first.
    pub async fn resolve_session(&self, subject: &UserId) -> Result<User, AuthError> {
        if let Some(user) = self.store.user_by_id(subject).await? {
            return Ok(user);
        }

        let candidate = User {
            id: subject.clone(),
            token: Token::generate(),
        };
        self.store.insert_user_if_absent(&candidate).await?;
        tracing::info!(user_id = %candidate.id, "created user on first sight");

        self.store
            .user_by_id(subject)
            .await?
            .ok_or_else(|| StoreError::Decode("user vanished after upsert".to_string()).into())
    }

    /// Token path: exact-match lookup, read-only. Used by the mock-serving
    /// endpoint only.
    pub async fn resolve_token(&self, token: Option<&str>) -> Result<User, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        self.store
            .user_by_token(&Token::from(token))
            .await?
            .ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn resolver() -> IdentityResolver {
        IdentityResolver::new(Store::in_memory().await.unwrap())
    }

    #[tokio::test]
    async fn session_creates_user_once_and_reuses_it() {
        let resolver = resolver().await;
        let subject = UserId::from("subject-1");

        let first = resolver.resolve_session(&subject).await.unwrap();
        let second = resolver.resolve_session(&subject).await.unwrap();

        assert_eq!(first.id, subject);
        assert!(!first.token.as_str().is_empty());
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn distinct_subjects_get_distinct_tokens() {
        let resolver = resolver().await;
        let a = resolver.resolve_session(&UserId::from("a")).await.unwrap();
        let b = resolver.resolve_session(&UserId::from("b")).await.unwrap();
        assert_ne!(a.token, b.token);
    }

    #[tokio::test]
    async fn token_path_distinguishes_missing_from_invalid() {
        let resolver = resolver().await;
        let user = resolver
            .resolve_session(&UserId::from("subject-1"))
            .await
            .unwrap();

        assert!(matches!(
            resolver.resolve_token(None).await,
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            resolver.resolve_token(Some("   ")).await,
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            resolver.resolve_token(Some("no-such-token")).await,
            Err(AuthError::InvalidToken)
        ));

        let resolved = resolver
            .resolve_token(Some(user.token.as_str()))
            .await
            .unwrap();
        assert_eq!(resolved, user);
    }
}
