//! Owner-authenticated mutation layer.
//!
//! These operations are invoked from trusted server-side contexts (dashboard
//! form submissions), not a public wire protocol. Each one validates its
//! inputs before touching storage and converts storage failures to a generic
//! server error.

use thiserror::Error;

use mockbin_core::{Api, ApiId, Bin, BinId, LogId, UserId};
use mockbin_store::{Store, StoreError};

/// Structured action failure; the message is the user-visible `error` string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("data not found")]
    DataNotFound,
    #[error("user not found")]
    UserNotFound,
    #[error("api id required")]
    ApiIdRequired,
    #[error("invalid user")]
    InvalidUser,
    #[error("invalid bin id")]
    InvalidBinId,
    #[error("bin not found or unauthorized")]
    BinNotFoundOrUnauthorized,
    #[error("log id not found")]
    LogIdNotFound,
    #[error("not authorized or bin not found")]
    NotAuthorizedOrBinNotFound,
    #[error("log not found")]
    LogNotFound,
    #[error("server error")]
    ServerError,
}

impl From<StoreError> for ActionError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "storage failure in action");
        Self::ServerError
    }
}

/// Handle over the mutation operations; clones share the store pool.
#[derive(Debug, Clone)]
pub struct Actions {
    store: Store,
}

impl Actions {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create a mock api owned by `user_id` with a fresh public id.
    pub async fn create_mock_api(
        &self,
        user_id: &UserId,
        data: &str,
    ) -> Result<Api, ActionError> {
        if data.is_empty() {
            return Err(ActionError::DataNotFound);
        }
        if self.store.user_by_id(user_id).await?.is_none() {
            return Err(ActionError::UserNotFound);
        }

        let api = Api::new(user_id.clone(), data.to_string());
        self.store.insert_api(&api).await?;
        Ok(api)
    }

    /// Replace a mock api's payload in place.
    ///
    /// Matches the original behavior: the caller must exist, but ownership
    /// of the target api is NOT verified. See the tests pinning this.
    pub async fn update_mock_api(
        &self,
        user_id: &UserId,
        api_id: Option<&str>,
        data: &str,
    ) -> Result<(), ActionError> {
        let api_id = required_api_id(api_id)?;
        if self.store.user_by_id(user_id).await?.is_none() {
            return Err(ActionError::UserNotFound);
        }

        match self.store.update_api_data(&api_id, data).await? {
            0 => Err(ActionError::ServerError),
            _ => Ok(()),
        }
    }

    /// Delete a mock api. Same ownership gap as [`Self::update_mock_api`].
    pub async fn delete_mock_api(
        &self,
        user_id: &UserId,
        api_id: Option<&str>,
    ) -> Result<(), ActionError> {
        let api_id = required_api_id(api_id)?;
        if self.store.user_by_id(user_id).await?.is_none() {
            return Err(ActionError::UserNotFound);
        }

        match self.store.delete_api(&api_id).await? {
            0 => Err(ActionError::ServerError),
            _ => Ok(()),
        }
    }

    /// Create an empty request bin with a fresh public id.
    pub async fn create_request_bin(&self, user_id: &UserId) -> Result<Bin, ActionError> {
        if user_id.as_str().trim().is_empty() {
            return Err(ActionError::InvalidUser);
        }

        let bin = Bin::new(user_id.clone());
        self.store.insert_bin(&bin).await?;
        Ok(bin)
    }

    /// Delete a bin and all of its captured requests.
    ///
    /// Ownership is mandatory here: the bin must match both the public id
    /// and the caller. Logs are deleted before the bin (one transaction in
    /// this store).
    pub async fn delete_request_bin(
        &self,
        user_id: &UserId,
        bin_id: Option<&str>,
    ) -> Result<(), ActionError> {
        let bin_id = bin_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(BinId::from)
            .ok_or(ActionError::InvalidBinId)?;

        let bin = self
            .store
            .bin_for_owner(user_id, &bin_id)
            .await?
            .ok_or(ActionError::BinNotFoundOrUnauthorized)?;

        self.store.delete_bin_cascading(&bin).await?;
        Ok(())
    }

    /// Delete one captured request.
    ///
    /// Ownership is proven transitively through the bin, never against the
    /// log itself.
    pub async fn delete_request_log(
        &self,
        user_id: &UserId,
        bin_id: Option<&str>,
        log_id: Option<&str>,
    ) -> Result<(), ActionError> {
        let log_id = log_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(LogId::from)
            .ok_or(ActionError::LogIdNotFound)?;

        // An absent bin id cannot match an owned bin, so it falls into the
        // same conflated failure as a foreign one.
        let bin_id = BinId::from(bin_id.unwrap_or_default());
        let bin = self
            .store
            .bin_for_owner(user_id, &bin_id)
            .await?
            .ok_or(ActionError::NotAuthorizedOrBinNotFound)?;

        if self.store.log_for_bin(&bin.bin_id, &log_id).await?.is_none() {
            return Err(ActionError::LogNotFound);
        }

        self.store.delete_log(&log_id).await?;
        Ok(())
    }
}

fn required_api_id(api_id: Option<&str>) -> Result<ApiId, ActionError> {
    api_id
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ApiId::from)
        .ok_or(ActionError::ApiIdRequired)
}
