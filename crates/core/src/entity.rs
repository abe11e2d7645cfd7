//! Persistent entities.
//!
//! Serialized field names follow the wire contract of the listing endpoints
//! (`binId`, `userId`, ...). Internal row ids are never serialized.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::id::{ApiId, BinId, LogId, RecordId, Token, UserId};

/// A caller identity. Created once, on first successful authentication.
///
/// `token` is the single authorization factor for the mock-serving endpoint;
/// rotation is not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub token: Token,
}

/// A mock API: one fixed payload returned to any caller with the owner's
/// token.
///
/// `data` is opaque: it is stored and returned byte-for-byte, valid JSON or
/// not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Api {
    #[serde(skip_serializing)]
    pub id: RecordId,
    pub api_id: ApiId,
    pub user_id: UserId,
    pub data: String,
}

impl Api {
    pub fn new(user_id: UserId, data: String) -> Self {
        Self {
            id: RecordId::new(),
            api_id: ApiId::generate(),
            user_id,
            data,
        }
    }
}

/// A request bin: a public receiver that records every request sent to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bin {
    #[serde(skip_serializing)]
    pub id: RecordId,
    pub bin_id: BinId,
    pub user_id: UserId,
}

impl Bin {
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: RecordId::new(),
            bin_id: BinId::generate(),
            user_id,
        }
    }
}

/// One captured HTTP request, immutable once stored.
///
/// `headers` and `query` hold the flattened key/value maps as serialized
/// text; `body` is the raw request body as text (empty string if none).
/// `bin_id` references the owning bin's public id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestLog {
    pub id: LogId,
    pub bin_id: BinId,
    pub method: String,
    pub headers: String,
    pub query: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
