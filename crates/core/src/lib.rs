//! `mockbin-core` — shared domain types for the mockbin service.
//!
//! This crate is intentionally decoupled from HTTP and storage: identifiers,
//! entities, and the domain error model only.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Api, Bin, RequestLog, User};
pub use error::{DomainError, DomainResult};
pub use id::{ApiId, BinId, LogId, RecordId, Token, UserId};
