//! `mockbin-auth` — identity resolution boundary.
//!
//! This crate is intentionally decoupled from HTTP: it maps an already
//! extracted session subject or bearer token to a [`User`], creating the
//! user on first sight of a new session identity. The identity provider
//! itself is an external collaborator; only its subject id crosses into
//! here.

pub mod resolver;

pub use resolver::{AuthError, IdentityResolver};
