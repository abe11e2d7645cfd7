//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `actions.rs`: owner-authenticated mutations (create/update/delete)
//! - `capture.rs`: request flattening for the ingestion path
//! - `dto.rs`: response DTOs
//! - `errors.rs`: consistent error responses

use axum::{Extension, Router, extract::DefaultBodyLimit, routing::any, routing::get};

use mockbin_auth::IdentityResolver;
use mockbin_store::Store;

use crate::middleware;

pub mod actions;
pub mod capture;
pub mod dto;
pub mod errors;
pub mod routes;

/// Shared handler state. Cheap to clone; both fields are pool-backed handles.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub resolver: IdentityResolver,
}

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(store: Store) -> Router {
    let resolver = IdentityResolver::new(store.clone());
    let state = AppState {
        store,
        resolver: resolver.clone(),
    };
    let session = middleware::SessionState { resolver };

    // Owner-facing routes: require a resolved session identity.
    let session_scoped = Router::new()
        .route("/bins", get(routes::bins::list_bins))
        .route("/apis", get(routes::mocks::list_apis))
        .layer(axum::middleware::from_fn_with_state(
            session,
            middleware::session_middleware,
        ));

    // The capture and mock endpoints are public by design: knowing the
    // public id (plus the bearer token, for mocks) is the whole gate.
    // Capture must accept bodies of any size, so the default body limit is
    // lifted on that route; everything else keeps it.
    Router::new()
        .route("/health", get(routes::system::health))
        .route(
            "/bin/:bin_id",
            any(routes::bins::capture).layer(DefaultBodyLimit::disable()),
        )
        .route("/mock/:api_id", any(routes::mocks::serve))
        .merge(session_scoped)
        .layer(Extension(state))
}
