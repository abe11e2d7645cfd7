use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use mockbin_auth::IdentityResolver;
use mockbin_core::UserId;

use crate::app::errors;
use crate::context::CallerContext;

#[derive(Clone)]
pub struct SessionState {
    pub resolver: IdentityResolver,
}

/// Resolves the trusted session subject (`userid` header) into a
/// [`CallerContext`], creating the user on first sight.
///
/// The real identity provider lives in front of this service; the header
/// stands in for its verified session subject.
pub async fn session_middleware(
    State(state): State<SessionState>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(subject) = extract_subject(req.headers()) else {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized");
    };

    let user = match state.resolver.resolve_session(&subject).await {
        Ok(user) => user,
        Err(err) => {
            tracing::error!(error = %err, "session resolution failed");
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "server error");
        }
    };

    req.extensions_mut().insert(CallerContext::new(user));
    next.run(req).await
}

fn extract_subject(headers: &HeaderMap) -> Option<UserId> {
    let subject = headers.get("userid")?.to_str().ok()?.trim();
    if subject.is_empty() {
        return None;
    }
    Some(UserId::from(subject))
}
