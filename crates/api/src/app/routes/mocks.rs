use core::str::FromStr;

use axum::{
    extract::{Extension, Path},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Json, Response},
};

use mockbin_auth::AuthError;
use mockbin_core::ApiId;

use crate::app::{AppState, dto, errors};
use crate::context::CallerContext;

/// Token-gated mock handler: returns the api's stored payload verbatim for
/// any HTTP method.
///
/// Ownership is enforced through the token: a valid token only ever unlocks
/// its own user's apis, and a foreign or nonexistent public id is the same
/// failure.
pub async fn serve(
    Extension(state): Extension<AppState>,
    Path(api_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let token = headers.get("token").and_then(|v| v.to_str().ok());
    let user = match state.resolver.resolve_token(token).await {
        Ok(user) => user,
        Err(err @ (AuthError::MissingToken | AuthError::InvalidToken)) => {
            return errors::json_error(StatusCode::UNAUTHORIZED, err.to_string());
        }
        Err(AuthError::Store(err)) => {
            tracing::error!(error = %err, "token resolution failed");
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "server error");
        }
    };

    let Ok(api_id) = ApiId::from_str(&api_id) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid api id");
    };

    match state.store.api_for_owner(&user.id, &api_id).await {
        // Byte-for-byte payload; content-type is declared JSON whether or
        // not the stored bytes are valid JSON.
        Ok(Some(api)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            api.data,
        )
            .into_response(),
        Ok(None) => errors::json_error(StatusCode::BAD_REQUEST, "invalid api id"),
        Err(err) => {
            tracing::error!(error = %err, "api lookup failed");
            errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "server error")
        }
    }
}

/// List the caller's mock apis.
pub async fn list_apis(
    Extension(state): Extension<AppState>,
    Extension(caller): Extension<CallerContext>,
) -> Response {
    let apis = match state.store.apis_for_user(caller.user_id()).await {
        Ok(apis) => apis,
        Err(err) => {
            tracing::error!(error = %err, "api listing failed");
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "server error");
        }
    };

    if apis.is_empty() {
        return errors::json_message(StatusCode::BAD_REQUEST, "unauthorized or no mock apis found");
    }

    Json(dto::ApiListing {
        message: "success",
        apis,
    })
    .into_response()
}
