use core::str::FromStr;

use axum::{
    body::Bytes,
    extract::{Extension, Path, RawQuery},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;

use mockbin_core::{BinId, LogId, RequestLog};

use crate::app::capture::{header_map_json, query_map_json};
use crate::app::{AppState, dto, errors};
use crate::context::CallerContext;

/// Catch-all capture handler: accepts any method, headers, query, and body
/// for a bin's public id and records exactly one request log.
///
/// Content can never cause a rejection here: a malformed-JSON or non-UTF-8
/// body is stored as (lossy) text, not refused. No ownership check, bins are
/// public receivers.
pub async fn capture(
    Extension(state): Extension<AppState>,
    Path(bin_id): Path<String>,
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Ok(bin_id) = BinId::from_str(&bin_id) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "Invalid bin id");
    };

    let bin = match state.store.bin_by_public_id(&bin_id).await {
        Ok(Some(bin)) => bin,
        Ok(None) => return errors::json_error(StatusCode::NOT_FOUND, "Bin not found"),
        Err(err) => {
            tracing::error!(error = %err, "bin lookup failed");
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    let log = RequestLog {
        id: LogId::generate(),
        bin_id: bin.bin_id,
        method: method.as_str().to_string(),
        headers: header_map_json(&headers),
        query: query_map_json(query.as_deref()),
        body: String::from_utf8_lossy(&body).into_owned(),
        created_at: Utc::now(),
    };

    match state.store.insert_log(&log).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => {
            tracing::error!(error = %err, "request log insert failed");
            errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// List the caller's bins, each with its captured requests.
pub async fn list_bins(
    Extension(state): Extension<AppState>,
    Extension(caller): Extension<CallerContext>,
) -> Response {
    let bins = match state.store.bins_for_user(caller.user_id()).await {
        Ok(bins) => bins,
        Err(err) => {
            tracing::error!(error = %err, "bin listing failed");
            return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "server error");
        }
    };

    if bins.is_empty() {
        return errors::json_message(StatusCode::BAD_REQUEST, "unauthorized or no mock bins found");
    }

    let mut with_logs = Vec::with_capacity(bins.len());
    for bin in bins {
        let logs = match state.store.logs_for_bin(&bin.bin_id).await {
            Ok(logs) => logs,
            Err(err) => {
                tracing::error!(error = %err, "log listing failed");
                return errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "server error");
            }
        };
        with_logs.push(dto::BinWithLogs { bin, logs });
    }

    Json(dto::BinListing {
        message: "success",
        bins: with_logs,
    })
    .into_response()
}
