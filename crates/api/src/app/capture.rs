//! Flattening of arbitrary request shape into stored text.
//!
//! The ingestion endpoint never rejects a request because of its content, so
//! everything here is total: unrepresentable bytes are replaced, duplicate
//! keys collapse, unparseable query strings become the empty map.

use axum::http::HeaderMap;
use serde_json::{Map, Value};

/// Serialize a header map as a flat JSON object string.
///
/// A repeated header name collapses to the last value seen; non-UTF-8 header
/// bytes are replaced lossily.
pub fn header_map_json(headers: &HeaderMap) -> String {
    let mut map = Map::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        map.insert(name.as_str().to_string(), Value::String(value));
    }
    Value::Object(map).to_string()
}

/// Serialize a raw query string as a flat JSON object string.
///
/// Same last-one-wins rule as headers. A query string the urlencoded codec
/// cannot parse at all is stored as the empty map rather than rejected.
pub fn query_map_json(raw: Option<&str>) -> String {
    let pairs: Vec<(String, String)> = raw
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default();

    let mut map = Map::new();
    for (key, value) in pairs {
        map.insert(key, Value::String(value));
    }
    Value::Object(map).to_string()
}
