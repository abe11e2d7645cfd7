//! Response DTOs for the listing endpoints.

use serde::Serialize;

use mockbin_core::{Api, Bin, RequestLog};

#[derive(Debug, Serialize)]
pub struct BinWithLogs {
    #[serde(flatten)]
    pub bin: Bin,
    pub logs: Vec<RequestLog>,
}

#[derive(Debug, Serialize)]
pub struct BinListing {
    pub message: &'static str,
    pub bins: Vec<BinWithLogs>,
}

#[derive(Debug, Serialize)]
pub struct ApiListing {
    pub message: &'static str,
    pub apis: Vec<Api>,
}
