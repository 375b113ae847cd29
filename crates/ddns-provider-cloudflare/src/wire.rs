//! Cloudflare API v4 request and response bodies

use serde::{Deserialize, Serialize};

/// Response envelope shared by every endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    pub result: Option<T>,
    #[serde(default)]
    pub result_info: Option<ResultInfo>,
}

impl<T> ApiResponse<T> {
    /// Pages available for a listing (at least 1)
    pub fn total_pages(&self) -> u32 {
        self.result_info
            .as_ref()
            .and_then(|info| info.total_pages)
            .unwrap_or(1)
            .max(1)
    }

    /// `code: message` pairs joined for error reporting
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return "no error details".to_string();
        }

        self.errors
            .iter()
            .map(|e| format!("{}: {}", e.code, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResultInfo {
    #[serde(default)]
    pub total_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenStatus {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ZoneResult {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordResult {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub proxied: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRecordBody<'a> {
    #[serde(rename = "type")]
    pub record_type: &'a str,
    pub name: &'a str,
    pub content: &'a str,
    pub proxied: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct PatchRecordBody<'a> {
    pub content: &'a str,
    pub proxied: bool,
}
