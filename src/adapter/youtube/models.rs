//! YouTube Data API Models
//!
//! videos.insert のリクエスト/レスポンス表現

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::entities::upload_request::{UploadRequest, UploadResult};
use crate::domain::errors::TransferError;

/// videos.insert のリクエストボディ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoInsert {
    pub snippet: InsertSnippet,
    pub status: InsertStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertSnippet {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertStatus {
    pub privacy_status: String,
}

impl From<&UploadRequest> for VideoInsert {
    fn from(request: &UploadRequest) -> Self {
        Self {
            snippet: InsertSnippet {
                title: request.title().to_string(),
                description: request.description().to_string(),
                tags: request.tags().to_vec(),
                category_id: request.category_id().to_string(),
            },
            status: InsertStatus {
                privacy_status: request.privacy_status().as_str().to_string(),
            },
        }
    }
}

/// アップロード完了時に返る動画リソース（必要なフィールドのみ）
#[derive(Debug, Clone, Deserialize)]
pub struct VideoResource {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<ResourceSnippet>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSnippet {
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub channel_title: Option<String>,
}

impl VideoResource {
    /// Missing channel fields become empty strings
    pub fn into_result(self) -> UploadResult {
        let snippet = self.snippet.unwrap_or_default();
        UploadResult::new(
            self.id,
            snippet.channel_id.unwrap_or_default(),
            snippet.channel_title.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

/// Build a transfer error from a non-success response, preferring the
/// API's own error message over the raw body
pub fn http_error(status: u16, body: &str) -> TransferError {
    let body = match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ => body.trim().to_string(),
    };
    TransferError::Http { status, body }
}

/// Next offset from a `Range: bytes=0-N` header. No header means nothing
/// has been persisted yet.
pub fn parse_range_header(range: Option<&str>) -> Result<u64, TransferError> {
    let Some(range) = range else {
        return Ok(0);
    };

    range
        .trim()
        .strip_prefix("bytes=")
        .and_then(|r| r.split_once('-'))
        .and_then(|(_, end)| end.parse::<u64>().ok())
        .map(|end| end + 1)
        .ok_or_else(|| TransferError::Protocol(format!("malformed Range header: {}", range)))
}

/// `Content-Range` value for the chunk `[start, start + len)` of `total`
pub fn content_range(start: u64, len: u64, total: u64) -> String {
    if total == 0 || len == 0 {
        return format!("bytes */{}", total);
    }
    format!("bytes {}-{}/{}", start, start + len - 1, total)
}

/// MIME type announced in `X-Upload-Content-Type`
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "avi" => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}
