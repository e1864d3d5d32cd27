//! Resumable Upload Session
//!
//! YouTube の再開可能アップロードプロトコル（1回の呼び出しで1チャンク）

use std::io::SeekFrom;

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::header::{CONTENT_RANGE, CONTENT_TYPE, LOCATION, RANGE};
use reqwest::StatusCode;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

use crate::adapter::youtube::models::{
    content_range, content_type_for, http_error, parse_range_header, VideoInsert, VideoResource,
};
use crate::domain::entities::upload_request::{UploadProgress, UploadRequest};
use crate::domain::errors::TransferError;
use crate::domain::repositories::credential_provider::AccessToken;
use crate::domain::repositories::video_host::{ChunkOutcome, UploadSession};

/// Status Google uses for "Resume Incomplete"
const RESUME_INCOMPLETE: u16 = 308;

fn network_error(e: reqwest::Error) -> TransferError {
    TransferError::Network(e.to_string())
}

/// 1ファイル分の再開可能アップロード
pub struct ResumableUpload {
    http: reqwest::Client,
    init_url: String,
    token: AccessToken,
    metadata: VideoInsert,
    content_type: &'static str,
    file: File,
    total_bytes: u64,
    chunk_size: u64,
    session_uri: Option<String>,
    offset: u64,
    needs_status_query: bool,
}

impl ResumableUpload {
    pub fn new(
        http: reqwest::Client,
        init_url: String,
        token: AccessToken,
        request: &UploadRequest,
        file: File,
        total_bytes: u64,
        chunk_size: u64,
    ) -> Self {
        Self {
            http,
            init_url,
            token,
            metadata: VideoInsert::from(request),
            content_type: content_type_for(request.file_path()),
            file,
            total_bytes,
            chunk_size: chunk_size.max(1),
            session_uri: None,
            offset: 0,
            needs_status_query: false,
        }
    }

    /// Ask the platform for a session URI carrying all of the video metadata
    async fn initiate(&self) -> Result<String, TransferError> {
        debug!("POST {}", self.init_url);

        let response = self
            .http
            .post(&self.init_url)
            .bearer_auth(self.token.secret())
            .header("X-Upload-Content-Length", self.total_bytes.to_string())
            .header("X-Upload-Content-Type", self.content_type)
            .json(&self.metadata)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(http_error(status.as_u16(), &body));
        }

        response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                TransferError::Protocol("resumable session response has no Location".to_string())
            })
    }

    async fn read_chunk(&mut self) -> Result<Vec<u8>, TransferError> {
        let len = self.chunk_size.min(self.total_bytes.saturating_sub(self.offset));
        let mut buf = vec![0u8; len as usize];
        self.file.seek(SeekFrom::Start(self.offset)).await?;
        self.file.read_exact(&mut buf).await?;
        Ok(buf)
    }

    async fn put(
        &self,
        session_uri: &str,
        range: String,
        body: Vec<u8>,
    ) -> Result<reqwest::Response, TransferError> {
        debug!("PUT {} ({})", session_uri, range);

        self.http
            .put(session_uri)
            .bearer_auth(self.token.secret())
            .header(CONTENT_TYPE, self.content_type)
            .header(CONTENT_RANGE, range)
            .body(body)
            .send()
            .await
            .map_err(network_error)
    }

    /// Ask how many bytes the platform stored, with an empty `bytes */{total}` PUT
    async fn query_status(&mut self, session_uri: &str) -> Result<ChunkOutcome, TransferError> {
        info!(
            "Asking the upload session how much of {} bytes it received",
            self.total_bytes
        );
        let range = format!("bytes */{}", self.total_bytes);
        let response = self.put(session_uri, range, Vec::new()).await?;
        self.read_response(response).await
    }

    async fn read_response(
        &mut self,
        response: reqwest::Response,
    ) -> Result<ChunkOutcome, TransferError> {
        let status = response.status();
        match status.as_u16() {
            RESUME_INCOMPLETE => {
                let range = response.headers().get(RANGE).and_then(|v| v.to_str().ok());
                self.offset = parse_range_header(range)?;
                Ok(ChunkOutcome::InProgress(UploadProgress::new(
                    self.offset,
                    self.total_bytes,
                )))
            }
            _ if status.is_success() => {
                let resource: VideoResource = response.json().await.map_err(|e| {
                    TransferError::Protocol(format!("invalid video resource: {}", e))
                })?;
                self.offset = self.total_bytes;
                Ok(ChunkOutcome::Complete(resource.into_result()))
            }
            _ => {
                if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
                    warn!("Upload session expired, starting a new one");
                    self.session_uri = None;
                    self.offset = 0;
                }
                let body = response.text().await.unwrap_or_default();
                Err(http_error(status.as_u16(), &body))
            }
        }
    }

    async fn advance(&mut self) -> Result<ChunkOutcome, TransferError> {
        let session_uri = match &self.session_uri {
            Some(uri) => uri.clone(),
            None => {
                let uri = self.initiate().await?;
                self.session_uri = Some(uri.clone());
                self.offset = 0;
                uri
            }
        };

        if self.needs_status_query {
            if let complete @ ChunkOutcome::Complete(_) = self.query_status(&session_uri).await? {
                return Ok(complete);
            }
        }

        let chunk = self.read_chunk().await?;
        let range = content_range(self.offset, chunk.len() as u64, self.total_bytes);
        let response = self.put(&session_uri, range, chunk).await?;
        self.read_response(response).await
    }
}

#[async_trait]
impl UploadSession for ResumableUpload {
    async fn next_chunk(&mut self) -> Result<ChunkOutcome, TransferError> {
        let outcome = self.advance().await;
        // After a failure on a live session the stored offset is unknown
        self.needs_status_query = outcome.is_err() && self.session_uri.is_some();
        outcome
    }
}
