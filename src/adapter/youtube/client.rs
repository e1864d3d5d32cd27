//! YouTube Data API Client
//!
//! VideoHostのYouTube実装

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;
use reqwest::redirect::Policy;
use tokio::fs::File;

use crate::adapter::youtube::session::ResumableUpload;
use crate::domain::entities::upload_request::UploadRequest;
use crate::domain::errors::TransferError;
use crate::domain::repositories::credential_provider::AccessToken;
use crate::domain::repositories::video_host::{UploadSession, VideoHost};

pub const UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/youtube/v3";

/// YouTube アップロードクライアント
pub struct YouTubeClient {
    http: reqwest::Client,
    upload_base: String,
    token: AccessToken,
    chunk_size: u64,
}

impl YouTubeClient {
    /// 認証済みトークンからクライアントを作成
    ///
    /// # Errors
    ///
    /// HTTPクライアントの初期化に失敗した場合
    pub fn new(token: AccessToken, chunk_size: u64) -> Result<Self> {
        // 308 is the protocol's "Resume Incomplete" and must not be followed
        let http = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_http_client(http, UPLOAD_BASE_URL, token, chunk_size))
    }

    /// Use a preconfigured client. It must not follow redirects.
    pub fn with_http_client(
        http: reqwest::Client,
        upload_base: impl Into<String>,
        token: AccessToken,
        chunk_size: u64,
    ) -> Self {
        Self {
            http,
            upload_base: upload_base.into().trim_end_matches('/').to_string(),
            token,
            chunk_size,
        }
    }

    fn init_url(&self) -> String {
        format!(
            "{}/videos?uploadType=resumable&part=snippet,status",
            self.upload_base
        )
    }
}

#[async_trait]
impl VideoHost for YouTubeClient {
    async fn begin_upload(
        &self,
        request: &UploadRequest,
    ) -> Result<Box<dyn UploadSession>, TransferError> {
        let file = File::open(request.file_path()).await?;
        let total_bytes = file.metadata().await?.len();

        info!(
            "Starting resumable upload of {} ({} bytes)",
            request.file_path().display(),
            total_bytes
        );

        Ok(Box::new(ResumableUpload::new(
            self.http.clone(),
            self.init_url(),
            self.token.clone(),
            request,
            file,
            total_bytes,
            self.chunk_size,
        )))
    }
}
