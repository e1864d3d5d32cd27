//! Configuration
//!
//! 設定ファイル（JSON）の読み込み。全項目にデフォルト値があるため、
//! ファイルが無い場合や一部のみ指定された場合も動作する。

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::application::dto::upload_settings::UploadSettings;
use crate::domain::entities::upload_request::PrivacyStatus;
use crate::domain::services::pacing::DEFAULT_INTER_FILE_DELAY;
use crate::domain::services::retry_policy::{
    RetryPolicy, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY,
};

/// Every resumable chunk except the last must be a multiple of this
pub const CHUNK_GRANULARITY: u64 = 256 * 1024;
pub const DEFAULT_CHUNK_SIZE: u64 = 4 * CHUNK_GRANULARITY;
pub const YOUTUBE_UPLOAD_SCOPE: &str = "https://www.googleapis.com/auth/youtube.upload";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    // Inputs / outputs
    pub video_dir: String,
    pub video_extensions: Vec<String>,
    pub manifest_path: String,

    // Authentication
    pub client_secret_path: String,
    pub token_cache_path: String,
    pub account_hint: Option<String>,
    pub consent_timeout_secs: u64,

    // Transfer
    pub chunk_size: u64,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    pub inter_file_delay_secs: u64,

    // Video metadata
    pub title_prefix: String,
    pub description_template: String,
    pub tags: Vec<String>,
    pub category_id: String,
    pub privacy_status: PrivacyStatus,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            video_dir: "heatmap_videos".to_string(),
            video_extensions: vec!["mp4".to_string()],
            manifest_path: "public/youtube_videos.json".to_string(),
            client_secret_path: "credentials/youtube/client_secret.json".to_string(),
            token_cache_path: "credentials/youtube/token.json".to_string(),
            account_hint: None,
            consent_timeout_secs: 300,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_secs: DEFAULT_RETRY_DELAY.as_secs(),
            inter_file_delay_secs: DEFAULT_INTER_FILE_DELAY.as_secs(),
            title_prefix: "LCN Video Viewer - ".to_string(),
            description_template:
                "Video for synchronized playback in LCN Video Viewer application. File: {name}"
                    .to_string(),
            tags: vec![
                "LCN".to_string(),
                "synchronized".to_string(),
                "video".to_string(),
                "viewer".to_string(),
            ],
            // 22 = People & Blogs
            category_id: "22".to_string(),
            privacy_status: PrivacyStatus::Unlisted,
        }
    }
}

/// Expands tilde in path and returns the full path
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let path = expand_path(path);
        if !path.exists() {
            info!(
                "No config file at {}, using built-in defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .context(format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 || self.chunk_size % CHUNK_GRANULARITY != 0 {
            anyhow::bail!(
                "chunk_size must be a positive multiple of {} bytes, got {}",
                CHUNK_GRANULARITY,
                self.chunk_size
            );
        }
        if self.video_extensions.is_empty() {
            anyhow::bail!("video_extensions must not be empty");
        }
        Ok(())
    }

    pub fn video_dir(&self) -> PathBuf {
        expand_path(&self.video_dir)
    }

    pub fn manifest_path(&self) -> PathBuf {
        expand_path(&self.manifest_path)
    }

    pub fn client_secret_path(&self) -> PathBuf {
        expand_path(&self.client_secret_path)
    }

    pub fn token_cache_path(&self) -> PathBuf {
        expand_path(&self.token_cache_path)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_secs(self.retry_delay_secs))
    }

    pub fn inter_file_delay(&self) -> Duration {
        Duration::from_secs(self.inter_file_delay_secs)
    }

    pub fn consent_timeout(&self) -> Duration {
        Duration::from_secs(self.consent_timeout_secs)
    }

    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings::new(
            self.title_prefix.clone(),
            self.description_template.clone(),
            self.tags.clone(),
            self.category_id.clone(),
            self.privacy_status,
        )
    }
}
