//! # Upload Request / Result
//!
//! アップロード要求と結果のバリューオブジェクト

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 公開範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyStatus {
    Public,
    #[default]
    Unlisted,
    Private,
}

impl PrivacyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivacyStatus::Public => "public",
            PrivacyStatus::Unlisted => "unlisted",
            PrivacyStatus::Private => "private",
        }
    }
}

impl fmt::Display for PrivacyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrivacyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(PrivacyStatus::Public),
            "unlisted" => Ok(PrivacyStatus::Unlisted),
            "private" => Ok(PrivacyStatus::Private),
            other => Err(format!("unknown privacy status: {}", other)),
        }
    }
}

/// アップロード要求
///
/// 1ファイル分のアップロード内容。生成後は変更しない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    file_path: PathBuf,
    title: String,
    description: String,
    tags: Vec<String>,
    category_id: String,
    privacy_status: PrivacyStatus,
}

impl UploadRequest {
    pub fn new(
        file_path: impl Into<PathBuf>,
        title: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
        category_id: impl Into<String>,
        privacy_status: PrivacyStatus,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            title: title.into(),
            description: description.into(),
            tags,
            category_id: category_id.into(),
            privacy_status,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    pub fn privacy_status(&self) -> PrivacyStatus {
        self.privacy_status
    }

    /// ファイル名（拡張子なし）
    ///
    /// マニフェストのタイトルとして使う
    pub fn video_name(&self) -> String {
        video_name(&self.file_path)
    }
}

/// Extract the file stem used as a human-readable video name
pub fn video_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// アップロード結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    /// リモートの動画ID
    pub remote_id: String,
    /// チャンネルID（無い場合は空文字）
    pub channel_id: String,
    /// チャンネル名（無い場合は空文字）
    pub channel_title: String,
}

impl UploadResult {
    pub fn new(
        remote_id: impl Into<String>,
        channel_id: impl Into<String>,
        channel_title: impl Into<String>,
    ) -> Self {
        Self {
            remote_id: remote_id.into(),
            channel_id: channel_id.into(),
            channel_title: channel_title.into(),
        }
    }

    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.remote_id)
    }
}

/// 送信進捗
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub bytes_sent: u64,
    pub total_bytes: u64,
}

impl UploadProgress {
    pub fn new(bytes_sent: u64, total_bytes: u64) -> Self {
        Self {
            bytes_sent,
            total_bytes,
        }
    }

    /// Percentage complete, truncated. An empty file counts as complete.
    pub fn percent(&self) -> u8 {
        if self.total_bytes == 0 {
            return 100;
        }
        let pct = self.bytes_sent.min(self.total_bytes) * 100 / self.total_bytes;
        pct as u8
    }
}
