//! JSON Manifest Repository Implementation
//!
//! ManifestRepositoryのJSON実装（ビューアが読み込む動画一覧を書き出す）

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::entities::manifest::ManifestEntry;
use crate::domain::repositories::manifest_repository::ManifestRepository;

/// Second-precision UTC timestamp used in `uploadDate`
pub const UPLOAD_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// JSONファイルベースのマニフェストリポジトリ
pub struct JsonManifestRepository;

/// マニフェストのレコード（JSON永続化用の内部表現）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct ManifestEntryJson {
    id: u32,
    video_id: String,
    title: String,
    description: String,
    thumbnail_url: String,
    upload_date: String,
    channel_id: String,
    channel_title: String,
}

impl JsonManifestRepository {
    /// 新しいリポジトリを作成
    pub fn new() -> Self {
        Self
    }

    /// ファイルに書き出す（同期処理）
    fn write_sync(path: &Path, entries: &[ManifestEntryJson]) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create manifest directory")?;
            }
        }

        let json = serde_json::to_string_pretty(entries).context("Failed to serialize manifest")?;

        fs::write(path, json).context("Failed to write manifest file")?;

        info!(
            "Saved manifest with {} entries to {}",
            entries.len(),
            path.display()
        );

        Ok(())
    }

    /// ファイルから読み込む（同期処理）
    fn load_sync(path: &Path) -> Result<Option<Vec<ManifestEntryJson>>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).context("Failed to read manifest file")?;
        let entries: Vec<ManifestEntryJson> =
            serde_json::from_str(&content).context("Failed to parse manifest JSON")?;

        Ok(Some(entries))
    }

    /// Domain形式からJSON形式に変換
    fn to_json_entry(entry: &ManifestEntry) -> ManifestEntryJson {
        ManifestEntryJson {
            id: entry.sequential_id,
            video_id: entry.remote_id.clone(),
            title: entry.title.clone(),
            description: entry.description.clone(),
            thumbnail_url: entry.thumbnail_url.clone(),
            upload_date: entry.upload_timestamp.format(UPLOAD_DATE_FORMAT).to_string(),
            channel_id: entry.channel_id.clone(),
            channel_title: entry.channel_title.clone(),
        }
    }

    /// JSON形式からDomain形式に変換
    fn to_domain_entry(json_entry: ManifestEntryJson) -> Result<ManifestEntry> {
        let upload_timestamp = DateTime::parse_from_rfc3339(&json_entry.upload_date)
            .context(format!("Invalid uploadDate: {}", json_entry.upload_date))?
            .with_timezone(&Utc);

        Ok(ManifestEntry {
            sequential_id: json_entry.id,
            remote_id: json_entry.video_id,
            title: json_entry.title,
            description: json_entry.description,
            thumbnail_url: json_entry.thumbnail_url,
            upload_timestamp,
            channel_id: json_entry.channel_id,
            channel_title: json_entry.channel_title,
        })
    }
}

#[async_trait]
impl ManifestRepository for JsonManifestRepository {
    async fn write(&self, path: &Path, entries: Vec<ManifestEntry>) -> Result<()> {
        let path = path.to_path_buf();
        let json_entries: Vec<ManifestEntryJson> = entries.iter().map(Self::to_json_entry).collect();
        tokio::task::spawn_blocking(move || Self::write_sync(&path, &json_entries))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))??;

        Ok(())
    }

    async fn load(&self, path: &Path) -> Result<Option<Vec<ManifestEntry>>> {
        let path = path.to_path_buf();
        let json_entries = tokio::task::spawn_blocking(move || Self::load_sync(&path))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))??;

        json_entries
            .map(|entries| entries.into_iter().map(Self::to_domain_entry).collect())
            .transpose()
    }
}

impl Default for JsonManifestRepository {
    fn default() -> Self {
        Self::new()
    }
}
