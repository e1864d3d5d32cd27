//! # Manifest Entity
//!
//! アップロード済み動画の一覧（ビューアが読み込むマニフェスト）

use chrono::{DateTime, Utc};

use super::upload_request::UploadResult;

/// Thumbnail template used by the viewer (medium quality)
pub fn thumbnail_url(remote_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/mqdefault.jpg", remote_id)
}

/// マニフェストの1レコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// 1始まりの連番（追加順）
    pub sequential_id: u32,
    pub remote_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub upload_timestamp: DateTime<Utc>,
    pub channel_id: String,
    pub channel_title: String,
}

/// マニフェスト
///
/// 成功したアップロードだけを追加順に保持する。
/// `sequential_id` は追加時に `len + 1` で採番されるため、
/// 失敗したファイルがあっても 1..N の連番になる。
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// アップロード結果を追加し、採番されたエントリを返す
    pub fn append(
        &mut self,
        result: &UploadResult,
        title: impl Into<String>,
        description: impl Into<String>,
        uploaded_at: DateTime<Utc>,
    ) -> &ManifestEntry {
        let entry = ManifestEntry {
            sequential_id: self.entries.len() as u32 + 1,
            remote_id: result.remote_id.clone(),
            title: title.into(),
            description: description.into(),
            thumbnail_url: thumbnail_url(&result.remote_id),
            upload_timestamp: uploaded_at,
            channel_id: result.channel_id.clone(),
            channel_title: result.channel_title.clone(),
        };
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<ManifestEntry> {
        self.entries
    }
}
