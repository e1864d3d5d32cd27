//! # Publish Videos Use Case
//!
//! 複数動画の順次アップロードとマニフェスト書き出し

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;

use super::upload_video::UploadVideoUseCase;
use crate::application::dto::upload_settings::UploadSettings;
use crate::domain::entities::manifest::{Manifest, ManifestEntry};
use crate::domain::errors::UploadError;
use crate::domain::repositories::manifest_repository::ManifestRepository;
use crate::domain::repositories::video_host::VideoHost;
use crate::domain::services::pacing::Sleeper;

/// アップロードに失敗したファイル
#[derive(Debug, Clone)]
pub struct FailedUpload {
    pub path: PathBuf,
    pub error: UploadError,
}

/// 実行結果のサマリー
#[derive(Debug, Clone)]
pub struct PublishSummary {
    /// マニフェストに書き出したエントリ
    pub entries: Vec<ManifestEntry>,
    /// 失敗したファイル（マニフェストには含まれない）
    pub failures: Vec<FailedUpload>,
}

impl PublishSummary {
    pub fn uploaded_count(&self) -> usize {
        self.entries.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }
}

/// 動画公開ユースケース
///
/// ファイルを列挙順に1つずつアップロードし、最後にマニフェストを1回だけ書き出す。
/// 1ファイルの失敗は他のファイルに影響しない。
pub struct PublishVideosUseCase<H: VideoHost, M: ManifestRepository> {
    upload_use_case: UploadVideoUseCase<H>,
    manifest_repository: Arc<M>,
    sleeper: Arc<dyn Sleeper>,
    inter_file_delay: Duration,
}

impl<H: VideoHost, M: ManifestRepository> PublishVideosUseCase<H, M> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `upload_use_case` - 1動画のアップロード
    /// * `manifest_repository` - マニフェストリポジトリ
    /// * `sleeper` - ファイル間の待機に使う Sleeper
    /// * `inter_file_delay` - ファイル間の待機時間（レート制限対策）
    pub fn new(
        upload_use_case: UploadVideoUseCase<H>,
        manifest_repository: Arc<M>,
        sleeper: Arc<dyn Sleeper>,
        inter_file_delay: Duration,
    ) -> Self {
        Self {
            upload_use_case,
            manifest_repository,
            sleeper,
            inter_file_delay,
        }
    }

    /// 全ファイルをアップロードしてマニフェストを書き出す
    ///
    /// # Errors
    ///
    /// マニフェストの書き出しに失敗した場合のみエラーを返す
    pub async fn execute(
        &self,
        files: &[PathBuf],
        settings: &UploadSettings,
        manifest_path: &Path,
    ) -> Result<PublishSummary> {
        let mut manifest = Manifest::new();
        let mut failures = Vec::new();
        let total = files.len();

        for (i, file) in files.iter().enumerate() {
            let request = settings.build_request(file);
            println!("[{}/{}] {}", i + 1, total, request.title());

            match self.upload_use_case.execute(&request).await {
                Ok(result) => {
                    let entry = manifest.append(
                        &result,
                        request.video_name(),
                        request.description(),
                        Utc::now(),
                    );
                    println!(
                        "✓ Video uploaded successfully. Video ID: {} (#{})",
                        entry.remote_id, entry.sequential_id
                    );
                    println!("  Video URL: {}", result.watch_url());
                }
                Err(error) => {
                    println!(
                        "✗ An error occurred while uploading {}: {}",
                        file.display(),
                        error
                    );
                    failures.push(FailedUpload {
                        path: file.clone(),
                        error,
                    });
                }
            }

            if i + 1 < total {
                self.sleeper.sleep(self.inter_file_delay).await;
            }
        }

        let entries = manifest.into_entries();
        self.manifest_repository
            .write(manifest_path, entries.clone())
            .await
            .context(format!(
                "Failed to write manifest: {}",
                manifest_path.display()
            ))?;

        info!(
            "Publish finished: {} uploaded, {} failed",
            entries.len(),
            failures.len()
        );

        Ok(PublishSummary { entries, failures })
    }
}
