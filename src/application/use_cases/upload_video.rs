//! # Upload Video Use Case
//!
//! 1動画のチャンク分割アップロード（リトライ付き）

use std::sync::Arc;

use log::{debug, info};

use crate::domain::entities::upload_request::{UploadRequest, UploadResult};
use crate::domain::errors::UploadError;
use crate::domain::repositories::video_host::{ChunkOutcome, VideoHost};
use crate::domain::services::pacing::Sleeper;
use crate::domain::services::progress::ProgressObserver;
use crate::domain::services::retry_policy::{RetryDecision, RetryPolicy};

/// 動画アップロードユースケース
///
/// 再開可能アップロードのセッションを完了まで進める。
/// チャンク送信が失敗した場合は `RetryPolicy` に従って同じ手順を再試行する。
/// リトライ回数はアップロードごとに 0 から数える。
pub struct UploadVideoUseCase<H: VideoHost> {
    host: Arc<H>,
    sleeper: Arc<dyn Sleeper>,
    observer: Arc<dyn ProgressObserver>,
    retry_policy: RetryPolicy,
}

impl<H: VideoHost> UploadVideoUseCase<H> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `host` - 認証済みの動画ホスト
    /// * `sleeper` - リトライ待機に使う Sleeper
    /// * `observer` - 進捗の通知先
    /// * `retry_policy` - リトライポリシー
    pub fn new(
        host: Arc<H>,
        sleeper: Arc<dyn Sleeper>,
        observer: Arc<dyn ProgressObserver>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            host,
            sleeper,
            observer,
            retry_policy,
        }
    }

    /// 動画をアップロードする
    ///
    /// # Errors
    ///
    /// ファイルを開けない場合は `UploadError::Setup`、
    /// リトライ上限を超えた場合は `UploadError::RetriesExhausted`
    pub async fn execute(&self, request: &UploadRequest) -> Result<UploadResult, UploadError> {
        let path = request.file_path();
        println!("Uploading {}", path.display());

        let mut session =
            self.host
                .begin_upload(request)
                .await
                .map_err(|source| UploadError::Setup {
                    path: path.to_path_buf(),
                    source,
                })?;

        let mut retry_count = 0;

        loop {
            match session.next_chunk().await {
                Ok(ChunkOutcome::InProgress(progress)) => {
                    debug!(
                        "{}: {}/{} bytes confirmed",
                        path.display(),
                        progress.bytes_sent,
                        progress.total_bytes
                    );
                    self.observer.on_progress(path, progress);
                }
                Ok(ChunkOutcome::Complete(result)) => {
                    info!(
                        "Upload of {} complete: {} (retries: {})",
                        path.display(),
                        result.remote_id,
                        retry_count
                    );
                    return Ok(result);
                }
                Err(e) => {
                    retry_count += 1;
                    match self.retry_policy.decide(retry_count) {
                        RetryDecision::RetryAfter(delay) => {
                            println!(
                                "⚠ Chunk failed (retry {}/{}), retrying in {}s: {}",
                                retry_count,
                                self.retry_policy.max_retries,
                                delay.as_secs(),
                                e
                            );
                            self.sleeper.sleep(delay).await;
                        }
                        RetryDecision::GiveUp => {
                            println!(
                                "✗ Giving up on {} after {} failed attempts: {}",
                                path.display(),
                                retry_count,
                                e
                            );
                            return Err(UploadError::RetriesExhausted {
                                attempts: retry_count,
                                source: e,
                            });
                        }
                    }
                }
            }
        }
    }
}
