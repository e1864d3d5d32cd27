//! # Discover Videos Use Case
//!
//! アップロード候補の動画ファイル発見ユースケース

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use log::info;

use crate::domain::repositories::video_repository::VideoRepository;

/// 動画ファイル発見ユースケース
///
/// 指定されたディレクトリから動画ファイルを発見する
pub struct DiscoverVideosUseCase<R: VideoRepository> {
    video_repository: Arc<R>,
}

impl<R: VideoRepository> DiscoverVideosUseCase<R> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `video_repository` - 動画リポジトリ
    pub fn new(video_repository: Arc<R>) -> Self {
        Self { video_repository }
    }

    /// 動画ファイルを発見する
    ///
    /// # Arguments
    ///
    /// * `video_dir` - 動画ディレクトリのパス
    ///
    /// # Returns
    ///
    /// 辞書順に並んだ動画ファイルのパス（空でもエラーにしない）
    ///
    /// # Errors
    ///
    /// ディレクトリの読み取りに失敗した場合にエラーを返す
    pub async fn execute(&self, video_dir: &Path) -> Result<Vec<PathBuf>> {
        let videos = self.video_repository.list_videos(video_dir).await?;
        info!(
            "Discovered {} candidate videos in {}",
            videos.len(),
            video_dir.display()
        );
        Ok(videos)
    }
}
