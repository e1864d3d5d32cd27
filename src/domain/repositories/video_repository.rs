//! # Video Repository Trait
//!
//! ローカル動画ファイルの列挙を抽象化

use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;

/// 動画リポジトリ
///
/// アップロード候補となるローカル動画ファイルを列挙する
#[cfg_attr(test, automock)]
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// 動画ファイルを列挙する
    ///
    /// # Arguments
    ///
    /// * `video_dir` - 動画ディレクトリのパス
    ///
    /// # Returns
    ///
    /// 辞書順（昇順）に並んだ動画ファイルのパス。該当なしは空のリスト
    async fn list_videos(&self, video_dir: &Path) -> Result<Vec<PathBuf>>;
}
