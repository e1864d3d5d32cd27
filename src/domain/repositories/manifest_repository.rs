//! # Manifest Repository Trait
//!
//! マニフェストの永続化を抽象化

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::manifest::ManifestEntry;

/// マニフェストリポジトリ
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ManifestRepository: Send + Sync {
    /// マニフェスト全体を書き出す（既存ファイルは置き換える）
    ///
    /// # Arguments
    ///
    /// * `path` - 出力先のパス（親ディレクトリは必要なら作成）
    /// * `entries` - 追加順のエントリ
    ///
    /// # Errors
    ///
    /// シリアライズまたは書き込みに失敗した場合にエラーを返す
    async fn write(&self, path: &Path, entries: Vec<ManifestEntry>) -> Result<()>;

    /// 既存のマニフェストを読み込む
    ///
    /// ファイルが存在しない場合は `None`
    async fn load(&self, path: &Path) -> Result<Option<Vec<ManifestEntry>>>;
}
