//! File Video Repository Implementation
//!
//! VideoRepositoryのファイルシステム実装

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::domain::repositories::video_repository::VideoRepository;

/// ファイルシステムベースの動画リポジトリ
///
/// ディレクトリ直下のファイルのうち、拡張子が一致するものだけを返す
#[derive(Debug, Clone)]
pub struct FileVideoRepository {
    extensions: Vec<String>,
}

impl FileVideoRepository {
    /// 新しいリポジトリを作成
    ///
    /// 拡張子は大文字小文字を区別せず、先頭の `.` は無視する
    pub fn new(extensions: &[String]) -> Self {
        Self {
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            })
            .unwrap_or(false)
    }

    /// 動画ファイルを列挙する（内部実装）
    fn list_videos_internal(&self, video_dir: &Path) -> Result<Vec<PathBuf>> {
        if !video_dir.exists() {
            warn!("Video directory does not exist: {}", video_dir.display());
            return Ok(Vec::new());
        }

        let mut videos = Vec::new();

        for entry in WalkDir::new(video_dir)
            .follow_links(true)
            .min_depth(1)
            .max_depth(1)
        {
            let entry = entry.context(format!(
                "Failed to read video directory: {}",
                video_dir.display()
            ))?;
            let path = entry.path();
            if entry.file_type().is_file() && self.matches_extension(path) {
                debug!("Found video: {}", path.display());
                videos.push(path.to_path_buf());
            }
        }

        videos.sort();

        Ok(videos)
    }
}

#[async_trait]
impl VideoRepository for FileVideoRepository {
    async fn list_videos(&self, video_dir: &Path) -> Result<Vec<PathBuf>> {
        let repo = self.clone();
        let video_dir = video_dir.to_path_buf();
        tokio::task::spawn_blocking(move || repo.list_videos_internal(&video_dir))
            .await
            .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn mp4_repo() -> FileVideoRepository {
        FileVideoRepository::new(&["mp4".to_string()])
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"data").unwrap();
    }

    #[tokio::test]
    async fn test_sorted_lexicographically() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.mp4", "a.mp4", "c.mp4"] {
            touch(temp_dir.path(), name);
        }

        let videos = mp4_repo().list_videos(temp_dir.path()).await.unwrap();

        let names: Vec<String> = videos
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.mp4", "b.mp4", "c.mp4"]);
    }

    #[tokio::test]
    async fn test_extension_filter() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "clip.mp4");
        touch(temp_dir.path(), "LOUD.MP4");
        touch(temp_dir.path(), "notes.txt");
        touch(temp_dir.path(), "no_extension");

        let videos = mp4_repo().list_videos(temp_dir.path()).await.unwrap();

        assert_eq!(videos.len(), 2);
        assert!(videos.iter().all(|p| p
            .extension()
            .unwrap()
            .to_string_lossy()
            .eq_ignore_ascii_case("mp4")));
    }

    #[tokio::test]
    async fn test_nested_directories_ignored() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "top.mp4");
        let nested = temp_dir.path().join("nested.mp4");
        fs::create_dir(&nested).unwrap();
        touch(&nested, "inner.mp4");

        let videos = mp4_repo().list_videos(temp_dir.path()).await.unwrap();

        assert_eq!(videos, vec![temp_dir.path().join("top.mp4")]);
    }

    #[tokio::test]
    async fn test_missing_directory_is_empty() {
        let videos = mp4_repo()
            .list_videos(Path::new("/nonexistent/videos"))
            .await
            .unwrap();
        assert!(videos.is_empty());
    }

    #[tokio::test]
    async fn test_multiple_extensions() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "a.mov");
        touch(temp_dir.path(), "b.mp4");
        touch(temp_dir.path(), "c.webm");

        let repo = FileVideoRepository::new(&[".mp4".to_string(), "MOV".to_string()]);
        let videos = repo.list_videos(temp_dir.path()).await.unwrap();

        assert_eq!(
            videos,
            vec![temp_dir.path().join("a.mov"), temp_dir.path().join("b.mp4")]
        );
    }
}
