//! # Use Cases
//!
//! アプリケーションのビジネスフロー（ユースケース）
//!
//! ## ユースケース
//!
//! - **DiscoverVideosUseCase**: 動画ファイルの発見
//! - **UploadVideoUseCase**: 1動画のアップロード（リトライ付き）
//! - **PublishVideosUseCase**: 全動画のアップロードとマニフェスト書き出し

pub mod discover_videos;
pub mod publish_videos;
pub mod upload_video;

#[cfg(test)]
pub(crate) mod test_support;
