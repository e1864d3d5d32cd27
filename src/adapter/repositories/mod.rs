//! Repository Implementations
//!
//! Domain層のRepositoryトレイトの実装

pub mod file_video_repository;
pub mod json_manifest_repository;
