//! # Domain Entities
//!
//! ビジネスエンティティとバリューオブジェクトを定義するモジュール
//!
//! ## エンティティ
//!
//! - **UploadRequest / UploadResult**: 1動画分のアップロード要求と結果
//! - **Manifest**: アップロード済み動画のレコード一覧

pub mod manifest;
pub mod upload_request;
