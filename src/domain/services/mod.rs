//! # Domain Services
//!
//! エンティティに属さないビジネスルール
//!
//! - **retry_policy**: チャンク送信のリトライ判定
//! - **pacing**: 待機処理の抽象化
//! - **progress**: 進捗通知の抽象化

pub mod pacing;
pub mod progress;
pub mod retry_policy;
