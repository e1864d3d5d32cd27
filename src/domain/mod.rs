//! # Domain Layer
//!
//! このモジュールはビジネスの核心的なルールとエンティティを定義します。
//!
//! ## 特徴
//!
//! - 外部システムに依存しない（HTTP やファイルシステムを知らない）
//! - 純粋なビジネスロジック
//!
//! ## 構成要素
//!
//! - **entities**: ビジネスエンティティ（UploadRequest, Manifestなど）
//! - **errors**: エラー分類
//! - **repositories**: Repository trait（インターフェース定義のみ）
//! - **services**: Domain Service（リトライ・待機・進捗）

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod services;
