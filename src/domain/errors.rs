//! # Domain Errors
//!
//! 認証・転送・アップロードのエラー分類

use std::path::PathBuf;

use thiserror::Error;

/// 認証エラー（実行全体を中断する）
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("client registration file not found at {0}")]
    MissingClientSecrets(PathBuf),

    #[error("invalid client registration file: {0}")]
    InvalidClientSecrets(String),

    #[error("authorization was not granted: {0}")]
    ConsentFailed(String),

    #[error("timed out waiting for the browser redirect")]
    ConsentTimeout,

    #[error("state parameter mismatch in authorization callback")]
    StateMismatch,

    #[error("authorization code exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("token cache error: {0}")]
    TokenCache(String),
}

/// 1回のチャンク送信で起きたエラー（リトライ対象）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("unexpected response: {0}")]
    Protocol(String),
}

impl From<std::io::Error> for TransferError {
    fn from(e: std::io::Error) -> Self {
        TransferError::Io(e.to_string())
    }
}

/// 1ファイルのアップロード失敗（そのファイルのみ失敗扱い）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("could not start upload of {path}: {source}")]
    Setup {
        path: PathBuf,
        #[source]
        source: TransferError,
    },

    #[error("upload failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: TransferError,
    },
}
