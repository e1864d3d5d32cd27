//! Adapter Layer
//!
//! 外部システム（YouTube Data API, Google OAuth, ファイルシステム）との統合

pub mod auth;
pub mod clock;
pub mod config;
pub mod repositories;
pub mod youtube;

#[cfg(test)]
pub(crate) mod test_http;
