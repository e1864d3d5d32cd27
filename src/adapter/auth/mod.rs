//! Authentication Module
//!
//! Google OAuth 2.0 による認証（トークンキャッシュ付き）

pub mod callback;
pub mod client_secrets;
pub mod google_credentials;
pub mod oauth;
pub mod token_cache;

pub use google_credentials::GoogleCredentialProvider;
