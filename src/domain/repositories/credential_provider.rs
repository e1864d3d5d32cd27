//! # Credential Provider Trait
//!
//! 認証済みハンドル（アクセストークン）の取得を抽象化

use std::fmt;

use async_trait::async_trait;

use crate::domain::errors::AuthError;

/// Bearer token for the hosting API. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// 認証プロバイダ
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// 有効なアクセストークンを返す
    ///
    /// # Errors
    ///
    /// クライアント登録ファイルが無い、同意フローの失敗、
    /// トークン更新の失敗などの場合に `AuthError` を返す
    async fn authenticate(&self) -> Result<AccessToken, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_debug_is_redacted() {
        let token = AccessToken::new("ya29.secret");
        assert_eq!(format!("{:?}", token), "AccessToken(***)");
        assert_eq!(token.secret(), "ya29.secret");
    }
}
