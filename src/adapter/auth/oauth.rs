//! OAuth 2.0 Authorization Code Flow with PKCE
//!
//! 認可URLの生成、認可コードとトークンの交換、トークンの更新

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use url::Url;

use crate::adapter::auth::client_secrets::ClientSecrets;
use crate::adapter::auth::token_cache::CachedToken;
use crate::domain::errors::AuthError;

/// Lifetime assumed when the token endpoint omits `expires_in`
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// PKCE verifier and CSRF state for one consent round
#[derive(Debug, Clone)]
pub struct PkceVerifier {
    verifier: String,
    state: String,
}

impl PkceVerifier {
    pub fn new() -> Self {
        // 64 hex chars, inside the 43..=128 range RFC 7636 allows
        let verifier = format!(
            "{}{}",
            uuid::Uuid::new_v4().simple(),
            uuid::Uuid::new_v4().simple()
        );
        let state = uuid::Uuid::new_v4().simple().to_string();
        Self { verifier, state }
    }

    pub fn verifier(&self) -> &str {
        &self.verifier
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    /// S256: BASE64URL(SHA256(code_verifier))
    pub fn challenge(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.verifier.as_bytes());
        URL_SAFE_NO_PAD.encode(hasher.finalize())
    }
}

impl Default for PkceVerifier {
    fn default() -> Self {
        Self::new()
    }
}

/// トークンエンドポイントのレスポンス
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Convert into a cache record. `fallback_refresh` is kept when the
    /// response carries no new refresh token.
    pub fn into_cached(
        self,
        now: DateTime<Utc>,
        requested_scopes: &[String],
        fallback_refresh: Option<String>,
    ) -> CachedToken {
        let expires_in = self.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
        let scopes = match self.scope {
            Some(scope) => scope.split_whitespace().map(str::to_string).collect(),
            None => requested_scopes.to_vec(),
        };

        CachedToken {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(fallback_refresh),
            expires_at: now + Duration::seconds(expires_in),
            scopes,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Turn a non-success token endpoint response into a readable message
fn describe_token_error(status: u16, body: &str) -> String {
    match serde_json::from_str::<TokenErrorResponse>(body) {
        Ok(err) => match err.error_description {
            Some(description) => format!("{} ({}): {}", err.error, status, description),
            None => format!("{} ({})", err.error, status),
        },
        Err(_) => format!("HTTP {}: {}", status, body),
    }
}

/// OAuth client bound to one registration
pub struct OAuthClient {
    secrets: ClientSecrets,
    http: reqwest::Client,
}

impl OAuthClient {
    pub fn new(secrets: ClientSecrets, http: reqwest::Client) -> Self {
        Self { secrets, http }
    }

    /// ブラウザで開く認可URLを生成
    ///
    /// # Arguments
    ///
    /// * `redirect_uri` - ループバックのコールバックURL
    /// * `scopes` - 要求するスコープ
    /// * `pkce` - このラウンドのPKCE検証子
    /// * `login_hint` - 使用するアカウントのヒント
    ///
    /// # Errors
    ///
    /// 登録ファイルの `auth_uri` がURLとして不正な場合
    pub fn authorization_url(
        &self,
        redirect_uri: &str,
        scopes: &[String],
        pkce: &PkceVerifier,
        login_hint: Option<&str>,
    ) -> Result<Url, AuthError> {
        let mut url = Url::parse(&self.secrets.auth_uri)
            .map_err(|e| AuthError::InvalidClientSecrets(format!("auth_uri: {}", e)))?;

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", &self.secrets.client_id)
                .append_pair("redirect_uri", redirect_uri)
                .append_pair("scope", &scopes.join(" "))
                .append_pair("state", pkce.state())
                .append_pair("code_challenge", &pkce.challenge())
                .append_pair("code_challenge_method", "S256")
                .append_pair("access_type", "offline")
                .append_pair("prompt", "consent");
            if let Some(hint) = login_hint {
                query.append_pair("login_hint", hint);
            }
        }

        Ok(url)
    }

    /// 認可コードをトークンと交換
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
        pkce: &PkceVerifier,
        scopes: &[String],
    ) -> Result<CachedToken, AuthError> {
        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", self.secrets.client_id.as_str()),
            ("code_verifier", pkce.verifier()),
        ];
        if let Some(secret) = self.secrets.client_secret.as_deref() {
            form.push(("client_secret", secret));
        }

        let response = self
            .post_token(&form)
            .await
            .map_err(AuthError::ExchangeFailed)?;

        info!("Authorization code exchanged for tokens");
        Ok(response.into_cached(Utc::now(), scopes, None))
    }

    /// リフレッシュトークンで新しいアクセストークンを取得
    ///
    /// 応答に新しいリフレッシュトークンが無い場合は既存のものを保持する
    pub async fn refresh(&self, token: &CachedToken) -> Result<CachedToken, AuthError> {
        let refresh_token = token
            .refresh_token
            .clone()
            .ok_or_else(|| AuthError::RefreshFailed("no refresh token cached".to_string()))?;

        let mut form = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.as_str()),
            ("client_id", self.secrets.client_id.as_str()),
        ];
        if let Some(secret) = self.secrets.client_secret.as_deref() {
            form.push(("client_secret", secret));
        }

        let response = self
            .post_token(&form)
            .await
            .map_err(AuthError::RefreshFailed)?;

        info!("Access token refreshed");
        Ok(response.into_cached(Utc::now(), &token.scopes, Some(refresh_token)))
    }

    async fn post_token(&self, form: &[(&str, &str)]) -> Result<TokenResponse, String> {
        debug!("POST {}", self.secrets.token_uri);

        let response = self
            .http
            .post(&self.secrets.token_uri)
            .form(form)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let body = response.text().await.map_err(|e| e.to_string())?;

        if !status.is_success() {
            return Err(describe_token_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| format!("invalid token response: {}", e))
    }
}
