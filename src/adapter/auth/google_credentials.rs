//! Google Credential Provider
//!
//! CredentialProviderのGoogle OAuth実装（キャッシュ → 更新 → 同意フロー）

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use url::Url;

use crate::adapter::auth::callback::CallbackListener;
use crate::adapter::auth::client_secrets::ClientSecrets;
use crate::adapter::auth::oauth::{OAuthClient, PkceVerifier};
use crate::adapter::auth::token_cache::{CachedToken, TokenCache};
use crate::adapter::config::{Config, YOUTUBE_UPLOAD_SCOPE};
use crate::domain::errors::AuthError;
use crate::domain::repositories::credential_provider::{AccessToken, CredentialProvider};

/// Shows the consent URL to the operator
pub type ConsentPresenter = Arc<dyn Fn(&Url) + Send + Sync>;

/// Print the consent URL and try the platform's browser opener
pub fn present_in_terminal(url: &Url) {
    println!("\nOpen this URL in your browser to authorize uploads:\n");
    println!("  {}\n", url);

    let opener = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    };

    if let Err(e) = Command::new(opener)
        .arg(url.as_str())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        warn!("Could not launch a browser ({}): {}", opener, e);
    }
}

/// Google OAuth 認証プロバイダ
pub struct GoogleCredentialProvider {
    client_secret_path: PathBuf,
    cache: TokenCache,
    scopes: Vec<String>,
    account_hint: Option<String>,
    consent_timeout: Duration,
    force_reauth: AtomicBool,
    http: reqwest::Client,
    presenter: ConsentPresenter,
}

impl GoogleCredentialProvider {
    pub fn new(
        client_secret_path: PathBuf,
        cache: TokenCache,
        scopes: Vec<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            client_secret_path,
            cache,
            scopes,
            account_hint: None,
            consent_timeout: Duration::from_secs(300),
            force_reauth: AtomicBool::new(false),
            http,
            presenter: Arc::new(present_in_terminal),
        }
    }

    /// 設定ファイルから作成
    pub fn from_config(config: &Config, force_reauth: bool) -> Self {
        Self::new(
            config.client_secret_path(),
            TokenCache::new(config.token_cache_path()),
            vec![YOUTUBE_UPLOAD_SCOPE.to_string()],
            reqwest::Client::new(),
        )
        .with_account_hint(config.account_hint.clone())
        .with_consent_timeout(config.consent_timeout())
        .with_force_reauth(force_reauth)
    }

    pub fn with_account_hint(mut self, hint: Option<String>) -> Self {
        self.account_hint = hint;
        self
    }

    pub fn with_consent_timeout(mut self, timeout: Duration) -> Self {
        self.consent_timeout = timeout;
        self
    }

    /// 初回の認証時にトークンキャッシュを破棄する
    pub fn with_force_reauth(self, force: bool) -> Self {
        self.force_reauth.store(force, Ordering::SeqCst);
        self
    }

    pub fn with_presenter(mut self, presenter: ConsentPresenter) -> Self {
        self.presenter = presenter;
        self
    }

    fn load_usable_cache(&self) -> Result<Option<CachedToken>, AuthError> {
        if self.force_reauth.swap(false, Ordering::SeqCst) && self.cache.clear()? {
            println!("Removed cached credentials to force new authentication");
        }

        Ok(self.cache.load().filter(|token| {
            let covers = token.covers(&self.scopes);
            if !covers {
                info!("Cached token does not cover the requested scopes");
            }
            covers
        }))
    }

    async fn run_consent_flow(&self, client: &OAuthClient) -> Result<CachedToken, AuthError> {
        println!("No valid credentials found. Starting the authorization flow.");

        let mut listener = CallbackListener::bind().await?;
        let pkce = PkceVerifier::new();
        let url = client.authorization_url(
            listener.redirect_uri(),
            &self.scopes,
            &pkce,
            self.account_hint.as_deref(),
        )?;

        (self.presenter)(&url);

        let code = listener
            .wait_for_code(pkce.state(), self.consent_timeout)
            .await?;
        client
            .exchange_code(&code, listener.redirect_uri(), &pkce, &self.scopes)
            .await
    }
}

#[async_trait]
impl CredentialProvider for GoogleCredentialProvider {
    async fn authenticate(&self) -> Result<AccessToken, AuthError> {
        let cached = self.load_usable_cache()?;

        if let Some(token) = &cached {
            if token.is_valid(Utc::now()) {
                info!("Using cached credentials from {}", self.cache.path().display());
                return Ok(AccessToken::new(token.access_token.clone()));
            }
        }

        let secrets = ClientSecrets::load(&self.client_secret_path)?;
        let client = OAuthClient::new(secrets, self.http.clone());

        let token = match cached.filter(CachedToken::can_refresh) {
            Some(expired) => {
                println!("Refreshing expired credentials");
                client.refresh(&expired).await?
            }
            None => self.run_consent_flow(&client).await?,
        };

        self.cache.save(&token)?;
        Ok(AccessToken::new(token.access_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::test_http::{test_http_client, ScriptedResponse, ScriptedServer};
    use chrono::Duration as ChronoDuration;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    const SCOPE: &str = "https://www.googleapis.com/auth/youtube.upload";

    fn write_secrets(dir: &TempDir, token_uri: &str) -> PathBuf {
        let path = dir.path().join("client_secret.json");
        let content = json!({
            "installed": {
                "client_id": "client-123",
                "client_secret": "secret-456",
                "auth_uri": "https://accounts.example.com/o/oauth2/auth",
                "token_uri": token_uri
            }
        });
        fs::write(&path, content.to_string()).unwrap();
        path
    }

    fn cached(access: &str, refresh: Option<&str>, minutes_left: i64) -> CachedToken {
        CachedToken {
            access_token: access.to_string(),
            refresh_token: refresh.map(str::to_string),
            expires_at: Utc::now() + ChronoDuration::minutes(minutes_left),
            scopes: vec![SCOPE.to_string()],
        }
    }

    fn provider(dir: &TempDir, secrets: PathBuf) -> GoogleCredentialProvider {
        GoogleCredentialProvider::new(
            secrets,
            TokenCache::new(dir.path().join("token.json")),
            vec![SCOPE.to_string()],
            test_http_client(),
        )
        .with_presenter(Arc::new(|url: &Url| panic!("unexpected consent prompt: {}", url)))
    }

    #[tokio::test]
    async fn test_valid_cache_needs_no_client_registration() {
        let temp_dir = TempDir::new().unwrap();
        let provider = provider(&temp_dir, temp_dir.path().join("missing.json"));
        provider.cache.save(&cached("ya29.cached", None, 30)).unwrap();

        let token = provider.authenticate().await.unwrap();

        assert_eq!(token.secret(), "ya29.cached");
    }

    #[tokio::test]
    async fn test_missing_registration_without_cache() {
        let temp_dir = TempDir::new().unwrap();
        let provider = provider(&temp_dir, temp_dir.path().join("missing.json"));

        let result = provider.authenticate().await;

        assert!(matches!(result, Err(AuthError::MissingClientSecrets(_))));
    }

    #[tokio::test]
    async fn test_expired_cache_is_refreshed_and_saved() {
        let temp_dir = TempDir::new().unwrap();
        let mut server = ScriptedServer::bind().await;
        server.serve(vec![ScriptedResponse::new(200).json(json!({
            "access_token": "ya29.refreshed",
            "expires_in": 3599
        }))]);
        let secrets = write_secrets(&temp_dir, &server.url("/token"));
        let provider = provider(&temp_dir, secrets);
        provider
            .cache
            .save(&cached("ya29.stale", Some("1//refresh"), -5))
            .unwrap();

        let token = provider.authenticate().await.unwrap();

        assert_eq!(token.secret(), "ya29.refreshed");
        let saved = provider.cache.load().unwrap();
        assert_eq!(saved.access_token, "ya29.refreshed");
        assert_eq!(saved.refresh_token.as_deref(), Some("1//refresh"));
    }

    #[tokio::test]
    async fn test_refresh_failure_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let mut server = ScriptedServer::bind().await;
        server.serve(vec![
            ScriptedResponse::new(400).json(json!({"error": "invalid_grant"}))
        ]);
        let secrets = write_secrets(&temp_dir, &server.url("/token"));
        let provider = provider(&temp_dir, secrets);
        provider
            .cache
            .save(&cached("ya29.stale", Some("1//revoked"), -5))
            .unwrap();

        let result = provider.authenticate().await;

        assert!(matches!(result, Err(AuthError::RefreshFailed(_))));
    }

    #[tokio::test]
    async fn test_force_reauth_clears_cache() {
        let temp_dir = TempDir::new().unwrap();
        let provider =
            provider(&temp_dir, temp_dir.path().join("missing.json")).with_force_reauth(true);
        provider.cache.save(&cached("ya29.cached", None, 30)).unwrap();

        let result = provider.authenticate().await;

        assert!(matches!(result, Err(AuthError::MissingClientSecrets(_))));
        assert!(!provider.cache.path().exists());
    }

    #[tokio::test]
    async fn test_consent_flow_exchanges_code() {
        let temp_dir = TempDir::new().unwrap();
        let mut server = ScriptedServer::bind().await;
        server.serve(vec![ScriptedResponse::new(200).json(json!({
            "access_token": "ya29.fresh",
            "expires_in": 3599,
            "refresh_token": "1//fresh",
            "scope": SCOPE
        }))]);
        let secrets = write_secrets(&temp_dir, &server.url("/token"));

        // Stand-in browser: follow the redirect with the state from the consent URL
        let browser: ConsentPresenter = Arc::new(|url: &Url| {
            let pairs: std::collections::HashMap<String, String> = url
                .query_pairs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            let redirect = format!(
                "{}?code=granted-code&state={}",
                pairs["redirect_uri"], pairs["state"]
            );
            tokio::spawn(async move {
                test_http_client().get(&redirect).send().await.ok();
            });
        });
        let provider = provider(&temp_dir, secrets)
            .with_account_hint(Some("me@example.com".to_string()))
            .with_presenter(browser);

        let token = provider.authenticate().await.unwrap();

        assert_eq!(token.secret(), "ya29.fresh");
        assert_eq!(
            provider.cache.load().unwrap().refresh_token.as_deref(),
            Some("1//fresh")
        );

        let body = server.requests()[0].body_text();
        assert!(body.contains("code=granted-code"));
        assert!(body.contains("grant_type=authorization_code"));
    }

    #[tokio::test]
    async fn test_cache_with_other_scopes_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let provider = provider(&temp_dir, temp_dir.path().join("missing.json"));
        let mut token = cached("ya29.readonly", None, 30);
        token.scopes = vec!["https://www.googleapis.com/auth/youtube.readonly".to_string()];
        provider.cache.save(&token).unwrap();

        let result = provider.authenticate().await;

        assert!(matches!(result, Err(AuthError::MissingClientSecrets(_))));
    }
}
