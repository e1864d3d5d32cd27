//! OAuth Client Registration
//!
//! Google Cloud Console からダウンロードしたクライアント登録ファイルの読み込み

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::domain::errors::AuthError;

pub const GOOGLE_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// OAuth client registration (installed or web application)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    GOOGLE_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

#[derive(Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Load from a `client_secret_*.json` file
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        if !path.exists() {
            return Err(AuthError::MissingClientSecrets(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| AuthError::InvalidClientSecrets(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, AuthError> {
        let file: ClientSecretsFile = serde_json::from_str(content)
            .map_err(|e| AuthError::InvalidClientSecrets(e.to_string()))?;

        file.installed.or(file.web).ok_or_else(|| {
            AuthError::InvalidClientSecrets(
                "expected an \"installed\" or \"web\" client section".to_string(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_installed_client() {
        let json = r#"{
            "installed": {
                "client_id": "123.apps.googleusercontent.com",
                "project_id": "viewer",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token",
                "client_secret": "shh",
                "redirect_uris": ["http://localhost"]
            }
        }"#;

        let secrets = ClientSecrets::parse(json).unwrap();

        assert_eq!(secrets.client_id, "123.apps.googleusercontent.com");
        assert_eq!(secrets.client_secret.as_deref(), Some("shh"));
        assert_eq!(secrets.token_uri, GOOGLE_TOKEN_URI);
    }

    #[test]
    fn test_parse_web_client_with_defaults() {
        let json = r#"{"web": {"client_id": "web-id"}}"#;

        let secrets = ClientSecrets::parse(json).unwrap();

        assert_eq!(secrets.client_id, "web-id");
        assert!(secrets.client_secret.is_none());
        assert_eq!(secrets.auth_uri, GOOGLE_AUTH_URI);
        assert_eq!(secrets.token_uri, GOOGLE_TOKEN_URI);
    }

    #[test]
    fn test_parse_without_client_section() {
        let result = ClientSecrets::parse(r#"{"other": {}}"#);
        assert!(matches!(result, Err(AuthError::InvalidClientSecrets(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ClientSecrets::load(Path::new("/nonexistent/client_secret.json"));
        assert!(matches!(result, Err(AuthError::MissingClientSecrets(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"installed": {"client_id": "abc", "client_secret": "xyz"}}"#)
            .unwrap();

        let secrets = ClientSecrets::load(file.path()).unwrap();
        assert_eq!(secrets.client_id, "abc");
    }
}
