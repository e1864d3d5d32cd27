//! Token Cache
//!
//! 取得したトークンをローカルファイル（JSON）にキャッシュする

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::domain::errors::AuthError;

/// Tokens are treated as expired this long before their real expiry
pub const EXPIRY_SKEW_SECS: i64 = 60;

/// キャッシュされたトークン
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CachedToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl CachedToken {
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(EXPIRY_SKEW_SECS) > now
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Whether the cached grant covers every requested scope
    pub fn covers(&self, scopes: &[String]) -> bool {
        scopes.iter().all(|s| self.scopes.contains(s))
    }
}

/// トークンキャッシュファイル
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached token. A missing or unreadable cache is treated as empty.
    pub fn load(&self) -> Option<CachedToken> {
        if !self.path.exists() {
            return None;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Could not read token cache {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(token) => Some(token),
            Err(e) => {
                warn!("Ignoring corrupt token cache {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, token: &CachedToken) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| AuthError::TokenCache(e.to_string()))?;
            }
        }

        let json = serde_json::to_string_pretty(token)
            .map_err(|e| AuthError::TokenCache(e.to_string()))?;
        let mut file =
            open_private(&self.path).map_err(|e| AuthError::TokenCache(e.to_string()))?;
        file.write_all(json.as_bytes())
            .map_err(|e| AuthError::TokenCache(e.to_string()))?;

        info!("Saved credentials to {}", self.path.display());
        Ok(())
    }

    /// Delete the cache file if present
    pub fn clear(&self) -> Result<bool, AuthError> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path).map_err(|e| AuthError::TokenCache(e.to_string()))?;
        Ok(true)
    }
}

/// Open for writing with owner-only access, also when the file already exists
fn open_private(path: &Path) -> io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let file = options.open(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    Ok(file)
}
