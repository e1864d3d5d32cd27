//! # Pacing
//!
//! 待機処理の抽象化（テストでは実時間を使わない）

use std::time::Duration;

use async_trait::async_trait;

pub const DEFAULT_INTER_FILE_DELAY: Duration = Duration::from_secs(2);

/// Blocking-style wait used for retry backoff and rate limiting
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
