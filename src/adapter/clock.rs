//! Tokio-backed sleeper

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::services::pacing::Sleeper;

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
