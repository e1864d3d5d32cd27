//! Confirmation Prompt
//!
//! アップロード開始前の確認

use anyhow::{Context, Result};
use dialoguer::Confirm;

/// 確認プロンプト
pub trait Prompt: Send + Sync {
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// ターミナルでの対話的な確認
pub struct DialoguerPrompt;

impl Prompt for DialoguerPrompt {
    fn confirm(&self, question: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
            .context("Failed to read confirmation")
    }
}

/// Answers every question the same way (`--yes`, tests)
pub struct FixedAnswer(pub bool);

impl Prompt for FixedAnswer {
    fn confirm(&self, _question: &str) -> Result<bool> {
        Ok(self.0)
    }
}
