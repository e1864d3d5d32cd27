//! Tubelift - YouTube Video Uploader
//!
//! 動画をアップロードし、ビューア用のマニフェストを書き出す

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use anyhow::Result;
use clap::Parser;

use tubelift::adapter::config::Config;
use tubelift::driver::{Args, VideoPublishWorkflow};

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    // Create workflow with injected dependencies
    let workflow = VideoPublishWorkflow::new(config);

    workflow.execute(args).await
}
