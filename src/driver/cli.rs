//! CLI Argument Parsing
//!
//! CLIの引数解析

use clap::Parser;

/// 動画をYouTubeにアップロードし、ビューア用のマニフェストを書き出すCLI
#[derive(Parser, Debug, Clone)]
#[command(name = "tubelift")]
#[command(
    about = "Upload local videos to YouTube and write a JSON manifest for the viewer",
    long_about = None
)]
pub struct Args {
    /// Config file path
    #[arg(short, long, default_value = "./tubelift.json")]
    pub config: String,

    /// Discard cached credentials and run the consent flow again
    #[arg(long)]
    pub force_reauth: bool,

    /// List what would be uploaded without authenticating or uploading
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}
