//! Workflow Orchestration
//!
//! ワークフローのオーケストレーション

use anyhow::{Context, Result};
use log::{info, warn};

use std::path::Path;
use std::sync::Arc;

use crate::adapter::auth::GoogleCredentialProvider;
use crate::adapter::clock::TokioSleeper;
use crate::adapter::config::Config;
use crate::adapter::repositories::file_video_repository::FileVideoRepository;
use crate::adapter::repositories::json_manifest_repository::JsonManifestRepository;
use crate::adapter::youtube::YouTubeClient;
use crate::application::use_cases::discover_videos::DiscoverVideosUseCase;
use crate::application::use_cases::publish_videos::PublishVideosUseCase;
use crate::application::use_cases::upload_video::UploadVideoUseCase;
use crate::domain::entities::upload_request::UploadProgress;
use crate::domain::repositories::credential_provider::CredentialProvider;
use crate::domain::repositories::manifest_repository::ManifestRepository;
use crate::domain::services::progress::ProgressObserver;

use super::cli::Args;
use super::prompt::{DialoguerPrompt, FixedAnswer, Prompt};

/// Prints chunk progress to the terminal
struct ConsoleProgress;

impl ProgressObserver for ConsoleProgress {
    fn on_progress(&self, _file: &Path, progress: UploadProgress) {
        println!("  Uploaded {}%", progress.percent());
    }
}

/// Video Publish Workflow
pub struct VideoPublishWorkflow {
    config: Config,
    discover_use_case: DiscoverVideosUseCase<FileVideoRepository>,
    manifest_repository: Arc<JsonManifestRepository>,
    prompt: Option<Box<dyn Prompt>>,
    credentials: Option<Arc<dyn CredentialProvider>>,
}

impl VideoPublishWorkflow {
    /// Create a new workflow instance with dependency injection
    pub fn new(config: Config) -> Self {
        let video_repo = Arc::new(FileVideoRepository::new(&config.video_extensions));
        let discover_use_case = DiscoverVideosUseCase::new(video_repo);

        Self {
            config,
            discover_use_case,
            manifest_repository: Arc::new(JsonManifestRepository::new()),
            prompt: None,
            credentials: None,
        }
    }

    /// Replace the interactive confirmation
    pub fn with_prompt(mut self, prompt: Box<dyn Prompt>) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Replace the Google OAuth provider built from the config
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    fn confirm(&self, args: &Args, question: &str) -> Result<bool> {
        if args.yes {
            return FixedAnswer(true).confirm(question);
        }
        match &self.prompt {
            Some(prompt) => prompt.confirm(question),
            None => DialoguerPrompt.confirm(question),
        }
    }

    /// Execute the publish workflow
    pub async fn execute(&self, args: Args) -> Result<()> {
        info!("Starting YouTube uploader...");
        info!("Dry run: {}", args.dry_run);

        let video_dir = self.config.video_dir();
        let manifest_path = self.config.manifest_path();

        println!("✓ Using configuration:");
        println!("  Videos: {}", video_dir.display());
        println!("  Manifest: {}", manifest_path.display());
        println!(
            "  Privacy: {} | Category: {}",
            self.config.privacy_status, self.config.category_id
        );
        let retry_policy = self.config.retry_policy();
        println!(
            "  Retries: up to {} attempts per file, {}s apart",
            retry_policy.max_attempts(),
            retry_policy.retry_delay.as_secs()
        );

        let files = self.discover_use_case.execute(&video_dir).await?;
        println!("✓ Found {} videos in {}", files.len(), video_dir.display());

        if files.is_empty() {
            println!("No videos to upload. Exiting.");
            return Ok(());
        }

        let settings = self.config.upload_settings();

        if args.dry_run {
            println!("✓ Dry-run mode (not actually uploading)");
            println!("  Would upload {} videos:", files.len());
            for file in &files {
                let request = settings.build_request(file);
                println!(
                    "    - {} | {} | {}",
                    file.display(),
                    request.title(),
                    request.privacy_status()
                );
            }
            return Ok(());
        }

        match self.manifest_repository.load(&manifest_path).await {
            Ok(Some(existing)) if !existing.is_empty() => println!(
                "⚠ {} already lists {} videos and will be overwritten",
                manifest_path.display(),
                existing.len()
            ),
            Ok(_) => {}
            Err(e) => warn!("Could not read existing manifest: {:#}", e),
        }

        let question = format!("Upload {} videos to YouTube?", files.len());
        if !self.confirm(&args, &question)? {
            println!("Upload cancelled.");
            return Ok(());
        }

        let credentials: Arc<dyn CredentialProvider> = match &self.credentials {
            Some(credentials) => credentials.clone(),
            None => Arc::new(GoogleCredentialProvider::from_config(
                &self.config,
                args.force_reauth,
            )),
        };

        let token = match credentials.authenticate().await {
            Ok(token) => token,
            Err(e) => {
                println!("✗ Failed to authenticate with YouTube: {}", e);
                println!("  Run again with --force-reauth to start a fresh authorization");
                return Err(e).context("Authentication failed");
            }
        };
        println!("✓ Authenticated with YouTube");

        let host = Arc::new(YouTubeClient::new(token, self.config.chunk_size)?);
        let sleeper = Arc::new(TokioSleeper);
        let upload_use_case = UploadVideoUseCase::new(
            host,
            sleeper.clone(),
            Arc::new(ConsoleProgress),
            retry_policy,
        );
        let publish_use_case = PublishVideosUseCase::new(
            upload_use_case,
            self.manifest_repository.clone(),
            sleeper,
            self.config.inter_file_delay(),
        );

        let summary = publish_use_case
            .execute(&files, &settings, &manifest_path)
            .await?;

        println!(
            "✓ Uploaded {} videos ({} failed)",
            summary.uploaded_count(),
            summary.failed_count()
        );
        for failure in &summary.failures {
            println!("  ✗ {}: {}", failure.path.display(), failure.error);
        }
        println!("✓ Video information saved to {}", manifest_path.display());

        Ok(())
    }
}
