//! Test doubles shared by the use case tests

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::entities::upload_request::{UploadProgress, UploadRequest, UploadResult};
use crate::domain::errors::TransferError;
use crate::domain::repositories::video_host::{ChunkOutcome, UploadSession, VideoHost};
use crate::domain::services::pacing::Sleeper;
use crate::domain::services::progress::ProgressObserver;

/// Host whose sessions fail a scripted number of times before succeeding
pub struct FakeHost {
    failures: HashMap<PathBuf, u32>,
    unopenable: HashSet<PathBuf>,
    chunks: u64,
    pub attempts: Arc<AtomicU32>,
}

impl FakeHost {
    pub fn new(chunks: u64) -> Self {
        Self {
            failures: HashMap::new(),
            unopenable: HashSet::new(),
            chunks,
            attempts: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn failing(mut self, path: impl Into<PathBuf>, times: u32) -> Self {
        self.failures.insert(path.into(), times);
        self
    }

    pub fn unopenable(mut self, path: impl Into<PathBuf>) -> Self {
        self.unopenable.insert(path.into());
        self
    }

    pub fn attempt_count(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

pub fn remote_id_for(path: &Path) -> String {
    format!(
        "vid-{}",
        path.file_stem().unwrap_or_default().to_string_lossy()
    )
}

#[async_trait]
impl VideoHost for FakeHost {
    async fn begin_upload(
        &self,
        request: &UploadRequest,
    ) -> Result<Box<dyn UploadSession>, TransferError> {
        let path = request.file_path();
        if self.unopenable.contains(path) {
            return Err(TransferError::Io("No such file or directory".to_string()));
        }
        Ok(Box::new(FakeSession {
            remote_id: remote_id_for(path),
            failures_left: self.failures.get(path).copied().unwrap_or(0),
            sent: 0,
            chunks: self.chunks,
            attempts: self.attempts.clone(),
        }))
    }
}

struct FakeSession {
    remote_id: String,
    failures_left: u32,
    sent: u64,
    chunks: u64,
    attempts: Arc<AtomicU32>,
}

#[async_trait]
impl UploadSession for FakeSession {
    async fn next_chunk(&mut self) -> Result<ChunkOutcome, TransferError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(TransferError::Http {
                status: 503,
                body: "backendError".to_string(),
            });
        }

        self.sent += 1;
        if self.sent >= self.chunks {
            Ok(ChunkOutcome::Complete(UploadResult::new(
                self.remote_id.clone(),
                "UC-test",
                "Test Channel",
            )))
        } else {
            Ok(ChunkOutcome::InProgress(UploadProgress::new(
                self.sent,
                self.chunks,
            )))
        }
    }
}

/// Sleeper that records requested durations instead of waiting
#[derive(Default)]
pub struct RecordingSleeper {
    calls: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn calls(&self) -> Vec<Duration> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.calls.lock().unwrap().push(duration);
    }
}

#[derive(Default)]
pub struct RecordingProgress {
    percents: Mutex<Vec<u8>>,
}

impl RecordingProgress {
    pub fn percents(&self) -> Vec<u8> {
        self.percents.lock().unwrap().clone()
    }
}

impl ProgressObserver for RecordingProgress {
    fn on_progress(&self, _file: &Path, progress: UploadProgress) {
        self.percents.lock().unwrap().push(progress.percent());
    }
}
