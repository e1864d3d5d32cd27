//! # Progress Observer
//!
//! アップロード進捗の通知先

use std::path::Path;

use crate::domain::entities::upload_request::UploadProgress;

/// Receives incremental progress. Purely a side channel.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, file: &Path, progress: UploadProgress);
}

/// Observer that discards every notification
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn on_progress(&self, _file: &Path, _progress: UploadProgress) {}
}
