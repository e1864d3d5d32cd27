//! # Video Host Trait
//!
//! 動画ホスティング API への再開可能アップロードを抽象化

use async_trait::async_trait;

use crate::domain::entities::upload_request::{UploadProgress, UploadRequest, UploadResult};
use crate::domain::errors::TransferError;

/// Result of a single chunk step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChunkOutcome {
    /// The platform accepted the chunk and more bytes remain
    InProgress(UploadProgress),
    /// The platform reported completion and returned the video resource
    Complete(UploadResult),
}

/// One resumable upload in flight.
///
/// The first call to `next_chunk` performs the initiating request carrying
/// all metadata; each later call sends the next chunk from the last offset
/// the platform confirmed. A failed call leaves the offset untouched, so
/// calling again retries the same step.
#[async_trait]
pub trait UploadSession: Send {
    async fn next_chunk(&mut self) -> Result<ChunkOutcome, TransferError>;
}

/// Factory for upload sessions against an authenticated platform handle
#[async_trait]
pub trait VideoHost: Send + Sync {
    /// Prepare an upload for `request`. Fails if the file cannot be opened.
    async fn begin_upload(
        &self,
        request: &UploadRequest,
    ) -> Result<Box<dyn UploadSession>, TransferError>;
}
