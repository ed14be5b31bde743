/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Object-storage backend interface.
//!
//! The orchestrator is polymorphic over the backend: anything that can
//! initiate a multipart upload, accept parts, and commit or abort the
//! session can be plugged in through [`StorageClient`].

use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;
use thiserror::Error;

use crate::types::PartRecord;

pub mod s3;

/// Storage backend errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend rejected or failed a call.
    #[error("backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The backend returned a response missing data the protocol requires
    /// (e.g. no upload id on initiation, no integrity tag for a part).
    #[error("invalid backend response: {0}")]
    InvalidResponse(String),

    /// Client-side configuration problem.
    #[error("configuration error: {0}")]
    Config(String),

    /// A storage call did not resolve within the configured deadline.
    #[error("storage call timed out after {0:?}")]
    TimedOut(Duration),
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// A multipart-capable object-storage backend.
///
/// All calls are independent and carry the full set of identifiers they
/// need, so one client may be shared across concurrent upload sessions
/// without additional locking.
#[async_trait]
pub trait StorageClient: Send + Sync + 'static {
    /// Start a new multipart upload for `(bucket, key)`.
    ///
    /// Returns the backend-issued upload id that scopes every subsequent
    /// part, complete, and abort call for this session.
    async fn initiate_upload(&self, bucket: &str, key: &str) -> StorageResult<String>;

    /// Upload a single part and return its backend-issued integrity tag.
    ///
    /// `part_number` is 1-based. The tag must be supplied verbatim to
    /// [`complete_upload`](StorageClient::complete_upload).
    async fn upload_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: u64,
        body: Bytes,
    ) -> StorageResult<String>;

    /// Commit the upload, stitching the given parts into one object.
    ///
    /// `parts` must be ordered by ascending part number; backends may
    /// reject anything else.
    async fn complete_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: &[PartRecord],
    ) -> StorageResult<()>;

    /// Abort the upload, discarding any parts uploaded so far.
    async fn abort_upload(&self, bucket: &str, key: &str, upload_id: &str) -> StorageResult<()>;
}
