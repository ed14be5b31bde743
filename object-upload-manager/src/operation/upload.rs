/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Operation builders
pub mod builders;

mod input;
mod output;
pub(crate) mod session;

pub use input::{UploadInput, UploadInputBuilder};
pub use output::UploadOutput;

use crate::client::Handle;
use crate::error::{self, UploadError};
use crate::io::part_reader;
use crate::storage::{StorageClient, StorageError, StorageResult};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use session::{SessionState, UploadSession};

/// Single object upload driven to completion as one all-or-nothing
/// multipart session.
#[derive(Debug)]
pub(crate) struct Upload;

impl Upload {
    /// Execute a single `Upload` transfer operation
    pub(crate) async fn orchestrate(
        handle: Arc<Handle>,
        mut input: UploadInput,
    ) -> Result<UploadOutput, UploadError> {
        let bucket = input
            .bucket()
            .filter(|b| !b.is_empty())
            .ok_or_else(|| error::invalid_input("bucket is required"))?
            .to_string();
        let key = input
            .key()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| error::invalid_input("key is required"))?
            .to_string();

        let stream = input.take_body();
        let total_length = stream
            .size_hint()
            .upper()
            .ok_or_else(|| error::invalid_input("input must have a known total length"))?;

        // Rejected before any storage call; no session exists to clean up.
        if total_length == 0 {
            return Err(error::empty_input());
        }

        let part_size = handle.upload_part_size_bytes();
        let timeout = handle.operation_timeout();
        let storage = handle.config.storage_client().clone();

        let mut session = UploadSession::new(bucket, key, total_length);
        tracing::debug!(
            bucket = session.bucket(),
            key = session.key(),
            total_length,
            part_size,
            "initiating multipart upload"
        );

        let upload_id = timed(
            timeout,
            storage.initiate_upload(session.bucket(), session.key()),
        )
        .await
        .map_err(error::initiation_failed)?;
        session.start(upload_id);
        tracing::debug!(upload_id = session.upload_id(), "multipart upload initiated");

        let mut reader = part_reader::Builder::new()
            .stream(stream)
            .part_size(part_size as usize)
            .build();

        loop {
            let part = match reader.next_part().await {
                Ok(Some(part)) => part,
                Ok(None) => break,
                Err(err) => {
                    return Err(unwind(&storage, timeout, &mut session, error::stream_read_failed(err)).await)
                }
            };
            let part_number = part.part_number();
            let byte_length = part.data().len() as u64;
            tracing::trace!(part_number, byte_length, "uploading part");

            let body = part.data().clone();
            let integrity_tag = match timed(
                timeout,
                storage.upload_part(
                    session.bucket(),
                    session.key(),
                    session.upload_id(),
                    part_number,
                    body,
                ),
            )
            .await
            {
                Ok(tag) => tag,
                Err(err) => {
                    return Err(
                        unwind(&storage, timeout, &mut session, error::part_failed(part_number, err))
                            .await,
                    )
                }
            };
            session.record_part(part_number, integrity_tag, byte_length);
        }

        debug_assert_eq!(session.state(), SessionState::InProgress);
        debug_assert_eq!(session.bytes_sent(), total_length);
        match timed(
            timeout,
            storage.complete_upload(
                session.bucket(),
                session.key(),
                session.upload_id(),
                session.parts(),
            ),
        )
        .await
        {
            Ok(()) => {
                let output = UploadOutput {
                    upload_id: session.upload_id().to_string(),
                    part_count: session.part_count(),
                    total_length,
                };
                session.complete();
                tracing::debug!(
                    upload_id = output.upload_id(),
                    part_count = output.part_count(),
                    "multipart upload completed"
                );
                Ok(output)
            }
            // A rejected commit leaves the session in the backend's hands;
            // parts already succeeded so nothing is unwound here.
            Err(err) => {
                session.fail();
                Err(error::commit_failed(err))
            }
        }
    }
}

/// Run a storage call under the configured per-call deadline, if any.
async fn timed<F, T>(timeout: Option<Duration>, operation: F) -> StorageResult<T>
where
    F: Future<Output = StorageResult<T>>,
{
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, operation).await {
            Ok(result) => result,
            Err(_) => Err(StorageError::TimedOut(limit)),
        },
        None => operation.await,
    }
}

/// Best-effort abort of a session after a mid-transfer failure.
///
/// The original error is always what the caller gets back; an abort
/// failure is attached to it, never substituted for it.
async fn unwind(
    storage: &Arc<dyn StorageClient>,
    timeout: Option<Duration>,
    session: &mut UploadSession,
    err: UploadError,
) -> UploadError {
    tracing::warn!(
        upload_id = session.upload_id(),
        error = %err,
        "aborting multipart upload"
    );
    let abort = timed(
        timeout,
        storage.abort_upload(session.bucket(), session.key(), session.upload_id()),
    )
    .await;
    let upload_id = session.upload_id().to_string();
    session.abort();
    match abort {
        Ok(()) => err,
        Err(abort_err) => {
            tracing::warn!(upload_id, error = %abort_err, "abort of multipart upload failed");
            err.with_abort_failure(abort_err)
        }
    }
}
