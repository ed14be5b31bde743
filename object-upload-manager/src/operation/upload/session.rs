/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::types::PartRecord;

/// Lifecycle of one multipart upload session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionState {
    Initiated,
    InProgress,
    Completed,
    Aborted,
    Failed,
}

impl SessionState {
    pub(crate) fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Aborted | SessionState::Failed
        )
    }
}

/// One in-progress multipart upload.
///
/// The session owns the backend-issued upload id for its whole lifetime
/// and is mutated by exactly one upload driver. Parts are recorded in
/// upload order; insertion order, upload order, and the final commit
/// order are all the same thing.
#[derive(Debug)]
pub(crate) struct UploadSession {
    bucket: String,
    key: String,
    upload_id: Option<String>,
    total_length: u64,
    parts: Vec<PartRecord>,
    bytes_sent: u64,
    state: SessionState,
}

impl UploadSession {
    pub(crate) fn new(bucket: String, key: String, total_length: u64) -> Self {
        Self {
            bucket,
            key,
            upload_id: None,
            total_length,
            parts: Vec::new(),
            bytes_sent: 0,
            state: SessionState::Initiated,
        }
    }

    pub(crate) fn bucket(&self) -> &str {
        &self.bucket
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }

    /// The backend-issued upload id. Only valid after [`start`](Self::start).
    pub(crate) fn upload_id(&self) -> &str {
        self.upload_id.as_deref().expect("upload id set")
    }

    pub(crate) fn parts(&self) -> &[PartRecord] {
        &self.parts
    }

    pub(crate) fn part_count(&self) -> u64 {
        self.parts.len() as u64
    }

    pub(crate) fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    pub(crate) fn state(&self) -> SessionState {
        self.state
    }

    /// Record the upload id returned by the backend on initiation.
    ///
    /// The id is assigned exactly once for the session's lifetime.
    pub(crate) fn start(&mut self, upload_id: String) {
        assert!(self.upload_id.is_none(), "upload id already assigned");
        assert_eq!(self.state, SessionState::Initiated);
        self.upload_id = Some(upload_id);
        self.state = SessionState::InProgress;
    }

    /// Record one successfully uploaded part.
    ///
    /// Part numbers must arrive contiguously starting at 1.
    pub(crate) fn record_part(&mut self, part_number: u64, integrity_tag: String, byte_length: u64) {
        assert_eq!(self.state, SessionState::InProgress);
        assert_eq!(
            part_number,
            self.parts.len() as u64 + 1,
            "parts must be recorded in order with no gaps"
        );
        self.parts
            .push(PartRecord::new(part_number, integrity_tag, byte_length));
        self.bytes_sent += byte_length;
    }

    /// Transition to `Completed`. Every byte of the input must have been
    /// sent and recorded.
    pub(crate) fn complete(&mut self) {
        assert_eq!(self.state, SessionState::InProgress);
        assert_eq!(self.bytes_sent, self.total_length);
        self.state = SessionState::Completed;
    }

    /// Transition to `Aborted`; recorded parts are discarded in full.
    pub(crate) fn abort(&mut self) {
        assert!(!self.state.is_terminal());
        self.parts.clear();
        self.state = SessionState::Aborted;
    }

    /// Transition to `Failed` (commit was rejected after all parts
    /// succeeded; nothing further is unwound).
    pub(crate) fn fail(&mut self) {
        assert!(!self.state.is_terminal());
        self.state = SessionState::Failed;
    }
}
