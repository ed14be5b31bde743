/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::fmt;

/// A boxed error that is `Send` and `Sync`.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by this library
///
/// An upload failure carries the phase it failed in as its [`ErrorKind`]
/// and the underlying cause as its source. When the failure triggered a
/// best-effort abort of the session and that abort itself failed, the
/// abort failure is attached via [`UploadError::abort_failure`] — it never
/// replaces the original error.
#[derive(Debug)]
pub struct UploadError {
    kind: ErrorKind,
    source: BoxError,
    abort_failure: Option<BoxError>,
}

/// The phase of an upload session a failure occurred in.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Operation input validation issues (e.g. empty bucket or key)
    InputInvalid,

    /// The input had a total length of zero; zero-length inputs are
    /// rejected before any storage call is made
    EmptyInput,

    /// The backend rejected or could not start the session; fatal, no
    /// cleanup needed since no parts exist yet
    InitiationFailed,

    /// The input source produced fewer bytes than a part boundary
    /// required; fatal, triggers abort of the session
    StreamReadFailed,

    /// A single part transfer failed; triggers abort of the whole session
    PartUploadFailed {
        /// 1-based number of the part that failed
        part_number: u64,
    },

    /// The completion call was rejected after all parts succeeded; the
    /// session is marked failed and no abort is attempted
    CommitFailed,
}

impl UploadError {
    /// Creates a new [`UploadError`] from a known kind of error as well as
    /// an arbitrary error source.
    pub fn new<E>(kind: ErrorKind, err: E) -> UploadError
    where
        E: Into<BoxError>,
    {
        UploadError {
            kind,
            source: err.into(),
            abort_failure: None,
        }
    }

    /// Returns the corresponding [`ErrorKind`] for this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// The 1-based part number this error refers to, if any.
    pub fn part_number(&self) -> Option<u64> {
        match self.kind {
            ErrorKind::PartUploadFailed { part_number } => Some(part_number),
            _ => None,
        }
    }

    /// The failure of the best-effort abort triggered by this error, if
    /// the abort itself also failed.
    pub fn abort_failure(&self) -> Option<&(dyn std::error::Error + Send + Sync)> {
        self.abort_failure.as_deref()
    }

    pub(crate) fn with_abort_failure<E>(mut self, err: E) -> Self
    where
        E: Into<BoxError>,
    {
        self.abort_failure = Some(err.into());
        self
    }
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::InputInvalid => write!(f, "invalid input")?,
            ErrorKind::EmptyInput => write!(f, "input is empty")?,
            ErrorKind::InitiationFailed => write!(f, "failed to initiate multipart upload")?,
            ErrorKind::StreamReadFailed => write!(f, "failed to read from input source")?,
            ErrorKind::PartUploadFailed { part_number } => {
                write!(f, "failed to upload part {part_number}")?
            }
            ErrorKind::CommitFailed => write!(f, "failed to complete multipart upload")?,
        }
        if let Some(abort_failure) = &self.abort_failure {
            write!(f, " (abort also failed: {abort_failure})")?;
        }
        Ok(())
    }
}

impl std::error::Error for UploadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

pub(crate) fn invalid_input<E>(err: E) -> UploadError
where
    E: Into<BoxError>,
{
    UploadError::new(ErrorKind::InputInvalid, err)
}

pub(crate) fn empty_input() -> UploadError {
    UploadError::new(ErrorKind::EmptyInput, "input has a total length of zero")
}

pub(crate) fn initiation_failed<E>(err: E) -> UploadError
where
    E: Into<BoxError>,
{
    UploadError::new(ErrorKind::InitiationFailed, err)
}

pub(crate) fn stream_read_failed<E>(err: E) -> UploadError
where
    E: Into<BoxError>,
{
    UploadError::new(ErrorKind::StreamReadFailed, err)
}

pub(crate) fn part_failed<E>(part_number: u64, err: E) -> UploadError
where
    E: Into<BoxError>,
{
    UploadError::new(ErrorKind::PartUploadFailed { part_number }, err)
}

pub(crate) fn commit_failed<E>(err: E) -> UploadError
where
    E: Into<BoxError>,
{
    UploadError::new(ErrorKind::CommitFailed, err)
}
