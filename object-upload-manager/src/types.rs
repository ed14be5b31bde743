/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// The target part size for an upload request.
#[derive(Debug, Clone, Default)]
pub enum PartSize {
    /// Use the default target part size.
    #[default]
    Auto,

    /// Target part size explicitly given.
    ///
    /// NOTE: This is a suggestion and will be used if possible but may be
    /// rounded up to the minimum the backend requires.
    Target(u64),
}

/// One successfully uploaded chunk of an upload session.
///
/// Records are created in upload order and never mutated afterwards; the
/// full ordered sequence is handed to the backend verbatim at commit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartRecord {
    /// 1-based sequence index, contiguous with no gaps.
    pub part_number: u64,
    /// Opaque backend-issued token for this part's bytes. Must be supplied
    /// verbatim when completing the upload.
    pub integrity_tag: String,
    /// Actual bytes sent for this part. Equals the session part size for
    /// all but the final part.
    pub byte_length: u64,
}

impl PartRecord {
    pub(crate) fn new(part_number: u64, integrity_tag: String, byte_length: u64) -> Self {
        Self {
            part_number,
            integrity_tag,
            byte_length,
        }
    }
}
