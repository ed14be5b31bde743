/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Output produced by a completed upload.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct UploadOutput {
    pub(crate) upload_id: String,
    pub(crate) part_count: u64,
    pub(crate) total_length: u64,
}

impl UploadOutput {
    /// The backend-issued identifier of the multipart upload session.
    pub fn upload_id(&self) -> &str {
        &self.upload_id
    }

    /// The number of parts the object was committed from.
    pub fn part_count(&self) -> u64 {
        self.part_count
    }

    /// The total number of bytes uploaded.
    pub fn total_length(&self) -> u64 {
        self.total_length
    }
}
