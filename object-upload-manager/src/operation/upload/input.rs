/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::io::InputStream;
use std::fmt;
use std::mem;

/// Input type for uploading a single object
#[non_exhaustive]
pub struct UploadInput {
    /// The bucket name to which the upload is sent.
    pub bucket: Option<String>,
    /// Object key for which the multipart upload is created.
    pub key: Option<String>,
    /// Object data.
    pub body: InputStream,
}

impl UploadInput {
    /// Creates a new builder-style object to manufacture [`UploadInput`](crate::operation::upload::UploadInput).
    pub fn builder() -> UploadInputBuilder {
        UploadInputBuilder::default()
    }

    /// The bucket name to which the upload is sent.
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// Object key for which the multipart upload is created.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Split the body out of the input, replacing it with an empty stream.
    pub(crate) fn take_body(&mut self) -> InputStream {
        mem::take(&mut self.body)
    }
}

impl fmt::Debug for UploadInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadInput")
            .field("bucket", &self.bucket)
            .field("key", &self.key)
            .field("body", &"InputStream")
            .finish()
    }
}

/// A builder for [`UploadInput`](crate::operation::upload::UploadInput).
#[non_exhaustive]
#[derive(Debug, Default)]
pub struct UploadInputBuilder {
    pub(crate) bucket: Option<String>,
    pub(crate) key: Option<String>,
    pub(crate) body: Option<InputStream>,
}

impl UploadInputBuilder {
    /// The bucket name to which the upload is sent.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.bucket = Some(input.into());
        self
    }

    /// Object key for which the multipart upload is created.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.key = Some(input.into());
        self
    }

    /// Object data.
    pub fn body(mut self, input: InputStream) -> Self {
        self.body = Some(input);
        self
    }

    /// Consumes the builder and constructs an [`UploadInput`](crate::operation::upload::UploadInput).
    pub fn build(self) -> UploadInput {
        UploadInput {
            bucket: self.bucket,
            key: self.key,
            body: self.body.unwrap_or_default(),
        }
    }
}
