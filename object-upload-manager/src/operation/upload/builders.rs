/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::client::Handle;
use crate::error::UploadError;
use crate::io::InputStream;
use std::sync::Arc;

use super::input::UploadInputBuilder;
use super::{Upload, UploadOutput};

/// Fluent builder for constructing a single object upload
#[derive(Debug)]
pub struct UploadFluentBuilder {
    handle: Arc<Handle>,
    inner: UploadInputBuilder,
}

impl UploadFluentBuilder {
    pub(crate) fn new(handle: Arc<Handle>) -> Self {
        Self {
            handle,
            inner: UploadInputBuilder::default(),
        }
    }

    /// The bucket name to which the upload is sent.
    pub fn bucket(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.bucket(input);
        self
    }

    /// Object key for which the multipart upload is created.
    pub fn key(mut self, input: impl Into<String>) -> Self {
        self.inner = self.inner.key(input);
        self
    }

    /// Object data.
    pub fn body(mut self, input: InputStream) -> Self {
        self.inner = self.inner.body(input);
        self
    }

    /// Initiate the upload and drive it to completion.
    pub async fn send(self) -> Result<UploadOutput, UploadError> {
        let input = self.inner.build();
        Upload::orchestrate(self.handle, input).await
    }
}

impl crate::operation::upload::input::UploadInputBuilder {
    /// Initiate an upload with this input using the given client.
    pub async fn send_with(self, client: &crate::Client) -> Result<UploadOutput, UploadError> {
        let input = self.build();
        Upload::orchestrate(client.handle.clone(), input).await
    }
}
