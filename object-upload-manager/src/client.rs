/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::types::PartSize;
use crate::DEFAULT_PART_SIZE_BYTES;
use std::sync::Arc;
use std::time::Duration;

/// Upload manager client for S3-compatible object storage.
#[derive(Debug, Clone)]
pub struct Client {
    pub(crate) handle: Arc<Handle>,
}

/// Whatever is needed to carry out operations, e.g. config, env details, etc
#[derive(Debug)]
pub(crate) struct Handle {
    pub(crate) config: crate::Config,
}

impl Handle {
    /// Get the concrete target part size to use for uploads
    pub(crate) fn upload_part_size_bytes(&self) -> u64 {
        match self.config.part_size() {
            PartSize::Auto => DEFAULT_PART_SIZE_BYTES,
            PartSize::Target(explicit) => *explicit,
        }
    }

    /// Get the per-storage-call timeout, if configured
    pub(crate) fn operation_timeout(&self) -> Option<Duration> {
        self.config.operation_timeout()
    }
}

impl Client {
    /// Creates a new client from an upload manager config.
    pub fn new(config: crate::Config) -> Client {
        let handle = Arc::new(Handle { config });
        Client { handle }
    }

    /// Returns the client's configuration
    pub fn config(&self) -> &crate::Config {
        &self.handle.config
    }

    /// Upload a single object to storage.
    ///
    /// Constructs a fluent builder for the
    /// [`Upload`](crate::operation::upload::builders::UploadFluentBuilder) operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::error::Error;
    /// use std::path::Path;
    /// use object_upload_manager::io::InputStream;
    ///
    /// async fn upload_file(
    ///     client: &object_upload_manager::Client,
    ///     path: impl AsRef<Path>
    /// ) -> Result<(), Box<dyn Error>> {
    ///     let stream = InputStream::from_path(path)?;
    ///     let output = client.upload()
    ///         .bucket("my-bucket")
    ///         .key("my-key")
    ///         .body(stream)
    ///         .send()
    ///         .await?;
    ///     println!("uploaded {} parts", output.part_count());
    ///     Ok(())
    /// }
    /// ```
    pub fn upload(&self) -> crate::operation::upload::builders::UploadFluentBuilder {
        crate::operation::upload::builders::UploadFluentBuilder::new(self.handle.clone())
    }
}
