/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::storage::StorageClient;
use crate::types::PartSize;
use crate::MEBIBYTE;
use std::cmp;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Minimum upload part size in bytes
const MIN_PART_SIZE_BYTES: u64 = 5 * MEBIBYTE;

/// Configuration for a [`Client`](crate::client::Client)
#[derive(Clone)]
pub struct Config {
    target_part_size: PartSize,
    operation_timeout: Option<Duration>,
    storage: Arc<dyn StorageClient>,
}

impl Config {
    /// Create a new `Config` builder
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns a reference to the target part size to use for uploads
    pub fn part_size(&self) -> &PartSize {
        &self.target_part_size
    }

    /// Returns the per-storage-call timeout, if one is configured
    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout
    }

    /// The storage client that will be used to send requests to the backend.
    pub fn storage_client(&self) -> &Arc<dyn StorageClient> {
        &self.storage
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("target_part_size", &self.target_part_size)
            .field("operation_timeout", &self.operation_timeout)
            .finish_non_exhaustive()
    }
}

/// Fluent style builder for [Config]
#[derive(Clone, Default)]
pub struct Builder {
    target_part_size: PartSize,
    operation_timeout: Option<Duration>,
    storage: Option<Arc<dyn StorageClient>>,
}

impl Builder {
    /// The target size of each part of a multipart upload.
    ///
    /// The minimum part size is 5 MiB, any part size less than that will
    /// be rounded up. Only the final part of an upload may be smaller.
    ///
    /// Default is [PartSize::Auto]
    pub fn part_size(self, part_size: PartSize) -> Self {
        let part_size = match part_size {
            PartSize::Target(explicit) => {
                PartSize::Target(cmp::max(explicit, MIN_PART_SIZE_BYTES))
            }
            tps => tps,
        };

        self.set_target_part_size(part_size)
    }

    /// Target part size for a multipart upload.
    ///
    /// NOTE: This does not validate the setting and is meant for internal use only.
    pub(crate) fn set_target_part_size(mut self, part_size: PartSize) -> Self {
        self.target_part_size = part_size;
        self
    }

    /// Set a deadline applied to every individual storage call (initiate,
    /// each part, complete, abort). An elapsed deadline is treated
    /// identically to a failure of that call.
    ///
    /// No timeout is applied by default.
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Set the storage client uploads are sent through.
    pub fn storage_client(mut self, storage: Arc<dyn StorageClient>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Consumes the builder and constructs a [`Config`](crate::config::Config)
    pub fn build(self) -> Config {
        Config {
            target_part_size: self.target_part_size,
            operation_timeout: self.operation_timeout,
            storage: self.storage.expect("storage client set"),
        }
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("target_part_size", &self.target_part_size)
            .field("operation_timeout", &self.operation_timeout)
            .finish_non_exhaustive()
    }
}
