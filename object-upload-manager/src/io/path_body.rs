/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::io;
use std::path::{Path, PathBuf};

use crate::io::stream::{InputStream, RawInputStream};

/// File based input with a fixed byte range to read.
#[derive(Debug)]
pub(super) struct PathBody {
    pub(super) path: PathBuf,
    pub(super) length: u64,
    pub(super) offset: u64,
}

/// Builder for creating [`InputStream`] from a file/path.
#[derive(Debug, Default)]
pub struct PathBodyBuilder {
    path: Option<PathBuf>,
    length: Option<u64>,
    offset: Option<u64>,
}

impl PathBodyBuilder {
    /// Create a new [`PathBodyBuilder`].
    ///
    /// You must call [`path`](PathBodyBuilder::path) to specify what to read from.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path to read from.
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Specify the length to read (in bytes).
    ///
    /// By default, the length of the entire file (minus any configured
    /// offset) is used. The caller is responsible for ensuring the given
    /// length is consistent with the actual file contents.
    pub fn length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    /// Specify the offset to start reading from (in bytes).
    ///
    /// When used the `offset` must be less than or equal to the size of the file.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Returns a [`InputStream`] from this builder.
    pub fn build(self) -> Result<InputStream, io::Error> {
        let path = self
            .path
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path is required"))?;
        let offset = self.offset.unwrap_or_default();

        let length = match self.length {
            Some(length) => length,
            None => {
                let file_size = std::fs::metadata(&path)?.len();
                if offset > file_size {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("offset {offset} is past the end of the file ({file_size} bytes)"),
                    ));
                }
                file_size - offset
            }
        };

        let body = PathBody {
            path,
            length,
            offset,
        };

        Ok(InputStream {
            inner: RawInputStream::Fs(body),
        })
    }
}
