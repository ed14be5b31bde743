/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Multipart upload orchestrator for S3-compatible object storage.
//!
//! Splits an input of known length into bounded-size parts, uploads each
//! part with its backend-issued integrity tag, and drives the session to a
//! single terminal state: the object is either committed in full or the
//! upload is aborted and nothing becomes visible.

#![warn(
    missing_debug_implementations,
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]

pub(crate) const MEBIBYTE: u64 = 1024 * 1024;

/// Default target part size when none is configured explicitly.
pub(crate) const DEFAULT_PART_SIZE_BYTES: u64 = 5 * MEBIBYTE;

/// Error types emitted by `object-upload-manager`
pub mod error;

/// Common types used by `object-upload-manager`
pub mod types;

/// Types and helpers for I/O
pub mod io;

/// Storage backend interface and implementations
pub mod storage;

/// Client configuration
pub mod config;

/// Upload manager client
pub mod client;

/// Upload manager operations
pub mod operation;

pub use client::Client;
pub use config::Config;
