/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// The bounds on the remaining length of a stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeHint {
    lower: u64,
    upper: Option<u64>,
}

impl SizeHint {
    /// Create a `SizeHint` for an exactly known number of bytes.
    pub fn exact(size: u64) -> Self {
        Self {
            lower: size,
            upper: Some(size),
        }
    }

    /// The lower bound of the stream length.
    pub fn lower(&self) -> u64 {
        self.lower
    }

    /// The upper bound of the stream length, if known.
    pub fn upper(&self) -> Option<u64> {
        self.upper
    }
}
