/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

pub(crate) mod part_reader;
mod path_body;
mod size_hint;
mod stream;

// re-exports
pub use self::part_reader::PartData;
pub use self::path_body::PathBodyBuilder;
pub use self::size_hint::SizeHint;
pub use self::stream::InputStream;
