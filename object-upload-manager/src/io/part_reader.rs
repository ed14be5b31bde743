/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::cmp;
use std::io;

use bytes::{Bytes, BytesMut};

use crate::io::path_body::PathBody;
use crate::io::stream::RawInputStream;
use crate::io::InputStream;
use crate::MEBIBYTE;

/// Builder for creating a `PartReader`
#[derive(Debug)]
pub(crate) struct Builder {
    stream: Option<RawInputStream>,
    part_size: usize,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            stream: None,
            part_size: 5 * MEBIBYTE as usize,
        }
    }

    /// Set the input stream to read from.
    pub(crate) fn stream(mut self, stream: InputStream) -> Self {
        self.stream = Some(stream.inner);
        self
    }

    /// Set the target part size that should be used when reading data.
    ///
    /// All parts except for possibly the last one should be of this size.
    pub(crate) fn part_size(mut self, part_size: usize) -> Self {
        self.part_size = part_size;
        self
    }

    pub(crate) fn build(self) -> PartReader {
        let stream = self.stream.expect("input stream set");
        PartReader::new(stream, self.part_size)
    }
}

/// Reads exact-size chunks from an input stream, lazily and in order.
///
/// The final part is the only one allowed to be smaller than the
/// configured part size. Reads are strictly sequential; the next part is
/// not produced until the caller asks for it.
#[derive(Debug)]
pub(crate) struct PartReader {
    inner: Inner,
    part_size: usize,
}

impl PartReader {
    fn new(raw: RawInputStream, part_size: usize) -> Self {
        let inner = match raw {
            RawInputStream::Buf(buf) => Inner::Bytes(BytesPartReader::new(buf)),
            RawInputStream::Fs(path_body) => Inner::Fs(PathBodyPartReader::new(path_body)),
        };

        Self { inner, part_size }
    }

    /// Pull the next part from the stream, or `None` once the stream's
    /// stated length has been fully consumed.
    pub(crate) async fn next_part(&mut self) -> Result<Option<PartData>, io::Error> {
        match &mut self.inner {
            Inner::Bytes(bytes) => bytes.next_part(self.part_size),
            Inner::Fs(path_body) => path_body.next_part(self.part_size).await,
        }
    }
}

#[derive(Debug)]
enum Inner {
    Bytes(BytesPartReader),
    Fs(PathBodyPartReader),
}

/// Contents of a single part of a multipart upload.
#[derive(Debug, Clone)]
pub struct PartData {
    // 1-indexed
    pub(crate) part_number: u64,
    pub(crate) data: Bytes,
}

impl PartData {
    pub(crate) fn new(part_number: u64, data: impl Into<Bytes>) -> Self {
        Self {
            part_number,
            data: data.into(),
        }
    }

    /// 1-based number of this part.
    pub fn part_number(&self) -> u64 {
        self.part_number
    }

    /// The bytes of this part.
    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

#[derive(Debug)]
struct PartReaderState {
    // current start offset
    offset: u64,
    // current part number
    part_number: u64,
    // total number of bytes remaining to be read
    remaining: u64,
}

impl PartReaderState {
    /// Create a new `PartReaderState`
    fn new(content_length: u64) -> Self {
        Self {
            offset: 0,
            part_number: 1,
            remaining: content_length,
        }
    }

    /// Set the initial offset to start reading from
    fn with_offset(self, offset: u64) -> Self {
        Self { offset, ..self }
    }
}

/// Implementation for in-memory input streams.
#[derive(Debug)]
struct BytesPartReader {
    buf: Bytes,
    state: PartReaderState,
}

impl BytesPartReader {
    fn new(buf: Bytes) -> Self {
        let content_length = buf.len() as u64;
        Self {
            buf,
            state: PartReaderState::new(content_length),
        }
    }

    fn next_part(&mut self, part_size: usize) -> Result<Option<PartData>, io::Error> {
        if self.state.remaining == 0 {
            return Ok(None);
        }

        let start = self.state.offset as usize;
        let end = cmp::min(start + part_size, self.buf.len());
        let data = self.buf.slice(start..end);
        let part_number = self.state.part_number;
        self.state.part_number += 1;
        self.state.offset += data.len() as u64;
        self.state.remaining -= data.len() as u64;
        Ok(Some(PartData::new(part_number, data)))
    }
}

/// Implementation for path based input streams
#[derive(Debug)]
struct PathBodyPartReader {
    body: PathBody,
    state: PartReaderState,
}

impl PathBodyPartReader {
    fn new(body: PathBody) -> Self {
        let offset = body.offset;
        let content_length = body.length;
        Self {
            body,
            state: PartReaderState::new(content_length).with_offset(offset),
        }
    }

    async fn next_part(&mut self, part_size: usize) -> Result<Option<PartData>, io::Error> {
        if self.state.remaining == 0 {
            return Ok(None);
        }

        let offset = self.state.offset;
        let part_number = self.state.part_number;
        let this_part_size = cmp::min(part_size as u64, self.state.remaining);
        self.state.offset += this_part_size;
        self.state.part_number += 1;
        self.state.remaining -= this_part_size;

        let path = self.body.path.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let mut dst = BytesMut::zeroed(this_part_size as usize);
            // an exact read; a file shorter than the stated length fails
            // here with UnexpectedEof rather than producing a short part
            file_util::read_file_chunk_sync(&mut dst, path, offset)?;
            Ok::<PartData, io::Error>(PartData::new(part_number, dst.freeze()))
        });

        handle.await.map_err(io::Error::other)?.map(Some)
    }
}

mod file_util {
    #[cfg(unix)]
    pub(super) use unix::read_file_chunk_sync;
    #[cfg(windows)]
    pub(super) use windows::read_file_chunk_sync;

    #[cfg(unix)]
    mod unix {
        use std::fs::File;
        use std::io;
        use std::os::unix::fs::FileExt;
        use std::path::Path;

        pub(crate) fn read_file_chunk_sync(
            dst: &mut [u8],
            path: impl AsRef<Path>,
            offset: u64,
        ) -> Result<(), io::Error> {
            let file = File::open(path)?;
            file.read_exact_at(dst, offset)
        }
    }

    #[cfg(windows)]
    mod windows {
        use std::fs::File;
        use std::io;
        use std::io::{Read, Seek, SeekFrom};
        use std::path::Path;

        pub(crate) fn read_file_chunk_sync(
            dst: &mut [u8],
            path: impl AsRef<Path>,
            offset: u64,
        ) -> Result<(), io::Error> {
            let mut file = File::open(path)?;
            file.seek(SeekFrom::Start(offset))?;
            file.read_exact(dst)
        }
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use bytes::{Buf, Bytes};
    use tempfile::NamedTempFile;

    use crate::io::part_reader::{Builder, PartData, PartReader};
    use crate::io::InputStream;

    async fn collect_parts(mut reader: PartReader) -> Vec<PartData> {
        let mut parts = Vec::new();
        let mut expected_part_number = 1;
        while let Some(part) = reader.next_part().await.unwrap() {
            assert_eq!(expected_part_number, part.part_number);
            expected_part_number += 1;
            parts.push(part);
        }
        parts
    }

    #[tokio::test]
    async fn test_bytes_part_reader() {
        let data = Bytes::from("a lep is a ball, a tay is a hammer, a flix is a comb");
        let stream = InputStream::from(data.clone());
        let expected = data.chunks(5).collect::<Vec<_>>();
        let reader = Builder::new().part_size(5).stream(stream).build();
        let parts = collect_parts(reader).await;
        let actual = parts.iter().map(|p| p.data.chunk()).collect::<Vec<_>>();

        assert_eq!(expected, actual);
    }

    async fn path_reader_test(limit: Option<usize>, offset: Option<usize>) {
        let part_size = 5;
        let mut tmp = NamedTempFile::new().unwrap();
        let mut data = Bytes::from("a lep is a ball, a tay is a hammer, a flix is a comb");
        tmp.write_all(data.chunk()).unwrap();

        let mut builder = InputStream::read_from().path(tmp.path());
        if let Some(limit) = limit {
            data.truncate(limit);
            builder = builder.length((limit - offset.unwrap_or_default()) as u64);
        }

        if let Some(offset) = offset {
            data.advance(offset);
            builder = builder.offset(offset as u64);
        }

        let expected = data.chunks(part_size).collect::<Vec<_>>();

        let stream = builder.build().unwrap();
        let reader = Builder::new().part_size(part_size).stream(stream).build();

        let parts = collect_parts(reader).await;
        let actual = parts.iter().map(|p| p.data.chunk()).collect::<Vec<_>>();

        assert_eq!(expected, actual);
    }

    #[tokio::test]
    async fn test_path_part_reader() {
        path_reader_test(None, None).await;
    }

    #[tokio::test]
    async fn test_path_part_reader_with_offset() {
        path_reader_test(None, Some(8)).await;
    }

    #[tokio::test]
    async fn test_path_part_reader_with_explicit_length() {
        path_reader_test(Some(12), None).await;
    }

    #[tokio::test]
    async fn test_path_part_reader_with_length_and_offset() {
        path_reader_test(Some(23), Some(4)).await;
    }

    #[tokio::test]
    async fn stated_length_beyond_file_end_is_a_read_error() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(b"short").unwrap();

        let stream = InputStream::read_from()
            .path(tmp.path())
            .length(64)
            .build()
            .unwrap();
        let mut reader = Builder::new().part_size(16).stream(stream).build();

        let err = reader.next_part().await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn empty_stream_produces_no_parts() {
        let stream = InputStream::from(Bytes::new());
        let reader = Builder::new().part_size(5).stream(stream).build();
        assert!(collect_parts(reader).await.is_empty());
    }
}
