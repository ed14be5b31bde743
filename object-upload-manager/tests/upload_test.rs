/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use async_trait::async_trait;
use bytes::Bytes;
use object_upload_manager::error::ErrorKind;
use object_upload_manager::io::InputStream;
use object_upload_manager::storage::{StorageClient, StorageError, StorageResult};
use object_upload_manager::types::{PartRecord, PartSize};
use object_upload_manager::{Client, Config};
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const MEBIBYTE: u64 = 1024 * 1024;
const PART_SIZE: u64 = 5 * MEBIBYTE;

/// One storage call as observed by the fake backend, with enough detail
/// to assert on ordering, identifiers, and payload sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Initiate {
        bucket: String,
        key: String,
    },
    UploadPart {
        upload_id: String,
        part_number: u64,
        byte_length: u64,
    },
    Complete {
        upload_id: String,
        parts: Vec<(u64, String)>,
    },
    Abort {
        upload_id: String,
    },
}

#[derive(Debug, Default)]
struct MockStorageClient {
    calls: Mutex<Vec<Call>>,
    next_upload_id: AtomicU64,
    fail_initiate: bool,
    fail_part: Option<u64>,
    fail_commit: bool,
    fail_abort: bool,
    part_delay: Option<Duration>,
}

impl MockStorageClient {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn backend_err(message: &str) -> StorageError {
        StorageError::Backend(message.to_string().into())
    }
}

#[async_trait]
impl StorageClient for MockStorageClient {
    async fn initiate_upload(&self, bucket: &str, key: &str) -> StorageResult<String> {
        self.record(Call::Initiate {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });
        if self.fail_initiate {
            return Err(Self::backend_err("initiate rejected"));
        }
        let id = self.next_upload_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("upload-{id}"))
    }

    async fn upload_part(
        &self,
        _bucket: &str,
        _key: &str,
        upload_id: &str,
        part_number: u64,
        body: Bytes,
    ) -> StorageResult<String> {
        self.record(Call::UploadPart {
            upload_id: upload_id.to_string(),
            part_number,
            byte_length: body.len() as u64,
        });
        if let Some(delay) = self.part_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_part == Some(part_number) {
            return Err(Self::backend_err("part rejected"));
        }
        Ok(format!("etag-{part_number}"))
    }

    async fn complete_upload(
        &self,
        _bucket: &str,
        _key: &str,
        upload_id: &str,
        parts: &[PartRecord],
    ) -> StorageResult<()> {
        self.record(Call::Complete {
            upload_id: upload_id.to_string(),
            parts: parts
                .iter()
                .map(|p| (p.part_number, p.integrity_tag.clone()))
                .collect(),
        });
        if self.fail_commit {
            return Err(Self::backend_err("commit rejected"));
        }
        Ok(())
    }

    async fn abort_upload(&self, _bucket: &str, _key: &str, upload_id: &str) -> StorageResult<()> {
        self.record(Call::Abort {
            upload_id: upload_id.to_string(),
        });
        if self.fail_abort {
            return Err(Self::backend_err("abort rejected"));
        }
        Ok(())
    }
}

fn test_client(storage: Arc<MockStorageClient>) -> Client {
    let config = Config::builder()
        .part_size(PartSize::Target(PART_SIZE))
        .storage_client(storage)
        .build();
    Client::new(config)
}

fn random_payload(size: usize) -> Bytes {
    let mut data = vec![0u8; size];
    fastrand::fill(&mut data);
    data.into()
}

#[tokio::test]
async fn uploads_parts_in_order_and_commits_with_their_tags() {
    let storage = Arc::new(MockStorageClient::default());
    let client = test_client(storage.clone());
    let payload = random_payload(12 * MEBIBYTE as usize);

    let output = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(InputStream::from(payload))
        .send()
        .await
        .unwrap();

    assert_eq!(output.upload_id(), "upload-1");
    assert_eq!(output.part_count(), 3);
    assert_eq!(output.total_length(), 12 * MEBIBYTE);

    let calls = storage.calls();
    assert_eq!(
        calls,
        vec![
            Call::Initiate {
                bucket: "test-bucket".to_string(),
                key: "test-key".to_string(),
            },
            Call::UploadPart {
                upload_id: "upload-1".to_string(),
                part_number: 1,
                byte_length: PART_SIZE,
            },
            Call::UploadPart {
                upload_id: "upload-1".to_string(),
                part_number: 2,
                byte_length: PART_SIZE,
            },
            Call::UploadPart {
                upload_id: "upload-1".to_string(),
                part_number: 3,
                byte_length: 2 * MEBIBYTE,
            },
            Call::Complete {
                upload_id: "upload-1".to_string(),
                parts: vec![
                    (1, "etag-1".to_string()),
                    (2, "etag-2".to_string()),
                    (3, "etag-3".to_string()),
                ],
            },
        ]
    );
}

#[tokio::test]
async fn empty_input_is_rejected_without_any_storage_call() {
    let storage = Arc::new(MockStorageClient::default());
    let client = test_client(storage.clone());

    let err = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(InputStream::from(Bytes::new()))
        .send()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), &ErrorKind::EmptyInput);
    assert!(storage.calls().is_empty());
}

#[tokio::test]
async fn part_failure_aborts_the_session_exactly_once() {
    let storage = Arc::new(MockStorageClient {
        fail_part: Some(2),
        ..Default::default()
    });
    let client = test_client(storage.clone());
    let payload = random_payload(12 * MEBIBYTE as usize);

    let err = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(InputStream::from(payload))
        .send()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), &ErrorKind::PartUploadFailed { part_number: 2 });
    assert!(err.abort_failure().is_none());

    let calls = storage.calls();
    let part_numbers: Vec<u64> = calls
        .iter()
        .filter_map(|c| match c {
            Call::UploadPart { part_number, .. } => Some(*part_number),
            _ => None,
        })
        .collect();
    assert_eq!(part_numbers, vec![1, 2]);
    assert!(!calls.iter().any(|c| matches!(c, Call::Complete { .. })));

    let aborts: Vec<&Call> = calls
        .iter()
        .filter(|c| matches!(c, Call::Abort { .. }))
        .collect();
    assert_eq!(
        aborts,
        vec![&Call::Abort {
            upload_id: "upload-1".to_string()
        }]
    );
}

#[tokio::test]
async fn initiation_failure_makes_no_further_calls() {
    let storage = Arc::new(MockStorageClient {
        fail_initiate: true,
        ..Default::default()
    });
    let client = test_client(storage.clone());

    let err = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(InputStream::from(random_payload(MEBIBYTE as usize)))
        .send()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), &ErrorKind::InitiationFailed);
    assert_eq!(storage.calls().len(), 1);
    assert!(matches!(storage.calls()[0], Call::Initiate { .. }));
}

#[tokio::test]
async fn reruns_get_distinct_sessions_with_identical_partitioning() {
    let storage = Arc::new(MockStorageClient::default());
    let client = test_client(storage.clone());
    let payload = random_payload(7 * MEBIBYTE as usize);

    let first = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(InputStream::from(payload.clone()))
        .send()
        .await
        .unwrap();
    let second = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(InputStream::from(payload))
        .send()
        .await
        .unwrap();

    assert_eq!(first.upload_id(), "upload-1");
    assert_eq!(second.upload_id(), "upload-2");
    assert_eq!(first.part_count(), second.part_count());

    let lengths_for = |upload_id: &str| -> Vec<u64> {
        storage
            .calls()
            .iter()
            .filter_map(|c| match c {
                Call::UploadPart {
                    upload_id: id,
                    byte_length,
                    ..
                } if id == upload_id => Some(*byte_length),
                _ => None,
            })
            .collect()
    };
    assert_eq!(lengths_for("upload-1"), lengths_for("upload-2"));
}

#[tokio::test]
async fn commit_failure_marks_failed_without_abort() {
    let storage = Arc::new(MockStorageClient {
        fail_commit: true,
        ..Default::default()
    });
    let client = test_client(storage.clone());

    let err = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(InputStream::from(random_payload(6 * MEBIBYTE as usize)))
        .send()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), &ErrorKind::CommitFailed);
    let calls = storage.calls();
    assert!(calls.iter().any(|c| matches!(c, Call::Complete { .. })));
    assert!(!calls.iter().any(|c| matches!(c, Call::Abort { .. })));
}

#[tokio::test]
async fn abort_failure_is_attached_to_the_original_error() {
    let storage = Arc::new(MockStorageClient {
        fail_part: Some(1),
        fail_abort: true,
        ..Default::default()
    });
    let client = test_client(storage.clone());

    let err = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(InputStream::from(random_payload(6 * MEBIBYTE as usize)))
        .send()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), &ErrorKind::PartUploadFailed { part_number: 1 });
    assert!(err.abort_failure().is_some());
}

#[tokio::test]
async fn stream_read_failure_aborts_the_session() {
    let storage = Arc::new(MockStorageClient::default());
    let client = test_client(storage.clone());

    // Stated length exceeds what the file holds; the first part reads
    // fine, the second hits the end of the file mid-read.
    let payload = random_payload(6 * MEBIBYTE as usize);
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(&payload).unwrap();
    let stream = InputStream::read_from()
        .path(tmp.path())
        .length(10 * MEBIBYTE)
        .build()
        .unwrap();

    let err = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(stream)
        .send()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), &ErrorKind::StreamReadFailed);

    let calls = storage.calls();
    let part_numbers: Vec<u64> = calls
        .iter()
        .filter_map(|c| match c {
            Call::UploadPart { part_number, .. } => Some(*part_number),
            _ => None,
        })
        .collect();
    assert_eq!(part_numbers, vec![1]);
    assert!(!calls.iter().any(|c| matches!(c, Call::Complete { .. })));

    let aborts: Vec<&Call> = calls
        .iter()
        .filter(|c| matches!(c, Call::Abort { .. }))
        .collect();
    assert_eq!(
        aborts,
        vec![&Call::Abort {
            upload_id: "upload-1".to_string()
        }]
    );
}

#[tokio::test]
async fn uploads_from_a_file_source() {
    let storage = Arc::new(MockStorageClient::default());
    let client = test_client(storage.clone());

    let payload = random_payload(6 * MEBIBYTE as usize);
    let mut tmp = tempfile::NamedTempFile::new().unwrap();
    tmp.write_all(&payload).unwrap();

    let stream = InputStream::from_path(tmp.path()).unwrap();
    let output = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(stream)
        .send()
        .await
        .unwrap();

    assert_eq!(output.part_count(), 2);
    assert_eq!(output.total_length(), 6 * MEBIBYTE);

    let lengths: Vec<u64> = storage
        .calls()
        .iter()
        .filter_map(|c| match c {
            Call::UploadPart { byte_length, .. } => Some(*byte_length),
            _ => None,
        })
        .collect();
    assert_eq!(lengths, vec![PART_SIZE, MEBIBYTE]);
}

#[tokio::test(start_paused = true)]
async fn part_timeout_is_treated_as_part_failure() {
    let storage = Arc::new(MockStorageClient {
        part_delay: Some(Duration::from_secs(60)),
        ..Default::default()
    });
    let config = Config::builder()
        .part_size(PartSize::Target(PART_SIZE))
        .operation_timeout(Duration::from_secs(1))
        .storage_client(storage.clone())
        .build();
    let client = Client::new(config);

    let err = client
        .upload()
        .bucket("test-bucket")
        .key("test-key")
        .body(InputStream::from(random_payload(6 * MEBIBYTE as usize)))
        .send()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), &ErrorKind::PartUploadFailed { part_number: 1 });
    let calls = storage.calls();
    assert!(calls
        .iter()
        .any(|c| matches!(c, Call::Abort { upload_id } if upload_id == "upload-1")));
}
