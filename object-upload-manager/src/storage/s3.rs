/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! S3-compatible storage client backed by the AWS SDK.
//!
//! Works against any endpoint speaking the S3 multipart protocol
//! (S3 itself, IBM COS, MinIO, ...) using an HMAC credential pair.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use bytes::Bytes;
use tracing::instrument;

use crate::storage::{StorageClient, StorageError, StorageResult};
use crate::types::PartRecord;

/// Explicit configuration for [`S3StorageClient`].
///
/// Every setting the client needs travels in this object; nothing is read
/// from ambient process state.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    endpoint_url: String,
    region: String,
    api_key_id: String,
    api_key_secret: String,
    resource_instance_id: Option<String>,
    auth_endpoint: Option<String>,
    force_path_style: bool,
}

impl StorageConfig {
    /// Create a new `StorageConfig` builder.
    pub fn builder() -> StorageConfigBuilder {
        StorageConfigBuilder::default()
    }

    /// The storage endpoint URL requests are sent to.
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// The region requests are signed for.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The resource/service instance identifier, if the backend uses one.
    pub fn resource_instance_id(&self) -> Option<&str> {
        self.resource_instance_id.as_deref()
    }

    /// The token/auth endpoint, if the backend uses one.
    pub fn auth_endpoint(&self) -> Option<&str> {
        self.auth_endpoint.as_deref()
    }
}

/// Fluent style builder for [`StorageConfig`].
#[derive(Debug, Clone, Default)]
pub struct StorageConfigBuilder {
    endpoint_url: Option<String>,
    region: Option<String>,
    api_key_id: Option<String>,
    api_key_secret: Option<String>,
    resource_instance_id: Option<String>,
    auth_endpoint: Option<String>,
    force_path_style: Option<bool>,
}

impl StorageConfigBuilder {
    /// Set the storage endpoint URL (with scheme, e.g. `https://...`).
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Set the region requests are signed for. Defaults to `us-east-1`,
    /// which S3-compatible services commonly accept for any location.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the API key id (HMAC access key).
    pub fn api_key_id(mut self, api_key_id: impl Into<String>) -> Self {
        self.api_key_id = Some(api_key_id.into());
        self
    }

    /// Set the API key secret (HMAC secret key).
    pub fn api_key_secret(mut self, api_key_secret: impl Into<String>) -> Self {
        self.api_key_secret = Some(api_key_secret.into());
        self
    }

    /// Set the resource/service instance identifier some backends scope
    /// credentials to.
    ///
    /// Informational for this backend: the S3 protocol client
    /// authenticates with the HMAC key pair alone and does not transmit
    /// it. Stored so callers can read it back from the built config.
    pub fn resource_instance_id(mut self, resource_instance_id: impl Into<String>) -> Self {
        self.resource_instance_id = Some(resource_instance_id.into());
        self
    }

    /// Set the token/auth endpoint some backends use for key exchange.
    ///
    /// Informational for this backend: HMAC request signing needs no
    /// token exchange, so the endpoint is stored but never called.
    pub fn auth_endpoint(mut self, auth_endpoint: impl Into<String>) -> Self {
        self.auth_endpoint = Some(auth_endpoint.into());
        self
    }

    /// Use path-style URLs (`endpoint/bucket/key`) instead of
    /// virtual-hosted style. Required for MinIO and some S3-compatible
    /// services. Defaults to `true`.
    pub fn force_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = Some(force_path_style);
        self
    }

    /// Consumes the builder and constructs a [`StorageConfig`].
    pub fn build(self) -> StorageResult<StorageConfig> {
        let endpoint_url = self
            .endpoint_url
            .ok_or_else(|| StorageError::Config("endpoint_url is required".to_string()))?;
        let api_key_id = self
            .api_key_id
            .ok_or_else(|| StorageError::Config("api_key_id is required".to_string()))?;
        let api_key_secret = self
            .api_key_secret
            .ok_or_else(|| StorageError::Config("api_key_secret is required".to_string()))?;

        Ok(StorageConfig {
            endpoint_url,
            region: self.region.unwrap_or_else(|| "us-east-1".to_string()),
            api_key_id,
            api_key_secret,
            resource_instance_id: self.resource_instance_id,
            auth_endpoint: self.auth_endpoint,
            force_path_style: self.force_path_style.unwrap_or(true),
        })
    }
}

fn map_sdk_error<E>(err: aws_sdk_s3::error::SdkError<E>) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StorageError::Backend(Box::new(err))
}

/// [`StorageClient`] implementation for S3-compatible backends.
#[derive(Debug, Clone)]
pub struct S3StorageClient {
    client: aws_sdk_s3::Client,
}

impl S3StorageClient {
    /// Create a new client from an explicit [`StorageConfig`].
    pub fn new(config: &StorageConfig) -> Self {
        let credentials = aws_sdk_s3::config::Credentials::new(
            config.api_key_id.clone(),
            config.api_key_secret.clone(),
            None,
            None,
            "object-upload-manager",
        );
        let sdk_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint_url)
            .credentials_provider(credentials)
            .force_path_style(config.force_path_style)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(sdk_config),
        }
    }

    /// Create a client from an already-configured SDK client.
    pub fn from_client(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StorageClient for S3StorageClient {
    #[instrument(skip(self), fields(backend = "s3"))]
    async fn initiate_upload(&self, bucket: &str, key: &str) -> StorageResult<String> {
        let resp = self
            .client
            .create_multipart_upload()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(map_sdk_error)?;

        let upload_id = resp
            .upload_id()
            .ok_or_else(|| {
                StorageError::InvalidResponse("backend did not return an upload id".to_string())
            })?
            .to_string();

        Ok(upload_id)
    }

    #[instrument(skip(self, body), fields(backend = "s3", len = body.len()))]
    async fn upload_part(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        part_number: u64,
        body: Bytes,
    ) -> StorageResult<String> {
        let part_number = i32::try_from(part_number).map_err(|_| {
            StorageError::Config(format!("part number {part_number} exceeds backend limit"))
        })?;
        let content_length = body.len() as i64;

        let resp = self
            .client
            .upload_part()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .part_number(part_number)
            .content_length(content_length)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(map_sdk_error)?;

        let integrity_tag = resp
            .e_tag()
            .ok_or_else(|| {
                StorageError::InvalidResponse(format!(
                    "backend did not return an integrity tag for part {part_number}"
                ))
            })?
            .to_string();

        Ok(integrity_tag)
    }

    #[instrument(skip(self, parts), fields(backend = "s3", parts = parts.len()))]
    async fn complete_upload(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        parts: &[PartRecord],
    ) -> StorageResult<()> {
        let completed_parts = parts
            .iter()
            .map(|part| {
                let part_number = i32::try_from(part.part_number).map_err(|_| {
                    StorageError::Config(format!(
                        "part number {} exceeds backend limit",
                        part.part_number
                    ))
                })?;
                Ok(CompletedPart::builder()
                    .part_number(part_number)
                    .e_tag(&part.integrity_tag)
                    .build())
            })
            .collect::<StorageResult<Vec<_>>>()?;

        self.client
            .complete_multipart_upload()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(completed_parts))
                    .build(),
            )
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(())
    }

    #[instrument(skip(self), fields(backend = "s3"))]
    async fn abort_upload(&self, bucket: &str, key: &str, upload_id: &str) -> StorageResult<()> {
        self.client
            .abort_multipart_upload()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await
            .map_err(map_sdk_error)?;

        Ok(())
    }
}
