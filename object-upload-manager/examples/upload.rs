/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use object_upload_manager::io::InputStream;
use object_upload_manager::storage::s3::{S3StorageClient, StorageConfig};
use object_upload_manager::types::PartSize;
use object_upload_manager::{Client, Config};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "upload")]
#[command(about = "Upload a local file to S3-compatible object storage", long_about = None)]
struct Args {
    /// Local file to upload
    source: PathBuf,

    /// Destination bucket
    #[arg(long)]
    bucket: String,

    /// Destination object key
    #[arg(long)]
    key: String,

    /// Storage service endpoint URL
    #[arg(long)]
    endpoint: String,

    /// Region the bucket lives in
    #[arg(long, default_value = "us-east-1")]
    region: String,

    /// Access key id
    #[arg(long)]
    api_key_id: String,

    /// Secret access key
    #[arg(long)]
    api_key_secret: String,

    /// Part size to use, in bytes
    #[arg(long)]
    part_size: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let storage_config = StorageConfig::builder()
        .endpoint_url(args.endpoint)
        .region(args.region)
        .api_key_id(args.api_key_id)
        .api_key_secret(args.api_key_secret)
        .build()?;
    let storage = S3StorageClient::new(&storage_config);

    let mut config = Config::builder().storage_client(Arc::new(storage));
    if let Some(part_size) = args.part_size {
        config = config.part_size(PartSize::Target(part_size));
    }
    let client = Client::new(config.build());

    let stream = InputStream::from_path(&args.source)?;
    let output = client
        .upload()
        .bucket(args.bucket)
        .key(args.key)
        .body(stream)
        .send()
        .await?;

    println!(
        "uploaded {} bytes in {} parts (upload id {})",
        output.total_length(),
        output.part_count(),
        output.upload_id()
    );

    Ok(())
}
