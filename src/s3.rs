use anyhow::{anyhow, Result};
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::StorageClass;
use aws_sdk_s3::Client as S3Client;
use log::{debug, info};
use std::path::Path;

use crate::config::Config;

const CONTENT_TYPE: &str = "video/mp4";

/// Uploads camera recordings to a single S3 bucket.
///
/// One client is built at startup and shared for the process lifetime.
/// Every object is stored with content type `video/mp4` and storage
/// class `STANDARD`.
pub struct Uploader {
    client: S3Client,
    bucket: String,
}

impl Uploader {
    pub async fn new(config: &Config) -> Result<Self> {
        let aws_config = aws_config::defaults(BehaviorVersion::latest()).load().await;

        let mut builder = S3ConfigBuilder::from(&aws_config);

        // Custom endpoint for MinIO/LocalStack setups
        if let Some(ref endpoint_url) = config.endpoint_url {
            builder = builder.endpoint_url(endpoint_url);
        }

        if config.force_path_style {
            builder = builder.force_path_style(true);
        }

        let client = S3Client::from_conf(builder.build());

        info!("S3 uploader initialized for bucket \"{}\"", config.bucket);

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
        })
    }

    /// Performs one blocking `PutObject` call. No retry and no cleanup
    /// of partial uploads; any transport or service failure propagates
    /// to the caller with the source path and key attached.
    pub async fn upload(&self, local_path: &Path, key: &str) -> Result<()> {
        debug!("Uploading {} as \"{}\"", local_path.display(), key);

        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| anyhow!("Failed to read file {}: {}", local_path.display(), e))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(CONTENT_TYPE)
            .storage_class(StorageClass::Standard)
            .send()
            .await
            .map_err(|e| {
                anyhow!(
                    "Failed to upload {} to bucket \"{}\" as \"{}\": {}",
                    local_path.display(),
                    self.bucket,
                    key,
                    aws_sdk_s3::error::DisplayErrorContext(e)
                )
            })?;

        info!(
            "Stored {} in bucket \"{}\" as \"{}\"",
            local_path.display(),
            self.bucket,
            key
        );

        Ok(())
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}
