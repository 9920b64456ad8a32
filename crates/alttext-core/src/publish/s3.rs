//! Amazon S3 publisher.

use super::{PublishTarget, Publisher};
use crate::error::{PipelineError, PipelineResult};
use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;

/// Publishes objects to an S3 bucket using the default AWS credential chain.
#[derive(Clone)]
pub struct S3Publisher {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Publisher {
    /// Build a client for the target's region.
    pub async fn new(target: &PublishTarget) -> Self {
        tracing::debug!(
            "S3 publisher: bucket={}, region={}",
            target.bucket,
            target.region
        );

        let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(target.region.clone()))
            .load()
            .await;

        Self {
            client: aws_sdk_s3::Client::new(&aws_config),
            bucket: target.bucket.clone(),
        }
    }
}

#[async_trait]
impl Publisher for S3Publisher {
    async fn publish(
        &self,
        key: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> PipelineResult<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(content))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| PipelineError::transport(format!("S3 upload failed: {e}")))?;

        Ok(format!("https://{}.s3.amazonaws.com/{}", self.bucket, key))
    }
}
