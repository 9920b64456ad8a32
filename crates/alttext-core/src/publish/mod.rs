//! Publishing alt text to object storage.
//!
//! The pipeline treats storage as an opaque sink behind [`Publisher`]. Each
//! publish uses a freshly generated object key.

#[cfg(feature = "s3")]
mod s3;

#[cfg(feature = "s3")]
pub use s3::S3Publisher;

use crate::config::{resolve_env_var_with, PublishConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::types::AltText;
use async_trait::async_trait;

/// Content type used for published alt text.
pub const CONTENT_TYPE: &str = "text/plain";

/// An object storage sink.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Store `content` under `key` and return its public location.
    async fn publish(&self, key: &str, content: Vec<u8>, content_type: &str)
        -> PipelineResult<String>;
}

/// Where and how a published alt text landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// Generated object key
    pub key: String,
    /// Location reported by the publisher
    pub location: String,
}

/// Publish alt text under a new random key.
pub async fn publish_alt_text(
    publisher: &dyn Publisher,
    alt_text: &AltText,
) -> PipelineResult<Published> {
    let key = uuid::Uuid::new_v4().to_string();
    let location = publisher
        .publish(&key, alt_text.as_str().as_bytes().to_vec(), CONTENT_TYPE)
        .await?;
    tracing::info!("Published alt text as {key}");
    Ok(Published { key, location })
}

/// Bucket and region resolved from configuration and the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    pub bucket: String,
    pub region: String,
}

impl PublishTarget {
    /// Resolve the target from config, checking credentials are present.
    pub fn from_config(config: &PublishConfig) -> PipelineResult<Self> {
        Self::from_config_with(config, |key| std::env::var(key).ok())
    }

    /// Resolve the target using a custom environment lookup.
    ///
    /// Fails with a configuration error, before any network call, if the
    /// region, bucket, or AWS access key pair is missing.
    pub fn from_config_with<F>(config: &PublishConfig, lookup: F) -> PipelineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let region = resolve_env_var_with(&config.region, &lookup).ok_or_else(|| {
            PipelineError::Configuration(
                "AWS_REGION has not been set. Will not attempt upload.".to_string(),
            )
        })?;

        for var in ["AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY"] {
            if lookup(var).filter(|v| !v.is_empty()).is_none() {
                return Err(PipelineError::Configuration(format!(
                    "{var} has not been set. Cannot attempt upload."
                )));
            }
        }

        let bucket = resolve_env_var_with(&config.bucket, &lookup).ok_or_else(|| {
            PipelineError::Configuration(
                "S3_BUCKET has not been set. Cannot attempt upload.".to_string(),
            )
        })?;

        Ok(Self { bucket, region })
    }
}
