//! Object-storage backend setup

use anyhow::{Context, Result};
use std::sync::Arc;

use ideaport_core::Config;
use ideaport_storage::{S3Storage, Storage};

pub fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = S3Storage::new(
        config.s3_bucket.clone(),
        config.s3_region.clone(),
        config.s3_endpoint.clone(),
    )
    .context("Failed to initialize S3 storage backend")?;

    tracing::info!(
        bucket = %config.s3_bucket,
        region = %config.s3_region,
        custom_endpoint = config.s3_endpoint.is_some(),
        "Object storage initialized"
    );

    Ok(Arc::new(storage))
}
