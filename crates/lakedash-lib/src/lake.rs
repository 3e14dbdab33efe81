//! Security Lake administration abstraction.

use async_trait::async_trait;

use crate::error::Result;

/// Settings of a provisioned data lake in the deployment region.
#[derive(Debug, Clone, Default)]
pub struct LakeStatus {
    pub create_status: Option<String>,
    pub region: Option<String>,
    pub retention_days: Option<i32>,
    pub s3_bucket_arn: Option<String>,
    pub encryption_type: Option<String>,
}

/// One configured log source, flattened to account granularity.
#[derive(Debug, Clone, Default)]
pub struct LogSource {
    pub account_id: Option<String>,
    pub region: Option<String>,
    pub source_name: Option<String>,
    pub source_version: Option<String>,
}

/// Read-only view of the Security Lake deployment itself.
#[async_trait]
pub trait LakeAdmin: Send + Sync {
    /// Data lake settings for the deployment region, if one is configured.
    async fn data_lake(&self) -> Result<Option<LakeStatus>>;

    /// All log sources feeding the lake, one entry per account and source.
    async fn log_sources(&self) -> Result<Vec<LogSource>>;
}
