//! Environment-backed configuration for the dashboard API.
//!
//! # Environment Variables
//!
//! - `AWS_REGION`: deployment region (default: `us-east-1`)
//! - `ATHENA_OUTPUT_BUCKET`: S3 bucket for Athena query output
//! - `SECURITY_LAKE_DATABASE`: overrides the region-derived database name,
//!   for cross-account deployments that query through a resource link

use std::env;

/// Default S3 bucket for Athena query output.
const DEFAULT_OUTPUT_BUCKET: &str = "lakedash-athena-results";

/// Default deployment region when `AWS_REGION` is unset.
const DEFAULT_REGION: &str = "us-east-1";

/// Runtime configuration, resolved once at startup and read-only thereafter.
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment region; also selects the Security Lake database and tables.
    pub region: String,
    /// Glue database holding the Security Lake tables.
    pub database: String,
    /// S3 location where Athena writes query output.
    pub output_location: String,
}

impl Config {
    /// Build a configuration for a region and Athena output bucket.
    pub fn new(region: impl Into<String>, output_bucket: &str) -> Self {
        let region = region.into();
        Self {
            database: glue_database_name(&region),
            output_location: format!("s3://{}/query-results/", output_bucket),
            region,
        }
    }

    /// Resolve configuration from the Lambda environment.
    pub fn from_env() -> Self {
        let region = env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string());
        let bucket =
            env::var("ATHENA_OUTPUT_BUCKET").unwrap_or_else(|_| DEFAULT_OUTPUT_BUCKET.to_string());

        let mut config = Self::new(region, &bucket);
        if let Ok(database) = env::var("SECURITY_LAKE_DATABASE") {
            config.database = database;
        }
        config
    }
}

/// Name of the Glue database Security Lake creates in a region.
pub fn glue_database_name(region: &str) -> String {
    format!("amazon_security_lake_glue_db_{}", region.replace('-', "_"))
}
