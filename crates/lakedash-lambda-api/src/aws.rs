//! AWS SDK implementations of the library service traits.
//!
//! Each adapter owns one SDK client (constructed once at cold start and
//! shared across invocations) and translates SDK shapes into the plain
//! records `lakedash-lib` works with. Error translation follows the library
//! taxonomy: a missing Glue database becomes [`Error::DatabaseNotFound`],
//! everything else surfaces as a service error with the SDK message.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_athena::types::{
    QueryExecutionContext, QueryExecutionState, ResultConfiguration,
};
use aws_smithy_types::date_time::Format;

use lakedash_lib::{
    Error, ExecutionState, ExecutionStatistics, ExecutionStatus, LakeAdmin, LakeStatus, LogSource,
    QueryEngine, RawResultSet, Result, TableCatalog, TableSummary,
};

/// Encryption reported when a lake has no customer-managed KMS key.
const S3_MANAGED_ENCRYPTION: &str = "S3_MANAGED_KEY";

/// Security Lake administration client scoped to one region.
pub struct SecurityLakeAdmin {
    client: aws_sdk_securitylake::Client,
    region: String,
}

impl SecurityLakeAdmin {
    pub fn new(config: &SdkConfig, region: impl Into<String>) -> Self {
        Self {
            client: aws_sdk_securitylake::Client::new(config),
            region: region.into(),
        }
    }
}

#[async_trait]
impl LakeAdmin for SecurityLakeAdmin {
    async fn data_lake(&self) -> Result<Option<LakeStatus>> {
        let output = self
            .client
            .list_data_lakes()
            .regions(&self.region)
            .send()
            .await
            .map_err(Error::service)?;

        let lake = match output.data_lakes().first() {
            Some(lake) => lake,
            None => return Ok(None),
        };

        let retention_days = lake
            .lifecycle_configuration()
            .and_then(|lifecycle| lifecycle.expiration())
            .and_then(|expiration| expiration.days());
        let encryption_type = lake
            .encryption_configuration()
            .and_then(|encryption| encryption.kms_key_id())
            .map(str::to_string)
            .or_else(|| Some(S3_MANAGED_ENCRYPTION.to_string()));

        Ok(Some(LakeStatus {
            create_status: lake.create_status().map(|status| status.as_str().to_string()),
            region: Some(lake.region().to_string()),
            retention_days,
            s3_bucket_arn: lake.s3_bucket_arn().map(str::to_string),
            encryption_type,
        }))
    }

    async fn log_sources(&self) -> Result<Vec<LogSource>> {
        let output = self
            .client
            .list_log_sources()
            .regions(&self.region)
            .send()
            .await
            .map_err(Error::service)?;

        // Flatten the per-account nesting; only native AWS log sources are
        // reported, custom sources have no name/version pair to surface.
        let mut sources = Vec::new();
        for account in output.sources() {
            for resource in account.sources() {
                if let Ok(aws_source) = resource.as_aws_log_source() {
                    sources.push(LogSource {
                        account_id: account.account().map(str::to_string),
                        region: account.region().map(str::to_string),
                        source_name: aws_source
                            .source_name()
                            .map(|name| name.as_str().to_string()),
                        source_version: aws_source.source_version().map(str::to_string),
                    });
                }
            }
        }
        Ok(sources)
    }
}

/// Glue-backed table catalog.
pub struct GlueCatalog {
    client: aws_sdk_glue::Client,
}

impl GlueCatalog {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_glue::Client::new(config),
        }
    }
}

#[async_trait]
impl TableCatalog for GlueCatalog {
    async fn list_tables(&self, database: &str) -> Result<Vec<TableSummary>> {
        let output = match self
            .client
            .get_tables()
            .database_name(database)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let err = err.into_service_error();
                if err.is_entity_not_found_exception() {
                    return Err(Error::DatabaseNotFound {
                        name: database.to_string(),
                    });
                }
                return Err(Error::service(err));
            }
        };

        let tables = output
            .table_list()
            .iter()
            .map(|table| TableSummary {
                name: table.name().to_string(),
                create_time: table.create_time().and_then(format_timestamp),
                update_time: table.update_time().and_then(format_timestamp),
                table_type: table.table_type().map(str::to_string),
            })
            .collect();
        Ok(tables)
    }
}

/// RFC 3339 rendering of an SDK timestamp; `None` when unrepresentable.
fn format_timestamp(time: &aws_smithy_types::DateTime) -> Option<String> {
    time.fmt(Format::DateTime).ok()
}

/// Athena-backed query engine.
pub struct AthenaEngine {
    client: aws_sdk_athena::Client,
}

impl AthenaEngine {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_athena::Client::new(config),
        }
    }
}

#[async_trait]
impl QueryEngine for AthenaEngine {
    async fn start_execution(
        &self,
        sql: &str,
        database: &str,
        output_location: &str,
    ) -> Result<String> {
        let context = QueryExecutionContext::builder().database(database).build();
        let result_config = ResultConfiguration::builder()
            .output_location(output_location)
            .build();

        let output = self
            .client
            .start_query_execution()
            .query_string(sql)
            .query_execution_context(context)
            .result_configuration(result_config)
            .send()
            .await
            .map_err(Error::service)?;

        output
            .query_execution_id()
            .map(str::to_string)
            .ok_or(Error::MissingExecutionId)
    }

    async fn execution_status(&self, execution_id: &str) -> Result<ExecutionStatus> {
        let output = self
            .client
            .get_query_execution()
            .query_execution_id(execution_id)
            .send()
            .await
            .map_err(Error::service)?;

        let status = output
            .query_execution()
            .and_then(|execution| execution.status())
            .ok_or_else(|| Error::MissingExecutionStatus {
                execution_id: execution_id.to_string(),
            })?;

        let state = match status.state() {
            Some(QueryExecutionState::Succeeded) => ExecutionState::Succeeded,
            Some(QueryExecutionState::Failed) => ExecutionState::Failed,
            Some(QueryExecutionState::Cancelled) => ExecutionState::Cancelled,
            // QUEUED is in-progress from the caller's point of view.
            _ => ExecutionState::Running,
        };

        Ok(ExecutionStatus {
            state,
            reason: status.state_change_reason().map(str::to_string),
        })
    }

    async fn execution_statistics(&self, execution_id: &str) -> Result<ExecutionStatistics> {
        let output = self
            .client
            .get_query_execution()
            .query_execution_id(execution_id)
            .send()
            .await
            .map_err(Error::service)?;

        let statistics = output
            .query_execution()
            .and_then(|execution| execution.statistics());

        Ok(ExecutionStatistics {
            execution_time_ms: statistics.and_then(|s| s.total_execution_time_in_millis()),
            data_scanned_bytes: statistics.and_then(|s| s.data_scanned_in_bytes()),
        })
    }

    async fn fetch_results(&self, execution_id: &str, max_results: i32) -> Result<RawResultSet> {
        let output = self
            .client
            .get_query_results()
            .query_execution_id(execution_id)
            .max_results(max_results)
            .send()
            .await
            .map_err(Error::service)?;

        let result_set = match output.result_set() {
            Some(result_set) => result_set,
            None => return Ok(RawResultSet::default()),
        };

        let columns = result_set
            .result_set_metadata()
            .map(|metadata| {
                metadata
                    .column_info()
                    .iter()
                    .map(|column| column.name().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let rows = result_set
            .rows()
            .iter()
            .map(|row| {
                row.data()
                    .iter()
                    .map(|cell| cell.var_char_value().map(str::to_string))
                    .collect()
            })
            .collect();

        Ok(RawResultSet { columns, rows })
    }
}
