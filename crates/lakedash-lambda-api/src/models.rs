//! Response payloads for the dashboard API.

use serde::Serialize;

use lakedash_lib::{
    ExecutionStatistics, LakeStatus, LogSource, QueryDefinition, QueryOutcome, ResultTable,
    TableSummary,
};

/// Error payload for 4xx/5xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Payload for requests that match no route.
#[derive(Debug, Serialize)]
pub struct NotFoundBody {
    pub error: &'static str,
    pub path: String,
}

impl NotFoundBody {
    pub fn for_path(path: impl Into<String>) -> Self {
        Self {
            error: "Not found",
            path: path.into(),
        }
    }
}

/// Security Lake status and configuration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s3_bucket_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_type: Option<String>,
}

impl StatusResponse {
    pub fn enabled(lake: LakeStatus) -> Self {
        Self {
            enabled: true,
            message: None,
            create_status: lake.create_status,
            region: lake.region,
            retention_days: lake.retention_days,
            s3_bucket_arn: lake.s3_bucket_arn,
            encryption_type: lake.encryption_type,
        }
    }

    pub fn disabled(message: impl Into<String>) -> Self {
        Self {
            enabled: false,
            message: Some(message.into()),
            create_status: None,
            region: None,
            retention_days: None,
            s3_bucket_arn: None,
            encryption_type: None,
        }
    }
}

/// One configured log source.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEntry {
    pub account_id: Option<String>,
    pub region: Option<String>,
    pub source_name: Option<String>,
    pub source_version: Option<String>,
}

impl From<LogSource> for SourceEntry {
    fn from(source: LogSource) -> Self {
        Self {
            account_id: source.account_id,
            region: source.region,
            source_name: source.source_name,
            source_version: source.source_version,
        }
    }
}

/// Log sources feeding the lake.
#[derive(Debug, Serialize)]
pub struct SourcesResponse {
    pub sources: Vec<SourceEntry>,
}

impl SourcesResponse {
    pub fn new(sources: Vec<LogSource>) -> Self {
        Self {
            sources: sources.into_iter().map(SourceEntry::from).collect(),
        }
    }
}

/// One catalog table.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableEntry {
    pub name: String,
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    pub table_type: Option<String>,
}

impl From<TableSummary> for TableEntry {
    fn from(table: TableSummary) -> Self {
        Self {
            name: table.name,
            create_time: table.create_time,
            update_time: table.update_time,
            table_type: table.table_type,
        }
    }
}

/// Tables in the Security Lake database.
#[derive(Debug, Serialize)]
pub struct TablesResponse {
    pub database: Option<String>,
    pub tables: Vec<TableEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TablesResponse {
    pub fn listed(database: impl Into<String>, tables: Vec<TableSummary>) -> Self {
        Self {
            database: Some(database.into()),
            tables: tables.into_iter().map(TableEntry::from).collect(),
            message: None,
        }
    }

    /// Benign-absence shape: the lake has not provisioned its catalog yet.
    pub fn missing() -> Self {
        Self {
            database: None,
            tables: Vec::new(),
            message: Some("Security Lake Glue database not found".to_string()),
        }
    }
}

/// One entry in the list-queries response.
#[derive(Debug, Serialize)]
pub struct QuerySummary {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<&QueryDefinition> for QuerySummary {
    fn from(query: &QueryDefinition) -> Self {
        Self {
            id: query.id.clone(),
            name: query.name.clone(),
            description: query.description.clone(),
        }
    }
}

/// The available pre-written queries.
#[derive(Debug, Serialize)]
pub struct QueriesResponse {
    pub queries: Vec<QuerySummary>,
}

/// Run-query response; the `status` field discriminates the outcome.
///
/// All variants ship as HTTP 200: the transport relayed the query outcome
/// even when the query itself did not succeed.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RunQueryResponse {
    Succeeded(QuerySucceeded),
    Terminal(QueryTerminal),
    StillRunning(QueryStillRunning),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySucceeded {
    pub query_id: String,
    pub execution_id: String,
    pub status: &'static str,
    #[serde(flatten)]
    pub table: ResultTable,
    pub row_count: usize,
    pub execution_time_ms: Option<i64>,
    pub data_scanned_bytes: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryTerminal {
    pub query_id: String,
    pub execution_id: String,
    pub status: &'static str,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryStillRunning {
    pub query_id: String,
    pub execution_id: String,
    pub status: &'static str,
    pub message: String,
}

impl RunQueryResponse {
    pub fn from_outcome(query_id: &str, execution_id: &str, outcome: QueryOutcome) -> Self {
        match outcome {
            QueryOutcome::Succeeded { table, statistics } => {
                let ExecutionStatistics {
                    execution_time_ms,
                    data_scanned_bytes,
                } = statistics;
                Self::Succeeded(QuerySucceeded {
                    query_id: query_id.to_string(),
                    execution_id: execution_id.to_string(),
                    status: "succeeded",
                    row_count: table.row_count(),
                    table,
                    execution_time_ms,
                    data_scanned_bytes,
                })
            }
            QueryOutcome::Failed { reason } => Self::Terminal(QueryTerminal {
                query_id: query_id.to_string(),
                execution_id: execution_id.to_string(),
                status: "failed",
                error: reason,
            }),
            QueryOutcome::Cancelled { reason } => Self::Terminal(QueryTerminal {
                query_id: query_id.to_string(),
                execution_id: execution_id.to_string(),
                status: "cancelled",
                error: reason,
            }),
            QueryOutcome::TimedOut => Self::StillRunning(QueryStillRunning {
                query_id: query_id.to_string(),
                execution_id: execution_id.to_string(),
                status: "running",
                message: "Query still running. Use executionId to check status.".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn succeeded_response_flattens_table_fields() {
        let outcome = QueryOutcome::Succeeded {
            table: ResultTable::default(),
            statistics: ExecutionStatistics {
                execution_time_ms: Some(1234),
                data_scanned_bytes: Some(5678),
            },
        };

        let response = RunQueryResponse::from_outcome("q-1", "exec-1", outcome);
        let value = serde_json::to_value(&response).expect("serializes");

        assert_eq!(value["queryId"], "q-1");
        assert_eq!(value["executionId"], "exec-1");
        assert_eq!(value["status"], "succeeded");
        assert_eq!(value["rowCount"], 0);
        assert!(value["columns"].is_array());
        assert!(value["rows"].is_array());
        assert_eq!(value["executionTimeMs"], 1234);
        assert_eq!(value["dataScannedBytes"], 5678);
    }

    #[test]
    fn timed_out_response_points_at_the_execution_id() {
        let response = RunQueryResponse::from_outcome("q-1", "exec-9", QueryOutcome::TimedOut);
        let value = serde_json::to_value(&response).expect("serializes");

        assert_eq!(value["status"], "running");
        assert_eq!(value["executionId"], "exec-9");
        assert!(value["message"]
            .as_str()
            .expect("message is a string")
            .contains("executionId"));
    }

    #[test]
    fn disabled_status_omits_lake_fields() {
        let value: Value =
            serde_json::to_value(StatusResponse::disabled("not configured")).expect("serializes");
        assert_eq!(value["enabled"], false);
        assert_eq!(value["message"], "not configured");
        assert!(value.get("createStatus").is_none());
        assert!(value.get("s3BucketArn").is_none());
    }

    #[test]
    fn missing_tables_shape_is_explicitly_null_database() {
        let value: Value = serde_json::to_value(TablesResponse::missing()).expect("serializes");
        assert!(value["database"].is_null());
        assert_eq!(value["tables"].as_array().map(Vec::len), Some(0));
        assert_eq!(value["message"], "Security Lake Glue database not found");
    }
}
