//! Test utilities for Lambda handler testing.
//!
//! Scriptable in-memory implementations of the `lakedash-lib` service
//! traits, plus request builders. These are only available in test builds:
//!
//! ```ignore
//! use lakedash_lambda_shared::test_utils::{api_request, ScriptedQueryEngine};
//! use lakedash_lib::ExecutionState;
//!
//! let engine = ScriptedQueryEngine::new([
//!     ExecutionState::Running,
//!     ExecutionState::Succeeded,
//! ]);
//! let request = api_request("POST", "/api/securitylake/query", Some(r#"{"queryId":"x"}"#));
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use lakedash_lib::{
    Error, ExecutionState, ExecutionStatistics, ExecutionStatus, LakeAdmin, LakeStatus, LogSource,
    QueryEngine, RawResultSet, Result, TableCatalog, TableSummary,
};

use crate::ApiRequest;

/// Build a proxy request for router tests.
pub fn api_request(method: &str, path: &str, body: Option<&str>) -> ApiRequest {
    let request = ApiRequest::new(method, path);
    match body {
        Some(body) => request.with_body(body),
        None => request,
    }
}

/// Lake admin stub returning canned data or a scripted failure.
#[derive(Debug, Default)]
pub struct StubLakeAdmin {
    pub lake: Option<LakeStatus>,
    pub sources: Vec<LogSource>,
    pub fail_with: Option<String>,
}

impl StubLakeAdmin {
    /// Stub whose every call fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl LakeAdmin for StubLakeAdmin {
    async fn data_lake(&self) -> Result<Option<LakeStatus>> {
        match &self.fail_with {
            Some(message) => Err(Error::service(message)),
            None => Ok(self.lake.clone()),
        }
    }

    async fn log_sources(&self) -> Result<Vec<LogSource>> {
        match &self.fail_with {
            Some(message) => Err(Error::service(message)),
            None => Ok(self.sources.clone()),
        }
    }
}

/// Table catalog stub; `missing` simulates an unprovisioned database.
#[derive(Debug, Default)]
pub struct StubTableCatalog {
    pub tables: Vec<TableSummary>,
    pub missing: bool,
    pub fail_with: Option<String>,
}

impl StubTableCatalog {
    pub fn missing() -> Self {
        Self {
            missing: true,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl TableCatalog for StubTableCatalog {
    async fn list_tables(&self, database: &str) -> Result<Vec<TableSummary>> {
        if let Some(message) = &self.fail_with {
            return Err(Error::service(message));
        }
        if self.missing {
            return Err(Error::DatabaseNotFound {
                name: database.to_string(),
            });
        }
        Ok(self.tables.clone())
    }
}

/// Query engine driven by a scripted sequence of states.
///
/// Status checks consume the script front to back; once a single state
/// remains it repeats forever. Call counters let tests assert exactly how
/// many engine round-trips a handler performed.
pub struct ScriptedQueryEngine {
    pub execution_id: String,
    states: Mutex<VecDeque<ExecutionState>>,
    reason: Option<String>,
    results: RawResultSet,
    statistics: ExecutionStatistics,
    fail_submit: Option<String>,
    pub submit_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub result_calls: AtomicUsize,
    pub stats_calls: AtomicUsize,
}

impl ScriptedQueryEngine {
    pub fn new(states: impl IntoIterator<Item = ExecutionState>) -> Self {
        Self {
            execution_id: "exec-test-1".to_string(),
            states: Mutex::new(states.into_iter().collect()),
            reason: None,
            results: RawResultSet::default(),
            statistics: ExecutionStatistics::default(),
            fail_submit: None,
            submit_calls: AtomicUsize::new(0),
            status_calls: AtomicUsize::new(0),
            result_calls: AtomicUsize::new(0),
            stats_calls: AtomicUsize::new(0),
        }
    }

    /// Engine whose submission call fails with `message`.
    pub fn failing_submit(message: &str) -> Self {
        let mut engine = Self::new([ExecutionState::Running]);
        engine.fail_submit = Some(message.to_string());
        engine
    }

    pub fn with_reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }

    pub fn with_results(mut self, results: RawResultSet) -> Self {
        self.results = results;
        self
    }

    pub fn with_statistics(mut self, statistics: ExecutionStatistics) -> Self {
        self.statistics = statistics;
        self
    }
}

#[async_trait]
impl QueryEngine for ScriptedQueryEngine {
    async fn start_execution(
        &self,
        _sql: &str,
        _database: &str,
        _output_location: &str,
    ) -> Result<String> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_submit {
            Some(message) => Err(Error::service(message)),
            None => Ok(self.execution_id.clone()),
        }
    }

    async fn execution_status(&self, _execution_id: &str) -> Result<ExecutionStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let mut states = self.states.lock().expect("states lock");
        let state = if states.len() > 1 {
            states.pop_front().expect("non-empty script")
        } else {
            *states.front().expect("non-empty script")
        };
        Ok(ExecutionStatus {
            state,
            reason: self.reason.clone(),
        })
    }

    async fn execution_statistics(&self, _execution_id: &str) -> Result<ExecutionStatistics> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.statistics)
    }

    async fn fetch_results(&self, _execution_id: &str, _max_results: i32) -> Result<RawResultSet> {
        self.result_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.results.clone())
    }
}

/// A raw result set with a header row and two data rows over columns a, b.
pub fn sample_result_set() -> RawResultSet {
    RawResultSet {
        columns: vec!["a".to_string(), "b".to_string()],
        rows: vec![
            vec![Some("a".to_string()), Some("b".to_string())],
            vec![Some("1".to_string()), Some("x".to_string())],
            vec![Some("2".to_string()), Some("y".to_string())],
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_request_builder_sets_fields() {
        let request = api_request("POST", "/api/securitylake/query", Some("{}"));
        assert_eq!(request.http_method, "POST");
        assert_eq!(request.path, "/api/securitylake/query");
        assert_eq!(request.body.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn scripted_engine_repeats_last_state() {
        let engine = ScriptedQueryEngine::new([ExecutionState::Running]);
        for _ in 0..3 {
            let status = engine.execution_status("exec").await.expect("status");
            assert_eq!(status.state, ExecutionState::Running);
        }
        assert_eq!(engine.status_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stub_catalog_reports_missing_database() {
        let catalog = StubTableCatalog::missing();
        let err = catalog.list_tables("db").await.expect_err("missing");
        assert!(matches!(err, Error::DatabaseNotFound { .. }));
    }
}
