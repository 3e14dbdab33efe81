//! Asynchronous query engine abstraction.
//!
//! Submissions are fire-and-forget: the engine returns an opaque execution
//! id immediately and the caller observes progress through status checks.
//! See [`crate::poll`] for the bounded wait built on top of this trait.

use async_trait::async_trait;

use crate::error::Result;

/// Lifecycle state of one query execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    /// The engine is still working (includes queued-but-not-started).
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl ExecutionState {
    /// Lowercase wire name used in response payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionState::Running => "running",
            ExecutionState::Succeeded => "succeeded",
            ExecutionState::Failed => "failed",
            ExecutionState::Cancelled => "cancelled",
        }
    }

    /// Whether the engine will make no further progress on this execution.
    pub fn is_terminal(self) -> bool {
        !matches!(self, ExecutionState::Running)
    }
}

/// Point-in-time status of one execution.
#[derive(Debug, Clone)]
pub struct ExecutionStatus {
    pub state: ExecutionState,
    /// Engine-reported reason for a failed or cancelled execution.
    pub reason: Option<String>,
}

/// Engine-side statistics for a completed execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionStatistics {
    pub execution_time_ms: Option<i64>,
    pub data_scanned_bytes: Option<i64>,
}

/// Raw tabular output as returned by the engine.
///
/// Cells are positional; the first row is column metadata, never data.
#[derive(Debug, Clone, Default)]
pub struct RawResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// An external engine that executes opaque SQL strings asynchronously.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Submit a query for execution; returns the execution id immediately.
    async fn start_execution(
        &self,
        sql: &str,
        database: &str,
        output_location: &str,
    ) -> Result<String>;

    /// Current status of an execution.
    async fn execution_status(&self, execution_id: &str) -> Result<ExecutionStatus>;

    /// Statistics for an execution, meaningful once it has succeeded.
    async fn execution_statistics(&self, execution_id: &str) -> Result<ExecutionStatistics>;

    /// Fetch up to `max_results` raw rows, header row included.
    async fn fetch_results(&self, execution_id: &str, max_results: i32) -> Result<RawResultSet>;
}
