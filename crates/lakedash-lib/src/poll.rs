//! Bounded polling of an asynchronous query execution.
//!
//! The handler's only suspension point lives here: between status checks the
//! task sleeps for a fixed interval, up to a total waiting budget. When the
//! budget runs out the execution is left running server-side and the caller
//! is told to check back with the execution id; no cancellation is issued.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::engine::{ExecutionState, ExecutionStatistics, QueryEngine};
use crate::error::Result;
use crate::results::ResultTable;

/// Maximum raw rows fetched from the engine, header row included.
pub const MAX_RESULT_ROWS: i32 = 100;

/// Poll pacing for [`poll_to_completion`].
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Wait between consecutive status checks.
    pub interval: Duration,
    /// Total waiting budget before the caller is told to check back later.
    pub max_wait: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_wait: Duration::from_secs(30),
        }
    }
}

/// Terminal (or abandoned) outcome of one polled execution.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    Succeeded {
        table: ResultTable,
        statistics: ExecutionStatistics,
    },
    Failed {
        reason: String,
    },
    Cancelled {
        reason: String,
    },
    /// The waiting budget ran out while the engine was still working. The
    /// execution keeps running server-side.
    TimedOut,
}

/// Drive one execution to completion or to the end of the waiting budget.
///
/// Checks status immediately, then sleeps [`PollConfig::interval`] between
/// checks. On success the results (capped at [`MAX_RESULT_ROWS`] raw rows)
/// and statistics are fetched exactly once each. Engine errors propagate
/// immediately; there are no retries at this layer.
pub async fn poll_to_completion(
    engine: &dyn QueryEngine,
    execution_id: &str,
    config: &PollConfig,
) -> Result<QueryOutcome> {
    let mut waited = Duration::ZERO;

    while waited < config.max_wait {
        let status = engine.execution_status(execution_id).await?;
        match status.state {
            ExecutionState::Succeeded => {
                let raw = engine.fetch_results(execution_id, MAX_RESULT_ROWS).await?;
                let statistics = engine.execution_statistics(execution_id).await?;
                let table = ResultTable::from_raw(&raw);
                info!(execution_id, rows = table.row_count(), "query execution succeeded");
                return Ok(QueryOutcome::Succeeded { table, statistics });
            }
            ExecutionState::Failed => {
                return Ok(QueryOutcome::Failed {
                    reason: reason_or_unknown(status.reason),
                });
            }
            ExecutionState::Cancelled => {
                return Ok(QueryOutcome::Cancelled {
                    reason: reason_or_unknown(status.reason),
                });
            }
            ExecutionState::Running => {
                debug!(
                    execution_id,
                    waited_ms = waited.as_millis() as u64,
                    "execution still running"
                );
            }
        }

        sleep(config.interval).await;
        waited += config.interval;
    }

    info!(execution_id, "waiting budget exhausted, leaving execution running");
    Ok(QueryOutcome::TimedOut)
}

fn reason_or_unknown(reason: Option<String>) -> String {
    reason.unwrap_or_else(|| "Unknown error".to_string())
}
