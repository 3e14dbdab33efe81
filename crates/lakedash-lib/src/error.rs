use thiserror::Error;

/// Convenient result alias for the dashboard library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The Security Lake Glue database does not exist.
    ///
    /// Listing tables before the lake has provisioned its catalog is an
    /// expected state; handlers map this to an empty listing, not a fault.
    #[error("Security Lake Glue database '{name}' not found")]
    DatabaseNotFound { name: String },

    /// The query engine accepted a submission but reported no execution id.
    #[error("query engine returned no execution id")]
    MissingExecutionId,

    /// The query engine reported no status for a known execution.
    #[error("no status reported for execution {execution_id}")]
    MissingExecutionStatus { execution_id: String },

    /// Any other failure reported by an external service call.
    #[error("{message}")]
    Service { message: String },
}

impl Error {
    /// Wrap an external service failure, preserving its message.
    pub fn service(err: impl std::fmt::Display) -> Self {
        Self::Service {
            message: err.to_string(),
        }
    }
}
