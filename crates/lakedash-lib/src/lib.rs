//! Core library for the Security Lake dashboard API.
//!
//! This crate holds everything that does not touch AWS directly:
//!
//! - [`QueryRegistry`]: the immutable set of pre-written analytical queries
//! - [`Config`]: environment-backed runtime configuration
//! - [`poll_to_completion`]: bounded polling of an asynchronous execution
//! - [`ResultTable`]: reshaping of raw engine output into row-object form
//! - Service traits ([`LakeAdmin`], [`TableCatalog`], [`QueryEngine`]) that
//!   the Lambda crate implements against the AWS SDK and tests implement
//!   with scripted stubs
//!
//! # Architecture
//!
//! The Lambda handlers are thin: they parse the inbound envelope, call into
//! this crate through the service traits, and format the response. All
//! control flow with any state-machine character (the execution poll loop)
//! lives here so it can be unit tested without AWS.

#![deny(warnings)]

pub mod config;
pub mod engine;
pub mod error;
pub mod lake;
pub mod poll;
pub mod queries;
pub mod results;
pub mod tables;

pub use config::{glue_database_name, Config};
pub use engine::{
    ExecutionState, ExecutionStatistics, ExecutionStatus, QueryEngine, RawResultSet,
};
pub use error::{Error, Result};
pub use lake::{LakeAdmin, LakeStatus, LogSource};
pub use poll::{poll_to_completion, PollConfig, QueryOutcome, MAX_RESULT_ROWS};
pub use queries::{QueryDefinition, QueryRegistry};
pub use results::ResultTable;
pub use tables::{TableCatalog, TableSummary};
