//! Shared infrastructure for the Security Lake dashboard Lambda.
//!
//! This crate provides the HTTP glue between API Gateway's proxy protocol
//! and the handlers:
//!
//! - [`ApiRequest`] / [`ApiResponse`]: the proxy event envelope, with the
//!   permissive cross-origin headers every response carries
//! - [`init_tracing`]: JSON-formatted tracing for CloudWatch Logs
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides scripted implementations of the
//! `lakedash-lib` service traits. Enable the `test-utils` feature to access
//! it from dependent crates.

#![deny(warnings)]

mod response;
mod tracing_init;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use response::{ApiRequest, ApiResponse};
pub use tracing_init::init_tracing;
