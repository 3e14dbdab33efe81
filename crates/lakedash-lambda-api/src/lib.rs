//! AWS Lambda function serving the Security Lake dashboard API.
//!
//! Routes API Gateway proxy events to five operations:
//!
//! - `GET /api/securitylake/status` - data lake status and configuration
//! - `GET /api/securitylake/sources` - configured log sources
//! - `GET /api/securitylake/tables` - tables in the lake's Glue database
//! - `GET /api/securitylake/queries` - the available pre-written queries
//! - `POST /api/securitylake/query` - run a query through Athena
//!
//! Query-level outcomes (failed, cancelled, still running after the waiting
//! budget) are domain data and ship as HTTP 200 with a `status`
//! discriminator; only validation and infrastructure failures use 4xx/5xx.

#![deny(warnings)]

mod aws;
mod models;
mod routes;

use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};

use lakedash_lambda_shared::{init_tracing, ApiRequest, ApiResponse};
use lakedash_lib::Config;

pub use aws::{AthenaEngine, GlueCatalog, SecurityLakeAdmin};
pub use routes::{dispatch, AppServices};

/// Entry point used by the Lambda runtime.
pub async fn run() -> Result<(), Error> {
    init_tracing();

    let config = Config::from_env();
    tracing::info!(
        region = %config.region,
        database = %config.database,
        output_location = %config.output_location,
        "starting dashboard api"
    );

    let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let lake = Arc::new(SecurityLakeAdmin::new(&sdk_config, &config.region));
    let services = Arc::new(AppServices::new(
        config,
        lake,
        Arc::new(GlueCatalog::new(&sdk_config)),
        Arc::new(AthenaEngine::new(&sdk_config)),
    ));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<ApiRequest>| {
        let services = Arc::clone(&services);
        async move { Ok::<ApiResponse, Error>(dispatch(&services, &event.payload).await) }
    }))
    .await
}
