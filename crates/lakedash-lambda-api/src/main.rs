//! Binary entry point for the dashboard API Lambda.

use lambda_runtime::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    lakedash_lambda_api::run().await
}
