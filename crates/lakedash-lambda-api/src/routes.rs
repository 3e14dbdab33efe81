//! Request routing and operation handlers.
//!
//! The route set is closed and small, so dispatch is a match over
//! (method, path) rather than framework routing. Every response, including
//! errors, goes through [`ApiResponse`] and therefore carries the CORS
//! headers.

use std::sync::Arc;

use http::{Method, StatusCode};
use serde::Deserialize;
use tracing::{error, info};

use lakedash_lambda_shared::{ApiRequest, ApiResponse};
use lakedash_lib::{
    poll_to_completion, Config, Error, LakeAdmin, PollConfig, QueryEngine, QueryRegistry,
    TableCatalog,
};

use crate::models::{
    ErrorBody, NotFoundBody, QueriesResponse, QuerySummary, RunQueryResponse, SourcesResponse,
    StatusResponse, TablesResponse,
};

/// Long-lived services shared across invocations.
///
/// Constructed once at cold start; everything here is read-only afterwards,
/// so concurrent invocations can share it freely.
pub struct AppServices {
    config: Config,
    registry: QueryRegistry,
    poll: PollConfig,
    lake: Arc<dyn LakeAdmin>,
    catalog: Arc<dyn TableCatalog>,
    engine: Arc<dyn QueryEngine>,
}

impl AppServices {
    pub fn new(
        config: Config,
        lake: Arc<dyn LakeAdmin>,
        catalog: Arc<dyn TableCatalog>,
        engine: Arc<dyn QueryEngine>,
    ) -> Self {
        let registry = QueryRegistry::new(&config.database, &config.region);
        Self {
            config,
            registry,
            poll: PollConfig::default(),
            lake,
            catalog,
            engine,
        }
    }

    /// Override poll pacing.
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }
}

/// Route one inbound request to its operation.
pub async fn dispatch(services: &AppServices, request: &ApiRequest) -> ApiResponse {
    info!(method = %request.http_method, path = %request.path, "api request");

    // CORS preflight, regardless of path.
    if request.http_method == Method::OPTIONS.as_str() {
        return ApiResponse::preflight();
    }

    match (request.http_method.as_str(), request.path.as_str()) {
        ("GET", "/api/securitylake/status") => lake_status(services).await,
        ("GET", "/api/securitylake/sources") => lake_sources(services).await,
        ("GET", "/api/securitylake/tables") => lake_tables(services).await,
        ("GET", "/api/securitylake/queries") => available_queries(services),
        ("POST", "/api/securitylake/query") => run_query(services, request).await,
        _ => ApiResponse::json(
            StatusCode::NOT_FOUND,
            &NotFoundBody::for_path(request.path.clone()),
        ),
    }
}

/// GET /api/securitylake/status
async fn lake_status(services: &AppServices) -> ApiResponse {
    match services.lake.data_lake().await {
        Ok(Some(lake)) => ApiResponse::json(StatusCode::OK, &StatusResponse::enabled(lake)),
        Ok(None) => ApiResponse::json(
            StatusCode::OK,
            &StatusResponse::disabled("Security Lake not configured in this region"),
        ),
        Err(err) => internal_error("data lake lookup failed", err),
    }
}

/// GET /api/securitylake/sources
async fn lake_sources(services: &AppServices) -> ApiResponse {
    match services.lake.log_sources().await {
        Ok(sources) => ApiResponse::json(StatusCode::OK, &SourcesResponse::new(sources)),
        Err(err) => internal_error("log source listing failed", err),
    }
}

/// GET /api/securitylake/tables
async fn lake_tables(services: &AppServices) -> ApiResponse {
    let database = &services.config.database;
    match services.catalog.list_tables(database).await {
        Ok(tables) => ApiResponse::json(
            StatusCode::OK,
            &TablesResponse::listed(database.clone(), tables),
        ),
        // The lake has not provisioned its catalog yet; an expected state,
        // not a fault.
        Err(Error::DatabaseNotFound { .. }) => {
            ApiResponse::json(StatusCode::OK, &TablesResponse::missing())
        }
        Err(err) => internal_error("table listing failed", err),
    }
}

/// GET /api/securitylake/queries
fn available_queries(services: &AppServices) -> ApiResponse {
    let queries = services
        .registry
        .iter()
        .map(QuerySummary::from)
        .collect();
    ApiResponse::json(StatusCode::OK, &QueriesResponse { queries })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunQueryRequest {
    #[serde(default)]
    query_id: Option<String>,
}

/// POST /api/securitylake/query
async fn run_query(services: &AppServices, request: &ApiRequest) -> ApiResponse {
    let body = request.body.as_deref().unwrap_or("{}");
    let parsed: RunQueryRequest = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(err) => {
            error!(error = %err, "run-query body is not valid JSON");
            return ApiResponse::json(
                StatusCode::BAD_REQUEST,
                &ErrorBody::new("Invalid JSON body"),
            );
        }
    };

    let query_id = match parsed.query_id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => {
            return ApiResponse::json(
                StatusCode::BAD_REQUEST,
                &ErrorBody::new("queryId is required"),
            )
        }
    };

    let query = match services.registry.get(query_id) {
        Some(query) => query,
        None => {
            return ApiResponse::json(
                StatusCode::NOT_FOUND,
                &ErrorBody::new(format!("Query '{query_id}' not found")),
            )
        }
    };

    let execution_id = match services
        .engine
        .start_execution(
            &query.sql,
            &services.config.database,
            &services.config.output_location,
        )
        .await
    {
        Ok(execution_id) => execution_id,
        Err(err) => return internal_error("query submission failed", err),
    };

    info!(query_id, execution_id = %execution_id, "query execution started");

    match poll_to_completion(services.engine.as_ref(), &execution_id, &services.poll).await {
        Ok(outcome) => ApiResponse::json(
            StatusCode::OK,
            &RunQueryResponse::from_outcome(query_id, &execution_id, outcome),
        ),
        Err(err) => internal_error("query polling failed", err),
    }
}

fn internal_error(context: &str, err: Error) -> ApiResponse {
    error!(error = %err, context, "request failed");
    ApiResponse::json(
        StatusCode::INTERNAL_SERVER_ERROR,
        &ErrorBody::new(err.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lakedash_lambda_shared::test_utils::{
        api_request, ScriptedQueryEngine, StubLakeAdmin, StubTableCatalog,
    };
    use lakedash_lib::{ExecutionState, LakeStatus, LogSource, TableSummary};
    use serde_json::Value;

    fn services_with(
        lake: StubLakeAdmin,
        catalog: StubTableCatalog,
        engine: ScriptedQueryEngine,
    ) -> AppServices {
        AppServices::new(
            Config::new("us-east-1", "test-results"),
            Arc::new(lake),
            Arc::new(catalog),
            Arc::new(engine),
        )
    }

    fn default_services() -> AppServices {
        services_with(
            StubLakeAdmin::default(),
            StubTableCatalog::default(),
            ScriptedQueryEngine::new([ExecutionState::Succeeded]),
        )
    }

    fn body_json(response: &ApiResponse) -> Value {
        serde_json::from_str(&response.body).expect("body is JSON")
    }

    // ==================== Router Tests ====================

    #[tokio::test]
    async fn options_request_is_preflight_on_any_path() {
        let services = default_services();
        let response = dispatch(&services, &api_request("OPTIONS", "/anywhere", None)).await;
        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "{}");
    }

    #[tokio::test]
    async fn unmatched_route_echoes_the_path() {
        let services = default_services();
        let response = dispatch(&services, &api_request("GET", "/api/other", None)).await;
        assert_eq!(response.status_code, 404);

        let body = body_json(&response);
        assert_eq!(body["error"], "Not found");
        assert_eq!(body["path"], "/api/other");
    }

    #[tokio::test]
    async fn method_mismatch_on_known_path_is_not_found() {
        let services = default_services();
        let response =
            dispatch(&services, &api_request("POST", "/api/securitylake/status", None)).await;
        assert_eq!(response.status_code, 404);

        let get_on_post_route =
            dispatch(&services, &api_request("GET", "/api/securitylake/query", None)).await;
        assert_eq!(get_on_post_route.status_code, 404);
    }

    // ==================== Status Handler Tests ====================

    #[tokio::test]
    async fn status_reports_configured_lake() {
        let lake = StubLakeAdmin {
            lake: Some(LakeStatus {
                create_status: Some("COMPLETED".to_string()),
                region: Some("us-east-1".to_string()),
                retention_days: Some(365),
                s3_bucket_arn: Some("arn:aws:s3:::lake-bucket".to_string()),
                encryption_type: Some("S3_MANAGED_KEY".to_string()),
            }),
            ..StubLakeAdmin::default()
        };
        let services = services_with(
            lake,
            StubTableCatalog::default(),
            ScriptedQueryEngine::new([ExecutionState::Succeeded]),
        );

        let response =
            dispatch(&services, &api_request("GET", "/api/securitylake/status", None)).await;
        assert_eq!(response.status_code, 200);

        let body = body_json(&response);
        assert_eq!(body["enabled"], true);
        assert_eq!(body["createStatus"], "COMPLETED");
        assert_eq!(body["retentionDays"], 365);
        assert_eq!(body["encryptionType"], "S3_MANAGED_KEY");
    }

    #[tokio::test]
    async fn status_reports_unconfigured_lake() {
        let services = default_services();
        let response =
            dispatch(&services, &api_request("GET", "/api/securitylake/status", None)).await;
        assert_eq!(response.status_code, 200);

        let body = body_json(&response);
        assert_eq!(body["enabled"], false);
        assert_eq!(body["message"], "Security Lake not configured in this region");
    }

    #[tokio::test]
    async fn status_maps_service_failure_to_500() {
        let services = services_with(
            StubLakeAdmin::failing("AccessDeniedException"),
            StubTableCatalog::default(),
            ScriptedQueryEngine::new([ExecutionState::Succeeded]),
        );

        let response =
            dispatch(&services, &api_request("GET", "/api/securitylake/status", None)).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(body_json(&response)["error"], "AccessDeniedException");
    }

    // ==================== Sources Handler Tests ====================

    #[tokio::test]
    async fn sources_lists_flattened_log_sources() {
        let lake = StubLakeAdmin {
            sources: vec![LogSource {
                account_id: Some("123456789012".to_string()),
                region: Some("us-east-1".to_string()),
                source_name: Some("CLOUD_TRAIL_MGMT".to_string()),
                source_version: Some("2.0".to_string()),
            }],
            ..StubLakeAdmin::default()
        };
        let services = services_with(
            lake,
            StubTableCatalog::default(),
            ScriptedQueryEngine::new([ExecutionState::Succeeded]),
        );

        let response =
            dispatch(&services, &api_request("GET", "/api/securitylake/sources", None)).await;
        assert_eq!(response.status_code, 200);

        let body = body_json(&response);
        assert_eq!(body["sources"][0]["accountId"], "123456789012");
        assert_eq!(body["sources"][0]["sourceName"], "CLOUD_TRAIL_MGMT");
        assert_eq!(body["sources"][0]["sourceVersion"], "2.0");
    }

    #[tokio::test]
    async fn sources_maps_service_failure_to_500() {
        let services = services_with(
            StubLakeAdmin::failing("ThrottlingException"),
            StubTableCatalog::default(),
            ScriptedQueryEngine::new([ExecutionState::Succeeded]),
        );

        let response =
            dispatch(&services, &api_request("GET", "/api/securitylake/sources", None)).await;
        assert_eq!(response.status_code, 500);
    }

    // ==================== Tables Handler Tests ====================

    #[tokio::test]
    async fn tables_lists_the_database() {
        let catalog = StubTableCatalog {
            tables: vec![TableSummary {
                name: "amazon_security_lake_table_us_east_1_cloud_trail_mgmt_2_0".to_string(),
                create_time: Some("2026-01-15T10:00:00Z".to_string()),
                update_time: None,
                table_type: Some("EXTERNAL_TABLE".to_string()),
            }],
            ..StubTableCatalog::default()
        };
        let services = services_with(
            StubLakeAdmin::default(),
            catalog,
            ScriptedQueryEngine::new([ExecutionState::Succeeded]),
        );

        let response =
            dispatch(&services, &api_request("GET", "/api/securitylake/tables", None)).await;
        assert_eq!(response.status_code, 200);

        let body = body_json(&response);
        assert_eq!(body["database"], "amazon_security_lake_glue_db_us_east_1");
        assert_eq!(
            body["tables"][0]["name"],
            "amazon_security_lake_table_us_east_1_cloud_trail_mgmt_2_0"
        );
        assert_eq!(body["tables"][0]["tableType"], "EXTERNAL_TABLE");
        assert!(body["tables"][0]["updateTime"].is_null());
    }

    #[tokio::test]
    async fn missing_database_is_benign_not_an_error() {
        let services = services_with(
            StubLakeAdmin::default(),
            StubTableCatalog::missing(),
            ScriptedQueryEngine::new([ExecutionState::Succeeded]),
        );

        let response =
            dispatch(&services, &api_request("GET", "/api/securitylake/tables", None)).await;
        assert_eq!(response.status_code, 200);

        let body = body_json(&response);
        assert!(body["database"].is_null());
        assert_eq!(body["tables"].as_array().map(Vec::len), Some(0));
        assert_eq!(body["message"], "Security Lake Glue database not found");
    }

    #[tokio::test]
    async fn other_catalog_failures_are_500() {
        let services = services_with(
            StubLakeAdmin::default(),
            StubTableCatalog::failing("InternalServiceException"),
            ScriptedQueryEngine::new([ExecutionState::Succeeded]),
        );

        let response =
            dispatch(&services, &api_request("GET", "/api/securitylake/tables", None)).await;
        assert_eq!(response.status_code, 500);
        assert_eq!(body_json(&response)["error"], "InternalServiceException");
    }

    // ==================== List-Queries Handler Tests ====================

    #[tokio::test]
    async fn queries_returns_every_registered_definition() {
        let services = default_services();
        let response =
            dispatch(&services, &api_request("GET", "/api/securitylake/queries", None)).await;
        assert_eq!(response.status_code, 200);

        let body = body_json(&response);
        let listed: Vec<&str> = body["queries"]
            .as_array()
            .expect("queries is an array")
            .iter()
            .map(|q| q["id"].as_str().expect("id is a string"))
            .collect();
        let registered: Vec<&str> = services.registry.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(listed, registered);

        let first = &body["queries"][0];
        assert_eq!(first["id"], "cloudtrail-event-count");
        assert_eq!(first["name"], "CloudTrail Event Count by Day");
        assert!(first["description"].as_str().is_some());
        assert!(first.get("sql").is_none(), "sql text is not exposed");
    }

    // ==================== Run-Query Validation Tests ====================

    #[tokio::test]
    async fn run_query_rejects_invalid_json_body() {
        let services = default_services();
        let response = dispatch(
            &services,
            &api_request("POST", "/api/securitylake/query", Some("not json")),
        )
        .await;

        assert_eq!(response.status_code, 400);
        assert_eq!(body_json(&response)["error"], "Invalid JSON body");
    }

    #[tokio::test]
    async fn run_query_requires_query_id() {
        let services = default_services();

        for body in ["{}", r#"{"queryId":""}"#] {
            let response = dispatch(
                &services,
                &api_request("POST", "/api/securitylake/query", Some(body)),
            )
            .await;
            assert_eq!(response.status_code, 400);
            assert_eq!(body_json(&response)["error"], "queryId is required");
        }
    }

    #[tokio::test]
    async fn missing_body_is_treated_as_missing_query_id() {
        let services = default_services();
        let response =
            dispatch(&services, &api_request("POST", "/api/securitylake/query", None)).await;
        assert_eq!(response.status_code, 400);
        assert_eq!(body_json(&response)["error"], "queryId is required");
    }

    #[tokio::test]
    async fn run_query_echoes_unknown_id_in_404() {
        let services = default_services();
        let response = dispatch(
            &services,
            &api_request(
                "POST",
                "/api/securitylake/query",
                Some(r#"{"queryId":"no-such-query"}"#),
            ),
        )
        .await;

        assert_eq!(response.status_code, 404);
        assert_eq!(body_json(&response)["error"], "Query 'no-such-query' not found");
    }
}
