//! API Gateway proxy request and response envelopes.

use std::collections::BTreeMap;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Inbound API Gateway proxy event, reduced to the fields routing needs.
///
/// Fields the gateway omits default to empty so routing stays total.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    /// HTTP method of the inbound request.
    #[serde(default)]
    pub http_method: String,

    /// Request path, e.g. `/api/securitylake/status`.
    #[serde(default)]
    pub path: String,

    /// Raw request body, when present.
    #[serde(default)]
    pub body: Option<String>,
}

impl ApiRequest {
    /// Build a request for a method and path.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            http_method: method.into(),
            path: path.into(),
            body: None,
        }
    }

    /// Attach a raw body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Outbound API Gateway proxy response.
///
/// Every response carries a JSON content type and permissive cross-origin
/// headers so the dashboard frontend can call the API from any origin.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// JSON-serialized body.
    pub body: String,
}

impl ApiResponse {
    /// Build a response with `body` serialized as JSON.
    pub fn json<T: Serialize>(status: StatusCode, body: &T) -> Self {
        let body = match serde_json::to_string(body) {
            Ok(body) => body,
            Err(e) => {
                return Self {
                    status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                    headers: cors_headers(),
                    body: json!({ "error": format!("response serialization failed: {e}") })
                        .to_string(),
                }
            }
        };

        Self {
            status_code: status.as_u16(),
            headers: cors_headers(),
            body,
        }
    }

    /// Empty 200 response for a CORS preflight request.
    pub fn preflight() -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            headers: cors_headers(),
            body: "{}".to_string(),
        }
    }
}

fn cors_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Content-Type".to_string(), "application/json".to_string()),
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        (
            "Access-Control-Allow-Headers".to_string(),
            "Content-Type,Authorization".to_string(),
        ),
        (
            "Access-Control-Allow-Methods".to_string(),
            "GET,POST,OPTIONS".to_string(),
        ),
    ])
}
