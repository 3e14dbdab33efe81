//! Pre-written analytical queries against the Security Lake tables.
//!
//! Query text follows the AWS Security Lake subscriber query examples for
//! OCSF 1.1.0 / source version 2 data. The set is built once at startup and
//! never mutated; ids are the only externally visible handle.

use indexmap::IndexMap;

/// A named, immutable query template plus metadata.
#[derive(Debug, Clone)]
pub struct QueryDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub sql: String,
}

/// Process-lifetime registry of query definitions, keyed by id.
///
/// Iteration follows declaration order, which is also the order the
/// list-queries endpoint reports.
#[derive(Debug, Clone)]
pub struct QueryRegistry {
    queries: IndexMap<String, QueryDefinition>,
}

impl QueryRegistry {
    /// Build the built-in query set for a database and region.
    ///
    /// Table names are derived from the region by the Security Lake naming
    /// scheme (`-` replaced with `_`); the database name is passed in so a
    /// resource-link override applies to queries as well.
    pub fn new(database: &str, region: &str) -> Self {
        let token = region.replace('-', "_");
        let cloudtrail = format!("amazon_security_lake_table_{token}_cloud_trail_mgmt_2_0");
        let findings = format!("amazon_security_lake_table_{token}_sh_findings_2_0");

        let mut queries = IndexMap::new();
        for query in builtin_queries(database, &cloudtrail, &findings) {
            queries.insert(query.id.clone(), query);
        }
        Self { queries }
    }

    /// Look up a definition by id.
    pub fn get(&self, id: &str) -> Option<&QueryDefinition> {
        self.queries.get(id)
    }

    /// Definitions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &QueryDefinition> {
        self.queries.values()
    }

    /// Number of registered queries.
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

fn builtin_queries(database: &str, cloudtrail: &str, findings: &str) -> Vec<QueryDefinition> {
    let def = |id: &str, name: &str, description: &str, sql: String| QueryDefinition {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        sql,
    };

    vec![
        // Health check: verify data is flowing at all.
        def(
            "cloudtrail-event-count",
            "CloudTrail Event Count by Day",
            "Verify CloudTrail data is flowing - shows event counts per day",
            format!(
                r#"SELECT
    DATE(time_dt) as event_date,
    COUNT(*) as event_count
FROM "{database}"."{cloudtrail}"
WHERE time_dt BETWEEN CURRENT_TIMESTAMP - INTERVAL '7' DAY AND CURRENT_TIMESTAMP
GROUP BY DATE(time_dt)
ORDER BY event_date DESC"#
            ),
        ),
        def(
            "unauthorized-attempts",
            "Unauthorized Attempts (7 days)",
            "Access denied and unauthorized operation errors",
            format!(
                r#"SELECT
    time_dt,
    api.service.name as service,
    api.operation,
    api.response.error as error,
    api.response.message as message,
    cloud.region,
    actor.user.uid as user_id,
    src_endpoint.ip as source_ip,
    http_request.user_agent
FROM "{database}"."{cloudtrail}"
WHERE time_dt BETWEEN CURRENT_TIMESTAMP - INTERVAL '7' DAY AND CURRENT_TIMESTAMP
AND api.response.error IN (
    'Client.UnauthorizedOperation',
    'Client.InvalidPermission.NotFound',
    'Client.OperationNotPermitted',
    'AccessDenied')
ORDER BY time_dt DESC
LIMIT 25"#
            ),
        ),
        def(
            "iam-activity",
            "IAM Activity (7 days)",
            "All IAM service API calls",
            format!(
                r#"SELECT
    time_dt,
    api.operation,
    actor.user.uid as user_id,
    src_endpoint.ip as source_ip,
    cloud.region,
    status
FROM "{database}"."{cloudtrail}"
WHERE time_dt BETWEEN CURRENT_TIMESTAMP - INTERVAL '7' DAY AND CURRENT_TIMESTAMP
AND api.service.name = 'iam.amazonaws.com'
ORDER BY time_dt DESC
LIMIT 25"#
            ),
        ),
        def(
            "failed-records",
            "Failed CloudTrail Records (7 days)",
            "Operations that failed",
            format!(
                r#"SELECT
    time_dt,
    api.service.name as service,
    api.operation,
    actor.user.uid as user_id,
    actor.user.account.uid as account_id,
    cloud.region,
    api.response.error as error
FROM "{database}"."{cloudtrail}"
WHERE status = 'Failure'
AND time_dt BETWEEN CURRENT_TIMESTAMP - INTERVAL '7' DAY AND CURRENT_TIMESTAMP
ORDER BY time_dt DESC
LIMIT 25"#
            ),
        ),
        def(
            "sh-medium-severity",
            "Security Hub Findings >= Medium (7 days)",
            "New findings with severity Medium or higher",
            format!(
                r#"SELECT
    time_dt,
    finding_info.title,
    severity,
    severity_id,
    status
FROM "{database}"."{findings}"
WHERE time_dt BETWEEN CURRENT_TIMESTAMP - INTERVAL '7' DAY AND CURRENT_TIMESTAMP
    AND severity_id >= 3
    AND status = 'New'
ORDER BY time_dt DESC
LIMIT 25"#
            ),
        ),
        def(
            "sh-products-count",
            "Security Hub Products Sending Findings",
            "Count of findings by product source",
            format!(
                r#"SELECT
    metadata.product.name as product_name,
    COUNT(*) as finding_count
FROM "{database}"."{findings}"
WHERE time_dt BETWEEN CURRENT_TIMESTAMP - INTERVAL '7' DAY AND CURRENT_TIMESTAMP
GROUP BY metadata.product.name
ORDER BY finding_count DESC
LIMIT 25"#
            ),
        ),
        def(
            "data-freshness",
            "Data Freshness Check",
            "Most recent event timestamp per source",
            format!(
                r#"SELECT 'CloudTrail' as source, MAX(time_dt) as latest_event
FROM "{database}"."{cloudtrail}"
WHERE time_dt BETWEEN CURRENT_TIMESTAMP - INTERVAL '1' DAY AND CURRENT_TIMESTAMP
UNION ALL
SELECT 'Security Hub' as source, MAX(time_dt) as latest_event
FROM "{database}"."{findings}"
WHERE time_dt BETWEEN CURRENT_TIMESTAMP - INTERVAL '1' DAY AND CURRENT_TIMESTAMP"#
            ),
        ),
    ]
}
