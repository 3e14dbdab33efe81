//! Catalog (table metadata) abstraction.

use async_trait::async_trait;

use crate::error::Result;

/// Summary of one catalog table.
#[derive(Debug, Clone, Default)]
pub struct TableSummary {
    pub name: String,
    /// RFC 3339 creation timestamp, when the catalog reports one.
    pub create_time: Option<String>,
    pub update_time: Option<String>,
    pub table_type: Option<String>,
}

/// Schema registry mapping table names to physical data locations.
#[async_trait]
pub trait TableCatalog: Send + Sync {
    /// List the tables in `database`.
    ///
    /// Returns [`crate::Error::DatabaseNotFound`] when the database itself
    /// does not exist, which callers treat as a benign state rather than a
    /// fault.
    async fn list_tables(&self, database: &str) -> Result<Vec<TableSummary>>;
}
