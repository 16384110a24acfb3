//! Schema catalog: the read-only snapshot of table/column metadata
//!
//! The catalog is loaded by an external collaborator (INFORMATION_SCHEMA
//! or PRAGMA queries) and consumed read-only during analysis.

use serde::{Deserialize, Serialize};

use crate::types::SqlType;

/// Key constraint carried by a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKey {
    None,
    Primary,
    Unique,
    /// SQLite virtual-table column (e.g. full-text search); never
    /// key-bearing for cardinality purposes.
    VirtualTable,
}

/// One physical or virtual column as reported by the schema loader.
/// Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub schema: String,
    pub table: String,
    pub column: String,
    pub column_type: SqlType,
    pub not_null: bool,
    pub key: ColumnKey,
    pub autoincrement: bool,
}

impl ColumnInfo {
    /// Create a nullable, unkeyed column; refine with the builder methods.
    pub fn new(table: impl Into<String>, column: impl Into<String>, column_type: SqlType) -> Self {
        Self {
            schema: String::new(),
            table: table.into(),
            column: column.into(),
            column_type,
            not_null: false,
            key: ColumnKey::None,
            autoincrement: false,
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn with_key(mut self, key: ColumnKey) -> Self {
        self.key = key;
        self
    }

    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }
}

/// In-memory index of the loaded schema.
///
/// Identifier matching is ASCII-case-insensitive; column order within a
/// table is the order the loader supplied, which callers rely on for
/// wildcard expansion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    columns: Vec<ColumnInfo>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_columns(columns: Vec<ColumnInfo>) -> Self {
        Self { columns }
    }

    /// All columns of a table, in load order. An optional schema
    /// qualifier restricts the match.
    pub fn lookup(&self, schema: Option<&str>, table: &str) -> Vec<&ColumnInfo> {
        self.columns
            .iter()
            .filter(|c| {
                c.table.eq_ignore_ascii_case(table)
                    && schema.map_or(true, |s| c.schema.eq_ignore_ascii_case(s))
            })
            .collect()
    }

    /// Find a single column by table and column name.
    pub fn find_column(&self, table: &str, column: &str) -> Option<&ColumnInfo> {
        self.columns
            .iter()
            .find(|c| c.table.eq_ignore_ascii_case(table) && c.column.eq_ignore_ascii_case(column))
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.columns.iter().any(|c| c.table.eq_ignore_ascii_case(table))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::from_columns(vec![
            ColumnInfo::new("users", "id", SqlType::Int)
                .not_null()
                .with_key(ColumnKey::Primary),
            ColumnInfo::new("users", "name", SqlType::Varchar),
            ColumnInfo::new("orders", "id", SqlType::Int)
                .not_null()
                .with_key(ColumnKey::Primary)
                .with_schema("shop"),
        ])
    }

    #[test]
    fn lookup_preserves_order() {
        let catalog = sample();
        let cols = catalog.lookup(None, "users");
        assert_eq!(cols.len(), 2);
        assert_eq!(cols[0].column, "id");
        assert_eq!(cols[1].column, "name");
    }

    #[test]
    fn lookup_with_schema_qualifier() {
        let catalog = sample();
        assert_eq!(catalog.lookup(Some("shop"), "orders").len(), 1);
        assert!(catalog.lookup(Some("other"), "orders").is_empty());
    }

    #[test]
    fn find_column_is_case_insensitive() {
        let catalog = sample();
        assert!(catalog.find_column("USERS", "Name").is_some());
        assert!(catalog.find_column("users", "missing").is_none());
    }

    #[test]
    fn table_presence() {
        let catalog = sample();
        assert!(catalog.has_table("Users"));
        assert!(!catalog.has_table("missing"));
        assert!(!catalog.is_empty());
        assert!(Catalog::new().is_empty());
    }
}
