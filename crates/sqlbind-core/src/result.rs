//! Result descriptor produced by the analysis engine
//!
//! `QueryInfo` is the sole externally visible artifact: code generators
//! render it into target-language bindings. It serializes in camelCase
//! so generator tooling sees the conventional field names.

use serde::{Deserialize, Serialize};

use crate::types::SqlType;

/// Statement kind of the analyzed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryKind {
    Select,
    Insert,
    Update,
    Delete,
}

/// One projected output column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    /// Output name: the alias when given, otherwise the expression text.
    pub name: String,
    pub column_type: SqlType,
    pub not_null: bool,
    /// Source alias for direct column references (including derived-table
    /// aliases); empty for computed expressions, literals, and subquery
    /// results.
    pub table: String,
}

/// One placeholder binding.
///
/// Named and positional placeholders both reduce to this shape; duplicate
/// named placeholders get one entry per occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDef {
    /// 1-based ordinal of the placeholder in source order.
    pub position: usize,
    pub column_type: SqlType,
    pub not_null: bool,
}

/// Full analysis result for one top-level statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryInfo {
    pub kind: QueryKind,
    /// False only when the statement is provably bounded to at most one
    /// row; true is the conservative default.
    pub multiple_rows_result: bool,
    pub columns: Vec<ColumnDef>,
    pub parameters: Vec<ParameterDef>,
    /// When a trailing `ORDER BY ?` placeholder is present: every column
    /// name and qualified name it could legally bind to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by_columns: Option<Vec<String>>,
}
