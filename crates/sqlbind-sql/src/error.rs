//! Analysis error taxonomy
//!
//! Only resolution failures and constructs with no safe fallback are
//! errors; every other imprecision degrades to conservative inference
//! (nullable, `any` type, multiple rows) instead of failing.

use crate::parser::ParseError;

#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    /// A column reference cannot be resolved in any reachable scope.
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// An unqualified reference matches more than one source in scope.
    #[error("ambiguous column reference: {0}")]
    AmbiguousColumn(String),

    /// A table or alias is neither in the catalog nor a visible CTE.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// A construct with no inference rule and no safe fallback.
    #[error("unsupported SQL construct: {0}")]
    UnsupportedConstruct(String),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
