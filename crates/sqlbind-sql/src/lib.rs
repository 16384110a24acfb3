//! SQL semantic analysis
//!
//! This crate handles:
//! - Parsing SQL using sqlparser (MySQL and SQLite dialects)
//! - Resolving column references through nested and correlated scopes
//! - Inferring the type and nullability of every output column
//! - Inferring the type of every placeholder from its syntactic context
//! - Deciding whether a statement is bounded to at most one row
//!
//! The entry point is [`analyze_sql`], or [`QueryAnalyzer`] when the
//! caller already holds a parsed statement.

pub mod analyzer;
pub mod error;
pub mod parser;
pub mod scope;

mod cardinality;
mod infer;
mod params;

pub use analyzer::{analyze_sql, QueryAnalyzer};
pub use error::AnalyzeError;
pub use parser::{ParseError, ParsedSql, SqlParser};
pub use scope::{Scope, ScopeColumn, ScopeSource, SourceKind};
