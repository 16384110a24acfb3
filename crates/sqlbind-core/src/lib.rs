//! sqlbind core
//!
//! Stable domain model shared by the analysis engine and its consumers:
//! the scalar type system, the schema catalog, and the result descriptor
//! that code generators consume. Everything here is plain data - the
//! inference logic lives in `sqlbind-sql`.

pub mod catalog;
pub mod result;
pub mod types;

pub use catalog::{Catalog, ColumnInfo, ColumnKey};
pub use result::{ColumnDef, ParameterDef, QueryInfo, QueryKind};
pub use types::{Dialect, SqlType};
