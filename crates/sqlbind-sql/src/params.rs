//! Placeholder collection in source order
//!
//! Placeholders are assigned positions in the order their SQL text
//! appears, not the order inference happens to visit them. Clause
//! walkers therefore reserve a slot the moment they see a placeholder
//! and patch its type in once the surrounding expression has been
//! typed.

use sqlbind_core::{ParameterDef, SqlType};
use sqlparser::ast::{Expr, Value};

/// Accumulates parameter slots for one statement.
#[derive(Debug, Default)]
pub(crate) struct ParamCollector {
    entries: Vec<ParameterDef>,
}

impl ParamCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next slot with a type, defaulting to a required
    /// (non-null) parameter. Returns the slot index for later patching.
    pub fn push(&mut self, column_type: SqlType) -> usize {
        self.push_typed(column_type, true)
    }

    pub fn push_typed(&mut self, column_type: SqlType, not_null: bool) -> usize {
        let index = self.entries.len();
        self.entries.push(ParameterDef {
            position: index + 1,
            column_type,
            not_null,
        });
        index
    }

    /// Patch a reserved slot with the type learned from context.
    pub fn assign(&mut self, index: usize, column_type: SqlType) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.column_type = column_type;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Drop slots reserved past `mark`. Used when a clause walk is
    /// abandoned and rerun with a coarser strategy.
    pub fn truncate(&mut self, mark: usize) {
        self.entries.truncate(mark);
    }

    /// Move another collector's slots to the end of this one. Lets a
    /// clause that appears later in the SQL text be walked out of order.
    pub fn append(&mut self, mut other: ParamCollector) {
        self.entries.append(&mut other.entries);
    }

    /// Final parameter list with positions renumbered 1-based in slot
    /// order.
    pub fn into_entries(mut self) -> Vec<ParameterDef> {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.position = i + 1;
        }
        self.entries
    }
}

/// Unwrap an expression down to a placeholder token, seeing through
/// parentheses. Returns the raw token (`?`, `?3`, `:name`, `$name`).
pub(crate) fn as_placeholder(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Value(Value::Placeholder(token)) => Some(token),
        Expr::Nested(inner) => as_placeholder(inner),
        _ => None,
    }
}

/// Walk an expression tree and reserve an untyped slot for every
/// placeholder in source order. The fallback when a clause cannot be
/// fully typed: every parameter still gets a position.
pub(crate) fn collect_placeholders(expr: &Expr, params: &mut ParamCollector, fallback: SqlType) {
    if as_placeholder(expr).is_some() {
        params.push(fallback);
        return;
    }
    match expr {
        Expr::BinaryOp { left, right, .. } => {
            collect_placeholders(left, params, fallback);
            collect_placeholders(right, params, fallback);
        }
        Expr::UnaryOp { expr, .. }
        | Expr::Nested(expr)
        | Expr::IsNull(expr)
        | Expr::IsNotNull(expr)
        | Expr::Cast { expr, .. } => collect_placeholders(expr, params, fallback),
        Expr::Between {
            expr, low, high, ..
        } => {
            collect_placeholders(expr, params, fallback);
            collect_placeholders(low, params, fallback);
            collect_placeholders(high, params, fallback);
        }
        Expr::InList { expr, list, .. } => {
            collect_placeholders(expr, params, fallback);
            for item in list {
                collect_placeholders(item, params, fallback);
            }
        }
        Expr::Case {
            operand,
            conditions,
            results,
            else_result,
        } => {
            if let Some(operand) = operand {
                collect_placeholders(operand, params, fallback);
            }
            for (condition, result) in conditions.iter().zip(results.iter()) {
                collect_placeholders(condition, params, fallback);
                collect_placeholders(result, params, fallback);
            }
            if let Some(else_result) = else_result {
                collect_placeholders(else_result, params, fallback);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_renumber_in_slot_order() {
        let mut params = ParamCollector::new();
        let a = params.push(SqlType::Any);
        params.push_typed(SqlType::Varchar, false);
        params.assign(a, SqlType::Int);

        let entries = params.into_entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].position, 1);
        assert_eq!(entries[0].column_type, SqlType::Int);
        assert!(entries[0].not_null);
        assert_eq!(entries[1].position, 2);
        assert!(!entries[1].not_null);
    }

    #[test]
    fn append_keeps_relative_order() {
        let mut main = ParamCollector::new();
        main.push(SqlType::Int);
        let mut tail = ParamCollector::new();
        tail.push(SqlType::Varchar);
        tail.push(SqlType::Double);
        main.append(tail);

        let entries = main.into_entries();
        assert_eq!(
            entries.iter().map(|e| e.column_type).collect::<Vec<_>>(),
            vec![SqlType::Int, SqlType::Varchar, SqlType::Double]
        );
        assert_eq!(entries[2].position, 3);
    }

    #[test]
    fn placeholder_unwraps_parentheses() {
        let inner = Expr::Value(Value::Placeholder("?".into()));
        let nested = Expr::Nested(Box::new(inner));
        assert_eq!(as_placeholder(&nested), Some("?"));
        assert_eq!(as_placeholder(&Expr::Value(Value::Null)), None);
    }
}
