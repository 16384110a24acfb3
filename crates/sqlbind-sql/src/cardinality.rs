//! Row-count analysis for SELECT statements
//!
//! Decides whether a statement can return more than one row. The
//! signals are structural: a `LIMIT 1`, an aggregate projection with no
//! GROUP BY, an absent FROM clause, or a WHERE clause that pins a
//! unique key to a single value.

use sqlparser::ast::{BinaryOperator, Expr, Query, UnaryOperator, Value};

use sqlbind_core::ColumnKey;

use crate::scope::Scope;

/// `LIMIT 1` with a literal row count. A placeholder or any other
/// expression may still produce many rows.
pub(crate) fn limit_is_one(query: &Query) -> bool {
    matches!(
        &query.limit,
        Some(Expr::Value(Value::Number(n, _))) if n == "1"
    )
}

/// Whether a WHERE clause restricts the result to at most one row.
///
/// An equality on a primary or unique key column is a single-row
/// predicate. AND needs only one single-row conjunct. OR never proves
/// a bound: each branch may match a different row, so even two key
/// equalities can select two rows.
pub(crate) fn where_is_single_row(expr: &Expr, scope: &Scope<'_>) -> bool {
    match expr {
        Expr::Nested(inner) => where_is_single_row(inner, scope),
        Expr::BinaryOp { left, op, right } => match op {
            BinaryOperator::And => {
                where_is_single_row(left, scope) || where_is_single_row(right, scope)
            }
            BinaryOperator::Or => false,
            BinaryOperator::Eq => {
                is_unique_key_column(left, scope) || is_unique_key_column(right, scope)
            }
            _ => false,
        },
        Expr::UnaryOp {
            op: UnaryOperator::Not,
            ..
        } => false,
        _ => false,
    }
}

/// A bare column reference carrying a primary or unique key.
fn is_unique_key_column(expr: &Expr, scope: &Scope<'_>) -> bool {
    let (qualifier, name) = match expr {
        Expr::Identifier(ident) => (None, ident.value.as_str()),
        Expr::CompoundIdentifier(parts) if parts.len() == 2 => {
            (Some(parts[0].value.as_str()), parts[1].value.as_str())
        }
        Expr::Nested(inner) => return is_unique_key_column(inner, scope),
        _ => return false,
    };
    match scope.resolve(qualifier, name) {
        Ok(hit) => matches!(hit.column.key, ColumnKey::Primary | ColumnKey::Unique),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::SqlParser;
    use crate::scope::ScopeSource;
    use sqlbind_core::{ColumnInfo, SqlType};
    use sqlparser::ast::{SetExpr, Statement};

    fn scope_with_users() -> Scope<'static> {
        let id = ColumnInfo::new("users", "id", SqlType::Int)
            .not_null()
            .with_key(ColumnKey::Primary);
        let email = ColumnInfo::new("users", "email", SqlType::Varchar)
            .not_null()
            .with_key(ColumnKey::Unique);
        let name = ColumnInfo::new("users", "name", SqlType::Varchar);
        let mut scope = Scope::new();
        scope.push(ScopeSource::from_catalog("users", "users", &[&id, &email, &name]));
        scope
    }

    fn where_clause(sql: &str) -> Expr {
        let parsed = SqlParser::mysql().parse(sql).unwrap();
        let Some(Statement::Query(query)) = parsed.first_statement() else {
            panic!("expected a query");
        };
        let SetExpr::Select(select) = query.body.as_ref() else {
            panic!("expected a plain select");
        };
        select.selection.clone().unwrap()
    }

    #[test]
    fn equality_on_primary_key_is_single_row() {
        let scope = scope_with_users();
        assert!(where_is_single_row(
            &where_clause("SELECT 1 FROM users WHERE id = ?"),
            &scope
        ));
        assert!(where_is_single_row(
            &where_clause("SELECT 1 FROM users WHERE ? = id"),
            &scope
        ));
        assert!(where_is_single_row(
            &where_clause("SELECT 1 FROM users WHERE email = 'a@b'"),
            &scope
        ));
    }

    #[test]
    fn equality_on_plain_column_is_not() {
        let scope = scope_with_users();
        assert!(!where_is_single_row(
            &where_clause("SELECT 1 FROM users WHERE name = ?"),
            &scope
        ));
        assert!(!where_is_single_row(
            &where_clause("SELECT 1 FROM users WHERE id > ?"),
            &scope
        ));
    }

    #[test]
    fn and_or_composition() {
        let scope = scope_with_users();
        assert!(where_is_single_row(
            &where_clause("SELECT 1 FROM users WHERE id = ? AND name = ?"),
            &scope
        ));
        assert!(!where_is_single_row(
            &where_clause("SELECT 1 FROM users WHERE id = ? OR name = ?"),
            &scope
        ));
        // Even two key equalities can hit two distinct rows.
        assert!(!where_is_single_row(
            &where_clause("SELECT 1 FROM users WHERE id = ? OR email = ?"),
            &scope
        ));
    }

    #[test]
    fn literal_limit_one() {
        let parsed = SqlParser::mysql()
            .parse("SELECT name FROM users LIMIT 1")
            .unwrap();
        let Some(Statement::Query(query)) = parsed.first_statement() else {
            panic!("expected a query");
        };
        assert!(limit_is_one(query));

        let parsed = SqlParser::mysql()
            .parse("SELECT name FROM users LIMIT ?")
            .unwrap();
        let Some(Statement::Query(query)) = parsed.first_statement() else {
            panic!("expected a query");
        };
        assert!(!limit_is_one(query));
    }
}
