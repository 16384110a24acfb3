//! Expression type and nullability inference
//!
//! Walks a parsed expression against a scope, producing the type,
//! nullability and owning source of the value it yields. Placeholders
//! encountered along the way are registered with the statement's
//! parameter collector in source order, typed from surrounding context.

use sqlbind_core::{Dialect, SqlType};
use sqlparser::ast::{
    BinaryOperator, DataType, Expr, Function, FunctionArg, FunctionArgExpr, FunctionArguments,
    UnaryOperator, Value,
};

use crate::analyzer::QueryAnalyzer;
use crate::error::AnalyzeError;
use crate::params::{as_placeholder, ParamCollector};
use crate::scope::Scope;

/// The inferred facts about one expression.
#[derive(Debug, Clone)]
pub(crate) struct TypeInfo {
    pub column_type: SqlType,
    pub not_null: bool,
    /// Alias of the source the value comes from, for bare column
    /// references only.
    pub table: Option<String>,
}

impl TypeInfo {
    pub fn new(column_type: SqlType, not_null: bool) -> Self {
        Self {
            column_type,
            not_null,
            table: None,
        }
    }
}

/// Infer the type of one expression, reserving parameter slots for any
/// placeholders it contains. `hint` is the type context imposes on a
/// bare placeholder (the target column of an INSERT, for instance).
pub(crate) fn infer_expr(
    az: &QueryAnalyzer,
    expr: &Expr,
    scope: &Scope<'_>,
    params: &mut ParamCollector,
    hint: Option<SqlType>,
) -> Result<TypeInfo, AnalyzeError> {
    let dialect = az.dialect();
    match expr {
        Expr::Value(Value::Placeholder(_)) => {
            let ty = hint.unwrap_or(SqlType::Any);
            params.push(ty);
            Ok(TypeInfo::new(ty, true))
        }
        Expr::Value(value) => Ok(literal_type(dialect, value)),
        Expr::Identifier(ident) => {
            let hit = scope.resolve(None, &ident.value)?;
            Ok(TypeInfo {
                column_type: hit.column.column_type,
                not_null: hit.column.not_null,
                table: Some(hit.source_alias.to_string()),
            })
        }
        Expr::CompoundIdentifier(parts) => {
            let (qualifier, name) = split_compound(parts)?;
            let hit = scope.resolve(qualifier, name)?;
            Ok(TypeInfo {
                column_type: hit.column.column_type,
                not_null: hit.column.not_null,
                table: Some(hit.source_alias.to_string()),
            })
        }
        Expr::Nested(inner) => infer_expr(az, inner, scope, params, hint),
        Expr::BinaryOp { left, op, right } => infer_binary(az, left, op, right, scope, params),
        Expr::UnaryOp { op, expr } => {
            let inner = infer_expr(az, expr, scope, params, hint)?;
            match op {
                UnaryOperator::Not => Ok(TypeInfo::new(dialect.boolean(), inner.not_null)),
                UnaryOperator::Plus | UnaryOperator::Minus => {
                    Ok(TypeInfo::new(inner.column_type, inner.not_null))
                }
                _ => Ok(TypeInfo::new(SqlType::Any, inner.not_null)),
            }
        }
        Expr::IsNull(inner) | Expr::IsNotNull(inner) => {
            infer_expr(az, inner, scope, params, None)?;
            Ok(TypeInfo::new(dialect.boolean(), true))
        }
        Expr::Between {
            expr, low, high, ..
        } => {
            let operand = infer_typed_with_placeholders(az, expr, scope, params, None)?;
            let hint = Some(operand.column_type);
            infer_typed_with_placeholders(az, low, scope, params, hint)?;
            infer_typed_with_placeholders(az, high, scope, params, hint)?;
            Ok(TypeInfo::new(dialect.boolean(), operand.not_null))
        }
        Expr::InList { expr, list, .. } => {
            let operand = infer_typed_with_placeholders(az, expr, scope, params, None)?;
            for item in list {
                infer_typed_with_placeholders(az, item, scope, params, Some(operand.column_type))?;
            }
            Ok(TypeInfo::new(dialect.boolean(), operand.not_null))
        }
        Expr::InSubquery { expr, subquery, .. } => {
            let operand = infer_expr(az, expr, scope, params, None)?;
            az.analyze_subquery(subquery, scope, params)?;
            Ok(TypeInfo::new(dialect.boolean(), operand.not_null))
        }
        Expr::Exists { subquery, .. } => {
            az.analyze_subquery(subquery, scope, params)?;
            Ok(TypeInfo::new(dialect.boolean(), true))
        }
        Expr::Subquery(query) => {
            let columns = az.analyze_subquery(query, scope, params)?;
            // scalar subquery: first output column, always nullable
            // since an empty result yields NULL
            let ty = columns.first().map_or(SqlType::Any, |c| c.column_type);
            Ok(TypeInfo::new(ty, false))
        }
        Expr::Case {
            operand,
            conditions,
            results,
            else_result,
        } => infer_case(
            az,
            operand.as_deref(),
            conditions,
            results,
            else_result.as_deref(),
            scope,
            params,
        ),
        Expr::Cast {
            expr, data_type, ..
        } => {
            let inner = infer_expr(az, expr, scope, params, None)?;
            Ok(TypeInfo::new(cast_target(dialect, data_type), inner.not_null))
        }
        Expr::Like { expr, pattern, .. } | Expr::ILike { expr, pattern, .. } => {
            let operand = infer_expr(az, expr, scope, params, None)?;
            infer_typed_with_placeholders(az, pattern, scope, params, Some(dialect.varchar()))?;
            Ok(TypeInfo::new(dialect.boolean(), operand.not_null))
        }
        Expr::Substring { expr, .. } | Expr::Trim { expr, .. } => {
            let inner = infer_expr(az, expr, scope, params, None)?;
            Ok(TypeInfo::new(dialect.varchar(), inner.not_null))
        }
        Expr::Function(func) => infer_function(az, func, scope, params),
        Expr::Interval(_) => Ok(TypeInfo::new(dialect.datetime(), true)),
        Expr::Tuple(items) => {
            for item in items {
                infer_expr(az, item, scope, params, None)?;
            }
            Ok(TypeInfo::new(SqlType::Any, true))
        }
        _ => Ok(TypeInfo::new(SqlType::Any, true)),
    }
}

fn split_compound(parts: &[sqlparser::ast::Ident]) -> Result<(Option<&str>, &str), AnalyzeError> {
    match parts {
        [name] => Ok((None, name.value.as_str())),
        [qualifier, name] => Ok((Some(qualifier.value.as_str()), name.value.as_str())),
        // schema.table.column: resolution ignores the schema part
        [_, qualifier, name] => Ok((Some(qualifier.value.as_str()), name.value.as_str())),
        _ => Err(AnalyzeError::UnsupportedConstruct(
            "column reference with more than three parts".into(),
        )),
    }
}

/// Infer `expr` but, if it is a bare placeholder, register it with the
/// given type hint instead of recursing. Keeps placeholder slots in
/// source order while letting the caller decide the type.
fn infer_typed_with_placeholders(
    az: &QueryAnalyzer,
    expr: &Expr,
    scope: &Scope<'_>,
    params: &mut ParamCollector,
    hint: Option<SqlType>,
) -> Result<TypeInfo, AnalyzeError> {
    if as_placeholder(expr).is_some() {
        let ty = hint.unwrap_or(SqlType::Any);
        params.push(ty);
        return Ok(TypeInfo::new(ty, true));
    }
    infer_expr(az, expr, scope, params, hint)
}

fn infer_binary(
    az: &QueryAnalyzer,
    left: &Expr,
    op: &BinaryOperator,
    right: &Expr,
    scope: &Scope<'_>,
    params: &mut ParamCollector,
) -> Result<TypeInfo, AnalyzeError> {
    let dialect = az.dialect();
    match op {
        BinaryOperator::And | BinaryOperator::Or | BinaryOperator::Xor => {
            infer_expr(az, left, scope, params, None)?;
            infer_expr(az, right, scope, params, None)?;
            Ok(TypeInfo::new(dialect.boolean(), true))
        }
        BinaryOperator::Eq
        | BinaryOperator::NotEq
        | BinaryOperator::Lt
        | BinaryOperator::LtEq
        | BinaryOperator::Gt
        | BinaryOperator::GtEq
        | BinaryOperator::Spaceship => {
            let (l, r) = infer_operand_pair(az, left, right, scope, params, None)?;
            Ok(TypeInfo::new(dialect.boolean(), l.not_null && r.not_null))
        }
        BinaryOperator::Plus
        | BinaryOperator::Minus
        | BinaryOperator::Multiply
        | BinaryOperator::Divide
        | BinaryOperator::Modulo => {
            let (l, r) = infer_operand_pair(az, left, right, scope, params, None)?;
            Ok(TypeInfo::new(
                promote_arithmetic(dialect, l.column_type, r.column_type),
                l.not_null && r.not_null,
            ))
        }
        BinaryOperator::StringConcat => {
            let (l, r) = infer_operand_pair(az, left, right, scope, params, Some(dialect.varchar()))?;
            Ok(TypeInfo::new(dialect.varchar(), l.not_null && r.not_null))
        }
        _ => {
            infer_expr(az, left, scope, params, None)?;
            infer_expr(az, right, scope, params, None)?;
            Ok(TypeInfo::new(SqlType::Any, true))
        }
    }
}

/// Infer both sides of a binary operator, typing a placeholder side
/// from the other side. A placeholder on the left reserves its slot
/// before the right side is walked so positions track source order.
fn infer_operand_pair(
    az: &QueryAnalyzer,
    left: &Expr,
    right: &Expr,
    scope: &Scope<'_>,
    params: &mut ParamCollector,
    hint: Option<SqlType>,
) -> Result<(TypeInfo, TypeInfo), AnalyzeError> {
    match (as_placeholder(left), as_placeholder(right)) {
        (Some(_), None) => {
            let slot = params.push(hint.unwrap_or(SqlType::Any));
            let r = infer_expr(az, right, scope, params, hint)?;
            if hint.is_none() {
                params.assign(slot, r.column_type);
            }
            Ok((TypeInfo::new(r.column_type, true), r))
        }
        (None, Some(_)) => {
            let l = infer_expr(az, left, scope, params, hint)?;
            params.push(hint.unwrap_or(l.column_type));
            Ok((l.clone(), TypeInfo::new(l.column_type, true)))
        }
        (Some(_), Some(_)) => {
            let ty = hint.unwrap_or(SqlType::Any);
            params.push(ty);
            params.push(ty);
            Ok((TypeInfo::new(ty, true), TypeInfo::new(ty, true)))
        }
        (None, None) => {
            let l = infer_expr(az, left, scope, params, hint)?;
            let r = infer_expr(az, right, scope, params, hint)?;
            Ok((l, r))
        }
    }
}

fn infer_case(
    az: &QueryAnalyzer,
    operand: Option<&Expr>,
    conditions: &[Expr],
    results: &[Expr],
    else_result: Option<&Expr>,
    scope: &Scope<'_>,
    params: &mut ParamCollector,
) -> Result<TypeInfo, AnalyzeError> {
    if let Some(operand) = operand {
        infer_expr(az, operand, scope, params, None)?;
    }

    // Placeholder branches reserve their slot inline and get patched
    // with the promoted branch type once every branch has been typed.
    let mut branch_types: Vec<SqlType> = Vec::new();
    let mut placeholder_slots: Vec<usize> = Vec::new();
    let mut all_not_null = true;

    for (condition, result) in conditions.iter().zip(results.iter()) {
        infer_expr(az, condition, scope, params, None)?;
        if as_placeholder(result).is_some() {
            placeholder_slots.push(params.push(SqlType::Any));
            continue;
        }
        let info = infer_expr(az, result, scope, params, None)?;
        branch_types.push(info.column_type);
        all_not_null &= info.not_null;
    }
    match else_result {
        Some(expr) if as_placeholder(expr).is_some() => {
            placeholder_slots.push(params.push(SqlType::Any));
        }
        Some(expr) => {
            let info = infer_expr(az, expr, scope, params, None)?;
            branch_types.push(info.column_type);
            all_not_null &= info.not_null;
        }
        // no ELSE: an unmatched row yields NULL
        None => all_not_null = false,
    }

    let merged = branch_types
        .into_iter()
        .fold(None, |acc: Option<SqlType>, ty| {
            Some(acc.map_or(ty, |prev| promote_common(prev, ty)))
        })
        .unwrap_or(SqlType::Any);
    for slot in placeholder_slots {
        params.assign(slot, merged);
    }
    Ok(TypeInfo::new(merged, all_not_null))
}

fn infer_function(
    az: &QueryAnalyzer,
    func: &Function,
    scope: &Scope<'_>,
    params: &mut ParamCollector,
) -> Result<TypeInfo, AnalyzeError> {
    let dialect = az.dialect();
    let name = func
        .name
        .0
        .last()
        .map(|i| i.value.to_ascii_uppercase())
        .unwrap_or_default();
    let args = function_arg_exprs(&func.args);
    let windowed = func.over.is_some();

    // windowed ranking functions take no typed argument
    if windowed {
        match name.as_str() {
            "ROW_NUMBER" | "RANK" | "DENSE_RANK" | "NTILE" => {
                return Ok(TypeInfo::new(SqlType::BigInt, true));
            }
            "FIRST_VALUE" | "LAST_VALUE" | "LAG" | "LEAD" | "NTH_VALUE" => {
                // the frame may be empty, so the result is nullable
                // whatever the argument's nullability says
                let ty = match args.first() {
                    Some(arg) => infer_expr(az, arg, scope, params, None)?.column_type,
                    None => SqlType::Any,
                };
                for arg in args.iter().skip(1) {
                    infer_expr(az, arg, scope, params, None)?;
                }
                return Ok(TypeInfo::new(ty, false));
            }
            _ => {}
        }
    }

    match name.as_str() {
        "COUNT" => {
            for arg in &args {
                infer_expr(az, arg, scope, params, None)?;
            }
            Ok(TypeInfo::new(SqlType::BigInt, true))
        }
        "SUM" | "AVG" => {
            let ty = match args.first() {
                Some(arg) => infer_expr(az, arg, scope, params, None)?.column_type,
                None => SqlType::Any,
            };
            let out = match dialect {
                Dialect::MySql => {
                    if matches!(ty, SqlType::Double | SqlType::Float) {
                        SqlType::Double
                    } else {
                        SqlType::Decimal
                    }
                }
                Dialect::Sqlite => {
                    if name == "AVG" || !ty.is_integer() {
                        SqlType::Real
                    } else {
                        SqlType::Integer
                    }
                }
            };
            // NULL over an empty or all-NULL group
            Ok(TypeInfo::new(out, false))
        }
        "MIN" | "MAX" => {
            let info = match args.first() {
                Some(arg) => infer_expr(az, arg, scope, params, None)?,
                None => TypeInfo::new(SqlType::Any, false),
            };
            Ok(TypeInfo::new(info.column_type, false))
        }
        "GROUP_CONCAT" => {
            for arg in &args {
                infer_expr(az, arg, scope, params, Some(dialect.varchar()))?;
            }
            Ok(TypeInfo::new(dialect.varchar(), false))
        }
        "COALESCE" | "IFNULL" => {
            let mut merged: Option<SqlType> = None;
            let mut any_not_null = false;
            let mut slots = Vec::new();
            for arg in &args {
                if as_placeholder(arg).is_some() {
                    slots.push(params.push(SqlType::Any));
                    continue;
                }
                let info = infer_expr(az, arg, scope, params, None)?;
                merged = Some(merged.map_or(info.column_type, |prev| {
                    promote_common(prev, info.column_type)
                }));
                any_not_null |= info.not_null;
            }
            let ty = merged.unwrap_or(SqlType::Any);
            for slot in slots {
                params.assign(slot, ty);
            }
            Ok(TypeInfo::new(ty, any_not_null))
        }
        "NULLIF" => {
            let info = match args.first() {
                Some(arg) => infer_expr(az, arg, scope, params, None)?,
                None => TypeInfo::new(SqlType::Any, false),
            };
            for arg in args.iter().skip(1) {
                infer_typed_with_placeholders(az, arg, scope, params, Some(info.column_type))?;
            }
            Ok(TypeInfo::new(info.column_type, false))
        }
        "IF" if args.len() == 3 => {
            infer_expr(az, args[0], scope, params, None)?;
            let a = infer_expr(az, args[1], scope, params, None)?;
            let b = infer_expr(az, args[2], scope, params, None)?;
            Ok(TypeInfo::new(
                promote_common(a.column_type, b.column_type),
                a.not_null && b.not_null,
            ))
        }
        "CONCAT" | "CONCAT_WS" => {
            let mut all_not_null = true;
            for arg in &args {
                let info =
                    infer_typed_with_placeholders(az, arg, scope, params, Some(dialect.varchar()))?;
                all_not_null &= info.not_null;
            }
            Ok(TypeInfo::new(dialect.varchar(), all_not_null))
        }
        "UPPER" | "LOWER" | "TRIM" | "LTRIM" | "RTRIM" | "REPLACE" | "SUBSTR" | "SUBSTRING"
        | "LEFT" | "RIGHT" | "LPAD" | "RPAD" | "REVERSE" | "HEX" => {
            let mut not_null = true;
            for arg in &args {
                let info =
                    infer_typed_with_placeholders(az, arg, scope, params, Some(dialect.varchar()))?;
                not_null &= info.not_null;
            }
            Ok(TypeInfo::new(dialect.varchar(), not_null))
        }
        "LENGTH" | "CHAR_LENGTH" | "CHARACTER_LENGTH" | "OCTET_LENGTH" | "INSTR" | "STRFTIME" => {
            let mut not_null = true;
            for arg in &args {
                let info = infer_expr(az, arg, scope, params, None)?;
                not_null &= info.not_null;
            }
            let ty = if name == "STRFTIME" {
                dialect.varchar()
            } else {
                dialect.integer()
            };
            Ok(TypeInfo::new(ty, not_null))
        }
        "ABS" | "ROUND" | "TRUNCATE" | "FLOOR" | "CEIL" | "CEILING" | "MOD" => {
            let info = match args.first() {
                Some(arg) => infer_expr(az, arg, scope, params, None)?,
                None => TypeInfo::new(SqlType::Any, true),
            };
            let mut not_null = info.not_null;
            for arg in args.iter().skip(1) {
                not_null &= infer_expr(az, arg, scope, params, None)?.not_null;
            }
            let ty = match name.as_str() {
                "FLOOR" | "CEIL" | "CEILING" => dialect.big_integer(),
                _ => info.column_type,
            };
            Ok(TypeInfo::new(ty, not_null))
        }
        "POW" | "POWER" | "SQRT" | "EXP" | "LN" | "LOG" | "LOG2" | "LOG10" | "RAND" | "RANDOM"
        | "SIN" | "COS" | "TAN" | "ATAN" | "ASIN" | "ACOS" | "PI" => {
            for arg in &args {
                infer_expr(az, arg, scope, params, None)?;
            }
            let ty = match dialect {
                Dialect::MySql => SqlType::Double,
                Dialect::Sqlite => SqlType::Real,
            };
            Ok(TypeInfo::new(ty, true))
        }
        "NOW" | "CURRENT_TIMESTAMP" | "SYSDATE" | "DATETIME" | "TIMESTAMP" => {
            for arg in &args {
                infer_expr(az, arg, scope, params, None)?;
            }
            Ok(TypeInfo::new(dialect.datetime(), true))
        }
        "CURDATE" | "CURRENT_DATE" | "DATE" => {
            let mut not_null = true;
            for arg in &args {
                not_null &= infer_expr(az, arg, scope, params, None)?.not_null;
            }
            let ty = match dialect {
                Dialect::MySql => SqlType::Date,
                Dialect::Sqlite => SqlType::SqliteText,
            };
            Ok(TypeInfo::new(ty, args.is_empty() || not_null))
        }
        "CURTIME" | "CURRENT_TIME" | "TIME" => {
            for arg in &args {
                infer_expr(az, arg, scope, params, None)?;
            }
            let ty = match dialect {
                Dialect::MySql => SqlType::Time,
                Dialect::Sqlite => SqlType::SqliteText,
            };
            Ok(TypeInfo::new(ty, true))
        }
        "YEAR" | "MONTH" | "DAY" | "HOUR" | "MINUTE" | "SECOND" | "DAYOFWEEK" | "DAYOFYEAR"
        | "WEEK" | "QUARTER" => {
            let mut not_null = true;
            for arg in &args {
                not_null &= infer_typed_with_placeholders(az, arg, scope, params, Some(dialect.datetime()))?
                    .not_null;
            }
            Ok(TypeInfo::new(dialect.integer(), not_null))
        }
        "DATE_ADD" | "DATE_SUB" | "ADDDATE" | "SUBDATE" => {
            let mut not_null = true;
            for arg in &args {
                not_null &= infer_typed_with_placeholders(az, arg, scope, params, Some(dialect.datetime()))?
                    .not_null;
            }
            Ok(TypeInfo::new(dialect.datetime(), not_null))
        }
        "DATEDIFF" | "TIMESTAMPDIFF" | "JULIANDAY" | "UNIX_TIMESTAMP" => {
            let mut not_null = true;
            for arg in &args {
                not_null &= infer_typed_with_placeholders(az, arg, scope, params, Some(dialect.datetime()))?
                    .not_null;
            }
            let ty = match name.as_str() {
                "JULIANDAY" => SqlType::Real,
                _ => dialect.big_integer(),
            };
            Ok(TypeInfo::new(ty, not_null))
        }
        "LAST_INSERT_ID" | "LAST_INSERT_ROWID" | "CHANGES" | "FOUND_ROWS" => {
            Ok(TypeInfo::new(dialect.big_integer(), true))
        }
        "UUID" | "DATABASE" | "VERSION" | "USER" | "CURRENT_USER" | "SQLITE_VERSION"
        | "TYPEOF" | "QUOTE" => {
            for arg in &args {
                infer_expr(az, arg, scope, params, None)?;
            }
            Ok(TypeInfo::new(dialect.varchar(), true))
        }
        "JSON_EXTRACT" | "JSON_OBJECT" | "JSON_ARRAY" | "JSON_VALUE" => {
            for arg in &args {
                infer_expr(az, arg, scope, params, None)?;
            }
            let ty = match dialect {
                Dialect::MySql => SqlType::Json,
                Dialect::Sqlite => SqlType::SqliteText,
            };
            Ok(TypeInfo::new(ty, false))
        }
        _ => {
            // unknown function: still walk arguments so placeholders
            // keep their positions
            for arg in &args {
                infer_typed_with_placeholders(az, arg, scope, params, None)?;
            }
            Ok(TypeInfo::new(SqlType::Any, true))
        }
    }
}

fn function_arg_exprs(args: &FunctionArguments) -> Vec<&Expr> {
    match args {
        FunctionArguments::List(list) => list
            .args
            .iter()
            .filter_map(|arg| match arg {
                FunctionArg::Unnamed(FunctionArgExpr::Expr(expr)) => Some(expr),
                FunctionArg::Named {
                    arg: FunctionArgExpr::Expr(expr),
                    ..
                } => Some(expr),
                _ => None,
            })
            .collect(),
        FunctionArguments::None | FunctionArguments::Subquery(_) => Vec::new(),
    }
}

/// True when the expression contains an aggregate call outside any
/// window clause. Drives the single-row rule for ungrouped aggregates.
pub(crate) fn expr_has_aggregate(expr: &Expr) -> bool {
    match expr {
        Expr::Function(func) => {
            if func.over.is_none() {
                let name = func
                    .name
                    .0
                    .last()
                    .map(|i| i.value.to_ascii_uppercase())
                    .unwrap_or_default();
                if matches!(
                    name.as_str(),
                    "COUNT" | "SUM" | "AVG" | "MIN" | "MAX" | "GROUP_CONCAT" | "TOTAL"
                ) {
                    return true;
                }
            }
            function_arg_exprs(&func.args)
                .iter()
                .any(|arg| expr_has_aggregate(arg))
        }
        Expr::BinaryOp { left, right, .. } => {
            expr_has_aggregate(left) || expr_has_aggregate(right)
        }
        Expr::UnaryOp { expr, .. } | Expr::Nested(expr) | Expr::Cast { expr, .. } => {
            expr_has_aggregate(expr)
        }
        Expr::Case {
            operand,
            conditions,
            results,
            else_result,
        } => {
            operand.as_deref().is_some_and(expr_has_aggregate)
                || conditions.iter().any(expr_has_aggregate)
                || results.iter().any(expr_has_aggregate)
                || else_result.as_deref().is_some_and(expr_has_aggregate)
        }
        _ => false,
    }
}

fn literal_type(dialect: Dialect, value: &Value) -> TypeInfo {
    match value {
        Value::Number(text, _) => {
            let fractional = text.contains('.') || text.contains('e') || text.contains('E');
            let ty = match (dialect, fractional) {
                (Dialect::MySql, false) => SqlType::Int,
                (Dialect::MySql, true) => SqlType::Decimal,
                (Dialect::Sqlite, false) => SqlType::Integer,
                (Dialect::Sqlite, true) => SqlType::Real,
            };
            TypeInfo::new(ty, true)
        }
        Value::SingleQuotedString(_)
        | Value::DoubleQuotedString(_)
        | Value::NationalStringLiteral(_)
        | Value::EscapedStringLiteral(_) => TypeInfo::new(dialect.varchar(), true),
        Value::HexStringLiteral(_) => TypeInfo::new(
            match dialect {
                Dialect::MySql => SqlType::Blob,
                Dialect::Sqlite => SqlType::SqliteBlob,
            },
            true,
        ),
        Value::Boolean(_) => TypeInfo::new(dialect.boolean(), true),
        Value::Null => TypeInfo::new(SqlType::Any, false),
        _ => TypeInfo::new(SqlType::Any, true),
    }
}

/// Map a CAST target to the engine type, reusing the catalog type
/// parser on the printed form.
fn cast_target(dialect: Dialect, data_type: &DataType) -> SqlType {
    let printed = data_type.to_string();
    match dialect {
        Dialect::MySql => match printed.to_ascii_uppercase().as_str() {
            // CAST targets MySQL spells differently from column types
            "SIGNED" | "SIGNED INTEGER" => SqlType::BigInt,
            "UNSIGNED" | "UNSIGNED INTEGER" => SqlType::BigInt,
            "NCHAR" => SqlType::Char,
            _ => SqlType::from_mysql(&printed),
        },
        Dialect::Sqlite => SqlType::from_sqlite(&printed),
    }
}

/// Type of an arithmetic result. Integer operands widen to the engine's
/// large integer, any decimal operand wins over integers, and any
/// floating operand wins over everything.
pub(crate) fn promote_arithmetic(dialect: Dialect, a: SqlType, b: SqlType) -> SqlType {
    match dialect {
        Dialect::MySql => {
            if a == SqlType::Double || b == SqlType::Double || a == SqlType::Float || b == SqlType::Float
            {
                SqlType::Double
            } else if a == SqlType::Decimal || b == SqlType::Decimal {
                SqlType::Decimal
            } else if a.is_integer() && b.is_integer() {
                SqlType::BigInt
            } else if a == SqlType::Any || b == SqlType::Any {
                SqlType::Any
            } else {
                SqlType::Double
            }
        }
        Dialect::Sqlite => {
            if a == SqlType::Real || b == SqlType::Real || a == SqlType::Numeric || b == SqlType::Numeric
            {
                SqlType::Real
            } else if a.is_integer() && b.is_integer() {
                SqlType::Integer
            } else if a == SqlType::Any || b == SqlType::Any {
                SqlType::Any
            } else {
                SqlType::Real
            }
        }
    }
}

/// Common type of two branches feeding the same output position (UNION
/// legs, CASE branches, COALESCE arguments). Textual wins over numeric;
/// among integers the wider rank wins; `Any` defers to the other side.
pub(crate) fn promote_common(a: SqlType, b: SqlType) -> SqlType {
    if a == b {
        return a;
    }
    match (a, b) {
        (SqlType::Any, other) | (other, SqlType::Any) => other,
        _ if a.is_textual() || b.is_textual() => {
            if a.is_textual() && b.is_textual() {
                // keep the roomier textual type
                if a == SqlType::Text || b == SqlType::Text {
                    SqlType::Text
                } else if a == SqlType::Varchar || b == SqlType::Varchar {
                    SqlType::Varchar
                } else {
                    a
                }
            } else if a.is_textual() {
                a
            } else {
                b
            }
        }
        _ if a.is_integer() && b.is_integer() => {
            if a.integer_rank() >= b.integer_rank() {
                a
            } else {
                b
            }
        }
        (SqlType::Double, other) | (other, SqlType::Double) if other.is_numeric() => SqlType::Double,
        (SqlType::Real, other) | (other, SqlType::Real) if other.is_numeric() => SqlType::Real,
        (SqlType::Decimal, other) | (other, SqlType::Decimal) if other.is_numeric() => {
            SqlType::Decimal
        }
        (SqlType::Numeric, other) | (other, SqlType::Numeric) if other.is_numeric() => {
            SqlType::Numeric
        }
        (SqlType::Float, other) | (other, SqlType::Float) if other.is_numeric() => SqlType::Double,
        _ => a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_widens_integers() {
        assert_eq!(
            promote_arithmetic(Dialect::MySql, SqlType::Int, SqlType::Int),
            SqlType::BigInt
        );
        assert_eq!(
            promote_arithmetic(Dialect::MySql, SqlType::Int, SqlType::Double),
            SqlType::Double
        );
        assert_eq!(
            promote_arithmetic(Dialect::MySql, SqlType::BigInt, SqlType::Decimal),
            SqlType::Decimal
        );
        assert_eq!(
            promote_arithmetic(Dialect::Sqlite, SqlType::Integer, SqlType::Integer),
            SqlType::Integer
        );
        assert_eq!(
            promote_arithmetic(Dialect::Sqlite, SqlType::Integer, SqlType::Real),
            SqlType::Real
        );
    }

    #[test]
    fn common_type_prefers_text_over_numbers() {
        assert_eq!(
            promote_common(SqlType::Int, SqlType::Varchar),
            SqlType::Varchar
        );
        assert_eq!(promote_common(SqlType::Int, SqlType::Int), SqlType::Int);
        assert_eq!(
            promote_common(SqlType::SmallInt, SqlType::BigInt),
            SqlType::BigInt
        );
        assert_eq!(promote_common(SqlType::Any, SqlType::Date), SqlType::Date);
        assert_eq!(
            promote_common(SqlType::Int, SqlType::Double),
            SqlType::Double
        );
    }

    #[test]
    fn literal_classification() {
        let info = literal_type(Dialect::MySql, &Value::Number("42".into(), false));
        assert_eq!(info.column_type, SqlType::Int);
        assert!(info.not_null);

        let info = literal_type(Dialect::MySql, &Value::Number("4.2".into(), false));
        assert_eq!(info.column_type, SqlType::Decimal);

        let info = literal_type(Dialect::Sqlite, &Value::SingleQuotedString("x".into()));
        assert_eq!(info.column_type, SqlType::SqliteText);

        let info = literal_type(Dialect::MySql, &Value::Null);
        assert!(!info.not_null);
    }
}
