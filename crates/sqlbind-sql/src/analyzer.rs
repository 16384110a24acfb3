//! Statement analysis entry points
//!
//! Ties the pieces together: parse, build scopes from FROM clauses,
//! type the projection, walk the filter clauses for parameters, and
//! decide cardinality. One [`QueryInfo`] comes out per statement.

use sqlbind_core::{Catalog, ColumnDef, ColumnInfo, Dialect, QueryInfo, QueryKind, SqlType};
use sqlparser::ast::{
    Assignment, AssignmentTarget, BinaryOperator, Delete, Expr, FromTable, Insert, JoinOperator,
    JoinConstraint, ObjectName, OnInsert, Query, Select, SelectItem, SetExpr, Statement,
    TableFactor, TableWithJoins, Values,
};

use crate::cardinality::{limit_is_one, where_is_single_row};
use crate::error::AnalyzeError;
use crate::infer::{expr_has_aggregate, infer_expr, promote_common};
use crate::params::{as_placeholder, collect_placeholders, ParamCollector};
use crate::parser::SqlParser;
use crate::scope::{Scope, ScopeSource};

/// Analyze the first statement of `sql` against a catalog.
pub fn analyze_sql(sql: &str, catalog: &Catalog, dialect: Dialect) -> Result<QueryInfo, AnalyzeError> {
    let parsed = SqlParser::from_dialect(dialect).parse(sql)?;
    let statement = parsed
        .first_statement()
        .ok_or_else(|| AnalyzeError::UnsupportedConstruct("empty statement".into()))?;
    QueryAnalyzer::new(catalog, dialect).analyze(statement)
}

/// Per-statement analysis over a borrowed catalog.
pub struct QueryAnalyzer<'c> {
    catalog: &'c Catalog,
    dialect: Dialect,
}

/// What a nested or top-level query produced.
pub(crate) struct QueryResult {
    pub columns: Vec<ColumnDef>,
    pub single_row: bool,
    pub order_by_columns: Option<Vec<String>>,
}

impl<'c> QueryAnalyzer<'c> {
    pub fn new(catalog: &'c Catalog, dialect: Dialect) -> Self {
        Self { catalog, dialect }
    }

    pub(crate) fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Analyze one parsed statement.
    pub fn analyze(&self, statement: &Statement) -> Result<QueryInfo, AnalyzeError> {
        tracing::debug!(dialect = ?self.dialect, "analyzing statement");
        let mut params = ParamCollector::new();
        match statement {
            Statement::Query(query) => {
                let result = self.analyze_query(query, None, &mut params)?;
                Ok(QueryInfo {
                    kind: QueryKind::Select,
                    multiple_rows_result: !result.single_row,
                    columns: result.columns,
                    parameters: params.into_entries(),
                    order_by_columns: result.order_by_columns,
                })
            }
            Statement::Insert(insert) => self.analyze_insert(insert, &mut params),
            Statement::Update {
                table,
                assignments,
                selection,
                ..
            } => self.analyze_update(table, assignments, selection.as_ref(), &mut params),
            Statement::Delete(delete) => self.analyze_delete(delete, &mut params),
            other => Err(AnalyzeError::UnsupportedConstruct(format!(
                "statement kind {}",
                statement_label(other)
            ))),
        }
    }

    /// A query with its optional WITH, ORDER BY and LIMIT clauses.
    /// `env` is the enclosing scope for correlated references.
    pub(crate) fn analyze_query(
        &self,
        query: &Query,
        env: Option<&Scope<'_>>,
        params: &mut ParamCollector,
    ) -> Result<QueryResult, AnalyzeError> {
        // CTE bindings live on their own frame so nested scopes can
        // chain to them
        let mut ctes = match env {
            Some(e) => Scope::with_parent(e),
            None => Scope::new(),
        };
        if let Some(with) = &query.with {
            if with.recursive {
                return Err(AnalyzeError::UnsupportedConstruct(
                    "recursive common table expression".into(),
                ));
            }
            for cte in &with.cte_tables {
                let mut columns = self.analyze_subquery(&cte.query, &ctes, params)?;
                for (column, rename) in columns.iter_mut().zip(cte.alias.columns.iter()) {
                    column.name = rename.name.value.clone();
                }
                ctes.add_cte(cte.alias.name.value.clone(), columns);
            }
        }

        let (columns, from_scope, mut single_row) =
            self.analyze_set_expr(query.body.as_ref(), &ctes, params)?;

        let mut order_by_columns = None;
        if let Some(order_by) = &query.order_by {
            // aliases from the projection shadow nothing: they sit in
            // their own frame in front of the FROM sources
            let alias_frame = match &from_scope {
                Some(scope) => {
                    let mut frame = Scope::with_parent(scope);
                    frame.push(ScopeSource::derived(String::new(), &columns));
                    frame
                }
                // set operation or nested query: only the merged output
                // columns are in scope
                None => {
                    let mut frame = Scope::with_parent(&ctes);
                    frame.push(ScopeSource::set_operation(String::new(), &columns));
                    frame
                }
            };
            for item in &order_by.exprs {
                if as_placeholder(&item.expr).is_some() {
                    // dynamic sort key: not a parameter, but the caller
                    // must know which columns it may name
                    order_by_columns.get_or_insert_with(|| match &from_scope {
                        Some(scope) => scope.order_by_candidates(),
                        None => columns.iter().map(|c| c.name.clone()).collect(),
                    });
                    continue;
                }
                self.infer_or_collect(&item.expr, &alias_frame, params);
            }
        }

        if let Some(limit) = &query.limit {
            self.analyze_row_count_operand(limit, params);
            single_row = single_row || limit_is_one(query);
        }
        if let Some(offset) = &query.offset {
            self.analyze_row_count_operand(&offset.value, params);
        }

        Ok(QueryResult {
            columns,
            single_row,
            order_by_columns,
        })
    }

    /// A nested query used as an expression or row-source; only its
    /// output columns matter to the caller.
    pub(crate) fn analyze_subquery(
        &self,
        query: &Query,
        outer: &Scope<'_>,
        params: &mut ParamCollector,
    ) -> Result<Vec<ColumnDef>, AnalyzeError> {
        let result = self.analyze_query(query, Some(outer), params)?;
        Ok(result.columns)
    }

    fn analyze_set_expr<'e>(
        &self,
        body: &SetExpr,
        env: &'e Scope<'e>,
        params: &mut ParamCollector,
    ) -> Result<(Vec<ColumnDef>, Option<Scope<'e>>, bool), AnalyzeError> {
        match body {
            SetExpr::Select(select) => {
                let (columns, scope, single) = self.analyze_select(select, env, params)?;
                Ok((columns, Some(scope), single))
            }
            SetExpr::Query(inner) => {
                let result = self.analyze_query(inner, Some(env), params)?;
                Ok((result.columns, None, result.single_row))
            }
            SetExpr::SetOperation { left, right, .. } => {
                let (left_cols, _, _) = self.analyze_set_expr(left, env, params)?;
                let (right_cols, _, _) = self.analyze_set_expr(right, env, params)?;
                let merged = merge_set_columns(left_cols, right_cols)?;
                Ok((merged, None, false))
            }
            SetExpr::Values(values) => {
                let columns = self.analyze_values(values, env, params)?;
                Ok((columns, None, values.rows.len() <= 1))
            }
            other => Err(AnalyzeError::UnsupportedConstruct(format!(
                "query body {other}"
            ))),
        }
    }

    fn analyze_select<'e>(
        &self,
        select: &Select,
        env: &'e Scope<'e>,
        params: &mut ParamCollector,
    ) -> Result<(Vec<ColumnDef>, Scope<'e>, bool), AnalyzeError> {
        // FROM placeholders (derived tables, ON clauses) appear after
        // the projection in the SQL text, so they collect separately
        // and splice in behind it
        let mut from_params = ParamCollector::new();
        let mut scope = self.build_scope(&select.from, env, &mut from_params)?;

        if let Some(selection) = &select.selection {
            apply_where_not_null(selection, &mut scope);
        }

        let mut columns = Vec::new();
        for item in &select.projection {
            match item {
                SelectItem::UnnamedExpr(expr) => {
                    let info = infer_expr(self, expr, &scope, params, None)?;
                    columns.push(ColumnDef {
                        name: output_name(expr),
                        column_type: info.column_type,
                        not_null: info.not_null,
                        table: info.table.unwrap_or_default(),
                    });
                }
                SelectItem::ExprWithAlias { expr, alias } => {
                    let info = infer_expr(self, expr, &scope, params, None)?;
                    columns.push(ColumnDef {
                        name: alias.value.clone(),
                        column_type: info.column_type,
                        not_null: info.not_null,
                        table: info.table.unwrap_or_default(),
                    });
                }
                SelectItem::Wildcard(_) => {
                    let expanded = scope
                        .expand_wildcard(None)
                        .ok_or_else(|| AnalyzeError::ColumnNotFound("*".into()))?;
                    columns.extend(expanded);
                }
                SelectItem::QualifiedWildcard(name, _) => {
                    let qualifier = last_ident(name);
                    let expanded = scope.expand_wildcard(Some(&qualifier)).ok_or_else(|| {
                        AnalyzeError::TableNotFound(qualifier.clone())
                    })?;
                    columns.extend(expanded);
                }
            }
        }

        params.append(from_params);

        let mut single_row = select.from.is_empty();
        if let Some(selection) = &select.selection {
            infer_expr(self, selection, &scope, params, None)?;
            single_row = single_row || where_is_single_row(selection, &scope);
        }

        let grouped = match &select.group_by {
            sqlparser::ast::GroupByExpr::Expressions(exprs, _) => {
                for expr in exprs {
                    self.infer_or_collect(expr, &scope, params);
                }
                !exprs.is_empty()
            }
            sqlparser::ast::GroupByExpr::All(_) => true,
        };
        if let Some(having) = &select.having {
            self.infer_or_collect(having, &scope, params);
        }

        let has_aggregate = select.projection.iter().any(|item| match item {
            SelectItem::UnnamedExpr(expr) | SelectItem::ExprWithAlias { expr, .. } => {
                expr_has_aggregate(expr)
            }
            _ => false,
        });
        if has_aggregate && !grouped {
            single_row = true;
        }

        Ok((columns, scope, single_row))
    }

    fn build_scope<'e>(
        &self,
        from: &[TableWithJoins],
        env: &'e Scope<'e>,
        params: &mut ParamCollector,
    ) -> Result<Scope<'e>, AnalyzeError> {
        let mut scope = Scope::with_parent(env);
        for table_with_joins in from {
            self.add_table_with_joins(table_with_joins, &mut scope, params)?;
        }
        Ok(scope)
    }

    fn add_table_with_joins(
        &self,
        table_with_joins: &TableWithJoins,
        scope: &mut Scope<'_>,
        params: &mut ParamCollector,
    ) -> Result<(), AnalyzeError> {
        let first = scope.sources().len();
        self.add_relation(&table_with_joins.relation, scope, params)?;
        for join in &table_with_joins.joins {
            let start = scope.sources().len();
            self.add_relation(&join.relation, scope, params)?;
            match &join.join_operator {
                JoinOperator::Inner(constraint) => {
                    self.infer_join_constraint(constraint, scope, params)?;
                }
                JoinOperator::LeftOuter(constraint) => {
                    for source in &mut scope.sources_mut()[start..] {
                        source.set_all_nullable();
                    }
                    self.infer_join_constraint(constraint, scope, params)?;
                }
                JoinOperator::RightOuter(constraint) => {
                    for source in &mut scope.sources_mut()[first..start] {
                        source.set_all_nullable();
                    }
                    self.infer_join_constraint(constraint, scope, params)?;
                }
                JoinOperator::FullOuter(constraint) => {
                    for source in &mut scope.sources_mut()[first..] {
                        source.set_all_nullable();
                    }
                    self.infer_join_constraint(constraint, scope, params)?;
                }
                JoinOperator::CrossJoin => {}
                _ => {}
            }
        }
        Ok(())
    }

    fn infer_join_constraint(
        &self,
        constraint: &JoinConstraint,
        scope: &Scope<'_>,
        params: &mut ParamCollector,
    ) -> Result<(), AnalyzeError> {
        if let JoinConstraint::On(expr) = constraint {
            infer_expr(self, expr, scope, params, None)?;
        }
        Ok(())
    }

    fn add_relation(
        &self,
        relation: &TableFactor,
        scope: &mut Scope<'_>,
        params: &mut ParamCollector,
    ) -> Result<(), AnalyzeError> {
        match relation {
            TableFactor::Table { name, alias, .. } => {
                let (schema, table) = object_name_parts(name);
                let alias_name = alias.as_ref().map(|a| a.name.value.clone());
                if schema.is_none() {
                    let cte_columns = scope.find_cte(&table).map(|c| c.columns.clone());
                    if let Some(columns) = cte_columns {
                        scope.push(ScopeSource::derived(
                            alias_name.unwrap_or_else(|| table.clone()),
                            &columns,
                        ));
                        return Ok(());
                    }
                }
                let table_columns = self.catalog.lookup(schema.as_deref(), &table);
                if table_columns.is_empty() {
                    return Err(AnalyzeError::TableNotFound(table));
                }
                scope.push(ScopeSource::from_catalog(
                    alias_name.unwrap_or_else(|| table.clone()),
                    table,
                    &table_columns,
                ));
                Ok(())
            }
            TableFactor::Derived {
                subquery, alias, ..
            } => {
                let mut columns = self.analyze_subquery(subquery, scope, params)?;
                let alias_name = match alias {
                    Some(alias) => {
                        for (column, rename) in columns.iter_mut().zip(alias.columns.iter()) {
                            column.name = rename.name.value.clone();
                        }
                        alias.name.value.clone()
                    }
                    None => String::new(),
                };
                scope.push(ScopeSource::derived(alias_name, &columns));
                Ok(())
            }
            TableFactor::NestedJoin {
                table_with_joins, ..
            } => self.add_table_with_joins(table_with_joins, scope, params),
            other => Err(AnalyzeError::UnsupportedConstruct(format!(
                "table factor {other}"
            ))),
        }
    }

    fn analyze_values(
        &self,
        values: &Values,
        env: &Scope<'_>,
        params: &mut ParamCollector,
    ) -> Result<Vec<ColumnDef>, AnalyzeError> {
        let mut columns: Vec<ColumnDef> = Vec::new();
        for (row_index, row) in values.rows.iter().enumerate() {
            for (column_index, expr) in row.iter().enumerate() {
                let info = infer_expr(self, expr, env, params, None)?;
                if row_index == 0 {
                    columns.push(ColumnDef {
                        name: output_name(expr),
                        column_type: info.column_type,
                        not_null: info.not_null,
                        table: String::new(),
                    });
                } else if let Some(column) = columns.get_mut(column_index) {
                    column.column_type = promote_common(column.column_type, info.column_type);
                    column.not_null &= info.not_null;
                }
            }
        }
        Ok(columns)
    }

    fn analyze_insert(
        &self,
        insert: &Insert,
        params: &mut ParamCollector,
    ) -> Result<QueryInfo, AnalyzeError> {
        let (schema, table) = object_name_parts(&insert.table_name);
        let table_columns = self.catalog.lookup(schema.as_deref(), &table);
        if table_columns.is_empty() {
            return Err(AnalyzeError::TableNotFound(table));
        }
        let targets: Vec<&ColumnInfo> = if insert.columns.is_empty() {
            table_columns.clone()
        } else {
            insert
                .columns
                .iter()
                .map(|ident| {
                    table_columns
                        .iter()
                        .find(|c| c.column.eq_ignore_ascii_case(&ident.value))
                        .copied()
                        .ok_or_else(|| {
                            AnalyzeError::ColumnNotFound(format!("{}.{}", table, ident.value))
                        })
                })
                .collect::<Result<_, _>>()?
        };

        let mut scope = Scope::new();
        scope.push(ScopeSource::from_catalog(
            table.clone(),
            table.clone(),
            &table_columns,
        ));

        if let Some(source) = &insert.source {
            match source.body.as_ref() {
                SetExpr::Values(values) => {
                    for row in &values.rows {
                        for (expr, target) in row.iter().zip(targets.iter()) {
                            self.analyze_write_value(expr, target, &scope, params)?;
                        }
                    }
                }
                _ => {
                    self.analyze_subquery(source, &Scope::new(), params)?;
                }
            }
        }

        if let Some(OnInsert::DuplicateKeyUpdate(assignments)) = &insert.on {
            for assignment in assignments {
                self.analyze_assignment(assignment, &scope, params)?;
            }
        }

        Ok(QueryInfo {
            kind: QueryKind::Insert,
            multiple_rows_result: false,
            columns: Vec::new(),
            parameters: params_drain(params),
            order_by_columns: None,
        })
    }

    fn analyze_update(
        &self,
        table: &TableWithJoins,
        assignments: &[Assignment],
        selection: Option<&Expr>,
        params: &mut ParamCollector,
    ) -> Result<QueryInfo, AnalyzeError> {
        let env = Scope::new();
        let mut from_params = ParamCollector::new();
        let scope = self.build_scope(std::slice::from_ref(table), &env, &mut from_params)?;
        params.append(from_params);

        for assignment in assignments {
            self.analyze_assignment(assignment, &scope, params)?;
        }
        if let Some(selection) = selection {
            infer_expr(self, selection, &scope, params, None)?;
        }

        Ok(QueryInfo {
            kind: QueryKind::Update,
            multiple_rows_result: false,
            columns: Vec::new(),
            parameters: params_drain(params),
            order_by_columns: None,
        })
    }

    fn analyze_delete(
        &self,
        delete: &Delete,
        params: &mut ParamCollector,
    ) -> Result<QueryInfo, AnalyzeError> {
        let from = match &delete.from {
            FromTable::WithFromKeyword(tables) | FromTable::WithoutKeyword(tables) => tables,
        };
        let env = Scope::new();
        let mut from_params = ParamCollector::new();
        let scope = self.build_scope(from, &env, &mut from_params)?;
        params.append(from_params);

        if let Some(selection) = &delete.selection {
            infer_expr(self, selection, &scope, params, None)?;
        }

        Ok(QueryInfo {
            kind: QueryKind::Delete,
            multiple_rows_result: false,
            columns: Vec::new(),
            parameters: params_drain(params),
            order_by_columns: None,
        })
    }

    /// SET `target = value` in an UPDATE or upsert clause. A plain
    /// placeholder value takes the target column's type, and may be
    /// NULL exactly when the column may.
    fn analyze_assignment(
        &self,
        assignment: &Assignment,
        scope: &Scope<'_>,
        params: &mut ParamCollector,
    ) -> Result<(), AnalyzeError> {
        let (qualifier, name) = match &assignment.target {
            AssignmentTarget::ColumnName(name) => {
                let (schema, column) = object_name_parts(name);
                (schema, column)
            }
            AssignmentTarget::Tuple(_) => {
                return Err(AnalyzeError::UnsupportedConstruct(
                    "tuple assignment target".into(),
                ));
            }
        };
        let hit = scope.resolve(qualifier.as_deref(), &name)?;
        let column_type = hit.column.column_type;
        let not_null = hit.column.not_null;
        if as_placeholder(&assignment.value).is_some() {
            params.push_typed(column_type, not_null);
        } else {
            infer_expr(self, &assignment.value, scope, params, Some(column_type))?;
        }
        Ok(())
    }

    /// One VALUES cell written into a target column.
    fn analyze_write_value(
        &self,
        expr: &Expr,
        target: &ColumnInfo,
        scope: &Scope<'_>,
        params: &mut ParamCollector,
    ) -> Result<(), AnalyzeError> {
        if as_placeholder(expr).is_some() {
            let not_null = target.not_null && !target.autoincrement;
            params.push_typed(target.column_type, not_null);
        } else {
            infer_expr(self, expr, scope, params, Some(target.column_type))?;
        }
        Ok(())
    }

    /// LIMIT and OFFSET operands are integral row counts; a placeholder
    /// there is always a required big integer.
    fn analyze_row_count_operand(&self, expr: &Expr, params: &mut ParamCollector) {
        if as_placeholder(expr).is_some() {
            params.push(self.dialect.big_integer());
        } else {
            collect_placeholders(expr, params, self.dialect.big_integer());
        }
    }

    /// Infer a clause that may legally reference projection aliases or
    /// other names inference cannot see. On failure the clause's
    /// placeholders are still collected so positions stay correct.
    fn infer_or_collect(&self, expr: &Expr, scope: &Scope<'_>, params: &mut ParamCollector) {
        let mark = params.len();
        if infer_expr(self, expr, scope, params, None).is_err() {
            params.truncate(mark);
            collect_placeholders(expr, params, SqlType::Any);
        }
    }
}

fn params_drain(params: &mut ParamCollector) -> Vec<sqlbind_core::ParameterDef> {
    std::mem::take(params).into_entries()
}

/// Output column name for an unaliased projection item: the bare column
/// name when the expression is one, the printed expression otherwise.
fn output_name(expr: &Expr) -> String {
    match expr {
        Expr::Identifier(ident) => ident.value.clone(),
        Expr::CompoundIdentifier(parts) => parts
            .last()
            .map(|i| i.value.clone())
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

fn object_name_parts(name: &ObjectName) -> (Option<String>, String) {
    let parts = &name.0;
    let table = parts.last().map(|i| i.value.clone()).unwrap_or_default();
    let schema = if parts.len() >= 2 {
        Some(parts[parts.len() - 2].value.clone())
    } else {
        None
    };
    (schema, table)
}

fn last_ident(name: &ObjectName) -> String {
    name.0.last().map(|i| i.value.clone()).unwrap_or_default()
}

fn statement_label(statement: &Statement) -> String {
    let printed = statement.to_string();
    printed
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Merge the two legs of a set operation position by position: names
/// from the left leg, the common type of both, non-null only when both
/// legs are, the owning table only when the legs agree. Legs must
/// project the same number of columns.
fn merge_set_columns(
    left: Vec<ColumnDef>,
    right: Vec<ColumnDef>,
) -> Result<Vec<ColumnDef>, AnalyzeError> {
    if left.len() != right.len() {
        return Err(AnalyzeError::UnsupportedConstruct(format!(
            "set operation legs with {} and {} columns",
            left.len(),
            right.len()
        )));
    }
    Ok(left
        .into_iter()
        .zip(right)
        .map(|(l, r)| ColumnDef {
            name: l.name,
            column_type: promote_common(l.column_type, r.column_type),
            not_null: l.not_null && r.not_null,
            table: if l.table == r.table { l.table } else { String::new() },
        })
        .collect())
}

/// Upgrade columns a WHERE clause proves non-null. Only top-level AND
/// conjuncts count: an OR branch may not hold for every surviving row.
fn apply_where_not_null(selection: &Expr, scope: &mut Scope<'_>) {
    match selection {
        Expr::Nested(inner) => apply_where_not_null(inner, scope),
        Expr::BinaryOp {
            left,
            op: BinaryOperator::And,
            right,
        } => {
            apply_where_not_null(left, scope);
            apply_where_not_null(right, scope);
        }
        Expr::BinaryOp { left, op, right }
            if matches!(
                op,
                BinaryOperator::Eq
                    | BinaryOperator::NotEq
                    | BinaryOperator::Lt
                    | BinaryOperator::LtEq
                    | BinaryOperator::Gt
                    | BinaryOperator::GtEq
            ) =>
        {
            mark_bare_column(left, scope);
            mark_bare_column(right, scope);
        }
        Expr::IsNotNull(inner) => mark_bare_column(inner, scope),
        Expr::Between { expr, .. } | Expr::InList { expr, .. } | Expr::Like { expr, .. } => {
            mark_bare_column(expr, scope)
        }
        _ => {}
    }
}

fn mark_bare_column(expr: &Expr, scope: &mut Scope<'_>) {
    match expr {
        Expr::Identifier(ident) => scope.mark_not_null(None, &ident.value),
        Expr::CompoundIdentifier(parts) if parts.len() == 2 => {
            scope.mark_not_null(Some(&parts[0].value), &parts[1].value)
        }
        Expr::Nested(inner) => mark_bare_column(inner, scope),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sqlbind_core::ColumnKey;

    fn catalog() -> Catalog {
        Catalog::from_columns(vec![
            ColumnInfo::new("users", "id", SqlType::Int)
                .not_null()
                .with_key(ColumnKey::Primary)
                .autoincrement(),
            ColumnInfo::new("users", "name", SqlType::Varchar).not_null(),
            ColumnInfo::new("users", "email", SqlType::Varchar),
        ])
    }

    #[test]
    fn insert_parameters_follow_target_columns() {
        let catalog = catalog();
        let info = analyze_sql(
            "INSERT INTO users (name, email) VALUES (?, ?)",
            &catalog,
            Dialect::MySql,
        )
        .unwrap();

        assert_eq!(info.kind, QueryKind::Insert);
        assert_eq!(info.parameters.len(), 2);
        assert_eq!(info.parameters[0].column_type, SqlType::Varchar);
        assert!(info.parameters[0].not_null);
        assert!(!info.parameters[1].not_null);
    }

    #[test]
    fn autoincrement_insert_parameter_is_optional() {
        let catalog = catalog();
        let info = analyze_sql(
            "INSERT INTO users (id, name) VALUES (?, ?)",
            &catalog,
            Dialect::MySql,
        )
        .unwrap();

        assert!(!info.parameters[0].not_null);
        assert!(info.parameters[1].not_null);
    }

    #[test]
    fn update_assignment_takes_column_type() {
        let catalog = catalog();
        let info = analyze_sql(
            "UPDATE users SET email = ? WHERE id = ?",
            &catalog,
            Dialect::MySql,
        )
        .unwrap();

        assert_eq!(info.kind, QueryKind::Update);
        assert_eq!(info.parameters[0].column_type, SqlType::Varchar);
        assert!(!info.parameters[0].not_null);
        assert_eq!(info.parameters[1].column_type, SqlType::Int);
        assert!(info.parameters[1].not_null);
    }

    #[test]
    fn where_comparison_upgrades_projection_nullability() {
        let catalog = catalog();
        let info = analyze_sql(
            "SELECT email FROM users WHERE email = ?",
            &catalog,
            Dialect::MySql,
        )
        .unwrap();

        assert!(info.columns[0].not_null);
        assert_eq!(info.parameters[0].column_type, SqlType::Varchar);
    }

    #[test]
    fn delete_by_key() {
        let catalog = catalog();
        let info = analyze_sql("DELETE FROM users WHERE id = ?", &catalog, Dialect::MySql).unwrap();
        assert_eq!(info.kind, QueryKind::Delete);
        assert_eq!(info.parameters.len(), 1);
        assert_eq!(info.parameters[0].column_type, SqlType::Int);
    }
}
