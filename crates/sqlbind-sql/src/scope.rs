//! Lexical scopes for column resolution
//!
//! A scope is the ordered set of aliased row-sources visible to column
//! resolution at a point in a statement: one per FROM clause, chained to
//! the enclosing scope for correlated-subquery lookups. Scopes are built
//! once and read-only afterwards, except for the WHERE-driven not-null
//! upgrade applied before the projection is typed.

use sqlbind_core::{ColumnDef, ColumnInfo, ColumnKey, SqlType};

use crate::error::AnalyzeError;

/// What kind of row-source an alias is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A catalog table.
    Table,
    /// A derived table: the projection of a nested statement.
    Derived,
    /// The merged result of a set operation.
    SetOp,
}

/// One column visible through a scope source. Nullability here is
/// post join-flip: an outer join marks the non-preserved side nullable
/// at scope-build time, regardless of the catalog.
#[derive(Debug, Clone)]
pub struct ScopeColumn {
    pub name: String,
    pub column_type: SqlType,
    pub not_null: bool,
    pub key: ColumnKey,
}

/// One aliased row-source in a FROM clause.
#[derive(Debug, Clone)]
pub struct ScopeSource {
    /// Alias the source is visible under (the table name when no alias
    /// was given).
    pub alias: String,
    /// Underlying table name; empty for derived tables and set operations.
    pub table: String,
    pub kind: SourceKind,
    pub columns: Vec<ScopeColumn>,
}

impl ScopeSource {
    /// A catalog table bound to an alias.
    pub fn from_catalog(alias: impl Into<String>, table: impl Into<String>, columns: &[&ColumnInfo]) -> Self {
        Self {
            alias: alias.into(),
            table: table.into(),
            kind: SourceKind::Table,
            columns: columns
                .iter()
                .map(|c| ScopeColumn {
                    name: c.column.clone(),
                    column_type: c.column_type,
                    not_null: c.not_null,
                    key: c.key,
                })
                .collect(),
        }
    }

    /// The output columns of a nested statement under an alias. Derived
    /// columns are never key-bearing.
    pub fn derived(alias: impl Into<String>, columns: &[ColumnDef]) -> Self {
        Self::projected(alias, SourceKind::Derived, columns)
    }

    /// The merged columns of a set operation under an alias.
    pub fn set_operation(alias: impl Into<String>, columns: &[ColumnDef]) -> Self {
        Self::projected(alias, SourceKind::SetOp, columns)
    }

    fn projected(alias: impl Into<String>, kind: SourceKind, columns: &[ColumnDef]) -> Self {
        Self {
            alias: alias.into(),
            table: String::new(),
            kind,
            columns: columns
                .iter()
                .map(|c| ScopeColumn {
                    name: c.name.clone(),
                    column_type: c.column_type,
                    not_null: c.not_null,
                    key: ColumnKey::None,
                })
                .collect(),
        }
    }

    fn find(&self, name: &str) -> Option<&ScopeColumn> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    fn matches_alias(&self, qualifier: &str) -> bool {
        self.alias.eq_ignore_ascii_case(qualifier)
            || (!self.table.is_empty() && self.table.eq_ignore_ascii_case(qualifier))
    }

    /// Force every column nullable; the join-flip for outer joins.
    pub fn set_all_nullable(&mut self) {
        for column in &mut self.columns {
            column.not_null = false;
        }
    }
}

/// A successful resolution: the column plus the alias of the source it
/// came from.
#[derive(Debug)]
pub struct Resolved<'a> {
    pub column: &'a ScopeColumn,
    pub source_alias: &'a str,
}

/// A CTE binding visible to table-name resolution in this scope and in
/// nested scopes. Not consulted by column resolution.
#[derive(Debug, Clone)]
pub struct CteBinding {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

/// An explicit frame chain of row-sources, innermost first in lookup
/// order. Unresolved references fall through to the parent frame, which
/// is how correlated subqueries see their enclosing scope.
#[derive(Debug, Default)]
pub struct Scope<'a> {
    sources: Vec<ScopeSource>,
    ctes: Vec<CteBinding>,
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parent(parent: &'a Scope<'a>) -> Self {
        Self {
            sources: Vec::new(),
            ctes: Vec::new(),
            parent: Some(parent),
        }
    }

    pub fn push(&mut self, source: ScopeSource) {
        self.sources.push(source);
    }

    pub fn sources(&self) -> &[ScopeSource] {
        &self.sources
    }

    pub fn sources_mut(&mut self) -> &mut [ScopeSource] {
        &mut self.sources
    }

    pub fn add_cte(&mut self, name: impl Into<String>, columns: Vec<ColumnDef>) {
        self.ctes.push(CteBinding {
            name: name.into(),
            columns,
        });
    }

    /// Find a CTE by name, searching outwards through enclosing frames.
    pub fn find_cte(&self, name: &str) -> Option<&CteBinding> {
        self.ctes
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .or_else(|| self.parent.and_then(|p| p.find_cte(name)))
    }

    /// Resolve a column reference.
    ///
    /// A qualified reference is restricted to the source whose alias (or
    /// table name) matches; an unqualified one must match exactly one
    /// source in this frame. Misses fall through to the parent frame;
    /// a final miss is fatal for the statement.
    pub fn resolve(&self, qualifier: Option<&str>, name: &str) -> Result<Resolved<'_>, AnalyzeError> {
        match qualifier {
            Some(q) => {
                if let Some(source) = self.sources.iter().find(|s| s.matches_alias(q)) {
                    if let Some(column) = source.find(name) {
                        return Ok(Resolved {
                            column,
                            source_alias: &source.alias,
                        });
                    }
                }
                match self.parent {
                    Some(parent) => parent.resolve(qualifier, name),
                    None => Err(AnalyzeError::ColumnNotFound(format!("{}.{}", q, name))),
                }
            }
            None => {
                let mut hits = self.sources.iter().filter_map(|s| {
                    s.find(name).map(|column| Resolved {
                        column,
                        source_alias: &s.alias,
                    })
                });
                match (hits.next(), hits.next()) {
                    (Some(_), Some(_)) => Err(AnalyzeError::AmbiguousColumn(name.to_string())),
                    (Some(hit), None) => Ok(hit),
                    (None, _) => match self.parent {
                        Some(parent) => parent.resolve(None, name),
                        None => Err(AnalyzeError::ColumnNotFound(name.to_string())),
                    },
                }
            }
        }
    }

    /// Upgrade a column to non-null in this frame only; a no-op when the
    /// reference does not resolve locally. Used for WHERE predicates that
    /// prove a column cannot be null in any surviving row.
    pub fn mark_not_null(&mut self, qualifier: Option<&str>, name: &str) {
        for source in &mut self.sources {
            if qualifier.map_or(true, |q| source.matches_alias(q)) {
                if let Some(column) = source.columns.iter_mut().find(|c| c.name.eq_ignore_ascii_case(name)) {
                    column.not_null = true;
                    return;
                }
            }
        }
    }

    /// Expand `*` (all local sources, in order) or `alias.*` (one source)
    /// into the output column list. Returns `None` when the qualifier does
    /// not name a local source.
    pub fn expand_wildcard(&self, qualifier: Option<&str>) -> Option<Vec<ColumnDef>> {
        let mut out = Vec::new();
        let mut matched = false;
        for source in &self.sources {
            if let Some(q) = qualifier {
                if !source.matches_alias(q) {
                    continue;
                }
            }
            matched = true;
            out.extend(source.columns.iter().map(|c| ColumnDef {
                name: c.name.clone(),
                column_type: c.column_type,
                not_null: c.not_null,
                table: source.alias.clone(),
            }));
        }
        if matched {
            Some(out)
        } else {
            None
        }
    }

    /// Every column name reachable from this frame, unqualified and
    /// alias-qualified, in source order. This is the candidate list a
    /// dynamic `ORDER BY ?` may bind to.
    pub fn order_by_candidates(&self) -> Vec<String> {
        let mut out = Vec::new();
        for source in &self.sources {
            for column in &source.columns {
                out.push(column.name.clone());
                out.push(format!("{}.{}", source.alias, column.name));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlbind_core::ColumnInfo;

    fn users_source(alias: &str) -> ScopeSource {
        let id = ColumnInfo::new("users", "id", SqlType::Int)
            .not_null()
            .with_key(ColumnKey::Primary);
        let name = ColumnInfo::new("users", "name", SqlType::Varchar);
        ScopeSource::from_catalog(alias, "users", &[&id, &name])
    }

    fn posts_source() -> ScopeSource {
        let id = ColumnInfo::new("posts", "id", SqlType::Int)
            .not_null()
            .with_key(ColumnKey::Primary);
        let title = ColumnInfo::new("posts", "title", SqlType::Varchar).not_null();
        ScopeSource::from_catalog("p", "posts", &[&id, &title])
    }

    #[test]
    fn unqualified_resolution() {
        let mut scope = Scope::new();
        scope.push(users_source("u"));

        let hit = scope.resolve(None, "name").unwrap();
        assert_eq!(hit.source_alias, "u");
        assert_eq!(hit.column.column_type, SqlType::Varchar);
        assert!(!hit.column.not_null);
    }

    #[test]
    fn qualified_resolution_by_alias_and_table() {
        let mut scope = Scope::new();
        scope.push(users_source("u"));

        assert!(scope.resolve(Some("u"), "id").is_ok());
        assert!(scope.resolve(Some("users"), "id").is_ok());
        assert!(matches!(
            scope.resolve(Some("x"), "id"),
            Err(AnalyzeError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn ambiguity_across_sources() {
        let mut scope = Scope::new();
        scope.push(users_source("u"));
        scope.push(posts_source());

        assert!(matches!(
            scope.resolve(None, "id"),
            Err(AnalyzeError::AmbiguousColumn(_))
        ));
        assert!(scope.resolve(Some("p"), "id").is_ok());
    }

    #[test]
    fn correlation_falls_through_to_parent() {
        let mut outer = Scope::new();
        outer.push(users_source("u"));

        let mut inner = Scope::with_parent(&outer);
        inner.push(posts_source());

        let hit = inner.resolve(Some("u"), "name").unwrap();
        assert_eq!(hit.source_alias, "u");

        // unqualified miss in the inner frame also falls through
        let hit = inner.resolve(None, "name").unwrap();
        assert_eq!(hit.source_alias, "u");
    }

    #[test]
    fn join_flip_marks_columns_nullable() {
        let mut scope = Scope::new();
        scope.push(users_source("u"));
        scope.push(posts_source());
        scope.sources_mut()[1].set_all_nullable();

        let hit = scope.resolve(Some("p"), "title").unwrap();
        assert!(!hit.column.not_null);
        let hit = scope.resolve(Some("u"), "id").unwrap();
        assert!(hit.column.not_null);
    }

    #[test]
    fn wildcard_expansion_preserves_order() {
        let mut scope = Scope::new();
        scope.push(users_source("u"));
        scope.push(posts_source());

        let all = scope.expand_wildcard(None).unwrap();
        assert_eq!(
            all.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["id", "name", "id", "title"]
        );
        assert_eq!(all[0].table, "u");
        assert_eq!(all[3].table, "p");

        let posts_only = scope.expand_wildcard(Some("p")).unwrap();
        assert_eq!(posts_only.len(), 2);
        assert!(scope.expand_wildcard(Some("missing")).is_none());
    }

    #[test]
    fn order_by_candidates_list() {
        let mut scope = Scope::new();
        scope.push(users_source("u"));

        assert_eq!(
            scope.order_by_candidates(),
            vec!["id", "u.id", "name", "u.name"]
        );
    }
}
