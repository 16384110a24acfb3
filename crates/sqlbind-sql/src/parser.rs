//! SQL parsing using sqlparser
//!
//! Thin wrapper selecting the grammar for the analysis dialect and
//! packaging parse failures as values.

use sqlparser::ast::{Query, Statement};
use sqlparser::dialect::{Dialect as SqlparserDialect, MySqlDialect, SQLiteDialect};
use sqlparser::parser::{Parser, ParserError};

use sqlbind_core::Dialect;

/// SQL parser with a fixed dialect.
pub struct SqlParser {
    dialect: Box<dyn SqlparserDialect>,
}

impl SqlParser {
    /// Create a parser for MySQL.
    pub fn mysql() -> Self {
        Self {
            dialect: Box::new(MySqlDialect {}),
        }
    }

    /// Create a parser for SQLite.
    pub fn sqlite() -> Self {
        Self {
            dialect: Box::new(SQLiteDialect {}),
        }
    }

    /// Create a parser for an analysis dialect.
    pub fn from_dialect(dialect: Dialect) -> Self {
        match dialect {
            Dialect::MySql => Self::mysql(),
            Dialect::Sqlite => Self::sqlite(),
        }
    }

    /// Parse SQL text into AST statements.
    pub fn parse(&self, sql: &str) -> Result<ParsedSql, ParseError> {
        match Parser::parse_sql(&*self.dialect, sql) {
            Ok(statements) => Ok(ParsedSql {
                sql: sql.to_string(),
                statements,
            }),
            Err(error) => Err(ParseError {
                sql: sql.to_string(),
                error,
            }),
        }
    }
}

/// Successfully parsed SQL with AST.
#[derive(Debug, Clone)]
pub struct ParsedSql {
    /// Original SQL string.
    pub sql: String,

    /// Parsed statements.
    pub statements: Vec<Statement>,
}

impl ParsedSql {
    /// Get the first statement (queries are analyzed one at a time).
    pub fn first_statement(&self) -> Option<&Statement> {
        self.statements.first()
    }

    /// Check if this is a SELECT statement.
    pub fn is_select(&self) -> bool {
        matches!(self.first_statement(), Some(Statement::Query(_)))
    }

    /// Get the query if this is a SELECT statement.
    pub fn as_query(&self) -> Option<&Query> {
        match self.first_statement() {
            Some(Statement::Query(query)) => Some(query.as_ref()),
            _ => None,
        }
    }

    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }
}

/// SQL parsing error carrying the offending text.
#[derive(Debug)]
pub struct ParseError {
    pub sql: String,
    pub error: ParserError,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SQL parse error: {}", self.error)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_select() {
        let parser = SqlParser::mysql();
        let sql = "SELECT id, name FROM users WHERE active = 1";

        let parsed = parser.parse(sql).unwrap();
        assert_eq!(parsed.statement_count(), 1);
        assert!(parsed.is_select());
        assert!(parsed.as_query().is_some());
    }

    #[test]
    fn parse_placeholders() {
        let parser = SqlParser::mysql();
        let parsed = parser.parse("SELECT id FROM users WHERE id = ?").unwrap();
        assert!(parsed.is_select());

        let parser = SqlParser::sqlite();
        let parsed = parser.parse("SELECT id FROM users WHERE id = ?1").unwrap();
        assert!(parsed.is_select());
    }

    #[test]
    fn parse_invalid_sql() {
        let parser = SqlParser::mysql();
        let result = parser.parse("SELECT FROM WHERE");
        assert!(result.is_err());

        let error = result.unwrap_err();
        assert!(error.to_string().contains("SQL parse error"));
    }

    #[test]
    fn both_dialects_parse_common_sql() {
        let sql = "SELECT id FROM users LIMIT 1";
        assert!(SqlParser::mysql().parse(sql).is_ok());
        assert!(SqlParser::sqlite().parse(sql).is_ok());
        assert!(SqlParser::from_dialect(Dialect::MySql).parse(sql).is_ok());
    }
}
