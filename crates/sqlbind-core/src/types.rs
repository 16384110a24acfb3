//! Scalar type system and dialect selection

use serde::{Deserialize, Serialize};

/// SQL dialect the analysis runs under.
///
/// The inference rules are dialect-agnostic; the dialect selects the
/// primitive type domain (MySQL column types vs SQLite storage classes)
/// and the parser grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    MySql,
    Sqlite,
}

impl Dialect {
    /// The dialect's string type.
    pub fn varchar(self) -> SqlType {
        match self {
            Self::MySql => SqlType::Varchar,
            Self::Sqlite => SqlType::SqliteText,
        }
    }

    /// The type of comparison and boolean predicates.
    pub fn boolean(self) -> SqlType {
        match self {
            Self::MySql => SqlType::TinyInt,
            Self::Sqlite => SqlType::Integer,
        }
    }

    /// Default integer type for counts and lengths.
    pub fn integer(self) -> SqlType {
        match self {
            Self::MySql => SqlType::Int,
            Self::Sqlite => SqlType::Integer,
        }
    }

    /// 64-bit integer type; LIMIT/OFFSET operands and ranking
    /// window functions use this.
    pub fn big_integer(self) -> SqlType {
        match self {
            Self::MySql => SqlType::BigInt,
            Self::Sqlite => SqlType::Integer,
        }
    }

    /// Date-and-time type. SQLite has no dedicated storage class and
    /// reports TEXT.
    pub fn datetime(self) -> SqlType {
        match self {
            Self::MySql => SqlType::DateTime,
            Self::Sqlite => SqlType::SqliteText,
        }
    }
}

/// Scalar SQL type.
///
/// One closed enum over both dialect domains: the MySQL column types and
/// the SQLite storage classes (prefixed `Sqlite` where the spelling would
/// collide with a MySQL type). `Any` is the best-effort sentinel used
/// when nothing better can be inferred; it is also the reported type of
/// SQLite virtual-table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlType {
    // MySQL column types
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    BigInt,
    Decimal,
    Float,
    Double,
    Char,
    Varchar,
    Text,
    Blob,
    Date,
    Time,
    DateTime,
    Timestamp,
    Year,
    Json,
    Bit,

    // SQLite storage classes
    Integer,
    Real,
    SqliteText,
    SqliteBlob,
    Numeric,

    /// Unknown type; inference escape hatch.
    Any,
}

impl SqlType {
    /// Map a MySQL `INFORMATION_SCHEMA` data type to a scalar type.
    pub fn from_mysql(raw: &str) -> Self {
        let raw = raw.trim().to_ascii_lowercase();
        // enum('a','b') and set(...) carry their variants in the raw type
        let base = raw.split(['(', ' ']).next().unwrap_or("");
        match base {
            "tinyint" => Self::TinyInt,
            "smallint" => Self::SmallInt,
            "mediumint" => Self::MediumInt,
            "int" | "integer" => Self::Int,
            "bigint" => Self::BigInt,
            "decimal" | "numeric" => Self::Decimal,
            "float" => Self::Float,
            "double" => Self::Double,
            "char" => Self::Char,
            "varchar" => Self::Varchar,
            "text" | "tinytext" | "mediumtext" | "longtext" => Self::Text,
            "enum" | "set" => Self::Varchar,
            "blob" | "tinyblob" | "mediumblob" | "longblob" | "binary" | "varbinary" => Self::Blob,
            "date" => Self::Date,
            "time" => Self::Time,
            "datetime" => Self::DateTime,
            "timestamp" => Self::Timestamp,
            "year" => Self::Year,
            "json" => Self::Json,
            "bit" => Self::Bit,
            _ => Self::Any,
        }
    }

    /// Map a declared SQLite column type to its storage class using the
    /// column-affinity rules. The `?` sentinel reported for virtual-table
    /// columns (e.g. full-text search) maps to [`SqlType::Any`].
    pub fn from_sqlite(raw: &str) -> Self {
        let raw = raw.trim().to_ascii_uppercase();
        if raw == "?" {
            return Self::Any;
        }
        if raw.contains("INT") {
            Self::Integer
        } else if raw.contains("CHAR") || raw.contains("CLOB") || raw.contains("TEXT") {
            Self::SqliteText
        } else if raw.is_empty() || raw.contains("BLOB") {
            Self::SqliteBlob
        } else if raw.contains("REAL") || raw.contains("FLOA") || raw.contains("DOUB") {
            Self::Real
        } else {
            Self::Numeric
        }
    }

    /// True for integer-class types (integer widening applies).
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::TinyInt
                | Self::SmallInt
                | Self::MediumInt
                | Self::Int
                | Self::BigInt
                | Self::Bit
                | Self::Year
                | Self::Integer
        )
    }

    /// True for any numeric type, exact or approximate.
    pub fn is_numeric(self) -> bool {
        self.is_integer()
            || matches!(
                self,
                Self::Decimal | Self::Float | Self::Double | Self::Real | Self::Numeric
            )
    }

    /// True for character types.
    pub fn is_textual(self) -> bool {
        matches!(self, Self::Char | Self::Varchar | Self::Text | Self::SqliteText)
    }

    /// Widening rank among integer types; wider types compare greater.
    pub fn integer_rank(self) -> Option<u8> {
        match self {
            Self::Bit => Some(0),
            Self::TinyInt => Some(1),
            Self::SmallInt | Self::Year => Some(2),
            Self::MediumInt => Some(3),
            Self::Int | Self::Integer => Some(4),
            Self::BigInt => Some(5),
            _ => None,
        }
    }
}

impl std::fmt::Display for SqlType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::TinyInt => "tinyint",
            Self::SmallInt => "smallint",
            Self::MediumInt => "mediumint",
            Self::Int => "int",
            Self::BigInt => "bigint",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Double => "double",
            Self::Char => "char",
            Self::Varchar => "varchar",
            Self::Text => "text",
            Self::Blob => "blob",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::Timestamp => "timestamp",
            Self::Year => "year",
            Self::Json => "json",
            Self::Bit => "bit",
            Self::Integer => "INTEGER",
            Self::Real => "REAL",
            Self::SqliteText => "TEXT",
            Self::SqliteBlob => "BLOB",
            Self::Numeric => "NUMERIC",
            Self::Any => "any",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mysql_raw_types() {
        assert_eq!(SqlType::from_mysql("int"), SqlType::Int);
        assert_eq!(SqlType::from_mysql("INT"), SqlType::Int);
        assert_eq!(SqlType::from_mysql("varchar"), SqlType::Varchar);
        assert_eq!(SqlType::from_mysql("enum('a','b')"), SqlType::Varchar);
        assert_eq!(SqlType::from_mysql("decimal"), SqlType::Decimal);
        assert_eq!(SqlType::from_mysql("geometry"), SqlType::Any);
    }

    #[test]
    fn sqlite_affinity_rules() {
        assert_eq!(SqlType::from_sqlite("INT"), SqlType::Integer);
        assert_eq!(SqlType::from_sqlite("BIGINT"), SqlType::Integer);
        assert_eq!(SqlType::from_sqlite("VARCHAR(100)"), SqlType::SqliteText);
        assert_eq!(SqlType::from_sqlite("CLOB"), SqlType::SqliteText);
        assert_eq!(SqlType::from_sqlite(""), SqlType::SqliteBlob);
        assert_eq!(SqlType::from_sqlite("DOUBLE"), SqlType::Real);
        assert_eq!(SqlType::from_sqlite("DECIMAL(10,2)"), SqlType::Numeric);
        assert_eq!(SqlType::from_sqlite("?"), SqlType::Any);
    }

    #[test]
    fn display_uses_dialect_spelling() {
        assert_eq!(SqlType::BigInt.to_string(), "bigint");
        assert_eq!(SqlType::Integer.to_string(), "INTEGER");
        assert_eq!(SqlType::SqliteText.to_string(), "TEXT");
        assert_eq!(SqlType::Any.to_string(), "any");
    }

    #[test]
    fn integer_rank_ordering() {
        assert!(SqlType::BigInt.integer_rank() > SqlType::Int.integer_rank());
        assert!(SqlType::Int.integer_rank() > SqlType::TinyInt.integer_rank());
        assert_eq!(SqlType::Varchar.integer_rank(), None);
    }
}
