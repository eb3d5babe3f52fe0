use serde::{Deserialize, Serialize};

use crate::types::value::DataType;

/// A parsed statement, handed in by the external SQL front-end. The
/// executor consumes these; tokenizing and parsing happen elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    CreateTable(CreateTableStatement),
    Insert(InsertStatement),
    Select(SelectStatement),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTableStatement {
    pub table: String,
    pub columns: Vec<ColumnDef>,
}

/// A column as written in the CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    pub primary_key: bool,
    pub not_null: bool,
    pub unique: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            primary_key: false,
            not_null: false,
            unique: false,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// `INSERT INTO table (columns...) VALUES (values...)`. Columns not
/// named keep their NULL default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertStatement {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<Literal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectStatement {
    pub table: String,
    pub projection: Projection,
    /// WHERE clause as a conjunction of simple predicates; empty means
    /// no WHERE clause.
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Projection {
    /// `SELECT *`: all declared columns in declared order.
    All,
    /// Named columns, matched case-insensitively, output in the order
    /// the user asked for.
    Columns(Vec<String>),
}

/// One `column op literal` predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: String,
    pub op: ComparisonOp,
    pub value: Literal,
}

impl Condition {
    pub fn eq(column: impl Into<String>, value: Literal) -> Self {
        Self {
            column: column.into(),
            op: ComparisonOp::Equal,
            value,
        }
    }

    pub fn ne(column: impl Into<String>, value: Literal) -> Self {
        Self {
            column: column.into(),
            op: ComparisonOp::NotEqual,
            value,
        }
    }

    pub fn lt(column: impl Into<String>, value: Literal) -> Self {
        Self {
            column: column.into(),
            op: ComparisonOp::LessThan,
            value,
        }
    }

    pub fn le(column: impl Into<String>, value: Literal) -> Self {
        Self {
            column: column.into(),
            op: ComparisonOp::LessThanOrEqual,
            value,
        }
    }

    pub fn gt(column: impl Into<String>, value: Literal) -> Self {
        Self {
            column: column.into(),
            op: ComparisonOp::GreaterThan,
            value,
        }
    }

    pub fn ge(column: impl Into<String>, value: Literal) -> Self {
        Self {
            column: column.into(),
            op: ComparisonOp::GreaterThanOrEqual,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

/// A literal as the parser produced it, before column-directed
/// conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Null,
    Integer(i64),
    Text(String),
}

impl Literal {
    /// Whole-number reading of a literal, shared by INSERT conversion
    /// and WHERE comparison. Text must parse as a whole decimal
    /// integer; NULL reads as nothing.
    pub fn coerce_to_integer(&self) -> Option<i64> {
        match self {
            Literal::Integer(i) => Some(*i),
            Literal::Text(s) => s.trim().parse().ok(),
            Literal::Null => None,
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Null => write!(f, "NULL"),
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Text(s) => write!(f, "'{}'", s),
        }
    }
}
