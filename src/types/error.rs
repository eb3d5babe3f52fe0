use thiserror::Error;

use crate::types::{Key, PageId};

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid magic number: 0x{found:08X}")]
    InvalidMagic { found: u32 },

    #[error("Corrupted database: {reason}")]
    CorruptedDatabase { reason: String },

    #[error("Corrupted page: page={page}, reason={reason}")]
    CorruptedPage { page: PageId, reason: String },

    #[error("Page {page} out of range (total pages: {total})")]
    PageOutOfRange { page: PageId, total: u32 },

    #[error("Invalid page buffer size: expected {expected} bytes, got {actual} bytes")]
    PageSizeMismatch { expected: usize, actual: usize },

    #[error("Duplicate key {key}")]
    DuplicateKey { key: Key },

    #[error("Duplicate primary key {key} in table '{table}'")]
    DuplicatePrimaryKey { table: String, key: Key },

    #[error("Table '{name}' already exists")]
    TableAlreadyExists { name: String },

    #[error("Duplicate column '{name}' in table definition")]
    DuplicateColumn { name: String },

    #[error("Table '{table}' has more than one PRIMARY KEY column")]
    MultiplePrimaryKeys { table: String },

    #[error("Table '{name}' not found")]
    TableNotFound { name: String },

    #[error("Column '{name}' not found in table '{table}'")]
    ColumnNotFound { name: String, table: String },

    #[error("Cannot convert {value} to {target} for column '{column}'")]
    ConversionError {
        column: String,
        value: String,
        target: String,
    },

    #[error("Column '{column}' cannot be NULL")]
    NotNullViolation { column: String },

    #[error("PRIMARY KEY column '{column}' requires a non-negative integer, got {value}")]
    InvalidPrimaryKey { column: String, value: String },

    #[error("Statement supplies {values} values for {columns} columns")]
    ArityMismatch { columns: usize, values: usize },

    #[error("Unsupported statement: {details}")]
    Unsupported { details: String },

    #[error("Serialization/deserialization error: {details}")]
    SerializationError { details: String },
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
