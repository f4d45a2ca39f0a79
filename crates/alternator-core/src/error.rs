//! Error types for all Alternator operations.

use std::io;
use thiserror::Error;

use crate::types::ScalarType;

/// Top-level error type for Alternator operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl Error {
    /// True if this error reports a missing table.
    pub fn is_table_not_found(&self) -> bool {
        matches!(self, Error::Schema(SchemaError::TableNotFound(_)))
    }
}

/// Errors from snapshot persistence.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),
}

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("NaN is not a valid key value")]
    NaN,

    #[error("attribute '{0}' holds a non-finite number")]
    NonFinite(String),

    #[error("item exceeds maximum size of {max} bytes (got {actual})")]
    ItemTooLarge { max: usize, actual: usize },

    #[error("invalid key type tag: {0}")]
    InvalidTypeTag(u8),

    #[error("malformed encoded key")]
    MalformedKey,

    #[error("key exceeds maximum size of {max} bytes (got {actual})")]
    KeyTooLarge { max: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("table already exists: {0}")]
    TableAlreadyExists(String),

    #[error("invalid table name '{0}': must be 3-255 characters of [A-Za-z0-9_.-]")]
    InvalidTableName(String),

    #[error("invalid key schema: {0}")]
    InvalidSchema(String),

    #[error("key does not match table schema: {0}")]
    SchemaMismatch(String),

    #[error("key type mismatch for attribute '{name}': expected {expected:?}, got {actual:?}")]
    KeyTypeMismatch {
        name: String,
        expected: ScalarType,
        actual: ScalarType,
    },

    #[error("missing key attribute: {0}")]
    MissingKeyAttribute(String),
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid range key condition: {0}")]
    InvalidCondition(String),

    #[error("hash key is required")]
    HashKeyRequired,
}

pub type Result<T> = std::result::Result<T, Error>;
