//! Engine configuration.

use serde::Deserialize;

use crate::error::{Error, StorageError};
use crate::types::{MAX_HASH_KEY_SIZE, MAX_ITEM_SIZE, MAX_RANGE_KEY_SIZE};

/// Size limits enforced on writes and key lookups.
///
/// Any field missing from a JSON config falls back to the DynamoDB limit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub max_item_size: usize,
    pub max_hash_key_size: usize,
    pub max_range_key_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_item_size: MAX_ITEM_SIZE,
            max_hash_key_size: MAX_HASH_KEY_SIZE,
            max_range_key_size: MAX_RANGE_KEY_SIZE,
        }
    }
}

impl EngineConfig {
    /// Parse a config from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| StorageError::Serialization(e).into())
    }
}
