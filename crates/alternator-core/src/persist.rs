//! JSON snapshots of a whole database.
//!
//! A snapshot lists each table's schema and its items in key order. Storage
//! keys are not persisted: they are recomputed from the items on load, which
//! also re-validates every item against its schema.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::key_utils;
use crate::catalog::TableEntry;
use crate::config::EngineConfig;
use crate::error::{Error, StorageError};
use crate::store::ItemStore;
use crate::types::{Item, TableSchema};

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    version: u32,
    tables: Vec<TableSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TableSnapshot {
    schema: TableSchema,
    items: Vec<Item>,
}

/// Serialize `tables` to `path`.
///
/// The document is written to a sibling temporary file first and renamed into
/// place, so a crash never leaves a truncated snapshot at `path`.
pub fn write_snapshot(path: &Path, tables: &[Arc<TableEntry>]) -> Result<(), Error> {
    let snapshot = SnapshotFile {
        version: SNAPSHOT_VERSION,
        tables: tables
            .iter()
            .map(|entry| TableSnapshot {
                schema: entry.schema.clone(),
                items: entry
                    .data
                    .read(|store| store.iter().map(|(_, item)| item.clone()).collect::<Vec<_>>())
                    .value,
            })
            .collect(),
    };

    let bytes = serde_json::to_vec_pretty(&snapshot).map_err(StorageError::from)?;
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, bytes).map_err(StorageError::from)?;
    fs::rename(&tmp_path, path).map_err(StorageError::from)?;
    Ok(())
}

/// Read a snapshot from `path` and rebuild each table's item store.
pub fn read_snapshot(path: &Path, config: &EngineConfig) -> Result<Vec<TableEntry>, Error> {
    let bytes = fs::read(path).map_err(StorageError::from)?;
    let snapshot: SnapshotFile = serde_json::from_slice(&bytes).map_err(StorageError::from)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(StorageError::UnsupportedVersion(snapshot.version).into());
    }

    snapshot
        .tables
        .into_iter()
        .map(|table| -> Result<TableEntry, Error> {
            let mut store = ItemStore::new();
            for item in table.items {
                key_utils::validate_item(&item, config)?;
                let key = key_utils::item_storage_key(&table.schema.key_schema, &item, config)?;
                store.put(key, item);
            }
            Ok(TableEntry::with_items(table.schema, store))
        })
        .collect()
}
