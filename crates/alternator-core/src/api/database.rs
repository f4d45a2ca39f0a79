use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::catalog::{Catalog, TableEntry};
use crate::config::EngineConfig;
use crate::error::Error;
use crate::persist;
use crate::types::{Item, KeySchema, TableSchema};

use super::builders::{
    DeleteItemBuilder, GetItemBuilder, PutItemBuilder, QueryBuilder, TableBuilder,
};

struct DatabaseInner {
    catalog: Catalog,
    config: EngineConfig,
}

/// The main database handle.
///
/// `AlternatorDB` is cheaply clonable (`Arc`-based) and `Send + Sync`. All
/// clones share the same tables; the tables are dropped with the last clone.
#[derive(Clone)]
pub struct AlternatorDB {
    inner: Arc<DatabaseInner>,
}

impl Default for AlternatorDB {
    fn default() -> Self {
        Self::new()
    }
}

impl AlternatorDB {
    /// Create an empty database with the default limits.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            inner: Arc::new(DatabaseInner {
                catalog: Catalog::new(),
                config,
            }),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.inner.config
    }

    /// Create a table.
    pub fn create_table(&self, name: &str) -> TableBuilder<'_> {
        TableBuilder::new(self, name.to_string())
    }

    /// Create a table from an explicit key schema.
    pub fn create_table_with_schema(&self, name: &str, key_schema: KeySchema) -> Result<(), Error> {
        let schema = TableSchema {
            name: name.to_string(),
            key_schema,
        };
        self.inner.catalog.create_table(schema)?;
        debug!(table = name, "table created");
        Ok(())
    }

    /// Delete a table and every item in it.
    pub fn delete_table(&self, name: &str) -> Result<(), Error> {
        let entry = self.inner.catalog.drop_table(name)?;
        debug!(
            table = name,
            items = entry.data.read(|store| store.len()).value,
            "table deleted"
        );
        Ok(())
    }

    /// Delete every table, returning how many were removed.
    pub fn delete_all_tables(&self) -> usize {
        let count = self.inner.catalog.drop_all();
        debug!(count, "all tables deleted");
        count
    }

    /// Describe a table's schema.
    pub fn describe_table(&self, name: &str) -> Result<TableSchema, Error> {
        Ok(self.table(name)?.schema.clone())
    }

    /// List all table names in ascending order.
    pub fn list_tables(&self) -> Vec<String> {
        self.inner.catalog.list_tables()
    }

    /// Put an item, replacing any item stored at the same key.
    pub fn put_item(&self, table: &str, item: Item) -> Result<(), Error> {
        self.put(table, item).execute().map(|_| ())
    }

    /// Put an item through a builder (save behavior, replaced item).
    pub fn put(&self, table: &str, item: Item) -> PutItemBuilder<'_> {
        PutItemBuilder::new(self, table.to_string(), item)
    }

    /// Get an item from a table by key.
    pub fn get_item(&self, table: &str) -> GetItemBuilder<'_> {
        GetItemBuilder::new(self, table.to_string())
    }

    /// Delete an item from a table by key.
    pub fn delete_item(&self, table: &str) -> DeleteItemBuilder<'_> {
        DeleteItemBuilder::new(self, table.to_string())
    }

    /// Query items by hash key and optional range key condition.
    pub fn query(&self, table: &str) -> QueryBuilder<'_> {
        QueryBuilder::new(self, table.to_string())
    }

    /// Every item in a table, grouped by hash key and ordered by range key.
    pub fn scan(&self, table: &str) -> Result<Vec<Item>, Error> {
        let entry = self.table(table)?;
        Ok(entry
            .data
            .read(|store| {
                store
                    .iter()
                    .map(|(_, item)| item.clone())
                    .collect::<Vec<_>>()
            })
            .value)
    }

    /// Number of writes committed to a table since it was created.
    pub fn commit_sequence(&self, table: &str) -> Result<u64, Error> {
        Ok(self.table(table)?.data.committed_sequence())
    }

    /// Write every table and its items to a JSON snapshot at `path`.
    ///
    /// Each table is copied under its own read lock; writes to other tables
    /// may interleave between tables.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let tables = self.inner.catalog.entries();
        persist::write_snapshot(path, &tables)?;
        debug!(path = %path.display(), tables = tables.len(), "snapshot saved");
        Ok(())
    }

    /// Build a database from a snapshot written by [`save_snapshot`](Self::save_snapshot).
    ///
    /// Every item is re-validated against its table's schema and `config`.
    pub fn load_snapshot(path: impl AsRef<Path>, config: EngineConfig) -> Result<Self, Error> {
        let path = path.as_ref();
        let db = Self::with_config(config);
        let entries = persist::read_snapshot(path, db.config())?;
        let count = entries.len();
        for entry in entries {
            db.inner.catalog.restore_table(entry)?;
        }
        debug!(path = %path.display(), tables = count, "snapshot loaded");
        Ok(db)
    }

    /// Resolve a table by name.
    pub(crate) fn table(&self, name: &str) -> Result<Arc<TableEntry>, Error> {
        self.inner.catalog.get_table(name)
    }
}
