//! Table registry: table name to schema and item store.

pub mod ops;

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::consistency::ConsistentStore;
use crate::error::Error;
use crate::store::ItemStore;
use crate::types::TableSchema;

/// Registered tables by name.
pub type TableMap = BTreeMap<String, Arc<TableEntry>>;

/// A registered table: its schema and its guarded item store.
#[derive(Debug)]
pub struct TableEntry {
    pub schema: TableSchema,
    pub data: ConsistentStore,
}

impl TableEntry {
    pub fn new(schema: TableSchema) -> Self {
        Self::with_items(schema, ItemStore::new())
    }

    pub fn with_items(schema: TableSchema, items: ItemStore) -> Self {
        Self {
            schema,
            data: ConsistentStore::new(items),
        }
    }
}

/// The set of tables owned by one database handle.
///
/// Creating and dropping tables takes the registry's write lock; item
/// operations only hold its read lock long enough to clone a table's `Arc`.
#[derive(Debug, Default)]
pub struct Catalog {
    tables: RwLock<TableMap>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_table(&self, schema: TableSchema) -> Result<Arc<TableEntry>, Error> {
        ops::create_table(&mut self.tables.write(), TableEntry::new(schema))
    }

    /// Register a table that already holds items (snapshot restore).
    pub fn restore_table(&self, entry: TableEntry) -> Result<Arc<TableEntry>, Error> {
        ops::create_table(&mut self.tables.write(), entry)
    }

    pub fn drop_table(&self, name: &str) -> Result<Arc<TableEntry>, Error> {
        ops::drop_table(&mut self.tables.write(), name)
    }

    pub fn get_table(&self, name: &str) -> Result<Arc<TableEntry>, Error> {
        ops::get_table(&self.tables.read(), name)
    }

    pub fn list_tables(&self) -> Vec<String> {
        ops::list_tables(&self.tables.read())
    }

    /// All tables, in name order.
    pub fn entries(&self) -> Vec<Arc<TableEntry>> {
        self.tables.read().values().cloned().collect()
    }

    /// Drop every table, returning how many were removed.
    pub fn drop_all(&self) -> usize {
        let mut tables = self.tables.write();
        let count = tables.len();
        tables.clear();
        count
    }
}
