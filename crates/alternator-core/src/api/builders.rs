use tracing::trace;

use crate::consistency::Observed;
use crate::error::{Error, QueryError, SchemaError};
use crate::types::{AttributeValue, Item, KeySchema, KeySchemaElement, ScalarType};

use super::database::AlternatorDB;
use super::key_utils;
use super::query::{Condition, SortCondition, compute_scan_bounds};

// ---------------------------------------------------------------------------
// TableBuilder
// ---------------------------------------------------------------------------

/// Builder for creating a new table.
pub struct TableBuilder<'a> {
    db: &'a AlternatorDB,
    name: String,
    hash_key: Option<(String, ScalarType)>,
    range_key: Option<(String, ScalarType)>,
}

impl<'a> TableBuilder<'a> {
    pub(crate) fn new(db: &'a AlternatorDB, name: String) -> Self {
        Self {
            db,
            name,
            hash_key: None,
            range_key: None,
        }
    }

    /// Set the hash key attribute and type.
    pub fn hash_key(mut self, name: &str, attribute_type: ScalarType) -> Self {
        self.hash_key = Some((name.to_string(), attribute_type));
        self
    }

    /// Set the (optional) range key attribute and type.
    pub fn range_key(mut self, name: &str, attribute_type: ScalarType) -> Self {
        self.range_key = Some((name.to_string(), attribute_type));
        self
    }

    /// Execute the table creation.
    pub fn execute(self) -> Result<(), Error> {
        let (hash_name, hash_type) = self.hash_key.ok_or_else(|| {
            SchemaError::InvalidSchema("hash key element is required".to_string())
        })?;
        let key_schema = KeySchema {
            hash_key_element: KeySchemaElement::new(&hash_name, hash_type),
            range_key_element: self
                .range_key
                .map(|(name, ty)| KeySchemaElement::new(&name, ty)),
        };
        self.db.create_table_with_schema(&self.name, key_schema)
    }
}

// ---------------------------------------------------------------------------
// PutItemBuilder
// ---------------------------------------------------------------------------

/// How a put treats an item already stored at the same key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveBehavior {
    /// Replace the stored item entirely; no attributes survive from it.
    #[default]
    Clobber,
}

/// Builder for inserting or replacing an item.
pub struct PutItemBuilder<'a> {
    db: &'a AlternatorDB,
    table: String,
    item: Item,
    save_behavior: SaveBehavior,
}

impl<'a> PutItemBuilder<'a> {
    pub(crate) fn new(db: &'a AlternatorDB, table: String, item: Item) -> Self {
        Self {
            db,
            table,
            item,
            save_behavior: SaveBehavior::default(),
        }
    }

    pub fn save_behavior(mut self, behavior: SaveBehavior) -> Self {
        self.save_behavior = behavior;
        self
    }

    /// Execute the put, returning the item it replaced (if any).
    pub fn execute(self) -> Result<Option<Item>, Error> {
        let entry = self.db.table(&self.table)?;
        let config = self.db.config();

        // Validate everything before taking the write lock so a failed put
        // never touches the store.
        key_utils::validate_item(&self.item, config)?;
        let key = key_utils::item_storage_key(&entry.schema.key_schema, &self.item, config)?;

        let item = self.item;
        let written = match self.save_behavior {
            SaveBehavior::Clobber => entry.data.write(move |store| Ok(store.put(key, item)))?,
        };
        trace!(table = %self.table, sequence = written.sequence, "put item");
        Ok(written.value)
    }
}

// ---------------------------------------------------------------------------
// GetItemBuilder
// ---------------------------------------------------------------------------

/// Builder for getting a single item by key.
pub struct GetItemBuilder<'a> {
    db: &'a AlternatorDB,
    table: String,
    hash_key: Option<AttributeValue>,
    range_key: Option<AttributeValue>,
}

impl<'a> GetItemBuilder<'a> {
    pub(crate) fn new(db: &'a AlternatorDB, table: String) -> Self {
        Self {
            db,
            table,
            hash_key: None,
            range_key: None,
        }
    }

    /// Set the hash key value.
    pub fn hash_key(mut self, value: impl Into<AttributeValue>) -> Self {
        self.hash_key = Some(value.into());
        self
    }

    /// Set the range key value (for tables with a range key).
    pub fn range_key(mut self, value: impl Into<AttributeValue>) -> Self {
        self.range_key = Some(value.into());
        self
    }

    /// Execute the get. A key with no item is `Ok(None)`, not an error.
    pub fn execute(self) -> Result<Option<Item>, Error> {
        Ok(self.execute_observed()?.value)
    }

    /// Execute the get, also reporting the table's commit sequence the read reflects.
    pub fn execute_observed(self) -> Result<Observed<Option<Item>>, Error> {
        let hash = self.hash_key.ok_or(QueryError::HashKeyRequired)?;
        let entry = self.db.table(&self.table)?;
        let key = key_utils::resolve_key(
            &entry.schema.key_schema,
            &hash,
            self.range_key.as_ref(),
            self.db.config(),
        )?;
        Ok(entry.data.read(|store| store.get(&key).cloned()))
    }
}

// ---------------------------------------------------------------------------
// DeleteItemBuilder
// ---------------------------------------------------------------------------

/// Builder for deleting an item by key.
pub struct DeleteItemBuilder<'a> {
    db: &'a AlternatorDB,
    table: String,
    hash_key: Option<AttributeValue>,
    range_key: Option<AttributeValue>,
}

impl<'a> DeleteItemBuilder<'a> {
    pub(crate) fn new(db: &'a AlternatorDB, table: String) -> Self {
        Self {
            db,
            table,
            hash_key: None,
            range_key: None,
        }
    }

    pub fn hash_key(mut self, value: impl Into<AttributeValue>) -> Self {
        self.hash_key = Some(value.into());
        self
    }

    pub fn range_key(mut self, value: impl Into<AttributeValue>) -> Self {
        self.range_key = Some(value.into());
        self
    }

    /// Execute the delete. Deleting a missing item is a no-op.
    pub fn execute(self) -> Result<(), Error> {
        self.execute_returning_old().map(|_| ())
    }

    /// Execute the delete and return the removed item, if there was one.
    pub fn execute_returning_old(self) -> Result<Option<Item>, Error> {
        let hash = self.hash_key.ok_or(QueryError::HashKeyRequired)?;
        let entry = self.db.table(&self.table)?;
        let key = key_utils::resolve_key(
            &entry.schema.key_schema,
            &hash,
            self.range_key.as_ref(),
            self.db.config(),
        )?;
        let removed = entry.data.write(|store| Ok(store.delete(&key)))?;
        trace!(
            table = %self.table,
            found = removed.value.is_some(),
            "delete item"
        );
        Ok(removed.value)
    }
}

// ---------------------------------------------------------------------------
// QueryBuilder
// ---------------------------------------------------------------------------

/// Builder for querying the items under one hash key.
pub struct QueryBuilder<'a> {
    db: &'a AlternatorDB,
    table: String,
    hash_key: Option<AttributeValue>,
    range_condition: Option<Condition>,
    limit: Option<usize>,
}

impl<'a> QueryBuilder<'a> {
    pub(crate) fn new(db: &'a AlternatorDB, table: String) -> Self {
        Self {
            db,
            table,
            hash_key: None,
            range_condition: None,
            limit: None,
        }
    }

    pub fn hash_key(mut self, value: impl Into<AttributeValue>) -> Self {
        self.hash_key = Some(value.into());
        self
    }

    pub fn range_condition(mut self, condition: Condition) -> Self {
        self.range_condition = Some(condition);
        self
    }

    pub fn range_key_eq(self, value: impl Into<AttributeValue>) -> Self {
        self.range_condition(Condition::eq(value))
    }

    pub fn range_key_lt(self, value: impl Into<AttributeValue>) -> Self {
        self.range_condition(Condition::lt(value))
    }

    pub fn range_key_le(self, value: impl Into<AttributeValue>) -> Self {
        self.range_condition(Condition::le(value))
    }

    pub fn range_key_gt(self, value: impl Into<AttributeValue>) -> Self {
        self.range_condition(Condition::gt(value))
    }

    pub fn range_key_ge(self, value: impl Into<AttributeValue>) -> Self {
        self.range_condition(Condition::ge(value))
    }

    pub fn range_key_between(
        self,
        low: impl Into<AttributeValue>,
        high: impl Into<AttributeValue>,
    ) -> Self {
        self.range_condition(Condition::between(low, high))
    }

    pub fn range_key_begins_with(self, prefix: impl Into<AttributeValue>) -> Self {
        self.range_condition(Condition::begins_with(prefix))
    }

    /// Return at most `n` items (the first `n` in range key order).
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Execute the query. Items come back in ascending range key order.
    pub fn execute(self) -> Result<Vec<Item>, Error> {
        Ok(self.execute_observed()?.value)
    }

    /// Execute the query, also reporting the table's commit sequence the read reflects.
    pub fn execute_observed(self) -> Result<Observed<Vec<Item>>, Error> {
        let hash = self.hash_key.ok_or(QueryError::HashKeyRequired)?;
        let entry = self.db.table(&self.table)?;
        let key_schema = &entry.schema.key_schema;

        key_utils::check_key_type(&hash, &key_schema.hash_key_element)?;
        key_utils::validate_hash_key_size(&hash, self.db.config())?;

        let sort_condition = match (&self.range_condition, &key_schema.range_key_element) {
            (Some(condition), Some(range)) => Some(SortCondition::from_condition(condition, range)?),
            (Some(_), None) => {
                return Err(SchemaError::SchemaMismatch(
                    "range key condition on a table without a range key".to_string(),
                )
                .into());
            }
            (None, _) => None,
        };

        let (start, end) = compute_scan_bounds(&hash, sort_condition.as_ref())?;
        let limit = self.limit.unwrap_or(usize::MAX);

        let observed = entry.data.read(|store| {
            store
                .range(start.as_deref(), end.as_deref())
                .take(limit)
                .map(|(_, item)| item.clone())
                .collect::<Vec<_>>()
        });
        trace!(table = %self.table, count = observed.value.len(), "query");
        Ok(observed)
    }
}
