//! Registry operations: create, drop, get and list tables.
//!
//! These work on a [`TableMap`] the caller has already locked, so the
//! existence check and the mutation happen under one lock acquisition.

use std::sync::Arc;

use crate::error::{Error, SchemaError};
use crate::types::{KeySchema, TableSchema};

use super::{TableEntry, TableMap};

const MIN_TABLE_NAME_LEN: usize = 3;
const MAX_TABLE_NAME_LEN: usize = 255;

/// Table names follow DynamoDB's rules: 3-255 characters of `[A-Za-z0-9_.-]`.
pub fn validate_table_name(name: &str) -> Result<(), Error> {
    let len_ok = (MIN_TABLE_NAME_LEN..=MAX_TABLE_NAME_LEN).contains(&name.len());
    let chars_ok = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if len_ok && chars_ok {
        Ok(())
    } else {
        Err(SchemaError::InvalidTableName(name.to_string()).into())
    }
}

/// Check that every key element names an attribute and that hash and range
/// name different attributes.
pub fn validate_key_schema(schema: &KeySchema) -> Result<(), Error> {
    let hash_name = &schema.hash_key_element.attribute_name;
    if hash_name.is_empty() {
        return Err(
            SchemaError::InvalidSchema("hash key element has no attribute name".to_string()).into(),
        );
    }
    if let Some(range) = &schema.range_key_element {
        if range.attribute_name.is_empty() {
            return Err(SchemaError::InvalidSchema(
                "range key element has no attribute name".to_string(),
            )
            .into());
        }
        if &range.attribute_name == hash_name {
            return Err(SchemaError::InvalidSchema(format!(
                "hash and range key both use attribute '{hash_name}'"
            ))
            .into());
        }
    }
    Ok(())
}

/// Register a new table.
///
/// Validates the name and key schema, then rejects duplicates.
pub fn create_table(tables: &mut TableMap, entry: TableEntry) -> Result<Arc<TableEntry>, Error> {
    let TableSchema { name, key_schema } = &entry.schema;
    validate_table_name(name)?;
    validate_key_schema(key_schema)?;

    if tables.contains_key(name) {
        return Err(SchemaError::TableAlreadyExists(name.clone()).into());
    }

    let entry = Arc::new(entry);
    tables.insert(entry.schema.name.clone(), Arc::clone(&entry));
    Ok(entry)
}

/// Remove a table and, with it, all of its items.
pub fn drop_table(tables: &mut TableMap, name: &str) -> Result<Arc<TableEntry>, Error> {
    tables
        .remove(name)
        .ok_or_else(|| SchemaError::TableNotFound(name.to_string()).into())
}

pub fn get_table(tables: &TableMap, name: &str) -> Result<Arc<TableEntry>, Error> {
    tables
        .get(name)
        .cloned()
        .ok_or_else(|| SchemaError::TableNotFound(name.to_string()).into())
}

/// Table names in ascending order.
pub fn list_tables(tables: &TableMap) -> Vec<String> {
    tables.keys().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KeySchemaElement, ScalarType};

    fn schema(name: &str) -> TableSchema {
        TableSchema {
            name: name.to_string(),
            key_schema: KeySchema::hash("code", ScalarType::String),
        }
    }

    #[test]
    fn test_create_get_drop() {
        let mut tables = TableMap::new();
        create_table(&mut tables, TableEntry::new(schema("mapper.TestClassWithHashKey"))).unwrap();

        let entry = get_table(&tables, "mapper.TestClassWithHashKey").unwrap();
        assert_eq!(entry.schema.key_schema.hash_key_element.attribute_name, "code");

        drop_table(&mut tables, "mapper.TestClassWithHashKey").unwrap();
        let err = get_table(&tables, "mapper.TestClassWithHashKey").unwrap_err();
        assert!(err.is_table_not_found());
    }

    #[test]
    fn test_duplicate_table_rejected() {
        let mut tables = TableMap::new();
        create_table(&mut tables, TableEntry::new(schema("users"))).unwrap();
        let err = create_table(&mut tables, TableEntry::new(schema("users"))).unwrap_err();
        assert!(matches!(err, Error::Schema(SchemaError::TableAlreadyExists(ref n)) if n == "users"));
    }

    #[test]
    fn test_drop_missing_table() {
        let mut tables = TableMap::new();
        assert!(drop_table(&mut tables, "nope").unwrap_err().is_table_not_found());
    }

    #[test]
    fn test_list_tables_sorted() {
        let mut tables = TableMap::new();
        for name in ["zeta", "alpha", "mid"] {
            create_table(&mut tables, TableEntry::new(schema(name))).unwrap();
        }
        assert_eq!(list_tables(&tables), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_table_name_rules() {
        assert!(validate_table_name("mapper.TestClassWithRangeHashKey").is_ok());
        assert!(validate_table_name("a_b-c").is_ok());
        assert!(validate_table_name("ab").is_err());
        assert!(validate_table_name("has space").is_err());
        assert!(validate_table_name(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_invalid_key_schemas() {
        let no_hash_name = KeySchema::hash("", ScalarType::String);
        assert!(matches!(
            validate_key_schema(&no_hash_name),
            Err(Error::Schema(SchemaError::InvalidSchema(_)))
        ));

        let mut no_range_name = KeySchema::hash("hashCode", ScalarType::String);
        no_range_name.range_key_element = Some(KeySchemaElement::new("", ScalarType::String));
        assert!(validate_key_schema(&no_range_name).is_err());

        let same_name = KeySchema::hash("id", ScalarType::String).with_range("id", ScalarType::Number);
        assert!(validate_key_schema(&same_name).is_err());
    }
}
