use crate::config::EngineConfig;
use crate::encoding::composite;
use crate::error::{EncodingError, Error, SchemaError};
use crate::types::{AttributeValue, Item, KeySchema, KeySchemaElement};

/// Check that a key value carries the scalar type declared for its attribute.
pub fn check_key_type(value: &AttributeValue, element: &KeySchemaElement) -> Result<(), Error> {
    let actual = value.scalar_type();
    if actual != element.attribute_type {
        return Err(SchemaError::KeyTypeMismatch {
            name: element.attribute_name.clone(),
            expected: element.attribute_type,
            actual,
        }
        .into());
    }
    if let AttributeValue::Number(n) = value {
        if n.is_nan() {
            return Err(EncodingError::NaN.into());
        }
        if n.is_infinite() {
            return Err(EncodingError::NonFinite(element.attribute_name.clone()).into());
        }
    }
    Ok(())
}

/// Look up a key attribute on an item and check its type.
pub fn extract_key_from_item<'a>(
    item: &'a Item,
    element: &KeySchemaElement,
) -> Result<&'a AttributeValue, Error> {
    let value = item
        .get(&element.attribute_name)
        .ok_or_else(|| SchemaError::MissingKeyAttribute(element.attribute_name.clone()))?;
    check_key_type(value, element)?;
    Ok(value)
}

fn check_size(value: &AttributeValue, max: usize) -> Result<(), Error> {
    let actual = value.byte_size();
    if actual > max {
        return Err(EncodingError::KeyTooLarge { max, actual }.into());
    }
    Ok(())
}

pub fn validate_hash_key_size(value: &AttributeValue, config: &EngineConfig) -> Result<(), Error> {
    check_size(value, config.max_hash_key_size)
}

pub fn validate_range_key_size(value: &AttributeValue, config: &EngineConfig) -> Result<(), Error> {
    check_size(value, config.max_range_key_size)
}

pub fn validate_item_size(item: &Item, config: &EngineConfig) -> Result<(), Error> {
    let actual = item.byte_size();
    if actual > config.max_item_size {
        return Err(EncodingError::ItemTooLarge {
            max: config.max_item_size,
            actual,
        }
        .into());
    }
    Ok(())
}

/// Check an item before it is stored: size limit, and every Number finite.
///
/// NaN and infinities have no JSON form, so they could not survive a snapshot.
pub fn validate_item(item: &Item, config: &EngineConfig) -> Result<(), Error> {
    validate_item_size(item, config)?;
    for (name, value) in item.iter() {
        if let AttributeValue::Number(n) = value
            && !n.is_finite()
        {
            return Err(EncodingError::NonFinite(name.clone()).into());
        }
    }
    Ok(())
}

/// Validate an explicitly supplied (hash, range) key against the schema and
/// encode it into the storage key.
///
/// A range value is required exactly when the schema declares a range element.
pub fn resolve_key(
    schema: &KeySchema,
    hash: &AttributeValue,
    range: Option<&AttributeValue>,
    config: &EngineConfig,
) -> Result<Vec<u8>, Error> {
    check_key_type(hash, &schema.hash_key_element)?;
    validate_hash_key_size(hash, config)?;

    match (&schema.range_key_element, range) {
        (Some(element), Some(range)) => {
            check_key_type(range, element)?;
            validate_range_key_size(range, config)?;
        }
        (Some(element), None) => {
            return Err(SchemaError::SchemaMismatch(format!(
                "range key '{}' is required",
                element.attribute_name
            ))
            .into());
        }
        (None, Some(_)) => {
            return Err(SchemaError::SchemaMismatch(
                "table has no range key but one was supplied".to_string(),
            )
            .into());
        }
        (None, None) => {}
    }

    Ok(composite::encode_composite(hash, range)?)
}

/// Derive the storage key of an item from its key attributes alone.
pub fn item_storage_key(
    schema: &KeySchema,
    item: &Item,
    config: &EngineConfig,
) -> Result<Vec<u8>, Error> {
    let hash = extract_key_from_item(item, &schema.hash_key_element)?;
    let range = match &schema.range_key_element {
        Some(element) => Some(extract_key_from_item(item, element)?),
        None => None,
    };
    resolve_key(schema, hash, range, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScalarType;

    fn range_schema() -> KeySchema {
        KeySchema::hash("hashCode", ScalarType::String).with_range("rangeCode", ScalarType::String)
    }

    #[test]
    fn test_storage_key_ignores_data_attributes() {
        let schema = range_schema();
        let config = EngineConfig::default();
        let a = Item::new()
            .with("hashCode", "hash2")
            .with("rangeCode", "range2")
            .with("stringData", "string2a");
        let b = Item::new()
            .with("hashCode", "hash2")
            .with("rangeCode", "range2")
            .with("stringData", "string2b")
            .with("intData", 22);
        assert_eq!(
            item_storage_key(&schema, &a, &config).unwrap(),
            item_storage_key(&schema, &b, &config).unwrap()
        );
    }

    #[test]
    fn test_missing_range_attribute() {
        let item = Item::new().with("hashCode", "hash2");
        let err = item_storage_key(&range_schema(), &item, &EngineConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::MissingKeyAttribute(ref name)) if name == "rangeCode"
        ));
    }

    #[test]
    fn test_key_type_mismatch() {
        let item = Item::new().with("hashCode", 7).with("rangeCode", "r");
        let err = item_storage_key(&range_schema(), &item, &EngineConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::KeyTypeMismatch {
                expected: ScalarType::String,
                actual: ScalarType::Number,
                ..
            })
        ));
    }

    #[test]
    fn test_range_arity_must_match_schema() {
        let config = EngineConfig::default();
        let hash = AttributeValue::from("hash1");
        let range = AttributeValue::from("range1");

        let err = resolve_key(&range_schema(), &hash, None, &config).unwrap_err();
        assert!(matches!(err, Error::Schema(SchemaError::SchemaMismatch(_))));

        let hash_only = KeySchema::hash("code", ScalarType::String);
        let err = resolve_key(&hash_only, &hash, Some(&range), &config).unwrap_err();
        assert!(matches!(err, Error::Schema(SchemaError::SchemaMismatch(_))));

        assert!(resolve_key(&hash_only, &hash, None, &config).is_ok());
    }

    #[test]
    fn test_key_size_limits() {
        let config = EngineConfig {
            max_hash_key_size: 4,
            ..EngineConfig::default()
        };
        let schema = KeySchema::hash("code", ScalarType::String);
        let err = resolve_key(&schema, &AttributeValue::from("hash1"), None, &config).unwrap_err();
        assert!(matches!(
            err,
            Error::Encoding(EncodingError::KeyTooLarge { max: 4, actual: 5 })
        ));
    }

    #[test]
    fn test_infinite_key_rejected() {
        let schema = KeySchema::hash("id", ScalarType::Number);
        for n in [f64::INFINITY, f64::NEG_INFINITY] {
            let err = resolve_key(
                &schema,
                &AttributeValue::Number(n),
                None,
                &EngineConfig::default(),
            )
            .unwrap_err();
            assert!(matches!(err, Error::Encoding(EncodingError::NonFinite(ref name)) if name == "id"));
        }
    }

    #[test]
    fn test_validate_item_rejects_non_finite_data() {
        let config = EngineConfig::default();
        let ok = Item::new().with("id", "u").with("score", f64::MAX);
        assert!(validate_item(&ok, &config).is_ok());

        for n in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let item = Item::new().with("id", "u").with("score", n);
            let err = validate_item(&item, &config).unwrap_err();
            assert!(matches!(err, Error::Encoding(EncodingError::NonFinite(ref name)) if name == "score"));
        }
    }

    #[test]
    fn test_nan_key_rejected() {
        let schema = KeySchema::hash("id", ScalarType::Number);
        let err = resolve_key(
            &schema,
            &AttributeValue::Number(f64::NAN),
            None,
            &EngineConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Encoding(EncodingError::NaN)));
    }
}
