use serde::{Deserialize, Serialize};

use crate::encoding::{binary, composite};
use crate::error::{Error, QueryError};
use crate::types::{AttributeValue, KeySchemaElement, ScalarType};

use super::key_utils::check_key_type;

/// Comparison operators accepted in a range key condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonOperator {
    Eq,
    Lt,
    Le,
    Gt,
    Ge,
    Between,
    BeginsWith,
}

impl ComparisonOperator {
    /// Number of operands the operator takes.
    pub fn arity(self) -> usize {
        match self {
            ComparisonOperator::Between => 2,
            _ => 1,
        }
    }
}

/// A range key condition: an operator and its operand list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub comparison_operator: ComparisonOperator,
    pub attribute_value_list: Vec<AttributeValue>,
}

impl Condition {
    pub fn new(operator: ComparisonOperator, operands: Vec<AttributeValue>) -> Self {
        Self {
            comparison_operator: operator,
            attribute_value_list: operands,
        }
    }

    pub fn eq(value: impl Into<AttributeValue>) -> Self {
        Self::new(ComparisonOperator::Eq, vec![value.into()])
    }

    pub fn lt(value: impl Into<AttributeValue>) -> Self {
        Self::new(ComparisonOperator::Lt, vec![value.into()])
    }

    pub fn le(value: impl Into<AttributeValue>) -> Self {
        Self::new(ComparisonOperator::Le, vec![value.into()])
    }

    pub fn gt(value: impl Into<AttributeValue>) -> Self {
        Self::new(ComparisonOperator::Gt, vec![value.into()])
    }

    pub fn ge(value: impl Into<AttributeValue>) -> Self {
        Self::new(ComparisonOperator::Ge, vec![value.into()])
    }

    /// Inclusive on both ends; `low` must be the lower bound.
    pub fn between(low: impl Into<AttributeValue>, high: impl Into<AttributeValue>) -> Self {
        Self::new(ComparisonOperator::Between, vec![low.into(), high.into()])
    }

    pub fn begins_with(prefix: impl Into<AttributeValue>) -> Self {
        Self::new(ComparisonOperator::BeginsWith, vec![prefix.into()])
    }
}

/// A validated range key condition.
#[derive(Debug, Clone, PartialEq)]
pub enum SortCondition {
    Eq(AttributeValue),
    Lt(AttributeValue),
    Le(AttributeValue),
    Gt(AttributeValue),
    Ge(AttributeValue),
    Between(AttributeValue, AttributeValue),
    BeginsWith(AttributeValue),
}

impl SortCondition {
    /// Check operand count and operand types against the range key element.
    pub fn from_condition(condition: &Condition, range: &KeySchemaElement) -> Result<Self, Error> {
        let op = condition.comparison_operator;
        let operands = &condition.attribute_value_list;
        if operands.len() != op.arity() {
            return Err(QueryError::InvalidCondition(format!(
                "{op:?} takes {} operand(s), got {}",
                op.arity(),
                operands.len()
            ))
            .into());
        }
        for operand in operands {
            check_key_type(operand, range)?;
        }
        if op == ComparisonOperator::BeginsWith && range.attribute_type == ScalarType::Number {
            return Err(QueryError::InvalidCondition(
                "BEGINS_WITH is not supported on number range keys".to_string(),
            )
            .into());
        }

        let first = operands[0].clone();
        Ok(match op {
            ComparisonOperator::Eq => SortCondition::Eq(first),
            ComparisonOperator::Lt => SortCondition::Lt(first),
            ComparisonOperator::Le => SortCondition::Le(first),
            ComparisonOperator::Gt => SortCondition::Gt(first),
            ComparisonOperator::Ge => SortCondition::Ge(first),
            ComparisonOperator::Between => SortCondition::Between(first, operands[1].clone()),
            ComparisonOperator::BeginsWith => SortCondition::BeginsWith(first),
        })
    }
}

/// Increment a byte string lexicographically.
///
/// Finds the rightmost byte < 0xFF, increments it, and truncates everything
/// after it. Returns `None` if all bytes are 0xFF.
fn increment_bytes(bytes: &[u8]) -> Option<Vec<u8>> {
    let pos = bytes.iter().rposition(|&b| b < 0xFF)?;
    let mut out = bytes[..=pos].to_vec();
    out[pos] += 1;
    Some(out)
}

/// A pair of optional byte-vector bounds for a range scan.
pub type ScanBounds = (Option<Vec<u8>>, Option<Vec<u8>>);

fn encode_with_range(prefix: &[u8], range: &AttributeValue) -> Result<Vec<u8>, Error> {
    let mut out = prefix.to_vec();
    composite::encode_component(range, &mut out)?;
    Ok(out)
}

/// Storage key bounds `[start, end)` selecting every item under `hash` whose
/// range key satisfies `condition`.
///
/// Encoded range keys are prefix-free, so appending `0xFF` to an encoded key
/// yields a bound above that key but below every larger key.
pub fn compute_scan_bounds(
    hash: &AttributeValue,
    condition: Option<&SortCondition>,
) -> Result<ScanBounds, Error> {
    let prefix = composite::encode_hash_prefix(hash)?;
    let hash_end = increment_bytes(&prefix);

    let Some(condition) = condition else {
        return Ok((Some(prefix), hash_end));
    };

    let after = |v: &AttributeValue| -> Result<Vec<u8>, Error> {
        let mut key = encode_with_range(&prefix, v)?;
        key.push(0xFF);
        Ok(key)
    };

    Ok(match condition {
        SortCondition::Eq(v) => (Some(encode_with_range(&prefix, v)?), Some(after(v)?)),
        SortCondition::Lt(v) => (Some(prefix.clone()), Some(encode_with_range(&prefix, v)?)),
        SortCondition::Le(v) => (Some(prefix.clone()), Some(after(v)?)),
        SortCondition::Gt(v) => (Some(after(v)?), hash_end),
        SortCondition::Ge(v) => (Some(encode_with_range(&prefix, v)?), hash_end),
        SortCondition::Between(low, high) => {
            (Some(encode_with_range(&prefix, low)?), Some(after(high)?))
        }
        SortCondition::BeginsWith(v) => {
            let raw: &[u8] = match v {
                AttributeValue::String(s) => s.as_bytes(),
                AttributeValue::Binary(b) => b,
                AttributeValue::Number(_) => {
                    return Err(QueryError::InvalidCondition(
                        "BEGINS_WITH needs a string or binary operand".to_string(),
                    )
                    .into());
                }
            };
            let mut start = prefix.clone();
            start.push(composite::scalar_type_tag(v.scalar_type()));
            binary::escape_into(raw, &mut start);
            let end = increment_bytes(&start).or(hash_end);
            (Some(start), end)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EncodingError, SchemaError};

    fn range_element() -> KeySchemaElement {
        KeySchemaElement::new("rangeCode", ScalarType::String)
    }

    #[test]
    fn test_increment_bytes() {
        assert_eq!(increment_bytes(&[0x01, 0x02]), Some(vec![0x01, 0x03]));
        assert_eq!(increment_bytes(&[0x01, 0xFF]), Some(vec![0x02]));
        assert_eq!(increment_bytes(&[0xFF, 0xFF]), None);
    }

    #[test]
    fn test_between_bounds_are_inclusive() {
        let hash = AttributeValue::from("hash2");
        let cond = SortCondition::Between("range2c".into(), "range2d".into());
        let (start, end) = compute_scan_bounds(&hash, Some(&cond)).unwrap();
        let (start, end) = (start.unwrap(), end.unwrap());

        let key = |r: &str| composite::encode_composite(&hash, Some(&r.into())).unwrap();
        assert!(key("range2c") >= start && key("range2c") < end);
        assert!(key("range2d") >= start && key("range2d") < end);
        assert!(key("range2e") >= end);
        assert!(key("range2") < start);
        assert!(key("range2d0") >= end, "keys extending the upper bound are above it");
    }

    #[test]
    fn test_no_condition_covers_whole_hash() {
        let hash = AttributeValue::from("hash2");
        let (start, end) = compute_scan_bounds(&hash, None).unwrap();
        let other = composite::encode_composite(&"hash3".into(), Some(&"a".into())).unwrap();
        let own = composite::encode_composite(&hash, Some(&"zzz".into())).unwrap();
        assert!(own >= start.clone().unwrap() && own < end.clone().unwrap());
        assert!(other >= end.unwrap());
    }

    #[test]
    fn test_operand_count_checked() {
        let cond = Condition::new(ComparisonOperator::Between, vec!["range2c".into()]);
        let err = SortCondition::from_condition(&cond, &range_element()).unwrap_err();
        assert!(matches!(err, Error::Query(QueryError::InvalidCondition(_))));

        let cond = Condition::new(ComparisonOperator::Eq, vec![]);
        assert!(SortCondition::from_condition(&cond, &range_element()).is_err());
    }

    #[test]
    fn test_operand_type_checked() {
        let err = SortCondition::from_condition(&Condition::eq(5), &range_element()).unwrap_err();
        assert!(matches!(err, Error::Schema(SchemaError::KeyTypeMismatch { .. })));
    }

    #[test]
    fn test_non_finite_operand_rejected() {
        let numeric = KeySchemaElement::new("seq", ScalarType::Number);
        let err = SortCondition::from_condition(&Condition::gt(f64::INFINITY), &numeric)
            .unwrap_err();
        assert!(matches!(err, Error::Encoding(EncodingError::NonFinite(_))));
        let err =
            SortCondition::from_condition(&Condition::between(0, f64::NAN), &numeric).unwrap_err();
        assert!(matches!(err, Error::Encoding(EncodingError::NaN)));
    }

    #[test]
    fn test_begins_with_rejected_on_numbers() {
        let numeric = KeySchemaElement::new("seq", ScalarType::Number);
        let err =
            SortCondition::from_condition(&Condition::begins_with(1), &numeric).unwrap_err();
        assert!(matches!(err, Error::Query(QueryError::InvalidCondition(_))));
    }

    #[test]
    fn test_condition_serde_names() {
        let json = serde_json::to_value(Condition::between("a", "b")).unwrap();
        assert_eq!(json["comparison_operator"], "BETWEEN");
        let json = serde_json::to_value(Condition::begins_with("a")).unwrap();
        assert_eq!(json["comparison_operator"], "BEGINS_WITH");
    }
}
