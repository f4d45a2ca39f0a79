use crate::error::EncodingError;
use crate::types::{AttributeValue, ScalarType};

/// Type tag bytes written ahead of every encoded key component.
pub const TAG_STRING: u8 = 0x01;
pub const TAG_NUMBER: u8 = 0x02;
pub const TAG_BINARY: u8 = 0x03;

pub fn scalar_type_tag(ty: ScalarType) -> u8 {
    match ty {
        ScalarType::String => TAG_STRING,
        ScalarType::Number => TAG_NUMBER,
        ScalarType::Binary => TAG_BINARY,
    }
}

pub fn tag_to_scalar_type(tag: u8) -> Result<ScalarType, EncodingError> {
    match tag {
        TAG_STRING => Ok(ScalarType::String),
        TAG_NUMBER => Ok(ScalarType::Number),
        TAG_BINARY => Ok(ScalarType::Binary),
        _ => Err(EncodingError::InvalidTypeTag(tag)),
    }
}

/// Append one tagged key component to `out`.
pub fn encode_component(value: &AttributeValue, out: &mut Vec<u8>) -> Result<(), EncodingError> {
    out.push(scalar_type_tag(value.scalar_type()));
    match value {
        AttributeValue::String(s) => out.extend(super::string::encode_string(s)),
        AttributeValue::Number(n) => out.extend(super::number::encode_number(*n)?),
        AttributeValue::Binary(b) => out.extend(super::binary::encode_binary(b)),
    }
    Ok(())
}

/// Decode one tagged key component, returning it and the bytes consumed (tag included).
pub fn decode_component(data: &[u8]) -> Result<(AttributeValue, usize), EncodingError> {
    let (&tag, rest) = data.split_first().ok_or(EncodingError::MalformedKey)?;
    match tag_to_scalar_type(tag)? {
        ScalarType::String => {
            let (s, consumed) = super::string::decode_string(rest)?;
            Ok((AttributeValue::String(s), 1 + consumed))
        }
        ScalarType::Number => {
            let arr: [u8; 8] = rest
                .get(..8)
                .and_then(|b| b.try_into().ok())
                .ok_or(EncodingError::MalformedKey)?;
            Ok((AttributeValue::Number(super::number::decode_number(&arr)), 9))
        }
        ScalarType::Binary => {
            let (b, consumed) = super::binary::decode_binary(rest)?;
            Ok((AttributeValue::Binary(b), 1 + consumed))
        }
    }
}

/// Encode the storage key for an item: `[tag][hash]` or `[tag][hash][tag][range]`.
pub fn encode_composite(
    hash: &AttributeValue,
    range: Option<&AttributeValue>,
) -> Result<Vec<u8>, EncodingError> {
    let mut out = Vec::new();
    encode_component(hash, &mut out)?;
    if let Some(range) = range {
        encode_component(range, &mut out)?;
    }
    Ok(out)
}

/// Decode a storage key produced by [`encode_composite`].
pub fn decode_composite(
    data: &[u8],
    has_range_key: bool,
) -> Result<(AttributeValue, Option<AttributeValue>), EncodingError> {
    let (hash, consumed) = decode_component(data)?;
    let rest = &data[consumed..];
    let range = if has_range_key {
        let (range, range_consumed) = decode_component(rest)?;
        if range_consumed != rest.len() {
            return Err(EncodingError::MalformedKey);
        }
        Some(range)
    } else {
        if !rest.is_empty() {
            return Err(EncodingError::MalformedKey);
        }
        None
    };
    Ok((hash, range))
}

/// The shared prefix of every storage key under one hash value.
pub fn encode_hash_prefix(hash: &AttributeValue) -> Result<Vec<u8>, EncodingError> {
    encode_composite(hash, None)
}
