use crate::error::EncodingError;

/// Encode an `f64` as 8 big-endian bytes whose byte order matches numeric order.
///
/// Negative values have every bit inverted; non-negative values only have the
/// sign bit set. `-0.0` encodes like `0.0`. NaN has no position in the order
/// and is rejected.
pub fn encode_number(value: f64) -> Result<[u8; 8], EncodingError> {
    if value.is_nan() {
        return Err(EncodingError::NaN);
    }
    let value = if value == 0.0 { 0.0_f64 } else { value };

    let bits = value.to_bits();
    let flipped = if value.is_sign_negative() {
        !bits
    } else {
        bits | (1u64 << 63)
    };
    Ok(flipped.to_be_bytes())
}

/// Reverse [`encode_number`].
pub fn decode_number(data: &[u8; 8]) -> f64 {
    let bits = u64::from_be_bytes(*data);
    if bits & (1u64 << 63) != 0 {
        f64::from_bits(bits & !(1u64 << 63))
    } else {
        f64::from_bits(!bits)
    }
}
