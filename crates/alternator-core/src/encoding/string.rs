//! String keys encode their UTF-8 bytes with the binary scheme, so strings
//! order by byte-wise comparison of their UTF-8 form.

use crate::error::EncodingError;

use super::binary;

pub fn encode_string(s: &str) -> Vec<u8> {
    binary::encode_binary(s.as_bytes())
}

pub fn decode_string(data: &[u8]) -> Result<(String, usize), EncodingError> {
    let (bytes, consumed) = binary::decode_binary(data)?;
    let s = String::from_utf8(bytes).map_err(|_| EncodingError::MalformedKey)?;
    Ok((s, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_order() {
        let ascending = ["", "hash1", "hash1x", "hash2", "range2", "range2c", "range2d", "é"];
        for pair in ascending.windows(2) {
            assert!(encode_string(pair[0]) < encode_string(pair[1]));
        }
    }

    #[test]
    fn test_decode_string() {
        let encoded = encode_string("string2b");
        assert_eq!(decode_string(&encoded).unwrap(), ("string2b".to_string(), 10));
    }
}
