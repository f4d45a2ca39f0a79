use crate::error::EncodingError;

const ESCAPE: u8 = 0x00;
const ESCAPED_NULL: u8 = 0x01;
const TERMINATOR: [u8; 2] = [0x00, 0x00];

/// Append the escaped form of `data` (without terminator) to `out`.
///
/// A `0x00` byte becomes `0x00 0x01`; everything else is copied. Because the
/// escape is applied byte by byte, the escaped form of a prefix is a prefix of
/// the escaped form, which `BEGINS_WITH` range scans rely on.
pub fn escape_into(data: &[u8], out: &mut Vec<u8>) {
    for &b in data {
        if b == ESCAPE {
            out.push(ESCAPE);
            out.push(ESCAPED_NULL);
        } else {
            out.push(b);
        }
    }
}

/// Encode bytes with the escaped-terminator scheme.
///
/// The `0x00 0x00` terminator sorts below any escaped byte, so a shorter value
/// orders before every value it is a prefix of, preserving lexicographic order.
pub fn encode_binary(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + TERMINATOR.len());
    escape_into(data, &mut out);
    out.extend_from_slice(&TERMINATOR);
    out
}

/// Decode an escaped-terminator value from the start of `data`.
///
/// Returns the bytes and how many input bytes were consumed, terminator included.
pub fn decode_binary(data: &[u8]) -> Result<(Vec<u8>, usize), EncodingError> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < data.len() {
        if data[i] != ESCAPE {
            out.push(data[i]);
            i += 1;
            continue;
        }
        match data.get(i + 1) {
            Some(&0x00) => return Ok((out, i + 2)),
            Some(&ESCAPED_NULL) => {
                out.push(0x00);
                i += 2;
            }
            _ => return Err(EncodingError::MalformedKey),
        }
    }
    Err(EncodingError::MalformedKey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_consumes_terminator() {
        let encoded = encode_binary(&[0xDE, 0x00, 0xAD]);
        assert_eq!(encoded, vec![0xDE, 0x00, 0x01, 0xAD, 0x00, 0x00]);
        let (decoded, consumed) = decode_binary(&encoded).unwrap();
        assert_eq!(decoded, vec![0xDE, 0x00, 0xAD]);
        assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn test_lexicographic_order_preserved() {
        let ascending: Vec<&[u8]> = vec![
            &[],
            &[0x00],
            &[0x00, 0x00],
            &[0x00, 0x01],
            &[0x01],
            &[0x01, 0x00],
            &[0x02],
            &[0xFF],
            &[0xFF, 0xFF],
        ];
        for pair in ascending.windows(2) {
            assert!(
                encode_binary(pair[0]) < encode_binary(pair[1]),
                "{:?} should encode below {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_malformed_input() {
        assert!(decode_binary(&[]).is_err());
        assert!(decode_binary(&[0x41, 0x00]).is_err());
        assert!(decode_binary(&[0x00, 0x07, 0x00, 0x00]).is_err());
    }

    #[test]
    fn test_escaped_prefix_is_prefix() {
        let mut prefix = Vec::new();
        escape_into(&[0x10, 0x00], &mut prefix);
        assert!(encode_binary(&[0x10, 0x00, 0x33]).starts_with(&prefix));
    }
}
