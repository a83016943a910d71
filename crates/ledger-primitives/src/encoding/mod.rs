//! Hex and reversed-hex codecs.
//!
//! Reversed hex is the display form of hashes: the byte order is flipped
//! before encoding and after decoding.

use crate::PrimitivesError;

pub fn to_hex(data: &[u8]) -> String {
    hex::encode(data)
}

pub fn from_hex(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    Ok(hex::decode(s)?)
}

/// Hex-encode `data` with its byte order reversed.
pub fn to_reversed_hex(data: &[u8]) -> String {
    let reversed: Vec<u8> = data.iter().rev().copied().collect();
    hex::encode(reversed)
}

/// Decode hex and reverse the resulting bytes.
pub fn from_reversed_hex(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    let mut bytes = hex::decode(s)?;
    bytes.reverse();
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversed_hex() {
        assert_eq!(to_reversed_hex(&[0x01, 0x02, 0xab]), "ab0201");
        assert_eq!(from_reversed_hex("ab0201").unwrap(), vec![0x01, 0x02, 0xab]);
        assert_eq!(to_hex(&[0x01, 0x02, 0xab]), "0102ab");
        assert_eq!(from_hex("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_invalid_hex() {
        assert!(matches!(from_hex("0"), Err(PrimitivesError::InvalidHex(_))));
        assert!(matches!(
            from_reversed_hex("zz"),
            Err(PrimitivesError::InvalidHex(_))
        ));
    }
}
