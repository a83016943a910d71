//! Base58 and Base58Check.
//!
//! Base58Check appends the first four bytes of SHA-256d over the payload
//! before encoding, and verifies them on decode. The versioned variants put
//! a single version byte in front of the payload, the layout used by
//! addresses and WIF keys.

use crate::hash::sha256d;
use crate::PrimitivesError;

const CHECKSUM_LEN: usize = 4;

fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let h = sha256d(data);
    [h[0], h[1], h[2], h[3]]
}

/// Encode bytes with the Bitcoin alphabet.
///
/// Leading zero bytes become leading `'1'` characters.
pub fn encode(data: &[u8]) -> String {
    bs58::encode(data)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_string()
}

/// Decode a Bitcoin-alphabet string.
pub fn decode(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    bs58::decode(s)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| PrimitivesError::InvalidBase58(e.to_string()))
}

/// Base58Check-encode `data` with no version byte.
pub fn check_encode_raw(data: &[u8]) -> String {
    let mut buf = Vec::with_capacity(data.len() + CHECKSUM_LEN);
    buf.extend_from_slice(data);
    buf.extend_from_slice(&checksum(data));
    encode(&buf)
}

/// Decode a Base58Check string and strip the verified checksum.
pub fn check_decode_raw(s: &str) -> Result<Vec<u8>, PrimitivesError> {
    let mut decoded = decode(s)?;
    if decoded.len() < CHECKSUM_LEN {
        return Err(PrimitivesError::InvalidBase58(
            "data too short for checksum".to_string(),
        ));
    }
    let split = decoded.len() - CHECKSUM_LEN;
    if decoded[split..] != checksum(&decoded[..split]) {
        return Err(PrimitivesError::ChecksumMismatch);
    }
    decoded.truncate(split);
    Ok(decoded)
}

/// Base58Check-encode `version || payload`.
pub fn check_encode(version: u8, payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(1 + payload.len());
    data.push(version);
    data.extend_from_slice(payload);
    check_encode_raw(&data)
}

/// Decode a versioned Base58Check string into `(version, payload)`.
pub fn check_decode(s: &str) -> Result<(u8, Vec<u8>), PrimitivesError> {
    let mut data = check_decode_raw(s)?;
    if data.is_empty() {
        return Err(PrimitivesError::InvalidBase58(
            "missing version byte".to_string(),
        ));
    }
    let version = data.remove(0);
    Ok((version, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Plain Base58 vectors, including leading-zero handling.
    #[test]
    fn test_base58_vectors() {
        let cases = [
            ("", ""),
            ("00", "1"),
            ("00000000", "1111"),
            ("ffffffff", "7YXq9G"),
            ("0123456789abcdef", "C3CPq7c8PY"),
            ("000000287fb4cd", "111233QC4"),
            (
                "00010966776006953d5567439e5e39f86a0d273beed61967f6",
                "16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM",
            ),
        ];
        for (hex_in, want) in cases {
            let raw = hex::decode(hex_in).unwrap();
            assert_eq!(encode(&raw), want, "encode {}", hex_in);
            assert_eq!(decode(want).unwrap(), raw, "decode {}", want);
        }
    }

    #[test]
    fn test_decode_rejects_bad_characters() {
        for bad in ["invalid!@#$%", "1234!@#$%", "0OIl"] {
            assert!(
                matches!(decode(bad), Err(PrimitivesError::InvalidBase58(_))),
                "{} should be rejected",
                bad
            );
        }
    }

    /// The address above is a versioned Base58Check string.
    #[test]
    fn test_check_decode_address() {
        let (version, payload) = check_decode("16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM").unwrap();
        assert_eq!(version, 0x00);
        assert_eq!(
            hex::encode(payload),
            "010966776006953d5567439e5e39f86a0d273bee"
        );
    }

    #[test]
    fn test_check_encode_matches_raw() {
        let payload = hex::decode("f54a5851e9372b87810a8e60cdd2e7cfd80b6e31").unwrap();
        let mut prefixed = vec![0x6f];
        prefixed.extend_from_slice(&payload);
        assert_eq!(check_encode(0x6f, &payload), check_encode_raw(&prefixed));
    }

    #[test]
    fn test_check_decode_bad_checksum() {
        let mut encoded = check_encode(0x80, &[0x01, 0x02, 0x03]);
        let last = encoded.pop().unwrap();
        encoded.push(if last == '1' { '2' } else { '1' });
        assert!(matches!(
            check_decode(&encoded),
            Err(PrimitivesError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_check_decode_too_short() {
        assert!(matches!(
            check_decode_raw("1"),
            Err(PrimitivesError::InvalidBase58(_))
        ));
        // An empty payload still carries a checksum.
        let empty = check_encode_raw(&[]);
        assert_eq!(check_decode_raw(&empty).unwrap(), Vec::<u8>::new());
        assert!(check_decode(&empty).is_err(), "no version byte present");
    }
}
