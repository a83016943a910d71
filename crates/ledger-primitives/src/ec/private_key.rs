//! secp256k1 private keys.

use std::fmt;

use k256::{NonZeroScalar, ProjectivePoint};
use rand::rngs::OsRng;

use crate::base58;
use crate::chaincfg::ChainParams;
use crate::ec::public_key::PublicKey;
use crate::ec::signature::{Signature, COMPACT_SIGNATURE_LEN};
use crate::ecdsa::{self, DeterministicNonce, NonceStrategy};
use crate::PrimitivesError;

const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// Trailing WIF byte marking a key whose public key is used compressed.
const COMPRESS_MAGIC: u8 = 0x01;

/// A secp256k1 private scalar in `[1, n-1]`.
#[derive(Clone, Copy)]
pub struct PrivateKey {
    scalar: NonZeroScalar,
}

impl PrivateKey {
    /// Generate a key from the OS random number generator.
    pub fn new() -> Self {
        PrivateKey {
            scalar: NonZeroScalar::random(&mut OsRng),
        }
    }

    /// Create a key from a 32-byte big-endian scalar.
    ///
    /// Zero and values at or above the group order are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let arr: [u8; PRIVATE_KEY_BYTES_LEN] = bytes.try_into().map_err(|_| {
            PrimitivesError::InvalidPrivateKey(format!(
                "expected {} bytes, got {}",
                PRIVATE_KEY_BYTES_LEN,
                bytes.len()
            ))
        })?;
        let scalar = ecdsa::nonce::nonzero_from_bytes(&arr).ok_or_else(|| {
            PrimitivesError::InvalidPrivateKey("scalar out of range".to_string())
        })?;
        Ok(PrivateKey { scalar })
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Decode a WIF string.
    ///
    /// Returns the key, the parameters of the network whose version byte it
    /// carries, and whether the compressed-pubkey marker was present.
    pub fn from_wif(wif: &str) -> Result<(Self, ChainParams, bool), PrimitivesError> {
        let (version, payload) = base58::check_decode(wif)?;
        let params = ChainParams::from_wif_prefix(version).ok_or_else(|| {
            PrimitivesError::InvalidWif(format!("unknown version byte {:#04x}", version))
        })?;
        let compressed = match payload.len() {
            33 if payload[32] == COMPRESS_MAGIC => true,
            33 => {
                return Err(PrimitivesError::InvalidWif(
                    "invalid compression flag".to_string(),
                ))
            }
            32 => false,
            n => return Err(PrimitivesError::InvalidWif(format!("invalid length {}", n))),
        };
        let key = Self::from_bytes(&payload[..PRIVATE_KEY_BYTES_LEN])?;
        Ok((key, params, compressed))
    }

    /// Encode as WIF for `params`, marking the public key as compressed.
    pub fn to_wif(&self, params: &ChainParams) -> String {
        let mut payload = Vec::with_capacity(PRIVATE_KEY_BYTES_LEN + 1);
        payload.extend_from_slice(&self.to_bytes());
        payload.push(COMPRESS_MAGIC);
        base58::check_encode(params.wif_prefix, &payload)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.scalar.to_bytes().into()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_affine((ProjectivePoint::GENERATOR * *self.scalar).to_affine())
    }

    /// Sign a digest with an RFC6979 deterministic nonce.
    pub fn sign(&self, digest: &[u8]) -> Signature {
        self.sign_with(digest, &DeterministicNonce)
    }

    /// Sign a digest with nonces from `nonces`.
    pub fn sign_with(&self, digest: &[u8], nonces: &dyn NonceStrategy) -> Signature {
        ecdsa::sign(&self.scalar, digest, nonces).0
    }

    /// Produce a 65-byte recoverable signature over `digest`.
    pub fn sign_compact(&self, digest: &[u8], compressed: bool) -> [u8; COMPACT_SIGNATURE_LEN] {
        let (sig, recovery_id) = ecdsa::sign(&self.scalar, digest, &DeterministicNonce);
        sig.to_compact(recovery_id, compressed)
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_HEX: &str = "0c28fca386c7a227600b2fe50b7cae11ec86d3bf1fbe471be89827e19d72aa1d";

    #[test]
    fn test_wif_vectors() {
        let key = PrivateKey::from_hex(KEY_HEX).unwrap();
        assert_eq!(
            key.to_wif(&ChainParams::mainnet()),
            "KwdMAjGmerYanjeui5SHS7JkmpZvVipYvB2LJGU1ZxJwYvP98617"
        );

        let (decoded, params, compressed) =
            PrivateKey::from_wif("5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTJ").unwrap();
        assert_eq!(decoded, key);
        assert_eq!(params, ChainParams::mainnet());
        assert!(!compressed, "51-character WIF is uncompressed");
    }

    #[test]
    fn test_wif_roundtrip_testnet() {
        let key = PrivateKey::new();
        let wif = key.to_wif(&ChainParams::testnet());
        let (back, params, compressed) = PrivateKey::from_wif(&wif).unwrap();
        assert_eq!(back, key);
        assert_eq!(params.wif_prefix, 0xef);
        assert!(compressed);
    }

    /// Malformed WIF strings are rejected.
    #[test]
    fn test_wif_rejects() {
        let cases = [
            ("modified character", "KwdMAjGmerYanjeui5SHS7JkmpZvVipYvB2LJGU1ZxJwYvP98618"),
            ("truncated", "KwdMAjGmerYanjeui5SHS7JkmpZvVipYvB2LJGU1ZxJwYvP9861"),
            ("address, not a key", "16UwLL9Risc3QfPqBUvKofHmBQ7wMtjvM"),
        ];
        for (name, wif) in cases {
            assert!(PrivateKey::from_wif(wif).is_err(), "{}", name);
        }
    }

    #[test]
    fn test_from_bytes_range() {
        assert!(PrivateKey::from_bytes(&[0u8; 32]).is_err(), "zero");
        assert!(PrivateKey::from_bytes(&ecdsa::CURVE_ORDER).is_err(), "n");
        assert!(PrivateKey::from_bytes(&[1u8; 31]).is_err(), "short");
        assert!(PrivateKey::from_hex("").is_err());
    }

    #[test]
    fn test_sign_and_verify() {
        let key = PrivateKey::from_hex(KEY_HEX).unwrap();
        let digest = [0x01u8, 0x02, 0x03];
        let sig = key.sign(&digest);
        assert!(key.pub_key().verify(&digest, &sig));
        assert_eq!(sig, key.sign(&digest), "deterministic by default");

        let random = key.sign_with(&digest, &ecdsa::RandomNonce);
        assert!(key.pub_key().verify(&digest, &random));
    }
}
