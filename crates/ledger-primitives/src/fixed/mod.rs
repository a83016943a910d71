//! Fixed-width byte values.
//!
//! `FixedBytes<N>` stores its bytes in internal (little-endian) order and
//! renders them big-endian, the convention Bitcoin uses for transaction ids
//! and block hashes. Equality and ordering compare the stored bytes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::hash::{hash160, sha256, sha256d};
use crate::PrimitivesError;

/// An immutable N-byte value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FixedBytes<const N: usize>([u8; N]);

/// 20-byte value, the width of a HASH160 digest.
pub type FixedBytes160 = FixedBytes<20>;
/// 32-byte value, the width of a SHA-256 digest.
pub type FixedBytes256 = FixedBytes<32>;
/// 64-byte value.
pub type FixedBytes512 = FixedBytes<64>;

/// Transaction ids, block hashes and signature hashes.
pub type Hash = FixedBytes256;

impl<const N: usize> FixedBytes<N> {
    /// Size of the value in bytes.
    pub const SIZE: usize = N;

    /// All-zero value.
    pub const ZERO: Self = FixedBytes([0u8; N]);

    /// Wrap a raw array. The bytes are kept as-is (internal order).
    pub const fn new(bytes: [u8; N]) -> Self {
        FixedBytes(bytes)
    }

    /// Create a value from a slice of exactly `N` bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != N {
            return Err(PrimitivesError::InvalidLength {
                expected: N,
                got: bytes.len(),
            });
        }
        let mut arr = [0u8; N];
        arr.copy_from_slice(bytes);
        Ok(FixedBytes(arr))
    }

    /// Read a value from the first `N` bytes of a longer buffer.
    pub fn from_slice(data: &[u8]) -> Result<Self, PrimitivesError> {
        match data.get(..N) {
            Some(head) => Self::from_bytes(head),
            None => Err(PrimitivesError::InvalidLength {
                expected: N,
                got: data.len(),
            }),
        }
    }

    /// Parse the big-endian display form.
    ///
    /// Short strings are zero-padded on the high end, so
    /// `"1"` parses to the value one. An empty string yields zero.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.len() > N * 2 {
            return Err(PrimitivesError::InvalidHex(format!(
                "string of {} characters exceeds {} bytes",
                hex_str.len(),
                N
            )));
        }
        let padded = if hex_str.len() % 2 != 0 {
            format!("0{}", hex_str)
        } else {
            hex_str.to_string()
        };
        let decoded = hex::decode(padded)?;

        let mut arr = [0u8; N];
        for (dst, src) in arr.iter_mut().zip(decoded.iter().rev()) {
            *dst = *src;
        }
        Ok(FixedBytes(arr))
    }

    /// Access the internal bytes.
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Copy the internal bytes into a vector.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    /// Consume the value and return its array.
    pub fn into_inner(self) -> [u8; N] {
        self.0
    }

    /// Whether every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl Hash {
    /// The 32-byte little-endian encoding of the integer one.
    ///
    /// Returned by the legacy signature hash for out-of-range inputs.
    pub const ONE: Hash = {
        let mut one = [0u8; 32];
        one[0] = 1;
        FixedBytes(one)
    };

    /// SHA-256 of `data`.
    pub fn sha256(data: &[u8]) -> Hash {
        FixedBytes(sha256(data))
    }

    /// SHA-256d of `data`.
    pub fn sha256d(data: &[u8]) -> Hash {
        FixedBytes(sha256d(data))
    }
}

impl FixedBytes160 {
    /// HASH160 of `data`.
    pub fn hash160(data: &[u8]) -> FixedBytes160 {
        FixedBytes(hash160(data))
    }
}

impl<const N: usize> Default for FixedBytes<N> {
    fn default() -> Self {
        Self::ZERO
    }
}

impl<const N: usize> From<[u8; N]> for FixedBytes<N> {
    fn from(bytes: [u8; N]) -> Self {
        FixedBytes(bytes)
    }
}

impl<const N: usize> AsRef<[u8]> for FixedBytes<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> fmt::Display for FixedBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0.iter().rev() {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl<const N: usize> fmt::Debug for FixedBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedBytes{}({})", N * 8, self)
    }
}

impl<const N: usize> FromStr for FixedBytes<N> {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl<const N: usize> Serialize for FixedBytes<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de, const N: usize> Deserialize<'de> for FixedBytes<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
