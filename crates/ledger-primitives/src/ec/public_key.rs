//! secp256k1 public keys.

use std::fmt;

use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, EncodedPoint};

use crate::base58;
use crate::chaincfg::ChainParams;
use crate::ec::signature::Signature;
use crate::ecdsa;
use crate::hash::hash160;
use crate::PrimitivesError;

pub const COMPRESSED_LEN: usize = 33;
pub const UNCOMPRESSED_LEN: usize = 65;

/// A point on secp256k1 other than the identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey {
    point: AffinePoint,
}

impl PublicKey {
    /// Parse a SEC1 key: 33 bytes with prefix 02/03 or 65 bytes with prefix 04.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        match (bytes.len(), bytes.first()) {
            (COMPRESSED_LEN, Some(0x02 | 0x03)) | (UNCOMPRESSED_LEN, Some(0x04)) => {}
            (len, _) => {
                return Err(PrimitivesError::InvalidPublicKey(format!(
                    "unsupported encoding of {} bytes",
                    len
                )))
            }
        }
        let encoded = EncodedPoint::from_bytes(bytes)
            .map_err(|e| PrimitivesError::InvalidPublicKey(e.to_string()))?;
        let point: Option<AffinePoint> = AffinePoint::from_encoded_point(&encoded).into();
        point
            .map(|point| PublicKey { point })
            .ok_or(PrimitivesError::PointNotOnCurve)
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        Self::from_bytes(&hex::decode(hex_str)?)
    }

    pub(crate) fn from_affine(point: AffinePoint) -> Self {
        PublicKey { point }
    }

    pub fn to_compressed(&self) -> [u8; COMPRESSED_LEN] {
        let mut out = [0u8; COMPRESSED_LEN];
        out.copy_from_slice(self.point.to_encoded_point(true).as_bytes());
        out
    }

    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_LEN] {
        let mut out = [0u8; UNCOMPRESSED_LEN];
        out.copy_from_slice(self.point.to_encoded_point(false).as_bytes());
        out
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }

    /// HASH160 of the compressed encoding.
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.to_compressed())
    }

    /// P2PKH address of the compressed key on the given network.
    pub fn to_address(&self, params: &ChainParams) -> String {
        base58::check_encode(params.p2pkh_prefix, &self.hash160())
    }

    /// Verify an ECDSA signature over `digest`.
    pub fn verify(&self, digest: &[u8], sig: &Signature) -> bool {
        ecdsa::verify(&self.point, digest, sig)
    }

    pub fn as_affine(&self) -> &AffinePoint {
        &self.point
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
