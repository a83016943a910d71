//! Nonce generation strategies for ECDSA signing.

use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, NonZeroScalar, Scalar};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::hash::sha256_hmac;

/// Source of the per-signature secret `k`.
///
/// `attempt` starts at zero and is incremented each time the signer rejects
/// a candidate because `r` or `s` came out zero. A strategy must return a
/// scalar in `[1, n-1]`.
pub trait NonceStrategy {
    fn nonce(&self, private_key: &NonZeroScalar, digest: &[u8; 32], attempt: u32) -> NonZeroScalar;
}

/// Rejection-sampled nonces from the operating system RNG.
///
/// Panics if the OS cannot supply randomness.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomNonce;

impl NonceStrategy for RandomNonce {
    fn nonce(&self, _private_key: &NonZeroScalar, _digest: &[u8; 32], _attempt: u32) -> NonZeroScalar {
        loop {
            let mut candidate = [0u8; 32];
            OsRng.fill_bytes(&mut candidate);
            if let Some(k) = nonzero_from_bytes(&candidate) {
                return k;
            }
        }
    }
}

/// RFC6979 nonces derived from HMAC-SHA256 over the key and digest.
///
/// The same key and digest always produce the same signature.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeterministicNonce;

impl NonceStrategy for DeterministicNonce {
    fn nonce(&self, private_key: &NonZeroScalar, digest: &[u8; 32], attempt: u32) -> NonZeroScalar {
        let x: [u8; 32] = private_key.to_bytes().into();
        let h1: [u8; 32] = super::digest_to_scalar(digest).to_bytes().into();

        let mut v = [0x01u8; 32];
        let mut k = [0x00u8; 32];

        k = sha256_hmac(&k, &[&v[..], &[0x00], &x, &h1].concat());
        v = sha256_hmac(&k, &v);
        k = sha256_hmac(&k, &[&v[..], &[0x01], &x, &h1].concat());
        v = sha256_hmac(&k, &v);

        let mut skipped = 0u32;
        loop {
            v = sha256_hmac(&k, &v);
            if let Some(candidate) = nonzero_from_bytes(&v) {
                if skipped == attempt {
                    return candidate;
                }
                skipped += 1;
            }
            k = sha256_hmac(&k, &[&v[..], &[0x00]].concat());
            v = sha256_hmac(&k, &v);
        }
    }
}

/// Interpret 32 big-endian bytes as a scalar in `[1, n-1]`.
pub(crate) fn nonzero_from_bytes(bytes: &[u8; 32]) -> Option<NonZeroScalar> {
    let scalar: Option<Scalar> = Scalar::from_repr(FieldBytes::from(*bytes)).into();
    scalar.and_then(|s| NonZeroScalar::new(s).into())
}
