//! Digest functions used by scripts, signature hashing and addresses.
//!
//! Every function is a one-shot wrapper around the RustCrypto hashers and
//! returns a fixed-size array so callers can wrap the result in one of the
//! `FixedBytes` types without further length checks.

use hmac::{Hmac, Mac};
use ripemd::Ripemd160;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};

fn digest<D: Digest, const N: usize>(data: &[u8]) -> [u8; N] {
    let out = D::digest(data);
    let mut buf = [0u8; N];
    buf.copy_from_slice(&out);
    buf
}

/// SHA-1, as exposed by `OP_SHA1`.
pub fn sha1(data: &[u8]) -> [u8; 20] {
    digest::<Sha1, 20>(data)
}

/// Compute SHA-256 hash of the input data.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    digest::<Sha256, 32>(data)
}

/// Compute SHA-256(SHA-256(data)).
///
/// This is the hash behind transaction ids, signature hashes and the
/// Base58Check checksum.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// RIPEMD-160, as exposed by `OP_RIPEMD160`.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    digest::<Ripemd160, 20>(data)
}

/// Compute RIPEMD-160(SHA-256(data)).
///
/// Used for pay-to-pubkey-hash and pay-to-script-hash templates.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

/// Compute HMAC-SHA256 of `data` keyed with `key`.
///
/// Drives the RFC6979 deterministic nonce generator.
pub fn sha256_hmac(key: &[u8], data: &[u8]) -> [u8; 32] {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Compute HMAC-SHA512 of `data` keyed with `key`.
pub fn sha512_hmac(key: &[u8], data: &[u8]) -> [u8; 64] {
    let mut mac =
        Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}
