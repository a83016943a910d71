//! The ECDSA engine over secp256k1.
//!
//! Signing, verification and public-key recovery are written out over the
//! k256 scalar and point types so each step of the algorithm is visible:
//!
//! - sign: `R = k·G`, `r = R.x mod n`, `s = k⁻¹(e + d·r) mod n`, retrying
//!   with the next nonce when `r` or `s` is zero, then normalising to low S.
//! - verify: reject `r, s ∉ [1, n-1]`, then accept iff
//!   `(e·s⁻¹·G + r·s⁻¹·Q).x mod n == r`.
//! - recover: rebuild `R` from `r` and the recovery id, then
//!   `Q = r⁻¹(s·R - e·G)`.
//!
//! The message digest is left-padded or truncated to 32 bytes and reduced
//! modulo `n`.

pub mod nonce;

pub use nonce::{DeterministicNonce, NonceStrategy, RandomNonce};

use k256::elliptic_curve::ops::{Invert, Reduce};
use k256::elliptic_curve::point::{AffineCoordinates, DecompressPoint};
use k256::elliptic_curve::scalar::IsHigh;
use k256::elliptic_curve::subtle::Choice;
use k256::{AffinePoint, FieldBytes, NonZeroScalar, ProjectivePoint, Scalar, U256};

use crate::ec::Signature;
use crate::PrimitivesError;

/// The secp256k1 group order `n`, big-endian.
pub const CURVE_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// `n / 2`. An S value above this is "high".
pub const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// The field prime `p`, big-endian.
const FIELD_PRIME: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE, 0xFF, 0xFF, 0xFC, 0x2F,
];

/// Left-pad or truncate a digest to 32 bytes.
pub fn normalize_digest(digest: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    if digest.len() >= 32 {
        out.copy_from_slice(&digest[..32]);
    } else {
        out[32 - digest.len()..].copy_from_slice(digest);
    }
    out
}

/// The digest as an integer reduced modulo `n`.
pub fn digest_to_scalar(digest: &[u8]) -> Scalar {
    let bytes = FieldBytes::from(normalize_digest(digest));
    <Scalar as Reduce<U256>>::reduce_bytes(&bytes)
}

fn x_mod_n(point: &AffinePoint) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(&point.x())
}

fn inverse(x: &NonZeroScalar) -> Scalar {
    *Invert::invert(x)
}

fn scalar_in_range(bytes: &[u8; 32]) -> Option<NonZeroScalar> {
    nonce::nonzero_from_bytes(bytes)
}

/// Sign `digest` with `d`, drawing nonces from `nonces`.
///
/// Returns the low-S signature and its recovery id (bit 0 is the parity of
/// `R.y`, bit 1 is set when `R.x` exceeded `n`).
pub fn sign(d: &NonZeroScalar, digest: &[u8], nonces: &dyn NonceStrategy) -> (Signature, u8) {
    let digest = normalize_digest(digest);
    let e = digest_to_scalar(&digest);

    let mut attempt = 0u32;
    loop {
        let k = nonces.nonce(d, &digest, attempt);
        attempt += 1;

        let big_r = (ProjectivePoint::GENERATOR * *k).to_affine();
        let r = x_mod_n(&big_r);
        if bool::from(r.is_zero()) {
            log::trace!("nonce attempt {} gave r = 0, retrying", attempt);
            continue;
        }

        let mut s = inverse(&k) * (e + r * **d);
        if bool::from(s.is_zero()) {
            log::trace!("nonce attempt {} gave s = 0, retrying", attempt);
            continue;
        }

        let x_bytes: [u8; 32] = big_r.x().into();
        let mut recovery_id = u8::from(bool::from(big_r.y_is_odd()));
        if x_bytes >= CURVE_ORDER {
            recovery_id |= 2;
        }
        if bool::from(s.is_high()) {
            s = -s;
            recovery_id ^= 1;
        }

        let sig = Signature::new(r.to_bytes().into(), s.to_bytes().into());
        return (sig, recovery_id);
    }
}

/// Verify `sig` over `digest` against the public point `q`.
pub fn verify(q: &AffinePoint, digest: &[u8], sig: &Signature) -> bool {
    let (r, s) = match (scalar_in_range(sig.r()), scalar_in_range(sig.s())) {
        (Some(r), Some(s)) => (r, s),
        _ => return false,
    };
    let e = digest_to_scalar(digest);
    let w = inverse(&s);
    let u1 = e * w;
    let u2 = *r * w;

    let point = (ProjectivePoint::GENERATOR * u1 + ProjectivePoint::from(*q) * u2).to_affine();
    if point == AffinePoint::IDENTITY {
        return false;
    }
    x_mod_n(&point) == *r
}

/// Recover the signing public key from `sig` and a recovery id in `0..4`.
pub fn recover(digest: &[u8], sig: &Signature, recovery_id: u8) -> Result<AffinePoint, PrimitivesError> {
    if recovery_id > 3 {
        return Err(PrimitivesError::InvalidRecoveryId(recovery_id));
    }
    let (r, s) = match (scalar_in_range(sig.r()), scalar_in_range(sig.s())) {
        (Some(r), Some(s)) => (r, s),
        _ => {
            return Err(PrimitivesError::InvalidSignature(
                "r or s outside [1, n-1]".to_string(),
            ))
        }
    };

    let x = if recovery_id & 2 != 0 {
        add_order(sig.r()).ok_or_else(|| {
            PrimitivesError::RecoveryFailed("r + n is not a field element".to_string())
        })?
    } else {
        *sig.r()
    };

    let y_odd = Choice::from(recovery_id & 1);
    let big_r: Option<AffinePoint> = AffinePoint::decompress(&FieldBytes::from(x), y_odd).into();
    let big_r = big_r.ok_or_else(|| {
        PrimitivesError::RecoveryFailed("no curve point for r".to_string())
    })?;

    let e = digest_to_scalar(digest);
    let r_inv = inverse(&r);
    let q = (ProjectivePoint::from(big_r) * *s - ProjectivePoint::GENERATOR * e) * r_inv;
    let q = q.to_affine();
    if q == AffinePoint::IDENTITY {
        return Err(PrimitivesError::RecoveryFailed(
            "recovered the point at infinity".to_string(),
        ));
    }
    Ok(q)
}

/// Find the recovery id under which `sig` recovers to `expected`.
pub fn recover_any(digest: &[u8], sig: &Signature, expected: &AffinePoint) -> Option<u8> {
    (0u8..4).find(|id| matches!(recover(digest, sig, *id), Ok(q) if q == *expected))
}

/// `r + n` when it stays below the field prime.
fn add_order(r: &[u8; 32]) -> Option<[u8; 32]> {
    let mut out = [0u8; 32];
    let mut carry = 0u16;
    for i in (0..32).rev() {
        let sum = r[i] as u16 + CURVE_ORDER[i] as u16 + carry;
        out[i] = sum as u8;
        carry = sum >> 8;
    }
    if carry != 0 || out >= FIELD_PRIME {
        return None;
    }
    Some(out)
}

/// Whether a big-endian S value is at most `n / 2`.
pub fn is_low_s(s: &[u8; 32]) -> bool {
    *s <= HALF_ORDER
}

/// `n - s` for a big-endian S value.
pub fn negate_s(s: &[u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    let mut borrow = 0i16;
    for i in (0..32).rev() {
        let mut diff = CURVE_ORDER[i] as i16 - s[i] as i16 - borrow;
        borrow = 0;
        if diff < 0 {
            diff += 256;
            borrow = 1;
        }
        out[i] = diff as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{sha256, sha256d};

    fn key(hex_str: &str) -> NonZeroScalar {
        let bytes: [u8; 32] = hex::decode(hex_str).unwrap().try_into().unwrap();
        nonce::nonzero_from_bytes(&bytes).unwrap()
    }

    fn public(d: &NonZeroScalar) -> AffinePoint {
        (ProjectivePoint::GENERATOR * **d).to_affine()
    }

    /// Deterministic signatures against known secp256k1 vectors.
    #[test]
    fn test_deterministic_vectors() {
        let vectors = [
            (
                "cca9fbcc1b41e5a95d369eaa6ddcff73b61a4efaa279cfc6567e8daa39cbaf50",
                "sample",
                "3045022100af340daf02cc15c8d5d08d7735dfe6b98a474ed373bdb5fbecf7571be52b384202205009fb27f37034a9b24b707b7c6b79ca23ddef9e25f7282e8a797efe53a8f124",
            ),
            (
                "0000000000000000000000000000000000000000000000000000000000000001",
                "Satoshi Nakamoto",
                "3045022100934b1ea10a4b3c1757e2b0c017d0b6143ce3c9a7e6a4a49860d7a6ab210ee3d802202442ce9d2b916064108014783e923ec36b49743e2ffa1c4496f01a512aafd9e5",
            ),
            (
                "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140",
                "Satoshi Nakamoto",
                "3045022100fd567d121db66e382991534ada77a6bd3106f0a1098c231e47993447cd6af2d002206b39cd0eb1bc8603e159ef5c20a5c8ad685a45b06ce9bebed3f153d10d93bed5",
            ),
            (
                "f8b8af8ce3c7cca5e300d33939540c10d45ce001b8f252bfbc57ba0342904181",
                "Alan Turing",
                "304402207063ae83e7f62bbb171798131b4a0564b956930092b33b07b395615d9ec7e15c022058dfcc1e00a35e1572f366ffe34ba0fc47db1e7189759b9fb233c5b05ab388ea",
            ),
        ];

        for (key_hex, msg, want) in vectors {
            let d = key(key_hex);
            let digest = sha256(msg.as_bytes());
            let (sig, _) = sign(&d, &digest, &DeterministicNonce);
            assert_eq!(hex::encode(sig.to_der()), want, "signature for '{}'", msg);
            assert!(verify(&public(&d), &digest, &sig), "verify for '{}'", msg);
        }
    }

    #[test]
    fn test_random_sign_verify_recover() {
        let d = key("e91671c46231f833a6406ccbea0e3e392c76c167bac1cb013f6f1013980455c2");
        let q = public(&d);
        let digest = sha256d(b"random nonce message");

        for _ in 0..4 {
            let (sig, recid) = sign(&d, &digest, &RandomNonce);
            assert!(is_low_s(sig.s()), "signatures are normalised to low S");
            assert!(verify(&q, &digest, &sig));
            assert_eq!(recover(&digest, &sig, recid).unwrap(), q);
            assert_eq!(recover_any(&digest, &sig, &q), Some(recid));
        }
    }

    /// Verification rejects tampered digests and out-of-range components.
    #[test]
    fn test_verify_rejects() {
        let d = key("0000000000000000000000000000000000000000000000000000000000000001");
        let q = public(&d);
        let digest = sha256(b"Satoshi Nakamoto");
        let (sig, _) = sign(&d, &digest, &DeterministicNonce);

        assert!(!verify(&q, &sha256(b"Satoshi Nakamoto!"), &sig));

        let zero_r = Signature::new([0u8; 32], *sig.s());
        assert!(!verify(&q, &digest, &zero_r), "r = 0");
        let big_s = Signature::new(*sig.r(), CURVE_ORDER);
        assert!(!verify(&q, &digest, &big_s), "s = n");
    }

    /// High-S signatures still verify; the engine only emits low S.
    #[test]
    fn test_high_s_still_verifies() {
        let d = key("f8b8af8ce3c7cca5e300d33939540c10d45ce001b8f252bfbc57ba0342904181");
        let digest = sha256(b"Alan Turing");
        let (sig, recid) = sign(&d, &digest, &DeterministicNonce);
        let high = Signature::new(*sig.r(), negate_s(sig.s()));
        assert!(!is_low_s(high.s()));
        assert!(verify(&public(&d), &digest, &high));
        assert_eq!(recover(&digest, &high, recid ^ 1).unwrap(), public(&d));
    }

    /// Always hands out the same nonce.
    struct FixedNonce(NonZeroScalar);

    impl NonceStrategy for FixedNonce {
        fn nonce(&self, _: &NonZeroScalar, _: &[u8; 32], _: u32) -> NonZeroScalar {
            self.0
        }
    }

    /// A nonce whose raw S lands above n/2 yields the negated, low S and a
    /// recovery id that still recovers the signer.
    #[test]
    fn test_high_s_nonce_is_normalised() {
        let d = key("0000000000000000000000000000000000000000000000000000000000000001");
        let digest = sha256(b"high s");
        let e = digest_to_scalar(&digest);

        let (k, raw_s) = (1u8..=255)
            .find_map(|i| {
                let mut bytes = [0u8; 32];
                bytes[31] = i;
                let k = nonce::nonzero_from_bytes(&bytes)?;
                let r = x_mod_n(&(ProjectivePoint::GENERATOR * *k).to_affine());
                let raw_s = inverse(&k) * (e + r * *d);
                bool::from(raw_s.is_high()).then_some((k, raw_s))
            })
            .expect("a small nonce with high S");

        let (sig, recid) = sign(&d, &digest, &FixedNonce(k));
        let low: [u8; 32] = (-raw_s).to_bytes().into();
        assert_eq!(sig.s(), &low);
        assert!(is_low_s(sig.s()));
        assert!(verify(&public(&d), &digest, &sig));
        assert_eq!(recover(&digest, &sig, recid).unwrap(), public(&d));
    }

    #[test]
    fn test_recover_bad_id() {
        let d = key("0000000000000000000000000000000000000000000000000000000000000001");
        let (sig, _) = sign(&d, &[1u8; 32], &DeterministicNonce);
        assert!(matches!(
            recover(&[1u8; 32], &sig, 4),
            Err(PrimitivesError::InvalidRecoveryId(4))
        ));
    }

    #[test]
    fn test_order_helpers() {
        assert_eq!(negate_s(&HALF_ORDER), {
            let mut up = HALF_ORDER;
            up[31] += 1;
            up
        });
        assert!(add_order(&[0xffu8; 32]).is_none());
        let mut one = [0u8; 32];
        one[31] = 1;
        let sum = add_order(&one).unwrap();
        assert_eq!(sum[31], 0x42);
    }
}
