//! ECDSA signature values with DER and compact serialization.

use crate::ec::public_key::PublicKey;
use crate::ecdsa;
use crate::PrimitivesError;

/// Size of a compact (recoverable) signature.
pub const COMPACT_SIGNATURE_LEN: usize = 65;

/// Header base for compact signatures: `27 + recid (+ 4 if compressed)`.
const COMPACT_HEADER_BASE: u8 = 27;
const COMPACT_COMPRESSED_FLAG: u8 = 4;

/// An ECDSA signature with big-endian R and S components.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
}

impl Signature {
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Self {
        Signature { r, s }
    }

    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Whether S is in the lower half of the group order.
    pub fn is_low_s(&self) -> bool {
        ecdsa::is_low_s(&self.s)
    }

    /// Parse a DER-encoded signature.
    ///
    /// Expected layout: `0x30 <len> 0x02 <rlen> <r> 0x02 <slen> <s>`. R and S
    /// must be non-zero and below the group order. Trailing bytes after the
    /// declared sequence length are ignored.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let malformed = |why: &str| PrimitivesError::InvalidSignature(format!("malformed DER: {}", why));

        if bytes.len() < 8 {
            return Err(malformed("too short"));
        }
        if bytes[0] != 0x30 {
            return Err(malformed("no sequence marker"));
        }
        let seq_len = bytes[1] as usize;
        if seq_len + 2 > bytes.len() || seq_len + 2 < 8 {
            return Err(malformed("bad sequence length"));
        }
        let data = &bytes[..seq_len + 2];

        let (r_bytes, rest) = read_der_int(&data[2..]).ok_or_else(|| malformed("bad R"))?;
        let (s_bytes, rest) = read_der_int(rest).ok_or_else(|| malformed("bad S"))?;
        if !rest.is_empty() {
            return Err(malformed("trailing data in sequence"));
        }

        Self::from_components(r_bytes, s_bytes)
    }

    /// Parse DER as consensus did before strict encoding was enforced.
    ///
    /// Long-form lengths, extra zero padding on R and S, a sequence length
    /// that does not match its contents and bytes after S are all accepted.
    /// R and S must still fit in 32 bytes and lie in `[1, n-1]`.
    pub fn from_der_lax(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let malformed = |why: &str| PrimitivesError::InvalidSignature(format!("malformed DER: {}", why));

        if bytes.first() != Some(&0x30) {
            return Err(malformed("no sequence marker"));
        }
        // The sequence length is skipped, never checked.
        let len_byte = *bytes.get(1).ok_or_else(|| malformed("too short"))?;
        let mut pos = 2;
        if len_byte & 0x80 != 0 {
            pos += (len_byte & 0x7f) as usize;
        }

        let (r_bytes, pos) = read_lax_int(bytes, pos).ok_or_else(|| malformed("bad R"))?;
        let (s_bytes, _) = read_lax_int(bytes, pos).ok_or_else(|| malformed("bad S"))?;
        Self::from_components(r_bytes, s_bytes)
    }

    /// Build a signature from big-endian R and S of any padding.
    fn from_components(r_bytes: &[u8], s_bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let r = to_32_bytes(r_bytes)?;
        let s = to_32_bytes(s_bytes)?;
        for (name, v) in [("R", &r), ("S", &s)] {
            if v.iter().all(|b| *b == 0) {
                return Err(PrimitivesError::InvalidSignature(format!("{} is zero", name)));
            }
            if *v >= ecdsa::CURVE_ORDER {
                return Err(PrimitivesError::InvalidSignature(format!(
                    "{} is not below the group order",
                    name
                )));
            }
        }
        Ok(Signature { r, s })
    }

    /// Serialize as DER, normalising S to the lower half of the order.
    pub fn to_der(&self) -> Vec<u8> {
        let s = if self.is_low_s() {
            self.s
        } else {
            ecdsa::negate_s(&self.s)
        };
        let rb = canonicalize_int(&self.r);
        let sb = canonicalize_int(&s);

        let total_len = 6 + rb.len() + sb.len();
        let mut out = Vec::with_capacity(total_len);
        out.push(0x30);
        out.push((total_len - 2) as u8);
        out.push(0x02);
        out.push(rb.len() as u8);
        out.extend_from_slice(&rb);
        out.push(0x02);
        out.push(sb.len() as u8);
        out.extend_from_slice(&sb);
        out
    }

    /// Serialize as a 65-byte compact signature.
    pub fn to_compact(&self, recovery_id: u8, compressed: bool) -> [u8; COMPACT_SIGNATURE_LEN] {
        let mut out = [0u8; COMPACT_SIGNATURE_LEN];
        out[0] = COMPACT_HEADER_BASE
            + recovery_id
            + if compressed { COMPACT_COMPRESSED_FLAG } else { 0 };
        out[1..33].copy_from_slice(&self.r);
        out[33..65].copy_from_slice(&self.s);
        out
    }

    /// Parse a compact signature into `(signature, recovery_id, compressed)`.
    pub fn from_compact(bytes: &[u8]) -> Result<(Self, u8, bool), PrimitivesError> {
        if bytes.len() != COMPACT_SIGNATURE_LEN {
            return Err(PrimitivesError::InvalidSignature(format!(
                "compact signature must be {} bytes, got {}",
                COMPACT_SIGNATURE_LEN,
                bytes.len()
            )));
        }
        let header = bytes[0]
            .checked_sub(COMPACT_HEADER_BASE)
            .filter(|h| *h < 8)
            .ok_or(PrimitivesError::InvalidRecoveryId(bytes[0]))?;
        let compressed = header & COMPACT_COMPRESSED_FLAG != 0;
        let recovery_id = header & 3;

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[1..33]);
        s.copy_from_slice(&bytes[33..65]);
        Ok((Signature { r, s }, recovery_id, compressed))
    }

    /// Recover the signer's key from a compact signature over `digest`.
    ///
    /// Returns the key together with the compression flag from the header.
    pub fn recover_public_key(
        compact: &[u8],
        digest: &[u8],
    ) -> Result<(PublicKey, bool), PrimitivesError> {
        let (sig, recovery_id, compressed) = Self::from_compact(compact)?;
        let point = ecdsa::recover(digest, &sig, recovery_id)?;
        Ok((PublicKey::from_affine(point), compressed))
    }
}

/// Split one DER INTEGER off the front of `data`.
fn read_der_int(data: &[u8]) -> Option<(&[u8], &[u8])> {
    if data.len() < 2 || data[0] != 0x02 {
        return None;
    }
    let len = data[1] as usize;
    if len == 0 || 2 + len > data.len() {
        return None;
    }
    Some((&data[2..2 + len], &data[2 + len..]))
}

/// Read a DER length at `pos`, short or long form, returning it and the
/// offset just past it.
fn read_lax_len(data: &[u8], pos: usize) -> Option<(usize, usize)> {
    let first = *data.get(pos)?;
    let mut pos = pos + 1;
    if first & 0x80 == 0 {
        return Some((first as usize, pos));
    }
    let mut width = (first & 0x7f) as usize;
    while width > 0 && data.get(pos) == Some(&0) {
        pos += 1;
        width -= 1;
    }
    if width > std::mem::size_of::<usize>() {
        return None;
    }
    let mut len = 0usize;
    for _ in 0..width {
        len = (len << 8) | *data.get(pos)? as usize;
        pos += 1;
    }
    Some((len, pos))
}

/// Read one INTEGER at `pos` without canonical-form checks, returning its
/// body and the offset just past it.
fn read_lax_int(data: &[u8], pos: usize) -> Option<(&[u8], usize)> {
    if *data.get(pos)? != 0x02 {
        return None;
    }
    let (len, start) = read_lax_len(data, pos + 1)?;
    let end = start.checked_add(len)?;
    Some((data.get(start..end)?, end))
}

/// Minimal big-endian DER integer body, with a 0x00 pad when the high bit is set.
fn canonicalize_int(val: &[u8; 32]) -> Vec<u8> {
    let start = val.iter().position(|b| *b != 0).unwrap_or(31);
    let trimmed = &val[start..];
    let mut out = Vec::with_capacity(trimmed.len() + 1);
    if trimmed[0] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(trimmed);
    out
}

fn to_32_bytes(bytes: &[u8]) -> Result<[u8; 32], PrimitivesError> {
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let trimmed = &bytes[start..];
    if trimmed.len() > 32 {
        return Err(PrimitivesError::InvalidSignature(
            "integer wider than 32 bytes".to_string(),
        ));
    }
    let mut out = [0u8; 32];
    out[32 - trimmed.len()..].copy_from_slice(trimmed);
    Ok(out)
}
