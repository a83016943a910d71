//! Script number arithmetic with consensus encoding rules.
//!
//! Numbers on the script stack are little-endian byte strings with the sign
//! carried in the top bit of the last byte. Operands are limited to a maximum
//! byte length when decoded, but results may exceed it and stay valid as long
//! as they are not decoded again as numbers.

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{Signed, ToPrimitive, Zero};

use super::error::{InterpreterError, ScriptError};

/// A decoded script number. Arithmetic happens on an unbounded integer so
/// intermediate results never wrap.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScriptNumber {
    /// The numeric value.
    pub val: BigInt,
}

impl ScriptNumber {
    /// A number holding `val`.
    pub fn new(val: i64) -> Self {
        ScriptNumber { val: BigInt::from(val) }
    }

    /// Decode a stack element.
    ///
    /// Fails with `SCRIPTNUM_OVERFLOW` when `bb` is longer than `max_len`, and
    /// with `SCRIPTNUM_MINENCODE` when `require_minimal` is set and the
    /// encoding carries a redundant trailing byte.
    pub fn from_bytes(bb: &[u8], max_len: usize, require_minimal: bool) -> Result<Self, InterpreterError> {
        if bb.len() > max_len {
            return Err(InterpreterError::new(
                ScriptError::ScriptNumOverflow,
                format!(
                    "{}-byte number {} is longer than the {}-byte limit",
                    bb.len(),
                    hex::encode(bb),
                    max_len
                ),
            ));
        }
        if require_minimal {
            check_minimal_data_encoding(bb)?;
        }

        let Some(&last) = bb.last() else {
            return Ok(ScriptNumber::default());
        };
        let mut magnitude = bb.to_vec();
        if let Some(top) = magnitude.last_mut() {
            *top &= 0x7f;
        }
        let sign = if last & 0x80 != 0 { Sign::Minus } else { Sign::Plus };
        Ok(ScriptNumber {
            val: BigInt::from_bytes_le(sign, &magnitude),
        })
    }

    /// Minimal little-endian encoding with the sign in the top bit.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.val.is_zero() {
            return Vec::new();
        }
        let (sign, mut out) = self.val.to_bytes_le();
        let sign_bit = if sign == Sign::Minus { 0x80 } else { 0x00 };
        match out.last_mut() {
            Some(top) if *top & 0x80 == 0 => *top |= sign_bit,
            _ => out.push(sign_bit),
        }
        out
    }

    /// Whether the value is zero, which includes negative zero encodings.
    pub fn is_zero(&self) -> bool {
        self.val.is_zero()
    }

    /// Whether the value is below zero.
    pub fn is_negative(&self) -> bool {
        self.val.is_negative()
    }

    /// Whether the value lies in `lo..=hi`.
    pub fn in_range(&self, lo: i64, hi: i64) -> bool {
        self.val >= BigInt::from(lo) && self.val <= BigInt::from(hi)
    }

    /// Quotient truncated toward zero and the remainder, which takes the
    /// sign of the dividend. `None` when `divisor` is zero.
    pub fn div_rem(&self, divisor: &ScriptNumber) -> Option<(ScriptNumber, ScriptNumber)> {
        if divisor.is_zero() {
            return None;
        }
        let (q, r) = self.val.div_rem(&divisor.val);
        Some((ScriptNumber::from(q), ScriptNumber::from(r)))
    }

    /// The value as an `i32`, saturating at the type's bounds.
    pub fn to_i32(&self) -> i32 {
        self.val
            .to_i32()
            .unwrap_or(if self.val.is_negative() { i32::MIN } else { i32::MAX })
    }

    /// The value as an `i64`, saturating at the type's bounds.
    pub fn to_i64(&self) -> i64 {
        self.val
            .to_i64()
            .unwrap_or(if self.val.is_negative() { i64::MIN } else { i64::MAX })
    }
}

impl From<i64> for ScriptNumber {
    fn from(v: i64) -> Self {
        ScriptNumber::new(v)
    }
}

impl From<BigInt> for ScriptNumber {
    fn from(val: BigInt) -> Self {
        ScriptNumber { val }
    }
}

/// Re-encode `data` as the shortest number with the same value (OP_BIN2NUM).
pub fn minimally_encode(data: &[u8]) -> Vec<u8> {
    let Some((&last, body)) = data.split_last() else {
        return Vec::new();
    };
    if last & 0x7f != 0 {
        return data.to_vec();
    }
    // `last` is a bare sign byte; fold it into the highest non-zero byte.
    let Some(end) = body.iter().rposition(|&b| b != 0) else {
        return Vec::new();
    };
    let mut out = body[..=end].to_vec();
    if out[end] & 0x80 != 0 {
        out.push(last);
    } else {
        out[end] |= last;
    }
    out
}

/// Reject a number whose last byte carries nothing but the sign.
pub fn check_minimal_data_encoding(v: &[u8]) -> Result<(), InterpreterError> {
    let Some((&last, rest)) = v.split_last() else {
        return Ok(());
    };
    let needs_sign_byte = rest.last().map_or(false, |&b| b & 0x80 != 0);
    if last & 0x7f == 0 && !needs_sign_byte {
        return Err(InterpreterError::new(
            ScriptError::ScriptNumMinEncode,
            format!("number {} is not minimally encoded", hex::encode(v)),
        ));
    }
    Ok(())
}
