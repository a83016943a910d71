//! Signature hash computation for transaction signing.
//!
//! Computes the digest that ECDSA signs to authorize spending a transaction
//! input. Two incompatible algorithms exist:
//!
//! - [`legacy`]: serializes a pruned copy of the transaction.
//! - [`forkid`]: the BIP143-style digest that commits to the spent amount
//!   and precomputes aggregate hashes of inputs and outputs.
//!
//! [`signature_hash`] picks one from the hash type and the script flags.
//!
//! See <https://github.com/bitcoin-sv/bitcoin-sv/blob/master/doc/abc/replay-protected-sighash.md#digest-algorithm>

pub mod forkid;
pub mod legacy;

use std::fmt;
use std::ops::BitOr;

use ledger_primitives::{ChainParams, Hash};
use ledger_script::interpreter::ScriptFlags;
use ledger_script::Script;

use crate::transaction::Transaction;

/// Signature hash type: a base type in the low five bits plus the
/// ANYONECANPAY and FORKID flag bits.
///
/// The signature carries the low byte; digests commit to the whole
/// 32-bit word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SigHashType(pub u32);

impl SigHashType {
    /// Sign all inputs and all outputs (the default).
    pub const ALL: SigHashType = SigHashType(0x01);
    /// Sign all inputs but no outputs, allowing outputs to be modified.
    pub const NONE: SigHashType = SigHashType(0x02);
    /// Sign all inputs and only the output with the same index as the signed input.
    pub const SINGLE: SigHashType = SigHashType(0x03);
    /// Replay-protected digest selector.
    pub const FORKID: SigHashType = SigHashType(0x40);
    /// Only sign the current input, allowing other inputs to be added later.
    pub const ANYONECANPAY: SigHashType = SigHashType(0x80);
    /// The standard type on fork-id chains: ALL | FORKID.
    pub const ALL_FORKID: SigHashType = SigHashType(0x41);

    /// Mask applied to extract the base type.
    pub const BASE_MASK: u32 = 0x1f;

    /// Hash type from the byte appended to a signature.
    pub fn from_byte(byte: u8) -> Self {
        SigHashType(u32::from(byte))
    }

    /// The byte appended to a signature.
    pub fn to_byte(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    /// The base type (`ALL`, `NONE`, `SINGLE` or an undefined value).
    pub fn base(self) -> u32 {
        self.0 & Self::BASE_MASK
    }

    pub fn is_single(self) -> bool {
        self.base() == Self::SINGLE.0
    }

    pub fn is_none(self) -> bool {
        self.base() == Self::NONE.0
    }

    pub fn has_forkid(self) -> bool {
        self.0 & Self::FORKID.0 != 0
    }

    pub fn has_anyone_can_pay(self) -> bool {
        self.0 & Self::ANYONECANPAY.0 != 0
    }
}

impl Default for SigHashType {
    fn default() -> Self {
        Self::ALL_FORKID
    }
}

impl BitOr for SigHashType {
    type Output = SigHashType;

    fn bitor(self, rhs: SigHashType) -> SigHashType {
        SigHashType(self.0 | rhs.0)
    }
}

impl fmt::Display for SigHashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self.base() {
            0x01 => "ALL",
            0x02 => "NONE",
            0x03 => "SINGLE",
            _ => "UNDEFINED",
        };
        write!(f, "{}", base)?;
        if self.has_forkid() {
            write!(f, "|FORKID")?;
        }
        if self.has_anyone_can_pay() {
            write!(f, "|ANYONECANPAY")?;
        }
        Ok(())
    }
}

/// Compute the digest for input `input_index` under `hash_type`.
///
/// The fork-id algorithm is used when the hash type has the FORKID bit and
/// `flags` enables fork-id signatures; otherwise the legacy algorithm runs.
/// Both return [`Hash::ONE`] rather than failing when the input index is
/// out of range.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    amount: i64,
    hash_type: SigHashType,
    flags: ScriptFlags,
    params: &ChainParams,
) -> Hash {
    if hash_type.has_forkid() && flags.has_flag(ScriptFlags::ENABLE_SIGHASH_FORKID) {
        forkid::signature_hash(tx, input_index, script_code, amount, hash_type, params)
    } else {
        legacy::signature_hash(tx, input_index, script_code, hash_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{OutPoint, TxIn};
    use crate::output::TxOut;

    pub(crate) fn two_in_two_out() -> Transaction {
        let mut tx = Transaction::new();
        tx.add_input(TxIn::new(OutPoint::new(Hash::new([0x01; 32]), 0)));
        tx.add_input(TxIn::new(OutPoint::new(Hash::new([0x02; 32]), 1)));
        tx.add_output(TxOut::new(1000, Script::from_bytes(&[0x51])));
        tx.add_output(TxOut::new(2000, Script::from_bytes(&[0x52])));
        tx
    }

    #[test]
    fn test_hash_type_parts() {
        let t = SigHashType::SINGLE | SigHashType::ANYONECANPAY | SigHashType::FORKID;
        assert_eq!(t.0, 0xc3);
        assert_eq!(t.to_byte(), 0xc3);
        assert!(t.is_single());
        assert!(t.has_forkid());
        assert!(t.has_anyone_can_pay());
        assert_eq!(t.to_string(), "SINGLE|FORKID|ANYONECANPAY");
        assert_eq!(SigHashType::from_byte(0x41), SigHashType::ALL_FORKID);
        assert_eq!(SigHashType::default(), SigHashType::ALL_FORKID);
    }

    /// Dispatch needs both the FORKID bit and the enabling flag.
    #[test]
    fn test_dispatch_selects_algorithm() {
        let tx = two_in_two_out();
        let code = Script::from_bytes(&[0xac]);
        let params = ChainParams::mainnet();
        let ht = SigHashType::ALL_FORKID;

        let enabled = signature_hash(&tx, 0, &code, 1000, ht, ScriptFlags::ENABLE_SIGHASH_FORKID, &params);
        assert_eq!(enabled, forkid::signature_hash(&tx, 0, &code, 1000, ht, &params));

        let disabled = signature_hash(&tx, 0, &code, 1000, ht, ScriptFlags::NONE, &params);
        assert_eq!(disabled, legacy::signature_hash(&tx, 0, &code, ht));
        assert_ne!(enabled, disabled);

        let plain = signature_hash(&tx, 0, &code, 1000, SigHashType::ALL, ScriptFlags::ENABLE_SIGHASH_FORKID, &params);
        assert_eq!(plain, legacy::signature_hash(&tx, 0, &code, SigHashType::ALL));
    }
}
