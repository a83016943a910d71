//! The [`SignatureChecker`] backed by a real transaction input.

use log::debug;

use ledger_primitives::ec::{PublicKey, Signature};
use ledger_primitives::ChainParams;
use ledger_script::interpreter::{ScriptFlags, ScriptNumber, SignatureChecker};
use ledger_script::Script;

use crate::sighash::{self, SigHashType};
use crate::transaction::Transaction;

/// Lock times below this are block heights, at or above it Unix times.
pub const LOCKTIME_THRESHOLD: i64 = 500_000_000;

/// Sequence bit that disables relative lock-time for an input.
pub const SEQUENCE_LOCKTIME_DISABLE_FLAG: i64 = 1 << 31;

/// Sequence bit selecting time-based (set) or height-based relative locks.
pub const SEQUENCE_LOCKTIME_TYPE_FLAG: i64 = 1 << 22;

/// Sequence bits holding the relative lock value.
pub const SEQUENCE_LOCKTIME_MASK: i64 = 0x0000_ffff;

/// Verifies signatures and lock-times for input `input_index` of `tx`.
///
/// `amount` is the value of the output being spent; the fork-id digest
/// commits to it.
#[derive(Clone, Copy, Debug)]
pub struct TransactionSignatureChecker<'a> {
    /// The spending transaction.
    pub tx: &'a Transaction,
    /// Index of the input being verified.
    pub input_index: usize,
    /// Value of the output the input spends.
    pub amount: i64,
    /// Supplies the fork id mixed into the fork-id digest.
    pub chain_params: ChainParams,
}

impl<'a> TransactionSignatureChecker<'a> {
    /// Checker for input `input_index` spending an output worth `amount`.
    pub fn new(tx: &'a Transaction, input_index: usize, amount: i64, chain_params: ChainParams) -> Self {
        TransactionSignatureChecker {
            tx,
            input_index,
            amount,
            chain_params,
        }
    }
}

impl SignatureChecker for TransactionSignatureChecker<'_> {
    fn check_sig(&self, full_sig: &[u8], pubkey: &[u8], script_code: &Script, flags: ScriptFlags) -> bool {
        let Some((&hash_byte, der)) = full_sig.split_last() else {
            return false;
        };
        let pubkey = match PublicKey::from_bytes(pubkey) {
            Ok(pk) => pk,
            Err(e) => {
                debug!("check_sig: unusable public key: {}", e);
                return false;
            }
        };
        let sig = match Signature::from_der_lax(der) {
            Ok(sig) => sig,
            Err(e) => {
                debug!("check_sig: unusable signature: {}", e);
                return false;
            }
        };

        let hash_type = SigHashType::from_byte(hash_byte);
        let digest = sighash::signature_hash(
            self.tx,
            self.input_index,
            script_code,
            self.amount,
            hash_type,
            flags,
            &self.chain_params,
        );
        let ok = pubkey.verify(digest.as_bytes(), &sig);
        if !ok {
            debug!(
                "check_sig: signature does not verify for input {} ({})",
                self.input_index, hash_type
            );
        }
        ok
    }

    fn check_lock_time(&self, lock_time: &ScriptNumber) -> bool {
        let Some(input) = self.tx.inputs.get(self.input_index) else {
            return false;
        };
        let operand = lock_time.to_i64();
        let tx_lock_time = i64::from(self.tx.lock_time);

        // Heights and times are not comparable.
        if (tx_lock_time < LOCKTIME_THRESHOLD) != (operand < LOCKTIME_THRESHOLD) {
            return false;
        }
        if operand > tx_lock_time {
            return false;
        }
        // A final input makes the lock time ineffective.
        !input.is_final()
    }

    fn check_sequence(&self, sequence: &ScriptNumber) -> bool {
        let Some(input) = self.tx.inputs.get(self.input_index) else {
            return false;
        };
        if self.tx.version < 2 {
            return false;
        }
        let tx_sequence = i64::from(input.sequence);
        if tx_sequence & SEQUENCE_LOCKTIME_DISABLE_FLAG != 0 {
            return false;
        }

        let mask = SEQUENCE_LOCKTIME_TYPE_FLAG | SEQUENCE_LOCKTIME_MASK;
        let tx_masked = tx_sequence & mask;
        let operand_masked = sequence.to_i64() & mask;

        let same_type = (tx_masked < SEQUENCE_LOCKTIME_TYPE_FLAG) == (operand_masked < SEQUENCE_LOCKTIME_TYPE_FLAG);
        same_type && operand_masked <= tx_masked
    }
}
