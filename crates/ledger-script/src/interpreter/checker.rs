//! The seam between the evaluator and transaction data.
//!
//! The script crate does not know about transactions. OP_CHECKSIG and the
//! lock-time opcodes delegate to a [`SignatureChecker`] supplied by the
//! caller; the transaction crate provides the real implementation.

use crate::Script;

use super::flags::ScriptFlags;
use super::scriptnum::ScriptNumber;

/// Verifies signatures and lock-time conditions for one transaction input.
pub trait SignatureChecker {
    /// Check `full_sig` (DER signature followed by the sighash type byte)
    /// against `pubkey` over the digest of `script_code`.
    ///
    /// Encoding rules have already been enforced by the evaluator. Malformed
    /// input yields `false`, never a panic.
    fn check_sig(
        &self,
        full_sig: &[u8],
        pubkey: &[u8],
        script_code: &Script,
        flags: ScriptFlags,
    ) -> bool;

    /// Whether the transaction satisfies an OP_CHECKLOCKTIMEVERIFY operand.
    fn check_lock_time(&self, lock_time: &ScriptNumber) -> bool;

    /// Whether the input satisfies an OP_CHECKSEQUENCEVERIFY operand.
    fn check_sequence(&self, sequence: &ScriptNumber) -> bool;
}

/// A checker with no transaction behind it: every check fails.
///
/// Used to evaluate scripts that contain no signature or lock-time opcodes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullChecker;

impl SignatureChecker for NullChecker {
    fn check_sig(&self, _: &[u8], _: &[u8], _: &Script, _: ScriptFlags) -> bool {
        false
    }

    fn check_lock_time(&self, _: &ScriptNumber) -> bool {
        false
    }

    fn check_sequence(&self, _: &ScriptNumber) -> bool {
        false
    }
}
