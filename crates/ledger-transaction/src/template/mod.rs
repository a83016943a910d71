//! Script templates for common output types.
//!
//! Provides the [`UnlockingScriptTemplate`] trait and a P2PKH
//! implementation for producing signature scripts.

pub mod p2pkh;

use ledger_script::Script;

use crate::output::TxOut;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Trait for script templates that produce unlocking scripts.
///
/// `sign` receives the transaction, the input index and the output that
/// input spends, computes the signature hash, signs it, and returns the
/// signature script.
pub trait UnlockingScriptTemplate {
    /// Produce a signature script for input `input_index` spending
    /// `prev_output`.
    fn sign(
        &self,
        tx: &Transaction,
        input_index: usize,
        prev_output: &TxOut,
    ) -> Result<Script, TransactionError>;
}
