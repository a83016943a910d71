#![deny(missing_docs)]

//! Script execution, signature hashing and ECDSA for a Bitcoin-style ledger.
//!
//! Re-exports the component crates for single-crate usage and adds
//! [`verify_input`], which checks one transaction input against the output
//! it spends.
//!
//! ```
//! use ledger_core::primitives::{ec::PrivateKey, ChainParams, Hash};
//! use ledger_core::script::{interpreter::ScriptFlags, Address};
//! use ledger_core::transaction::template::{p2pkh, UnlockingScriptTemplate};
//! use ledger_core::transaction::{OutPoint, SigHashType, Transaction, TxIn, TxOut};
//!
//! let key = PrivateKey::from_bytes(&[7u8; 32]).unwrap();
//! let address = Address::from_public_key(&key.pub_key(), &ChainParams::mainnet());
//! let prev_output = TxOut::new(10_000, p2pkh::lock(&address));
//!
//! let mut tx = Transaction::new();
//! tx.add_input(TxIn::new(OutPoint::new(Hash::new([1u8; 32]), 0)));
//! tx.add_output(TxOut::new(9_000, p2pkh::lock(&address)));
//! tx.inputs[0].script_sig = p2pkh::unlock(key, SigHashType::ALL_FORKID)
//!     .sign(&tx, 0, &prev_output)
//!     .unwrap();
//!
//! let (ok, code) = ledger_core::verify_input(
//!     &tx, 0, &prev_output, ScriptFlags::STANDARD, &ChainParams::mainnet(),
//! );
//! assert!(ok, "{}", code);
//! ```

pub use ledger_primitives as primitives;
pub use ledger_script as script;
pub use ledger_transaction as transaction;

use ledger_primitives::ChainParams;
use ledger_script::interpreter::{verify_script_result, ScriptError, ScriptFlags};
use ledger_transaction::{Transaction, TransactionSignatureChecker, TxOut};

/// Verify input `input_index` of `tx` against `prev_output`, the output it
/// spends.
///
/// Returns the success flag and the diagnostic code, which is
/// `ScriptError::Ok` exactly when the flag is true. An index past the end
/// of the inputs fails with `ScriptError::UnknownError`.
pub fn verify_input(
    tx: &Transaction,
    input_index: usize,
    prev_output: &TxOut,
    flags: ScriptFlags,
    params: &ChainParams,
) -> (bool, ScriptError) {
    let Some(input) = tx.inputs.get(input_index) else {
        return (false, ScriptError::UnknownError);
    };
    let checker = TransactionSignatureChecker::new(tx, input_index, prev_output.value, *params);
    verify_script_result(&input.script_sig, &prev_output.script_pubkey, flags, &checker)
}
