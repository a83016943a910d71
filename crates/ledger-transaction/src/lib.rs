//! Transactions, signature hashing and the signature checker for the ledger core.
//!
//! Provides the [`Transaction`] type with its wire serialization, the
//! legacy and fork-id signature hash algorithms, and
//! [`TransactionSignatureChecker`], which connects the script interpreter
//! to a transaction input.

pub mod checker;
pub mod input;
pub mod output;
pub mod sighash;
pub mod template;
pub mod transaction;

mod error;
pub use checker::TransactionSignatureChecker;
pub use error::TransactionError;
pub use input::{OutPoint, TxIn, SEQUENCE_FINAL};
pub use output::TxOut;
pub use sighash::SigHashType;
pub use transaction::Transaction;
