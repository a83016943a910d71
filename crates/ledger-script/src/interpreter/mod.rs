//! Consensus script interpreter.
//!
//! Executes signature and pubkey scripts to verify transaction inputs under
//! a set of [`ScriptFlags`].
//!
//! # Architecture
//!
//! The interpreter does not depend on the transaction crate. Signature and
//! lock-time checks go through the [`SignatureChecker`] trait, which the
//! caller implements over its transaction data.
//!
//! # Example
//!
//! ```
//! use ledger_script::Script;
//! use ledger_script::interpreter::{verify_script, NullChecker, ScriptFlags};
//!
//! let sig = Script::from_asm("OP_2 OP_3").unwrap();
//! let pubkey = Script::from_asm("OP_ADD OP_5 OP_EQUAL").unwrap();
//! verify_script(&sig, &pubkey, ScriptFlags::NONE, &NullChecker).unwrap();
//! ```

pub mod checker;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod flags;
pub mod scriptnum;
pub mod stack;
pub mod verify;

mod ops_arithmetic;
mod ops_crypto;
mod ops_data;
mod ops_flow;
mod ops_stack;

pub use checker::{NullChecker, SignatureChecker};
pub use config::Config;
pub use error::{InterpreterError, ScriptError};
pub use evaluator::{eval_script, Evaluator};
pub use flags::ScriptFlags;
pub use scriptnum::ScriptNumber;
pub use stack::Stack;
pub use verify::{verify_script, verify_script_result};
