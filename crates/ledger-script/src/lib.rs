//! Script model and consensus script evaluator for the ledger core.
//!
//! Provides the `Script` byte-string type, the opcode table, a lazy operand
//! parser, P2PKH addresses, and the interpreter that verifies signature and
//! pubkey scripts through a caller-supplied signature checker.

pub mod address;
pub mod interpreter;
pub mod opcodes;
pub mod operand;
pub mod script;

mod error;
pub use address::Address;
pub use error::ScriptFormatError;
pub use operand::{Operand, Operands};
pub use script::Script;
