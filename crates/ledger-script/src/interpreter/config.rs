//! Consensus limits enforced by the evaluator.

/// Maximum number of non-push operations per script.
pub const MAX_OPS_PER_SCRIPT: usize = 500;
/// Maximum combined depth of the main and alt stacks.
pub const MAX_STACK_SIZE: usize = 1000;
/// Maximum script length in bytes.
pub const MAX_SCRIPT_SIZE: usize = 10_000;
/// Maximum size of a single stack element.
pub const MAX_SCRIPT_ELEMENT_SIZE: usize = 520;
/// Default maximum byte length of a numeric operand.
pub const MAX_SCRIPT_NUMBER_LENGTH: usize = 4;
/// Byte length allowed for CHECKLOCKTIMEVERIFY/CHECKSEQUENCEVERIFY operands.
pub const LOCKTIME_NUMBER_LENGTH: usize = 5;
/// Maximum number of public keys in a CHECKMULTISIG.
pub const MAX_PUBKEYS_PER_MULTISIG: usize = 20;

/// Limits in force for one evaluation.
///
/// `Config::default()` carries the consensus values; tests may tighten them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Non-push opcodes allowed per script, multisig keys included.
    pub max_ops: usize,
    /// Combined main and alt stack depth.
    pub max_stack_size: usize,
    /// Script length in bytes.
    pub max_script_size: usize,
    /// Size of one pushed element.
    pub max_element_size: usize,
    /// Byte length of a numeric operand.
    pub max_number_length: usize,
    /// Keys in one CHECKMULTISIG.
    pub max_pubkeys_per_multisig: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_ops: MAX_OPS_PER_SCRIPT,
            max_stack_size: MAX_STACK_SIZE,
            max_script_size: MAX_SCRIPT_SIZE,
            max_element_size: MAX_SCRIPT_ELEMENT_SIZE,
            max_number_length: MAX_SCRIPT_NUMBER_LENGTH,
            max_pubkeys_per_multisig: MAX_PUBKEYS_PER_MULTISIG,
        }
    }
}
