//! Consensus-level failure codes and the interpreter error type.
//!
//! `ScriptError` is the closed set of reasons a script can fail. It is a value,
//! never a panic: untrusted scripts must be rejectable on every branch.

use std::fmt;

/// Reason a script failed, or `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptError {
    Ok,
    UnknownError,
    EvalFalse,
    OpReturn,
    ScriptSize,
    PushSize,
    OpCount,
    StackSize,
    SigCount,
    PubkeyCount,
    Verify,
    EqualVerify,
    CheckMultisigVerify,
    CheckSigVerify,
    NumEqualVerify,
    BadOpcode,
    DisabledOpcode,
    MalformedPush,
    StackUnderflow,
    InvalidAltstackOperation,
    UnbalancedConditional,
    NegativeLocktime,
    UnsatisfiedLocktime,
    SigHashType,
    SigDer,
    MinimalData,
    SigPushOnly,
    SigHighS,
    SigNullDummy,
    PubkeyType,
    CleanStack,
    MinimalIf,
    SigNullFail,
    DiscourageUpgradableNops,
    NonCompressedPubkey,
    IllegalForkId,
    MustUseForkId,
    InvalidNumberRange,
    InvalidSplitRange,
    InvalidOperandSize,
    ImpossibleEncoding,
    ScriptNumOverflow,
    ScriptNumMinEncode,
    DivByZero,
    ModByZero,
    InvalidFlags,
}

impl ScriptError {
    /// Canonical upper-snake diagnostic name, e.g. `"EVAL_FALSE"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScriptError::Ok => "OK",
            ScriptError::UnknownError => "UNKNOWN_ERROR",
            ScriptError::EvalFalse => "EVAL_FALSE",
            ScriptError::OpReturn => "OP_RETURN",
            ScriptError::ScriptSize => "SCRIPT_SIZE",
            ScriptError::PushSize => "PUSH_SIZE",
            ScriptError::OpCount => "OP_COUNT",
            ScriptError::StackSize => "STACK_SIZE",
            ScriptError::SigCount => "SIG_COUNT",
            ScriptError::PubkeyCount => "PUBKEY_COUNT",
            ScriptError::Verify => "VERIFY",
            ScriptError::EqualVerify => "EQUALVERIFY",
            ScriptError::CheckMultisigVerify => "CHECKMULTISIGVERIFY",
            ScriptError::CheckSigVerify => "CHECKSIGVERIFY",
            ScriptError::NumEqualVerify => "NUMEQUALVERIFY",
            ScriptError::BadOpcode => "BAD_OPCODE",
            ScriptError::DisabledOpcode => "DISABLED_OPCODE",
            ScriptError::MalformedPush => "MALFORMED_PUSH",
            ScriptError::StackUnderflow => "STACK_UNDERFLOW",
            ScriptError::InvalidAltstackOperation => "INVALID_ALTSTACK_OPERATION",
            ScriptError::UnbalancedConditional => "UNBALANCED_CONDITIONAL",
            ScriptError::NegativeLocktime => "NEGATIVE_LOCKTIME",
            ScriptError::UnsatisfiedLocktime => "UNSATISFIED_LOCKTIME",
            ScriptError::SigHashType => "SIG_HASHTYPE",
            ScriptError::SigDer => "SIG_DER",
            ScriptError::MinimalData => "MINIMALDATA",
            ScriptError::SigPushOnly => "SIG_PUSHONLY",
            ScriptError::SigHighS => "SIG_HIGH_S",
            ScriptError::SigNullDummy => "SIG_NULLDUMMY",
            ScriptError::PubkeyType => "PUBKEYTYPE",
            ScriptError::CleanStack => "CLEANSTACK",
            ScriptError::MinimalIf => "MINIMALIF",
            ScriptError::SigNullFail => "NULLFAIL",
            ScriptError::DiscourageUpgradableNops => "DISCOURAGE_UPGRADABLE_NOPS",
            ScriptError::NonCompressedPubkey => "NONCOMPRESSED_PUBKEY",
            ScriptError::IllegalForkId => "ILLEGAL_FORKID",
            ScriptError::MustUseForkId => "MUST_USE_FORKID",
            ScriptError::InvalidNumberRange => "INVALID_NUMBER_RANGE",
            ScriptError::InvalidSplitRange => "INVALID_SPLIT_RANGE",
            ScriptError::InvalidOperandSize => "INVALID_OPERAND_SIZE",
            ScriptError::ImpossibleEncoding => "IMPOSSIBLE_ENCODING",
            ScriptError::ScriptNumOverflow => "SCRIPTNUM_OVERFLOW",
            ScriptError::ScriptNumMinEncode => "SCRIPTNUM_MINENCODE",
            ScriptError::DivByZero => "DIV_BY_ZERO",
            ScriptError::ModByZero => "MOD_BY_ZERO",
            ScriptError::InvalidFlags => "INVALID_FLAGS",
        }
    }

    /// Short human-readable explanation.
    pub fn message(&self) -> &'static str {
        match self {
            ScriptError::Ok => "no error",
            ScriptError::UnknownError => "unknown error",
            ScriptError::EvalFalse => "script evaluated without error but finished with a false/empty top stack element",
            ScriptError::OpReturn => "OP_RETURN was encountered",
            ScriptError::ScriptSize => "script is too big",
            ScriptError::PushSize => "push value size limit exceeded",
            ScriptError::OpCount => "operation limit exceeded",
            ScriptError::StackSize => "stack size limit exceeded",
            ScriptError::SigCount => "signature count negative or greater than pubkey count",
            ScriptError::PubkeyCount => "pubkey count negative or limit exceeded",
            ScriptError::Verify => "script failed an OP_VERIFY operation",
            ScriptError::EqualVerify => "script failed an OP_EQUALVERIFY operation",
            ScriptError::CheckMultisigVerify => "script failed an OP_CHECKMULTISIGVERIFY operation",
            ScriptError::CheckSigVerify => "script failed an OP_CHECKSIGVERIFY operation",
            ScriptError::NumEqualVerify => "script failed an OP_NUMEQUALVERIFY operation",
            ScriptError::BadOpcode => "opcode missing or not understood",
            ScriptError::DisabledOpcode => "attempted to use a disabled opcode",
            ScriptError::MalformedPush => "push operation runs past the end of the script",
            ScriptError::StackUnderflow => "operation not valid with the current stack size",
            ScriptError::InvalidAltstackOperation => "operation not valid with the current altstack size",
            ScriptError::UnbalancedConditional => "invalid OP_IF construction",
            ScriptError::NegativeLocktime => "negative locktime",
            ScriptError::UnsatisfiedLocktime => "locktime requirement not satisfied",
            ScriptError::SigHashType => "signature hash type missing or not understood",
            ScriptError::SigDer => "non-canonical DER signature",
            ScriptError::MinimalData => "data push larger than necessary",
            ScriptError::SigPushOnly => "only push operators allowed in signature scripts",
            ScriptError::SigHighS => "non-canonical signature: S value is unnecessarily high",
            ScriptError::SigNullDummy => "dummy CHECKMULTISIG argument must be zero",
            ScriptError::PubkeyType => "public key is neither compressed or uncompressed",
            ScriptError::CleanStack => "stack size must be exactly one after execution",
            ScriptError::MinimalIf => "OP_IF/NOTIF argument must be minimal",
            ScriptError::SigNullFail => "signature must be zero for failed CHECK(MULTI)SIG operation",
            ScriptError::DiscourageUpgradableNops => "NOPx reserved for soft-fork upgrades",
            ScriptError::NonCompressedPubkey => "using non-compressed public key",
            ScriptError::IllegalForkId => "illegal use of SIGHASH_FORKID",
            ScriptError::MustUseForkId => "signature must use SIGHASH_FORKID",
            ScriptError::InvalidNumberRange => "given operand is not a number within the valid range",
            ScriptError::InvalidSplitRange => "invalid OP_SPLIT range",
            ScriptError::InvalidOperandSize => "invalid operand size",
            ScriptError::ImpossibleEncoding => "the requested encoding is impossible to satisfy",
            ScriptError::ScriptNumOverflow => "script number overflow",
            ScriptError::ScriptNumMinEncode => "non-minimally encoded script number",
            ScriptError::DivByZero => "division by zero error",
            ScriptError::ModByZero => "modulo by zero error",
            ScriptError::InvalidFlags => "invalid script flag combination",
        }
    }

    /// Look a code up by its canonical name.
    pub fn from_name(name: &str) -> Option<ScriptError> {
        ALL.iter().copied().find(|e| e.as_str() == name)
    }
}

const ALL: &[ScriptError] = &[
    ScriptError::Ok,
    ScriptError::UnknownError,
    ScriptError::EvalFalse,
    ScriptError::OpReturn,
    ScriptError::ScriptSize,
    ScriptError::PushSize,
    ScriptError::OpCount,
    ScriptError::StackSize,
    ScriptError::SigCount,
    ScriptError::PubkeyCount,
    ScriptError::Verify,
    ScriptError::EqualVerify,
    ScriptError::CheckMultisigVerify,
    ScriptError::CheckSigVerify,
    ScriptError::NumEqualVerify,
    ScriptError::BadOpcode,
    ScriptError::DisabledOpcode,
    ScriptError::MalformedPush,
    ScriptError::StackUnderflow,
    ScriptError::InvalidAltstackOperation,
    ScriptError::UnbalancedConditional,
    ScriptError::NegativeLocktime,
    ScriptError::UnsatisfiedLocktime,
    ScriptError::SigHashType,
    ScriptError::SigDer,
    ScriptError::MinimalData,
    ScriptError::SigPushOnly,
    ScriptError::SigHighS,
    ScriptError::SigNullDummy,
    ScriptError::PubkeyType,
    ScriptError::CleanStack,
    ScriptError::MinimalIf,
    ScriptError::SigNullFail,
    ScriptError::DiscourageUpgradableNops,
    ScriptError::NonCompressedPubkey,
    ScriptError::IllegalForkId,
    ScriptError::MustUseForkId,
    ScriptError::InvalidNumberRange,
    ScriptError::InvalidSplitRange,
    ScriptError::InvalidOperandSize,
    ScriptError::ImpossibleEncoding,
    ScriptError::ScriptNumOverflow,
    ScriptError::ScriptNumMinEncode,
    ScriptError::DivByZero,
    ScriptError::ModByZero,
    ScriptError::InvalidFlags,
];

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A script failure with its code and a description of the offending input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterError {
    pub code: ScriptError,
    pub description: String,
}

impl InterpreterError {
    pub fn new(code: ScriptError, description: impl Into<String>) -> Self {
        InterpreterError {
            code,
            description: description.into(),
        }
    }
}

impl From<ScriptError> for InterpreterError {
    fn from(code: ScriptError) -> Self {
        InterpreterError::new(code, code.message())
    }
}

impl fmt::Display for InterpreterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.description)
    }
}

impl std::error::Error for InterpreterError {}

/// Check if an error has a specific error code.
pub fn is_error_code(err: &InterpreterError, code: ScriptError) -> bool {
    err.code == code
}
