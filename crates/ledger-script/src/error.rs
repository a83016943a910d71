/// Error types for script parsing and construction.
///
/// These cover problems with script bytes and text forms outside of
/// evaluation. Consensus failures raised while executing a script are
/// reported through [`crate::interpreter::InterpreterError`] instead.
#[derive(Debug, thiserror::Error)]
pub enum ScriptFormatError {
    /// An ASM token was neither a known opcode nor valid hex data.
    #[error("invalid asm token: {0}")]
    InvalidAsmToken(String),

    /// Attempted to use append_opcodes for a push data opcode.
    #[error("use append_push_data for push data opcodes: {0}")]
    InvalidOpcodeType(String),

    /// Invalid address string.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid address length after Base58 decoding.
    #[error("invalid address length for '{0}'")]
    InvalidAddressLength(String),

    /// Address version byte does not belong to a known network.
    #[error("unsupported address version {0:#04x}")]
    UnsupportedAddress(u8),

    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// Script is empty when a non-empty script was expected.
    #[error("script is empty")]
    EmptyScript,

    /// Script is not a P2PKH script.
    #[error("not a P2PKH")]
    NotP2PKH,

    /// A push opcode announces more data than the script holds.
    #[error("push at offset {offset} needs {needed} bytes, {available} available")]
    TruncatedPush {
        /// Byte offset of the push opcode.
        offset: usize,
        /// Bytes the push announced (including its length prefix).
        needed: usize,
        /// Bytes left in the script after the opcode.
        available: usize,
    },

    /// Push data exceeds what any push opcode can encode.
    #[error("data too big: {0} bytes")]
    DataTooBig(usize),

    /// Error from primitives crate.
    #[error("primitives error: {0}")]
    Primitives(#[from] ledger_primitives::PrimitivesError),
}
