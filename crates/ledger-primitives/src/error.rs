/// Unified error type for the primitives crate.
///
/// Covers failures from fixed-width parsing, the encoders, key handling and
/// the ECDSA engine. Consensus-level script failures never surface here; they
/// are reported by the script crate's `ScriptError`.
#[derive(Debug, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid WIF format: {0}")]
    InvalidWif(String),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("point not on curve")]
    PointNotOnCurve,

    #[error("invalid length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("invalid recovery id: {0}")]
    InvalidRecoveryId(u8),

    #[error("public key recovery failed: {0}")]
    RecoveryFailed(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("varint too large")]
    VarIntTooLarge,

    #[error("unexpected end of data")]
    UnexpectedEof,
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
