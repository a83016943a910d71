/// Error types for transaction operations.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// The transaction does not have the shape an operation needs
    /// (e.g. an input index past the end).
    #[error("invalid transaction: {0}")]
    InvalidTransaction(String),
    /// An input could not be signed.
    #[error("signing error: {0}")]
    SigningError(String),
    /// Wire-format bytes or hex could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// An underlying script error (forwarded from `ledger-script`).
    #[error("script error: {0}")]
    Script(#[from] ledger_script::ScriptFormatError),
    /// An underlying primitives error (forwarded from `ledger-primitives`).
    #[error("primitives error: {0}")]
    Primitives(#[from] ledger_primitives::PrimitivesError),
}
