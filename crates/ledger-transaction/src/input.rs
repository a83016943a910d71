//! Transaction inputs and the outpoints they spend.

use std::fmt;

use ledger_primitives::util::{LedgerReader, LedgerWriter};
use ledger_primitives::Hash;
use ledger_script::Script;

use crate::TransactionError;

/// Sequence number that marks an input as final.
pub const SEQUENCE_FINAL: u32 = 0xFFFF_FFFF;

/// Reference to a previous transaction output.
///
/// Serialized as the 32-byte txid in internal byte order followed by the
/// output index as 4 bytes LE.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct OutPoint {
    /// Id of the transaction holding the spent output.
    pub hash: Hash,
    /// Index of the spent output in that transaction.
    pub index: u32,
}

impl OutPoint {
    /// Size of a serialized outpoint.
    pub const SIZE: usize = 36;

    pub fn new(hash: Hash, index: u32) -> Self {
        OutPoint { hash, index }
    }

    /// The outpoint a coinbase input carries: zero hash, index `0xFFFFFFFF`.
    pub fn null() -> Self {
        OutPoint { hash: Hash::ZERO, index: 0xFFFF_FFFF }
    }

    pub fn is_null(&self) -> bool {
        self.hash.is_zero() && self.index == 0xFFFF_FFFF
    }

    pub fn read_from(reader: &mut LedgerReader) -> Result<Self, TransactionError> {
        let hash = reader.read_array::<32>().map_err(|e| {
            TransactionError::Serialization(format!("reading outpoint hash: {}", e))
        })?;
        let index = reader.read_u32_le().map_err(|e| {
            TransactionError::Serialization(format!("reading outpoint index: {}", e))
        })?;
        Ok(OutPoint { hash: Hash::new(hash), index })
    }

    pub fn write_to(&self, writer: &mut LedgerWriter) {
        writer.write_bytes(self.hash.as_bytes());
        writer.write_u32_le(self.index);
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.hash, self.index)
    }
}

/// A transaction input.
///
/// # Wire format
///
/// | Field           | Size                |
/// |-----------------|---------------------|
/// | previous output | 36 bytes            |
/// | script length   | VarInt              |
/// | script_sig      | variable            |
/// | sequence        | 4 bytes (LE)        |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxIn {
    /// The output being spent.
    pub previous_output: OutPoint,
    /// Unlocking script.
    pub script_sig: Script,
    /// Relative lock-time and replacement field.
    pub sequence: u32,
}

impl TxIn {
    /// An input spending `previous_output` with an empty script and a
    /// final sequence number.
    pub fn new(previous_output: OutPoint) -> Self {
        TxIn {
            previous_output,
            script_sig: Script::new(),
            sequence: SEQUENCE_FINAL,
        }
    }

    pub fn read_from(reader: &mut LedgerReader) -> Result<Self, TransactionError> {
        let previous_output = OutPoint::read_from(reader)?;
        let script = reader.read_var_bytes().map_err(|e| {
            TransactionError::Serialization(format!("reading input script: {}", e))
        })?;
        let sequence = reader.read_u32_le().map_err(|e| {
            TransactionError::Serialization(format!("reading sequence: {}", e))
        })?;
        Ok(TxIn {
            previous_output,
            script_sig: Script::from_bytes(script),
            sequence,
        })
    }

    pub fn write_to(&self, writer: &mut LedgerWriter) {
        self.previous_output.write_to(writer);
        writer.write_var_bytes(self.script_sig.to_bytes());
        writer.write_u32_le(self.sequence);
    }

    pub fn is_final(&self) -> bool {
        self.sequence == SEQUENCE_FINAL
    }
}
