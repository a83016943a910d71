//! The transaction type and its wire serialization.

use std::fmt;

use ledger_primitives::util::{LedgerReader, LedgerWriter, VarInt};
use ledger_primitives::Hash;

use crate::input::TxIn;
use crate::output::TxOut;
use crate::TransactionError;

/// A transaction: version, inputs, outputs and lock time.
///
/// # Wire format
///
/// | Field        | Size                      |
/// |--------------|---------------------------|
/// | version      | 4 bytes (LE)              |
/// | input count  | VarInt                    |
/// | inputs       | variable (per input)      |
/// | output count | VarInt                    |
/// | outputs      | variable (per output)     |
/// | lock_time    | 4 bytes (LE)              |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction format version. Relative lock-times need version 2.
    pub version: u32,

    pub inputs: Vec<TxIn>,

    pub outputs: Vec<TxOut>,

    /// Block height (below 500,000,000) or Unix time before which the
    /// transaction is not final.
    pub lock_time: u32,
}

impl Transaction {
    /// Create a new empty transaction with version 1 and lock time 0.
    pub fn new() -> Self {
        Transaction {
            version: 1,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    // -----------------------------------------------------------------
    // Deserialization
    // -----------------------------------------------------------------

    /// Parse a transaction from a hex-encoded string.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| TransactionError::Serialization(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction from raw bytes.
    ///
    /// The slice must hold exactly one complete transaction; trailing data
    /// is an error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = LedgerReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(TransactionError::Serialization(format!(
                "trailing {} bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    /// Deserialize a transaction from a reader positioned at its first byte.
    pub fn read_from(reader: &mut LedgerReader) -> Result<Self, TransactionError> {
        let version = reader
            .read_u32_le()
            .map_err(|e| TransactionError::Serialization(format!("reading version: {}", e)))?;

        let input_count = Self::read_count(reader, "input")?;
        let mut inputs = Vec::with_capacity(input_count);
        for _ in 0..input_count {
            inputs.push(TxIn::read_from(reader)?);
        }

        let output_count = Self::read_count(reader, "output")?;
        let mut outputs = Vec::with_capacity(output_count);
        for _ in 0..output_count {
            outputs.push(TxOut::read_from(reader)?);
        }

        let lock_time = reader
            .read_u32_le()
            .map_err(|e| TransactionError::Serialization(format!("reading lock time: {}", e)))?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    /// Read an element count, refusing counts the remaining bytes cannot
    /// possibly hold so a hostile varint cannot force a huge allocation.
    fn read_count(reader: &mut LedgerReader, what: &str) -> Result<usize, TransactionError> {
        let count = reader
            .read_varint()
            .map_err(|e| TransactionError::Serialization(format!("reading {} count: {}", what, e)))?
            .value();
        if count > reader.remaining() as u64 {
            return Err(TransactionError::Serialization(format!(
                "{} count {} exceeds remaining {} bytes",
                what,
                count,
                reader.remaining()
            )));
        }
        Ok(count as usize)
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    pub fn write_to(&self, writer: &mut LedgerWriter) {
        writer.write_u32_le(self.version);

        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(writer);
        }

        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(writer);
        }

        writer.write_u32_le(self.lock_time);
    }

    /// Serialize this transaction to its wire bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = LedgerWriter::with_capacity(256);
        self.write_to(&mut writer);
        writer.into_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    // -----------------------------------------------------------------
    // Transaction ID
    // -----------------------------------------------------------------

    /// Double SHA-256 of the serialized transaction, in internal byte order.
    pub fn tx_id(&self) -> Hash {
        Hash::sha256d(&self.to_bytes())
    }

    /// The txid as conventionally displayed (byte-reversed hex).
    pub fn tx_id_hex(&self) -> String {
        self.tx_id().to_string()
    }

    // -----------------------------------------------------------------
    // Inputs and outputs
    // -----------------------------------------------------------------

    pub fn add_input(&mut self, input: TxIn) {
        self.inputs.push(input);
    }

    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    pub fn add_output(&mut self, output: TxOut) {
        self.outputs.push(output);
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Sum of all output values.
    pub fn total_output_value(&self) -> i64 {
        self.outputs.iter().map(|o| o.value).sum()
    }

    /// A coinbase transaction has exactly one input, spending the null
    /// outpoint.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.len() == 1 && self.inputs[0].previous_output.is_null()
    }

    /// Size of the serialized transaction in bytes.
    pub fn size(&self) -> usize {
        self.to_bytes().len()
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
