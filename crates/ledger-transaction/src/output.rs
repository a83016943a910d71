//! Transaction outputs.

use ledger_primitives::util::{LedgerReader, LedgerWriter};
use ledger_script::Script;

use crate::TransactionError;

/// A transaction output: an amount in satoshis and the script locking it.
///
/// The amount is signed on the wire. Legacy SIGHASH_SINGLE serialization
/// writes placeholder outputs with a value of -1.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TxOut {
    pub value: i64,
    pub script_pubkey: Script,
}

impl TxOut {
    pub fn new(value: i64, script_pubkey: Script) -> Self {
        TxOut { value, script_pubkey }
    }

    /// The placeholder written for skipped outputs under legacy
    /// SIGHASH_SINGLE: value -1 and an empty script.
    pub fn null() -> Self {
        TxOut { value: -1, script_pubkey: Script::new() }
    }

    pub fn read_from(reader: &mut LedgerReader) -> Result<Self, TransactionError> {
        let value = reader.read_i64_le().map_err(|e| {
            TransactionError::Serialization(format!("reading output value: {}", e))
        })?;
        let script = reader.read_var_bytes().map_err(|e| {
            TransactionError::Serialization(format!("reading output script: {}", e))
        })?;
        Ok(TxOut { value, script_pubkey: Script::from_bytes(script) })
    }

    pub fn write_to(&self, writer: &mut LedgerWriter) {
        writer.write_i64_le(self.value);
        writer.write_var_bytes(self.script_pubkey.to_bytes());
    }

    /// Wire bytes of this output: value(8) + varint + script.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = LedgerWriter::with_capacity(8 + 9 + self.script_pubkey.len());
        self.write_to(&mut writer);
        writer.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_output_bytes() {
        assert_eq!(
            TxOut::null().to_bytes(),
            vec![0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00],
            "value -1 then an empty script"
        );
    }

    #[test]
    fn test_output_roundtrip() {
        let out = TxOut::new(1500, Script::from_bytes(&[0x76, 0xa9]));
        let bytes = out.to_bytes();
        assert_eq!(&bytes[..8], &1500i64.to_le_bytes());
        let mut reader = LedgerReader::new(&bytes);
        assert_eq!(TxOut::read_from(&mut reader).expect("parse"), out);
    }
}
