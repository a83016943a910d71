//! Fork-id signature hash (BIP143 digest with the FORKID bit).
//!
//! Commits to the amount of the spent output and to aggregate hashes of the
//! transaction's outpoints, sequences and outputs.

use log::debug;

use ledger_primitives::util::{LedgerWriter, VarInt};
use ledger_primitives::{ChainParams, Hash};
use ledger_script::Script;

use super::SigHashType;
use crate::input::OutPoint;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Compute the fork-id digest for input `input_index`.
///
/// Returns [`Hash::ONE`] when `input_index` is out of range, matching the
/// legacy algorithm.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    amount: i64,
    hash_type: SigHashType,
    params: &ChainParams,
) -> Hash {
    match calc_preimage(tx, input_index, script_code, amount, hash_type, params) {
        Ok(preimage) => Hash::sha256d(&preimage),
        Err(e) => {
            debug!("fork-id sighash: {}, returning one", e);
            Hash::ONE
        }
    }
}

/// Build the fork-id preimage before double-hashing.
///
/// The preimage consists of:
/// 1. nVersion (4 bytes LE)
/// 2. hashPrevouts (32 bytes), zero with ANYONECANPAY
/// 3. hashSequence (32 bytes), zero with ANYONECANPAY, SINGLE or NONE
/// 4. outpoint of the signed input (32+4 bytes)
/// 5. scriptCode (varint + script)
/// 6. amount of the spent output (8 bytes LE)
/// 7. nSequence of the signed input (4 bytes LE)
/// 8. hashOutputs (32 bytes): all outputs, the matching output for SINGLE,
///    or zero
/// 9. nLocktime (4 bytes LE)
/// 10. hash type word `type | fork_id << 8` (4 bytes LE)
pub fn calc_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    amount: i64,
    hash_type: SigHashType,
    params: &ChainParams,
) -> Result<Vec<u8>, TransactionError> {
    let input = tx.inputs.get(input_index).ok_or_else(|| {
        TransactionError::InvalidTransaction(format!(
            "input index {} out of range (tx has {} inputs)",
            input_index,
            tx.inputs.len()
        ))
    })?;

    let anyone_can_pay = hash_type.has_anyone_can_pay();
    let single_or_none = hash_type.is_single() || hash_type.is_none();

    let prevouts = if anyone_can_pay { Hash::ZERO } else { hash_prevouts(tx) };
    let sequence = if anyone_can_pay || single_or_none {
        Hash::ZERO
    } else {
        hash_sequence(tx)
    };
    let outputs = if !single_or_none {
        hash_outputs(tx)
    } else if hash_type.is_single() && input_index < tx.outputs.len() {
        Hash::sha256d(&tx.outputs[input_index].to_bytes())
    } else {
        Hash::ZERO
    };

    let mut writer = LedgerWriter::with_capacity(4 + 32 + 32 + OutPoint::SIZE + 9 + script_code.len() + 8 + 4 + 32 + 4 + 4);
    writer.write_u32_le(tx.version);
    writer.write_bytes(prevouts.as_bytes());
    writer.write_bytes(sequence.as_bytes());
    input.previous_output.write_to(&mut writer);
    writer.write_varint(VarInt::from(script_code.len()));
    writer.write_bytes(script_code.to_bytes());
    writer.write_i64_le(amount);
    writer.write_u32_le(input.sequence);
    writer.write_bytes(outputs.as_bytes());
    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(hash_type.0 | (params.fork_id << 8));

    Ok(writer.into_bytes())
}

/// Double SHA-256 of every input's outpoint.
pub fn hash_prevouts(tx: &Transaction) -> Hash {
    let mut writer = LedgerWriter::with_capacity(tx.inputs.len() * OutPoint::SIZE);
    for input in &tx.inputs {
        input.previous_output.write_to(&mut writer);
    }
    Hash::sha256d(writer.as_bytes())
}

/// Double SHA-256 of every input's sequence number.
pub fn hash_sequence(tx: &Transaction) -> Hash {
    let mut writer = LedgerWriter::with_capacity(tx.inputs.len() * 4);
    for input in &tx.inputs {
        writer.write_u32_le(input.sequence);
    }
    Hash::sha256d(writer.as_bytes())
}

/// Double SHA-256 of every serialized output.
pub fn hash_outputs(tx: &Transaction) -> Hash {
    let mut writer = LedgerWriter::new();
    for output in &tx.outputs {
        output.write_to(&mut writer);
    }
    Hash::sha256d(writer.as_bytes())
}
