//! The original signature hash: a double SHA-256 over a pruned copy of the
//! transaction.

use log::debug;

use ledger_primitives::util::{LedgerWriter, VarInt};
use ledger_primitives::Hash;
use ledger_script::Script;

use super::SigHashType;
use crate::output::TxOut;
use crate::transaction::Transaction;

/// Compute the legacy digest for input `input_index`.
///
/// The copy serialized is the transaction with:
/// - only the signed input when ANYONECANPAY is set;
/// - every other input's script emptied, and for NONE and SINGLE its
///   sequence zeroed;
/// - the signed input's script replaced by `script_code` without
///   OP_CODESEPARATORs;
/// - no outputs for NONE, outputs up to the signed index for SINGLE
///   (earlier ones as value -1 with an empty script), all otherwise.
///
/// The 4-byte hash type follows the lock time.
///
/// When `input_index` is out of range, or the type is SINGLE with no output
/// at `input_index`, the result is [`Hash::ONE`]. Signatures over that
/// value are valid, so this must not become an error.
pub fn signature_hash(
    tx: &Transaction,
    input_index: usize,
    script_code: &Script,
    hash_type: SigHashType,
) -> Hash {
    if input_index >= tx.inputs.len() {
        debug!(
            "legacy sighash: input {} out of range ({} inputs), returning one",
            input_index,
            tx.inputs.len()
        );
        return Hash::ONE;
    }
    if hash_type.is_single() && input_index >= tx.outputs.len() {
        debug!(
            "legacy sighash: SINGLE input {} has no matching output ({} outputs), returning one",
            input_index,
            tx.outputs.len()
        );
        return Hash::ONE;
    }

    let script_code = script_code.remove_codeseparators();
    let anyone_can_pay = hash_type.has_anyone_can_pay();
    let zero_other_sequences = hash_type.is_none() || hash_type.is_single();

    let mut writer = LedgerWriter::with_capacity(tx.size() + script_code.len() + 4);
    writer.write_u32_le(tx.version);

    let signed_inputs: Vec<usize> = if anyone_can_pay {
        vec![input_index]
    } else {
        (0..tx.inputs.len()).collect()
    };
    writer.write_varint(VarInt::from(signed_inputs.len()));
    for i in signed_inputs {
        let input = &tx.inputs[i];
        input.previous_output.write_to(&mut writer);
        if i == input_index {
            writer.write_var_bytes(script_code.to_bytes());
            writer.write_u32_le(input.sequence);
        } else {
            writer.write_var_bytes(&[]);
            writer.write_u32_le(if zero_other_sequences { 0 } else { input.sequence });
        }
    }

    if hash_type.is_none() {
        writer.write_varint(VarInt::from(0usize));
    } else if hash_type.is_single() {
        writer.write_varint(VarInt::from(input_index + 1));
        let null = TxOut::null();
        for _ in 0..input_index {
            null.write_to(&mut writer);
        }
        tx.outputs[input_index].write_to(&mut writer);
    } else {
        writer.write_varint(VarInt::from(tx.outputs.len()));
        for output in &tx.outputs {
            output.write_to(&mut writer);
        }
    }

    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(hash_type.0);

    Hash::sha256d(writer.as_bytes())
}
