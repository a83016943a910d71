//! Pay-to-Public-Key-Hash (P2PKH) script template.
//!
//! Creates standard P2PKH locking scripts (`OP_DUP OP_HASH160 <hash>
//! OP_EQUALVERIFY OP_CHECKSIG`) and signature scripts (`<sig> <pubkey>`).

use log::debug;

use ledger_primitives::ec::PrivateKey;
use ledger_primitives::ChainParams;
use ledger_script::interpreter::ScriptFlags;
use ledger_script::opcodes::*;
use ledger_script::{Address, Script};

use crate::output::TxOut;
use crate::sighash::{self, SigHashType};
use crate::template::UnlockingScriptTemplate;
use crate::transaction::Transaction;
use crate::TransactionError;

/// Create a P2PKH locking script paying `address`.
pub fn lock(address: &Address) -> Script {
    let mut bytes = Vec::with_capacity(25);
    bytes.push(OP_DUP);
    bytes.push(OP_HASH160);
    bytes.push(OP_DATA_20);
    bytes.extend_from_slice(&address.public_key_hash);
    bytes.push(OP_EQUALVERIFY);
    bytes.push(OP_CHECKSIG);
    Script::from(bytes)
}

/// Create a P2PKH signer using mainnet parameters.
///
/// A `sighash_type` with the FORKID bit signs the fork-id digest; without
/// it the legacy digest is signed.
pub fn unlock(private_key: PrivateKey, sighash_type: SigHashType) -> P2PKH {
    P2PKH {
        private_key,
        sighash_type,
        chain_params: ChainParams::mainnet(),
    }
}

/// P2PKH signing template.
///
/// Produces signature scripts of the form
/// `<DER_signature + sighash_byte> <compressed_pubkey>`.
pub struct P2PKH {
    private_key: PrivateKey,
    sighash_type: SigHashType,
    chain_params: ChainParams,
}

impl P2PKH {
    /// Use `params` for the fork id committed to by fork-id signatures.
    pub fn with_chain_params(mut self, params: ChainParams) -> Self {
        self.chain_params = params;
        self
    }
}

impl UnlockingScriptTemplate for P2PKH {
    /// Signs with RFC6979 deterministic nonces, so the same inputs always
    /// produce the same script.
    fn sign(
        &self,
        tx: &Transaction,
        input_index: usize,
        prev_output: &TxOut,
    ) -> Result<Script, TransactionError> {
        if input_index >= tx.inputs.len() {
            return Err(TransactionError::SigningError(format!(
                "input index {} out of range (tx has {} inputs)",
                input_index,
                tx.inputs.len()
            )));
        }

        let digest = sighash::signature_hash(
            tx,
            input_index,
            &prev_output.script_pubkey,
            prev_output.value,
            self.sighash_type,
            ScriptFlags::ENABLE_SIGHASH_FORKID,
            &self.chain_params,
        );
        debug!("signing input {} with {}", input_index, self.sighash_type);

        let signature = self.private_key.sign(digest.as_bytes());
        let pub_key_bytes = self.private_key.pub_key().to_compressed();

        let mut sig_buf = signature.to_der();
        sig_buf.push(self.sighash_type.to_byte());

        let mut script = Script::new();
        script.append_push_data(&sig_buf)?;
        script.append_push_data(&pub_key_bytes)?;
        Ok(script)
    }
}
