//! Hashing and signature operations.
//!
//! Signature and public key encodings are checked here, under the active
//! flags, before the [`SignatureChecker`](super::checker::SignatureChecker)
//! is asked to verify anything.

use ledger_primitives::{ecdsa, hash};

use crate::Script;

use super::error::{InterpreterError, ScriptError};
use super::evaluator::Evaluator;
use super::flags::ScriptFlags;

pub(crate) const SIGHASH_FORKID: u8 = 0x40;
pub(crate) const SIGHASH_ANYONECANPAY: u8 = 0x80;

pub(crate) enum HashType {
    Ripemd160,
    Sha1,
    Sha256,
    Hash160,
    Hash256,
}

/// Strict DER check (BIP66) of a signature without its sighash byte.
///
/// Returns the offset and length of S on success.
fn parse_der_signature(sig: &[u8]) -> Option<(usize, usize)> {
    let sig_len = sig.len();
    if !(8..=72).contains(&sig_len) || sig[0] != 0x30 || sig[1] as usize != sig_len - 2 {
        return None;
    }

    let r_len = sig[3] as usize;
    let s_type_offset = 4 + r_len;
    let s_len_offset = s_type_offset + 1;
    if s_len_offset >= sig_len {
        return None;
    }
    let s_offset = s_len_offset + 1;
    let s_len = sig[s_len_offset] as usize;
    if s_offset + s_len != sig_len {
        return None;
    }

    if sig[2] != 0x02 || r_len == 0 || sig[4] & 0x80 != 0 {
        return None;
    }
    if r_len > 1 && sig[4] == 0x00 && sig[5] & 0x80 == 0 {
        return None;
    }

    if sig[s_type_offset] != 0x02 || s_len == 0 || sig[s_offset] & 0x80 != 0 {
        return None;
    }
    if s_len > 1 && sig[s_offset] == 0x00 && sig[s_offset + 1] & 0x80 == 0 {
        return None;
    }
    Some((s_offset, s_len))
}

/// Whether a big-endian S value is at most half the curve order.
fn s_is_low(s: &[u8]) -> bool {
    let first = s.iter().position(|&b| b != 0).unwrap_or(s.len());
    let s = &s[first..];
    if s.len() > 32 {
        return false;
    }
    let mut padded = [0u8; 32];
    padded[32 - s.len()..].copy_from_slice(s);
    ecdsa::is_low_s(&padded)
}

impl Evaluator<'_> {
    pub(crate) fn op_hash(&mut self, hash_type: HashType) -> Result<(), InterpreterError> {
        let buf = self.dstack.pop_byte_array()?;
        let digest = match hash_type {
            HashType::Ripemd160 => hash::ripemd160(&buf).to_vec(),
            HashType::Sha1 => hash::sha1(&buf).to_vec(),
            HashType::Sha256 => hash::sha256(&buf).to_vec(),
            HashType::Hash160 => hash::hash160(&buf).to_vec(),
            HashType::Hash256 => hash::sha256d(&buf).to_vec(),
        };
        self.dstack.push_byte_array(digest);
        Ok(())
    }

    /// The part of `script` after the last executed OP_CODESEPARATOR.
    fn script_code(&self, script: &Script) -> Script {
        Script::from_bytes(script.to_bytes().get(self.code_start..).unwrap_or(&[]))
    }

    fn uses_forkid(&self, full_sig: &[u8]) -> bool {
        self.has_flag(ScriptFlags::ENABLE_SIGHASH_FORKID)
            && full_sig.last().map_or(false, |&b| b & SIGHASH_FORKID != 0)
    }

    /// Remove `full_sig` and code separators from a legacy script code.
    fn cleanup_script_code(&self, script_code: Script, full_sig: &[u8]) -> Script {
        if self.uses_forkid(full_sig) {
            return script_code;
        }
        script_code.find_and_delete(full_sig).remove_codeseparators()
    }

    pub(crate) fn op_checksig(&mut self, script: &Script) -> Result<(), InterpreterError> {
        let pubkey = self.dstack.pop_byte_array()?;
        let full_sig = self.dstack.pop_byte_array()?;

        self.check_signature_encoding(&full_sig)?;
        self.check_pubkey_encoding(&pubkey)?;

        let script_code = self.cleanup_script_code(self.script_code(script), &full_sig);
        let ok = !full_sig.is_empty()
            && self.checker.check_sig(&full_sig, &pubkey, &script_code, self.flags);

        if !ok && !full_sig.is_empty() && self.has_flag(ScriptFlags::VERIFY_NULLFAIL) {
            return Err(InterpreterError::new(
                ScriptError::SigNullFail,
                "signature not empty on failed checksig",
            ));
        }
        self.dstack.push_bool(ok);
        Ok(())
    }

    /// OP_CHECKMULTISIG: `dummy sig... n_sigs key... n_keys`, keys and
    /// signatures matched in order.
    pub(crate) fn op_checkmultisig(&mut self, script: &Script) -> Result<(), InterpreterError> {
        // Stack positions are counted from the top, starting at 1.
        let mut i: i32 = 1;
        let n_keys = self.dstack.peek_int(i - 1)?;
        if !n_keys.in_range(0, self.cfg.max_pubkeys_per_multisig as i64) {
            return Err(InterpreterError::new(
                ScriptError::PubkeyCount,
                format!(
                    "number of pubkeys {} outside 0..={}",
                    n_keys.to_i64(),
                    self.cfg.max_pubkeys_per_multisig
                ),
            ));
        }
        let mut keys_left = n_keys.to_i32();

        self.num_ops += keys_left as usize;
        if self.num_ops > self.cfg.max_ops {
            return Err(InterpreterError::new(
                ScriptError::OpCount,
                format!("exceeded max operation limit of {}", self.cfg.max_ops),
            ));
        }

        i += 1;
        let mut ikey = i;
        // Cleanup counter: positions at or above this hold keys, not signatures.
        let mut ikey2 = keys_left + 2;
        i += keys_left;

        let n_sigs = self.dstack.peek_int(i - 1)?;
        if !n_sigs.in_range(0, keys_left as i64) {
            return Err(InterpreterError::new(
                ScriptError::SigCount,
                format!("number of signatures {} outside 0..={}", n_sigs.to_i64(), keys_left),
            ));
        }
        let mut sigs_left = n_sigs.to_i32();

        i += 1;
        let mut isig = i;
        i += sigs_left;
        if self.dstack.depth() < i {
            return Err(InterpreterError::new(
                ScriptError::StackUnderflow,
                format!("multisig needs {} stack items, have {}", i, self.dstack.depth()),
            ));
        }

        let mut script_code = self.script_code(script);
        for k in 0..sigs_left {
            let sig = self.dstack.peek_byte_array(isig + k - 1)?;
            script_code = self.cleanup_script_code(script_code, &sig);
        }

        let mut success = true;
        while success && sigs_left > 0 {
            let sig = self.dstack.peek_byte_array(isig - 1)?;
            let pubkey = self.dstack.peek_byte_array(ikey - 1)?;

            self.check_signature_encoding(&sig)?;
            self.check_pubkey_encoding(&pubkey)?;

            let ok = !sig.is_empty() && self.checker.check_sig(&sig, &pubkey, &script_code, self.flags);
            if ok {
                isig += 1;
                sigs_left -= 1;
            }
            ikey += 1;
            keys_left -= 1;

            if sigs_left > keys_left {
                success = false;
            }
        }

        // Pop keys, signatures and both counts.
        while i > 1 {
            i -= 1;
            if !success
                && self.has_flag(ScriptFlags::VERIFY_NULLFAIL)
                && ikey2 == 0
                && !self.dstack.peek_byte_array(0)?.is_empty()
            {
                return Err(InterpreterError::new(
                    ScriptError::SigNullFail,
                    "not all signatures empty on failed checkmultisig",
                ));
            }
            if ikey2 > 0 {
                ikey2 -= 1;
            }
            self.dstack.pop_byte_array()?;
        }

        let dummy = self.dstack.pop_byte_array()?;
        if self.has_flag(ScriptFlags::VERIFY_NULLDUMMY) && !dummy.is_empty() {
            return Err(InterpreterError::new(
                ScriptError::SigNullDummy,
                format!("multisig dummy argument has length {} instead of 0", dummy.len()),
            ));
        }

        self.dstack.push_bool(success);
        Ok(())
    }

    /// Encoding rules for a signature with its trailing sighash byte.
    pub(crate) fn check_signature_encoding(&self, full_sig: &[u8]) -> Result<(), InterpreterError> {
        let (&hash_type, sig) = match full_sig.split_last() {
            Some(parts) => parts,
            None => return Ok(()),
        };

        if self.has_any(&[
            ScriptFlags::VERIFY_DERSIG,
            ScriptFlags::VERIFY_LOW_S,
            ScriptFlags::VERIFY_STRICTENC,
        ]) {
            let (s_offset, s_len) = parse_der_signature(sig).ok_or_else(|| {
                InterpreterError::new(
                    ScriptError::SigDer,
                    format!("signature {} is not strict DER", hex::encode(sig)),
                )
            })?;
            if self.has_flag(ScriptFlags::VERIFY_LOW_S) && !s_is_low(&sig[s_offset..s_offset + s_len]) {
                return Err(InterpreterError::new(
                    ScriptError::SigHighS,
                    "signature is not canonical due to unnecessarily high S value",
                ));
            }
        }

        if self.has_flag(ScriptFlags::VERIFY_STRICTENC) {
            self.check_hash_type_encoding(hash_type)?;
        }
        Ok(())
    }

    fn check_hash_type_encoding(&self, hash_type: u8) -> Result<(), InterpreterError> {
        let base = hash_type & !(SIGHASH_ANYONECANPAY | SIGHASH_FORKID);
        if !(1..=3).contains(&base) {
            return Err(InterpreterError::new(
                ScriptError::SigHashType,
                format!("invalid hash type 0x{:02x}", hash_type),
            ));
        }

        let has_forkid = hash_type & SIGHASH_FORKID != 0;
        let forkid_enabled = self.has_flag(ScriptFlags::ENABLE_SIGHASH_FORKID);
        if has_forkid && !forkid_enabled {
            return Err(InterpreterError::new(
                ScriptError::IllegalForkId,
                format!("hash type 0x{:02x} uses fork id without the flag", hash_type),
            ));
        }
        if !has_forkid && forkid_enabled {
            return Err(InterpreterError::new(
                ScriptError::MustUseForkId,
                format!("hash type 0x{:02x} is missing the fork id bit", hash_type),
            ));
        }
        Ok(())
    }

    pub(crate) fn check_pubkey_encoding(&self, pubkey: &[u8]) -> Result<(), InterpreterError> {
        let compressed = pubkey.len() == 33 && (pubkey[0] == 0x02 || pubkey[0] == 0x03);
        let uncompressed = pubkey.len() == 65 && pubkey[0] == 0x04;

        if self.has_flag(ScriptFlags::VERIFY_STRICTENC) && !compressed && !uncompressed {
            return Err(InterpreterError::new(
                ScriptError::PubkeyType,
                format!("unsupported public key encoding {}", hex::encode(pubkey)),
            ));
        }
        if self.has_flag(ScriptFlags::VERIFY_COMPRESSED_PUBKEYTYPE) && !compressed {
            return Err(InterpreterError::new(
                ScriptError::NonCompressedPubkey,
                "public key is not compressed",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::checker::NullChecker;

    // DER body of a valid signature (r = 1, s = 1).
    const MIN_DER: [u8; 8] = [0x30, 0x06, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01];

    fn with_flags(flags: ScriptFlags) -> Evaluator<'static> {
        Evaluator::new(flags, &NullChecker)
    }

    #[test]
    fn test_parse_der_signature() {
        assert_eq!(parse_der_signature(&MIN_DER), Some((7, 1)));

        let mut negative_r = MIN_DER;
        negative_r[4] = 0x81;
        assert_eq!(parse_der_signature(&negative_r), None);

        let mut bad_len = MIN_DER;
        bad_len[1] = 0x07;
        assert_eq!(parse_der_signature(&bad_len), None);

        // r = 0x0001 carries a redundant zero byte.
        let padded_r = [0x30, 0x07, 0x02, 0x02, 0x00, 0x01, 0x02, 0x01, 0x01];
        assert_eq!(parse_der_signature(&padded_r), None);

        assert_eq!(parse_der_signature(&MIN_DER[..7]), None);
    }

    #[test]
    fn test_s_is_low() {
        assert!(s_is_low(&[0x01]));
        assert!(s_is_low(&ecdsa::HALF_ORDER));
        assert!(!s_is_low(&ecdsa::CURVE_ORDER));
        let mut padded = vec![0x00];
        padded.extend_from_slice(&ecdsa::HALF_ORDER);
        assert!(s_is_low(&padded));
        assert!(!s_is_low(&[0x01; 33]));
    }

    /// Which error each flag combination reports for a given signature.
    #[test]
    fn test_signature_encoding_rules() {
        let mut high_s = vec![0x30, 0x25, 0x02, 0x01, 0x01, 0x02, 0x20];
        high_s.extend_from_slice(&ecdsa::CURVE_ORDER);
        let last = high_s.len() - 1;
        high_s[last] -= 1;
        high_s[6] = 0x21;
        high_s.insert(7, 0x00);
        high_s[1] = (high_s.len() - 2) as u8;

        let sig = |body: &[u8], hash_type: u8| {
            let mut v = body.to_vec();
            v.push(hash_type);
            v
        };

        let strict = ScriptFlags::VERIFY_STRICTENC;
        let forkid = ScriptFlags::VERIFY_STRICTENC | ScriptFlags::ENABLE_SIGHASH_FORKID;
        let cases: Vec<(Vec<u8>, ScriptFlags, ScriptError)> = vec![
            (vec![], strict, ScriptError::Ok),
            (sig(&MIN_DER, 0x01), strict, ScriptError::Ok),
            (sig(&MIN_DER, 0x81), strict, ScriptError::Ok),
            (sig(&MIN_DER, 0x41), forkid, ScriptError::Ok),
            (sig(&MIN_DER, 0x04), strict, ScriptError::SigHashType),
            (sig(&MIN_DER, 0x00), strict, ScriptError::SigHashType),
            (sig(&MIN_DER, 0x41), strict, ScriptError::IllegalForkId),
            (sig(&MIN_DER, 0x01), forkid, ScriptError::MustUseForkId),
            (sig(&MIN_DER[..7], 0x01), ScriptFlags::VERIFY_DERSIG, ScriptError::SigDer),
            (sig(&MIN_DER, 0x04), ScriptFlags::VERIFY_DERSIG, ScriptError::Ok),
            (sig(&high_s, 0x01), ScriptFlags::VERIFY_DERSIG, ScriptError::Ok),
            (sig(&high_s, 0x01), ScriptFlags::VERIFY_LOW_S, ScriptError::SigHighS),
            (vec![0x01, 0x01], ScriptFlags::NONE, ScriptError::Ok),
        ];
        for (full_sig, flags, expected) in cases {
            let got = match with_flags(flags).check_signature_encoding(&full_sig) {
                Ok(()) => ScriptError::Ok,
                Err(e) => e.code,
            };
            assert_eq!(got, expected, "sig {} flags {:?}", hex::encode(&full_sig), flags);
        }
    }

    #[test]
    fn test_pubkey_encoding_rules() {
        let compressed = {
            let mut k = vec![0x02];
            k.extend_from_slice(&[0x11; 32]);
            k
        };
        let uncompressed = {
            let mut k = vec![0x04];
            k.extend_from_slice(&[0x11; 64]);
            k
        };
        let hybrid = {
            let mut k = vec![0x06];
            k.extend_from_slice(&[0x11; 64]);
            k
        };

        let strict = with_flags(ScriptFlags::VERIFY_STRICTENC);
        assert!(strict.check_pubkey_encoding(&compressed).is_ok());
        assert!(strict.check_pubkey_encoding(&uncompressed).is_ok());
        assert_eq!(
            strict.check_pubkey_encoding(&hybrid).map_err(|e| e.code),
            Err(ScriptError::PubkeyType)
        );

        let comp = with_flags(ScriptFlags::VERIFY_COMPRESSED_PUBKEYTYPE);
        assert!(comp.check_pubkey_encoding(&compressed).is_ok());
        assert_eq!(
            comp.check_pubkey_encoding(&uncompressed).map_err(|e| e.code),
            Err(ScriptError::NonCompressedPubkey)
        );

        assert!(with_flags(ScriptFlags::NONE).check_pubkey_encoding(&[0xff]).is_ok());
    }

    #[test]
    fn test_nullfail_on_failed_checksig() {
        let script = Script::from_asm("OP_CHECKSIG").expect("asm");
        let mut ev = with_flags(ScriptFlags::VERIFY_NULLFAIL);
        ev.set_stack(vec![vec![0x01], vec![0x02]]);
        let err = ev.eval(&script).expect_err("non-empty failing signature");
        assert_eq!(err.code, ScriptError::SigNullFail);

        let mut ev = with_flags(ScriptFlags::VERIFY_NULLFAIL);
        ev.set_stack(vec![vec![], vec![0x02]]);
        ev.eval(&script).expect("empty signature only pushes false");
        assert_eq!(ev.stack(), &[Vec::<u8>::new()]);
    }

    #[test]
    fn test_nullfail_on_failed_checkmultisig() {
        let script = Script::from_asm("OP_CHECKMULTISIG").expect("asm");
        // dummy, sig, 1, key, 1
        let items = |sig: Vec<u8>| vec![vec![], sig, vec![1], vec![0x02], vec![1]];

        let mut ev = with_flags(ScriptFlags::VERIFY_NULLFAIL);
        ev.set_stack(items(vec![0x30]));
        let err = ev.eval(&script).expect_err("non-empty failing signature");
        assert_eq!(err.code, ScriptError::SigNullFail);

        let mut ev = with_flags(ScriptFlags::VERIFY_NULLFAIL);
        ev.set_stack(items(vec![]));
        ev.eval(&script).expect("empty signature fails cleanly");
        assert_eq!(ev.stack(), &[Vec::<u8>::new()]);
    }

    #[test]
    fn test_multisig_counts() {
        let script = Script::from_asm("OP_CHECKMULTISIG").expect("asm");

        let mut ev = with_flags(ScriptFlags::NONE);
        ev.set_stack(vec![vec![], vec![0x15]]);
        assert_eq!(ev.eval(&script).map_err(|e| e.code), Err(ScriptError::PubkeyCount));

        let mut ev = with_flags(ScriptFlags::NONE);
        ev.set_stack(vec![vec![], vec![2], vec![0x02], vec![1]]);
        assert_eq!(ev.eval(&script).map_err(|e| e.code), Err(ScriptError::SigCount));
    }
}
