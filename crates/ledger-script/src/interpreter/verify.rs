//! Full input verification: signature script, pubkey script and, for
//! pay-to-script-hash outputs, the redeem script.

use log::debug;

use crate::Script;

use super::checker::SignatureChecker;
use super::error::{InterpreterError, ScriptError};
use super::evaluator::Evaluator;
use super::flags::ScriptFlags;
use super::stack::as_bool;

fn require_true_top(ev: &Evaluator<'_>, phase: &str) -> Result<(), InterpreterError> {
    match ev.stack().last() {
        None => Err(InterpreterError::new(
            ScriptError::EvalFalse,
            format!("stack empty after {}", phase),
        )),
        Some(top) if !as_bool(top) => Err(InterpreterError::new(
            ScriptError::EvalFalse,
            format!("false stack entry after {}", phase),
        )),
        Some(_) => Ok(()),
    }
}

/// Verify `script_sig` against `script_pubkey` under `flags`.
///
/// Both scripts run on one shared stack. Success requires a non-empty stack
/// with a true top element, after the redeem script as well when the output
/// is pay-to-script-hash and `VERIFY_P2SH` is set.
pub fn verify_script(
    script_sig: &Script,
    script_pubkey: &Script,
    flags: ScriptFlags,
    checker: &dyn SignatureChecker,
) -> Result<(), InterpreterError> {
    let result = run(script_sig, script_pubkey, flags, checker);
    if let Err(e) = &result {
        debug!("script verification failed: {}", e);
    }
    result
}

/// [`verify_script`] reduced to a success flag and an error code.
///
/// The code is `ScriptError::Ok` exactly when the flag is true.
pub fn verify_script_result(
    script_sig: &Script,
    script_pubkey: &Script,
    flags: ScriptFlags,
    checker: &dyn SignatureChecker,
) -> (bool, ScriptError) {
    match verify_script(script_sig, script_pubkey, flags, checker) {
        Ok(()) => (true, ScriptError::Ok),
        Err(e) => (false, e.code),
    }
}

fn run(
    script_sig: &Script,
    script_pubkey: &Script,
    flags: ScriptFlags,
    checker: &dyn SignatureChecker,
) -> Result<(), InterpreterError> {
    if flags.has_flag(ScriptFlags::VERIFY_CLEANSTACK) && !flags.has_flag(ScriptFlags::VERIFY_P2SH) {
        return Err(InterpreterError::new(
            ScriptError::InvalidFlags,
            "VERIFY_CLEANSTACK requires VERIFY_P2SH",
        ));
    }

    if flags.has_flag(ScriptFlags::VERIFY_SIGPUSHONLY) && !script_sig.is_push_only() {
        return Err(InterpreterError::new(
            ScriptError::SigPushOnly,
            "signature script is not push only",
        ));
    }

    let mut ev = Evaluator::new(flags, checker);

    debug!("evaluating signature script ({} bytes)", script_sig.len());
    ev.eval(script_sig)?;
    let saved = ev.stack().to_vec();

    debug!("evaluating pubkey script ({} bytes)", script_pubkey.len());
    ev.eval(script_pubkey)?;
    require_true_top(&ev, "pubkey script")?;

    if flags.has_flag(ScriptFlags::VERIFY_P2SH) && script_pubkey.is_p2sh() {
        if !script_sig.is_push_only() {
            return Err(InterpreterError::new(
                ScriptError::SigPushOnly,
                "pay-to-script-hash signature script is not push only",
            ));
        }

        ev.set_stack(saved);
        // The pubkey script already checked the hash, so the stack is non-empty.
        let redeem = Script::from(ev.dstack.pop_byte_array()?);
        debug!("evaluating redeem script ({} bytes)", redeem.len());
        ev.eval(&redeem)?;
        require_true_top(&ev, "redeem script")?;
    }

    if flags.has_flag(ScriptFlags::VERIFY_CLEANSTACK) && ev.stack().len() != 1 {
        return Err(InterpreterError::new(
            ScriptError::CleanStack,
            format!("stack has {} elements after execution, expected 1", ev.stack().len()),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    //! End-to-end runs of `verify_script` with scripts that need no
    //! transaction context.

    use super::*;
    use crate::interpreter::checker::NullChecker;
    use crate::opcodes::*;

    fn verify(sig_asm: &str, pub_asm: &str, flags: ScriptFlags) -> (bool, ScriptError) {
        let sig = Script::from_asm(sig_asm).expect("valid scriptSig ASM");
        let pubkey = Script::from_asm(pub_asm).expect("valid scriptPubKey ASM");
        verify_script_result(&sig, &pubkey, flags, &NullChecker)
    }

    /// Reference vectors for scripts that need no signature checks.
    #[test]
    fn test_trivial_vectors() {
        let cases = [
            ("OP_1", "OP_1", true),
            ("OP_1", "OP_0", false),
            ("OP_0", "OP_1", true),
            ("", "OP_DEPTH OP_0 OP_EQUAL", true),
            ("OP_1 OP_2", "OP_2 OP_EQUALVERIFY OP_1 OP_EQUAL", true),
            ("OP_0", "OP_IF OP_VER OP_ELSE OP_1 OP_ENDIF", true),
        ];
        for (sig, pubkey, expected) in cases {
            let (ok, code) = verify(sig, pubkey, ScriptFlags::NONE);
            assert_eq!(ok, expected, "({:?}, {:?}) -> {}", sig, pubkey, code);
            assert_eq!(ok, code == ScriptError::Ok, "flag and code agree for {:?}", pubkey);
        }
    }

    #[test]
    fn test_eval_false() {
        assert_eq!(verify("", "", ScriptFlags::NONE), (false, ScriptError::EvalFalse));
        assert_eq!(verify("OP_1", "OP_0", ScriptFlags::NONE), (false, ScriptError::EvalFalse));
        assert_eq!(verify("OP_1", "OP_DROP", ScriptFlags::NONE), (false, ScriptError::EvalFalse));
    }

    #[test]
    fn test_errors_propagate_from_each_script() {
        assert_eq!(verify("OP_RETURN", "OP_1", ScriptFlags::NONE), (false, ScriptError::OpReturn));
        assert_eq!(verify("OP_0", "OP_VERIFY", ScriptFlags::NONE), (false, ScriptError::Verify));
        assert_eq!(verify("OP_1", "OP_IF", ScriptFlags::NONE), (false, ScriptError::UnbalancedConditional));
    }

    /// An IF opened in the signature script cannot be closed by the pubkey script.
    #[test]
    fn test_conditions_do_not_span_scripts() {
        assert_eq!(
            verify("OP_1 OP_IF", "OP_ENDIF OP_1", ScriptFlags::NONE),
            (false, ScriptError::UnbalancedConditional)
        );
    }

    #[test]
    fn test_sigpushonly() {
        let flags = ScriptFlags::VERIFY_SIGPUSHONLY;
        assert_eq!(verify("OP_1 OP_DUP", "OP_EQUAL", flags), (false, ScriptError::SigPushOnly));
        assert_eq!(verify("OP_1 OP_1", "OP_EQUAL", flags), (true, ScriptError::Ok));
        assert_eq!(verify("OP_1 OP_DUP", "OP_EQUAL", ScriptFlags::NONE), (true, ScriptError::Ok));
    }

    #[test]
    fn test_cleanstack() {
        let flags = ScriptFlags::VERIFY_CLEANSTACK | ScriptFlags::VERIFY_P2SH;
        assert_eq!(verify("OP_1", "OP_1", ScriptFlags::VERIFY_CLEANSTACK), (false, ScriptError::InvalidFlags));
        assert_eq!(verify("OP_1", "OP_1", flags), (false, ScriptError::CleanStack));
        assert_eq!(verify("", "OP_1", flags), (true, ScriptError::Ok));
    }

    fn p2sh_pair(redeem: &Script, extra_sig_asm: &str) -> (Script, Script) {
        let mut sig = Script::from_asm(extra_sig_asm).expect("asm");
        sig.append_push_data(redeem.to_bytes()).expect("push redeem");
        (sig, redeem.to_p2sh())
    }

    #[test]
    fn test_p2sh_redeem_script_runs() {
        let redeem = Script::from_asm("OP_2 OP_EQUAL").expect("asm");
        let (sig, pubkey) = p2sh_pair(&redeem, "OP_2");
        assert!(pubkey.is_p2sh());

        let p2sh = ScriptFlags::VERIFY_P2SH;
        assert_eq!(verify_script_result(&sig, &pubkey, p2sh, &NullChecker), (true, ScriptError::Ok));

        let (bad_sig, _) = p2sh_pair(&redeem, "OP_3");
        assert_eq!(
            verify_script_result(&bad_sig, &pubkey, p2sh, &NullChecker),
            (false, ScriptError::EvalFalse)
        );
        // Without the flag only the hash comparison runs.
        assert_eq!(
            verify_script_result(&bad_sig, &pubkey, ScriptFlags::NONE, &NullChecker),
            (true, ScriptError::Ok)
        );
    }

    #[test]
    fn test_p2sh_requires_push_only() {
        let redeem = Script::from_asm("OP_1").expect("asm");
        let mut sig = Script::new();
        sig.append_opcodes(&[OP_NOP]).expect("opcode");
        sig.append_push_data(redeem.to_bytes()).expect("push redeem");
        let pubkey = redeem.to_p2sh();
        assert_eq!(
            verify_script_result(&sig, &pubkey, ScriptFlags::VERIFY_P2SH, &NullChecker),
            (false, ScriptError::SigPushOnly)
        );
    }

    #[test]
    fn test_p2sh_cleanstack() {
        let redeem = Script::from_asm("OP_1").expect("asm");
        let flags = ScriptFlags::VERIFY_P2SH | ScriptFlags::VERIFY_CLEANSTACK;

        let (sig, pubkey) = p2sh_pair(&redeem, "");
        assert_eq!(verify_script_result(&sig, &pubkey, flags, &NullChecker), (true, ScriptError::Ok));

        let (sig, pubkey) = p2sh_pair(&redeem, "OP_1");
        assert_eq!(
            verify_script_result(&sig, &pubkey, flags, &NullChecker),
            (false, ScriptError::CleanStack)
        );
    }

    #[test]
    fn test_hash_path_of_p2pkh() {
        let pubkey = vec![0x04; 33];
        let pkh = ledger_primitives::hash::hash160(&pubkey);
        let mut sig = Script::new();
        sig.append_push_data(&pubkey).expect("push");
        let lock = Script::from_asm(&format!("OP_DUP OP_HASH160 {} OP_EQUALVERIFY OP_1", hex::encode(pkh)))
            .expect("asm");
        assert_eq!(verify_script_result(&sig, &lock, ScriptFlags::NONE, &NullChecker), (true, ScriptError::Ok));
    }

    #[test]
    fn test_same_inputs_same_result() {
        let sig = Script::from_asm("OP_1 OP_2").expect("asm");
        let pubkey = Script::from_asm("OP_ADD OP_3 OP_EQUAL").expect("asm");
        let first = verify_script_result(&sig, &pubkey, ScriptFlags::STANDARD, &NullChecker);
        let second = verify_script_result(&sig, &pubkey, ScriptFlags::STANDARD, &NullChecker);
        assert_eq!(first, second);
    }
}
