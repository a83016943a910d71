//! The stack machine that executes one script.
//!
//! An [`Evaluator`] owns the main stack across scripts so that a signature
//! script and a pubkey script can run back to back on the same data. The alt
//! stack, condition stack, op counter and code-separator position are reset
//! at the start of every script.

use log::trace;

use crate::opcodes::*;
use crate::operand::Operand;
use crate::Script;

use super::checker::SignatureChecker;
use super::config::Config;
use super::error::{InterpreterError, ScriptError};
use super::flags::ScriptFlags;
use super::ops_crypto::HashType;
use super::scriptnum::ScriptNumber;
use super::stack::{ConditionStack, Stack};

/// Opcodes that fail wherever they appear, executed or not.
fn is_disabled(op: u8) -> bool {
    matches!(op, OP_INVERT | OP_2MUL | OP_2DIV | OP_MUL | OP_LSHIFT | OP_RSHIFT)
}

fn is_conditional(op: u8) -> bool {
    matches!(op, OP_IF | OP_NOTIF | OP_ELSE | OP_ENDIF)
}

/// Executes scripts against a shared main stack.
pub struct Evaluator<'a> {
    /// The main data stack.
    pub dstack: Stack,
    /// The alternate stack used by OP_TOALTSTACK and OP_FROMALTSTACK.
    pub astack: Stack,
    /// Nested IF/ELSE/ENDIF state of the current script.
    pub cond_stack: ConditionStack,
    /// Limits in force for this evaluator.
    pub cfg: Config,
    /// Verification flags for every script this evaluator runs.
    pub flags: ScriptFlags,
    pub(crate) checker: &'a dyn SignatureChecker,
    /// Byte offset in the current script just past the last executed OP_CODESEPARATOR.
    pub(crate) code_start: usize,
    /// Non-push opcodes counted so far in the current script.
    pub(crate) num_ops: usize,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator with an empty stack and consensus limits.
    pub fn new(flags: ScriptFlags, checker: &'a dyn SignatureChecker) -> Self {
        Self::with_config(flags, checker, Config::default())
    }

    /// Create an evaluator with custom limits.
    pub fn with_config(flags: ScriptFlags, checker: &'a dyn SignatureChecker, cfg: Config) -> Self {
        let minimal = flags.has_flag(ScriptFlags::VERIFY_MINIMALDATA);
        Evaluator {
            dstack: Stack::new(cfg.max_number_length, minimal),
            astack: Stack::new_alt(),
            cond_stack: ConditionStack::new(),
            cfg,
            flags,
            checker,
            code_start: 0,
            num_ops: 0,
        }
    }

    /// Whether every bit of `flag` is active.
    pub fn has_flag(&self, flag: ScriptFlags) -> bool {
        self.flags.has_flag(flag)
    }

    /// Whether any of `flags` is active.
    pub fn has_any(&self, flags: &[ScriptFlags]) -> bool {
        self.flags.has_any(flags)
    }

    /// The main stack, bottom first.
    pub fn stack(&self) -> &[Vec<u8>] {
        &self.dstack.stk
    }

    /// Replace the main stack (last element is the top).
    pub fn set_stack(&mut self, items: Vec<Vec<u8>>) {
        self.dstack.set_stack(items);
    }

    /// Execute `script` on the current main stack.
    ///
    /// Stops at the first failure. Reaching the end with an open IF block is
    /// an `UNBALANCED_CONDITIONAL` failure.
    pub fn eval(&mut self, script: &Script) -> Result<(), InterpreterError> {
        if script.len() > self.cfg.max_script_size {
            return Err(InterpreterError::new(
                ScriptError::ScriptSize,
                format!(
                    "script size {} is larger than the max allowed size {}",
                    script.len(),
                    self.cfg.max_script_size
                ),
            ));
        }

        self.astack.clear();
        self.cond_stack = ConditionStack::new();
        self.code_start = 0;
        self.num_ops = 0;

        let mut operands = script.operands();
        while let Some(next) = operands.next() {
            let op = next.map_err(|e| InterpreterError::new(ScriptError::MalformedPush, e.to_string()))?;
            self.step(&op, script, operands.position())?;

            let combined = self.dstack.depth() as usize + self.astack.depth() as usize;
            if combined > self.cfg.max_stack_size {
                return Err(InterpreterError::new(
                    ScriptError::StackSize,
                    format!(
                        "combined stack size {} > max allowed {}",
                        combined, self.cfg.max_stack_size
                    ),
                ));
            }
        }

        if !self.cond_stack.is_empty() {
            return Err(InterpreterError::new(
                ScriptError::UnbalancedConditional,
                "end of script reached in conditional execution",
            ));
        }
        Ok(())
    }

    /// Execute a single operand. `next_offset` is the byte offset following it.
    fn step(&mut self, op: &Operand<'_>, script: &Script, next_offset: usize) -> Result<(), InterpreterError> {
        if let Some(data) = op.data {
            if data.len() > self.cfg.max_element_size {
                return Err(InterpreterError::new(
                    ScriptError::PushSize,
                    format!(
                        "element size {} exceeds max allowed size {}",
                        data.len(),
                        self.cfg.max_element_size
                    ),
                ));
            }
        }

        if op.opcode > OP_16 {
            self.num_ops += 1;
            if self.num_ops > self.cfg.max_ops {
                return Err(InterpreterError::new(
                    ScriptError::OpCount,
                    format!("exceeded max operation limit of {}", self.cfg.max_ops),
                ));
            }
        }

        if is_disabled(op.opcode) {
            return Err(InterpreterError::new(
                ScriptError::DisabledOpcode,
                format!("attempt to execute disabled opcode {}", opcode_to_string(op.opcode)),
            ));
        }

        if matches!(op.opcode, OP_VERIF | OP_VERNOTIF) {
            return Err(InterpreterError::new(
                ScriptError::BadOpcode,
                format!("attempt to execute reserved opcode {}", opcode_to_string(op.opcode)),
            ));
        }

        let executing = self.cond_stack.is_executing();
        if !executing && !is_conditional(op.opcode) {
            return Ok(());
        }

        trace!("exec {} depth={}", opcode_to_string(op.opcode), self.dstack.depth());

        if let (true, Some(data)) = (op.is_push_data(), op.data) {
            if self.dstack.verify_minimal_data && !op.is_minimal_push() {
                return Err(InterpreterError::new(
                    ScriptError::MinimalData,
                    format!(
                        "data push of {} bytes with opcode {} is not minimal",
                        data.len(),
                        opcode_to_string(op.opcode)
                    ),
                ));
            }
            self.dstack.push_byte_array(data.to_vec());
            return Ok(());
        }

        self.dispatch(op, script, next_offset)
    }

    fn dispatch(&mut self, op: &Operand<'_>, script: &Script, next_offset: usize) -> Result<(), InterpreterError> {
        match op.opcode {
            OP_1NEGATE => {
                self.dstack.push_int(&ScriptNumber::new(-1));
                Ok(())
            }
            OP_1..=OP_16 => {
                self.dstack.push_byte_array(vec![op.opcode - (OP_1 - 1)]);
                Ok(())
            }

            // Flow control
            OP_NOP => Ok(()),
            OP_IF => self.op_if(false),
            OP_NOTIF => self.op_if(true),
            OP_ELSE => self.cond_stack.toggle(),
            OP_ENDIF => self.cond_stack.pop().map(|_| ()),
            OP_VERIFY => self.abstract_verify(op.opcode, ScriptError::Verify),
            OP_RETURN => Err(InterpreterError::new(ScriptError::OpReturn, "script returned early")),
            OP_VER | OP_RESERVED | OP_RESERVED1 | OP_RESERVED2 => self.op_reserved(op.opcode),

            // Locktime
            OP_CHECKLOCKTIMEVERIFY => self.op_check_locktime_verify(),
            OP_CHECKSEQUENCEVERIFY => self.op_check_sequence_verify(),
            OP_NOP1 | OP_NOP4..=OP_NOP10 => self.op_upgradable_nop(op.opcode),

            // Stack
            OP_TOALTSTACK => self.op_to_alt_stack(),
            OP_FROMALTSTACK => self.op_from_alt_stack(),
            OP_2DROP => self.dstack.drop_n(2),
            OP_2DUP => self.dstack.dup_n(2),
            OP_3DUP => self.dstack.dup_n(3),
            OP_2OVER => self.dstack.over_n(2),
            OP_2ROT => self.dstack.rot_n(2),
            OP_2SWAP => self.dstack.swap_n(2),
            OP_IFDUP => self.op_ifdup(),
            OP_DEPTH => {
                let d = self.dstack.depth();
                self.dstack.push_int(&ScriptNumber::new(d as i64));
                Ok(())
            }
            OP_DROP => self.dstack.drop_n(1),
            OP_DUP => self.dstack.dup_n(1),
            OP_NIP => self.dstack.nip_n_discard(1),
            OP_OVER => self.dstack.over_n(1),
            OP_PICK => self.op_pick(),
            OP_ROLL => self.op_roll(),
            OP_ROT => self.dstack.rot_n(1),
            OP_SWAP => self.dstack.swap_n(1),
            OP_TUCK => self.dstack.tuck(),

            // Splice
            OP_CAT => self.op_cat(),
            OP_SPLIT => self.op_split(),
            OP_NUM2BIN => self.op_num2bin(),
            OP_BIN2NUM => self.op_bin2num(),
            OP_SIZE => self.op_size(),

            // Bitwise logic
            OP_AND => self.op_bitwise(|a, b| a & b),
            OP_OR => self.op_bitwise(|a, b| a | b),
            OP_XOR => self.op_bitwise(|a, b| a ^ b),
            OP_EQUAL => self.op_equal(),
            OP_EQUALVERIFY => {
                self.op_equal()?;
                self.abstract_verify(op.opcode, ScriptError::EqualVerify)
            }

            // Arithmetic
            OP_1ADD | OP_1SUB | OP_NEGATE | OP_ABS | OP_NOT | OP_0NOTEQUAL => self.op_unary_numeric(op.opcode),
            OP_ADD | OP_SUB | OP_DIV | OP_MOD | OP_BOOLAND | OP_BOOLOR | OP_NUMEQUAL | OP_NUMNOTEQUAL
            | OP_LESSTHAN | OP_GREATERTHAN | OP_LESSTHANOREQUAL | OP_GREATERTHANOREQUAL | OP_MIN | OP_MAX => {
                self.op_binary_numeric(op.opcode)
            }
            OP_NUMEQUALVERIFY => {
                self.op_binary_numeric(OP_NUMEQUAL)?;
                self.abstract_verify(op.opcode, ScriptError::NumEqualVerify)
            }
            OP_WITHIN => self.op_within(),

            // Crypto
            OP_RIPEMD160 => self.op_hash(HashType::Ripemd160),
            OP_SHA1 => self.op_hash(HashType::Sha1),
            OP_SHA256 => self.op_hash(HashType::Sha256),
            OP_HASH160 => self.op_hash(HashType::Hash160),
            OP_HASH256 => self.op_hash(HashType::Hash256),
            OP_CODESEPARATOR => {
                self.code_start = next_offset;
                Ok(())
            }
            OP_CHECKSIG => self.op_checksig(script),
            OP_CHECKSIGVERIFY => {
                self.op_checksig(script)?;
                self.abstract_verify(op.opcode, ScriptError::CheckSigVerify)
            }
            OP_CHECKMULTISIG => self.op_checkmultisig(script),
            OP_CHECKMULTISIGVERIFY => {
                self.op_checkmultisig(script)?;
                self.abstract_verify(op.opcode, ScriptError::CheckMultisigVerify)
            }

            other => Err(InterpreterError::new(
                ScriptError::BadOpcode,
                format!("attempt to execute invalid opcode {}", opcode_to_string(other)),
            )),
        }
    }
}

/// Evaluate `script` on `stack` in place, as a single standalone step.
///
/// `stack` holds the main stack before and after, bottom first.
pub fn eval_script(
    stack: &mut Vec<Vec<u8>>,
    script: &Script,
    flags: ScriptFlags,
    checker: &dyn SignatureChecker,
) -> Result<(), InterpreterError> {
    let mut evaluator = Evaluator::new(flags, checker);
    evaluator.set_stack(std::mem::take(stack));
    let result = evaluator.eval(script);
    *stack = std::mem::take(&mut evaluator.dstack.stk);
    result
}

#[cfg(test)]
mod tests {
    //! Opcode-level behaviour of the evaluator, run through `eval_script`
    //! with the null checker.

    use super::*;
    use crate::interpreter::checker::NullChecker;
    use crate::interpreter::stack::as_bool;

    fn run(asm: &str, flags: ScriptFlags) -> Result<Vec<Vec<u8>>, InterpreterError> {
        let script = Script::from_asm(asm).expect("valid ASM");
        let mut stack = Vec::new();
        eval_script(&mut stack, &script, flags, &NullChecker)?;
        Ok(stack)
    }

    fn top_is_true(asm: &str) -> bool {
        match run(asm, ScriptFlags::NONE) {
            Ok(stack) => stack.last().map_or(false, |t| as_bool(t)),
            Err(_) => false,
        }
    }

    fn code(asm: &str, flags: ScriptFlags) -> ScriptError {
        match run(asm, flags) {
            Ok(_) => ScriptError::Ok,
            Err(e) => e.code,
        }
    }

    /// Scripts that must leave a true value on top.
    #[test]
    fn test_truthy_scripts() {
        let cases = [
            "OP_2 OP_3 OP_ADD OP_5 OP_EQUAL",
            "OP_5 OP_3 OP_SUB OP_2 OP_EQUAL",
            "OP_1 OP_NEGATE OP_1NEGATE OP_EQUAL",
            "OP_1NEGATE OP_ABS OP_1 OP_EQUAL",
            "OP_0 OP_NOT",
            "OP_3 OP_2 OP_5 OP_WITHIN",
            "OP_6 OP_3 OP_DIV OP_2 OP_EQUAL",
            "OP_7 OP_3 OP_MOD OP_1 OP_EQUAL",
            "OP_1 OP_1 OP_BOOLAND",
            "OP_0 OP_1 OP_BOOLOR",
            "OP_4 OP_4 OP_NUMEQUAL",
            "OP_2 OP_3 OP_LESSTHAN",
            "OP_3 OP_2 OP_GREATERTHAN",
            "OP_3 OP_5 OP_MIN OP_3 OP_EQUAL",
            "OP_3 OP_5 OP_MAX OP_5 OP_EQUAL",
            "OP_1 OP_2 OP_3 OP_DEPTH OP_3 OP_EQUAL",
            "010203 OP_SIZE OP_3 OP_EQUALVERIFY OP_DROP OP_1",
            "0102 0304 OP_CAT 01020304 OP_EQUAL",
            "01020304 OP_2 OP_SPLIT 0304 OP_EQUALVERIFY 0102 OP_EQUAL",
            "OP_2 OP_4 OP_NUM2BIN 02000000 OP_EQUAL",
            "02000080 OP_BIN2NUM OP_2 OP_NEGATE OP_EQUAL",
            "0f 03 OP_AND 03 OP_EQUAL",
            "0c 03 OP_OR 0f OP_EQUAL",
            "0f 03 OP_XOR 0c OP_EQUAL",
            "OP_1 OP_2 OP_3 OP_2 OP_PICK OP_1 OP_EQUAL",
            "OP_1 OP_2 OP_3 OP_2 OP_ROLL OP_1 OP_EQUALVERIFY OP_DEPTH OP_2 OP_EQUAL",
            "OP_1 OP_2 OP_3 OP_ROT OP_1 OP_EQUAL",
            "OP_1 OP_2 OP_TUCK OP_DEPTH OP_3 OP_EQUAL",
            "OP_1 OP_2 OP_2DUP OP_DEPTH OP_4 OP_EQUAL",
            "OP_7 OP_TOALTSTACK OP_1 OP_FROMALTSTACK OP_7 OP_EQUAL",
            "OP_1 OP_IFDUP OP_DEPTH OP_2 OP_EQUAL",
            "OP_1 OP_IF OP_2 OP_ELSE OP_3 OP_ENDIF OP_2 OP_EQUAL",
            "OP_0 OP_NOTIF OP_2 OP_ELSE OP_3 OP_ENDIF OP_2 OP_EQUAL",
            "OP_1 OP_IF OP_0 OP_IF OP_RETURN OP_ELSE OP_1 OP_ENDIF OP_ENDIF",
            "OP_0 OP_IF OP_RETURN OP_VER OP_RESERVED OP_ENDIF OP_1",
            "00 OP_SHA256 6e340b9cffb37a989ca544e6bb780a2c78901d3fb33738768511a30617afa01d OP_EQUAL",
            "OP_0 OP_HASH160 b472a266d0bd89c13706a4132ccfb16f7c3b9fcb OP_EQUAL",
            "OP_NOP OP_NOP1 OP_NOP10 OP_1",
        ];
        for asm in cases {
            assert!(top_is_true(asm), "expected true: {}", asm);
        }
    }

    /// Failure codes for malformed or failing scripts.
    #[test]
    fn test_failure_codes() {
        let none = ScriptFlags::NONE;
        let cases = [
            ("OP_1 OP_0 OP_DIV", none, ScriptError::DivByZero),
            ("OP_1 OP_0 OP_MOD", none, ScriptError::ModByZero),
            ("OP_0 OP_VERIFY", none, ScriptError::Verify),
            ("OP_1 OP_2 OP_EQUALVERIFY", none, ScriptError::EqualVerify),
            ("OP_1 OP_2 OP_NUMEQUALVERIFY", none, ScriptError::NumEqualVerify),
            ("OP_1 OP_IF OP_1", none, ScriptError::UnbalancedConditional),
            ("OP_ENDIF", none, ScriptError::UnbalancedConditional),
            ("OP_1 OP_IF OP_ELSE OP_ELSE OP_ENDIF", none, ScriptError::UnbalancedConditional),
            ("OP_1 OP_RETURN", none, ScriptError::OpReturn),
            ("OP_1 OP_VER", none, ScriptError::BadOpcode),
            ("OP_0 OP_IF OP_VERIF OP_ENDIF", none, ScriptError::BadOpcode),
            ("OP_0 OP_IF OP_MUL OP_ENDIF", none, ScriptError::DisabledOpcode),
            ("OP_1 OP_2 OP_LSHIFT", none, ScriptError::DisabledOpcode),
            ("OP_DROP", none, ScriptError::StackUnderflow),
            ("OP_1 OP_ADD", none, ScriptError::StackUnderflow),
            ("OP_FROMALTSTACK", none, ScriptError::InvalidAltstackOperation),
            ("OP_1 OP_5 OP_PICK", none, ScriptError::StackUnderflow),
            ("01 OP_2 OP_SPLIT", none, ScriptError::InvalidSplitRange),
            ("0102 03 OP_AND", none, ScriptError::InvalidOperandSize),
            ("0102 OP_1 OP_NUM2BIN", none, ScriptError::ImpossibleEncoding),
            ("0000000001 OP_1ADD", none, ScriptError::ScriptNumOverflow),
            ("OP_NOP1", ScriptFlags::VERIFY_DISCOURAGE_UPGRADABLE_NOPS, ScriptError::DiscourageUpgradableNops),
            ("0100 OP_1ADD", ScriptFlags::VERIFY_MINIMALDATA, ScriptError::ScriptNumMinEncode),
            ("05", ScriptFlags::VERIFY_MINIMALDATA, ScriptError::MinimalData),
            ("02 OP_IF OP_ENDIF", ScriptFlags::VERIFY_MINIMALIF, ScriptError::MinimalIf),
            ("OP_1 OP_CHECKLOCKTIMEVERIFY", ScriptFlags::VERIFY_CHECKLOCKTIMEVERIFY, ScriptError::UnsatisfiedLocktime),
            ("OP_1NEGATE OP_CHECKLOCKTIMEVERIFY", ScriptFlags::VERIFY_CHECKLOCKTIMEVERIFY, ScriptError::NegativeLocktime),
            ("OP_1 OP_CHECKSEQUENCEVERIFY", ScriptFlags::VERIFY_CHECKSEQUENCEVERIFY, ScriptError::UnsatisfiedLocktime),
        ];
        for (asm, flags, expected) in cases {
            assert_eq!(code(asm, flags), expected, "script: {}", asm);
        }
    }

    /// Without their flags, CLTV and CSV behave as NOPs.
    #[test]
    fn test_locktime_opcodes_as_nops() {
        assert!(top_is_true("OP_1 OP_CHECKLOCKTIMEVERIFY"));
        assert!(top_is_true("OP_1 OP_CHECKSEQUENCEVERIFY"));
    }

    /// A sequence operand with the disable bit set passes without consulting the checker.
    #[test]
    fn test_csv_disable_bit() {
        let stack = run("0000008000 OP_CHECKSEQUENCEVERIFY", ScriptFlags::VERIFY_CHECKSEQUENCEVERIFY)
            .expect("disabled sequence lock passes");
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_checksig_with_null_checker_pushes_false() {
        let stack = run("OP_0 OP_0 OP_CHECKSIG", ScriptFlags::NONE).expect("empty sig evaluates");
        assert_eq!(stack, vec![Vec::<u8>::new()]);
        assert_eq!(
            code("OP_0 OP_0 OP_CHECKSIGVERIFY", ScriptFlags::NONE),
            ScriptError::CheckSigVerify
        );
    }

    /// Zero-of-zero multisig succeeds and consumes the dummy element.
    #[test]
    fn test_checkmultisig_zero_of_zero() {
        let stack = run("OP_0 OP_0 OP_0 OP_CHECKMULTISIG", ScriptFlags::NONE).expect("0-of-0");
        assert_eq!(stack, vec![vec![1u8]]);
        assert_eq!(
            code("OP_1 OP_0 OP_0 OP_CHECKMULTISIG", ScriptFlags::VERIFY_NULLDUMMY),
            ScriptError::SigNullDummy
        );
        assert_eq!(code("OP_0 OP_0 OP_CHECKMULTISIG", ScriptFlags::NONE), ScriptError::StackUnderflow);
    }

    #[test]
    fn test_op_count_limit() {
        let asm = vec!["OP_NOP"; 501].join(" ");
        assert_eq!(code(&asm, ScriptFlags::NONE), ScriptError::OpCount);
        let asm = vec!["OP_NOP"; 500].join(" ");
        assert_eq!(code(&asm, ScriptFlags::NONE), ScriptError::Ok);
    }

    /// Pushes do not count toward the op limit, but multisig key counts do.
    #[test]
    fn test_multisig_keys_count_as_ops() {
        let asm = format!("{} OP_0 OP_0 OP_16 OP_CHECKMULTISIG", vec!["OP_NOP"; 485].join(" "));
        assert_eq!(code(&asm, ScriptFlags::NONE), ScriptError::OpCount);
    }

    #[test]
    fn test_push_size_limit() {
        let mut script = Script::new();
        script.append_push_data(&[0u8; 521]).expect("push");
        let mut stack = Vec::new();
        let err = eval_script(&mut stack, &script, ScriptFlags::NONE, &NullChecker)
            .expect_err("oversized push");
        assert_eq!(err.code, ScriptError::PushSize);
    }

    #[test]
    fn test_stack_size_limit() {
        let asm = vec!["OP_1"; 1001].join(" ");
        assert_eq!(code(&asm, ScriptFlags::NONE), ScriptError::StackSize);
    }

    #[test]
    fn test_script_size_limit() {
        let script = Script::from_bytes(&vec![OP_NOP; 10_001]);
        let mut stack = Vec::new();
        let err = eval_script(&mut stack, &script, ScriptFlags::NONE, &NullChecker)
            .expect_err("oversized script");
        assert_eq!(err.code, ScriptError::ScriptSize);
    }

    #[test]
    fn test_truncated_push_is_malformed() {
        let script = Script::from_bytes(&[OP_1, 0x05, 0x01]);
        let mut stack = Vec::new();
        let err = eval_script(&mut stack, &script, ScriptFlags::NONE, &NullChecker)
            .expect_err("truncated");
        assert_eq!(err.code, ScriptError::MalformedPush);
        assert_eq!(stack, vec![vec![1u8]], "work before the bad push is kept");
    }

    /// The main stack carries over between scripts; the alt stack does not.
    #[test]
    fn test_stack_carries_between_scripts() {
        let mut ev = Evaluator::new(ScriptFlags::NONE, &NullChecker);
        ev.eval(&Script::from_asm("OP_1 OP_2 OP_TOALTSTACK").expect("asm")).expect("first");
        assert_eq!(ev.astack.depth(), 1);
        ev.eval(&Script::from_asm("OP_DUP").expect("asm")).expect("second");
        assert_eq!(ev.stack(), &[vec![1u8], vec![1u8]]);
        assert_eq!(ev.astack.depth(), 0);
    }

    #[test]
    fn test_codeseparator_sets_code_start() {
        let script = Script::from_asm("OP_1 OP_CODESEPARATOR OP_2").expect("asm");
        let mut ev = Evaluator::new(ScriptFlags::NONE, &NullChecker);
        ev.eval(&script).expect("runs");
        assert_eq!(ev.code_start, 2);
    }
}
