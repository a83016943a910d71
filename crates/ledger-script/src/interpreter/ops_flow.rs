//! Flow control and lock-time operations.

use crate::opcodes::opcode_to_string;

use super::config::LOCKTIME_NUMBER_LENGTH;
use super::error::{InterpreterError, ScriptError};
use super::evaluator::Evaluator;
use super::flags::ScriptFlags;
use super::scriptnum::ScriptNumber;
use super::stack::{as_bool, Branch};

/// Bit 31 of a sequence operand turns OP_CHECKSEQUENCEVERIFY into a no-op.
const SEQUENCE_LOCKTIME_DISABLE_FLAG: i64 = 1 << 31;

impl Evaluator<'_> {
    pub(crate) fn op_reserved(&self, opcode: u8) -> Result<(), InterpreterError> {
        Err(InterpreterError::new(
            ScriptError::BadOpcode,
            format!("attempt to execute reserved opcode {}", opcode_to_string(opcode)),
        ))
    }

    pub(crate) fn op_upgradable_nop(&self, opcode: u8) -> Result<(), InterpreterError> {
        if self.has_flag(ScriptFlags::VERIFY_DISCOURAGE_UPGRADABLE_NOPS) {
            return Err(InterpreterError::new(
                ScriptError::DiscourageUpgradableNops,
                format!("{} reserved for soft-fork upgrades", opcode_to_string(opcode)),
            ));
        }
        Ok(())
    }

    /// Pop an IF/NOTIF condition, enforcing MINIMALIF when set.
    fn pop_if_bool(&mut self) -> Result<bool, InterpreterError> {
        if !self.has_flag(ScriptFlags::VERIFY_MINIMALIF) {
            return self.dstack.pop_bool();
        }
        let b = self.dstack.pop_byte_array()?;
        if b.len() > 1 {
            return Err(InterpreterError::new(
                ScriptError::MinimalIf,
                format!("conditional has data of length {}", b.len()),
            ));
        }
        if b.len() == 1 && b[0] != 1 {
            return Err(InterpreterError::new(
                ScriptError::MinimalIf,
                format!("conditional operand 0x{:02x} is not 1", b[0]),
            ));
        }
        Ok(as_bool(&b))
    }

    /// OP_IF, or OP_NOTIF when `negate` is set.
    pub(crate) fn op_if(&mut self, negate: bool) -> Result<(), InterpreterError> {
        let branch = if self.cond_stack.is_executing() {
            if self.pop_if_bool()? != negate {
                Branch::Taken
            } else {
                Branch::NotTaken
            }
        } else {
            Branch::Skipped
        };
        self.cond_stack.push(branch);
        Ok(())
    }

    /// Pop the top item and fail with `code` unless it is true.
    pub(crate) fn abstract_verify(&mut self, opcode: u8, code: ScriptError) -> Result<(), InterpreterError> {
        if !self.dstack.pop_bool()? {
            return Err(InterpreterError::new(
                code,
                format!("{} failed", opcode_to_string(opcode)),
            ));
        }
        Ok(())
    }

    /// Decode the top item as a non-negative lock-time operand without popping it.
    fn peek_locktime_operand(&self) -> Result<ScriptNumber, InterpreterError> {
        let so = self.dstack.peek_byte_array(0)?;
        let n = ScriptNumber::from_bytes(&so, LOCKTIME_NUMBER_LENGTH, self.dstack.verify_minimal_data)?;
        if n.is_negative() {
            return Err(InterpreterError::new(
                ScriptError::NegativeLocktime,
                format!("negative lock time: {}", n.to_i64()),
            ));
        }
        Ok(n)
    }

    pub(crate) fn op_check_locktime_verify(&mut self) -> Result<(), InterpreterError> {
        if !self.has_flag(ScriptFlags::VERIFY_CHECKLOCKTIMEVERIFY) {
            return self.op_upgradable_nop(crate::opcodes::OP_CHECKLOCKTIMEVERIFY);
        }
        let lock_time = self.peek_locktime_operand()?;
        if !self.checker.check_lock_time(&lock_time) {
            return Err(InterpreterError::new(
                ScriptError::UnsatisfiedLocktime,
                format!("locktime requirement {} not satisfied", lock_time.to_i64()),
            ));
        }
        Ok(())
    }

    pub(crate) fn op_check_sequence_verify(&mut self) -> Result<(), InterpreterError> {
        if !self.has_flag(ScriptFlags::VERIFY_CHECKSEQUENCEVERIFY) {
            return self.op_upgradable_nop(crate::opcodes::OP_CHECKSEQUENCEVERIFY);
        }
        let sequence = self.peek_locktime_operand()?;
        if sequence.to_i64() & SEQUENCE_LOCKTIME_DISABLE_FLAG != 0 {
            return Ok(());
        }
        if !self.checker.check_sequence(&sequence) {
            return Err(InterpreterError::new(
                ScriptError::UnsatisfiedLocktime,
                format!("sequence requirement {} not satisfied", sequence.to_i64()),
            ));
        }
        Ok(())
    }
}
