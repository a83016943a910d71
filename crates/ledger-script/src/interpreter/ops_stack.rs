//! Stack manipulation operations that need more than a single `Stack` call.

use super::error::InterpreterError;
use super::evaluator::Evaluator;
use super::scriptnum::ScriptNumber;
use super::stack::as_bool;

impl Evaluator<'_> {
    pub(crate) fn op_to_alt_stack(&mut self) -> Result<(), InterpreterError> {
        let data = self.dstack.pop_byte_array()?;
        self.astack.push_byte_array(data);
        Ok(())
    }

    pub(crate) fn op_from_alt_stack(&mut self) -> Result<(), InterpreterError> {
        let data = self.astack.pop_byte_array()?;
        self.dstack.push_byte_array(data);
        Ok(())
    }

    pub(crate) fn op_ifdup(&mut self) -> Result<(), InterpreterError> {
        let so = self.dstack.peek_byte_array(0)?;
        if as_bool(&so) {
            self.dstack.push_byte_array(so);
        }
        Ok(())
    }

    pub(crate) fn op_pick(&mut self) -> Result<(), InterpreterError> {
        let n = self.pop_index()?;
        self.dstack.pick_n(n)
    }

    pub(crate) fn op_roll(&mut self) -> Result<(), InterpreterError> {
        let n = self.pop_index()?;
        self.dstack.roll_n(n)
    }

    /// Pop a PICK/ROLL depth. Out-of-range values map to -1 so the stack
    /// reports them as underflow.
    fn pop_index(&mut self) -> Result<i32, InterpreterError> {
        let n: ScriptNumber = self.dstack.pop_int()?;
        if !n.in_range(0, i32::MAX as i64) {
            return Ok(-1);
        }
        Ok(n.to_i32())
    }
}
