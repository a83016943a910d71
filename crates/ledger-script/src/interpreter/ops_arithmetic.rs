//! Numeric operations. Operands are decoded under the configured number
//! length limit; results are pushed without a size check.

use num_bigint::BigInt;
use num_traits::{One, Signed};

use crate::opcodes::*;

use super::error::{InterpreterError, ScriptError};
use super::evaluator::Evaluator;
use super::scriptnum::ScriptNumber;

fn flag(b: bool) -> BigInt {
    BigInt::from(u8::from(b))
}

fn not_numeric(opcode: u8) -> InterpreterError {
    InterpreterError::new(
        ScriptError::BadOpcode,
        format!("{} is not a numeric opcode", opcode_to_string(opcode)),
    )
}

impl Evaluator<'_> {
    /// OP_1ADD, OP_1SUB, OP_NEGATE, OP_ABS, OP_NOT and OP_0NOTEQUAL.
    pub(crate) fn op_unary_numeric(&mut self, opcode: u8) -> Result<(), InterpreterError> {
        let n = self.dstack.pop_int()?;
        let result = match opcode {
            OP_1ADD => n.val + BigInt::one(),
            OP_1SUB => n.val - BigInt::one(),
            OP_NEGATE => -n.val,
            OP_ABS => n.val.abs(),
            OP_NOT => flag(n.is_zero()),
            OP_0NOTEQUAL => flag(!n.is_zero()),
            other => return Err(not_numeric(other)),
        };
        self.dstack.push_int(&ScriptNumber::from(result));
        Ok(())
    }

    /// Two-operand numeric opcodes. `a` is the second item, `b` the top.
    pub(crate) fn op_binary_numeric(&mut self, opcode: u8) -> Result<(), InterpreterError> {
        let b = self.dstack.pop_int()?;
        let a = self.dstack.pop_int()?;
        let result = match opcode {
            OP_ADD => a.val + b.val,
            OP_SUB => a.val - b.val,
            OP_DIV | OP_MOD => {
                let Some((quotient, remainder)) = a.div_rem(&b) else {
                    let (code, what) = if opcode == OP_DIV {
                        (ScriptError::DivByZero, "divide")
                    } else {
                        (ScriptError::ModByZero, "mod")
                    };
                    return Err(InterpreterError::new(code, format!("{} by zero", what)));
                };
                if opcode == OP_DIV {
                    quotient.val
                } else {
                    remainder.val
                }
            }
            OP_BOOLAND => flag(!a.is_zero() && !b.is_zero()),
            OP_BOOLOR => flag(!a.is_zero() || !b.is_zero()),
            OP_NUMEQUAL => flag(a == b),
            OP_NUMNOTEQUAL => flag(a != b),
            OP_LESSTHAN => flag(a < b),
            OP_GREATERTHAN => flag(a > b),
            OP_LESSTHANOREQUAL => flag(a <= b),
            OP_GREATERTHANOREQUAL => flag(a >= b),
            OP_MIN => a.val.min(b.val),
            OP_MAX => a.val.max(b.val),
            other => return Err(not_numeric(other)),
        };
        self.dstack.push_int(&ScriptNumber::from(result));
        Ok(())
    }

    /// `x min max OP_WITHIN` is true when `min <= x < max`.
    pub(crate) fn op_within(&mut self) -> Result<(), InterpreterError> {
        let max = self.dstack.pop_int()?;
        let min = self.dstack.pop_int()?;
        let x = self.dstack.pop_int()?;
        self.dstack.push_bool(min <= x && x < max);
        Ok(())
    }
}
