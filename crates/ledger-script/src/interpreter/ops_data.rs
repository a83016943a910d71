//! Splice, bitwise and equality operations.

use super::error::{InterpreterError, ScriptError};
use super::evaluator::Evaluator;
use super::scriptnum::{minimally_encode, ScriptNumber};

impl Evaluator<'_> {
    pub(crate) fn op_cat(&mut self) -> Result<(), InterpreterError> {
        let b = self.dstack.pop_byte_array()?;
        let mut c = self.dstack.pop_byte_array()?;
        if c.len() + b.len() > self.cfg.max_element_size {
            return Err(InterpreterError::new(
                ScriptError::PushSize,
                format!(
                    "concatenated size {} exceeds max allowed size {}",
                    c.len() + b.len(),
                    self.cfg.max_element_size
                ),
            ));
        }
        c.extend_from_slice(&b);
        self.dstack.push_byte_array(c);
        Ok(())
    }

    pub(crate) fn op_split(&mut self) -> Result<(), InterpreterError> {
        let n = self.dstack.pop_int()?;
        let mut data = self.dstack.pop_byte_array()?;
        if !n.in_range(0, data.len() as i64) {
            return Err(InterpreterError::new(
                ScriptError::InvalidSplitRange,
                format!("split position {} outside 0..={}", n.to_i64(), data.len()),
            ));
        }
        let tail = data.split_off(n.to_i64() as usize);
        self.dstack.push_byte_array(data);
        self.dstack.push_byte_array(tail);
        Ok(())
    }

    pub(crate) fn op_num2bin(&mut self) -> Result<(), InterpreterError> {
        let n = self.dstack.pop_int()?;
        if !n.in_range(0, self.cfg.max_element_size as i64) {
            return Err(InterpreterError::new(
                ScriptError::PushSize,
                format!(
                    "requested size {} outside 0..={}",
                    n.to_i64(),
                    self.cfg.max_element_size
                ),
            ));
        }
        let size = n.to_i64() as usize;

        let raw = self.dstack.pop_byte_array()?;
        let mut b = minimally_encode(&raw);
        if b.len() > size {
            return Err(InterpreterError::new(
                ScriptError::ImpossibleEncoding,
                format!("value needs {} bytes, cannot fit into {}", b.len(), size),
            ));
        }

        if b.len() < size {
            let mut signbit = 0x00;
            if let Some(last) = b.last_mut() {
                signbit = *last & 0x80;
                *last &= 0x7f;
            }
            b.resize(size - 1, 0x00);
            b.push(signbit);
        }
        self.dstack.push_byte_array(b);
        Ok(())
    }

    pub(crate) fn op_bin2num(&mut self) -> Result<(), InterpreterError> {
        let a = self.dstack.pop_byte_array()?;
        let b = minimally_encode(&a);
        if b.len() > self.cfg.max_number_length {
            return Err(InterpreterError::new(
                ScriptError::InvalidNumberRange,
                format!(
                    "script numbers are limited to {} bytes, got {}",
                    self.cfg.max_number_length,
                    b.len()
                ),
            ));
        }
        self.dstack.push_byte_array(b);
        Ok(())
    }

    pub(crate) fn op_size(&mut self) -> Result<(), InterpreterError> {
        let so = self.dstack.peek_byte_array(0)?;
        self.dstack.push_int(&ScriptNumber::new(so.len() as i64));
        Ok(())
    }

    pub(crate) fn op_bitwise(&mut self, f: fn(u8, u8) -> u8) -> Result<(), InterpreterError> {
        let a = self.dstack.pop_byte_array()?;
        let b = self.dstack.pop_byte_array()?;
        if a.len() != b.len() {
            return Err(InterpreterError::new(
                ScriptError::InvalidOperandSize,
                format!("operands have lengths {} and {}", b.len(), a.len()),
            ));
        }
        let c: Vec<u8> = b.iter().zip(a.iter()).map(|(&x, &y)| f(x, y)).collect();
        self.dstack.push_byte_array(c);
        Ok(())
    }

    pub(crate) fn op_equal(&mut self) -> Result<(), InterpreterError> {
        let a = self.dstack.pop_byte_array()?;
        let b = self.dstack.pop_byte_array()?;
        self.dstack.push_bool(a == b);
        Ok(())
    }
}
