//! Script operand parsing and push encoding.
//!
//! An operand is either a bare opcode or a push opcode with the bytes it
//! pushes. Parsing is lazy: [`Operands`] walks a borrowed byte slice and
//! yields one operand at a time, borrowing push payloads from the backing
//! script. Operands never outlive the script they were parsed from.

use crate::opcodes::*;
use crate::ScriptFormatError;

/// A single parsed element of a script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Operand<'a> {
    /// The opcode byte. For direct pushes (1-75 bytes), this is the length.
    pub opcode: u8,
    /// The pushed bytes for push opcodes (`OP_0` pushes an empty slice).
    pub data: Option<&'a [u8]>,
}

impl<'a> Operand<'a> {
    /// Whether this operand is a data push (`OP_0` through `OP_PUSHDATA4`).
    pub fn is_push_data(&self) -> bool {
        self.opcode <= OP_PUSHDATA4
    }

    /// Whether the operand pushes its data with the shortest possible encoding.
    ///
    /// Small numbers must use `OP_0`, `OP_1NEGATE` or `OP_1..OP_16`, and longer
    /// payloads must use the smallest length prefix that fits.
    pub fn is_minimal_push(&self) -> bool {
        let data = match self.data {
            Some(d) => d,
            None => return true,
        };
        let len = data.len();
        if len == 0 {
            return self.opcode == OP_0;
        }
        if len == 1 && (1..=16).contains(&data[0]) {
            return false;
        }
        if len == 1 && data[0] == 0x81 {
            return false;
        }
        if len <= 75 {
            return self.opcode as usize == len;
        }
        if len <= 0xff {
            return self.opcode == OP_PUSHDATA1;
        }
        if len <= 0xffff {
            return self.opcode == OP_PUSHDATA2;
        }
        true
    }

    /// Render the operand as an ASM token: hex for pushes, the opcode name otherwise.
    pub fn to_asm_string(&self) -> String {
        match self.data {
            Some(data) if self.opcode != OP_0 => hex::encode(data),
            _ => opcode_to_string(self.opcode),
        }
    }

    /// Serialize the operand back to its script bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![self.opcode];
        if let Some(data) = self.data {
            match self.opcode {
                OP_PUSHDATA1 => out.push(data.len() as u8),
                OP_PUSHDATA2 => out.extend_from_slice(&(data.len() as u16).to_le_bytes()),
                OP_PUSHDATA4 => out.extend_from_slice(&(data.len() as u32).to_le_bytes()),
                _ => {}
            }
            out.extend_from_slice(data);
        }
        out
    }
}

/// Lazy iterator over the operands of a script.
///
/// Yields `Err` once for a truncated push and then stops. Cloning the iterator
/// (or calling [`crate::Script::operands`] again) restarts parsing.
#[derive(Clone, Debug)]
pub struct Operands<'a> {
    bytes: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> Operands<'a> {
    /// Start parsing `bytes` from the beginning.
    pub fn new(bytes: &'a [u8]) -> Self {
        Operands { bytes, pos: 0, failed: false }
    }

    /// Byte offset of the next operand to be parsed.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The bytes following the current position.
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos.min(self.bytes.len())..]
    }

    fn read_len(&self, start: usize, width: usize) -> Result<usize, ScriptFormatError> {
        let end = start + width;
        if self.bytes.len() < end {
            return Err(ScriptFormatError::TruncatedPush {
                offset: self.pos,
                needed: width,
                available: self.bytes.len() - start,
            });
        }
        let mut buf = [0u8; 4];
        buf[..width].copy_from_slice(&self.bytes[start..end]);
        Ok(u32::from_le_bytes(buf) as usize)
    }

    fn parse_next(&mut self) -> Result<Operand<'a>, ScriptFormatError> {
        let opcode = self.bytes[self.pos];
        let header = self.pos + 1;
        let (len, start) = match opcode {
            OP_0 => (0, header),
            OP_DATA_1..=OP_DATA_75 => (opcode as usize, header),
            OP_PUSHDATA1 => (self.read_len(header, 1)?, header + 1),
            OP_PUSHDATA2 => (self.read_len(header, 2)?, header + 2),
            OP_PUSHDATA4 => (self.read_len(header, 4)?, header + 4),
            _ => {
                self.pos = header;
                return Ok(Operand { opcode, data: None });
            }
        };
        let available = self.bytes.len() - start;
        if available < len {
            return Err(ScriptFormatError::TruncatedPush {
                offset: self.pos,
                needed: len,
                available,
            });
        }
        self.pos = start + len;
        Ok(Operand {
            opcode,
            data: Some(&self.bytes[start..start + len]),
        })
    }
}

impl<'a> Iterator for Operands<'a> {
    type Item = Result<Operand<'a>, ScriptFormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.bytes.len() {
            return None;
        }
        let result = self.parse_next();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

impl std::iter::FusedIterator for Operands<'_> {}

/// Compute the push prefix bytes for a payload of the given length.
///
/// Uses a direct push for up to 75 bytes, then the smallest of
/// OP_PUSHDATA1/2/4 that can carry the length.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptFormatError> {
    if data_len <= 75 {
        Ok(vec![data_len as u8])
    } else if data_len <= 0xFF {
        Ok(vec![OP_PUSHDATA1, data_len as u8])
    } else if data_len <= 0xFFFF {
        let mut buf = vec![OP_PUSHDATA2];
        buf.extend_from_slice(&(data_len as u16).to_le_bytes());
        Ok(buf)
    } else if data_len <= 0xFFFF_FFFF {
        let mut buf = vec![OP_PUSHDATA4];
        buf.extend_from_slice(&(data_len as u32).to_le_bytes());
        Ok(buf)
    } else {
        Err(ScriptFormatError::DataTooBig(data_len))
    }
}
