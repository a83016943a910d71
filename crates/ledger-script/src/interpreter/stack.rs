//! Script execution stacks.
//!
//! Stack items are byte strings; the numeric and boolean views are decoded
//! on demand. Index arguments count from the top of the stack.

use super::error::{InterpreterError, ScriptError};
use super::scriptnum::ScriptNumber;

/// Truthiness of a stack item: false iff every byte is zero, where a sole
/// trailing `0x80` (negative zero) also counts as zero.
pub fn as_bool(t: &[u8]) -> bool {
    match t.split_last() {
        Some((&last, rest)) => rest.iter().any(|&b| b != 0) || (last != 0 && last != 0x80),
        None => false,
    }
}

/// The canonical encoding of a boolean result.
pub fn from_bool(v: bool) -> Vec<u8> {
    if v {
        vec![1]
    } else {
        Vec::new()
    }
}

/// The main data/alt stack used by the evaluator.
#[derive(Debug, Clone)]
pub struct Stack {
    /// Items, bottom first.
    pub stk: Vec<Vec<u8>>,
    /// Byte limit applied when items are read as numbers.
    pub max_num_length: usize,
    /// Whether pushes and numeric items must be minimally encoded.
    pub verify_minimal_data: bool,
    underflow: ScriptError,
}

impl Stack {
    /// An empty main stack that reports underflow as `STACK_UNDERFLOW`.
    pub fn new(max_num_length: usize, verify_minimal_data: bool) -> Self {
        Stack {
            stk: Vec::new(),
            max_num_length,
            verify_minimal_data,
            underflow: ScriptError::StackUnderflow,
        }
    }

    /// A stack that reports underflow as `INVALID_ALTSTACK_OPERATION`.
    pub fn new_alt() -> Self {
        Stack {
            underflow: ScriptError::InvalidAltstackOperation,
            ..Stack::new(0, false)
        }
    }

    fn invalid_index(&self, idx: i32) -> InterpreterError {
        InterpreterError::new(
            self.underflow,
            format!("index {} is invalid for stack size {}", idx, self.stk.len()),
        )
    }

    /// Vector position of the item `idx` places below the top.
    fn position(&self, idx: i32) -> Result<usize, InterpreterError> {
        usize::try_from(idx)
            .ok()
            .and_then(|i| self.stk.len().checked_sub(i + 1))
            .ok_or_else(|| self.invalid_index(idx))
    }

    /// Vector position where the top `count` items begin.
    fn top_start(&self, count: usize, op: &str) -> Result<usize, InterpreterError> {
        self.stk.len().checked_sub(count).ok_or_else(|| {
            InterpreterError::new(
                self.underflow,
                format!("{} needs {} items, stack has {}", op, count, self.stk.len()),
            )
        })
    }

    /// Number of items.
    pub fn depth(&self) -> i32 {
        self.stk.len() as i32
    }

    /// Push a raw item.
    pub fn push_byte_array(&mut self, data: Vec<u8>) {
        self.stk.push(data);
    }

    /// Push the minimal encoding of `n`.
    pub fn push_int(&mut self, n: &ScriptNumber) {
        self.push_byte_array(n.to_bytes());
    }

    /// Push `1` for true or the empty item for false.
    pub fn push_bool(&mut self, val: bool) {
        self.push_byte_array(from_bool(val));
    }

    /// Pop the top item.
    pub fn pop_byte_array(&mut self) -> Result<Vec<u8>, InterpreterError> {
        self.stk.pop().ok_or_else(|| self.invalid_index(0))
    }

    /// Pop the top item and decode it as a number.
    pub fn pop_int(&mut self) -> Result<ScriptNumber, InterpreterError> {
        let data = self.pop_byte_array()?;
        ScriptNumber::from_bytes(&data, self.max_num_length, self.verify_minimal_data)
    }

    /// Pop the top item and read its truthiness.
    pub fn pop_bool(&mut self) -> Result<bool, InterpreterError> {
        self.pop_byte_array().map(|data| as_bool(&data))
    }

    /// Copy of the item `idx` places below the top.
    pub fn peek_byte_array(&self, idx: i32) -> Result<Vec<u8>, InterpreterError> {
        let pos = self.position(idx)?;
        Ok(self.stk[pos].clone())
    }

    /// The item `idx` places below the top, decoded as a number.
    pub fn peek_int(&self, idx: i32) -> Result<ScriptNumber, InterpreterError> {
        let data = self.peek_byte_array(idx)?;
        ScriptNumber::from_bytes(&data, self.max_num_length, self.verify_minimal_data)
    }

    /// Remove the item `idx` places below the top.
    fn nip_n(&mut self, idx: i32) -> Result<Vec<u8>, InterpreterError> {
        let pos = self.position(idx)?;
        Ok(self.stk.remove(pos))
    }

    /// Remove the item `idx` places below the top and drop it.
    pub fn nip_n_discard(&mut self, idx: i32) -> Result<(), InterpreterError> {
        self.nip_n(idx).map(drop)
    }

    /// `a b` -> `b a b`
    pub fn tuck(&mut self) -> Result<(), InterpreterError> {
        let start = self.top_start(2, "OP_TUCK")?;
        let top = self.stk[start + 1].clone();
        self.stk.insert(start, top);
        Ok(())
    }

    /// Remove the top `n` items.
    pub fn drop_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        let start = self.top_start(n, "drop")?;
        self.stk.truncate(start);
        Ok(())
    }

    /// Copy the top `n` items, keeping their order.
    pub fn dup_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        let start = self.top_start(n, "dup")?;
        self.stk.extend_from_within(start..);
        Ok(())
    }

    /// Move the third group of `n` items from the top onto the top.
    pub fn rot_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        let start = self.top_start(3 * n, "rot")?;
        self.stk[start..].rotate_left(n);
        Ok(())
    }

    /// Exchange the top two groups of `n` items.
    pub fn swap_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        let start = self.top_start(2 * n, "swap")?;
        self.stk[start..].rotate_left(n);
        Ok(())
    }

    /// Copy the second group of `n` items from the top onto the top.
    pub fn over_n(&mut self, n: usize) -> Result<(), InterpreterError> {
        let start = self.top_start(2 * n, "over")?;
        self.stk.extend_from_within(start..start + n);
        Ok(())
    }

    /// Copy the item `n` places below the top onto the top.
    pub fn pick_n(&mut self, n: i32) -> Result<(), InterpreterError> {
        let so = self.peek_byte_array(n)?;
        self.push_byte_array(so);
        Ok(())
    }

    /// Move the item `n` places below the top onto the top.
    pub fn roll_n(&mut self, n: i32) -> Result<(), InterpreterError> {
        let so = self.nip_n(n)?;
        self.push_byte_array(so);
        Ok(())
    }

    /// Set stack contents from array (last = top).
    pub fn set_stack(&mut self, data: Vec<Vec<u8>>) {
        self.stk = data;
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.stk.clear();
    }
}

/// State of one open IF/NOTIF block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// The current branch executes.
    Taken,
    /// The current branch is skipped; its ELSE branch would execute.
    NotTaken,
    /// The whole block sits inside a skipped branch.
    Skipped,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    branch: Branch,
    seen_else: bool,
}

/// Nested IF/NOTIF/ELSE/ENDIF state.
#[derive(Debug, Clone, Default)]
pub struct ConditionStack {
    frames: Vec<Frame>,
}

impl ConditionStack {
    /// No open blocks.
    pub fn new() -> Self {
        ConditionStack::default()
    }

    /// Whether opcodes at the current position execute.
    pub fn is_executing(&self) -> bool {
        self.frames.last().map_or(true, |f| f.branch == Branch::Taken)
    }

    /// Whether every block has been closed.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of open blocks.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Open a block in the given state.
    pub fn push(&mut self, branch: Branch) {
        self.frames.push(Frame { branch, seen_else: false });
    }

    /// Flip the innermost block to its ELSE branch.
    ///
    /// A block accepts one ELSE; a second one is unbalanced.
    pub fn toggle(&mut self) -> Result<(), InterpreterError> {
        let frame = self.frames.last_mut().ok_or_else(|| {
            InterpreterError::new(ScriptError::UnbalancedConditional, "OP_ELSE without OP_IF")
        })?;
        if frame.seen_else {
            return Err(InterpreterError::new(
                ScriptError::UnbalancedConditional,
                "duplicate OP_ELSE in conditional block",
            ));
        }
        frame.seen_else = true;
        frame.branch = match frame.branch {
            Branch::Taken => Branch::NotTaken,
            Branch::NotTaken => Branch::Taken,
            Branch::Skipped => Branch::Skipped,
        };
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Branch, InterpreterError> {
        self.frames.pop().map(|f| f.branch).ok_or_else(|| {
            InterpreterError::new(ScriptError::UnbalancedConditional, "OP_ENDIF without OP_IF")
        })
    }
}
