//! Binary helpers for the wire format.
//!
//! `VarInt` is the compact-size length prefix, `LedgerReader` and
//! `LedgerWriter` are cursors over little-endian protocol data, and the free
//! functions read or write fixed-width integers at an offset in a slice.

use crate::PrimitivesError;

/// A compact-size variable-length integer.
///
/// Values below `0xfd` take one byte; larger values are prefixed with
/// `0xfd`, `0xfe` or `0xff` followed by 2, 4 or 8 little-endian bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct VarInt(pub u64);

impl VarInt {
    /// Decode a VarInt from the front of `data`.
    ///
    /// Returns the value and the number of bytes consumed.
    pub fn from_bytes(data: &[u8]) -> Result<(Self, usize), PrimitivesError> {
        let mut reader = LedgerReader::new(data);
        let value = reader.read_varint()?;
        Ok((value, reader.position()))
    }

    /// Encoded length in bytes: 1, 3, 5 or 9.
    pub fn length(&self) -> usize {
        match self.0 {
            0..=0xfc => 1,
            0xfd..=0xffff => 3,
            0x1_0000..=0xffff_ffff => 5,
            _ => 9,
        }
    }

    /// Encode into a new vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = LedgerWriter::with_capacity(9);
        w.write_varint(*self);
        w.into_bytes()
    }

    /// The integer value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for VarInt {
    fn from(v: u64) -> Self {
        VarInt(v)
    }
}

impl From<usize> for VarInt {
    fn from(v: usize) -> Self {
        VarInt(v as u64)
    }
}

fn slice_at<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N], PrimitivesError> {
    let end = offset.checked_add(N).ok_or(PrimitivesError::UnexpectedEof)?;
    let src = data.get(offset..end).ok_or(PrimitivesError::UnexpectedEof)?;
    let mut out = [0u8; N];
    out.copy_from_slice(src);
    Ok(out)
}

fn slice_at_mut<'a>(
    data: &'a mut [u8],
    offset: usize,
    len: usize,
) -> Result<&'a mut [u8], PrimitivesError> {
    let end = offset.checked_add(len).ok_or(PrimitivesError::UnexpectedEof)?;
    data.get_mut(offset..end).ok_or(PrimitivesError::UnexpectedEof)
}

/// Read a little-endian u16 at `offset`.
pub fn read_u16_le(data: &[u8], offset: usize) -> Result<u16, PrimitivesError> {
    slice_at::<2>(data, offset).map(u16::from_le_bytes)
}

/// Read a little-endian u32 at `offset`.
pub fn read_u32_le(data: &[u8], offset: usize) -> Result<u32, PrimitivesError> {
    slice_at::<4>(data, offset).map(u32::from_le_bytes)
}

/// Read a big-endian u32 at `offset`.
pub fn read_u32_be(data: &[u8], offset: usize) -> Result<u32, PrimitivesError> {
    slice_at::<4>(data, offset).map(u32::from_be_bytes)
}

/// Read a little-endian u64 at `offset`.
pub fn read_u64_le(data: &[u8], offset: usize) -> Result<u64, PrimitivesError> {
    slice_at::<8>(data, offset).map(u64::from_le_bytes)
}

/// Write `value` little-endian at `offset`.
pub fn write_u32_le(data: &mut [u8], offset: usize, value: u32) -> Result<(), PrimitivesError> {
    slice_at_mut(data, offset, 4)?.copy_from_slice(&value.to_le_bytes());
    Ok(())
}

/// Write `value` big-endian at `offset`.
pub fn write_u32_be(data: &mut [u8], offset: usize, value: u32) -> Result<(), PrimitivesError> {
    slice_at_mut(data, offset, 4)?.copy_from_slice(&value.to_be_bytes());
    Ok(())
}

/// Write `value` little-endian at `offset`.
pub fn write_u64_le(data: &mut [u8], offset: usize, value: u64) -> Result<(), PrimitivesError> {
    slice_at_mut(data, offset, 8)?.copy_from_slice(&value.to_le_bytes());
    Ok(())
}

/// A cursor over borrowed protocol bytes.
///
/// Slices returned by `read_bytes` borrow from the backing buffer and cannot
/// outlive it.
pub struct LedgerReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> LedgerReader<'a> {
    /// Create a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        LedgerReader { data, pos: 0 }
    }

    /// Read `n` bytes and advance.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], PrimitivesError> {
        let end = self.pos.checked_add(n).ok_or(PrimitivesError::UnexpectedEof)?;
        let slice = self
            .data
            .get(self.pos..end)
            .ok_or(PrimitivesError::UnexpectedEof)?;
        self.pos = end;
        Ok(slice)
    }

    /// Read exactly `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], PrimitivesError> {
        let v = slice_at::<N>(self.data, self.pos)?;
        self.pos += N;
        Ok(v)
    }

    pub fn read_u8(&mut self) -> Result<u8, PrimitivesError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, PrimitivesError> {
        self.read_array().map(u16::from_le_bytes)
    }

    pub fn read_u32_le(&mut self) -> Result<u32, PrimitivesError> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_u64_le(&mut self) -> Result<u64, PrimitivesError> {
        self.read_array().map(u64::from_le_bytes)
    }

    pub fn read_i64_le(&mut self) -> Result<i64, PrimitivesError> {
        self.read_array().map(i64::from_le_bytes)
    }

    /// Read a compact-size integer.
    pub fn read_varint(&mut self) -> Result<VarInt, PrimitivesError> {
        let v = match self.read_u8()? {
            0xff => self.read_u64_le()?,
            0xfe => self.read_u32_le()? as u64,
            0xfd => self.read_u16_le()? as u64,
            b => b as u64,
        };
        Ok(VarInt(v))
    }

    /// Read a varint length followed by that many bytes.
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], PrimitivesError> {
        let len = self.read_varint()?.0;
        let len = usize::try_from(len).map_err(|_| PrimitivesError::VarIntTooLarge)?;
        if len > self.remaining() {
            return Err(PrimitivesError::UnexpectedEof);
        }
        self.read_bytes(len)
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

/// An append-only buffer for protocol bytes.
#[derive(Debug, Default, Clone)]
pub struct LedgerWriter {
    buf: Vec<u8>,
}

impl LedgerWriter {
    pub fn new() -> Self {
        LedgerWriter { buf: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        LedgerWriter {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_u8(&mut self, val: u8) {
        self.buf.push(val);
    }

    pub fn write_u16_le(&mut self, val: u16) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_u32_le(&mut self, val: u32) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_u64_le(&mut self, val: u64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_i64_le(&mut self, val: i64) {
        self.buf.extend_from_slice(&val.to_le_bytes());
    }

    pub fn write_varint(&mut self, varint: VarInt) {
        let v = varint.0;
        match varint.length() {
            1 => self.write_u8(v as u8),
            3 => {
                self.write_u8(0xfd);
                self.write_u16_le(v as u16);
            }
            5 => {
                self.write_u8(0xfe);
                self.write_u32_le(v as u32);
            }
            _ => {
                self.write_u8(0xff);
                self.write_u64_le(v);
            }
        }
    }

    /// Write a varint length prefix followed by `bytes`.
    pub fn write_var_bytes(&mut self, bytes: &[u8]) {
        self.write_varint(VarInt::from(bytes.len()));
        self.write_bytes(bytes);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
