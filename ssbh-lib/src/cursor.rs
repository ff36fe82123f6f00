//! Byte and bit cursors over in-memory buffers
//!
//! All multi-byte values are little-endian. Bit reads consume bits
//! least-significant first within each byte and may cross byte boundaries.
//! A byte-level read or write after a partial bit read starts at the next
//! whole byte.

use std::io::{Cursor, Write};

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};

use crate::{Result, SsbhError};

/// Read cursor over a borrowed buffer
#[derive(Debug, Clone)]
pub struct SsbhReader<'a> {
    data: &'a [u8],
    byte_pos: usize,
    bit_pos: u8,
}

impl<'a> SsbhReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            bit_pos: 0,
        }
    }

    /// Current byte position
    pub fn position(&self) -> u64 {
        self.byte_pos as u64
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The whole underlying buffer
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Move to an absolute byte offset, discarding any partial bit state
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        if offset > self.data.len() as u64 {
            return Err(SsbhError::TruncatedData {
                offset,
                needed: 0,
                len: self.data.len(),
            });
        }
        self.byte_pos = offset as usize;
        self.bit_pos = 0;
        Ok(())
    }

    /// Advance until the position is a multiple of `alignment`
    pub fn align(&mut self, alignment: u64) {
        self.skip_partial_byte();
        let rem = self.byte_pos as u64 % alignment.max(1);
        if rem != 0 {
            self.byte_pos += (alignment - rem) as usize;
        }
    }

    /// Read `count` bits (at most 32) as an unsigned integer
    pub fn read_bits(&mut self, count: u32) -> Result<u32> {
        if count > 32 {
            return Err(SsbhError::format(format!(
                "cannot read {} bits into a 32-bit value",
                count
            )));
        }
        if count == 0 {
            return Ok(0);
        }

        let available = (self.data.len().saturating_sub(self.byte_pos) * 8)
            .saturating_sub(self.bit_pos as usize);
        if (count as usize) > available {
            return Err(SsbhError::TruncatedData {
                offset: self.position(),
                needed: (self.bit_pos as usize + count as usize).div_ceil(8),
                len: self.data.len(),
            });
        }

        let mut result = 0u32;
        let mut bits_read = 0;
        while bits_read < count {
            let current_byte = self.data[self.byte_pos];
            let bits_left_in_byte = 8 - self.bit_pos as u32;
            let bits_to_read = (count - bits_read).min(bits_left_in_byte);

            let mask = if bits_to_read >= 8 {
                0xFF
            } else {
                (1u8 << bits_to_read) - 1
            };
            let bits = (current_byte >> self.bit_pos) & mask;

            result |= (bits as u32) << bits_read;
            bits_read += bits_to_read;
            self.bit_pos += bits_to_read as u8;

            if self.bit_pos >= 8 {
                self.bit_pos = 0;
                self.byte_pos += 1;
            }
        }

        Ok(result)
    }

    /// Borrow the next `count` bytes
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        self.skip_partial_byte();
        let end = self
            .byte_pos
            .checked_add(count)
            .filter(|&end| end <= self.data.len())
            .ok_or(SsbhError::TruncatedData {
                offset: self.position(),
                needed: count,
                len: self.data.len(),
            })?;
        let bytes = &self.data[self.byte_pos..end];
        self.byte_pos = end;
        Ok(bytes)
    }

    /// Read a NUL-terminated byte string, consuming the terminator
    pub fn read_cstr(&mut self) -> Result<&'a [u8]> {
        self.skip_partial_byte();
        let rest = self.data.get(self.byte_pos..).unwrap_or_default();
        let len = rest
            .iter()
            .position(|&b| b == 0)
            .ok_or(SsbhError::TruncatedData {
                offset: self.position(),
                needed: rest.len() + 1,
                len: self.data.len(),
            })?;
        let bytes = &rest[..len];
        self.byte_pos += len + 1;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(LittleEndian::read_i16(self.read_bytes(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.read_bytes(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.read_bytes(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.read_bytes(8)?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.read_bytes(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.read_bytes(4)?))
    }

    fn skip_partial_byte(&mut self) {
        if self.bit_pos > 0 {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }
    }
}

/// Write cursor over an owned, growable buffer
///
/// Seeking backwards and writing overwrites existing bytes, which is how
/// placeholder offsets get back-patched.
#[derive(Debug, Default)]
pub struct SsbhWriter {
    inner: Cursor<Vec<u8>>,
    current_byte: u8,
    bit_pos: u8,
}

impl SsbhWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> u64 {
        self.inner.position()
    }

    /// Move to an absolute byte offset; writing past the end zero-fills the gap
    pub fn seek(&mut self, position: u64) -> Result<()> {
        self.flush_bits()?;
        self.inner.set_position(position);
        Ok(())
    }

    /// Flush pending bits and return the buffer
    pub fn into_inner(mut self) -> Result<Vec<u8>> {
        self.flush_bits()?;
        Ok(self.inner.into_inner())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.flush_bits()?;
        Ok(self.inner.write_u8(value)?)
    }

    pub fn write_i8(&mut self, value: i8) -> Result<()> {
        self.flush_bits()?;
        Ok(self.inner.write_i8(value)?)
    }

    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        self.flush_bits()?;
        Ok(self.inner.write_u16::<LittleEndian>(value)?)
    }

    pub fn write_i16(&mut self, value: i16) -> Result<()> {
        self.flush_bits()?;
        Ok(self.inner.write_i16::<LittleEndian>(value)?)
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.flush_bits()?;
        Ok(self.inner.write_u32::<LittleEndian>(value)?)
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.flush_bits()?;
        Ok(self.inner.write_i32::<LittleEndian>(value)?)
    }

    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        self.flush_bits()?;
        Ok(self.inner.write_u64::<LittleEndian>(value)?)
    }

    pub fn write_i64(&mut self, value: i64) -> Result<()> {
        self.flush_bits()?;
        Ok(self.inner.write_i64::<LittleEndian>(value)?)
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.flush_bits()?;
        Ok(self.inner.write_f32::<LittleEndian>(value)?)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.flush_bits()?;
        Ok(self.inner.write_all(bytes)?)
    }

    /// Write the low `count` bits of `value`, least-significant first
    pub fn write_bits(&mut self, value: u32, count: u32) -> Result<()> {
        if count > 32 {
            return Err(SsbhError::format(format!(
                "cannot write {} bits from a 32-bit value",
                count
            )));
        }

        let mut value = value as u64;
        let mut remaining = count;
        while remaining > 0 {
            let bits_left = 8 - self.bit_pos as u32;
            let bits_to_write = remaining.min(bits_left);

            let mask = (1u64 << bits_to_write) - 1;
            self.current_byte |= ((value & mask) as u8) << self.bit_pos;

            value >>= bits_to_write;
            remaining -= bits_to_write;
            self.bit_pos += bits_to_write as u8;

            if self.bit_pos >= 8 {
                let byte = self.current_byte;
                self.current_byte = 0;
                self.bit_pos = 0;
                self.inner.write_u8(byte)?;
            }
        }
        Ok(())
    }

    /// Write out a partially filled bit byte, if any
    pub fn flush_bits(&mut self) -> Result<()> {
        if self.bit_pos > 0 {
            let byte = self.current_byte;
            self.current_byte = 0;
            self.bit_pos = 0;
            self.inner.write_u8(byte)?;
        }
        Ok(())
    }

    /// Write `fill` until the position is a multiple of `alignment`
    pub fn pad(&mut self, alignment: u64, fill: u8) -> Result<()> {
        self.flush_bits()?;
        while self.position() % alignment.max(1) != 0 {
            self.inner.write_u8(fill)?;
        }
        Ok(())
    }

    /// Overwrite 8 bytes at `at` without moving the cursor
    pub fn patch_u64(&mut self, at: u64, value: u64) -> Result<()> {
        self.flush_bits()?;
        let here = self.position();
        self.inner.set_position(at);
        self.inner.write_u64::<LittleEndian>(value)?;
        self.inner.set_position(here);
        Ok(())
    }
}
