//! Little-endian binary stream primitives.
//!
//! Every variable-length value (strings, arrays) is preceded by its element
//! count as a u32, so readers never need out-of-band sizes.
//!
//! # Layout
//! ```text
//! u8 / u32 / f64:  fixed width, little-endian
//! string:          u32 byte length, UTF-8 bytes (no terminator)
//! u32 array:       u32 count, count × u32
//! f64 array:       u32 count, count × f64
//! bytes:           raw, length is carried elsewhere
//! ```

use std::io::Write;

use crate::error::{FormatError, Result};

/// Sequential writer over any `io::Write` sink.
pub struct BinaryWriter<W: Write> {
    inner: W,
    written: u64,
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, written: 0 }
    }

    pub fn u8(&mut self, value: u8) -> Result<()> {
        self.bytes(&[value])
    }

    pub fn u32(&mut self, value: u32) -> Result<()> {
        self.bytes(&value.to_le_bytes())
    }

    pub fn f64(&mut self, value: f64) -> Result<()> {
        self.bytes(&value.to_le_bytes())
    }

    /// Write a length as a u32 prefix, failing if it does not fit.
    pub fn len_u32(&mut self, len: usize) -> Result<()> {
        let value = u32::try_from(len).map_err(|_| FormatError::LengthOverflow {
            len,
            max: u32::MAX as u64,
        })?;
        self.u32(value)
    }

    /// Write a length as a u8 prefix, failing if it does not fit.
    pub fn len_u8(&mut self, len: usize) -> Result<()> {
        let value = u8::try_from(len).map_err(|_| FormatError::LengthOverflow {
            len,
            max: u8::MAX as u64,
        })?;
        self.u8(value)
    }

    /// Length-prefixed UTF-8 string
    pub fn string(&mut self, value: &str) -> Result<()> {
        self.len_u32(value.len())?;
        self.bytes(value.as_bytes())
    }

    pub fn u32_array(&mut self, values: &[u32]) -> Result<()> {
        self.len_u32(values.len())?;
        for value in values {
            self.u32(*value)?;
        }
        Ok(())
    }

    pub fn f64_array(&mut self, values: &[f64]) -> Result<()> {
        self.len_u32(values.len())?;
        for value in values {
            self.f64(*value)?;
        }
        Ok(())
    }

    /// Raw bytes, without a length prefix
    pub fn bytes(&mut self, data: &[u8]) -> Result<()> {
        self.inner.write_all(data)?;
        self.written += data.len() as u64;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Sequential reader over an in-memory byte slice.
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Take `len` raw bytes
    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(FormatError::UnexpectedEof {
                offset: self.pos,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(N)?);
        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    pub fn u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    pub fn f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.array()?))
    }

    pub fn string(&mut self) -> Result<String> {
        let len = self.u32()? as usize;
        let offset = self.pos;
        let bytes = self.bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| FormatError::InvalidUtf8 { offset })
    }

    pub fn u32_array(&mut self) -> Result<Vec<u32>> {
        let count = self.u32()? as usize;
        self.ensure(count, 4)?;
        (0..count).map(|_| self.u32()).collect()
    }

    pub fn f64_array(&mut self) -> Result<Vec<f64>> {
        let count = self.u32()? as usize;
        self.ensure(count, 8)?;
        (0..count).map(|_| self.f64()).collect()
    }

    /// Fail if any bytes are left unread.
    pub fn finish(self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(FormatError::TrailingBytes(n)),
        }
    }

    // Reject absurd counts before allocating for them.
    fn ensure(&self, count: usize, element_size: usize) -> Result<()> {
        let needed = count.saturating_mul(element_size);
        if needed > self.remaining() {
            return Err(FormatError::UnexpectedEof {
                offset: self.pos,
                needed,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }
}
