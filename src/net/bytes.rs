//! Little-endian packet builder and reader.
//!
//! Every wire integer is fixed-width little-endian. `PacketWriter` only
//! appends; `PacketReader` consumes front to back and reports a short buffer
//! as `DecodeError::Truncated`.

use crate::error::DecodeError;

/// Append-only packet buffer.
#[derive(Debug, Default)]
pub struct PacketWriter {
    buf: Vec<u8>,
}

impl PacketWriter {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    pub fn put_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Write exactly `len` bytes: `bytes` cut or zero-padded to fit.
    pub fn put_fixed(&mut self, bytes: &[u8], len: usize) {
        let take = bytes.len().min(len);
        self.buf.extend_from_slice(&bytes[..take]);
        self.buf.resize(self.buf.len() + len - take, 0);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over a received packet.
#[derive(Debug)]
pub struct PacketReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PacketReader<'a> {
    /// Start reading, failing early if the packet is shorter than `size`.
    pub fn new(buf: &'a [u8], size: usize) -> Result<Self, DecodeError> {
        if buf.len() < size {
            return Err(DecodeError::Truncated {
                expected: size,
                actual: buf.len(),
            });
        }
        Ok(Self { buf, pos: 0 })
    }

    /// Consume the 4-byte magic.
    pub fn expect_header(&mut self, header: &[u8; 4]) -> Result<(), DecodeError> {
        if self.bytes(4)? == header {
            Ok(())
        } else {
            Err(DecodeError::BadHeader)
        }
    }

    pub fn bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos + len;
        let slice = self.buf.get(self.pos..end).ok_or(DecodeError::Truncated {
            expected: end,
            actual: self.buf.len(),
        })?;
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(N)?);
        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.array::<1>()?[0])
    }

    pub fn bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.u8()? != 0)
    }

    pub fn u16(&mut self) -> Result<u16, DecodeError> {
        self.array().map(u16::from_le_bytes)
    }

    pub fn i16(&mut self) -> Result<i16, DecodeError> {
        self.array().map(i16::from_le_bytes)
    }

    pub fn i32(&mut self) -> Result<i32, DecodeError> {
        self.array().map(i32::from_le_bytes)
    }

    pub fn u32(&mut self) -> Result<u32, DecodeError> {
        self.array().map(u32::from_le_bytes)
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// Convert a decoded integer to a narrower field, naming the field on failure.
pub(crate) fn narrow<T, V>(field: &'static str, value: V) -> Result<T, DecodeError>
where
    V: Copy + Into<i64>,
    T: TryFrom<V>,
{
    T::try_from(value).map_err(|_| DecodeError::InvalidValue {
        field,
        value: value.into(),
    })
}
