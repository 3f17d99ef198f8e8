//! Object stream used to persist document elements.
//!
//! An object is framed as `{` + name + fields + `}`. Names and byte payloads
//! carry a signed 64-bit little-endian length prefix. Fixed-size fields are
//! written as raw [`Pod`] bytes; callers store multi-byte values
//! little-endian (`to_le`) so streams move between hosts.
//!
//! Lengths read back are external input: they are checked with
//! [`is_safely_castable`] and rejected with a [`StreamError`], never handed
//! to a strict cast unchecked.

use bytemuck::Pod;
use thiserror::Error;

use crate::cast::{is_safely_castable, strict_cast};

pub const OBJECT_BEGIN: u8 = b'{';
pub const OBJECT_END: u8 = b'}';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("unexpected end of stream: needed {needed} bytes, {remaining} left")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("invalid length prefix {0}")]
    InvalidLength(i64),

    #[error("expected marker {expected:#04x}, found {found:#04x}")]
    UnexpectedMarker { expected: u8, found: u8 },

    #[error("expected object {expected:?}, found {found:?}")]
    UnexpectedObject { expected: String, found: String },

    #[error("object name is not valid UTF-8")]
    InvalidName,
}

pub type Result<T> = std::result::Result<T, StreamError>;

#[derive(Debug, Clone, Default)]
pub struct ObjectWriter {
    bytes: Vec<u8>,
}

impl ObjectWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_object(&mut self, name: &str) {
        self.bytes.push(OBJECT_BEGIN);
        self.write_bytes(name.as_bytes());
    }

    pub fn end_object(&mut self) {
        self.bytes.push(OBJECT_END);
    }

    pub fn write_pod<T: Pod>(&mut self, value: &T) {
        self.bytes.extend_from_slice(bytemuck::bytes_of(value));
    }

    /// Writes `data` behind its length prefix.
    pub fn write_bytes(&mut self, data: &[u8]) {
        let len = strict_cast::<i64, usize>(data.len());
        self.bytes.extend_from_slice(&len.to_le_bytes());
        self.bytes.extend_from_slice(data);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Reads objects back from a byte slice, tracking a read cursor.
#[derive(Debug, Clone)]
pub struct ObjectReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> ObjectReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(StreamError::UnexpectedEof { needed, remaining });
        }
        let bytes: &'a [u8] = self.bytes;
        let out = &bytes[self.pos..self.pos + needed];
        self.pos += needed;
        Ok(out)
    }

    fn expect_marker(&mut self, expected: u8) -> Result<()> {
        let found = self.take(1)?[0];
        if found != expected {
            return Err(StreamError::UnexpectedMarker { expected, found });
        }
        Ok(())
    }

    fn read_len(&mut self) -> Result<usize> {
        let raw = i64::from_le_bytes(self.read_pod::<[u8; 8]>()?);
        if !is_safely_castable::<usize, i64>(raw) {
            tracing::warn!(len = raw, pos = self.pos, "rejecting length prefix");
            return Err(StreamError::InvalidLength(raw));
        }
        Ok(strict_cast::<usize, i64>(raw))
    }

    /// Consumes the header of the next object, which must be named `expected`.
    pub fn read_object(&mut self, expected: &str) -> Result<()> {
        self.expect_marker(OBJECT_BEGIN)?;
        let name = self.read_bytes_ref()?;
        let found = std::str::from_utf8(name).map_err(|_| StreamError::InvalidName)?;
        if found != expected {
            return Err(StreamError::UnexpectedObject {
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        tracing::trace!(object = found, pos = self.pos, "reading object");
        Ok(())
    }

    pub fn end_object(&mut self) -> Result<()> {
        self.expect_marker(OBJECT_END)
    }

    pub fn read_pod<T: Pod>(&mut self) -> Result<T> {
        let raw = self.take(std::mem::size_of::<T>())?;
        Ok(bytemuck::pod_read_unaligned(raw))
    }

    fn read_bytes_ref(&mut self) -> Result<&'a [u8]> {
        let len = self.read_len()?;
        self.take(len)
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        Ok(self.read_bytes_ref()?.to_vec())
    }
}
