//! Fixed-width body fields.
//!
//! Text fields are NUL-padded to their full width on the wire. Encoding pads
//! and refuses oversized values; decoding strips the trailing padding.
//! Numeric fields are unsigned Big Endian.

use bytes::{Buf, BufMut, BytesMut};

use super::wire_format::PKG_LEN_SIZE;
use crate::error::{Result, TrackerError};

/// Write `value` into a `width`-byte field, right-padded with NUL bytes.
///
/// `field` names the value in the error message.
///
/// # Example
///
/// ```
/// use bytes::BytesMut;
/// use fdfs_tracker::protocol::put_fixed;
///
/// let mut buf = BytesMut::new();
/// put_fixed(&mut buf, "group name", b"group1", 16).unwrap();
/// assert_eq!(buf.len(), 16);
/// assert_eq!(&buf[..6], b"group1");
/// assert!(buf[6..].iter().all(|&b| b == 0));
/// ```
pub fn put_fixed(buf: &mut BytesMut, field: &str, value: &[u8], width: usize) -> Result<()> {
    if value.len() > width {
        return Err(TrackerError::Encoding(format!(
            "{} is {} bytes, field holds {}",
            field,
            value.len(),
            width
        )));
    }
    buf.reserve(width);
    buf.put_slice(value);
    buf.put_bytes(0, width - value.len());
    Ok(())
}

/// Text of a fixed-width field with the trailing NUL padding removed.
pub fn trim_fixed(raw: &[u8]) -> String {
    let end = raw.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

/// Sequential reader over the fields of one record.
///
/// Every read checks the remaining length first, so a short record is a
/// `Protocol` error rather than a panic.
#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    buf: &'a [u8],
}

impl<'a> FieldReader<'a> {
    /// Create a reader over `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Bytes not yet consumed.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.buf.len() < needed {
            return Err(TrackerError::Protocol(format!(
                "Record truncated: need {} bytes, {} left",
                needed,
                self.buf.len()
            )));
        }
        Ok(())
    }

    /// Take the next `width` raw bytes.
    pub fn take(&mut self, width: usize) -> Result<&'a [u8]> {
        self.ensure(width)?;
        let (head, tail) = self.buf.split_at(width);
        self.buf = tail;
        Ok(head)
    }

    /// Read a fixed-width text field.
    pub fn fixed_str(&mut self, width: usize) -> Result<String> {
        self.take(width).map(trim_fixed)
    }

    /// Read a Big Endian u64.
    pub fn u64(&mut self) -> Result<u64> {
        self.ensure(PKG_LEN_SIZE)?;
        Ok(self.buf.get_u64())
    }

    /// Read a single byte.
    pub fn u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.buf.get_u8())
    }

    /// Consume the reader, failing if any bytes were left unread.
    pub fn finish(self) -> Result<()> {
        if !self.buf.is_empty() {
            return Err(TrackerError::Protocol(format!(
                "{} trailing bytes after record",
                self.buf.len()
            )));
        }
        Ok(())
    }
}
