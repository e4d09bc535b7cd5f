//! Wire format encoding and decoding.
//!
//! Implements the 10-byte tracker header:
//! ```text
//! ┌──────────────┬─────────┬────────┐
//! │ Body Length  │ Command │ Status │
//! │ 8 bytes      │ 1 byte  │ 1 byte │
//! │ uint64 BE    │         │        │
//! └──────────────┴─────────┴────────┘
//! ```
//!
//! All multi-byte integers are Big Endian and unsigned.

use crate::error::{Result, TrackerError};

/// Header size in bytes (fixed, exactly 10).
pub const HEADER_SIZE: usize = 10;

/// Width of the body length field, also used for every u64 field in bodies.
pub const PKG_LEN_SIZE: usize = 8;

/// Default maximum response body size (16 MB).
pub const DEFAULT_MAX_BODY_SIZE: u64 = 16 * 1024 * 1024;

/// Status byte for a successful response.
pub const STATUS_OK: u8 = 0;

/// Decoded header from wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Number of body bytes following the header.
    pub body_length: u64,
    /// Command code.
    pub command: u8,
    /// Status code (0 = success, responses only).
    pub status: u8,
}

impl Header {
    /// Create a new header.
    pub fn new(body_length: u64, command: u8, status: u8) -> Self {
        Self {
            body_length,
            command,
            status,
        }
    }

    /// Create a request header for a body of `body_len` bytes.
    ///
    /// Fails with `Encoding` if the length does not fit the 8-byte field.
    pub fn request(body_len: usize, command: u8) -> Result<Self> {
        let body_length = u64::try_from(body_len).map_err(|_| {
            TrackerError::Encoding(format!(
                "Body length {} does not fit the length field",
                body_len
            ))
        })?;
        Ok(Self::new(body_length, command, STATUS_OK))
    }

    /// Encode header to bytes (Big Endian).
    ///
    /// # Example
    ///
    /// ```
    /// use fdfs_tracker::protocol::Header;
    ///
    /// let header = Header::new(16, 90, 0);
    /// let bytes = header.encode();
    /// assert_eq!(bytes.len(), 10);
    /// assert_eq!(bytes[8], 90);
    /// ```
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        self.encode_into(&mut buf);
        buf
    }

    /// Encode header into an existing buffer.
    ///
    /// # Panics
    ///
    /// Panics if buffer is smaller than `HEADER_SIZE` (10 bytes).
    pub fn encode_into(&self, buf: &mut [u8]) {
        debug_assert!(buf.len() >= HEADER_SIZE);
        buf[0..8].copy_from_slice(&self.body_length.to_be_bytes());
        buf[8] = self.command;
        buf[9] = self.status;
    }

    /// Decode header from exactly `HEADER_SIZE` bytes (Big Endian).
    ///
    /// Command and status are returned as-is; interpreting them is up to
    /// the caller.
    ///
    /// # Example
    ///
    /// ```
    /// use fdfs_tracker::protocol::Header;
    ///
    /// let bytes = [0, 0, 0, 0, 0, 0, 0, 40, 100, 0];
    /// let header = Header::decode(&bytes).unwrap();
    /// assert_eq!(header.body_length, 40);
    /// assert_eq!(header.command, 100);
    /// assert!(header.is_ok());
    /// ```
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let raw: &[u8; HEADER_SIZE] = buf.try_into().map_err(|_| {
            TrackerError::Protocol(format!(
                "Header must be exactly {} bytes, got {}",
                HEADER_SIZE,
                buf.len()
            ))
        })?;
        let mut len = [0u8; PKG_LEN_SIZE];
        len.copy_from_slice(&raw[0..8]);
        Ok(Self {
            body_length: u64::from_be_bytes(len),
            command: raw[8],
            status: raw[9],
        })
    }

    /// Reject a declared body larger than `max_body_size`.
    pub fn validate(&self, max_body_size: u64) -> Result<()> {
        if self.body_length > max_body_size {
            return Err(TrackerError::Protocol(format!(
                "Body size {} exceeds maximum {}",
                self.body_length, max_body_size
            )));
        }
        Ok(())
    }

    /// Check if the status byte reports success.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}
