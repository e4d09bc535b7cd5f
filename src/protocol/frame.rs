//! Request and response frames.
//!
//! A [`Request`] collects the body fields of one command together with the
//! body length those fields declare. A [`Frame`] is a received response:
//! decoded header plus the raw body bytes.
//!
//! # Example
//!
//! ```
//! use fdfs_tracker::protocol::{Request, TrackerCommand, GROUP_NAME_MAX_LEN};
//!
//! let request = Request::new(TrackerCommand::ListOneGroup)
//!     .group_name("group1")
//!     .unwrap();
//!
//! assert_eq!(request.declared_len(), GROUP_NAME_MAX_LEN);
//! assert_eq!(request.encode().unwrap().len(), 10 + GROUP_NAME_MAX_LEN);
//! ```

use bytes::{Bytes, BytesMut};

use super::command::{TrackerCommand, GROUP_NAME_MAX_LEN, IP_ADDRESS_SIZE};
use super::field::put_fixed;
use super::wire_format::{Header, HEADER_SIZE};
use crate::error::{Result, TrackerError};

/// One outgoing command with its serialized body.
#[derive(Debug, Clone)]
pub struct Request {
    command: TrackerCommand,
    body: BytesMut,
    declared_len: usize,
}

impl Request {
    /// Create a request with an empty body.
    pub fn new(command: TrackerCommand) -> Self {
        Self {
            command,
            body: BytesMut::new(),
            declared_len: 0,
        }
    }

    /// Append a group name field (padded to `GROUP_NAME_MAX_LEN`).
    pub fn group_name(mut self, group_name: &str) -> Result<Self> {
        put_fixed(
            &mut self.body,
            "group name",
            group_name.as_bytes(),
            GROUP_NAME_MAX_LEN,
        )?;
        self.declared_len += GROUP_NAME_MAX_LEN;
        Ok(self)
    }

    /// Append an IP address field (padded to `IP_ADDRESS_SIZE`).
    pub fn ip_addr(mut self, ip_addr: &str) -> Result<Self> {
        put_fixed(&mut self.body, "ip address", ip_addr.as_bytes(), IP_ADDRESS_SIZE)?;
        self.declared_len += IP_ADDRESS_SIZE;
        Ok(self)
    }

    /// Append a file name. It is sent unpadded and must not be empty.
    pub fn file_name(mut self, file_name: &str) -> Result<Self> {
        if file_name.is_empty() {
            return Err(TrackerError::Encoding("file name is empty".to_string()));
        }
        self.body.extend_from_slice(file_name.as_bytes());
        self.declared_len += file_name.len();
        Ok(self)
    }

    /// Command this request carries.
    #[inline]
    pub fn command(&self) -> TrackerCommand {
        self.command
    }

    /// Body length declared by the appended fields.
    #[inline]
    pub fn declared_len(&self) -> usize {
        self.declared_len
    }

    /// Serialized body bytes.
    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Encode header and body into a single contiguous buffer.
    ///
    /// Fails with `Encoding` if the body does not match its declared length.
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.body.len() != self.declared_len {
            return Err(TrackerError::Encoding(format!(
                "Body is {} bytes but {} were declared",
                self.body.len(),
                self.declared_len
            )));
        }
        let header = Header::request(self.declared_len, self.command.code())?;
        Ok(build_frame(&header, &self.body))
    }
}

/// A received response frame.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Decoded header.
    pub header: Header,
    /// Body bytes, exactly `header.body_length` long.
    pub body: Bytes,
}

impl Frame {
    /// Create a new frame from header and body.
    pub fn new(header: Header, body: Bytes) -> Self {
        Self { header, body }
    }

    /// Get a reference to the body bytes.
    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body length declared by the header.
    #[inline]
    pub fn declared_len(&self) -> u64 {
        self.header.body_length
    }
}

/// Build a complete frame as a single byte vector.
///
/// # Example
///
/// ```
/// use fdfs_tracker::protocol::{build_frame, Header};
///
/// let header = Header::new(5, 100, 0);
/// let bytes = build_frame(&header, b"hello");
/// assert_eq!(bytes.len(), 10 + 5);
/// ```
pub fn build_frame(header: &Header, body: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + body.len());
    buf.extend_from_slice(&header.encode());
    buf.extend_from_slice(body);
    buf
}
