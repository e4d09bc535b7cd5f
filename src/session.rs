//! Command session - one framed request/response exchange.
//!
//! A [`Session`] borrows a connection for a single round trip:
//! 1. Write header + body as one buffer
//! 2. Read the 10-byte response header
//! 3. Stop on a non-zero status (error responses carry no body)
//! 4. Read exactly `body_length` bytes
//!
//! The session never retries. After the call, [`Session::is_at_frame_boundary`]
//! tells the owner whether the connection can carry another request.
//!
//! # Example
//!
//! ```ignore
//! use fdfs_tracker::protocol::{Request, TrackerCommand};
//! use fdfs_tracker::session::Session;
//!
//! let mut session = Session::new(&mut stream, DEFAULT_MAX_BODY_SIZE);
//! let frame = session.call(&Request::new(TrackerCommand::ListAllGroups)).await?;
//! ```

use std::io;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Result, TrackerError};
use crate::protocol::{Frame, Header, Request, HEADER_SIZE, TRACKER_PROTO_CMD_RESP};

/// A single request/response exchange over a borrowed connection.
pub struct Session<'c, C> {
    conn: &'c mut C,
    max_body_size: u64,
    at_boundary: bool,
}

impl<'c, C> Session<'c, C>
where
    C: AsyncRead + AsyncWrite + Unpin,
{
    /// Borrow `conn` for one exchange, accepting bodies up to `max_body_size`.
    pub fn new(conn: &'c mut C, max_body_size: u64) -> Self {
        Self {
            conn,
            max_body_size,
            at_boundary: true,
        }
    }

    /// Whether the connection sits between frames.
    ///
    /// False while an exchange is in flight and after any failure that left
    /// part of a frame unread or unwritten.
    #[inline]
    pub fn is_at_frame_boundary(&self) -> bool {
        self.at_boundary
    }

    /// Send `request` and receive its response frame.
    ///
    /// # Errors
    ///
    /// - `Encoding` if the request body does not match its declared length
    ///   (nothing is written)
    /// - `Connection` on transport failure
    /// - `Protocol` if the stream ends early or the header is not a
    ///   tracker response
    /// - `Remote` if the tracker reports a non-zero status
    pub async fn call(&mut self, request: &Request) -> Result<Frame> {
        let bytes = request.encode()?;

        tracing::debug!(
            command = request.command().name(),
            body_len = request.declared_len(),
            "Sending tracker request"
        );

        self.at_boundary = false;
        self.conn.write_all(&bytes).await?;
        self.conn.flush().await?;

        let mut raw = [0u8; HEADER_SIZE];
        self.read_full(&mut raw, "header").await?;
        let header = Header::decode(&raw)?;

        if !header.is_ok() {
            // Error responses carry no body; a non-empty one would leave the
            // stream mid-frame.
            self.at_boundary = header.body_length == 0;
            tracing::debug!(
                command = request.command().name(),
                status = header.status,
                "Tracker returned error status"
            );
            return Err(TrackerError::Remote(header.status));
        }

        if header.command != TRACKER_PROTO_CMD_RESP {
            return Err(TrackerError::Protocol(format!(
                "Expected response command {}, got {}",
                TRACKER_PROTO_CMD_RESP, header.command
            )));
        }

        header.validate(self.max_body_size)?;
        let body_len = usize::try_from(header.body_length).map_err(|_| {
            TrackerError::Protocol(format!(
                "Body length {} is not addressable",
                header.body_length
            ))
        })?;

        let mut body = vec![0u8; body_len];
        self.read_full(&mut body, "body").await?;
        self.at_boundary = true;

        tracing::trace!(
            command = request.command().name(),
            body_len,
            "Received tracker response"
        );

        Ok(Frame::new(header, Bytes::from(body)))
    }

    /// Read exactly `buf.len()` bytes; early EOF is a protocol violation.
    async fn read_full(&mut self, buf: &mut [u8], part: &str) -> Result<()> {
        match self.conn.read_exact(buf).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                Err(TrackerError::Protocol(format!(
                    "Connection closed before the {}-byte response {} arrived",
                    buf.len(),
                    part
                )))
            }
            Err(e) => Err(TrackerError::Connection(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{build_frame, TrackerCommand, DEFAULT_MAX_BODY_SIZE};
    use tokio::io::duplex;

    /// Reply to one request with `response` and hand back the request bytes.
    async fn serve_once(
        mut server: tokio::io::DuplexStream,
        request_len: usize,
        response: Vec<u8>,
    ) -> Vec<u8> {
        let mut request = vec![0u8; request_len];
        server.read_exact(&mut request).await.unwrap();
        server.write_all(&response).await.unwrap();
        request
    }

    #[tokio::test]
    async fn test_call_roundtrip() {
        let (mut client, server) = duplex(4096);
        let response = build_frame(&Header::new(3, TRACKER_PROTO_CMD_RESP, 0), b"abc");
        let server_task = tokio::spawn(serve_once(server, HEADER_SIZE + 16, response));

        let request = Request::new(TrackerCommand::ListOneGroup)
            .group_name("group1")
            .unwrap();
        let mut session = Session::new(&mut client, DEFAULT_MAX_BODY_SIZE);
        let frame = session.call(&request).await.unwrap();

        assert_eq!(frame.body(), b"abc");
        assert_eq!(frame.declared_len(), 3);
        assert!(session.is_at_frame_boundary());

        let sent = server_task.await.unwrap();
        let header = Header::decode(&sent[..HEADER_SIZE]).unwrap();
        assert_eq!(header.body_length, 16);
        assert_eq!(header.command, TrackerCommand::ListOneGroup.code());
        assert_eq!(&sent[HEADER_SIZE..HEADER_SIZE + 6], b"group1");
    }

    #[tokio::test]
    async fn test_remote_status_skips_body() {
        let (mut client, server) = duplex(4096);
        let response = Header::new(0, TRACKER_PROTO_CMD_RESP, 2).encode().to_vec();
        let _server = tokio::spawn(serve_once(server, HEADER_SIZE, response));

        let request = Request::new(TrackerCommand::QueryStoreWithoutGroupOne);
        let mut session = Session::new(&mut client, DEFAULT_MAX_BODY_SIZE);
        let err = session.call(&request).await.unwrap_err();

        assert!(matches!(err, TrackerError::Remote(2)));
        assert!(session.is_at_frame_boundary());
    }

    #[tokio::test]
    async fn test_remote_status_with_body_marks_connection_dirty() {
        let (mut client, server) = duplex(4096);
        let mut response = Header::new(4, TRACKER_PROTO_CMD_RESP, 22).encode().to_vec();
        response.extend_from_slice(b"junk");
        let _server = tokio::spawn(serve_once(server, HEADER_SIZE, response));

        let request = Request::new(TrackerCommand::ListAllGroups);
        let mut session = Session::new(&mut client, DEFAULT_MAX_BODY_SIZE);
        let err = session.call(&request).await.unwrap_err();

        assert!(matches!(err, TrackerError::Remote(22)));
        assert!(!session.is_at_frame_boundary());
    }

    #[tokio::test]
    async fn test_header_only_response_is_protocol_error() {
        let (mut client, server) = duplex(4096);
        let response = Header::new(40, TRACKER_PROTO_CMD_RESP, 0).encode().to_vec();
        // Server drops its end after the header.
        let _server = tokio::spawn(serve_once(server, HEADER_SIZE, response));

        let request = Request::new(TrackerCommand::QueryStoreWithoutGroupOne);
        let mut session = Session::new(&mut client, DEFAULT_MAX_BODY_SIZE);
        let err = session.call(&request).await.unwrap_err();

        assert!(matches!(err, TrackerError::Protocol(_)));
        assert!(err.to_string().contains("body"));
        assert!(!session.is_at_frame_boundary());
    }

    #[tokio::test]
    async fn test_short_header_is_protocol_error() {
        let (mut client, server) = duplex(4096);
        let _server = tokio::spawn(serve_once(server, HEADER_SIZE, vec![0, 0, 0]));

        let request = Request::new(TrackerCommand::ListAllGroups);
        let mut session = Session::new(&mut client, DEFAULT_MAX_BODY_SIZE);
        let err = session.call(&request).await.unwrap_err();

        assert!(matches!(err, TrackerError::Protocol(_)));
        assert!(err.to_string().contains("header"));
    }

    #[tokio::test]
    async fn test_unexpected_response_command() {
        let (mut client, server) = duplex(4096);
        let response = Header::new(0, 91, 0).encode().to_vec();
        let _server = tokio::spawn(serve_once(server, HEADER_SIZE, response));

        let request = Request::new(TrackerCommand::ListAllGroups);
        let mut session = Session::new(&mut client, DEFAULT_MAX_BODY_SIZE);
        let err = session.call(&request).await.unwrap_err();

        assert!(matches!(err, TrackerError::Protocol(_)));
        assert!(!session.is_at_frame_boundary());
    }

    #[tokio::test]
    async fn test_body_over_limit_rejected() {
        let (mut client, server) = duplex(4096);
        let response = Header::new(1 << 40, TRACKER_PROTO_CMD_RESP, 0).encode().to_vec();
        let _server = tokio::spawn(serve_once(server, HEADER_SIZE, response));

        let request = Request::new(TrackerCommand::ListAllGroups);
        let mut session = Session::new(&mut client, 1024);
        let err = session.call(&request).await.unwrap_err();

        assert!(err.to_string().contains("exceeds maximum"));
    }

    #[tokio::test]
    async fn test_write_to_closed_connection() {
        let (mut client, server) = duplex(64);
        drop(server);

        let request = Request::new(TrackerCommand::ActiveTest);
        let mut session = Session::new(&mut client, DEFAULT_MAX_BODY_SIZE);
        let err = session.call(&request).await.unwrap_err();

        assert!(matches!(err, TrackerError::Connection(_)));
        assert!(!session.is_at_frame_boundary());
    }
}
