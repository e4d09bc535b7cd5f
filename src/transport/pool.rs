//! Connection source boundary and the per-call lease guard.
//!
//! The pool itself is a collaborator: anything that can hand out a ready
//! connection, take it back healthy, or take it back broken implements
//! [`ConnectionSource`]. [`Lease`] makes sure every borrowed connection is
//! returned exactly once, on every exit path.

use std::future::Future;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::Result;

/// A source of tracker connections.
///
/// A connection handed out by `acquire` is owned by the caller until it is
/// passed back through `release` or `discard`, so it never carries two
/// requests at once.
pub trait ConnectionSource: Send + Sync {
    /// Connection type handed out by this source.
    type Connection: AsyncRead + AsyncWrite + Unpin + Send;

    /// Borrow a ready connection.
    fn acquire(&self) -> impl Future<Output = Result<Self::Connection>> + Send;

    /// Return a connection that sits at a frame boundary.
    fn release(&self, conn: Self::Connection);

    /// Return a connection that must not be reused.
    fn discard(&self, conn: Self::Connection);
}

/// A connection borrowed from a [`ConnectionSource`] for one call.
///
/// Dropping a lease without calling [`Lease::release`] discards the
/// connection, which covers early returns and cancelled futures.
pub struct Lease<'s, S: ConnectionSource> {
    source: &'s S,
    conn: Option<S::Connection>,
}

impl<'s, S: ConnectionSource> Lease<'s, S> {
    /// Borrow a connection from `source`.
    pub async fn acquire(source: &'s S) -> Result<Self> {
        let conn = source.acquire().await?;
        Ok(Self {
            source,
            conn: Some(conn),
        })
    }

    /// The borrowed connection.
    pub fn conn(&mut self) -> &mut S::Connection {
        self.conn
            .as_mut()
            .expect("lease holds its connection until consumed")
    }

    /// Give the connection back as healthy.
    pub fn release(mut self) {
        if let Some(conn) = self.conn.take() {
            self.source.release(conn);
        }
    }

    /// Give the connection back as broken.
    pub fn discard(mut self) {
        if let Some(conn) = self.conn.take() {
            self.source.discard(conn);
        }
    }

    /// Release when `healthy`, discard otherwise.
    pub fn finish(self, healthy: bool) {
        if healthy {
            self.release();
        } else {
            self.discard();
        }
    }
}

impl<S: ConnectionSource> Drop for Lease<'_, S> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            tracing::warn!("Connection lease dropped mid-call, discarding connection");
            self.source.discard(conn);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{duplex, DuplexStream};

    #[derive(Default)]
    struct CountingSource {
        released: AtomicUsize,
        discarded: AtomicUsize,
    }

    impl ConnectionSource for CountingSource {
        type Connection = DuplexStream;

        async fn acquire(&self) -> Result<DuplexStream> {
            let (client, _server) = duplex(64);
            Ok(client)
        }

        fn release(&self, _conn: DuplexStream) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }

        fn discard(&self, _conn: DuplexStream) {
            self.discarded.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_release() {
        let source = CountingSource::default();
        let lease = Lease::acquire(&source).await.unwrap();
        lease.release();

        assert_eq!(source.released.load(Ordering::SeqCst), 1);
        assert_eq!(source.discarded.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_finish_unhealthy_discards() {
        let source = CountingSource::default();
        let lease = Lease::acquire(&source).await.unwrap();
        lease.finish(false);

        assert_eq!(source.released.load(Ordering::SeqCst), 0);
        assert_eq!(source.discarded.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drop_discards() {
        let source = CountingSource::default();
        {
            let mut lease = Lease::acquire(&source).await.unwrap();
            let _ = lease.conn();
        }

        assert_eq!(source.released.load(Ordering::SeqCst), 0);
        assert_eq!(source.discarded.load(Ordering::SeqCst), 1);
    }
}
