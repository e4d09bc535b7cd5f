//! Minimal TCP connection source.
//!
//! Keeps up to `max_idle` released streams and connects on demand. It does
//! not probe idle streams or reconnect in the background; a stream that went
//! stale while idle fails its next call and is discarded then.
//!
//! # Example
//!
//! ```ignore
//! use fdfs_tracker::config::PoolConfig;
//! use fdfs_tracker::transport::TcpPool;
//! use fdfs_tracker::Tracker;
//!
//! let pool = TcpPool::new("10.0.0.5:22122", PoolConfig::default());
//! let tracker = Tracker::new(pool);
//! let groups = tracker.list_groups().await?;
//! ```

use std::io;
use std::sync::Mutex;

use tokio::net::TcpStream;

use super::pool::ConnectionSource;
use crate::config::PoolConfig;
use crate::error::{Result, TrackerError};

/// Connection source dialing a single tracker address.
pub struct TcpPool {
    addr: String,
    config: PoolConfig,
    idle: Mutex<Vec<TcpStream>>,
}

impl TcpPool {
    /// Create a pool for the tracker at `addr` (`host:port`).
    pub fn new(addr: impl Into<String>, config: PoolConfig) -> Self {
        Self {
            addr: addr.into(),
            config,
            idle: Mutex::new(Vec::new()),
        }
    }

    /// Tracker address this pool dials.
    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Number of idle connections ready for reuse.
    pub fn idle_count(&self) -> usize {
        self.idle.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn pop_idle(&self) -> Option<TcpStream> {
        self.idle.lock().unwrap_or_else(|e| e.into_inner()).pop()
    }

    async fn connect(&self) -> Result<TcpStream> {
        let connect = TcpStream::connect(self.addr.as_str());
        let stream = match self.config.connect_timeout() {
            Some(limit) => tokio::time::timeout(limit, connect).await.map_err(|_| {
                TrackerError::Connection(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("connect to {} timed out after {:?}", self.addr, limit),
                ))
            })??,
            None => connect.await?,
        };
        stream.set_nodelay(true)?;
        tracing::debug!(addr = %self.addr, "Connected to tracker");
        Ok(stream)
    }
}

impl ConnectionSource for TcpPool {
    type Connection = TcpStream;

    async fn acquire(&self) -> Result<TcpStream> {
        if let Some(stream) = self.pop_idle() {
            return Ok(stream);
        }
        self.connect().await
    }

    fn release(&self, conn: TcpStream) {
        let mut idle = self.idle.lock().unwrap_or_else(|e| e.into_inner());
        if idle.len() < self.config.max_idle {
            idle.push(conn);
        }
    }

    fn discard(&self, conn: TcpStream) {
        tracing::debug!(addr = %self.addr, "Closing discarded tracker connection");
        drop(conn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn listener() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        (listener, addr)
    }

    #[tokio::test]
    async fn test_release_keeps_connection_for_reuse() {
        let (listener, addr) = listener().await;
        let pool = TcpPool::new(addr, PoolConfig::default());

        let conn = pool.acquire().await.unwrap();
        let (_accepted, _) = listener.accept().await.unwrap();
        let local = conn.local_addr().unwrap();
        pool.release(conn);
        assert_eq!(pool.idle_count(), 1);

        let again = pool.acquire().await.unwrap();
        assert_eq!(again.local_addr().unwrap(), local);
        assert_eq!(pool.idle_count(), 0);
    }

    #[tokio::test]
    async fn test_discard_does_not_keep_connection() {
        let (_listener, addr) = listener().await;
        let pool = TcpPool::new(addr, PoolConfig::default());

        let conn = pool.acquire().await.unwrap();
        pool.discard(conn);
        assert_eq!(pool.idle_count(), 0);
    }

    #[tokio::test]
    async fn test_idle_limit() {
        let (_listener, addr) = listener().await;
        let pool = TcpPool::new(addr, PoolConfig::default().max_idle(1));

        let first = pool.acquire().await.unwrap();
        let second = pool.acquire().await.unwrap();
        pool.release(first);
        pool.release(second);
        assert_eq!(pool.idle_count(), 1);
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let (listener, addr) = listener().await;
        drop(listener);

        let pool = TcpPool::new(addr, PoolConfig::default());
        let result = pool.acquire().await;
        assert!(matches!(result, Err(TrackerError::Connection(_))));
    }
}
