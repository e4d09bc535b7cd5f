//! Client configuration.
//!
//! Both configs deserialize from JSON with every field optional; missing
//! fields take the defaults below. Durations are given in milliseconds.
//!
//! ```
//! use fdfs_tracker::config::TrackerConfig;
//!
//! let config = TrackerConfig::from_json(r#"{ "network_timeout_ms": 3000 }"#).unwrap();
//! assert_eq!(config.network_timeout().unwrap().as_millis(), 3000);
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, TrackerError};
use crate::protocol::DEFAULT_MAX_BODY_SIZE;

/// Default connect timeout for new tracker connections.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of idle connections kept by [`TcpPool`](crate::transport::TcpPool).
pub const DEFAULT_MAX_IDLE: usize = 8;

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Settings for [`Tracker`](crate::Tracker) calls.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Largest response body accepted before reading it.
    pub max_body_size: u64,
    /// Upper bound for one request/response round trip. `None` leaves the
    /// deadline to the transport.
    pub network_timeout_ms: Option<u64>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            network_timeout_ms: None,
        }
    }
}

impl TrackerConfig {
    /// Parse from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TrackerError::Config(e.to_string()))
    }

    /// Set the largest accepted response body.
    pub fn max_body_size(mut self, size: u64) -> Self {
        self.max_body_size = size;
        self
    }

    /// Set the round-trip timeout.
    pub fn with_network_timeout(mut self, timeout: Duration) -> Self {
        self.network_timeout_ms = Some(millis(timeout));
        self
    }

    /// Round-trip timeout, if any.
    pub fn network_timeout(&self) -> Option<Duration> {
        self.network_timeout_ms.map(Duration::from_millis)
    }
}

/// Settings for [`TcpPool`](crate::transport::TcpPool).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Timeout for establishing a new connection. `None` waits indefinitely.
    pub connect_timeout_ms: Option<u64>,
    /// Idle connections kept for reuse; extra released connections are closed.
    pub max_idle: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: Some(millis(DEFAULT_CONNECT_TIMEOUT)),
            max_idle: DEFAULT_MAX_IDLE,
        }
    }
}

impl PoolConfig {
    /// Parse from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TrackerError::Config(e.to_string()))
    }

    /// Set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = Some(millis(timeout));
        self
    }

    /// Set the idle connection limit.
    pub fn max_idle(mut self, max_idle: usize) -> Self {
        self.max_idle = max_idle;
        self
    }

    /// Connect timeout, if any.
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }
}
