//! Transport module - where tracker connections come from.
//!
//! Provides:
//! - [`ConnectionSource`] - the pool boundary (acquire / release / discard)
//! - [`Lease`] - per-call guard returning the connection on every exit path
//! - [`TcpPool`] - a minimal TCP implementation

mod pool;
mod tcp;

pub use pool::{ConnectionSource, Lease};
pub use tcp::TcpPool;
