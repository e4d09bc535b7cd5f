//! # fdfs-tracker
//!
//! Async client for the FastDFS tracker binary protocol.
//!
//! The tracker answers routing questions: which groups exist, which storage
//! server to upload to, which servers hold a file. Every exchange is one
//! framed request and one framed response over a pooled connection.
//!
//! ## Architecture
//!
//! - **Protocol**: 10-byte header, command catalog, fixed-width fields
//! - **Codec**: static per-command body shapes; list counts recovered from the
//!   declared body length
//! - **Session**: one request/response over a borrowed connection
//! - **Tracker**: one method per command
//! - **Transport**: the connection source boundary plus a minimal TCP pool
//!
//! ## Example
//!
//! ```ignore
//! use fdfs_tracker::config::PoolConfig;
//! use fdfs_tracker::transport::TcpPool;
//! use fdfs_tracker::Tracker;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tracker = Tracker::new(TcpPool::new("10.0.0.5:22122", PoolConfig::default()));
//!
//!     for group in tracker.list_groups().await? {
//!         println!("{}: {} MB free", group.name, group.free_disk_mb);
//!     }
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod protocol;
pub mod session;
pub mod transport;
pub mod types;

mod tracker;

pub use error::{Result, TrackerError};
pub use tracker::Tracker;
pub use types::{BasicStorageDescriptor, GroupDescriptor, StorageDescriptor, StorageStatus};
