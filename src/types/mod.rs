//! Wire types - fixed-layout records decoded from tracker responses.
//!
//! - [`GroupDescriptor`] - one group and its capacity accounting
//! - [`StorageDescriptor`] - one storage server within a group
//! - [`BasicStorageDescriptor`] - address answer of store and fetch queries

mod basic;
mod group;
mod storage;

pub use basic::BasicStorageDescriptor;
pub use group::GroupDescriptor;
pub use storage::{StorageDescriptor, StorageStatus};
