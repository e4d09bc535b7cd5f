//! Codec module - response body decoding.
//!
//! - [`shape`] - static record-shape descriptors, one per command
//! - [`ListBody`] / [`decode_one`] - split and decode bodies against a shape
//!
//! # Design
//!
//! List responses do not carry a record count. The count is recovered from
//! the declared body length and the command's shape; a length that does not
//! divide exactly is a protocol error.
//!
//! # Example
//!
//! ```
//! use fdfs_tracker::codec::{ListBody, ListShape};
//!
//! // one shared byte, then 2-byte records
//! let shape = ListShape::row_major(1, 2, 0);
//! let body = b"Xabcd";
//!
//! let list = ListBody::split(body, 5, &shape).unwrap();
//! assert_eq!(list.len(), 2);
//! ```

mod body;
pub mod shape;

pub use body::{decode_one, ListBody};
pub use shape::{Layout, ListShape, RecordShape};
