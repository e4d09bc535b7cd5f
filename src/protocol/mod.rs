//! Protocol module - header format, command catalog, body fields and frames.
//!
//! This module implements the tracker's binary framing:
//! - 10-byte header encoding/decoding
//! - Command codes and fixed field widths
//! - NUL-padded fixed-width fields
//! - Request builder and response frame

mod command;
mod field;
mod frame;
mod wire_format;

pub use command::{
    TrackerCommand, DOMAIN_NAME_MAX_SIZE, GROUP_NAME_MAX_LEN, IP_ADDRESS_SIZE,
    STORAGE_ID_MAX_SIZE, TRACKER_PROTO_CMD_RESP, VERSION_SIZE,
};
pub use field::{put_fixed, trim_fixed, FieldReader};
pub use frame::{build_frame, Frame, Request};
pub use wire_format::{Header, DEFAULT_MAX_BODY_SIZE, HEADER_SIZE, PKG_LEN_SIZE, STATUS_OK};
