//! Minimal storage address returned by the store and fetch queries.

use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::protocol::{put_fixed, FieldReader, GROUP_NAME_MAX_LEN, IP_ADDRESS_SIZE, PKG_LEN_SIZE};

/// Where to upload to or download from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicStorageDescriptor {
    pub group: String,
    pub ip_addr: String,
    pub port: u64,
    /// Store path to write into. Only present on store queries.
    pub store_path_index: Option<u8>,
}

impl BasicStorageDescriptor {
    /// Width of a store query answer: group, address, port, path index.
    pub const STORE_WIDTH: usize = GROUP_NAME_MAX_LEN + IP_ADDRESS_SIZE + PKG_LEN_SIZE + 1;

    /// Width of a fetch query answer: group, address, port.
    pub const FETCH_WIDTH: usize = GROUP_NAME_MAX_LEN + IP_ADDRESS_SIZE + PKG_LEN_SIZE;

    /// Decode a store query answer (`STORE_WIDTH` bytes).
    pub fn decode_store(reader: &mut FieldReader<'_>) -> Result<Self> {
        let mut storage = Self::decode_fetch(reader)?;
        storage.store_path_index = Some(reader.u8()?);
        Ok(storage)
    }

    /// Decode a fetch query answer (`FETCH_WIDTH` bytes).
    pub fn decode_fetch(reader: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            group: reader.fixed_str(GROUP_NAME_MAX_LEN)?,
            ip_addr: reader.fixed_str(IP_ADDRESS_SIZE)?,
            port: reader.u64()?,
            store_path_index: None,
        })
    }

    /// Encode in the store layout when a path index is set, else the fetch layout.
    pub fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        put_fixed(buf, "group name", self.group.as_bytes(), GROUP_NAME_MAX_LEN)?;
        put_fixed(buf, "ip address", self.ip_addr.as_bytes(), IP_ADDRESS_SIZE)?;
        buf.put_u64(self.port);
        if let Some(index) = self.store_path_index {
            buf.put_u8(index);
        }
        Ok(())
    }

    /// `ip:port` string suitable for connecting to the storage server.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.ip_addr, self.port)
    }
}
