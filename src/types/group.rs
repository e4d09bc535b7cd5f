//! Group descriptor returned by the group listing commands.

use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::protocol::{put_fixed, FieldReader, GROUP_NAME_MAX_LEN, PKG_LEN_SIZE};

/// Number of u64 counters following the group name.
const COUNTER_FIELDS: usize = 15;

/// Capacity and traffic accounting for one group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDescriptor {
    pub name: String,
    pub total_disk_mb: u64,
    pub free_disk_mb: u64,
    pub trunk_free_mb: u64,
    pub total_storage_count: u64,
    pub storage_port: u64,
    pub storage_http_port: u64,
    pub active_storage_count: u64,
    /// Index of the storage server currently receiving uploads.
    pub current_write_server: u64,
    pub store_path_count: u64,
    pub subdir_count_per_path: u64,
    pub current_trunk_file_id: u64,
    pub total_upload_count: u64,
    pub success_upload_count: u64,
    pub total_download_count: u64,
    pub success_download_count: u64,
}

impl GroupDescriptor {
    /// Encoded width of one group record.
    pub const WIDTH: usize = GROUP_NAME_MAX_LEN + COUNTER_FIELDS * PKG_LEN_SIZE;

    /// Decode one record, consuming exactly `WIDTH` bytes.
    pub fn decode(reader: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            name: reader.fixed_str(GROUP_NAME_MAX_LEN)?,
            total_disk_mb: reader.u64()?,
            free_disk_mb: reader.u64()?,
            trunk_free_mb: reader.u64()?,
            total_storage_count: reader.u64()?,
            storage_port: reader.u64()?,
            storage_http_port: reader.u64()?,
            active_storage_count: reader.u64()?,
            current_write_server: reader.u64()?,
            store_path_count: reader.u64()?,
            subdir_count_per_path: reader.u64()?,
            current_trunk_file_id: reader.u64()?,
            total_upload_count: reader.u64()?,
            success_upload_count: reader.u64()?,
            total_download_count: reader.u64()?,
            success_download_count: reader.u64()?,
        })
    }

    /// Encode this record in its wire layout.
    pub fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        put_fixed(buf, "group name", self.name.as_bytes(), GROUP_NAME_MAX_LEN)?;
        for value in [
            self.total_disk_mb,
            self.free_disk_mb,
            self.trunk_free_mb,
            self.total_storage_count,
            self.storage_port,
            self.storage_http_port,
            self.active_storage_count,
            self.current_write_server,
            self.store_path_count,
            self.subdir_count_per_path,
            self.current_trunk_file_id,
            self.total_upload_count,
            self.success_upload_count,
            self.total_download_count,
            self.success_download_count,
        ] {
            buf.put_u64(value);
        }
        Ok(())
    }
}
