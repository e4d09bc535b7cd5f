//! Storage server descriptor returned by the storage listing command.
//!
//! The listing is scoped to one group and the wire records do not repeat the
//! group name, so decoding takes it from the caller.

use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::protocol::{
    put_fixed, FieldReader, DOMAIN_NAME_MAX_SIZE, IP_ADDRESS_SIZE, PKG_LEN_SIZE,
    STORAGE_ID_MAX_SIZE, VERSION_SIZE,
};

/// Number of u64 counters in a storage record.
const COUNTER_FIELDS: usize = 21;

/// Lifecycle state of a storage server as seen by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageStatus {
    Init,
    WaitSync,
    Syncing,
    IpChanged,
    Deleted,
    Offline,
    Online,
    Active,
    Recovery,
    None,
    /// A code this client does not know.
    Other(u8),
}

impl StorageStatus {
    /// Map a wire status byte.
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => StorageStatus::Init,
            1 => StorageStatus::WaitSync,
            2 => StorageStatus::Syncing,
            3 => StorageStatus::IpChanged,
            4 => StorageStatus::Deleted,
            5 => StorageStatus::Offline,
            6 => StorageStatus::Online,
            7 => StorageStatus::Active,
            9 => StorageStatus::Recovery,
            99 => StorageStatus::None,
            other => StorageStatus::Other(other),
        }
    }

    /// Wire status byte.
    pub fn code(self) -> u8 {
        match self {
            StorageStatus::Init => 0,
            StorageStatus::WaitSync => 1,
            StorageStatus::Syncing => 2,
            StorageStatus::IpChanged => 3,
            StorageStatus::Deleted => 4,
            StorageStatus::Offline => 5,
            StorageStatus::Online => 6,
            StorageStatus::Active => 7,
            StorageStatus::Recovery => 9,
            StorageStatus::None => 99,
            StorageStatus::Other(code) => code,
        }
    }
}

/// One storage server within a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDescriptor {
    /// Group the listing was requested for.
    pub group: String,
    pub status: StorageStatus,
    pub id: String,
    pub ip_addr: String,
    pub domain_name: String,
    /// Server this one synchronizes from.
    pub src_ip_addr: String,
    pub version: String,
    pub join_time: u64,
    pub up_time: u64,
    pub total_mb: u64,
    pub free_mb: u64,
    pub upload_priority: u64,
    pub store_path_count: u64,
    pub subdir_count_per_path: u64,
    pub current_write_path: u64,
    pub storage_port: u64,
    pub storage_http_port: u64,
    pub total_upload_count: u64,
    pub success_upload_count: u64,
    pub total_delete_count: u64,
    pub success_delete_count: u64,
    pub total_download_count: u64,
    pub success_download_count: u64,
    pub total_upload_bytes: u64,
    pub success_upload_bytes: u64,
    pub total_download_bytes: u64,
    pub success_download_bytes: u64,
    pub last_heart_beat_time: u64,
    pub is_trunk_server: bool,
}

impl StorageDescriptor {
    /// Encoded width of one storage record (group name excluded).
    pub const WIDTH: usize = 1
        + STORAGE_ID_MAX_SIZE
        + IP_ADDRESS_SIZE
        + DOMAIN_NAME_MAX_SIZE
        + IP_ADDRESS_SIZE
        + VERSION_SIZE
        + COUNTER_FIELDS * PKG_LEN_SIZE
        + 1;

    /// Decode one record listed under `group`, consuming exactly `WIDTH` bytes.
    pub fn decode(group: &str, reader: &mut FieldReader<'_>) -> Result<Self> {
        Ok(Self {
            group: group.to_string(),
            status: StorageStatus::from_code(reader.u8()?),
            id: reader.fixed_str(STORAGE_ID_MAX_SIZE)?,
            ip_addr: reader.fixed_str(IP_ADDRESS_SIZE)?,
            domain_name: reader.fixed_str(DOMAIN_NAME_MAX_SIZE)?,
            src_ip_addr: reader.fixed_str(IP_ADDRESS_SIZE)?,
            version: reader.fixed_str(VERSION_SIZE)?,
            join_time: reader.u64()?,
            up_time: reader.u64()?,
            total_mb: reader.u64()?,
            free_mb: reader.u64()?,
            upload_priority: reader.u64()?,
            store_path_count: reader.u64()?,
            subdir_count_per_path: reader.u64()?,
            current_write_path: reader.u64()?,
            storage_port: reader.u64()?,
            storage_http_port: reader.u64()?,
            total_upload_count: reader.u64()?,
            success_upload_count: reader.u64()?,
            total_delete_count: reader.u64()?,
            success_delete_count: reader.u64()?,
            total_download_count: reader.u64()?,
            success_download_count: reader.u64()?,
            total_upload_bytes: reader.u64()?,
            success_upload_bytes: reader.u64()?,
            total_download_bytes: reader.u64()?,
            success_download_bytes: reader.u64()?,
            last_heart_beat_time: reader.u64()?,
            is_trunk_server: reader.u8()? != 0,
        })
    }

    /// Encode this record in its wire layout. The group name is not written.
    pub fn encode(&self, buf: &mut BytesMut) -> Result<()> {
        buf.put_u8(self.status.code());
        put_fixed(buf, "storage id", self.id.as_bytes(), STORAGE_ID_MAX_SIZE)?;
        put_fixed(buf, "ip address", self.ip_addr.as_bytes(), IP_ADDRESS_SIZE)?;
        put_fixed(buf, "domain name", self.domain_name.as_bytes(), DOMAIN_NAME_MAX_SIZE)?;
        put_fixed(buf, "source ip address", self.src_ip_addr.as_bytes(), IP_ADDRESS_SIZE)?;
        put_fixed(buf, "version", self.version.as_bytes(), VERSION_SIZE)?;
        for value in [
            self.join_time,
            self.up_time,
            self.total_mb,
            self.free_mb,
            self.upload_priority,
            self.store_path_count,
            self.subdir_count_per_path,
            self.current_write_path,
            self.storage_port,
            self.storage_http_port,
            self.total_upload_count,
            self.success_upload_count,
            self.total_delete_count,
            self.success_delete_count,
            self.total_download_count,
            self.success_download_count,
            self.total_upload_bytes,
            self.success_upload_bytes,
            self.total_download_bytes,
            self.success_download_bytes,
            self.last_heart_beat_time,
        ] {
            buf.put_u64(value);
        }
        buf.put_u8(u8::from(self.is_trunk_server));
        Ok(())
    }

    /// Check if the tracker considers this server able to serve requests.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == StorageStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample(id: &str, ip: &str) -> StorageDescriptor {
        StorageDescriptor {
            group: "group1".to_string(),
            status: StorageStatus::Active,
            id: id.to_string(),
            ip_addr: ip.to_string(),
            domain_name: String::new(),
            src_ip_addr: String::new(),
            version: "6.12".to_string(),
            join_time: 1_700_000_000,
            up_time: 1_700_000_100,
            total_mb: 200_000,
            free_mb: 150_000,
            upload_priority: 10,
            store_path_count: 1,
            subdir_count_per_path: 256,
            current_write_path: 0,
            storage_port: 23000,
            storage_http_port: 8888,
            total_upload_count: 10,
            success_upload_count: 10,
            total_delete_count: 2,
            success_delete_count: 2,
            total_download_count: 40,
            success_download_count: 39,
            total_upload_bytes: 1 << 20,
            success_upload_bytes: 1 << 20,
            total_download_bytes: 4 << 20,
            success_download_bytes: 4 << 20,
            last_heart_beat_time: 1_700_000_200,
            is_trunk_server: false,
        }
    }

    #[test]
    fn test_width() {
        assert_eq!(StorageDescriptor::WIDTH, 350);
    }

    #[test]
    fn test_roundtrip() {
        let storage = sample("100001", "192.168.1.10");
        let mut buf = BytesMut::new();
        storage.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), StorageDescriptor::WIDTH);

        let mut reader = FieldReader::new(&buf);
        let decoded = StorageDescriptor::decode("group1", &mut reader).unwrap();
        assert_eq!(decoded, storage);
        reader.finish().unwrap();
    }

    #[test]
    fn test_roundtrip_full_width_fields() {
        let mut storage = sample("abcdefghijklmnop", "255.255.255.255");
        storage.is_trunk_server = true;
        storage.status = StorageStatus::Other(42);

        let mut buf = BytesMut::new();
        storage.encode(&mut buf).unwrap();
        let mut reader = FieldReader::new(&buf);
        assert_eq!(StorageDescriptor::decode("group1", &mut reader).unwrap(), storage);
    }

    #[test]
    fn test_group_comes_from_caller() {
        let mut buf = BytesMut::new();
        sample("1", "10.0.0.1").encode(&mut buf).unwrap();

        let mut reader = FieldReader::new(&buf);
        let decoded = StorageDescriptor::decode("other", &mut reader).unwrap();
        assert_eq!(decoded.group, "other");
    }

    #[test]
    fn test_status_codes() {
        for code in [0u8, 1, 2, 3, 4, 5, 6, 7, 9, 99, 8, 200] {
            assert_eq!(StorageStatus::from_code(code).code(), code);
        }
        assert_eq!(StorageStatus::from_code(7), StorageStatus::Active);
        assert!(sample("1", "10.0.0.1").is_active());
    }

    proptest! {
        #[test]
        fn prop_roundtrip(
            status in any::<u8>(),
            id in "[a-zA-Z0-9]{0,16}",
            ip_addr in "[0-9.]{0,15}",
            domain_name in "[a-z0-9.-]{0,128}",
            src_ip_addr in "[0-9.]{0,15}",
            version in "[0-9.]{0,6}",
            c in proptest::array::uniform21(any::<u64>()),
            is_trunk_server in any::<bool>(),
        ) {
            let storage = StorageDescriptor {
                group: "group1".to_string(),
                status: StorageStatus::from_code(status),
                id,
                ip_addr,
                domain_name,
                src_ip_addr,
                version,
                join_time: c[0],
                up_time: c[1],
                total_mb: c[2],
                free_mb: c[3],
                upload_priority: c[4],
                store_path_count: c[5],
                subdir_count_per_path: c[6],
                current_write_path: c[7],
                storage_port: c[8],
                storage_http_port: c[9],
                total_upload_count: c[10],
                success_upload_count: c[11],
                total_delete_count: c[12],
                success_delete_count: c[13],
                total_download_count: c[14],
                success_download_count: c[15],
                total_upload_bytes: c[16],
                success_upload_bytes: c[17],
                total_download_bytes: c[18],
                success_download_bytes: c[19],
                last_heart_beat_time: c[20],
                is_trunk_server,
            };
            let mut buf = BytesMut::new();
            storage.encode(&mut buf).unwrap();
            prop_assert_eq!(buf.len(), StorageDescriptor::WIDTH);

            let mut reader = FieldReader::new(&buf);
            prop_assert_eq!(StorageDescriptor::decode("group1", &mut reader).unwrap(), storage);
            prop_assert!(reader.finish().is_ok());
        }
    }
}
