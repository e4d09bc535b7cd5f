//! Tracker operations.
//!
//! One method per tracker command. Each call builds its request, borrows a
//! connection for a single [`Session`], and decodes the body with the
//! command's shape from [`crate::codec::shape`]. Nothing is retried or cached.
//!
//! # Example
//!
//! ```ignore
//! use fdfs_tracker::config::PoolConfig;
//! use fdfs_tracker::transport::TcpPool;
//! use fdfs_tracker::Tracker;
//!
//! let tracker = Tracker::new(TcpPool::new("10.0.0.5:22122", PoolConfig::default()));
//!
//! let target = tracker.query_store_without_group_one().await?;
//! println!("upload to {} path {:?}", target.socket_addr(), target.store_path_index);
//! ```

use crate::codec::shape::{
    FETCH_ALL, FETCH_ONE, GROUP_LIST, GROUP_ONE, STORAGE_LIST, STORE_ALL, STORE_ONE,
};
use crate::codec::{decode_one, ListBody};
use crate::config::TrackerConfig;
use crate::error::{Result, TrackerError};
use crate::protocol::{Frame, Request, TrackerCommand, GROUP_NAME_MAX_LEN, IP_ADDRESS_SIZE};
use crate::session::Session;
use crate::transport::{ConnectionSource, Lease};
use crate::types::{BasicStorageDescriptor, GroupDescriptor, StorageDescriptor};

/// Client for one tracker, reached through a [`ConnectionSource`].
///
/// Methods take `&self`; concurrent calls each borrow their own connection.
pub struct Tracker<S> {
    source: S,
    config: TrackerConfig,
}

impl<S: ConnectionSource> Tracker<S> {
    /// Create a tracker client with default configuration.
    pub fn new(source: S) -> Self {
        Self::with_config(source, TrackerConfig::default())
    }

    /// Create a tracker client with the given configuration.
    pub fn with_config(source: S, config: TrackerConfig) -> Self {
        Self { source, config }
    }

    /// The connection source calls borrow from.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Active configuration.
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// List every group known to the tracker.
    pub async fn list_groups(&self) -> Result<Vec<GroupDescriptor>> {
        self.call(Request::new(TrackerCommand::ListAllGroups), |frame| {
            ListBody::split(frame.body(), frame.declared_len(), &GROUP_LIST)?
                .decode_rows(GroupDescriptor::decode)
        })
        .await
    }

    /// Describe one group.
    pub async fn list_one_group(&self, group_name: &str) -> Result<GroupDescriptor> {
        let request = Request::new(TrackerCommand::ListOneGroup).group_name(group_name)?;
        self.call(request, |frame| {
            decode_one(
                frame.body(),
                frame.declared_len(),
                &GROUP_ONE,
                GroupDescriptor::decode,
            )
        })
        .await
    }

    /// List the storage servers of a group, optionally only the one at
    /// `storage_ip`.
    pub async fn list_servers(
        &self,
        group_name: &str,
        storage_ip: Option<&str>,
    ) -> Result<Vec<StorageDescriptor>> {
        let mut request = Request::new(TrackerCommand::ListStorage).group_name(group_name)?;
        if let Some(ip) = storage_ip {
            request = request.ip_addr(ip)?;
        }
        self.call(request, |frame| {
            ListBody::split(frame.body(), frame.declared_len(), &STORAGE_LIST)?
                .decode_rows(|row| StorageDescriptor::decode(group_name, row))
        })
        .await
    }

    /// Pick an upload target in any group.
    pub async fn query_store_without_group_one(&self) -> Result<BasicStorageDescriptor> {
        self.call(
            Request::new(TrackerCommand::QueryStoreWithoutGroupOne),
            decode_store_one,
        )
        .await
    }

    /// Pick an upload target in `group_name`.
    pub async fn query_store_with_group_one(
        &self,
        group_name: &str,
    ) -> Result<BasicStorageDescriptor> {
        let request =
            Request::new(TrackerCommand::QueryStoreWithGroupOne).group_name(group_name)?;
        self.call(request, decode_store_one).await
    }

    /// List every upload target in the group the tracker picks.
    pub async fn query_store_without_group_all(&self) -> Result<Vec<BasicStorageDescriptor>> {
        self.call(
            Request::new(TrackerCommand::QueryStoreWithoutGroupAll),
            decode_store_all,
        )
        .await
    }

    /// List every upload target in `group_name`.
    pub async fn query_store_with_group_all(
        &self,
        group_name: &str,
    ) -> Result<Vec<BasicStorageDescriptor>> {
        let request =
            Request::new(TrackerCommand::QueryStoreWithGroupAll).group_name(group_name)?;
        self.call(request, decode_store_all).await
    }

    /// Pick a server to download `file_name` from.
    pub async fn query_fetch_one(
        &self,
        group_name: &str,
        file_name: &str,
    ) -> Result<BasicStorageDescriptor> {
        self.query_file_one(TrackerCommand::QueryFetchOne, group_name, file_name)
            .await
    }

    /// Pick the server holding the source copy of `file_name`, for appends,
    /// modifications and deletes.
    pub async fn query_update(
        &self,
        group_name: &str,
        file_name: &str,
    ) -> Result<BasicStorageDescriptor> {
        self.query_file_one(TrackerCommand::QueryUpdate, group_name, file_name)
            .await
    }

    /// List every server `file_name` can be downloaded from.
    ///
    /// The first entry is the server the tracker would answer with for
    /// [`query_fetch_one`](Self::query_fetch_one); all entries share its port.
    pub async fn query_fetch_all(
        &self,
        group_name: &str,
        file_name: &str,
    ) -> Result<Vec<BasicStorageDescriptor>> {
        let request = Request::new(TrackerCommand::QueryFetchAll)
            .group_name(group_name)?
            .file_name(file_name)?;
        self.call(request, decode_fetch_all).await
    }

    /// Check that the tracker answers on a fresh connection.
    pub async fn active_test(&self) -> Result<()> {
        self.call(Request::new(TrackerCommand::ActiveTest), |frame| {
            if frame.declared_len() != 0 {
                return Err(TrackerError::Protocol(format!(
                    "Active test expects an empty body, got {} bytes",
                    frame.declared_len()
                )));
            }
            Ok(())
        })
        .await
    }

    async fn query_file_one(
        &self,
        command: TrackerCommand,
        group_name: &str,
        file_name: &str,
    ) -> Result<BasicStorageDescriptor> {
        let request = Request::new(command)
            .group_name(group_name)?
            .file_name(file_name)?;
        self.call(request, |frame| {
            decode_one(
                frame.body(),
                frame.declared_len(),
                &FETCH_ONE,
                BasicStorageDescriptor::decode_fetch,
            )
        })
        .await
    }

    /// One round trip on a leased connection, decoded by `decode`.
    ///
    /// The lease is settled after decoding. The connection goes back to the
    /// source as healthy only if the session ended on a frame boundary and
    /// the outcome is a success or an error that leaves it reusable.
    async fn call<T, F>(&self, request: Request, decode: F) -> Result<T>
    where
        F: FnOnce(&Frame) -> Result<T>,
    {
        let mut lease = Lease::acquire(&self.source).await?;
        let command = request.command();

        let (frame, at_boundary) = {
            let mut session = Session::new(lease.conn(), self.config.max_body_size);
            let frame = match self.config.network_timeout() {
                Some(limit) => match tokio::time::timeout(limit, session.call(&request)).await {
                    Ok(frame) => frame,
                    Err(_) => Err(TrackerError::Connection(std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        format!("{} timed out after {:?}", command.name(), limit),
                    ))),
                },
                None => session.call(&request).await,
            };
            (frame, session.is_at_frame_boundary())
        };

        let result = frame.and_then(|frame| decode(&frame));
        let healthy = at_boundary
            && result
                .as_ref()
                .map_or_else(TrackerError::is_connection_reusable, |_| true);

        if !healthy {
            if let Err(e) = &result {
                tracing::warn!(
                    command = command.name(),
                    error = %e,
                    "Discarding tracker connection"
                );
            }
        }
        lease.finish(healthy);
        result
    }
}

fn decode_store_one(frame: &Frame) -> Result<BasicStorageDescriptor> {
    decode_one(
        frame.body(),
        frame.declared_len(),
        &STORE_ONE,
        BasicStorageDescriptor::decode_store,
    )
}

/// Group name, then all addresses, then all ports, then the path index.
fn decode_store_all(frame: &Frame) -> Result<Vec<BasicStorageDescriptor>> {
    let list = ListBody::split(frame.body(), frame.declared_len(), &STORE_ALL)?;
    let group = list.prefix().fixed_str(GROUP_NAME_MAX_LEN)?;
    let store_path_index = list.suffix().u8()?;

    list.decode_rows(|row| {
        Ok(BasicStorageDescriptor {
            group: group.clone(),
            ip_addr: row.fixed_str(IP_ADDRESS_SIZE)?,
            port: row.u64()?,
            store_path_index: Some(store_path_index),
        })
    })
}

/// Group, first address and shared port, then one address per further server.
fn decode_fetch_all(frame: &Frame) -> Result<Vec<BasicStorageDescriptor>> {
    let list = ListBody::split(frame.body(), frame.declared_len(), &FETCH_ALL)?;
    let mut prefix = list.prefix();
    let first = BasicStorageDescriptor::decode_fetch(&mut prefix)?;
    prefix.finish()?;

    let others = list.decode_rows(|row| {
        Ok(BasicStorageDescriptor {
            group: first.group.clone(),
            ip_addr: row.fixed_str(IP_ADDRESS_SIZE)?,
            port: first.port,
            store_path_index: None,
        })
    })?;
    let mut servers = Vec::with_capacity(others.len() + 1);
    servers.push(first);
    servers.extend(others);
    Ok(servers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Header, TRACKER_PROTO_CMD_RESP};
    use bytes::{BufMut, Bytes, BytesMut};

    fn frame(body: BytesMut) -> Frame {
        let header = Header::new(body.len() as u64, TRACKER_PROTO_CMD_RESP, 0);
        Frame::new(header, body.freeze())
    }

    fn field(value: &str, width: usize) -> Vec<u8> {
        let mut bytes = value.as_bytes().to_vec();
        bytes.resize(width, 0);
        bytes
    }

    #[test]
    fn test_decode_store_one() {
        let mut body = BytesMut::new();
        body.put_slice(&field("group1", GROUP_NAME_MAX_LEN));
        body.put_slice(&field("10.1.1.1", IP_ADDRESS_SIZE));
        body.put_u64(23000);
        body.put_u8(2);

        let target = decode_store_one(&frame(body)).unwrap();
        assert_eq!(target.socket_addr(), "10.1.1.1:23000");
        assert_eq!(target.store_path_index, Some(2));
    }

    #[test]
    fn test_decode_store_all_pairs_columns() {
        let mut body = BytesMut::new();
        body.put_slice(&field("g", GROUP_NAME_MAX_LEN));
        body.put_slice(&field("a", IP_ADDRESS_SIZE));
        body.put_slice(&field("b", IP_ADDRESS_SIZE));
        body.put_u64(1);
        body.put_u64(2);
        body.put_u8(9);

        let targets = decode_store_all(&frame(body)).unwrap();
        let pairs: Vec<_> = targets
            .iter()
            .map(|t| (t.ip_addr.as_str(), t.port))
            .collect();
        assert_eq!(pairs, [("a", 1), ("b", 2)]);
        assert!(targets.iter().all(|t| t.store_path_index == Some(9)));
    }

    #[test]
    fn test_decode_store_all_truncated_suffix() {
        let mut body = BytesMut::new();
        body.put_slice(&field("g", GROUP_NAME_MAX_LEN));
        body.put_slice(&field("a", IP_ADDRESS_SIZE));
        body.put_u64(1);

        let err = decode_store_all(&frame(body)).unwrap_err();
        assert!(matches!(err, TrackerError::Protocol(_)));
    }

    #[test]
    fn test_empty_frame_is_not_a_store_answer() {
        let empty = Frame::new(Header::new(0, TRACKER_PROTO_CMD_RESP, 0), Bytes::new());
        assert!(decode_store_one(&empty).is_err());
    }
}
