//! Tracker command codes and fixed field widths.

/// Width of a group name field.
pub const GROUP_NAME_MAX_LEN: usize = 16;

/// Width of an IP address field.
pub const IP_ADDRESS_SIZE: usize = 15;

/// Width of a storage server id field.
pub const STORAGE_ID_MAX_SIZE: usize = 16;

/// Width of a domain name field.
pub const DOMAIN_NAME_MAX_SIZE: usize = 128;

/// Width of a storage server version field.
pub const VERSION_SIZE: usize = 6;

/// Command code the tracker puts on every response header.
pub const TRACKER_PROTO_CMD_RESP: u8 = 100;

/// Commands understood by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TrackerCommand {
    /// Describe one group.
    ListOneGroup = 90,
    /// Describe every group.
    ListAllGroups = 91,
    /// Describe the storage servers of a group.
    ListStorage = 92,
    /// Pick an upload target in any group.
    QueryStoreWithoutGroupOne = 101,
    /// Pick a download source for a file.
    QueryFetchOne = 102,
    /// Pick the server to update (append, modify, delete) a file on.
    QueryUpdate = 103,
    /// Pick an upload target in a given group.
    QueryStoreWithGroupOne = 104,
    /// List every download source for a file.
    QueryFetchAll = 105,
    /// List every upload target in the group chosen by the tracker.
    QueryStoreWithoutGroupAll = 106,
    /// List every upload target in a given group.
    QueryStoreWithGroupAll = 107,
    /// Liveness probe.
    ActiveTest = 111,
}

impl TrackerCommand {
    /// Wire code for this command.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Short name used in log output.
    pub fn name(self) -> &'static str {
        match self {
            TrackerCommand::ListOneGroup => "list_one_group",
            TrackerCommand::ListAllGroups => "list_all_groups",
            TrackerCommand::ListStorage => "list_storage",
            TrackerCommand::QueryStoreWithoutGroupOne => "query_store_without_group_one",
            TrackerCommand::QueryFetchOne => "query_fetch_one",
            TrackerCommand::QueryUpdate => "query_update",
            TrackerCommand::QueryStoreWithGroupOne => "query_store_with_group_one",
            TrackerCommand::QueryFetchAll => "query_fetch_all",
            TrackerCommand::QueryStoreWithoutGroupAll => "query_store_without_group_all",
            TrackerCommand::QueryStoreWithGroupAll => "query_store_with_group_all",
            TrackerCommand::ActiveTest => "active_test",
        }
    }
}
