//! Static record-shape descriptors.
//!
//! Every response body is described by a shape built in `const` context, so a
//! malformed descriptor fails at compile time rather than on the wire.
//!
//! ```text
//! ┌────────┬──────────┬──────────┬─────┬──────────┬────────┐
//! │ prefix │ record 0 │ record 1 │ ... │ record N │ suffix │
//! └────────┴──────────┴──────────┴─────┴──────────┴────────┘
//! N = (declared - prefix - suffix) / record
//! ```

use crate::error::{Result, TrackerError};
use crate::protocol::{GROUP_NAME_MAX_LEN, IP_ADDRESS_SIZE, PKG_LEN_SIZE};
use crate::types::{BasicStorageDescriptor, GroupDescriptor, StorageDescriptor};

/// How per-record fields are arranged inside a list body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Records follow each other, fields of one record adjacent.
    RowMajor,
    /// One block per column, each block holding that field for every record
    /// in record order. The slice lists the column widths in wire order.
    ColumnMajor(&'static [usize]),
}

/// Shape of a body holding exactly one fixed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordShape {
    pub width: usize,
}

impl RecordShape {
    pub const fn new(width: usize) -> Self {
        assert!(width > 0, "record width must be non-zero");
        Self { width }
    }

    /// Require the declared length to match the record width exactly.
    pub fn check(&self, declared: u64) -> Result<()> {
        if declared != self.width as u64 {
            return Err(TrackerError::Protocol(format!(
                "Expected a {}-byte record, body declares {} bytes",
                self.width, declared
            )));
        }
        Ok(())
    }
}

/// Shape of a body holding shared fields around N fixed-size records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListShape {
    /// Shared bytes before the records.
    pub prefix: usize,
    /// Shared bytes after the records.
    pub suffix: usize,
    /// Bytes per record.
    pub record: usize,
    pub layout: Layout,
}

impl ListShape {
    /// Records stored one after another.
    pub const fn row_major(prefix: usize, record: usize, suffix: usize) -> Self {
        assert!(record > 0, "record width must be non-zero");
        Self {
            prefix,
            suffix,
            record,
            layout: Layout::RowMajor,
        }
    }

    /// Records stored column by column.
    pub const fn column_major(prefix: usize, columns: &'static [usize], suffix: usize) -> Self {
        assert!(!columns.is_empty(), "column-major shape needs columns");
        let mut record = 0;
        let mut i = 0;
        while i < columns.len() {
            assert!(columns[i] > 0, "column width must be non-zero");
            record += columns[i];
            i += 1;
        }
        Self {
            prefix,
            suffix,
            record,
            layout: Layout::ColumnMajor(columns),
        }
    }

    /// Bytes transmitted once per response.
    #[inline]
    pub const fn shared_len(&self) -> usize {
        self.prefix + self.suffix
    }

    /// Recover the record count from the declared body length.
    ///
    /// The division must be exact; anything else means the body does not
    /// have this shape.
    ///
    /// # Example
    ///
    /// ```
    /// use fdfs_tracker::codec::ListShape;
    ///
    /// let shape = ListShape::row_major(4, 10, 1);
    /// assert_eq!(shape.count(5).unwrap(), 0);
    /// assert_eq!(shape.count(35).unwrap(), 3);
    /// assert!(shape.count(36).is_err());
    /// assert!(shape.count(3).is_err());
    /// ```
    pub fn count(&self, declared: u64) -> Result<usize> {
        let declared = usize::try_from(declared).map_err(|_| {
            TrackerError::Protocol(format!("Body length {} is not addressable", declared))
        })?;
        let shared = self.shared_len();
        let records_len = declared.checked_sub(shared).ok_or_else(|| {
            TrackerError::Protocol(format!(
                "Body declares {} bytes, shared fields alone need {}",
                declared, shared
            ))
        })?;
        if records_len % self.record != 0 {
            return Err(TrackerError::Protocol(format!(
                "Body of {} bytes is not {} shared bytes plus whole {}-byte records",
                declared, shared, self.record
            )));
        }
        Ok(records_len / self.record)
    }
}

const STORE_ALL_COLUMNS: &[usize] = &[IP_ADDRESS_SIZE, PKG_LEN_SIZE];

/// List all groups: group records back to back.
pub const GROUP_LIST: ListShape = ListShape::row_major(0, GroupDescriptor::WIDTH, 0);

/// List one group.
pub const GROUP_ONE: RecordShape = RecordShape::new(GroupDescriptor::WIDTH);

/// List storage servers: storage records back to back.
pub const STORAGE_LIST: ListShape = ListShape::row_major(0, StorageDescriptor::WIDTH, 0);

/// Query store, one target.
pub const STORE_ONE: RecordShape = RecordShape::new(BasicStorageDescriptor::STORE_WIDTH);

/// Query store, all targets: group name, every address, every port, then the
/// store path index.
pub const STORE_ALL: ListShape = ListShape::column_major(GROUP_NAME_MAX_LEN, STORE_ALL_COLUMNS, 1);

/// Query fetch or update, one source.
pub const FETCH_ONE: RecordShape = RecordShape::new(BasicStorageDescriptor::FETCH_WIDTH);

/// Query fetch, all sources: group name, first address and the shared port,
/// then one address per additional source.
pub const FETCH_ALL: ListShape =
    ListShape::row_major(BasicStorageDescriptor::FETCH_WIDTH, IP_ADDRESS_SIZE, 0);
