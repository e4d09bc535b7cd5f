//! Body decoding against a record shape.
//!
//! [`decode_one`] handles single-record bodies. [`ListBody`] splits a list
//! body into its shared prefix, shared suffix and one row per record; rows of
//! column-major bodies are reassembled into record order first, so per-record
//! decoders never see the wire layout.

use std::borrow::Cow;

use super::shape::{Layout, ListShape, RecordShape};
use crate::error::{Result, TrackerError};
use crate::protocol::FieldReader;

fn check_declared(body: &[u8], declared: u64) -> Result<()> {
    if body.len() as u64 != declared {
        return Err(TrackerError::Protocol(format!(
            "Body declares {} bytes but {} were received",
            declared,
            body.len()
        )));
    }
    Ok(())
}

/// Decode a body holding exactly one record.
///
/// The decoder must consume the whole record.
pub fn decode_one<T, F>(body: &[u8], declared: u64, shape: &RecordShape, decode: F) -> Result<T>
where
    F: FnOnce(&mut FieldReader<'_>) -> Result<T>,
{
    check_declared(body, declared)?;
    shape.check(declared)?;
    let mut reader = FieldReader::new(body);
    let value = decode(&mut reader)?;
    reader.finish()?;
    Ok(value)
}

/// A list body split according to its [`ListShape`].
#[derive(Debug)]
pub struct ListBody<'a> {
    prefix: &'a [u8],
    suffix: &'a [u8],
    rows: Vec<Cow<'a, [u8]>>,
}

impl<'a> ListBody<'a> {
    /// Split `body` into shared fields and record rows.
    ///
    /// Fails with `Protocol` if the declared length does not match the body
    /// or is not the shared length plus a whole number of records.
    pub fn split(body: &'a [u8], declared: u64, shape: &ListShape) -> Result<Self> {
        check_declared(body, declared)?;
        let count = shape.count(declared)?;

        let records_end = body.len() - shape.suffix;
        let prefix = &body[..shape.prefix];
        let records = &body[shape.prefix..records_end];
        let suffix = &body[records_end..];

        let rows = match shape.layout {
            Layout::RowMajor => records
                .chunks_exact(shape.record)
                .map(Cow::Borrowed)
                .collect(),
            Layout::ColumnMajor(columns) => transpose(records, columns, shape.record, count),
        };

        Ok(Self {
            prefix,
            suffix,
            rows,
        })
    }

    /// Reader over the shared leading fields.
    pub fn prefix(&self) -> FieldReader<'a> {
        FieldReader::new(self.prefix)
    }

    /// Reader over the shared trailing fields.
    pub fn suffix(&self) -> FieldReader<'a> {
        FieldReader::new(self.suffix)
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Decode every row. Each row must be consumed completely.
    ///
    /// Either every record decodes or none is returned.
    pub fn decode_rows<T, F>(&self, mut decode: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut FieldReader<'_>) -> Result<T>,
    {
        self.rows
            .iter()
            .map(|row| {
                let mut reader = FieldReader::new(row);
                let value = decode(&mut reader)?;
                reader.finish()?;
                Ok(value)
            })
            .collect()
    }
}

/// Rebuild record-ordered rows from column blocks.
fn transpose<'a>(
    records: &[u8],
    columns: &[usize],
    record: usize,
    count: usize,
) -> Vec<Cow<'a, [u8]>> {
    let mut rows: Vec<Vec<u8>> = (0..count).map(|_| Vec::with_capacity(record)).collect();
    let mut block_start = 0;
    for &width in columns {
        let block = &records[block_start..block_start + width * count];
        for (row, cell) in rows.iter_mut().zip(block.chunks_exact(width)) {
            row.extend_from_slice(cell);
        }
        block_start += width * count;
    }
    rows.into_iter().map(Cow::Owned).collect()
}
