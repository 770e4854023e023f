//! Table identifiers, size computation and typed row access.
//!
//! - [`TableId`] - the metadata tables of ECMA-335 §II.22
//! - [`CodedIndexType`] - coded index kinds and the tables they reference
//! - [`TableInfo`] - row counts and the resulting column widths and row sizes
//! - [`RowReadable`] / [`MetadataTable`] - typed, bounds-checked access to the rows of one table

mod codedindex;
mod tableid;
mod tableinfo;

use std::marker::PhantomData;

use crate::Result;

pub use codedindex::CodedIndexType;
pub use tableid::TableId;
pub use tableinfo::{TableInfo, TableInfoRef, TableRowInfo, MAX_TABLES};

/// A row type of one metadata table.
pub trait RowReadable: Sized {
    /// The table this row type belongs to
    const TABLE: TableId;

    /// Reads a single row starting at `offset`, advancing the offset past the row.
    ///
    /// ## Arguments
    /// * `data` - The image containing the table
    /// * `offset` - Absolute position of the row, updated after reading
    /// * `rid` - The 1-based row identifier
    /// * `sizes` - Column widths of this image
    ///
    /// # Errors
    /// Returns an error if the row does not fit into `data`.
    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self>;
}

/// Typed view of the rows of one table inside an image.
pub struct MetadataTable<'a, T> {
    data: &'a [u8],
    start: usize,
    row_count: u32,
    row_size: u32,
    sizes: TableInfoRef,
    _marker: PhantomData<T>,
}

impl<'a, T: RowReadable> MetadataTable<'a, T> {
    /// Create a view over `row_count` rows starting at the absolute offset `start`.
    #[must_use]
    pub fn new(data: &'a [u8], start: usize, sizes: TableInfoRef) -> Self {
        MetadataTable {
            data,
            start,
            row_count: sizes.rows(T::TABLE),
            row_size: sizes.row_size(T::TABLE),
            sizes,
            _marker: PhantomData,
        }
    }

    /// Number of rows in this table.
    #[must_use]
    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Size of a single row in bytes.
    #[must_use]
    pub fn row_size(&self) -> u32 {
        self.row_size
    }

    /// Read the row with the 1-based identifier `rid`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `rid` is 0, larger than the row count, or the
    /// row lies outside the image.
    pub fn get(&self, rid: u32) -> Result<T> {
        if rid == 0 || rid > self.row_count {
            return Err(crate::Error::OutOfBounds);
        }

        let mut offset = self.start + (rid as usize - 1) * self.row_size as usize;
        T::row_read(self.data, &mut offset, rid, &self.sizes)
    }

    /// Read all rows in order.
    pub fn iter(&self) -> impl Iterator<Item = Result<T>> + '_ {
        (1..=self.row_count).map(|rid| self.get(rid))
    }
}
