use std::sync::Arc;
use strum::IntoEnumIterator;

use crate::{
    file::io::read_le,
    metadata::tables::{MetadataTable, RowReadable, TableId, TableInfo, TableInfoRef, MAX_TABLES},
    Error::OutOfBounds,
    Result,
};

/// Heap size flag: 4 extra bytes follow the row counts.
const EXTRA_DATA: u8 = 0x40;

/// The `TablesHeader` structure represents the header of the `#~` (or `#-`) stream, which contains all the
/// metadata tables of the image.
///
/// Tables are not copied; [`TablesHeader::table`] hands out typed views on the image bytes. All positions are
/// absolute offsets into the image, so rows read through these views can be patched in place.
///
/// ## Reference
/// * '<https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf>' - II.24.2.6 && II.22
pub struct TablesHeader<'a> {
    /// Major version of table schemata, shall be 2
    pub major_version: u8,
    /// Minor version of table schemata, shall be 0
    pub minor_version: u8,
    /// Heap size flags
    pub heap_sizes: u8,
    /// Bit vector of present tables, let n be the number of bits that are 1.
    pub valid: u64,
    /// Bit vector of sorted tables
    pub sorted: u64,
    /// Information about specific tables, e.g their row count, and their reference index sizes
    pub info: TableInfoRef,
    data: &'a [u8],
    table_offsets: [Option<usize>; MAX_TABLES],
}

impl<'a> TablesHeader<'a> {
    /// Parse the tables stream located at `stream_offset` inside `image`.
    ///
    /// # Arguments
    /// * 'image' - The complete image
    /// * '`stream_offset`' - Absolute offset of the tables stream
    /// * '`stream_size`' - Size of the tables stream, as declared by its stream header
    ///
    /// # Errors
    /// Returns an error if the stream is truncated, declares no tables, or its tables exceed the stream
    pub fn read(
        image: &'a [u8],
        stream_offset: usize,
        stream_size: usize,
    ) -> Result<TablesHeader<'a>> {
        let Some(stream_end) = stream_offset.checked_add(stream_size) else {
            return Err(OutOfBounds);
        };
        if stream_size < 24 || stream_end > image.len() {
            return Err(OutOfBounds);
        }

        let data = &image[stream_offset..stream_end];
        let heap_sizes = read_le::<u8>(&data[6..])?;
        let valid = read_le::<u64>(&data[8..])?;
        if valid == 0 {
            return Err(malformed_error!("No valid rows in any of the tables"));
        }

        let info = Arc::new(TableInfo::new(data, valid)?);

        let mut current = 24 + valid.count_ones() as usize * 4;
        if heap_sizes & EXTRA_DATA != 0 {
            current += 4;
        }

        let mut table_offsets = [None; MAX_TABLES];
        for table_id in TableId::iter() {
            let rows = info.rows(table_id) as usize;
            if rows == 0 {
                continue;
            }

            table_offsets[table_id as usize] = Some(stream_offset + current);

            let Some(table_len) = rows.checked_mul(info.row_size(table_id) as usize) else {
                return Err(OutOfBounds);
            };
            current += table_len;
            if current > stream_size {
                return Err(malformed_error!(
                    "Table {:?} exceeds the tables stream - {} > {}",
                    table_id,
                    current,
                    stream_size
                ));
            }
        }

        Ok(TablesHeader {
            major_version: read_le::<u8>(&data[4..])?,
            minor_version: read_le::<u8>(&data[5..])?,
            heap_sizes,
            valid,
            sorted: read_le::<u64>(&data[16..])?,
            info,
            data: image,
            table_offsets,
        })
    }

    /// Get the table count
    #[must_use]
    pub fn table_count(&self) -> u32 {
        self.valid.count_ones()
    }

    /// Check whether a table is present and has rows
    #[must_use]
    pub fn has_table(&self, table_id: TableId) -> bool {
        self.table_offsets[table_id as usize].is_some()
    }

    /// Absolute offset of the first row of a table, if present
    #[must_use]
    pub fn table_offset(&self, table_id: TableId) -> Option<usize> {
        self.table_offsets[table_id as usize]
    }

    /// Get a typed view on the rows of the table `T` belongs to.
    ///
    /// Returns `None` if the table is absent or empty.
    #[must_use]
    pub fn table<T: RowReadable>(&self) -> Option<MetadataTable<'a, T>> {
        let start = self.table_offsets[T::TABLE as usize]?;
        Some(MetadataTable::new(self.data, start, self.info.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::{FieldRaw, NestedClassRaw, TypeDefRaw};

    fn stream(heap_sizes: u8, rows: &[(TableId, u32)], extra: bool) -> Vec<u8> {
        let mut data = vec![0, 0, 0, 0, 2, 0, heap_sizes, 1];
        let valid = rows.iter().fold(0_u64, |acc, (id, _)| acc | 1 << *id as u64);
        data.extend_from_slice(&valid.to_le_bytes());
        data.extend_from_slice(&0_u64.to_le_bytes());

        let mut sorted = rows.to_vec();
        sorted.sort_by_key(|(id, _)| *id as u8);
        for (_, count) in &sorted {
            data.extend_from_slice(&count.to_le_bytes());
        }
        if extra {
            data.extend_from_slice(&[0xAA; 4]);
        }
        data
    }

    #[test]
    fn offsets() {
        let mut image = vec![0xFF_u8; 16];
        let stream_offset = image.len();
        let mut tables = stream(
            0,
            &[(TableId::Module, 1), (TableId::TypeDef, 2), (TableId::Field, 1)],
            false,
        );
        let header_len = tables.len();
        tables.extend_from_slice(&[0_u8; 10 + 2 * 14 + 6]);
        image.extend_from_slice(&tables);

        let header = TablesHeader::read(&image, stream_offset, tables.len()).unwrap();

        assert_eq!(header.major_version, 2);
        assert_eq!(header.table_count(), 3);
        assert!(header.has_table(TableId::TypeDef));
        assert!(!header.has_table(TableId::MethodDef));
        assert_eq!(
            header.table_offset(TableId::TypeDef),
            Some(stream_offset + header_len + 10)
        );

        let typedefs = header.table::<TypeDefRaw>().unwrap();
        assert_eq!(typedefs.row_count(), 2);
        assert_eq!(typedefs.get(2).unwrap().offset, stream_offset + header_len + 10 + 14);

        let fields = header.table::<FieldRaw>().unwrap();
        assert_eq!(fields.get(1).unwrap().offset, stream_offset + header_len + 10 + 28);

        assert!(header.table::<NestedClassRaw>().is_none());
    }

    #[test]
    fn extra_data() {
        let mut tables = stream(EXTRA_DATA, &[(TableId::Module, 1)], true);
        let header_len = tables.len();
        tables.extend_from_slice(&[0_u8; 10]);

        let header = TablesHeader::read(&tables, 0, tables.len()).unwrap();
        assert_eq!(header.table_offset(TableId::Module), Some(header_len));
        assert_eq!(header_len, 24 + 4 + 4);
    }

    #[test]
    fn truncated() {
        let mut tables = stream(0, &[(TableId::Module, 1), (TableId::TypeDef, 2)], false);
        tables.extend_from_slice(&[0_u8; 10 + 14]);

        assert!(TablesHeader::read(&tables, 0, tables.len()).is_err());
        assert!(matches!(
            TablesHeader::read(&tables, 0, tables.len() + 1),
            Err(OutOfBounds)
        ));
        assert!(matches!(TablesHeader::read(&tables[..16], 0, 16), Err(OutOfBounds)));
    }

    #[test]
    fn no_tables() {
        let tables = stream(0, &[], false);
        assert!(TablesHeader::read(&tables, 0, tables.len()).is_err());
    }
}
