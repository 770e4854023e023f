use std::sync::Arc;
use strum::{EnumCount, IntoEnumIterator};

use crate::{
    file::io::read_le_at,
    metadata::tables::types::{CodedIndexType, TableId},
    Result,
};

/// Number of table slots addressable by the `valid` bit vector.
pub const MAX_TABLES: usize = 64;

/// Holds information about the size that reference index fields have
#[derive(Clone, Copy, Default, PartialEq, Debug)]
pub struct TableRowInfo {
    /// The count of rows in this table
    pub rows: u32,
    /// Number of bits required to represent any valid row index
    pub bits: u8,
    /// If the count is > `u16::max`, the indexes of other tables into this table will be 4 bytes instead of 2
    pub is_large: bool,
}

impl TableRowInfo {
    /// Creates a new `TableRowInfo` instance with the given row count.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(rows: u32) -> Self {
        let bits = if rows == 0 {
            1
        } else {
            // 32 - zeros is always <= 32, fits in u8
            (32 - rows.leading_zeros()) as u8
        };

        Self {
            rows,
            bits,
            is_large: rows > u32::from(u16::MAX),
        }
    }
}

/// `TableInfo` holds the row counts of all tables in this binary, and the resulting sizes
/// of heap, table and coded indexes.
#[derive(Clone, Debug)]
pub struct TableInfo {
    rows: Vec<TableRowInfo>,
    coded_indexes: Vec<u8>,
    is_large_index_str: bool,
    is_large_index_guid: bool,
    is_large_index_blob: bool,
}

/// Cheap-copy reference to a `TableInfo` structure
pub type TableInfoRef = Arc<TableInfo>;

impl TableInfo {
    /// Build a new `TableInfo` from the start of a tables stream.
    ///
    /// The row counts follow the 24 byte stream header, one `u32` for every bit set in
    /// `valid_bitvec`, in ascending table order.
    ///
    /// ## Arguments
    /// * 'data' - The tables stream
    /// * '`valid_bitvec`' - The valid bitvector from the header, showing which tables are present
    ///
    /// # Errors
    /// Returns an error if the stream is too short to hold all row counts
    pub fn new(data: &[u8], valid_bitvec: u64) -> Result<Self> {
        let mut rows = vec![TableRowInfo::default(); MAX_TABLES];
        let mut next_row_offset = 24;

        for (table, row_info) in rows.iter_mut().enumerate() {
            if (valid_bitvec & (1 << table)) == 0 {
                continue;
            }

            let row_count = read_le_at::<u32>(data, &mut next_row_offset)?;
            *row_info = TableRowInfo::new(row_count);
        }

        let heap_size_flags = read_le_at::<u8>(data, &mut 6)?;
        Ok(Self::with_rows(
            rows,
            heap_size_flags & 1 == 1,
            heap_size_flags & 2 == 2,
            heap_size_flags & 4 == 4,
        ))
    }

    /// Build a `TableInfo` from explicit row counts.
    ///
    /// ## Arguments
    /// * 'valid_tables' - (table, row count) of the present tables
    /// * 'large_str'    - Specify if the #Strings heap indexes are 4 or 2 bytes
    /// * 'large_guid'   - Specify if the #GUID heap indexes are 4 or 2 bytes
    /// * 'large_blob'   - Specify if the #Blob heap indexes are 4 or 2 bytes
    #[must_use]
    pub fn from_rows(
        valid_tables: &[(TableId, u32)],
        large_str: bool,
        large_guid: bool,
        large_blob: bool,
    ) -> Self {
        let mut rows = vec![TableRowInfo::default(); MAX_TABLES];
        for (table_id, row_count) in valid_tables {
            rows[*table_id as usize] = TableRowInfo::new(*row_count);
        }

        Self::with_rows(rows, large_str, large_guid, large_blob)
    }

    fn with_rows(
        rows: Vec<TableRowInfo>,
        large_str: bool,
        large_guid: bool,
        large_blob: bool,
    ) -> Self {
        let mut table_info = TableInfo {
            rows,
            coded_indexes: vec![0; CodedIndexType::COUNT],
            is_large_index_str: large_str,
            is_large_index_guid: large_guid,
            is_large_index_blob: large_blob,
        };

        table_info.calculate_coded_index_bits();
        table_info
    }

    /// Row count of a table, 0 if the table is absent.
    #[must_use]
    pub fn rows(&self, id: TableId) -> u32 {
        self.rows[id as usize].rows
    }

    /// Row count of a table slot by raw table number, including tables unknown to [`TableId`].
    #[must_use]
    pub fn rows_raw(&self, table: usize) -> u32 {
        self.rows.get(table).map_or(0, |info| info.rows)
    }

    /// Returns true, if a requested table is larger than 2^16 rows and hence requires 4 bytes instead of 2 bytes
    #[must_use]
    pub fn is_large(&self, id: TableId) -> bool {
        self.rows[id as usize].is_large
    }

    /// Indicates the size of indexes referring into the '#Strings' heap. True means 4 bytes, False is 2 bytes
    #[must_use]
    pub fn is_large_str(&self) -> bool {
        self.is_large_index_str
    }

    /// Indicates the size of indexes referring into the '#GUID' heap. True means 4 bytes, False is 2 bytes
    #[must_use]
    pub fn is_large_guid(&self) -> bool {
        self.is_large_index_guid
    }

    /// Indicates the size of indexes referring into the '#Blob' heap. True means 4 bytes, False is 2 bytes
    #[must_use]
    pub fn is_large_blob(&self) -> bool {
        self.is_large_index_blob
    }

    /// Returns the size of '#Strings' heap indexes in bytes
    #[must_use]
    pub fn str_bytes(&self) -> u8 {
        if self.is_large_index_str {
            4
        } else {
            2
        }
    }

    /// Returns the size of '#GUID' heap indexes in bytes
    #[must_use]
    pub fn guid_bytes(&self) -> u8 {
        if self.is_large_index_guid {
            4
        } else {
            2
        }
    }

    /// Returns the size of '#Blob' heap indexes in bytes
    #[must_use]
    pub fn blob_bytes(&self) -> u8 {
        if self.is_large_index_blob {
            4
        } else {
            2
        }
    }

    /// Returns the number of bytes required to represent an index into a specific table.
    #[must_use]
    pub fn table_index_bytes(&self, table_id: TableId) -> u8 {
        if self.rows[table_id as usize].bits > 16 {
            4
        } else {
            2
        }
    }

    /// Returns the cached byte size for a specific coded index reference.
    #[must_use]
    pub fn coded_index_bytes(&self, coded_index_type: CodedIndexType) -> u8 {
        if self.coded_indexes[coded_index_type as usize] > 16 {
            4
        } else {
            2
        }
    }

    /// Size in bytes of one row of `table`, per the column layout of ECMA-335 §II.22.
    #[must_use]
    #[rustfmt::skip]
    pub fn row_size(&self, table: TableId) -> u32 {
        let string = self.str_bytes();
        let guid = self.guid_bytes();
        let blob = self.blob_bytes();
        let index = |id: TableId| self.table_index_bytes(id);
        let coded = |ci: CodedIndexType| self.coded_index_bytes(ci);

        u32::from(match table {
            TableId::Module =>                 2 + string + guid * 3,
            TableId::TypeRef =>                coded(CodedIndexType::ResolutionScope) + string * 2,
            TableId::TypeDef =>                4 + string * 2 + coded(CodedIndexType::TypeDefOrRef)
                                                + index(TableId::Field) + index(TableId::MethodDef),
            TableId::FieldPtr =>               index(TableId::Field),
            TableId::Field =>                  2 + string + blob,
            TableId::MethodPtr =>              index(TableId::MethodDef),
            TableId::MethodDef =>              4 + 2 + 2 + string + blob + index(TableId::Param),
            TableId::ParamPtr =>               index(TableId::Param),
            TableId::Param =>                  2 + 2 + string,
            TableId::InterfaceImpl =>          index(TableId::TypeDef) + coded(CodedIndexType::TypeDefOrRef),
            TableId::MemberRef =>              coded(CodedIndexType::MemberRefParent) + string + blob,
            TableId::Constant =>               1 + 1 + coded(CodedIndexType::HasConstant) + blob,
            TableId::CustomAttribute =>        coded(CodedIndexType::HasCustomAttribute)
                                                + coded(CodedIndexType::CustomAttributeType) + blob,
            TableId::FieldMarshal =>           coded(CodedIndexType::HasFieldMarshal) + blob,
            TableId::DeclSecurity =>           2 + coded(CodedIndexType::HasDeclSecurity) + blob,
            TableId::ClassLayout =>            2 + 4 + index(TableId::TypeDef),
            TableId::FieldLayout =>            4 + index(TableId::Field),
            TableId::StandAloneSig =>          blob,
            TableId::EventMap =>               index(TableId::TypeDef) + index(TableId::Event),
            TableId::EventPtr =>               index(TableId::Event),
            TableId::Event =>                  2 + string + coded(CodedIndexType::TypeDefOrRef),
            TableId::PropertyMap =>            index(TableId::TypeDef) + index(TableId::Property),
            TableId::PropertyPtr =>            index(TableId::Property),
            TableId::Property =>               2 + string + blob,
            TableId::MethodSemantics =>        2 + index(TableId::MethodDef) + coded(CodedIndexType::HasSemantics),
            TableId::MethodImpl =>             index(TableId::TypeDef) + coded(CodedIndexType::MethodDefOrRef) * 2,
            TableId::ModuleRef =>              string,
            TableId::TypeSpec =>               blob,
            TableId::ImplMap =>                2 + coded(CodedIndexType::MemberForwarded) + string + index(TableId::ModuleRef),
            TableId::FieldRVA =>               4 + index(TableId::Field),
            TableId::EncLog =>                 4 + 4,
            TableId::EncMap =>                 4,
            TableId::Assembly =>               4 + 2 * 4 + 4 + blob + string * 2,
            TableId::AssemblyProcessor =>      4,
            TableId::AssemblyOS =>             4 * 3,
            TableId::AssemblyRef =>            2 * 4 + 4 + blob + string * 2 + blob,
            TableId::AssemblyRefProcessor =>   4 + index(TableId::AssemblyRef),
            TableId::AssemblyRefOS =>          4 * 3 + index(TableId::AssemblyRef),
            TableId::File =>                   4 + string + blob,
            TableId::ExportedType =>           4 + 4 + string * 2 + coded(CodedIndexType::Implementation),
            TableId::ManifestResource =>       4 + 4 + string + coded(CodedIndexType::Implementation),
            TableId::NestedClass =>            index(TableId::TypeDef) * 2,
            TableId::GenericParam =>           2 + 2 + coded(CodedIndexType::TypeOrMethodDef) + string,
            TableId::MethodSpec =>             coded(CodedIndexType::MethodDefOrRef) + blob,
            TableId::GenericParamConstraint => index(TableId::GenericParam) + coded(CodedIndexType::TypeDefOrRef),
        })
    }

    /// Calculates the number of bits required for a specific coded index type.
    fn calculate_coded_index_size(&self, coded_index_type: CodedIndexType) -> u8 {
        let max_bits = coded_index_type
            .tables()
            .iter()
            .map(|table| self.rows[*table as usize].bits)
            .max()
            .unwrap_or(1);

        max_bits + coded_index_type.tag_bits()
    }

    /// Calculates and caches the bit sizes required for all coded index types.
    fn calculate_coded_index_bits(&mut self) {
        for coded_index in CodedIndexType::iter() {
            let size = self.calculate_coded_index_size(coded_index);
            self.coded_indexes[coded_index as usize] = size;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_info_bits() {
        assert_eq!(TableRowInfo::new(0).bits, 1);
        assert_eq!(TableRowInfo::new(1).bits, 1);
        assert_eq!(TableRowInfo::new(0xFFFF).bits, 16);
        assert!(!TableRowInfo::new(0xFFFF).is_large);
        assert_eq!(TableRowInfo::new(0x1_0000).bits, 17);
        assert!(TableRowInfo::new(0x1_0000).is_large);
    }

    #[test]
    fn small_row_sizes() {
        let info = TableInfo::from_rows(
            &[
                (TableId::Module, 1),
                (TableId::TypeDef, 3),
                (TableId::Field, 2),
                (TableId::MethodDef, 4),
                (TableId::NestedClass, 1),
            ],
            false,
            false,
            false,
        );

        assert_eq!(info.row_size(TableId::Module), 10);
        assert_eq!(info.row_size(TableId::TypeDef), 14);
        assert_eq!(info.row_size(TableId::Field), 6);
        assert_eq!(info.row_size(TableId::MethodDef), 14);
        assert_eq!(info.row_size(TableId::NestedClass), 4);
        assert_eq!(info.row_size(TableId::CustomAttribute), 6);
        assert_eq!(info.row_size(TableId::Assembly), 22);
        assert_eq!(info.row_size(TableId::AssemblyRef), 20);
    }

    #[test]
    fn large_heaps_widen_columns() {
        let info = TableInfo::from_rows(&[(TableId::TypeDef, 1)], true, true, true);

        assert_eq!(info.str_bytes(), 4);
        assert_eq!(info.guid_bytes(), 4);
        assert_eq!(info.blob_bytes(), 4);
        assert_eq!(info.row_size(TableId::Module), 2 + 4 + 12);
        assert_eq!(info.row_size(TableId::Field), 2 + 4 + 4);
    }

    #[test]
    fn coded_index_widens_with_tag_bits() {
        // 2^14 rows still fit a 2 byte TypeDefOrRef (14 + 2 tag bits), 2^14 + 1 rows do not
        let small = TableInfo::from_rows(&[(TableId::TypeRef, 0x3FFF)], false, false, false);
        assert_eq!(small.coded_index_bytes(CodedIndexType::TypeDefOrRef), 2);

        let large = TableInfo::from_rows(&[(TableId::TypeRef, 0x4000)], false, false, false);
        assert_eq!(large.coded_index_bytes(CodedIndexType::TypeDefOrRef), 4);
        assert_eq!(large.table_index_bytes(TableId::TypeRef), 2);
        assert_eq!(large.row_size(TableId::TypeDef), 4 + 2 + 2 + 4 + 2 + 2);
    }

    #[test]
    fn parse_row_counts() {
        #[rustfmt::skip]
        let data = [
            0x00, 0x00, 0x00, 0x00, // reserved
            0x02, 0x00,             // version
            0x05,                   // heap sizes: large strings and blobs
            0x01,                   // reserved
            0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // valid: Module, TypeDef
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // sorted
            0x01, 0x00, 0x00, 0x00, // Module rows
            0x07, 0x00, 0x00, 0x00, // TypeDef rows
        ];

        let info = TableInfo::new(&data, 0x05).unwrap();
        assert_eq!(info.rows(TableId::Module), 1);
        assert_eq!(info.rows(TableId::TypeDef), 7);
        assert_eq!(info.rows(TableId::TypeRef), 0);
        assert!(info.is_large_str());
        assert!(!info.is_large_guid());
        assert!(info.is_large_blob());

        assert!(TableInfo::new(&data[..28], 0x05).is_err());
    }
}
