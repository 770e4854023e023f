use crate::{
    file::io::read_le_at_dyn,
    metadata::tables::{RowReadable, TableId, TableInfoRef},
    Result,
};

#[derive(Clone, Debug)]
/// The `FieldPtr` table maps list positions to `Field` rows. `TableId` = 0x03
pub struct FieldPtrRaw {
    /// `RowID`
    pub rid: u32,
    /// an index into the Field table
    pub field: u32,
}

impl RowReadable for FieldPtrRaw {
    const TABLE: TableId = TableId::FieldPtr;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(FieldPtrRaw {
            rid,
            field: read_le_at_dyn(data, offset, sizes.is_large(TableId::Field))?,
        })
    }
}
