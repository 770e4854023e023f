use crate::{
    file::io::read_le_at_dyn,
    metadata::tables::{RowReadable, TableId, TableInfoRef},
    Result,
};

#[derive(Clone, Debug)]
/// The `MethodPtr` table maps list positions to `MethodDef` rows. `TableId` = 0x05
pub struct MethodPtrRaw {
    /// `RowID`
    pub rid: u32,
    /// an index into the `MethodDef` table
    pub method: u32,
}

impl RowReadable for MethodPtrRaw {
    const TABLE: TableId = TableId::MethodPtr;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(MethodPtrRaw {
            rid,
            method: read_le_at_dyn(data, offset, sizes.is_large(TableId::MethodDef))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::tables::TableInfo;

    #[test]
    fn crafted() {
        let data = vec![0x02, 0x00];

        let sizes = Arc::new(TableInfo::from_rows(
            &[(TableId::MethodPtr, 1), (TableId::MethodDef, 2)],
            false,
            false,
            false,
        ));
        let mut offset = 0;
        let row = MethodPtrRaw::row_read(&data, &mut offset, 1, &sizes).unwrap();
        assert_eq!(offset, 2);
        assert_eq!(row.rid, 1);
        assert_eq!(row.method, 2);
    }
}
