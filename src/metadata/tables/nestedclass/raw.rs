use crate::{
    file::io::read_le_at_dyn,
    metadata::tables::{RowReadable, TableId, TableInfoRef},
    Result,
};

#[derive(Clone, Debug)]
/// The `NestedClass` table records the enclosing type of every nested type. `TableId` = 0x29
pub struct NestedClassRaw {
    /// `RowID`
    pub rid: u32,
    /// an index into the `TypeDef` table, the nested type
    pub nested_class: u32,
    /// an index into the `TypeDef` table, the type enclosing `nested_class`
    pub enclosing_class: u32,
}

impl RowReadable for NestedClassRaw {
    const TABLE: TableId = TableId::NestedClass;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        Ok(NestedClassRaw {
            rid,
            nested_class: read_le_at_dyn(data, offset, sizes.is_large(TableId::TypeDef))?,
            enclosing_class: read_le_at_dyn(data, offset, sizes.is_large(TableId::TypeDef))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::metadata::tables::TableInfo;

    #[test]
    fn crafted_short() {
        let data = vec![
            0x03, 0x00, // nested_class
            0x02, 0x00, // enclosing_class
        ];

        let sizes = Arc::new(TableInfo::from_rows(
            &[(TableId::NestedClass, 1), (TableId::TypeDef, 3)],
            false,
            false,
            false,
        ));

        let mut offset = 0;
        let row = NestedClassRaw::row_read(&data, &mut offset, 1, &sizes).unwrap();

        assert_eq!(offset, 4);
        assert_eq!(row.nested_class, 3);
        assert_eq!(row.enclosing_class, 2);
    }

    #[test]
    fn crafted_long() {
        let data = vec![
            0x03, 0x00, 0x01, 0x00, // nested_class
            0x02, 0x00, 0x01, 0x00, // enclosing_class
        ];

        let sizes = Arc::new(TableInfo::from_rows(
            &[
                (TableId::NestedClass, 1),
                (TableId::TypeDef, u32::from(u16::MAX) + 3),
            ],
            false,
            false,
            false,
        ));

        let mut offset = 0;
        let row = NestedClassRaw::row_read(&data, &mut offset, 1, &sizes).unwrap();

        assert_eq!(offset, 8);
        assert_eq!(row.nested_class, 0x0001_0003);
        assert_eq!(row.enclosing_class, 0x0001_0002);
    }
}
