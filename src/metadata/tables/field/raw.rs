use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

#[derive(Clone, Debug)]
/// Each row in the Field table describes a single field of a type. `TableId` = 0x04
pub struct FieldRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Absolute offset of the row in the image
    pub offset: usize,
    /// a 2-byte bitmask of type `FieldAttributes`
    pub flags: u16,
    /// an index into the String heap
    pub name: u32,
}

impl RowReadable for FieldRaw {
    const TABLE: TableId = TableId::Field;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        let offset_org = *offset;
        let flags = read_le_at::<u16>(data, offset)?;
        let name = read_le_at_dyn(data, offset, sizes.is_large_str())?;
        // signature
        read_le_at_dyn(data, offset, sizes.is_large_blob())?;

        Ok(FieldRaw {
            rid,
            token: Token::new(TableId::Field.token_base() + rid),
            offset: offset_org,
            flags,
            name,
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
            0x01, 0x01, // flags
            0x02, 0x02, // name
            0x03, 0x03, // signature
        ];

        let sizes = Arc::new(TableInfo::from_rows(
            &[(TableId::Field, 1)],
            false,
            false,
            false,
        ));

        let mut offset = 0;
        let row = FieldRaw::row_read(&data, &mut offset, 1, &sizes).unwrap();

        assert_eq!(offset, 6);
        assert_eq!(row.token.value(), 0x0400_0001);
        assert_eq!(row.flags, 0x0101);
        assert_eq!(row.name, 0x0202);
    }

    #[test]
    fn crafted_long() {
        let data = vec![
            0x01, 0x01, // flags
            0x02, 0x02, 0x02, 0x02, // name
            0x03, 0x03, 0x03, 0x03, // signature
        ];

        let sizes = Arc::new(TableInfo::from_rows(
            &[(TableId::Field, 1)],
            true,
            true,
            true,
        ));

        let mut offset = 4;
        assert!(FieldRaw::row_read(&data, &mut offset, 1, &sizes).is_err());

        let mut offset = 0;
        let row = FieldRaw::row_read(&data, &mut offset, 1, &sizes).unwrap();
        assert_eq!(offset, 10);
        assert_eq!(row.name, 0x0202_0202);
    }
}
