use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

#[derive(Clone, Debug)]
/// The `MethodDef` table, describes one method of a type. `TableId` = 0x06
pub struct MethodDefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Absolute offset of the row in the image
    pub offset: usize,
    /// a 4-byte RVA of the method body
    pub rva: u32,
    /// a 2-byte bitmask of type `MethodImplAttributes`
    pub impl_flags: u16,
    /// a 2-byte bitmask of type `MethodAttributes`
    pub flags: u16,
    /// an index into the String heap
    pub name: u32,
}

impl RowReadable for MethodDefRaw {
    const TABLE: TableId = TableId::MethodDef;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        let offset_org = *offset;
        let rva = read_le_at::<u32>(data, offset)?;
        let impl_flags = read_le_at::<u16>(data, offset)?;
        let flags = read_le_at::<u16>(data, offset)?;
        let name = read_le_at_dyn(data, offset, sizes.is_large_str())?;
        // signature, param_list
        read_le_at_dyn(data, offset, sizes.is_large_blob())?;
        read_le_at_dyn(data, offset, sizes.is_large(TableId::Param))?;

        Ok(MethodDefRaw {
            rid,
            token: Token::new(TableId::MethodDef.token_base() + rid),
            offset: offset_org,
            rva,
            impl_flags,
            flags,
            name,
        })
    }
}

impl MethodDefRaw {
    /// Position of the `Flags` column relative to the start of the row.
    pub const FLAGS_OFFSET: usize = 6;
}
