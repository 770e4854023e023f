use crate::{
    file::io::{read_le_at, read_le_at_dyn},
    metadata::{
        tables::{CodedIndexType, RowReadable, TableId, TableInfoRef},
        token::Token,
    },
    Result,
};

#[derive(Clone, Debug)]
/// The `TypeDef` table defines types (classes, interfaces, value types, enums) in the current module. `TableId` = 0x02
pub struct TypeDefRaw {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// Absolute offset of the row in the image
    pub offset: usize,
    /// a 4-byte bitmask of type `TypeAttributes`
    pub flags: u32,
    /// an index into the String heap
    pub type_name: u32,
    /// an index into the String heap
    pub type_namespace: u32,
    /// an index into the Field table; it marks the first of a contiguous run of Fields owned by this Type
    pub field_list: u32,
    /// an index into the `MethodDef` table; it marks the first of a continguous run of Methods owned by this Type
    pub method_list: u32,
}

impl RowReadable for TypeDefRaw {
    const TABLE: TableId = TableId::TypeDef;

    fn row_read(data: &[u8], offset: &mut usize, rid: u32, sizes: &TableInfoRef) -> Result<Self> {
        let offset_org = *offset;
        let flags = read_le_at::<u32>(data, offset)?;
        let type_name = read_le_at_dyn(data, offset, sizes.is_large_str())?;
        let type_namespace = read_le_at_dyn(data, offset, sizes.is_large_str())?;
        // extends is irrelevant for visibility
        let _extends = read_le_at_dyn(
            data,
            offset,
            sizes.coded_index_bytes(CodedIndexType::TypeDefOrRef) == 4,
        )?;

        Ok(TypeDefRaw {
            rid,
            token: Token::new(TableId::TypeDef.token_base() + rid),
            offset: offset_org,
            flags,
            type_name,
            type_namespace,
            field_list: read_le_at_dyn(data, offset, sizes.table_index_bytes(TableId::Field) == 4)?,
            method_list: read_le_at_dyn(
                data,
                offset,
                sizes.table_index_bytes(TableId::MethodDef) == 4,
            )?,
        })
    }
}
