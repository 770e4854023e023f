//! PE/CLI implementation of the metadata accessor.
//!
//! [`CilAssembly`] loads the type, method and field definitions of a .NET image and keeps the
//! image bytes alongside them. Writing never re-serializes the metadata: the original bytes are
//! copied and only the flags column of every `TypeDef`, `MethodDef` and `Field` row is patched in
//! place. Heaps, tables, method bodies, resources and signatures stay byte-for-byte identical.
//!
//! # Examples
//!
//! ```rust,no_run
//! use publiciser::metadata::{AssemblyMetadata, CilAssembly};
//!
//! let mut assembly = CilAssembly::from_file("bin/Foo.dll".as_ref())?;
//! for ty in assembly.types_mut() {
//!     ty.set_public();
//! }
//! assembly.write_to_file("obj/Foo_publicised.dll".as_ref())?;
//! # Ok::<(), publiciser::Error>(())
//! ```

use std::{collections::HashSet, path::Path};

use crate::{
    file::{io::write_le_at, File},
    metadata::{
        accessor::{AssemblyMetadata, MetadataAccessor},
        cor20header::Cor20Header,
        definitions::{FieldDefinition, MethodDefinition, TypeDefinition},
        root::Root,
        streams::{Strings, TablesHeader},
        tables::{
            FieldPtrRaw, FieldRaw, MetadataTable, MethodDefRaw, MethodPtrRaw, NestedClassRaw,
            RowReadable, TypeDefRaw,
        },
    },
    Result,
};

/// A .NET assembly loaded from a PE image.
pub struct CilAssembly {
    file: File,
    runtime_version: String,
    types: Vec<TypeDefinition>,
}

impl CilAssembly {
    /// Load the assembly at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not a PE image with CLI metadata, or its
    /// metadata is malformed.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::load(File::from_file(path)?)
    }

    /// Load an assembly held in memory.
    ///
    /// # Errors
    /// See [`CilAssembly::from_file`].
    pub fn from_mem(data: Vec<u8>) -> Result<Self> {
        Self::load(File::from_mem(data)?)
    }

    fn load(file: File) -> Result<Self> {
        let (runtime_version, types) = read_definitions(&file)?;

        log::debug!(
            "Loaded {} types, {} methods, {} fields (runtime {})",
            types.len(),
            types.iter().map(|ty| ty.methods().len()).sum::<usize>(),
            types.iter().map(|ty| ty.fields().len()).sum::<usize>(),
            runtime_version
        );

        Ok(CilAssembly {
            file,
            runtime_version,
            types,
        })
    }

    /// Version string of the metadata root, e.g. `v4.0.30319`
    #[must_use]
    pub fn runtime_version(&self) -> &str {
        &self.runtime_version
    }

    /// Produce the image with the current flags of every definition patched in.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if a definition points outside of the image.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut data = self.file.data().to_vec();

        for ty in &self.types {
            write_le_at::<u32>(&mut data, &mut ty.offset.clone(), ty.flags())?;

            for method in ty.methods() {
                write_le_at::<u16>(&mut data, &mut method.offset.clone(), method.flags())?;
            }

            for field in ty.fields() {
                write_le_at::<u16>(&mut data, &mut field.offset.clone(), field.flags())?;
            }
        }

        Ok(data)
    }

    /// Write the image, including all visibility changes, to `path`.
    ///
    /// # Errors
    /// Returns an error if patching fails or the file cannot be written.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let data = self.to_bytes()?;
        std::fs::write(path, data)?;

        Ok(())
    }
}

impl AssemblyMetadata for CilAssembly {
    fn types(&self) -> &[TypeDefinition] {
        &self.types
    }

    fn types_mut(&mut self) -> &mut [TypeDefinition] {
        &mut self.types
    }
}

/// [`MetadataAccessor`] for PE/CLI images, backed by [`CilAssembly`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CilAccessor;

impl MetadataAccessor for CilAccessor {
    type Assembly = CilAssembly;

    fn load(&self, path: &Path) -> Result<CilAssembly> {
        CilAssembly::from_file(path)
    }

    fn write(&self, assembly: &CilAssembly, path: &Path) -> Result<()> {
        assembly.write_to_file(path)
    }
}

fn read_definitions(file: &File) -> Result<(String, Vec<TypeDefinition>)> {
    let (clr_rva, clr_size) = file.clr();
    let clr_offset = file.rva_to_offset(clr_rva)?;
    let cor20_header = Cor20Header::read(file.data_slice(clr_offset, clr_size)?)?;

    let metadata_offset = file.rva_to_offset(cor20_header.meta_data_rva as usize)?;
    let metadata = file.data_slice(metadata_offset, cor20_header.meta_data_size as usize)?;
    let root = Root::read(metadata)?;

    let Some(tables_stream) = root.tables_stream() else {
        return Err(malformed_error!("Metadata has no tables stream"));
    };
    let tables = TablesHeader::read(
        file.data(),
        metadata_offset + tables_stream.offset as usize,
        tables_stream.size as usize,
    )?;

    let strings = match root.stream("#Strings") {
        Some(stream) => Some(Strings::from(
            &metadata[stream.offset as usize..(stream.offset + stream.size) as usize],
        )?),
        None => None,
    };

    let typedefs = collect(tables.table::<TypeDefRaw>())?;
    let fields = tables.table::<FieldRaw>();
    let methods = tables.table::<MethodDefRaw>();
    let field_ptrs = tables.table::<FieldPtrRaw>();
    let method_ptrs = tables.table::<MethodPtrRaw>();

    let nested = collect(tables.table::<NestedClassRaw>())?
        .into_iter()
        .map(|row| row.nested_class)
        .collect::<HashSet<u32>>();

    let field_count = list_len(field_ptrs.as_ref(), fields.as_ref());
    let method_count = list_len(method_ptrs.as_ref(), methods.as_ref());

    let mut types = Vec::with_capacity(typedefs.len());
    for (index, row) in typedefs.iter().enumerate() {
        let next = typedefs.get(index + 1);

        let mut ty = TypeDefinition::new(
            row.token,
            row.offset,
            heap_string(strings.as_ref(), row.type_namespace)?,
            heap_string(strings.as_ref(), row.type_name)?,
            nested.contains(&row.rid),
            row.flags,
        );

        if let Some(methods) = &methods {
            let end = next.map_or(method_count + 1, |next| next.method_list);
            for position in owned_range(row.method_list, end, method_count) {
                let rid = match &method_ptrs {
                    Some(ptrs) => ptrs.get(position)?.method,
                    None => position,
                };

                let method = methods.get(rid)?;
                ty.add_method(MethodDefinition::new(
                    method.token,
                    method.offset + MethodDefRaw::FLAGS_OFFSET,
                    heap_string(strings.as_ref(), method.name)?,
                    method.flags,
                ));
            }
        }

        if let Some(fields) = &fields {
            let end = next.map_or(field_count + 1, |next| next.field_list);
            for position in owned_range(row.field_list, end, field_count) {
                let rid = match &field_ptrs {
                    Some(ptrs) => ptrs.get(position)?.field,
                    None => position,
                };

                let field = fields.get(rid)?;
                ty.add_field(FieldDefinition::new(
                    field.token,
                    field.offset,
                    heap_string(strings.as_ref(), field.name)?,
                    field.flags,
                ));
            }
        }

        types.push(ty);
    }

    Ok((root.version, types))
}

fn collect<T: RowReadable>(table: Option<MetadataTable<'_, T>>) -> Result<Vec<T>> {
    match table {
        Some(table) => table.iter().collect(),
        None => Ok(Vec::new()),
    }
}

/// Number of entries the list columns of `TypeDef` can index, through the pointer table if present.
fn list_len<P: RowReadable, T: RowReadable>(
    ptrs: Option<&MetadataTable<'_, P>>,
    table: Option<&MetadataTable<'_, T>>,
) -> u32 {
    match (ptrs, table) {
        (Some(ptrs), _) => ptrs.row_count(),
        (None, Some(table)) => table.row_count(),
        (None, None) => 0,
    }
}

/// The 1-based list positions `[start, end)` owned by a type, clamped to the list length.
fn owned_range(start: u32, end: u32, len: u32) -> std::ops::Range<u32> {
    if start == 0 || start > len {
        return 0..0;
    }

    start..end.min(len + 1).max(start)
}

fn heap_string(strings: Option<&Strings<'_>>, index: u32) -> Result<String> {
    match strings {
        Some(strings) => Ok(strings.get(index as usize)?.to_string()),
        None => Ok(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::visibility::{MemberAccess, TypeVisibility},
        test::TestImage,
    };

    fn scenario() -> TestImage {
        TestImage::new()
            .add_type("Ns", "A", 0x0010_0001)
            .add_method("m", 0x0081)
            .add_field("f", 0x0003)
            .add_type("", "B", 0x0010_0103)
            .add_method("n", 0x0086)
            .nest(3, 2)
    }

    #[test]
    fn load_definitions() {
        let assembly = CilAssembly::from_mem(scenario().build()).unwrap();

        assert_eq!(assembly.runtime_version(), "v4.0.30319");

        let types = assembly.types();
        assert_eq!(types.len(), 3);

        assert_eq!(types[0].name, "<Module>");
        assert!(!types[0].is_nested());
        assert!(types[0].methods().is_empty());

        assert_eq!(types[1].full_name(), "Ns.A");
        assert_eq!(types[1].visibility(), TypeVisibility::Public);
        assert!(!types[1].is_nested());
        assert_eq!(types[1].methods().len(), 1);
        assert_eq!(types[1].methods()[0].name, "m");
        assert_eq!(types[1].methods()[0].access(), MemberAccess::Private);
        assert_eq!(types[1].fields().len(), 1);
        assert_eq!(types[1].fields()[0].name, "f");
        assert_eq!(types[1].fields()[0].access(), MemberAccess::Assembly);

        assert_eq!(types[2].name, "B");
        assert!(types[2].is_nested());
        assert_eq!(types[2].visibility(), TypeVisibility::NestedPrivate);
        assert_eq!(types[2].methods().len(), 1);
        assert_eq!(types[2].methods()[0].name, "n");
        assert!(types[2].fields().is_empty());
    }

    #[test]
    fn patch_only_flags() {
        let original = scenario().build();
        let mut assembly = CilAssembly::from_mem(original.clone()).unwrap();

        for ty in assembly.types_mut() {
            ty.set_public();
            for method in ty.methods_mut() {
                method.set_public();
            }
            for field in ty.fields_mut() {
                field.set_public();
            }
        }

        let patched = assembly.to_bytes().unwrap();
        assert_eq!(patched.len(), original.len());

        let changed = original
            .iter()
            .zip(&patched)
            .filter(|(before, after)| before != after)
            .count();
        // <Module> 0 -> 1, B 3 -> 2, m 1 -> 6, f 3 -> 6
        assert_eq!(changed, 4);

        let reloaded = CilAssembly::from_mem(patched).unwrap();
        let types = reloaded.types();
        assert_eq!(types[0].visibility(), TypeVisibility::Public);
        assert_eq!(types[1].flags(), 0x0010_0001);
        assert_eq!(types[2].flags(), 0x0010_0102);
        assert_eq!(types[1].methods()[0].flags(), 0x0086);
        assert_eq!(types[1].fields()[0].flags(), 0x0006);
        assert_eq!(types[2].methods()[0].flags(), 0x0086);
    }

    #[test]
    fn unchanged_assembly_round_trips() {
        let original = scenario().build();
        let assembly = CilAssembly::from_mem(original.clone()).unwrap();
        assert_eq!(assembly.to_bytes().unwrap(), original);
    }

    #[test]
    fn undefined_member_access() {
        let original = TestImage::new()
            .add_type("", "A", 0x0010_0001)
            .add_method("m", 0x0087)
            .add_field("f", 0x0017)
            .build();

        let mut assembly = CilAssembly::from_mem(original.clone()).unwrap();
        assert_eq!(assembly.to_bytes().unwrap(), original);

        let summary = crate::rewriter::publicise(&mut assembly);
        assert_eq!(summary.methods_changed, 1);
        assert_eq!(summary.fields_changed, 1);

        let patched = CilAssembly::from_mem(assembly.to_bytes().unwrap()).unwrap();
        assert_eq!(patched.types()[1].methods()[0].flags(), 0x0086);
        assert_eq!(patched.types()[1].fields()[0].flags(), 0x0016);
    }

    #[test]
    fn pointer_tables() {
        let image = TestImage::new()
            .add_type("", "A", 0x0000_0000)
            .add_method("first", 0x0001)
            .add_method("second", 0x0003)
            .add_field("x", 0x0001)
            .add_type("", "B", 0x0000_0001)
            .add_field("y", 0x0002)
            .with_pointer_tables()
            .build();

        let assembly = CilAssembly::from_mem(image).unwrap();
        let types = assembly.types();

        assert_eq!(types.len(), 3);
        assert_eq!(types[1].methods().len(), 2);
        assert_eq!(types[1].methods()[1].name, "second");
        assert_eq!(types[1].fields()[0].name, "x");
        assert!(types[2].methods().is_empty());
        assert_eq!(types[2].fields()[0].name, "y");
        assert_eq!(types[2].fields()[0].access(), MemberAccess::FamAndAssem);
    }

    #[test]
    fn large_heaps() {
        let image = TestImage::new()
            .add_type("Big", "Type", 0x0000_0000)
            .add_method("m", 0x0001)
            .with_large_heaps()
            .build();

        let assembly = CilAssembly::from_mem(image).unwrap();
        assert_eq!(assembly.types()[1].full_name(), "Big.Type");
        assert_eq!(assembly.types()[1].methods()[0].name, "m");
    }

    #[test]
    fn empty_module() {
        let assembly = CilAssembly::from_mem(TestImage::new().build()).unwrap();
        assert_eq!(assembly.types().len(), 1);
        assert_eq!(assembly.types()[0].name, "<Module>");
    }

    #[test]
    fn owned_ranges() {
        assert_eq!(owned_range(1, 3, 4), 1..3);
        assert_eq!(owned_range(3, 5, 4), 3..5);
        assert_eq!(owned_range(3, 9, 4), 3..5);
        assert!(owned_range(5, 5, 4).is_empty());
        assert!(owned_range(0, 2, 4).is_empty());
        assert!(owned_range(3, 2, 4).is_empty());
    }

    #[test]
    fn not_an_assembly() {
        assert!(CilAssembly::from_mem(vec![0x4D, 0x5A, 0x00]).is_err());
        assert!(CilAssembly::from_mem(TestImage::new().without_clr_header().build()).is_err());
        assert!(CilAssembly::from_mem(TestImage::new().corrupt_metadata().build()).is_err());
    }
}
