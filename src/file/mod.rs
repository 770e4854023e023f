//! PE image access for .NET assemblies.
//!
//! [`File`] owns the raw bytes of an image through a [`Backend`] (memory-mapped from disk
//! or an owned buffer) and keeps the small subset of the PE headers needed to find the CLI
//! metadata: the section table for RVA translation and the CLR runtime header directory.
//!
//! The PE headers are parsed with `goblin`; everything below the CLR header is parsed by
//! [`crate::metadata`].

pub mod io;

mod memory;
mod physical;

use std::path::Path;

use crate::{
    Error::{Empty, OutOfBounds},
    Result,
};
use goblin::pe::PE;
use memory::Memory;
use physical::Physical;

/// Read access to the raw bytes of an image.
pub trait Backend: Send + Sync {
    /// The complete image.
    fn data(&self) -> &[u8];

    /// Get a bounds-checked slice of `len` bytes starting at `offset`.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the data.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        offset
            .checked_add(len)
            .and_then(|end| self.data().get(offset..end))
            .ok_or(OutOfBounds)
    }

    /// Length of the image in bytes.
    fn len(&self) -> usize {
        self.data().len()
    }
}

/// Location of a PE section, both in memory and on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    /// RVA of the section start
    pub virtual_address: u32,
    /// Size of the section once mapped
    pub virtual_size: u32,
    /// File offset of the section data
    pub pointer_to_raw_data: u32,
    /// Size of the section data on disk
    pub size_of_raw_data: u32,
}

/// A loaded PE image which carries a CLR runtime header.
pub struct File {
    data: Box<dyn Backend>,
    sections: Vec<Section>,
    clr_rva: u32,
    clr_size: u32,
}

impl File {
    /// Memory-map and parse the image at `path`.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be read, [`crate::Error::Empty`]
    /// for empty files, [`crate::Error::GoblinErr`] if the PE headers are invalid and
    /// [`crate::Error::NotSupported`] if the image is not a .NET assembly.
    pub fn from_file(path: &Path) -> Result<File> {
        let input = Physical::new(path)?;

        Self::load(input)
    }

    /// Parse an image held in memory.
    ///
    /// # Errors
    /// See [`File::from_file`].
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let (sections, clr_rva, clr_size) = {
            let pe = PE::parse(data.data())?;
            let Some(optional_header) = pe.header.optional_header.as_ref() else {
                return Err(malformed_error!("File does not have an OptionalHeader"));
            };

            let Some(clr) = optional_header.data_directories.get_clr_runtime_header() else {
                return Err(crate::Error::NotSupported);
            };

            let sections = pe
                .sections
                .iter()
                .map(|section| Section {
                    virtual_address: section.virtual_address,
                    virtual_size: section.virtual_size,
                    pointer_to_raw_data: section.pointer_to_raw_data,
                    size_of_raw_data: section.size_of_raw_data,
                })
                .collect::<Vec<_>>();

            (sections, clr.virtual_address, clr.size)
        };

        if clr_rva == 0 || clr_size == 0 {
            return Err(crate::Error::NotSupported);
        }

        Ok(File {
            data: Box::new(data),
            sections,
            clr_rva,
            clr_size,
        })
    }

    /// Length of the image in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the image holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// RVA and size of the CLR runtime header.
    #[must_use]
    pub fn clr(&self) -> (usize, usize) {
        (self.clr_rva as usize, self.clr_size as usize)
    }

    /// The section table of the image.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The complete image.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.data.data()
    }

    /// Get a bounds-checked slice of the image.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the image.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.data.data_slice(offset, len)
    }

    /// Translate a relative virtual address into a file offset.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if no section contains `rva`.
    pub fn rva_to_offset(&self, rva: usize) -> Result<usize> {
        let rva_u32 = u32::try_from(rva)
            .map_err(|_| malformed_error!("RVA too large to fit in u32: {}", rva))?;

        for section in &self.sections {
            let span = section.virtual_size.max(section.size_of_raw_data);
            let Some(section_max) = section.virtual_address.checked_add(span) else {
                return Err(malformed_error!(
                    "Section malformed, causing integer overflow - {} + {}",
                    section.virtual_address,
                    span
                ));
            };

            if section.virtual_address <= rva_u32 && rva_u32 < section_max {
                return Ok((rva - section.virtual_address as usize)
                    + section.pointer_to_raw_data as usize);
            }
        }

        Err(malformed_error!(
            "RVA could not be converted to offset - {}",
            rva
        ))
    }
}
