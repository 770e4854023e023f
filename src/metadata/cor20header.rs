//! CLR 2.0 (Cor20) header of a .NET image.
//!
//! Only the parts needed to find the metadata root are kept. The remaining directories of the
//! header (resources, strong name, vtable fixups) are never touched because the rewrite only
//! patches bytes inside the metadata tables.
//!
//! # Reference
//! - [ECMA-335 II.25.3.3](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use crate::{file::io::read_le_at, Error::OutOfBounds, Result};

/// The CLI header, located at the start of the `IMAGE_DIRECTORY_ENTRY_COM_DESCRIPTOR` data
/// directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cor20Header {
    /// Size of header in bytes
    pub cb: u32,
    /// The minimum version of runtime required to run this program
    pub major_runtime_version: u16,
    /// The minor portion of the version
    pub minor_runtime_version: u16,
    /// RVA of the `MetaData`
    pub meta_data_rva: u32,
    /// Size of the `MetaData`
    pub meta_data_size: u32,
    /// Flags describing this runtime
    pub flags: u32,
    /// Token for the `MethodDef` or File of the entry point for the image
    pub entry_point_token: u32,
}

impl Cor20Header {
    /// Size of the header as mandated by ECMA-335
    pub const SIZE: usize = 72;

    /// Create a `Cor20Header` from the start of the CLR header directory.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if `data` is shorter than 72 bytes and
    /// [`crate::Error::Malformed`] if the size, runtime version or metadata directory are invalid.
    pub fn read(data: &[u8]) -> Result<Cor20Header> {
        if data.len() < Self::SIZE {
            return Err(OutOfBounds);
        }

        let mut offset = 0;
        let cb = read_le_at::<u32>(data, &mut offset)?;
        if cb as usize != Self::SIZE {
            return Err(malformed_error!(
                "Invalid CLR header size: expected 72, got {}",
                cb
            ));
        }

        let major_runtime_version = read_le_at::<u16>(data, &mut offset)?;
        let minor_runtime_version = read_le_at::<u16>(data, &mut offset)?;
        if major_runtime_version == 0 || major_runtime_version > 10 {
            return Err(malformed_error!(
                "Invalid major runtime version: {}",
                major_runtime_version
            ));
        }

        let meta_data_rva = read_le_at::<u32>(data, &mut offset)?;
        let meta_data_size = read_le_at::<u32>(data, &mut offset)?;
        if meta_data_rva == 0 || meta_data_size == 0 {
            return Err(malformed_error!("Image has no metadata directory"));
        }

        Ok(Cor20Header {
            cb,
            major_runtime_version,
            minor_runtime_version,
            meta_data_rva,
            meta_data_size,
            flags: read_le_at::<u32>(data, &mut offset)?,
            entry_point_token: read_le_at::<u32>(data, &mut offset)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cb: u32, major: u16, rva: u32, size: u32) -> Vec<u8> {
        let mut data = vec![0_u8; 72];
        data[0..4].copy_from_slice(&cb.to_le_bytes());
        data[4..6].copy_from_slice(&major.to_le_bytes());
        data[6..8].copy_from_slice(&5_u16.to_le_bytes());
        data[8..12].copy_from_slice(&rva.to_le_bytes());
        data[12..16].copy_from_slice(&size.to_le_bytes());
        data[16..20].copy_from_slice(&1_u32.to_le_bytes());
        data[20..24].copy_from_slice(&0x0600_0001_u32.to_le_bytes());
        data
    }

    #[test]
    fn crafted() {
        let parsed = Cor20Header::read(&header(72, 2, 0x2050, 0x1000)).unwrap();

        assert_eq!(parsed.cb, 72);
        assert_eq!(parsed.major_runtime_version, 2);
        assert_eq!(parsed.minor_runtime_version, 5);
        assert_eq!(parsed.meta_data_rva, 0x2050);
        assert_eq!(parsed.meta_data_size, 0x1000);
        assert_eq!(parsed.flags, 1);
        assert_eq!(parsed.entry_point_token, 0x0600_0001);
    }

    #[test]
    fn invalid() {
        assert!(matches!(
            Cor20Header::read(&[0x48, 0x00, 0x00]),
            Err(OutOfBounds)
        ));
        assert!(Cor20Header::read(&header(64, 2, 0x2050, 0x1000)).is_err());
        assert!(Cor20Header::read(&header(72, 0, 0x2050, 0x1000)).is_err());
        assert!(Cor20Header::read(&header(72, 2, 0, 0x1000)).is_err());
        assert!(Cor20Header::read(&header(72, 2, 0x2050, 0)).is_err());
    }
}
