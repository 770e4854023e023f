//! Little-endian, bounds-checked reading and writing of primitive values.
//!
//! All PE and CLI metadata structures touched by this crate are little-endian. Every
//! function here checks the buffer length before touching it and reports
//! [`crate::Error::OutOfBounds`] instead of panicking.
//!
//! - [`read_le`] / [`read_le_at`] - read a value, optionally advancing an offset
//! - [`read_le_at_dyn`] - read a 2 or 4 byte index, depending on heap or table size
//! - [`write_le_at`] - patch a value in place, advancing the offset

use crate::{Error::OutOfBounds, Result};

/// Primitive types that can be read from and written to metadata buffers.
pub trait CilIO: Sized {
    /// Fixed size byte representation of the type
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Build the value from its little-endian representation
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Produce the little-endian representation of the value
    fn to_le_bytes(self) -> Self::Bytes;
}

macro_rules! impl_cil_io {
    ($($ty:ty),*) => {
        $(
            impl CilIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }
            }
        )*
    };
}

impl_cil_io!(u8, u16, u32, u64);

/// Read a value from the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is too short.
pub fn read_le<T: CilIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Read a value at `offset` and advance the offset past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the value does not fit into `data`.
pub fn read_le_at<T: CilIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };

    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}

/// Read a heap or table index that is 4 bytes wide if `is_large`, 2 bytes otherwise.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the index does not fit into `data`.
pub fn read_le_at_dyn(data: &[u8], offset: &mut usize, is_large: bool) -> Result<u32> {
    let res = if is_large {
        read_le_at::<u32>(data, offset)?
    } else {
        u32::from(read_le_at::<u16>(data, offset)?)
    };

    Ok(res)
}

/// Write `value` at `offset` and advance the offset past it.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the value does not fit into `data`.
pub fn write_le_at<T: CilIO>(data: &mut [u8], offset: &mut usize, value: T) -> Result<()> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };

    if end > data.len() {
        return Err(OutOfBounds);
    }

    data[*offset..end].copy_from_slice(value.to_le_bytes().as_ref());
    *offset = end;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_le_u16() {
        let result = read_le::<u16>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0201);
    }

    #[test]
    fn read_le_u32() {
        let result = read_le::<u32>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0403_0201);
    }

    #[test]
    fn read_le_at_advances() {
        let mut offset = 2;
        let first = read_le_at::<u16>(&TEST_BUFFER, &mut offset).unwrap();
        let second = read_le_at::<u32>(&TEST_BUFFER, &mut offset).unwrap();

        assert_eq!(first, 0x0403);
        assert_eq!(second, 0x0807_0605);
        assert_eq!(offset, 8);
    }

    #[test]
    fn read_le_at_dyn_sizes() {
        let mut offset = 0;
        assert_eq!(
            read_le_at_dyn(&TEST_BUFFER, &mut offset, false).unwrap(),
            0x0201
        );
        assert_eq!(offset, 2);

        assert_eq!(
            read_le_at_dyn(&TEST_BUFFER, &mut offset, true).unwrap(),
            0x0605_0403
        );
        assert_eq!(offset, 6);
    }

    #[test]
    fn read_out_of_bounds() {
        let mut offset = 6;
        assert!(matches!(
            read_le_at::<u32>(&TEST_BUFFER, &mut offset),
            Err(OutOfBounds)
        ));
        assert_eq!(offset, 6);

        let mut offset = usize::MAX;
        assert!(read_le_at::<u8>(&TEST_BUFFER, &mut offset).is_err());
    }

    #[test]
    fn write_le_at_patches_in_place() {
        let mut data = TEST_BUFFER;
        let mut offset = 4;
        write_le_at::<u16>(&mut data, &mut offset, 0xBEEF).unwrap();

        assert_eq!(data, [0x01, 0x02, 0x03, 0x04, 0xEF, 0xBE, 0x07, 0x08]);
        assert_eq!(offset, 6);

        let mut offset = 6;
        assert!(write_le_at::<u32>(&mut data, &mut offset, 1).is_err());
        assert_eq!(data[6..], [0x07, 0x08]);
    }
}
