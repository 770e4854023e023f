//! Stream headers of the metadata root.
//!
//! # Reference
//! - [ECMA-335 II.24.2.2](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use crate::{file::io::read_le, Error::OutOfBounds, Result};

/// Maximum length of a stream name, without the terminator.
const MAX_NAME_LEN: usize = 32;

/// A stream header provides the names, and the position and length of a particular table or heap. Note that the
/// length of a Stream header structure is not fixed, but depends on the length of its name field (a variable
/// length null-terminated string, padded to 4 bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamHeader {
    /// Offset of the stream, relative to the metadata root
    pub offset: u32,
    /// Size of this stream in bytes, shall be a multiple of 4
    pub size: u32,
    /// Name of the stream
    pub name: String,
}

impl StreamHeader {
    /// Create a `StreamHeader` from a sequence of bytes
    ///
    /// Unknown stream names are accepted; they are simply never looked up.
    ///
    /// # Errors
    /// Returns an error if the data is too short or the name is not terminated within 32 bytes
    pub fn from(data: &[u8]) -> Result<StreamHeader> {
        if data.len() < 9 {
            return Err(OutOfBounds);
        }

        let name_area = &data[8..data.len().min(8 + MAX_NAME_LEN + 1)];
        let Some(name_len) = name_area.iter().position(|byte| *byte == 0) else {
            return Err(malformed_error!("Stream header name is not terminated"));
        };

        let Ok(name) = std::str::from_utf8(&name_area[..name_len]) else {
            return Err(malformed_error!("Stream header name is not valid UTF-8"));
        };

        Ok(StreamHeader {
            offset: read_le::<u32>(data)?,
            size: read_le::<u32>(&data[4..])?,
            name: name.to_string(),
        })
    }

    /// Size of this header in the stream directory.
    #[must_use]
    pub fn header_len(&self) -> usize {
        8 + ((self.name.len() + 1 + 3) & !3)
    }
}
