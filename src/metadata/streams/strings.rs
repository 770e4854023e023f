//! String heap (`#Strings`).
//!
//! Holds the null-terminated UTF-8 identifiers referenced by the metadata tables, type and
//! member names among them. Index 0 is always the empty string.
//!
//! # Reference
//! - [ECMA-335 II.24.2.3](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)

use std::ffi::CStr;

use crate::{Error::OutOfBounds, Result};

/// A view on the `#Strings` heap of an image.
///
/// # Examples
///
/// ```rust
/// use publiciser::metadata::streams::Strings;
/// let data = &[0u8, b'F', b'o', b'o', 0u8];
/// let strings = Strings::from(data).unwrap();
/// assert_eq!(strings.get(1).unwrap(), "Foo");
/// assert_eq!(strings.get(0).unwrap(), "");
/// ```
pub struct Strings<'a> {
    data: &'a [u8],
}

impl<'a> Strings<'a> {
    /// Create a `Strings` view from the heap bytes.
    ///
    /// # Errors
    /// Returns an error if the heap is empty or does not start with the empty string
    pub fn from(data: &'a [u8]) -> Result<Strings<'a>> {
        if data.is_empty() || data[0] != 0 {
            return Err(malformed_error!("Provided #String heap is empty"));
        }

        Ok(Strings { data })
    }

    /// Get the string starting at `index`.
    ///
    /// # Errors
    /// Returns an error if the index is out of bounds, or the string is unterminated or not UTF-8
    pub fn get(&self, index: usize) -> Result<&'a str> {
        if index >= self.data.len() {
            return Err(OutOfBounds);
        }

        CStr::from_bytes_until_nul(&self.data[index..])
            .ok()
            .and_then(|result| result.to_str().ok())
            .ok_or_else(|| malformed_error!("Invalid string at index - {}", index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crafted() {
        let data = b"\0<Module>\0Foo\0Bar.Baz\0";
        let strings = Strings::from(data).unwrap();

        assert_eq!(strings.get(0).unwrap(), "");
        assert_eq!(strings.get(1).unwrap(), "<Module>");
        assert_eq!(strings.get(10).unwrap(), "Foo");
        assert_eq!(strings.get(14).unwrap(), "Bar.Baz");
        assert_eq!(strings.get(18).unwrap(), "Baz");
    }

    #[test]
    fn invalid() {
        assert!(Strings::from(&[]).is_err());
        assert!(Strings::from(b"Foo\0").is_err());

        let strings = Strings::from(b"\0Foo").unwrap();
        assert!(matches!(strings.get(4), Err(OutOfBounds)));
        assert!(strings.get(1).is_err());
    }
}
