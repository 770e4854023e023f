//! Metadata streams.
//!
//! Only the two streams the rewrite needs are parsed:
//! - [`TablesHeader`] - the `#~` / `#-` tables stream, with typed access to its rows
//! - [`Strings`] - the `#Strings` heap, for type and member names in log output
//!
//! [`StreamHeader`] describes where a stream lives relative to the metadata root.

mod streamheader;
mod strings;
mod tablesheader;

pub use streamheader::StreamHeader;
pub use strings::Strings;
pub use tablesheader::TablesHeader;
