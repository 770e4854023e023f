//! `NestedClass` table (0x29): which types are declared inside another type.

mod raw;

pub use raw::*;
