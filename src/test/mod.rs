//! Shared test factories.
//!
//! - [`TestImage`] - builds small, valid PE/CLI images with chosen type, method and field flags
//! - [`FakeAccessor`] - an in-memory [`crate::metadata::MetadataAccessor`] that records writes


pub use fake::*;
pub use image::*;
