//! Shared fixtures for in-crate tests.


pub use builders::{BlobBuilder, MetadataBuilder, StringsBuilder, TablesBuilder};
pub use image::TestImage;
