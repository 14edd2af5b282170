//! # dotprobe Prelude
//!
//! The types needed to load an image and read its metadata record.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotprobe operations
pub use crate::Error;

/// The result type used throughout dotprobe
pub use crate::Result;

/// Limits and stage switches of the parser
pub use crate::ParserConfig;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The staged metadata parser and the stage it reached
pub use crate::{DotNetParser, Stage};

/// Image loading
pub use crate::{File, Image, PeImage};

// ================================================================================================
// Output Record
// ================================================================================================

/// The extracted record and its parts
pub use crate::{AssemblyInfo, AssemblyRefInfo, DotNet, Resource, StreamInfo, Version};

// ================================================================================================
// Low-Level Access
// ================================================================================================

/// Checked cursor over a byte buffer
pub use crate::Parser;

/// Metadata tables and their identifiers
pub use crate::metadata::tables::{MetadataTable, TableId};

/// Metadata streams
pub use crate::metadata::streams::{StreamDirectory, TablesHeader};
