//! CLI metadata of a managed PE image.
//!
//! The structures are read in file order: the CLI header points at the metadata root, the
//! root is followed by the stream directory, and the streams hold the heaps and the table
//! stream. [`dotnet::DotNetParser`] drives all of it and fills a [`record::DotNet`].
//!
//! # Key Components
//!
//! - [`cor20header`] - The CLI header
//! - [`root`] - The metadata root
//! - [`streams`] - Stream directory, `#Strings`, `#US`, `#GUID`, `#Blob` and `#~`
//! - [`tables`] - Table kinds, row layouts and extraction
//! - [`config`] - Work limits
//! - [`record`] - The output record
//!
//! # Examples
//!
//! ```rust,no_run
//! use dotprobe::metadata::{config::ParserConfig, dotnet::DotNetParser, record::DotNet};
//! use dotprobe::PeImage;
//!
//! let data = std::fs::read("sample.dll")?;
//! let image = PeImage::parse(&data)?;
//!
//! let mut info = DotNet::default();
//! DotNetParser::new(ParserConfig::default()).parse(&image, &mut info);
//! for resource in &info.resources {
//!     println!("{:?} at {:#x}", resource.name, resource.offset);
//! }
//! # Ok::<(), dotprobe::Error>(())
//! ```

/// Parser limits and stage switches
pub mod config;
/// Implementation of the Header of CIL
pub mod cor20header;
/// The staged metadata assembler
pub mod dotnet;
/// The extracted metadata record
pub mod record;
/// Implementation of the root metadata structure
pub mod root;
/// Implementation of all metadata streams (tables, heaps, etc.)
pub mod streams;
/// Implementation of the .NET metadata tables
pub mod tables;
