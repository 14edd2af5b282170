// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory
// - 'file/mod.rs' borrows the image from its own backend through ouroboros

//! # dotprobe
//!
//! A bounds-checked extractor for the CLI metadata of .NET PE images, producing the flat
//! identity record malware scanners match on: runtime version, streams, GUIDs, assembly
//! and module names, referenced assemblies and modules, embedded resources, user strings,
//! string constants, field data offsets and the type library GUID.
//!
//! The input is assumed hostile. Every offset read from the file is checked before use,
//! and corruption anywhere past the managed-image probe only shortens the output; the
//! parser never panics and never hands an error back to the caller.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dotprobe::prelude::*;
//!
//! let data = std::fs::read("sample.exe")?;
//! let image = PeImage::parse(&data)?;
//! let info = DotNet::from_image(&image);
//!
//! if info.is_dotnet {
//!     println!("{:?} {:?}", info.version, info.module_name);
//!     for assembly_ref in &info.assembly_refs {
//!         println!("  {:?} {}", assembly_ref.name, assembly_ref.version);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - [`file`] - The [`Image`] seam, the goblin-backed [`PeImage`] and owning [`File`], and
//!   the checked byte I/O everything else is built on
//! - [`metadata`] - CLI header, metadata root, streams, tables and the assembler
//!   ([`DotNetParser`])
//! - [`prelude`] - Curated re-exports
//!
//! The amount of work per image is bounded by [`ParserConfig`]: a table row cap, a GUID
//! count cap and a string scan cap.
//!
//! ## Logging
//!
//! Every absorbed error is reported through the [`log`] facade at `debug` level, and
//! implausible-but-accepted structure at `warn`. Install any `log` backend to see them.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust,no_run
/// use dotprobe::prelude::*;
///
/// let file = File::from_file("sample.dll".as_ref())?;
/// let info = DotNet::from_image(&file);
/// println!("{:?}", info.assembly);
/// # Ok::<(), dotprobe::Error>(())
/// ```
pub mod prelude;

/// PE image access and bounds-checked reads
pub mod file;

/// CLI metadata structures and the assembler that turns them into a [`DotNet`] record
///
/// # Key Components
///
/// - [`metadata::cor20header`] - The CLI header
/// - [`metadata::root`] - The metadata root (`BSJB`)
/// - [`metadata::streams`] - Stream directory, heaps and the table stream header
/// - [`metadata::tables`] - Row layouts and per-table extraction
/// - [`metadata::dotnet`] - The staged assembler
pub mod metadata;

pub use error::Error;

/// The result type used throughout dotprobe.
pub type Result<T> = std::result::Result<T, Error>;

pub use file::{parser::Parser, File, Image, PeImage};
pub use metadata::{
    config::ParserConfig,
    dotnet::{DotNetParser, Stage},
    record::{AssemblyInfo, AssemblyRefInfo, DotNet, Resource, StreamInfo, Version},
};
