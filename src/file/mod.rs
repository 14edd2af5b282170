//! PE image access for the metadata parser.
//!
//! The metadata parser never interprets PE headers itself. Everything it needs from the
//! container format (directory lookup, RVA translation, a handful of header flags) is
//! consumed through the narrow [`Image`] trait. This module provides that trait plus two
//! goblin-backed implementations:
//!
//! - [`PeImage`] - borrows a caller-provided buffer, the zero-copy path used by scanners
//! - [`File`] - owns its bytes (heap buffer or memory-mapped file) and wraps a [`PeImage`]
//!
//! # Key Components
//!
//! - [`crate::file::io`] - The bounds oracle and checked little-endian reads
//! - [`crate::file::parser`] - The checked cursor used for all structure walking
//!
//! # Examples
//!
//! ```rust,no_run
//! use dotprobe::{DotNet, File};
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("sample.exe"))?;
//! let info = DotNet::from_image(&file);
//! println!("managed: {}", info.is_dotnet);
//! # Ok::<(), dotprobe::Error>(())
//! ```

pub mod io;
pub mod parser;

mod memory;
mod physical;

use std::path::Path;

use crate::{
    Error::{Empty, NotSupported},
    Result,
};
use goblin::pe::{data_directories::DataDirectoryType, PE};
use memory::Memory;
use ouroboros::self_referencing;
use physical::Physical;

/// Index of the COM descriptor (CLI header) entry in the data directory array.
pub const COM_DESCRIPTOR_INDEX: u32 = 14;

/// The view of a PE image the metadata parser depends on.
///
/// Implementations answer questions about the container format; the parser does the rest.
/// All offsets returned are file offsets into [`Image::data`].
pub trait Image {
    /// Returns the raw bytes of the image.
    fn data(&self) -> &[u8];

    /// Returns `(rva, size)` of a data directory entry; zeroed entries count as absent.
    fn data_directory(&self, dir_type: DataDirectoryType) -> Option<(u32, u32)>;

    /// Translates an RVA into a file offset inside [`Image::data`].
    fn rva_to_offset(&self, rva: u32) -> Option<usize>;

    /// Returns `true` for PE32+ images.
    fn is_64(&self) -> bool;

    /// Returns `true` if the image is a DLL.
    fn is_dll(&self) -> bool;

    /// Returns the RVA of the entry point, if the image has an optional header.
    fn entry_point(&self) -> Option<u32>;

    /// Returns the declared number of data directory entries.
    fn number_of_rva_and_sizes(&self) -> u32;
}

/// A PE image parsed by goblin over a borrowed buffer.
pub struct PeImage<'a> {
    data: &'a [u8],
    pe: PE<'a>,
}

impl<'a> PeImage<'a> {
    /// Parses the PE headers of `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Empty`] for an empty buffer, [`crate::Error::Goblin`] if the
    /// headers cannot be parsed, and [`crate::Error::NotSupported`] if there is no
    /// optional header.
    pub fn parse(data: &'a [u8]) -> Result<PeImage<'a>> {
        if data.is_empty() {
            return Err(Empty);
        }

        let pe = PE::parse(data)?;
        if pe.header.optional_header.is_none() {
            return Err(NotSupported);
        }

        Ok(PeImage { data, pe })
    }

    /// Returns the underlying goblin PE structure.
    #[must_use]
    pub fn pe(&self) -> &PE<'a> {
        &self.pe
    }
}

impl Image for PeImage<'_> {
    fn data(&self) -> &[u8] {
        self.data
    }

    fn data_directory(&self, dir_type: DataDirectoryType) -> Option<(u32, u32)> {
        self.pe
            .header
            .optional_header?
            .data_directories
            .dirs()
            .find(|(directory_type, directory)| {
                *directory_type == dir_type && directory.virtual_address != 0 && directory.size != 0
            })
            .map(|(_, directory)| (directory.virtual_address, directory.size))
    }

    fn rva_to_offset(&self, rva: u32) -> Option<usize> {
        let optional_header = self.pe.header.optional_header?;
        let file_alignment = optional_header.windows_fields.file_alignment;

        let mut found = None;
        for section in &self.pe.sections {
            let span = section.virtual_size.max(section.size_of_raw_data);
            if rva < section.virtual_address || rva - section.virtual_address >= span {
                continue;
            }

            // The loader rounds raw pointers down to the minimum file alignment
            let raw = if file_alignment >= 0x200 {
                section.pointer_to_raw_data & !0x1FF
            } else {
                section.pointer_to_raw_data
            };

            // Overlapping sections: the one mapped last wins
            if found.map_or(true, |(va, _)| section.virtual_address >= va) {
                let offset = raw.checked_add(rva - section.virtual_address)?;
                found = Some((section.virtual_address, offset));
            }
        }

        let offset = match found {
            Some((_, offset)) => offset,
            None if rva < optional_header.windows_fields.size_of_headers => rva,
            None => return None,
        };

        let offset = usize::try_from(offset).ok()?;
        (offset < self.data.len()).then_some(offset)
    }

    fn is_64(&self) -> bool {
        self.pe.is_64
    }

    fn is_dll(&self) -> bool {
        self.pe.is_lib
    }

    fn entry_point(&self) -> Option<u32> {
        let optional_header = self.pe.header.optional_header?;
        u32::try_from(optional_header.standard_fields.address_of_entry_point).ok()
    }

    fn number_of_rva_and_sizes(&self) -> u32 {
        self.pe
            .header
            .optional_header
            .map_or(0, |header| header.windows_fields.number_of_rva_and_sizes)
    }
}

/// Backend trait for file data sources.
///
/// Abstracts over where the image bytes live, so that [`File`] can own either a heap
/// buffer or a memory-mapped file.
pub trait Backend: Send + Sync {
    /// Returns the entire data buffer.
    fn data(&self) -> &[u8];

    /// Returns the total length of the data buffer.
    fn len(&self) -> usize;
}

#[self_referencing]
/// A PE image that owns its bytes.
///
/// Useful when the caller has a path or a `Vec<u8>` instead of a long-lived borrowed
/// buffer. Apart from ownership it behaves exactly like [`PeImage`].
///
/// # Examples
///
/// ```rust,no_run
/// use dotprobe::{DotNet, File};
///
/// let data = std::fs::read("sample.dll")?;
/// let file = File::from_mem(data)?;
/// let info = DotNet::from_image(&file);
/// if let Some(assembly) = &info.assembly {
///     println!("{:?} {:?}", assembly.name, assembly.version);
/// }
/// # Ok::<(), dotprobe::Error>(())
/// ```
pub struct File {
    /// The underlying data source (memory or file).
    data: Box<dyn Backend>,
    /// The parsed PE structure, referencing the data.
    #[borrows(data)]
    #[not_covariant]
    image: PeImage<'this>,
}

impl File {
    /// Loads and memory-maps a PE file from disk.
    ///
    /// # Errors
    /// Returns an error if the file cannot be mapped, is empty, or is not a PE image.
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Loads a PE image from a memory buffer.
    ///
    /// # Errors
    /// Returns an error if the buffer is empty or is not a PE image.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let data = Box::new(data);

        File::try_new(data, |data| PeImage::parse(data.data()))
    }

    /// Returns the total size of the loaded file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.with_data(|data| data.len())
    }

    /// Returns `true` if the file has a length of zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Image for File {
    fn data(&self) -> &[u8] {
        self.with_data(|data| data.data())
    }

    fn data_directory(&self, dir_type: DataDirectoryType) -> Option<(u32, u32)> {
        self.with_image(|image| image.data_directory(dir_type))
    }

    fn rva_to_offset(&self, rva: u32) -> Option<usize> {
        self.with_image(|image| image.rva_to_offset(rva))
    }

    fn is_64(&self) -> bool {
        self.with_image(|image| image.is_64())
    }

    fn is_dll(&self) -> bool {
        self.with_image(|image| image.is_dll())
    }

    fn entry_point(&self) -> Option<u32> {
        self.with_image(|image| image.entry_point())
    }

    fn number_of_rva_and_sizes(&self) -> u32 {
        self.with_image(|image| image.number_of_rva_and_sizes())
    }
}
