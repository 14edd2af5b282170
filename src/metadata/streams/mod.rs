//! Metadata streams for .NET assemblies.
//!
//! The metadata root is followed by a directory of named streams. Five of them are
//! recognized, each handled by its own reader:
//!
//! ## String Heaps
//! - **`#Strings`** - NUL-terminated UTF-8 identifiers, see [`Strings`]
//! - **`#US`** - length-prefixed UTF-16 literals, see [`UserStrings`]
//!
//! ## Binary Data
//! - **`#Blob`** - length-prefixed binary values, see [`Blob`]
//! - **`#GUID`** - a packed array of 128-bit GUIDs, see [`Guid`]
//!
//! ## Metadata Tables
//! - **`#~`** (or the uncompressed **`#-`**) - the table stream, see [`TablesHeader`]
//!
//! Every reader works on absolute offsets into the whole image buffer. A stream's declared
//! size bounds the sequential walks (`#US`, `#GUID`), but lookups by index are checked
//! against the image only.
//!
//! # Examples
//!
//! ```rust
//! use dotprobe::metadata::streams::Blob;
//!
//! let heap = [0x00, 0x04, 0xAA, 0xBB, 0xCC, 0x00];
//! let blob = Blob::new(&heap, 0);
//!
//! assert_eq!(blob.get(1)?, &[0xAA, 0xBB, 0xCC]);
//! # Ok::<(), dotprobe::Error>(())
//! ```
//!
//! # References
//!
//! - ECMA-335 6th Edition, Partition II, Section 24.2.2 - Stream Headers
//! - ECMA-335 6th Edition, Partition II, Section 24.2.4 - #US and #Blob heaps
//! - ECMA-335 6th Edition, Partition II, Section 24.2.6 - #~ stream

/// The header of a stream, indicates location + size + name
mod streamheader;
pub use streamheader::{StreamHeader, STREAM_NAME_SIZE};

/// The directory of all stream headers
mod directory;
pub use directory::{StreamDirectory, StreamLocation};

/// The '#Strings' heap implementation
mod strings;
pub use strings::Strings;

/// The '#US' heap implementation
mod userstrings;
pub use userstrings::{decode_utf16, UserStrings};

/// The '#~' header implementation
mod tablesheader;
pub use tablesheader::{HeapSizes, TablesHeader, TABLES_HEADER_SIZE};

/// The '#GUID' heap / array implementation
mod guid;
pub use guid::{format_guid, Guid};

/// The '#Blob' heap implementation
mod blob;
pub use blob::{Blob, BlobEntry};
