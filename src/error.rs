use thiserror::Error;

use crate::metadata::tables::TableId;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::MalformedHeader {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::MalformedHeader {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_range_error {
    ($offset:expr, $length:expr) => {
        crate::Error::OutOfRange {
            offset: $offset as u64,
            length: $length as u64,
        }
    };
}

/// The generic Error type, which covers every failure this library can produce.
///
/// Inside the metadata assembler every one of these is *absorbing*: a failure aborts the
/// stream, table or row that raised it and whatever was extracted so far is kept. Only
/// the loader side ([`crate::File`], [`crate::PeImage`]) hands errors back to the caller.
///
/// # Error Categories
///
/// ## Metadata decoding
/// - [`Error::Truncated`] - a fixed-size read ran past the end of the buffer
/// - [`Error::OutOfRange`] - a computed offset/length pair exceeds the buffer
/// - [`Error::MalformedHeader`] - a magic, size or alignment invariant was violated
/// - [`Error::InvalidPrefix`] - a compressed length prefix is not a known encoding
/// - [`Error::CorruptCardinality`] - a table declares more rows than the safety cap
///
/// ## Loading
/// - [`Error::Empty`] - empty input provided
/// - [`Error::NotSupported`] - the PE image lacks structures required for probing
/// - [`Error::Io`] - filesystem I/O errors
/// - [`Error::Goblin`] - PE parsing errors from the goblin crate
///
/// # Examples
///
/// ```rust,no_run
/// use dotprobe::{Error, File};
/// use std::path::Path;
///
/// match File::from_file(Path::new("sample.exe")) {
///     Ok(_) => println!("loaded"),
///     Err(Error::Goblin(err)) => eprintln!("not a PE image: {err}"),
///     Err(err) => eprintln!("{err}"),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A fixed-size read needed more bytes than remain in the buffer.
    #[error("Buffer too short for the requested read")]
    Truncated,

    /// A computed offset and length do not lie inside the buffer.
    ///
    /// # Fields
    ///
    /// * `offset` - Start of the rejected range
    /// * `length` - Length of the rejected range
    #[error("Range {offset:#x}+{length:#x} exceeds the buffer")]
    OutOfRange {
        /// Start of the rejected range
        offset: u64,
        /// Length of the rejected range
        length: u64,
    },

    /// A header invariant (magic, fixed size, alignment) was violated.
    ///
    /// Includes the source location where the violation was detected.
    #[error("Malformed - {file}:{line}: {message}")]
    MalformedHeader {
        /// The message to be printed for the MalformedHeader error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A compressed length prefix used an unrecognized encoding.
    #[error("Invalid compressed length prefix - {0:#04x}")]
    InvalidPrefix(u8),

    /// A metadata table declared an implausible number of rows.
    #[error("Table {table:?} declares {rows} rows, exceeding the row cap")]
    CorruptCardinality {
        /// The table carrying the rejected row count
        table: TableId,
        /// The declared row count
        rows: u32,
    },

    /// Provided input was empty.
    #[error("Provided input was empty")]
    Empty,

    /// The PE image is missing a structure needed for probing (e.g. the optional header).
    #[error("This file type is not supported")]
    NotSupported,

    /// File I/O error.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Error from the goblin crate during PE parsing.
    #[error("{0}")]
    Goblin(#[from] goblin::error::Error),
}
