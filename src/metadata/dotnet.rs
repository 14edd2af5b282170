//! The metadata assembler: probe, root, stream directory, heaps and tables, in that order.
//!
//! Nothing past the probe can fail the parse as a whole. Each stage that hits corrupt input
//! logs the reason at `debug` level and leaves behind whatever it had extracted, and the
//! stages after it still run.

use goblin::pe::data_directories::DataDirectoryType;

use crate::{
    file::{io::slice_at, Image, COM_DESCRIPTOR_INDEX},
    metadata::{
        config::ParserConfig,
        cor20header::{Cor20Header, CLI_HEADER_SIZE},
        record::{DotNet, StreamInfo},
        root::Root,
        streams::{format_guid, Blob, Guid, StreamDirectory, Strings, TablesHeader, UserStrings},
        tables::{self, TableContext},
    },
};

/// Thunk every 32-bit managed executable starts at: `jmp dword ptr [_CorExeMain]`
const ENTRY_POINT_STUB: [u8; 2] = [0xFF, 0x25];

/// The furthest point a parse reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Nothing was inspected yet
    NotProbed,
    /// The image is not a managed image; the record only says so
    ProbedNotManaged,
    /// The CLI header and metadata root are valid
    ProbedManaged,
    /// The version string was taken from the root, the stream count was not readable
    RootParsed,
    /// The stream directory was walked
    StreamsResolved,
    /// The table stream was laid out and extracted
    TablesParsed,
}

/// What the probe found: where the CLI header points and the validated root.
struct Probe {
    header: Cor20Header,
    root: Root,
}

/// Builds a [`DotNet`] record from an [`Image`].
///
/// The parser holds no state between calls, so one instance can serve any number of images,
/// from any number of threads.
///
/// # Examples
///
/// ```rust,no_run
/// use dotprobe::{DotNet, DotNetParser, File, ParserConfig, Stage};
/// use std::path::Path;
///
/// let file = File::from_file(Path::new("sample.dll"))?;
///
/// let mut info = DotNet::default();
/// let stage = DotNetParser::new(ParserConfig::identity()).parse(&file, &mut info);
/// if stage >= Stage::ProbedManaged {
///     println!("{:?} {:?}", info.module_name, info.guids);
/// }
/// # Ok::<(), dotprobe::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DotNetParser {
    config: ParserConfig,
}

impl DotNetParser {
    /// Creates a parser that applies `config`
    #[must_use]
    pub fn new(config: ParserConfig) -> DotNetParser {
        DotNetParser { config }
    }

    /// Parses `image` into `out`, returning the last stage reached.
    ///
    /// `out` is reset first, so it only ever holds the result of this call. When the probe
    /// fails the record stays at its default, with `is_dotnet` set to `false`.
    pub fn parse(&self, image: &dyn Image, out: &mut DotNet) -> Stage {
        *out = DotNet::default();

        let Some(probe) = probe(image) else {
            return Stage::ProbedNotManaged;
        };

        let data = image.data();
        out.is_dotnet = true;
        out.version = probe.root.version.clone();

        let count = match probe.root.stream_number(data) {
            Ok(count) => count,
            Err(error) => {
                log::debug!("Stream count unreadable: {error}");
                return Stage::RootParsed;
            }
        };

        let directory = StreamDirectory::read(data, &probe.root, count);
        out.streams = directory
            .headers
            .iter()
            .map(|header| StreamInfo {
                name: header.name.clone(),
                offset: probe.root.offset as u64 + u64::from(header.offset),
                size: header.size,
            })
            .collect();
        out.number_of_streams = Some(u32::try_from(out.streams.len()).unwrap_or(u32::MAX));

        let mut stage = Stage::StreamsResolved;

        if self.config.parse_guids {
            if let Some(location) = directory.guid {
                let heap = Guid::new(data, location.offset, location.size, self.config.max_guids);
                out.guids = heap.iter().map(|guid| format_guid(&guid)).collect();
                out.number_of_guids = Some(u32::try_from(out.guids.len()).unwrap_or(u32::MAX));
            }
        }

        if self.config.parse_tables {
            if let (Some(tilde), Some(strings), Some(blob)) =
                (directory.tables, directory.strings, directory.blob)
            {
                match TablesHeader::read(data, tilde.offset, self.config.max_table_rows) {
                    Ok(header) => {
                        let context = TableContext {
                            data,
                            header: &header,
                            strings: Strings::new(data, strings.offset, self.config.max_string_len),
                            blob: Blob::new(data, blob.offset),
                            image,
                            resource_base: resource_base(image, &probe.header),
                        };

                        tables::extract(&context, out);
                        stage = Stage::TablesParsed;
                    }
                    Err(error) => log::debug!("Table stream rejected: {error}"),
                }
            }
        }

        if self.config.parse_user_strings {
            if let Some(location) = directory.user_strings {
                match UserStrings::parse(data, location.offset, location.size) {
                    Ok(heap) => {
                        out.user_strings = heap.iter().map(<[u8]>::to_vec).collect();
                        out.number_of_user_strings =
                            Some(u32::try_from(out.user_strings.len()).unwrap_or(u32::MAX));
                    }
                    Err(error) => log::debug!("#US heap rejected: {error}"),
                }
            }
        }

        stage
    }
}

impl DotNet {
    /// Parses `image` with the default configuration.
    #[must_use]
    pub fn from_image<I: Image>(image: &I) -> DotNet {
        let mut out = DotNet::default();
        DotNetParser::default().parse(image, &mut out);
        out
    }
}

/// Runs the managed-image checks, returning `None` with a `debug` reason on rejection.
fn probe(image: &dyn Image) -> Option<Probe> {
    let data = image.data();

    let Some((clr_rva, _)) = image.data_directory(DataDirectoryType::ClrRuntimeHeader) else {
        log::debug!("No COM descriptor directory");
        return None;
    };

    if image.is_64() && image.number_of_rva_and_sizes() < COM_DESCRIPTOR_INDEX {
        log::debug!(
            "PE32+ image declares {} data directories",
            image.number_of_rva_and_sizes()
        );
        return None;
    }

    let header = image
        .rva_to_offset(clr_rva)
        .and_then(|offset| slice_at(data, offset, CLI_HEADER_SIZE))
        .ok_or_else(|| out_of_range_error!(clr_rva, CLI_HEADER_SIZE))
        .and_then(Cor20Header::read);
    let header = match header {
        Ok(header) => header,
        Err(error) => {
            log::debug!("CLI header rejected: {error}");
            return None;
        }
    };

    let Some(root_offset) = image.rva_to_offset(header.meta_data_rva) else {
        log::debug!("Metadata RVA {:#x} is not mapped", header.meta_data_rva);
        return None;
    };

    let root = match Root::read(data, root_offset) {
        Ok(root) => root,
        Err(error) => {
            log::debug!("Metadata root rejected: {error}");
            return None;
        }
    };

    if !image.is_64() && !image.is_dll() {
        let stub = image
            .entry_point()
            .and_then(|rva| image.rva_to_offset(rva))
            .and_then(|offset| slice_at(data, offset, ENTRY_POINT_STUB.len()));

        if stub != Some(&ENTRY_POINT_STUB[..]) {
            log::debug!("Entry point is not the managed startup stub");
            return None;
        }
    }

    Some(Probe { header, root })
}

/// File offset of the managed resources blob, if the CLI header points at one.
fn resource_base(image: &dyn Image, header: &Cor20Header) -> Option<usize> {
    image.rva_to_offset(header.resource_rva)
}
