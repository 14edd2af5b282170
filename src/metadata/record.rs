//! The structured result of a metadata parse.
//!
//! Every array is insertion-ordered and index-addressed. Every `number_of_*` count is
//! `None` when the stage filling it never ran, and `Some` once it ran, even when it
//! matched nothing.

use crate::metadata::streams::decode_utf16;

/// One entry of the stream directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamInfo {
    /// Stream name, e.g. `#~`
    pub name: String,
    /// Absolute file offset of the stream
    pub offset: u64,
    /// Declared size of the stream
    pub size: u32,
}

/// A four-part assembly version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major version
    pub major: u16,
    /// Minor version
    pub minor: u16,
    /// Build number
    pub build_number: u16,
    /// Revision number
    pub revision_number: u16,
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build_number, self.revision_number
        )
    }
}

/// Identity of the assembly itself, from the first `Assembly` row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyInfo {
    /// Assembly version
    pub version: Version,
    /// Simple name
    pub name: Option<String>,
    /// Culture, absent for culture-neutral assemblies
    pub culture: Option<String>,
}

/// One referenced assembly, from an `AssemblyRef` row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyRefInfo {
    /// Referenced version
    pub version: Version,
    /// Public key or its token as stored; absent when the blob is empty or unreadable
    pub public_key_or_token: Option<Vec<u8>>,
    /// Simple name
    pub name: Option<String>,
}

/// A resource embedded in this file, from a `ManifestResource` row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resource {
    /// Absolute file offset of the resource data, past its length prefix
    pub offset: u64,
    /// Length of the resource data
    pub length: u32,
    /// Resource name
    pub name: Option<String>,
}

/// Everything extracted from the CLI metadata of one image.
///
/// Produced by [`crate::DotNetParser::parse`]. When `is_dotnet` is `false` every other
/// field keeps its default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotNet {
    /// Whether the image passed the managed-image probe
    pub is_dotnet: bool,
    /// Runtime version string of the metadata root, e.g. `v4.0.30319`
    pub version: Option<String>,
    /// Name of the module, from the `Module` table
    pub module_name: Option<String>,
    /// Every walked stream header
    pub streams: Vec<StreamInfo>,
    /// Number of walked stream headers
    pub number_of_streams: Option<u32>,
    /// `#GUID` heap entries, canonical lowercase text
    pub guids: Vec<String>,
    /// Number of GUIDs read
    pub number_of_guids: Option<u32>,
    /// Resources embedded in this file
    pub resources: Vec<Resource>,
    /// Number of embedded resources
    pub number_of_resources: Option<u32>,
    /// Referenced assemblies, one per readable `AssemblyRef` row
    pub assembly_refs: Vec<AssemblyRefInfo>,
    /// Number of readable `AssemblyRef` rows
    pub number_of_assembly_refs: Option<u32>,
    /// The assembly manifest
    pub assembly: Option<AssemblyInfo>,
    /// Names of referenced modules
    pub modulerefs: Vec<String>,
    /// Number of referenced module names
    pub number_of_modulerefs: Option<u32>,
    /// `#US` heap entries, raw UTF-16LE as stored
    pub user_strings: Vec<Vec<u8>>,
    /// Number of user strings
    pub number_of_user_strings: Option<u32>,
    /// Type library GUID text from a `GuidAttribute` on the assembly
    pub typelib: Option<String>,
    /// String constants, raw UTF-16LE as stored
    pub constants: Vec<Vec<u8>>,
    /// Number of string constants
    pub number_of_constants: Option<u32>,
    /// File offsets of field initial data, from the `FieldRVA` table
    pub field_offsets: Vec<u64>,
    /// Number of resolved field offsets
    pub number_of_field_offsets: Option<u32>,
}

impl DotNet {
    /// Decodes the user string at `index` as UTF-16LE, replacing invalid sequences.
    #[must_use]
    pub fn user_string_lossy(&self, index: usize) -> Option<String> {
        self.user_strings
            .get(index)
            .map(|bytes| decode_utf16(bytes))
    }

    /// Counts every populated scalar and every array element, nested ones included.
    ///
    /// Two records of the same image can be compared by this number: a record parsed from
    /// a damaged copy never reports more than the intact one.
    #[must_use]
    pub fn populated_fields(&self) -> usize {
        let scalars = [
            self.is_dotnet,
            self.version.is_some(),
            self.module_name.is_some(),
            self.typelib.is_some(),
            self.number_of_streams.is_some(),
            self.number_of_guids.is_some(),
            self.number_of_resources.is_some(),
            self.number_of_assembly_refs.is_some(),
            self.number_of_modulerefs.is_some(),
            self.number_of_user_strings.is_some(),
            self.number_of_constants.is_some(),
            self.number_of_field_offsets.is_some(),
        ]
        .iter()
        .filter(|populated| **populated)
        .count();

        let streams = self.streams.len() * 3;
        let resources = self
            .resources
            .iter()
            .map(|resource| 2 + usize::from(resource.name.is_some()))
            .sum::<usize>();
        let assembly_refs = self
            .assembly_refs
            .iter()
            .map(|assembly_ref| {
                4 + usize::from(assembly_ref.public_key_or_token.is_some())
                    + usize::from(assembly_ref.name.is_some())
            })
            .sum::<usize>();
        let assembly = self.assembly.as_ref().map_or(0, |assembly| {
            4 + usize::from(assembly.name.is_some()) + usize::from(assembly.culture.is_some())
        });

        scalars
            + streams
            + resources
            + assembly_refs
            + assembly
            + self.guids.len()
            + self.modulerefs.len()
            + self.user_strings.len()
            + self.constants.len()
            + self.field_offsets.len()
    }
}
