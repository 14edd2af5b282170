//! Parser configuration
//!
//! The limits here bound the work done on a single image. They are structural caps on
//! untrusted input, not tuning knobs: the defaults reproduce the behavior hosts expect
//! from a `dotnet` module, and lowering them only ever removes output.

/// Configuration for [`crate::DotNetParser`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ParserConfig {
    /// Tables declaring more rows than this abort table parsing (default: 10000)
    pub max_table_rows: u32,

    /// Maximum number of `#GUID` records read, regardless of the stream size (default: 16)
    pub max_guids: usize,

    /// Maximum distance scanned for the terminator of a `#Strings` entry (default: 1024)
    pub max_string_len: usize,

    /// Read the `#GUID` heap
    pub parse_guids: bool,

    /// Run the row-count and table passes
    pub parse_tables: bool,

    /// Walk the `#US` heap
    pub parse_user_strings: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_table_rows: 10000,
            max_guids: 16,
            max_string_len: 1024,
            parse_guids: true,
            parse_tables: true,
            parse_user_strings: true,
        }
    }
}

impl ParserConfig {
    /// Creates a configuration that stops after the stream directory
    ///
    /// Yields `is_dotnet`, the runtime version and the stream list only.
    #[must_use]
    pub fn probe_only() -> Self {
        Self {
            parse_guids: false,
            parse_tables: false,
            parse_user_strings: false,
            ..Self::default()
        }
    }

    /// Creates a configuration for assembly identity
    ///
    /// Reads GUIDs and tables but skips the `#US` heap, which is by far the largest
    /// output of a typical assembly.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            parse_user_strings: false,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets() {
        let default = ParserConfig::default();
        assert_eq!(default.max_table_rows, 10000);
        assert_eq!(default.max_guids, 16);
        assert_eq!(default.max_string_len, 1024);
        assert!(default.parse_guids);
        assert!(default.parse_tables);
        assert!(default.parse_user_strings);

        let probe_only = ParserConfig::probe_only();
        assert!(!probe_only.parse_guids);
        assert!(!probe_only.parse_tables);
        assert!(!probe_only.parse_user_strings);
        assert_eq!(probe_only.max_table_rows, default.max_table_rows);

        let identity = ParserConfig::identity();
        assert!(identity.parse_guids);
        assert!(identity.parse_tables);
        assert!(!identity.parse_user_strings);
    }
}
