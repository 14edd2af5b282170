//! The CLI header (`IMAGE_COR20_HEADER`), located through the COM descriptor directory.
//!
//! Only its declared size is validated. Malformed-but-loadable samples routinely carry odd
//! flag and reserved values, and the runtime ignores them too.

use crate::{file::parser::Parser, Error::Truncated, Result};

/// Size in bytes of the CLI header, which is also the only accepted value of its `cb` field.
pub const CLI_HEADER_SIZE: usize = 72;

/// The CLI header of a managed image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cor20Header {
    /// Header size in bytes
    pub cb: u32,
    /// Minimum runtime major version
    pub major_runtime_version: u16,
    /// Minimum runtime minor version
    pub minor_runtime_version: u16,
    /// RVA of the metadata root
    pub meta_data_rva: u32,
    /// Size of the metadata
    pub meta_data_size: u32,
    /// Runtime flags (`COMIMAGE_FLAGS_*`)
    pub flags: u32,
    /// Entry point token or native entry point RVA
    pub entry_point_token: u32,
    /// RVA of the managed resources blob
    pub resource_rva: u32,
    /// Size of the managed resources blob
    pub resource_size: u32,
    /// RVA of the strong name signature
    pub strong_name_signature_rva: u32,
    /// Size of the strong name signature
    pub strong_name_signature_size: u32,
    /// Reserved, always zero in valid images
    pub code_manager_table_rva: u32,
    /// Reserved, always zero in valid images
    pub code_manager_table_size: u32,
    /// RVA of the VTable fixups
    pub vtable_fixups_rva: u32,
    /// Size of the VTable fixups
    pub vtable_fixups_size: u32,
    /// Reserved, always zero in valid images
    pub export_address_table_jmp_rva: u32,
    /// Reserved, always zero in valid images
    pub export_address_table_jmp_size: u32,
    /// Reserved for precompiled images
    pub managed_native_header_rva: u32,
    /// Reserved for precompiled images
    pub managed_native_header_size: u32,
}

impl Cor20Header {
    /// Reads the CLI header from the start of `data`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Truncated`] if fewer than [`CLI_HEADER_SIZE`] bytes are
    /// available, or [`crate::Error::MalformedHeader`] if `cb` is not [`CLI_HEADER_SIZE`].
    pub fn read(data: &[u8]) -> Result<Cor20Header> {
        if data.len() < CLI_HEADER_SIZE {
            return Err(Truncated);
        }

        let mut parser = Parser::new(data);

        let cb = parser.read_le::<u32>()?;
        if cb as usize != CLI_HEADER_SIZE {
            return Err(malformed_error!(
                "Invalid CLI header size: expected {}, got {}",
                CLI_HEADER_SIZE,
                cb
            ));
        }

        Ok(Cor20Header {
            cb,
            major_runtime_version: parser.read_le::<u16>()?,
            minor_runtime_version: parser.read_le::<u16>()?,
            meta_data_rva: parser.read_le::<u32>()?,
            meta_data_size: parser.read_le::<u32>()?,
            flags: parser.read_le::<u32>()?,
            entry_point_token: parser.read_le::<u32>()?,
            resource_rva: parser.read_le::<u32>()?,
            resource_size: parser.read_le::<u32>()?,
            strong_name_signature_rva: parser.read_le::<u32>()?,
            strong_name_signature_size: parser.read_le::<u32>()?,
            code_manager_table_rva: parser.read_le::<u32>()?,
            code_manager_table_size: parser.read_le::<u32>()?,
            vtable_fixups_rva: parser.read_le::<u32>()?,
            vtable_fixups_size: parser.read_le::<u32>()?,
            export_address_table_jmp_rva: parser.read_le::<u32>()?,
            export_address_table_jmp_size: parser.read_le::<u32>()?,
            managed_native_header_rva: parser.read_le::<u32>()?,
            managed_native_header_size: parser.read_le::<u32>()?,
        })
    }
}
