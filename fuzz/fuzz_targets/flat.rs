#![no_main]

use dotprobe::{DotNet, Image};
use goblin::pe::data_directories::DataDirectoryType;
use libfuzzer_sys::fuzz_target;

/// RVAs are file offsets, the CLI header RVA is taken from the first four bytes
struct FlatImage<'a>(&'a [u8]);

impl Image for FlatImage<'_> {
    fn data(&self) -> &[u8] {
        self.0
    }

    fn data_directory(&self, dir_type: DataDirectoryType) -> Option<(u32, u32)> {
        if dir_type != DataDirectoryType::ClrRuntimeHeader {
            return None;
        }
        let rva = u32::from_le_bytes(self.0.get(..4)?.try_into().ok()?);
        Some((rva % self.0.len() as u32, 72))
    }

    fn rva_to_offset(&self, rva: u32) -> Option<usize> {
        ((rva as usize) < self.0.len()).then_some(rva as usize)
    }

    fn is_64(&self) -> bool {
        self.0.len() % 2 == 0
    }

    fn is_dll(&self) -> bool {
        true
    }

    fn entry_point(&self) -> Option<u32> {
        None
    }

    fn number_of_rva_and_sizes(&self) -> u32 {
        16
    }
}

fuzz_target!(|data: &[u8]| {
    let _ = DotNet::from_image(&FlatImage(data));
});
