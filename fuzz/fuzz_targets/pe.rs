#![no_main]

use dotprobe::{DotNet, PeImage};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(image) = PeImage::parse(data) {
        let _ = DotNet::from_image(&image);
    }
});
