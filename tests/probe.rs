use dotprobe::prelude::*;
use goblin::pe::data_directories::DataDirectoryType;

/// A PE32 DLL of one section without a COM descriptor.
fn native_dll() -> Vec<u8> {
    let mut data = vec![0u8; 0x400];

    // DOS header
    data[0..2].copy_from_slice(b"MZ");
    data[0x3C..0x40].copy_from_slice(&0x80u32.to_le_bytes());

    // PE signature and COFF header
    data[0x80..0x84].copy_from_slice(b"PE\0\0");
    data[0x84..0x86].copy_from_slice(&0x014Cu16.to_le_bytes()); // machine
    data[0x86..0x88].copy_from_slice(&1u16.to_le_bytes()); // sections
    data[0x94..0x96].copy_from_slice(&0xE0u16.to_le_bytes()); // optional header size
    data[0x96..0x98].copy_from_slice(&0x2102u16.to_le_bytes()); // characteristics

    // optional header
    let optional = 0x98;
    data[optional..optional + 2].copy_from_slice(&0x010Bu16.to_le_bytes());
    data[optional + 16..optional + 20].copy_from_slice(&0x1000u32.to_le_bytes()); // entry point
    data[optional + 28..optional + 32].copy_from_slice(&0x1000_0000u32.to_le_bytes()); // image base
    // section alignment
    data[optional + 32..optional + 36].copy_from_slice(&0x1000u32.to_le_bytes());
    data[optional + 36..optional + 40].copy_from_slice(&0x200u32.to_le_bytes()); // file alignment
    data[optional + 40..optional + 42].copy_from_slice(&4u16.to_le_bytes()); // os major
    data[optional + 48..optional + 50].copy_from_slice(&4u16.to_le_bytes()); // subsystem major
    data[optional + 56..optional + 60].copy_from_slice(&0x2000u32.to_le_bytes()); // size of image
    data[optional + 60..optional + 64].copy_from_slice(&0x200u32.to_le_bytes()); // size of headers
    data[optional + 68..optional + 70].copy_from_slice(&2u16.to_le_bytes()); // subsystem
    data[optional + 92..optional + 96].copy_from_slice(&16u32.to_le_bytes()); // rva and sizes

    // section table
    let section = optional + 0xE0;
    data[section..section + 5].copy_from_slice(b".text");
    data[section + 8..section + 12].copy_from_slice(&0x200u32.to_le_bytes()); // virtual size
    data[section + 12..section + 16].copy_from_slice(&0x1000u32.to_le_bytes()); // virtual address
    data[section + 16..section + 20].copy_from_slice(&0x200u32.to_le_bytes()); // raw size
    data[section + 20..section + 24].copy_from_slice(&0x200u32.to_le_bytes()); // raw pointer
    data[section + 36..section + 40].copy_from_slice(&0x6000_0020u32.to_le_bytes());

    data[0x200] = 0xC3;
    data
}

#[test]
fn empty_input() {
    assert!(matches!(PeImage::parse(&[]), Err(Error::Empty)));
    assert!(matches!(File::from_mem(Vec::new()), Err(Error::Empty)));
}

#[test]
fn not_a_pe() {
    let data = vec![0x41u8; 512];
    assert!(PeImage::parse(&data).is_err());
    assert!(File::from_mem(data).is_err());
}

#[test]
fn native_image_is_not_dotnet() {
    let data = native_dll();

    let image = PeImage::parse(&data).unwrap();
    assert_eq!(image.rva_to_offset(0x1000), Some(0x200));
    assert_eq!(
        image.data_directory(DataDirectoryType::ClrRuntimeHeader),
        None
    );

    let mut info = DotNet::default();
    let stage = DotNetParser::default().parse(&image, &mut info);
    assert_eq!(stage, Stage::ProbedNotManaged);
    assert!(!info.is_dotnet);
    assert_eq!(info.populated_fields(), 0);

    let file = File::from_mem(data).unwrap();
    assert_eq!(DotNet::from_image(&file), info);
}
