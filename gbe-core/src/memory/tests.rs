use super::{AccessKind, AddressSpace, Cartridge, CartridgeLoadError, MemoryError, MemoryRegion};
use crate::memory::address;

fn empty_address_space() -> AddressSpace {
    AddressSpace::new(Cartridge::default())
}

fn assert_read_write(address_space: &mut AddressSpace, address: u32) {
    address_space
        .set(address, 0xA0)
        .unwrap_or_else(|err| panic!("write to {address:04X} should succeed: {err}"));
    assert_eq!(Ok(0xA0), address_space.get(address), "address {address:04X}");
}

#[test]
fn read_full_range() {
    let address_space = empty_address_space();

    for address in 0..=0xFFFF_u32 {
        match address_space.get(address) {
            Ok(value) => assert_eq!(0x00, value, "address {address:04X} should start zeroed"),
            Err(MemoryError::UnimplementedRegion { region, access, .. }) => {
                assert!(!region.is_readable());
                assert_eq!(AccessKind::Read, access);
            }
            Err(err) => panic!("unexpected error at {address:04X}: {err}"),
        }
    }
}

#[test]
fn write_full_range() {
    let mut address_space = empty_address_space();

    for address in 0..=0xFFFF_u32 {
        for value in [0x00, 0xFF] {
            match address_space.set(address, value) {
                Ok(()) => assert_eq!(Ok(value), address_space.get(address)),
                Err(MemoryError::UnimplementedRegion { region, access, .. }) => {
                    assert!(!region.is_writable());
                    assert_eq!(AccessKind::Write, access);
                }
                Err(err) => panic!("unexpected error at {address:04X}: {err}"),
            }
        }
    }
}

#[test]
fn out_of_range() {
    let mut address_space = empty_address_space();

    assert_eq!(
        Err(MemoryError::OutOfRange { address: 0x10000 }),
        address_space.get(0x10000)
    );
    assert_eq!(
        Err(MemoryError::OutOfRange { address: 0x10000 }),
        address_space.set(0x10000, 0x00)
    );
    assert_eq!(
        Err(MemoryError::OutOfRange { address: u32::MAX }),
        address_space.get(u32::MAX)
    );
}

#[test]
fn rom_access() {
    let mut rom = vec![0x00; 0x8000];
    rom[0x0000] = 0x11;
    rom[0x0100] = 0x66;
    rom[0x0150] = 0xAA;
    rom[0x7FFF] = 0xFF;

    let mut address_space =
        AddressSpace::new(Cartridge::new(rom).expect("32KB ROM should be valid"));
    assert_eq!(Ok(0x11), address_space.get(0x0000));
    assert_eq!(Ok(0x66), address_space.get(0x0100));
    assert_eq!(Ok(0xAA), address_space.get(0x0150));
    assert_eq!(Ok(0xFF), address_space.get(0x7FFF));

    assert_eq!(
        Err(MemoryError::UnimplementedRegion {
            address: 0x0000,
            region: MemoryRegion::Rom,
            access: AccessKind::Write,
        }),
        address_space.set(0x0000, 0x55)
    );
    assert_eq!(Ok(0x11), address_space.get(0x0000));
}

#[test]
fn short_rom_is_padded() {
    let address_space = AddressSpace::new(
        Cartridge::new(vec![0x12, 0x34]).expect("short ROM should be padded"),
    );

    assert_eq!(Ok(0x12), address_space.get(0x0000));
    assert_eq!(Ok(0x34), address_space.get(0x0001));
    assert_eq!(Ok(0x00), address_space.get(0x7FFF));
}

#[test]
fn oversized_rom_is_rejected() {
    let result = Cartridge::new(vec![0x00; 0x8001]);
    assert!(matches!(
        result,
        Err(CartridgeLoadError::UnsupportedSize { size: 0x8001 })
    ));
}

#[test]
fn ram_regions() {
    let mut address_space = empty_address_space();

    for (start, end) in [
        (address::TILE_RAM_START, address::TILE_RAM_END),
        (address::BG_MAP_1_START, address::BG_MAP_1_END),
        (address::BG_MAP_2_START, address::BG_MAP_2_END),
        (address::EXTERNAL_RAM_START, address::EXTERNAL_RAM_END),
        (address::WORKING_RAM_START, address::WORKING_RAM_END),
        (address::OAM_START, address::OAM_END),
        (address::HRAM_START, address::HRAM_END),
    ] {
        assert_read_write(&mut address_space, start.into());
        assert_read_write(&mut address_space, end.into());
    }
}

#[test]
fn regions_are_independent() {
    let mut address_space = empty_address_space();

    address_space.set(0x97FF, 0x01).unwrap();
    address_space.set(0x9800, 0x02).unwrap();
    address_space.set(0x9BFF, 0x03).unwrap();
    address_space.set(0x9C00, 0x04).unwrap();

    assert_eq!(Ok(0x01), address_space.get(0x97FF));
    assert_eq!(Ok(0x02), address_space.get(0x9800));
    assert_eq!(Ok(0x03), address_space.get(0x9BFF));
    assert_eq!(Ok(0x04), address_space.get(0x9C00));
}

#[test]
fn interrupt_enable_register() {
    let mut address_space = empty_address_space();

    address_space.set(0xFFFF, 0xA0).unwrap();
    assert_eq!(Ok(0xA0), address_space.get(0xFFFF));
    assert_eq!(Ok(0x00), address_space.get(0xFFFE));
}

#[test]
fn unimplemented_regions() {
    let mut address_space = empty_address_space();

    for (address, region) in [
        (0xE000, MemoryRegion::EchoRam),
        (0xFDFF, MemoryRegion::EchoRam),
        (0xFEA0, MemoryRegion::Unusable),
        (0xFEFF, MemoryRegion::Unusable),
        (0xFF00, MemoryRegion::IoRegisters),
        (0xFF7F, MemoryRegion::IoRegisters),
    ] {
        assert_eq!(
            Err(MemoryError::UnimplementedRegion {
                address,
                region,
                access: AccessKind::Read,
            }),
            address_space.get(address.into())
        );
        assert_eq!(
            Err(MemoryError::UnimplementedRegion {
                address,
                region,
                access: AccessKind::Write,
            }),
            address_space.set(address.into(), 0x00)
        );
    }
}

#[test]
fn u16_access_is_little_endian() {
    let mut address_space = empty_address_space();

    address_space.write_address_u16(0xC100, 0x1234).unwrap();
    assert_eq!(Ok(0x34), address_space.get(0xC100));
    assert_eq!(Ok(0x12), address_space.get(0xC101));
    assert_eq!(Ok(0x1234), address_space.read_address_u16(0xC100));
}

#[test]
fn failed_u16_write_leaves_memory_unchanged() {
    let mut address_space = empty_address_space();

    // 0xFF7F is an I/O register, 0xFF80 is high RAM
    let result = address_space.write_address_u16(0xFF7F, 0xABCD);
    assert!(matches!(
        result,
        Err(MemoryError::UnimplementedRegion {
            address: 0xFF7F,
            region: MemoryRegion::IoRegisters,
            access: AccessKind::Write,
        })
    ));
    assert_eq!(Ok(0x00), address_space.get(0xFF80));
}

#[test]
fn region_display() {
    let err = MemoryError::UnimplementedRegion {
        address: 0xE123,
        region: MemoryRegion::EchoRam,
        access: AccessKind::Read,
    };
    assert_eq!(
        "read of unimplemented memory region (echo RAM) at address 0xE123",
        err.to_string()
    );
}
