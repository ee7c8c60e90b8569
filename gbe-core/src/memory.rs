pub mod address;

#[cfg(test)]
mod tests;

use crate::serialize::{deserialize_array, serialize_array};
use address::{
    BG_MAP_SIZE, EXTERNAL_RAM_SIZE, HRAM_SIZE, OAM_SIZE, ROM_SIZE, TILE_RAM_SIZE,
    WORKING_RAM_SIZE,
};
use gbe_proc_macros::EnumDisplay;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{fs, io};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumDisplay)]
pub enum AccessKind {
    #[display = "read"]
    Read,
    #[display = "write"]
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumDisplay)]
pub enum MemoryRegion {
    #[display = "cartridge ROM"]
    Rom,
    #[display = "tile RAM"]
    TileRam,
    #[display = "background map 1"]
    BackgroundMap1,
    #[display = "background map 2"]
    BackgroundMap2,
    #[display = "external RAM"]
    ExternalRam,
    #[display = "working RAM"]
    WorkingRam,
    #[display = "echo RAM"]
    EchoRam,
    #[display = "OAM"]
    Oam,
    #[display = "unusable memory"]
    Unusable,
    #[display = "I/O registers"]
    IoRegisters,
    #[display = "high RAM"]
    HighRam,
    #[display = "IE register"]
    InterruptEnable,
}

impl MemoryRegion {
    pub fn from_address(address: u16) -> Self {
        match address {
            address::ROM_START..=address::ROM_END => Self::Rom,
            address::TILE_RAM_START..=address::TILE_RAM_END => Self::TileRam,
            address::BG_MAP_1_START..=address::BG_MAP_1_END => Self::BackgroundMap1,
            address::BG_MAP_2_START..=address::BG_MAP_2_END => Self::BackgroundMap2,
            address::EXTERNAL_RAM_START..=address::EXTERNAL_RAM_END => Self::ExternalRam,
            address::WORKING_RAM_START..=address::WORKING_RAM_END => Self::WorkingRam,
            address::ECHO_RAM_START..=address::ECHO_RAM_END => Self::EchoRam,
            address::OAM_START..=address::OAM_END => Self::Oam,
            address::UNUSABLE_START..=address::UNUSABLE_END => Self::Unusable,
            address::IO_REGISTERS_START..=address::IO_REGISTERS_END => Self::IoRegisters,
            address::HRAM_START..=address::HRAM_END => Self::HighRam,
            address::IE_REGISTER => Self::InterruptEnable,
        }
    }

    pub fn start_address(self) -> u16 {
        match self {
            Self::Rom => address::ROM_START,
            Self::TileRam => address::TILE_RAM_START,
            Self::BackgroundMap1 => address::BG_MAP_1_START,
            Self::BackgroundMap2 => address::BG_MAP_2_START,
            Self::ExternalRam => address::EXTERNAL_RAM_START,
            Self::WorkingRam => address::WORKING_RAM_START,
            Self::EchoRam => address::ECHO_RAM_START,
            Self::Oam => address::OAM_START,
            Self::Unusable => address::UNUSABLE_START,
            Self::IoRegisters => address::IO_REGISTERS_START,
            Self::HighRam => address::HRAM_START,
            Self::InterruptEnable => address::IE_REGISTER,
        }
    }

    pub fn is_readable(self) -> bool {
        !matches!(self, Self::EchoRam | Self::Unusable | Self::IoRegisters)
    }

    // Bank switching and cartridge RAM enable are not modeled, so ROM writes have nowhere to go
    pub fn is_writable(self) -> bool {
        self.is_readable() && self != Self::Rom
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    #[error("address {address:#06X} is outside the 16-bit address space")]
    OutOfRange { address: u32 },
    #[error("{access} of unimplemented memory region ({region}) at address {address:#06X}")]
    UnimplementedRegion {
        address: u16,
        region: MemoryRegion,
        access: AccessKind,
    },
}

#[derive(Error, Debug)]
pub enum CartridgeLoadError {
    #[error("error reading cartridge file: {source}")]
    FileRead {
        #[from]
        source: io::Error,
    },
    #[error("cartridge image is {size} bytes, only images up to {ROM_SIZE} bytes are supported")]
    UnsupportedSize { size: usize },
}

#[derive(Debug, Clone)]
pub struct Cartridge {
    rom: Vec<u8>,
}

impl Cartridge {
    /// Create a cartridge from a raw ROM image. Images shorter than 32KB are padded with zeros;
    /// larger images would need bank switching and are rejected.
    pub fn new(mut rom: Vec<u8>) -> Result<Self, CartridgeLoadError> {
        if rom.len() > ROM_SIZE {
            return Err(CartridgeLoadError::UnsupportedSize { size: rom.len() });
        }

        if rom.len() < ROM_SIZE {
            log::debug!("padding {}-byte ROM image to {ROM_SIZE} bytes", rom.len());
            rom.resize(ROM_SIZE, 0x00);
        }

        Ok(Self { rom })
    }

    pub fn from_file<P>(file_path: P) -> Result<Self, CartridgeLoadError>
    where
        P: AsRef<Path>,
    {
        let rom = fs::read(file_path.as_ref())?;
        Self::new(rom)
    }
}

impl Default for Cartridge {
    fn default() -> Self {
        Self {
            rom: vec![0x00; ROM_SIZE],
        }
    }
}

/// The full 16-bit address space. Owns every backing store; the ROM image is fixed at
/// construction and all RAM regions start zeroed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressSpace {
    #[serde(skip)]
    cartridge: Cartridge,
    #[serde(
        serialize_with = "serialize_array",
        deserialize_with = "deserialize_array"
    )]
    tile_ram: [u8; TILE_RAM_SIZE],
    #[serde(
        serialize_with = "serialize_array",
        deserialize_with = "deserialize_array"
    )]
    bg_map_1: [u8; BG_MAP_SIZE],
    #[serde(
        serialize_with = "serialize_array",
        deserialize_with = "deserialize_array"
    )]
    bg_map_2: [u8; BG_MAP_SIZE],
    #[serde(
        serialize_with = "serialize_array",
        deserialize_with = "deserialize_array"
    )]
    external_ram: [u8; EXTERNAL_RAM_SIZE],
    #[serde(
        serialize_with = "serialize_array",
        deserialize_with = "deserialize_array"
    )]
    working_ram: [u8; WORKING_RAM_SIZE],
    #[serde(
        serialize_with = "serialize_array",
        deserialize_with = "deserialize_array"
    )]
    oam: [u8; OAM_SIZE],
    #[serde(
        serialize_with = "serialize_array",
        deserialize_with = "deserialize_array"
    )]
    hram: [u8; HRAM_SIZE],
    ie_register: u8,
}

impl AddressSpace {
    pub fn new(cartridge: Cartridge) -> Self {
        Self {
            cartridge,
            tile_ram: [0; TILE_RAM_SIZE],
            bg_map_1: [0; BG_MAP_SIZE],
            bg_map_2: [0; BG_MAP_SIZE],
            external_ram: [0; EXTERNAL_RAM_SIZE],
            working_ram: [0; WORKING_RAM_SIZE],
            oam: [0; OAM_SIZE],
            hram: [0; HRAM_SIZE],
            ie_register: 0x00,
        }
    }

    /// Read the byte at `address`. Accepts any integer address so that callers holding wider
    /// values get an [`MemoryError::OutOfRange`] instead of a silent truncation.
    pub fn get(&self, address: u32) -> Result<u8, MemoryError> {
        let address = u16::try_from(address).map_err(|_| MemoryError::OutOfRange { address })?;
        self.read_address_u8(address)
    }

    /// Write `value` to `address`, following the same region rules as [`AddressSpace::get`].
    pub fn set(&mut self, address: u32, value: u8) -> Result<(), MemoryError> {
        let address = u16::try_from(address).map_err(|_| MemoryError::OutOfRange { address })?;
        self.write_address_u8(address, value)
    }

    pub fn read_address_u8(&self, address: u16) -> Result<u8, MemoryError> {
        let region = MemoryRegion::from_address(address);
        let offset = usize::from(address - region.start_address());

        self.backing_store(region)
            .map(|store| store[offset])
            .ok_or(MemoryError::UnimplementedRegion {
                address,
                region,
                access: AccessKind::Read,
            })
    }

    /// Read a little-endian 16-bit value; the high byte comes from `address + 1`, wrapping at
    /// the top of the address space.
    pub fn read_address_u16(&self, address: u16) -> Result<u16, MemoryError> {
        let lsb = self.read_address_u8(address)?;
        let msb = self.read_address_u8(address.wrapping_add(1))?;
        Ok(u16::from_le_bytes([lsb, msb]))
    }

    pub fn write_address_u8(&mut self, address: u16, value: u8) -> Result<(), MemoryError> {
        let region = MemoryRegion::from_address(address);
        let offset = usize::from(address - region.start_address());

        match self.backing_store_mut(region) {
            Some(store) => {
                store[offset] = value;
                Ok(())
            }
            None => Err(MemoryError::UnimplementedRegion {
                address,
                region,
                access: AccessKind::Write,
            }),
        }
    }

    /// Write a little-endian 16-bit value. Both target bytes are checked before either is
    /// written, so a failed write leaves memory unchanged.
    pub fn write_address_u16(&mut self, address: u16, value: u16) -> Result<(), MemoryError> {
        let msb_address = address.wrapping_add(1);
        check_writable(address)?;
        check_writable(msb_address)?;

        let [lsb, msb] = value.to_le_bytes();
        self.write_address_u8(address, lsb)?;
        self.write_address_u8(msb_address, msb)?;

        Ok(())
    }

    // The ROM is not part of serialized state; reattach it from the live address space
    pub(crate) fn move_unserializable_fields_from(&mut self, other: Self) {
        self.cartridge = other.cartridge;
    }

    fn backing_store(&self, region: MemoryRegion) -> Option<&[u8]> {
        match region {
            MemoryRegion::Rom => Some(&self.cartridge.rom),
            MemoryRegion::TileRam => Some(&self.tile_ram),
            MemoryRegion::BackgroundMap1 => Some(&self.bg_map_1),
            MemoryRegion::BackgroundMap2 => Some(&self.bg_map_2),
            MemoryRegion::ExternalRam => Some(&self.external_ram),
            MemoryRegion::WorkingRam => Some(&self.working_ram),
            MemoryRegion::Oam => Some(&self.oam),
            MemoryRegion::HighRam => Some(&self.hram),
            MemoryRegion::InterruptEnable => Some(std::slice::from_ref(&self.ie_register)),
            MemoryRegion::EchoRam | MemoryRegion::Unusable | MemoryRegion::IoRegisters => None,
        }
    }

    fn backing_store_mut(&mut self, region: MemoryRegion) -> Option<&mut [u8]> {
        match region {
            MemoryRegion::TileRam => Some(&mut self.tile_ram),
            MemoryRegion::BackgroundMap1 => Some(&mut self.bg_map_1),
            MemoryRegion::BackgroundMap2 => Some(&mut self.bg_map_2),
            MemoryRegion::ExternalRam => Some(&mut self.external_ram),
            MemoryRegion::WorkingRam => Some(&mut self.working_ram),
            MemoryRegion::Oam => Some(&mut self.oam),
            MemoryRegion::HighRam => Some(&mut self.hram),
            MemoryRegion::InterruptEnable => Some(std::slice::from_mut(&mut self.ie_register)),
            MemoryRegion::Rom
            | MemoryRegion::EchoRam
            | MemoryRegion::Unusable
            | MemoryRegion::IoRegisters => None,
        }
    }
}

fn check_writable(address: u16) -> Result<(), MemoryError> {
    let region = MemoryRegion::from_address(address);
    if region.is_writable() {
        Ok(())
    } else {
        Err(MemoryError::UnimplementedRegion {
            address,
            region,
            access: AccessKind::Write,
        })
    }
}
