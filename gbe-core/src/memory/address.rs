//
// Cartridge header addresses
//

pub const ENTRY_POINT: u16 = 0x0100;

//
// Address space boundaries
//

pub const ROM_START: u16 = 0x0000;
pub const ROM_END: u16 = 0x7FFF;

pub const TILE_RAM_START: u16 = 0x8000;
pub const TILE_RAM_END: u16 = 0x97FF;

pub const BG_MAP_1_START: u16 = 0x9800;
pub const BG_MAP_1_END: u16 = 0x9BFF;

pub const BG_MAP_2_START: u16 = 0x9C00;
pub const BG_MAP_2_END: u16 = 0x9FFF;

pub const EXTERNAL_RAM_START: u16 = 0xA000;
pub const EXTERNAL_RAM_END: u16 = 0xBFFF;

pub const WORKING_RAM_START: u16 = 0xC000;
pub const WORKING_RAM_END: u16 = 0xDFFF;

pub const ECHO_RAM_START: u16 = 0xE000;
pub const ECHO_RAM_END: u16 = 0xFDFF;

pub const OAM_START: u16 = 0xFE00;
pub const OAM_END: u16 = 0xFE9F;

pub const UNUSABLE_START: u16 = 0xFEA0;
pub const UNUSABLE_END: u16 = 0xFEFF;

pub const IO_REGISTERS_START: u16 = 0xFF00;
pub const IO_REGISTERS_END: u16 = 0xFF7F;

pub const HRAM_START: u16 = 0xFF80;
pub const HRAM_END: u16 = 0xFFFE;

pub const IE_REGISTER: u16 = 0xFFFF;

//
// Backing store sizes
//

pub const ROM_SIZE: usize = region_size(ROM_START, ROM_END);
pub const TILE_RAM_SIZE: usize = region_size(TILE_RAM_START, TILE_RAM_END);
pub const BG_MAP_SIZE: usize = region_size(BG_MAP_1_START, BG_MAP_1_END);
pub const EXTERNAL_RAM_SIZE: usize = region_size(EXTERNAL_RAM_START, EXTERNAL_RAM_END);
pub const WORKING_RAM_SIZE: usize = region_size(WORKING_RAM_START, WORKING_RAM_END);
pub const OAM_SIZE: usize = region_size(OAM_START, OAM_END);
pub const HRAM_SIZE: usize = region_size(HRAM_START, HRAM_END);

const fn region_size(start: u16, end: u16) -> usize {
    (end - start) as usize + 1
}
