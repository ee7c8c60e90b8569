use gbe_proc_macros::{EnumDisplay, EnumFromStr, StrDeserialize};
use serde::{Deserialize, Serialize};
use std::fmt::Formatter;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumDisplay, EnumFromStr)]
pub enum CpuRegister {
    A,
    B,
    C,
    D,
    E,
    F,
    H,
    L,
}

impl CpuRegister {
    // 0x06 selects (HL) rather than a register, and F is never an opcode operand
    fn from_opcode_bits(bits: u8) -> Option<Self> {
        match bits & 0x07 {
            0x00 => Some(Self::B),
            0x01 => Some(Self::C),
            0x02 => Some(Self::D),
            0x03 => Some(Self::E),
            0x04 => Some(Self::H),
            0x05 => Some(Self::L),
            0x07 => Some(Self::A),
            _ => None,
        }
    }

    pub(crate) fn from_low_opcode_bits(opcode: u8) -> Option<Self> {
        Self::from_opcode_bits(opcode)
    }

    pub(crate) fn from_mid_opcode_bits(opcode: u8) -> Option<Self> {
        Self::from_opcode_bits(opcode >> 3)
    }

    #[cfg(test)]
    pub(crate) fn to_opcode_bits(self) -> u8 {
        match self {
            Self::B => 0x00,
            Self::C => 0x01,
            Self::D => 0x02,
            Self::E => 0x03,
            Self::H => 0x04,
            Self::L => 0x05,
            Self::A => 0x07,
            Self::F => panic!("F has no opcode encoding"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumDisplay, EnumFromStr)]
pub enum CpuRegisterPair {
    AF,
    BC,
    DE,
    HL,
    SP,
    PC,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumDisplay)]
pub enum CpuFlag {
    Z,
    N,
    H,
    C,
}

impl CpuFlag {
    pub fn bit(self) -> u8 {
        match self {
            Self::Z => 0x80,
            Self::N => 0x40,
            Self::H => 0x20,
            Self::C => 0x10,
        }
    }
}

/// Any register that can be named from outside the CPU, 8-bit or 16-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, StrDeserialize)]
pub enum RegisterName {
    Byte(CpuRegister),
    Word(CpuRegisterPair),
}

impl FromStr for RegisterName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(register) = s.parse() {
            return Ok(Self::Byte(register));
        }

        if let Ok(register_pair) = s.parse() {
            return Ok(Self::Word(register_pair));
        }

        Err(format!("invalid register name: '{s}'"))
    }
}

impl std::fmt::Display for RegisterName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Byte(register) => write!(f, "{register}"),
            Self::Word(register_pair) => write!(f, "{register_pair}"),
        }
    }
}

/// A `NAME=VALUE` register preset, e.g. `B=0x10` or `HL=49152`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterAssignment {
    pub register: RegisterName,
    pub value: u16,
}

impl RegisterAssignment {
    pub fn new(register: RegisterName, value: u16) -> Result<Self, String> {
        if matches!(register, RegisterName::Byte(_)) && value > 0xFF {
            return Err(format!("value {value:#06X} does not fit in 8-bit register {register}"));
        }

        Ok(Self { register, value })
    }
}

impl FromStr for RegisterAssignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((name, value)) = s.split_once('=') else {
            return Err(format!("expected NAME=VALUE, got '{s}'"));
        };

        let register = name.trim().parse()?;
        let value = parse_u16(value.trim())?;

        Self::new(register, value)
    }
}

impl std::fmt::Display for RegisterAssignment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={:#06X}", self.register, self.value)
    }
}

/// Parse a decimal or `0x`-prefixed hexadecimal 16-bit value.
pub fn parse_u16(s: &str) -> Result<u16, String> {
    let result = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };

    result.map_err(|err| format!("invalid 16-bit value '{s}': {err}"))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuRegisters {
    pub accumulator: u8,
    pub flags: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,
    pub sp: u16,
    pub pc: u16,
}

impl CpuRegisters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn af(&self) -> u16 {
        u16::from_be_bytes([self.accumulator, self.flags])
    }

    pub fn bc(&self) -> u16 {
        u16::from_be_bytes([self.b, self.c])
    }

    pub fn de(&self) -> u16 {
        u16::from_be_bytes([self.d, self.e])
    }

    pub fn hl(&self) -> u16 {
        u16::from_be_bytes([self.h, self.l])
    }

    pub fn set_hl(&mut self, hl: u16) {
        let [h, l] = hl.to_be_bytes();
        self.h = h;
        self.l = l;
    }

    pub fn read_register(&self, register: CpuRegister) -> u8 {
        match register {
            CpuRegister::A => self.accumulator,
            CpuRegister::B => self.b,
            CpuRegister::C => self.c,
            CpuRegister::D => self.d,
            CpuRegister::E => self.e,
            CpuRegister::F => self.flags,
            CpuRegister::H => self.h,
            CpuRegister::L => self.l,
        }
    }

    pub fn set_register(&mut self, register: CpuRegister, value: u8) {
        *self.get_register_mut(register) = value;
    }

    fn get_register_mut(&mut self, register: CpuRegister) -> &mut u8 {
        match register {
            CpuRegister::A => &mut self.accumulator,
            CpuRegister::B => &mut self.b,
            CpuRegister::C => &mut self.c,
            CpuRegister::D => &mut self.d,
            CpuRegister::E => &mut self.e,
            CpuRegister::F => &mut self.flags,
            CpuRegister::H => &mut self.h,
            CpuRegister::L => &mut self.l,
        }
    }

    pub fn read_register_pair(&self, register_pair: CpuRegisterPair) -> u16 {
        match register_pair {
            CpuRegisterPair::AF => self.af(),
            CpuRegisterPair::BC => self.bc(),
            CpuRegisterPair::DE => self.de(),
            CpuRegisterPair::HL => self.hl(),
            CpuRegisterPair::SP => self.sp,
            CpuRegisterPair::PC => self.pc,
        }
    }

    pub fn set_register_pair(&mut self, register_pair: CpuRegisterPair, value: u16) {
        let (high, low) = match register_pair {
            CpuRegisterPair::AF => (CpuRegister::A, CpuRegister::F),
            CpuRegisterPair::BC => (CpuRegister::B, CpuRegister::C),
            CpuRegisterPair::DE => (CpuRegister::D, CpuRegister::E),
            CpuRegisterPair::HL => (CpuRegister::H, CpuRegister::L),
            CpuRegisterPair::SP => {
                self.sp = value;
                return;
            }
            CpuRegisterPair::PC => {
                self.pc = value;
                return;
            }
        };

        let [high_value, low_value] = value.to_be_bytes();
        self.set_register(high, high_value);
        self.set_register(low, low_value);
    }

    pub fn apply(&mut self, assignment: RegisterAssignment) {
        match assignment.register {
            RegisterName::Byte(register) => self.set_register(register, assignment.value as u8),
            RegisterName::Word(register_pair) => {
                self.set_register_pair(register_pair, assignment.value);
            }
        }
    }

    /// Overwrite all four flags. The unused low nibble of F is cleared.
    pub fn set_flags(&mut self, z: bool, n: bool, h: bool, c: bool) {
        self.flags =
            (u8::from(z) << 7) | (u8::from(n) << 6) | (u8::from(h) << 5) | (u8::from(c) << 4);
    }

    /// Update only the flags given as `Some`, leaving the rest untouched.
    pub fn set_some_flags(
        &mut self,
        z: Option<bool>,
        n: Option<bool>,
        h: Option<bool>,
        c: Option<bool>,
    ) {
        for (flag, value) in [(CpuFlag::Z, z), (CpuFlag::N, n), (CpuFlag::H, h), (CpuFlag::C, c)] {
            if let Some(value) = value {
                self.set_flag(flag, value);
            }
        }
    }

    pub fn read_flag(&self, flag: CpuFlag) -> bool {
        self.flags & flag.bit() != 0
    }

    pub fn set_flag(&mut self, flag: CpuFlag, value: bool) {
        if value {
            self.flags |= flag.bit();
        } else {
            self.flags &= !flag.bit();
        }
    }

    pub fn zero_flag(&self) -> bool {
        self.read_flag(CpuFlag::Z)
    }

    pub fn subtract_flag(&self) -> bool {
        self.read_flag(CpuFlag::N)
    }

    pub fn half_carry_flag(&self) -> bool {
        self.read_flag(CpuFlag::H)
    }

    pub fn carry_flag(&self) -> bool {
        self.read_flag(CpuFlag::C)
    }
}

impl std::fmt::Display for CpuRegisters {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "A={:02X} F={:02X} B={:02X} C={:02X} D={:02X} E={:02X} H={:02X} L={:02X} SP={:04X} PC={:04X} [{}{}{}{}]",
            self.accumulator,
            self.flags,
            self.b,
            self.c,
            self.d,
            self.e,
            self.h,
            self.l,
            self.sp,
            self.pc,
            if self.zero_flag() { 'Z' } else { '-' },
            if self.subtract_flag() { 'N' } else { '-' },
            if self.half_carry_flag() { 'H' } else { '-' },
            if self.carry_flag() { 'C' } else { '-' },
        )
    }
}
