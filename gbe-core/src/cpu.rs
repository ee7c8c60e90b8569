pub mod alu;
pub(crate) mod instructions;
mod registers;


use crate::memory::{AddressSpace, MemoryError};
use serde::{Deserialize, Serialize};

pub use instructions::{ErrorKind, ExecutionError};
pub use registers::{
    parse_u16, CpuFlag, CpuRegister, CpuRegisterPair, CpuRegisters, RegisterAssignment,
    RegisterName,
};

/// Opcode of HALT, which the driver treats as the end of a program.
pub const HALT_OPCODE: u8 = 0x76;

/// The CPU together with the address space it is bound to. The CPU owns no storage beyond its
/// registers; every memory access goes through the address space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cpu {
    registers: CpuRegisters,
    address_space: AddressSpace,
}

impl Cpu {
    /// All registers start at zero; the driver is responsible for setting PC and SP.
    pub fn new(address_space: AddressSpace) -> Self {
        Self {
            registers: CpuRegisters::new(),
            address_space,
        }
    }

    pub fn registers(&self) -> &CpuRegisters {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut CpuRegisters {
        &mut self.registers
    }

    pub fn address_space(&self) -> &AddressSpace {
        &self.address_space
    }

    pub fn address_space_mut(&mut self) -> &mut AddressSpace {
        &mut self.address_space
    }

    pub fn into_address_space(self) -> AddressSpace {
        self.address_space
    }

    pub fn get_reg8(&self, register: CpuRegister) -> u8 {
        self.registers.read_register(register)
    }

    pub fn set_reg8(&mut self, register: CpuRegister, value: u8) {
        self.registers.set_register(register, value);
    }

    pub fn get_reg16(&self, register_pair: CpuRegisterPair) -> u16 {
        self.registers.read_register_pair(register_pair)
    }

    pub fn set_reg16(&mut self, register_pair: CpuRegisterPair, value: u16) {
        self.registers.set_register_pair(register_pair, value);
    }

    pub fn get_flag(&self, flag: CpuFlag) -> bool {
        self.registers.read_flag(flag)
    }

    pub fn set_flag(&mut self, flag: CpuFlag, value: bool) {
        self.registers.set_flag(flag, value);
    }

    pub fn apply_assignment(&mut self, assignment: RegisterAssignment) {
        self.registers.apply(assignment);
    }

    pub fn fetch8(&mut self) -> Result<u8, MemoryError> {
        instructions::fetch_u8(&self.address_space, &mut self.registers)
    }

    pub fn fetch16(&mut self) -> Result<u16, MemoryError> {
        instructions::fetch_u16(&self.address_space, &mut self.registers)
    }

    pub fn push16(&mut self, value: u16) -> Result<(), MemoryError> {
        instructions::push_stack(&mut self.address_space, &mut self.registers, value)
    }

    pub fn pop16(&mut self) -> Result<u16, MemoryError> {
        instructions::pop_stack(&self.address_space, &mut self.registers)
    }

    /// The opcode byte at PC, without consuming it.
    pub fn peek_opcode(&self) -> Result<u8, MemoryError> {
        self.address_space.read_address_u8(self.registers.pc)
    }

    /// Decode and execute one instruction.
    ///
    /// A failed step leaves the machine exactly as it was before the call: registers are restored
    /// from a snapshot, and instructions only write memory as their last fallible action.
    pub fn step(&mut self) -> Result<(), ExecutionError> {
        let snapshot = self.registers.clone();

        let result = self.execute_next_instruction();
        if let Err(err) = &result {
            log::debug!("Step failed, restoring registers to [{snapshot}]: {err}");
            self.registers = snapshot;
        }

        result
    }

    fn execute_next_instruction(&mut self) -> Result<(), ExecutionError> {
        let pc = self.registers.pc;
        let instruction =
            instructions::parse_next_instruction(&self.address_space, &mut self.registers)?;

        log::trace!(
            "Executing instruction {instruction:?} at PC={pc:04X}, registers [{}]",
            self.registers
        );

        instruction.execute(&mut self.address_space, &mut self.registers)
    }
}
