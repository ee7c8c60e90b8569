mod parse;

use crate::cpu::alu;
use crate::cpu::registers::{CpuRegister, CpuRegisterPair, CpuRegisters};
use crate::memory::{AddressSpace, MemoryError};
use gbe_proc_macros::EnumDisplay;
use thiserror::Error;

pub use parse::{fetch_u16, fetch_u8, parse_next_instruction};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumDisplay)]
pub enum ErrorKind {
    OutOfRange,
    UnimplementedRegion,
    UnimplementedOpcode,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("unimplemented opcode {opcode:02X} at PC={pc:04X}")]
    UnimplementedOpcode { pc: u16, opcode: u8 },
    #[error("memory access error: {source}")]
    Memory {
        #[from]
        source: MemoryError,
    },
}

impl ExecutionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnimplementedOpcode { .. } => ErrorKind::UnimplementedOpcode,
            Self::Memory {
                source: MemoryError::OutOfRange { .. },
            } => ErrorKind::OutOfRange,
            Self::Memory {
                source: MemoryError::UnimplementedRegion { .. },
            } => ErrorKind::UnimplementedRegion,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpCondition {
    NZ,
    Z,
    NC,
    C,
}

impl JumpCondition {
    fn check(self, cpu_registers: &CpuRegisters) -> bool {
        match self {
            Self::NZ => !cpu_registers.zero_flag(),
            Self::Z => cpu_registers.zero_flag(),
            Self::NC => !cpu_registers.carry_flag(),
            Self::C => cpu_registers.carry_flag(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadTarget {
    Accumulator,
    Register(CpuRegister),
    Immediate(u8),
    IndirectHL,
    IndirectBC,
    IndirectDE,
    IndirectHLInc,
    IndirectHLDec,
    Direct(u16),
    FFDirect(u8),
    FFIndirectC,
}

impl ReadTarget {
    // Takes the registers mutably because (HL+) and (HL-) step HL after the read
    fn read_value(
        self,
        address_space: &AddressSpace,
        cpu_registers: &mut CpuRegisters,
    ) -> Result<u8, MemoryError> {
        let value = match self {
            Self::Accumulator => cpu_registers.accumulator,
            Self::Register(r) => cpu_registers.read_register(r),
            Self::Immediate(n) => n,
            Self::IndirectHL => address_space.read_address_u8(cpu_registers.hl())?,
            Self::IndirectBC => address_space.read_address_u8(cpu_registers.bc())?,
            Self::IndirectDE => address_space.read_address_u8(cpu_registers.de())?,
            Self::IndirectHLInc => {
                let hl = cpu_registers.hl();
                let value = address_space.read_address_u8(hl)?;
                cpu_registers.set_hl(hl.wrapping_add(1));
                value
            }
            Self::IndirectHLDec => {
                let hl = cpu_registers.hl();
                let value = address_space.read_address_u8(hl)?;
                cpu_registers.set_hl(hl.wrapping_sub(1));
                value
            }
            Self::Direct(nn) => address_space.read_address_u8(nn)?,
            Self::FFDirect(n) => address_space.read_address_u8(u16::from_be_bytes([0xFF, n]))?,
            Self::FFIndirectC => {
                address_space.read_address_u8(u16::from_be_bytes([0xFF, cpu_registers.c]))?
            }
        };

        Ok(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteTarget {
    Accumulator,
    Register(CpuRegister),
    IndirectHL,
    IndirectBC,
    IndirectDE,
    IndirectHLInc,
    IndirectHLDec,
    Direct(u16),
    FFDirect(u8),
    FFIndirectC,
}

impl WriteTarget {
    fn write_value(
        self,
        address_space: &mut AddressSpace,
        cpu_registers: &mut CpuRegisters,
        value: u8,
    ) -> Result<(), MemoryError> {
        match self {
            Self::Accumulator => {
                cpu_registers.accumulator = value;
            }
            Self::Register(r) => {
                cpu_registers.set_register(r, value);
            }
            Self::IndirectHL => {
                address_space.write_address_u8(cpu_registers.hl(), value)?;
            }
            Self::IndirectBC => {
                address_space.write_address_u8(cpu_registers.bc(), value)?;
            }
            Self::IndirectDE => {
                address_space.write_address_u8(cpu_registers.de(), value)?;
            }
            Self::IndirectHLInc => {
                let hl = cpu_registers.hl();
                address_space.write_address_u8(hl, value)?;
                cpu_registers.set_hl(hl.wrapping_add(1));
            }
            Self::IndirectHLDec => {
                let hl = cpu_registers.hl();
                address_space.write_address_u8(hl, value)?;
                cpu_registers.set_hl(hl.wrapping_sub(1));
            }
            Self::Direct(nn) => {
                address_space.write_address_u8(nn, value)?;
            }
            Self::FFDirect(n) => {
                address_space.write_address_u8(u16::from_be_bytes([0xFF, n]), value)?;
            }
            Self::FFIndirectC => {
                address_space
                    .write_address_u8(u16::from_be_bytes([0xFF, cpu_registers.c]), value)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyTarget {
    // Unprefixed RLCA/RLA/RRCA/RRA
    Accumulator,
    Register(CpuRegister),
    IndirectHL,
}

impl ModifyTarget {
    fn read_value(
        self,
        address_space: &AddressSpace,
        cpu_registers: &CpuRegisters,
    ) -> Result<u8, MemoryError> {
        match self {
            Self::Accumulator => Ok(cpu_registers.accumulator),
            Self::Register(r) => Ok(cpu_registers.read_register(r)),
            Self::IndirectHL => address_space.read_address_u8(cpu_registers.hl()),
        }
    }

    fn write_value(
        self,
        address_space: &mut AddressSpace,
        cpu_registers: &mut CpuRegisters,
        value: u8,
    ) -> Result<(), MemoryError> {
        match self {
            Self::Accumulator => {
                cpu_registers.accumulator = value;
            }
            Self::Register(r) => {
                cpu_registers.set_register(r, value);
            }
            Self::IndirectHL => {
                address_space.write_address_u8(cpu_registers.hl(), value)?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    // LD r, r' / LD r, n / LD r, (HL) / LD (HL), r / LD (HL), n / LD A, (BC) / LD (BC), A / ...
    Load(WriteTarget, ReadTarget),
    // LD rr, nn
    LoadRegisterPairImmediate(CpuRegisterPair, u16),
    // LD (nn), SP
    LoadDirectStackPointer(u16),
    // LD SP, HL
    LoadStackPointerHL,
    // LD HL, SP+e
    LoadHLStackPointerOffset(i8),
    // PUSH rr
    PushStack(CpuRegisterPair),
    // POP rr
    PopStack(CpuRegisterPair),
    // ADD A, r/n/(HL)
    Add(ReadTarget),
    // ADC A, r/n/(HL)
    AddWithCarry(ReadTarget),
    // SUB r/n/(HL)
    Subtract(ReadTarget),
    // SBC A, r/n/(HL)
    SubtractWithCarry(ReadTarget),
    // CP r/n/(HL)
    Compare(ReadTarget),
    // INC r/(HL)
    Increment(ModifyTarget),
    // DEC r/(HL)
    Decrement(ModifyTarget),
    // AND r/n/(HL)
    And(ReadTarget),
    // OR r/n/(HL)
    Or(ReadTarget),
    // XOR r/n/(HL)
    Xor(ReadTarget),
    // ADD HL, rr
    AddHLRegister(CpuRegisterPair),
    // INC rr
    IncRegisterPair(CpuRegisterPair),
    // DEC rr
    DecRegisterPair(CpuRegisterPair),
    // ADD SP, e
    AddSPImmediate(i8),
    // RLCA / RLC r / RLC (HL)
    RotateLeft(ModifyTarget),
    // RLA / RL r / RL (HL)
    RotateLeftThruCarry(ModifyTarget),
    // RRCA / RRC r / RRC (HL)
    RotateRight(ModifyTarget),
    // RRA / RR r / RR (HL)
    RotateRightThruCarry(ModifyTarget),
    // SLA r/(HL)
    ShiftLeft(ModifyTarget),
    // SRA r/(HL)
    ArithmeticShiftRight(ModifyTarget),
    // SWAP r/(HL)
    Swap(ModifyTarget),
    // SRL r/(HL)
    LogicalShiftRight(ModifyTarget),
    // BIT b, r/(HL)
    TestBit(u8, ReadTarget),
    // RES b, r/(HL)
    ResetBit(u8, ModifyTarget),
    // SET b, r/(HL)
    SetBit(u8, ModifyTarget),
    // CCF
    ComplementCarryFlag,
    // SCF
    SetCarryFlag,
    // DAA
    DecimalAdjustAccumulator,
    // CPL
    ComplementAccumulator,
    // JP nn
    Jump(u16),
    // JP HL
    JumpHL,
    // JP cc, nn
    JumpCond(JumpCondition, u16),
    // JR e
    RelativeJump(i8),
    // JR cc, e
    RelativeJumpCond(JumpCondition, i8),
    // CALL nn
    Call(u16),
    // CALL cc, nn
    CallCond(JumpCondition, u16),
    // RET
    Return,
    // RET cc
    ReturnCond(JumpCondition),
    // RST n
    RestartCall(u8),
    // NOP
    NoOp,
}

impl Instruction {
    /// Execute this instruction. PC must already point past the instruction and its operands,
    /// which is where [`parse_next_instruction`] leaves it.
    pub fn execute(
        self,
        address_space: &mut AddressSpace,
        cpu_registers: &mut CpuRegisters,
    ) -> Result<(), ExecutionError> {
        match self {
            Self::Load(write_target, read_target) => {
                let value = read_target.read_value(address_space, cpu_registers)?;
                write_target.write_value(address_space, cpu_registers, value)?;
            }
            Self::LoadRegisterPairImmediate(rr, nn) => {
                cpu_registers.set_register_pair(rr, nn);
            }
            Self::LoadDirectStackPointer(nn) => {
                address_space.write_address_u16(nn, cpu_registers.sp)?;
            }
            Self::LoadStackPointerHL => {
                cpu_registers.sp = cpu_registers.hl();
            }
            Self::LoadHLStackPointerOffset(e) => {
                let (hl, carry, h_flag) = alu::add_sp_offset(cpu_registers.sp, e);
                cpu_registers.set_hl(hl);
                cpu_registers.set_flags(false, false, h_flag, carry);
            }
            Self::PushStack(rr) => {
                push_stack(address_space, cpu_registers, cpu_registers.read_register_pair(rr))?;
            }
            Self::PopStack(rr) => {
                let mut value = pop_stack(address_space, cpu_registers)?;
                if rr == CpuRegisterPair::AF {
                    // The low nibble of F does not exist in hardware
                    value &= 0xFFF0;
                }
                cpu_registers.set_register_pair(rr, value);
            }
            Self::Add(read_target) => {
                let value = read_target.read_value(address_space, cpu_registers)?;
                let (sum, carry, h_flag) = alu::add_u8(cpu_registers.accumulator, value, false);
                cpu_registers.accumulator = sum;
                cpu_registers.set_flags(sum == 0, false, h_flag, carry);
            }
            Self::AddWithCarry(read_target) => {
                let value = read_target.read_value(address_space, cpu_registers)?;
                let (sum, carry, h_flag) =
                    alu::add_u8(cpu_registers.accumulator, value, cpu_registers.carry_flag());
                cpu_registers.accumulator = sum;
                cpu_registers.set_flags(sum == 0, false, h_flag, carry);
            }
            Self::Subtract(read_target) => {
                let value = read_target.read_value(address_space, cpu_registers)?;
                let (difference, carry, h_flag) =
                    alu::sub_u8(cpu_registers.accumulator, value, false);
                cpu_registers.accumulator = difference;
                cpu_registers.set_flags(difference == 0, true, h_flag, carry);
            }
            Self::SubtractWithCarry(read_target) => {
                let value = read_target.read_value(address_space, cpu_registers)?;
                let (difference, carry, h_flag) =
                    alu::sub_u8(cpu_registers.accumulator, value, cpu_registers.carry_flag());
                cpu_registers.accumulator = difference;
                cpu_registers.set_flags(difference == 0, true, h_flag, carry);
            }
            Self::Compare(read_target) => {
                let value = read_target.read_value(address_space, cpu_registers)?;
                let (difference, carry, h_flag) =
                    alu::sub_u8(cpu_registers.accumulator, value, false);
                cpu_registers.set_flags(difference == 0, true, h_flag, carry);
            }
            Self::Increment(modify_target) => {
                let value = modify_target.read_value(address_space, cpu_registers)?;
                let (sum, _, h_flag) = alu::add_u8(value, 1, false);
                modify_target.write_value(address_space, cpu_registers, sum)?;
                cpu_registers.set_some_flags(Some(sum == 0), Some(false), Some(h_flag), None);
            }
            Self::Decrement(modify_target) => {
                let value = modify_target.read_value(address_space, cpu_registers)?;
                let (difference, _, h_flag) = alu::sub_u8(value, 1, false);
                modify_target.write_value(address_space, cpu_registers, difference)?;
                cpu_registers.set_some_flags(Some(difference == 0), Some(true), Some(h_flag), None);
            }
            Self::And(read_target) => {
                let value = cpu_registers.accumulator
                    & read_target.read_value(address_space, cpu_registers)?;
                cpu_registers.accumulator = value;
                cpu_registers.set_flags(value == 0, false, true, false);
            }
            Self::Or(read_target) => {
                let value = cpu_registers.accumulator
                    | read_target.read_value(address_space, cpu_registers)?;
                cpu_registers.accumulator = value;
                cpu_registers.set_flags(value == 0, false, false, false);
            }
            Self::Xor(read_target) => {
                let value = cpu_registers.accumulator
                    ^ read_target.read_value(address_space, cpu_registers)?;
                cpu_registers.accumulator = value;
                cpu_registers.set_flags(value == 0, false, false, false);
            }
            Self::AddHLRegister(rr) => {
                let (sum, carry, h_flag) =
                    alu::add_u16(cpu_registers.hl(), cpu_registers.read_register_pair(rr), false);
                cpu_registers.set_hl(sum);
                cpu_registers.set_some_flags(None, Some(false), Some(h_flag), Some(carry));
            }
            Self::IncRegisterPair(rr) => {
                cpu_registers
                    .set_register_pair(rr, cpu_registers.read_register_pair(rr).wrapping_add(1));
            }
            Self::DecRegisterPair(rr) => {
                cpu_registers
                    .set_register_pair(rr, cpu_registers.read_register_pair(rr).wrapping_sub(1));
            }
            Self::AddSPImmediate(e) => {
                let (sp, carry, h_flag) = alu::add_sp_offset(cpu_registers.sp, e);
                cpu_registers.sp = sp;
                cpu_registers.set_flags(false, false, h_flag, carry);
            }
            Self::RotateLeft(modify_target) => {
                modify_with_carry_out(modify_target, address_space, cpu_registers, |value, _| {
                    alu::rotate_left(value)
                })?;
            }
            Self::RotateLeftThruCarry(modify_target) => {
                modify_with_carry_out(
                    modify_target,
                    address_space,
                    cpu_registers,
                    alu::rotate_left_thru_carry,
                )?;
            }
            Self::RotateRight(modify_target) => {
                modify_with_carry_out(modify_target, address_space, cpu_registers, |value, _| {
                    alu::rotate_right(value)
                })?;
            }
            Self::RotateRightThruCarry(modify_target) => {
                modify_with_carry_out(
                    modify_target,
                    address_space,
                    cpu_registers,
                    alu::rotate_right_thru_carry,
                )?;
            }
            Self::ShiftLeft(modify_target) => {
                modify_with_carry_out(modify_target, address_space, cpu_registers, |value, _| {
                    alu::shift_left(value)
                })?;
            }
            Self::ArithmeticShiftRight(modify_target) => {
                modify_with_carry_out(modify_target, address_space, cpu_registers, |value, _| {
                    alu::arithmetic_shift_right(value)
                })?;
            }
            Self::Swap(modify_target) => {
                modify_with_carry_out(modify_target, address_space, cpu_registers, |value, _| {
                    alu::swap(value)
                })?;
            }
            Self::LogicalShiftRight(modify_target) => {
                modify_with_carry_out(modify_target, address_space, cpu_registers, |value, _| {
                    alu::logical_shift_right(value)
                })?;
            }
            Self::TestBit(bit, read_target) => {
                let value = read_target.read_value(address_space, cpu_registers)?;
                let z_flag = value & (1 << bit) == 0;
                cpu_registers.set_some_flags(Some(z_flag), Some(false), Some(true), None);
            }
            Self::ResetBit(bit, modify_target) => {
                let value = modify_target.read_value(address_space, cpu_registers)?;
                modify_target.write_value(address_space, cpu_registers, value & !(1 << bit))?;
            }
            Self::SetBit(bit, modify_target) => {
                let value = modify_target.read_value(address_space, cpu_registers)?;
                modify_target.write_value(address_space, cpu_registers, value | (1 << bit))?;
            }
            Self::ComplementCarryFlag => {
                cpu_registers.set_some_flags(
                    None,
                    Some(false),
                    Some(false),
                    Some(!cpu_registers.carry_flag()),
                );
            }
            Self::SetCarryFlag => {
                cpu_registers.set_some_flags(None, Some(false), Some(false), Some(true));
            }
            Self::DecimalAdjustAccumulator => {
                let (value, carry) = alu::decimal_adjust(
                    cpu_registers.accumulator,
                    cpu_registers.subtract_flag(),
                    cpu_registers.half_carry_flag(),
                    cpu_registers.carry_flag(),
                );
                cpu_registers.accumulator = value;
                cpu_registers.set_some_flags(Some(value == 0), None, Some(false), Some(carry));
            }
            Self::ComplementAccumulator => {
                cpu_registers.accumulator = !cpu_registers.accumulator;
                cpu_registers.set_some_flags(None, Some(true), Some(true), None);
            }
            Self::Jump(nn) => {
                cpu_registers.pc = nn;
            }
            Self::JumpHL => {
                cpu_registers.pc = cpu_registers.hl();
            }
            Self::JumpCond(cc, nn) => {
                if cc.check(cpu_registers) {
                    cpu_registers.pc = nn;
                }
            }
            Self::RelativeJump(e) => {
                cpu_registers.pc = cpu_registers.pc.wrapping_add(e as u16);
            }
            Self::RelativeJumpCond(cc, e) => {
                if cc.check(cpu_registers) {
                    cpu_registers.pc = cpu_registers.pc.wrapping_add(e as u16);
                }
            }
            Self::Call(nn) => {
                push_stack(address_space, cpu_registers, cpu_registers.pc)?;
                cpu_registers.pc = nn;
            }
            Self::CallCond(cc, nn) => {
                if cc.check(cpu_registers) {
                    push_stack(address_space, cpu_registers, cpu_registers.pc)?;
                    cpu_registers.pc = nn;
                }
            }
            Self::Return => {
                cpu_registers.pc = pop_stack(address_space, cpu_registers)?;
            }
            Self::ReturnCond(cc) => {
                if cc.check(cpu_registers) {
                    cpu_registers.pc = pop_stack(address_space, cpu_registers)?;
                }
            }
            Self::RestartCall(rst_address) => {
                push_stack(address_space, cpu_registers, cpu_registers.pc)?;
                cpu_registers.pc = rst_address.into();
            }
            Self::NoOp => {}
        }

        Ok(())
    }
}

// Shared body of the rotate/shift family: Z from the result, N and H cleared, C set to the bit
// shifted out. The unprefixed accumulator rotates follow the same rule as their CB forms.
fn modify_with_carry_out<F>(
    modify_target: ModifyTarget,
    address_space: &mut AddressSpace,
    cpu_registers: &mut CpuRegisters,
    op: F,
) -> Result<(), MemoryError>
where
    F: FnOnce(u8, bool) -> (u8, bool),
{
    let value = modify_target.read_value(address_space, cpu_registers)?;
    let (value, carry) = op(value, cpu_registers.carry_flag());
    modify_target.write_value(address_space, cpu_registers, value)?;

    cpu_registers.set_flags(value == 0, false, false, carry);

    Ok(())
}

/// Push a 16-bit value: high byte at SP-1, low byte at SP-2, then SP -= 2. SP is only moved once
/// both bytes have been written.
pub fn push_stack(
    address_space: &mut AddressSpace,
    cpu_registers: &mut CpuRegisters,
    value: u16,
) -> Result<(), MemoryError> {
    let sp = cpu_registers.sp.wrapping_sub(2);
    address_space.write_address_u16(sp, value)?;
    cpu_registers.sp = sp;

    Ok(())
}

/// Pop a 16-bit value: low byte at SP, high byte at SP+1, then SP += 2.
pub fn pop_stack(
    address_space: &AddressSpace,
    cpu_registers: &mut CpuRegisters,
) -> Result<u16, MemoryError> {
    let value = address_space.read_address_u16(cpu_registers.sp)?;
    cpu_registers.sp = cpu_registers.sp.wrapping_add(2);

    Ok(value)
}
