use crate::cpu::instructions::{
    ExecutionError, Instruction, JumpCondition, ModifyTarget, ReadTarget, WriteTarget,
};
use crate::cpu::registers::{CpuRegister, CpuRegisterPair, CpuRegisters};
use crate::memory::{AddressSpace, MemoryError};

/// Read the byte at PC and advance PC by one.
pub fn fetch_u8(
    address_space: &AddressSpace,
    cpu_registers: &mut CpuRegisters,
) -> Result<u8, MemoryError> {
    let value = address_space.read_address_u8(cpu_registers.pc)?;
    cpu_registers.pc = cpu_registers.pc.wrapping_add(1);
    Ok(value)
}

/// Read a little-endian 16-bit operand at PC and advance PC by two.
pub fn fetch_u16(
    address_space: &AddressSpace,
    cpu_registers: &mut CpuRegisters,
) -> Result<u16, MemoryError> {
    let lsb = fetch_u8(address_space, cpu_registers)?;
    let msb = fetch_u8(address_space, cpu_registers)?;
    Ok(u16::from_le_bytes([lsb, msb]))
}

/// Decode the instruction at PC, consuming its opcode and operands. On return PC points at the
/// next instruction in sequence.
pub fn parse_next_instruction(
    address_space: &AddressSpace,
    cpu_registers: &mut CpuRegisters,
) -> Result<Instruction, ExecutionError> {
    let pc = cpu_registers.pc;
    let opcode = fetch_u8(address_space, cpu_registers)?;

    let instruction = match opcode {
        0x00 => Instruction::NoOp,
        0x01 | 0x11 | 0x21 | 0x31 => {
            let rr = register_pair_for_other_ops(opcode);
            let nn = fetch_u16(address_space, cpu_registers)?;
            Instruction::LoadRegisterPairImmediate(rr, nn)
        }
        0x02 => Instruction::Load(WriteTarget::IndirectBC, ReadTarget::Accumulator),
        0x03 | 0x13 | 0x23 | 0x33 => {
            Instruction::IncRegisterPair(register_pair_for_other_ops(opcode))
        }
        0x04 | 0x0C | 0x14 | 0x1C | 0x24 | 0x2C | 0x34 | 0x3C => {
            Instruction::Increment(modify_target(opcode >> 3))
        }
        0x05 | 0x0D | 0x15 | 0x1D | 0x25 | 0x2D | 0x35 | 0x3D => {
            Instruction::Decrement(modify_target(opcode >> 3))
        }
        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
            let n = fetch_u8(address_space, cpu_registers)?;
            Instruction::Load(write_target(opcode >> 3), ReadTarget::Immediate(n))
        }
        0x07 => Instruction::RotateLeft(ModifyTarget::Accumulator),
        0x08 => Instruction::LoadDirectStackPointer(fetch_u16(address_space, cpu_registers)?),
        0x09 | 0x19 | 0x29 | 0x39 => {
            Instruction::AddHLRegister(register_pair_for_other_ops(opcode))
        }
        0x0A => Instruction::Load(WriteTarget::Accumulator, ReadTarget::IndirectBC),
        0x0B | 0x1B | 0x2B | 0x3B => {
            Instruction::DecRegisterPair(register_pair_for_other_ops(opcode))
        }
        0x0F => Instruction::RotateRight(ModifyTarget::Accumulator),
        0x12 => Instruction::Load(WriteTarget::IndirectDE, ReadTarget::Accumulator),
        0x17 => Instruction::RotateLeftThruCarry(ModifyTarget::Accumulator),
        0x18 => Instruction::RelativeJump(fetch_u8(address_space, cpu_registers)? as i8),
        0x1A => Instruction::Load(WriteTarget::Accumulator, ReadTarget::IndirectDE),
        0x1F => Instruction::RotateRightThruCarry(ModifyTarget::Accumulator),
        0x20 | 0x28 | 0x30 | 0x38 => {
            let e = fetch_u8(address_space, cpu_registers)? as i8;
            Instruction::RelativeJumpCond(jump_condition(opcode), e)
        }
        0x22 => Instruction::Load(WriteTarget::IndirectHLInc, ReadTarget::Accumulator),
        0x27 => Instruction::DecimalAdjustAccumulator,
        0x2A => Instruction::Load(WriteTarget::Accumulator, ReadTarget::IndirectHLInc),
        0x2F => Instruction::ComplementAccumulator,
        0x32 => Instruction::Load(WriteTarget::IndirectHLDec, ReadTarget::Accumulator),
        0x37 => Instruction::SetCarryFlag,
        0x3A => Instruction::Load(WriteTarget::Accumulator, ReadTarget::IndirectHLDec),
        0x3F => Instruction::ComplementCarryFlag,
        // LD (HL),(HL) is HALT
        0x76 => return Err(ExecutionError::UnimplementedOpcode { pc, opcode }),
        0x40..=0x7F => Instruction::Load(write_target(opcode >> 3), read_target(opcode)),
        0x80..=0x87 => Instruction::Add(read_target(opcode)),
        0x88..=0x8F => Instruction::AddWithCarry(read_target(opcode)),
        0x90..=0x97 => Instruction::Subtract(read_target(opcode)),
        0x98..=0x9F => Instruction::SubtractWithCarry(read_target(opcode)),
        0xA0..=0xA7 => Instruction::And(read_target(opcode)),
        0xA8..=0xAF => Instruction::Xor(read_target(opcode)),
        0xB0..=0xB7 => Instruction::Or(read_target(opcode)),
        0xB8..=0xBF => Instruction::Compare(read_target(opcode)),
        0xC0 | 0xC8 | 0xD0 | 0xD8 => Instruction::ReturnCond(jump_condition(opcode)),
        0xC1 | 0xD1 | 0xE1 | 0xF1 => Instruction::PopStack(register_pair_for_push_pop(opcode)),
        0xC2 | 0xCA | 0xD2 | 0xDA => {
            let cc = jump_condition(opcode);
            Instruction::JumpCond(cc, fetch_u16(address_space, cpu_registers)?)
        }
        0xC3 => Instruction::Jump(fetch_u16(address_space, cpu_registers)?),
        0xC4 | 0xCC | 0xD4 | 0xDC => {
            let cc = jump_condition(opcode);
            Instruction::CallCond(cc, fetch_u16(address_space, cpu_registers)?)
        }
        0xC5 | 0xD5 | 0xE5 | 0xF5 => Instruction::PushStack(register_pair_for_push_pop(opcode)),
        0xC6 => Instruction::Add(ReadTarget::Immediate(fetch_u8(address_space, cpu_registers)?)),
        0xC7 | 0xCF | 0xD7 | 0xDF | 0xE7 | 0xEF | 0xF7 | 0xFF => {
            Instruction::RestartCall(opcode & 0x38)
        }
        0xC9 => Instruction::Return,
        0xCB => parse_cb_prefixed_opcode(fetch_u8(address_space, cpu_registers)?),
        0xCD => Instruction::Call(fetch_u16(address_space, cpu_registers)?),
        0xCE => {
            let n = fetch_u8(address_space, cpu_registers)?;
            Instruction::AddWithCarry(ReadTarget::Immediate(n))
        }
        0xD6 => {
            let n = fetch_u8(address_space, cpu_registers)?;
            Instruction::Subtract(ReadTarget::Immediate(n))
        }
        0xDE => {
            let n = fetch_u8(address_space, cpu_registers)?;
            Instruction::SubtractWithCarry(ReadTarget::Immediate(n))
        }
        0xE0 => {
            let n = fetch_u8(address_space, cpu_registers)?;
            Instruction::Load(WriteTarget::FFDirect(n), ReadTarget::Accumulator)
        }
        0xE2 => Instruction::Load(WriteTarget::FFIndirectC, ReadTarget::Accumulator),
        0xE6 => Instruction::And(ReadTarget::Immediate(fetch_u8(address_space, cpu_registers)?)),
        0xE8 => Instruction::AddSPImmediate(fetch_u8(address_space, cpu_registers)? as i8),
        0xE9 => Instruction::JumpHL,
        0xEA => {
            let nn = fetch_u16(address_space, cpu_registers)?;
            Instruction::Load(WriteTarget::Direct(nn), ReadTarget::Accumulator)
        }
        0xEE => Instruction::Xor(ReadTarget::Immediate(fetch_u8(address_space, cpu_registers)?)),
        0xF0 => {
            let n = fetch_u8(address_space, cpu_registers)?;
            Instruction::Load(WriteTarget::Accumulator, ReadTarget::FFDirect(n))
        }
        0xF2 => Instruction::Load(WriteTarget::Accumulator, ReadTarget::FFIndirectC),
        0xF6 => Instruction::Or(ReadTarget::Immediate(fetch_u8(address_space, cpu_registers)?)),
        0xF8 => {
            let e = fetch_u8(address_space, cpu_registers)? as i8;
            Instruction::LoadHLStackPointerOffset(e)
        }
        0xF9 => Instruction::LoadStackPointerHL,
        0xFA => {
            let nn = fetch_u16(address_space, cpu_registers)?;
            Instruction::Load(WriteTarget::Accumulator, ReadTarget::Direct(nn))
        }
        0xFE => {
            let n = fetch_u8(address_space, cpu_registers)?;
            Instruction::Compare(ReadTarget::Immediate(n))
        }
        // STOP, RETI, DI, EI and the unassigned opcodes
        0x10 | 0xD9 | 0xF3 | 0xFB | 0xD3 | 0xDB | 0xDD | 0xE3 | 0xE4 | 0xEB | 0xEC | 0xED
        | 0xF4 | 0xFC | 0xFD => {
            return Err(ExecutionError::UnimplementedOpcode { pc, opcode });
        }
    };

    Ok(instruction)
}

fn parse_cb_prefixed_opcode(opcode: u8) -> Instruction {
    let bit = (opcode >> 3) & 0x07;

    match opcode {
        0x00..=0x3F => {
            let target = modify_target(opcode);
            match opcode >> 3 {
                0 => Instruction::RotateLeft(target),
                1 => Instruction::RotateRight(target),
                2 => Instruction::RotateLeftThruCarry(target),
                3 => Instruction::RotateRightThruCarry(target),
                4 => Instruction::ShiftLeft(target),
                5 => Instruction::ArithmeticShiftRight(target),
                6 => Instruction::Swap(target),
                _ => Instruction::LogicalShiftRight(target),
            }
        }
        0x40..=0x7F => Instruction::TestBit(bit, read_target(opcode)),
        0x80..=0xBF => Instruction::ResetBit(bit, modify_target(opcode)),
        0xC0..=0xFF => Instruction::SetBit(bit, modify_target(opcode)),
    }
}

// Operand fields use the low three bits; 6 selects (HL)
fn read_target(bits: u8) -> ReadTarget {
    CpuRegister::from_low_opcode_bits(bits).map_or(ReadTarget::IndirectHL, ReadTarget::Register)
}

fn write_target(bits: u8) -> WriteTarget {
    CpuRegister::from_low_opcode_bits(bits).map_or(WriteTarget::IndirectHL, WriteTarget::Register)
}

fn modify_target(bits: u8) -> ModifyTarget {
    CpuRegister::from_low_opcode_bits(bits).map_or(ModifyTarget::IndirectHL, ModifyTarget::Register)
}

fn register_pair_for_other_ops(opcode: u8) -> CpuRegisterPair {
    match opcode & 0x30 {
        0x00 => CpuRegisterPair::BC,
        0x10 => CpuRegisterPair::DE,
        0x20 => CpuRegisterPair::HL,
        _ => CpuRegisterPair::SP,
    }
}

fn register_pair_for_push_pop(opcode: u8) -> CpuRegisterPair {
    match opcode & 0x30 {
        0x00 => CpuRegisterPair::BC,
        0x10 => CpuRegisterPair::DE,
        0x20 => CpuRegisterPair::HL,
        _ => CpuRegisterPair::AF,
    }
}

fn jump_condition(opcode: u8) -> JumpCondition {
    match opcode & 0x18 {
        0x00 => JumpCondition::NZ,
        0x08 => JumpCondition::Z,
        0x10 => JumpCondition::NC,
        _ => JumpCondition::C,
    }
}
