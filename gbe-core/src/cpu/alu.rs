//! Flag-producing arithmetic shared by the instruction handlers.
//!
//! Each function returns `(result, carry, half_carry)`. The zero flag is left to the caller since
//! several instructions (INC/DEC, `ADD HL,rr`) treat it differently from the plain ALU ops.

pub fn add_u8(l_value: u8, r_value: u8, carry: bool) -> (u8, bool, bool) {
    let carry = u16::from(carry);
    let total = u16::from(l_value) + u16::from(r_value) + carry;
    let h_flag = u16::from(l_value & 0x0F) + u16::from(r_value & 0x0F) + carry > 0x0F;

    (total as u8, total > 0xFF, h_flag)
}

pub fn add_u16(l_value: u16, r_value: u16, carry: bool) -> (u16, bool, bool) {
    let carry = u32::from(carry);
    let total = u32::from(l_value) + u32::from(r_value) + carry;
    let h_flag = u32::from(l_value & 0x0FFF) + u32::from(r_value & 0x0FFF) + carry > 0x0FFF;

    (total as u16, total > 0xFFFF, h_flag)
}

pub fn sub_u8(l_value: u8, r_value: u8, carry: bool) -> (u8, bool, bool) {
    let carry = i16::from(carry);
    let total = i16::from(l_value) - i16::from(r_value) - carry;
    let h_flag = i16::from(l_value & 0x0F) - i16::from(r_value & 0x0F) - carry < 0;

    (total as u8, total < 0, h_flag)
}

pub fn sub_u16(l_value: u16, r_value: u16, carry: bool) -> (u16, bool, bool) {
    let carry = i32::from(carry);
    let total = i32::from(l_value) - i32::from(r_value) - carry;
    let h_flag = i32::from(l_value & 0x0FFF) - i32::from(r_value & 0x0FFF) - carry < 0;

    (total as u16, total < 0, h_flag)
}

/// `SP + e` as used by `ADD SP,e` and `LD HL,SP+e`. The offset is sign-extended for the result,
/// but the flags come from an unsigned add of the low byte.
pub fn add_sp_offset(sp: u16, offset: i8) -> (u16, bool, bool) {
    let offset = offset as u16;
    let h_flag = (sp & 0x000F) + (offset & 0x000F) > 0x000F;
    let carry_flag = (sp & 0x00FF) + (offset & 0x00FF) > 0x00FF;

    (sp.wrapping_add(offset), carry_flag, h_flag)
}

/// BCD correction of the accumulator after an add or subtract. Returns the corrected value and the
/// new carry flag.
pub fn decimal_adjust(value: u8, n_flag: bool, h_flag: bool, c_flag: bool) -> (u8, bool) {
    if n_flag {
        let mut adjustment = 0;
        if h_flag {
            adjustment |= 0x06;
        }
        if c_flag {
            adjustment |= 0x60;
        }

        (value.wrapping_sub(adjustment), c_flag)
    } else {
        let mut adjustment = 0;
        let mut carry = c_flag;
        if h_flag || value & 0x0F > 0x09 {
            adjustment |= 0x06;
        }
        if c_flag || value > 0x99 {
            adjustment |= 0x60;
            carry = true;
        }

        (value.wrapping_add(adjustment), carry)
    }
}

pub fn rotate_left(value: u8) -> (u8, bool) {
    let leftmost_set = value & 0x80 != 0;
    let new_value = (value << 1) | u8::from(leftmost_set);

    (new_value, leftmost_set)
}

pub fn rotate_left_thru_carry(value: u8, carry: bool) -> (u8, bool) {
    let leftmost_set = value & 0x80 != 0;
    let new_value = (value << 1) | u8::from(carry);

    (new_value, leftmost_set)
}

pub fn rotate_right(value: u8) -> (u8, bool) {
    let rightmost_set = value & 0x01 != 0;
    let new_value = (value >> 1) | (u8::from(rightmost_set) << 7);

    (new_value, rightmost_set)
}

pub fn rotate_right_thru_carry(value: u8, carry: bool) -> (u8, bool) {
    let rightmost_set = value & 0x01 != 0;
    let new_value = (value >> 1) | (u8::from(carry) << 7);

    (new_value, rightmost_set)
}

pub fn shift_left(value: u8) -> (u8, bool) {
    (value << 1, value & 0x80 != 0)
}

// Bit 7 is kept, so the sign survives
pub fn arithmetic_shift_right(value: u8) -> (u8, bool) {
    ((value >> 1) | (value & 0x80), value & 0x01 != 0)
}

pub fn logical_shift_right(value: u8) -> (u8, bool) {
    (value >> 1, value & 0x01 != 0)
}

pub fn swap(value: u8) -> (u8, bool) {
    (value.rotate_left(4), false)
}
