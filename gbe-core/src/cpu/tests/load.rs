use super::{run_test, set_in_state, ExpectedState, ALL_REGISTERS};
use crate::cpu::CpuRegister;
use std::collections::HashMap;

#[test]
fn load_register_immediate() {
    for r in ALL_REGISTERS {
        let opcode = 0x06 | (r.to_opcode_bits() << 3);

        let mut expected_state = ExpectedState::empty();
        set_in_state(&mut expected_state, r, 0x45);

        // LD <R>, 0x45
        run_test(&format!("{opcode:02x}45"), &expected_state);
    }
}

#[test]
fn load_register_register() {
    for r1 in ALL_REGISTERS {
        let ldri = 0x06 | (r1.to_opcode_bits() << 3);
        // LD <R1>, 0x45
        let ldri = format!("{ldri:02x}45");

        for r2 in ALL_REGISTERS {
            let opcode = 0x40 | (r2.to_opcode_bits() << 3) | r1.to_opcode_bits();

            // LD <R2>, <R1>
            let program_hex = format!("{ldri}{opcode:02x}");

            let mut expected_state = ExpectedState::empty();
            set_in_state(&mut expected_state, r2, 0x45);

            run_test(&program_hex, &expected_state);
        }
    }
}

#[test]
fn load_register_pair_immediate() {
    run_test(
        // LD BC, 0x2468
        "016824",
        &ExpectedState {
            b: Some(0x24),
            c: Some(0x68),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD DE, 0x1357
        "115713",
        &ExpectedState {
            d: Some(0x13),
            e: Some(0x57),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD HL, 0xC0DE
        "21DEC0",
        &ExpectedState {
            h: Some(0xC0),
            l: Some(0xDE),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD SP, 0xDFF0
        "31F0DF",
        &ExpectedState {
            sp: Some(0xDFF0),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn load_indirect_hl() {
    run_test(
        // LD HL, 0xC105; LD (HL), 0x83; LD E, (HL)
        "2105C136835E",
        &ExpectedState {
            e: Some(0x83),
            memory: hash_map! { 0xC105: 0x83 },
            ..ExpectedState::empty()
        },
    );

    for r in ALL_REGISTERS {
        if r == CpuRegister::H || r == CpuRegister::L {
            continue;
        }

        let ldri = 0x06 | (r.to_opcode_bits() << 3);
        let ldhlr = 0x70 | r.to_opcode_bits();

        // LD HL, 0xD075; LD <R>, 0x3C; LD (HL), <R>
        let program_hex = format!("2175D0{ldri:02x}3C{ldhlr:02x}");
        run_test(
            &program_hex,
            &ExpectedState {
                memory: hash_map! { 0xD075: 0x3C },
                ..ExpectedState::empty()
            },
        );
    }

    run_test(
        // LD HL, 0xC0DE; LD (HL), H; LD A, (HL)
        "21DEC0747E",
        &ExpectedState {
            a: Some(0xC0),
            memory: hash_map! { 0xC0DE: 0xC0 },
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn load_indirect_bc_de() {
    run_test(
        // LD BC, 0xC560; LD A, 0xFA; LD (BC), A; LD A, 0x00; LD A, (BC)
        "0160C53EFA023E000A",
        &ExpectedState {
            a: Some(0xFA),
            memory: hash_map! { 0xC560: 0xFA },
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD DE, 0xC010; LD A, 0x65; LD (DE), A; LD A, 0x00; LD A, (DE)
        "1110C03E65123E001A",
        &ExpectedState {
            a: Some(0x65),
            memory: hash_map! { 0xC010: 0x65 },
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn load_direct() {
    run_test(
        // LD A, 0x9A; LD (0xD00D), A; LD A, 0x00; LD A, (0xD00D)
        "3E9AEA0DD03E00FA0DD0",
        &ExpectedState {
            a: Some(0x9A),
            memory: hash_map! { 0xD00D: 0x9A },
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, (0x0100), which reads back the program's own first opcode
        "FA0001",
        &ExpectedState {
            a: Some(0xFA),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn load_high_page() {
    run_test(
        // LD A, 0x5E; LDH (0x80), A; LD A, 0x00; LDH A, (0x80)
        "3E5EE0803E00F080",
        &ExpectedState {
            a: Some(0x5E),
            memory: hash_map! { 0xFF80: 0x5E },
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD C, 0xFE; LD A, 0x77; LD (C), A; LD A, 0x00; LD A, (C)
        "0EFE3E77E23E00F2",
        &ExpectedState {
            a: Some(0x77),
            memory: hash_map! { 0xFFFE: 0x77 },
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn load_indirect_hl_increment_decrement() {
    run_test(
        // LD HL, 0xC100; LD A, 0x11; LD (HL+), A; LD A, 0x22; LD (HL+), A
        "2100C13E11223E2222",
        &ExpectedState {
            h: Some(0xC1),
            l: Some(0x02),
            memory: hash_map! { 0xC100: 0x11, 0xC101: 0x22 },
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD HL, 0xC100; LD A, 0x33; LD (HL-), A; LD (HL-), A
        "2100C13E333232",
        &ExpectedState {
            h: Some(0xC0),
            l: Some(0xFE),
            memory: hash_map! { 0xC100: 0x33, 0xC0FF: 0x33 },
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD HL, 0xC200; LD (HL), 0x44; LD A, (HL+); LD B, A; LD A, (HL-)
        "2100C236442A473A",
        &ExpectedState {
            a: Some(0x00),
            b: Some(0x44),
            h: Some(0xC2),
            l: Some(0x00),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn load_indirect_hl_wraps() {
    run_test(
        // LD HL, 0xFFFF; LD A, 0x1F; LD (HL+), A
        "21FFFF3E1F22",
        &ExpectedState {
            h: Some(0x00),
            l: Some(0x00),
            memory: hash_map! { 0xFFFF: 0x1F },
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD HL, 0x0000; LD A, (HL-)
        "2100003A",
        &ExpectedState {
            a: Some(0x00),
            h: Some(0xFF),
            l: Some(0xFF),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn load_direct_stack_pointer() {
    run_test(
        // LD SP, 0xBEEF; LD (0xC050), SP
        "31EFBE0850C0",
        &ExpectedState {
            sp: Some(0xBEEF),
            memory: hash_map! { 0xC050: 0xEF, 0xC051: 0xBE },
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn load_stack_pointer_hl() {
    run_test(
        // LD HL, 0xDEAD; LD SP, HL
        "21ADDEF9",
        &ExpectedState {
            sp: Some(0xDEAD),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn load_hl_stack_pointer_offset() {
    run_test(
        // LD SP, 0xFFF8; LD HL, SP+2
        "31F8FFF802",
        &ExpectedState {
            f: Some(0x00),
            h: Some(0xFF),
            l: Some(0xFA),
            sp: Some(0xFFF8),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD SP, 0x00FF; LD HL, SP+1
        "31FF00F801",
        &ExpectedState {
            f: Some(0x30),
            h: Some(0x01),
            l: Some(0x00),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD SP, 0xC008; LD HL, SP-1
        "3108C0F8FF",
        &ExpectedState {
            f: Some(0x30),
            h: Some(0xC0),
            l: Some(0x07),
            ..ExpectedState::empty()
        },
    );
}
