use super::{run_test, ExpectedState};

#[test]
fn and() {
    run_test(
        // LD A, 0xF0; SCF; AND 0x3C
        "3EF037E63C",
        &ExpectedState {
            a: Some(0x30),
            f: Some(0x20),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0xF0; LD D, 0x0F; AND D
        "3EF0160FA2",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0xA0),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn or() {
    run_test(
        // LD A, 0x00; OR 0x00
        "3E00F600",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0x80),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0x50; LD L, 0x0A; SCF; OR L
        "3E502E0A37B5",
        &ExpectedState {
            a: Some(0x5A),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn xor() {
    run_test(
        // LD A, 0x7C; XOR A
        "3E7CAF",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0x80),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0xFF; XOR 0x0F
        "3EFFEE0F",
        &ExpectedState {
            a: Some(0xF0),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD HL, 0xC000; LD (HL), 0xAA; LD A, 0x55; XOR (HL)
        "2100C036AA3E55AE",
        &ExpectedState {
            a: Some(0xFF),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn rotate_left_accumulator() {
    run_test(
        // LD A, 0x85; RLCA
        "3E8507",
        &ExpectedState {
            a: Some(0x0B),
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // XOR A; RLCA
        "AF07",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0x80),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn rotate_left_accumulator_thru_carry() {
    run_test(
        // LD A, 0x85; RLA
        "3E8517",
        &ExpectedState {
            a: Some(0x0A),
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0x85; SCF; RLA
        "3E853717",
        &ExpectedState {
            a: Some(0x0B),
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0x80; RLA
        "3E8017",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0x90),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn rotate_right_accumulator() {
    run_test(
        // LD A, 0x85; RRCA
        "3E850F",
        &ExpectedState {
            a: Some(0xC2),
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0x02; SCF; RRCA
        "3E02370F",
        &ExpectedState {
            a: Some(0x01),
            f: Some(0x00),
            ..ExpectedState::empty()
        },
    );
}

#[test]
fn rotate_right_accumulator_thru_carry() {
    run_test(
        // LD A, 0x85; RRA
        "3E851F",
        &ExpectedState {
            a: Some(0x42),
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0x85; SCF; RRA
        "3E85371F",
        &ExpectedState {
            a: Some(0xC2),
            f: Some(0x10),
            ..ExpectedState::empty()
        },
    );

    run_test(
        // LD A, 0x01; RRA
        "3E011F",
        &ExpectedState {
            a: Some(0x00),
            f: Some(0x90),
            ..ExpectedState::empty()
        },
    );
}
