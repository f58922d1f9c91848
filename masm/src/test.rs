use crate::error::ErrorKind;
use crate::{assemble, parse};
use mcu8::Simulation;

mod pest;

fn run_to_completion(source: &str) -> Simulation {
    let program = parse(source).unwrap();
    let mut sim = Simulation::new();
    assemble(program, &mut sim).unwrap();
    sim.start();
    while sim.iterate().unwrap() {}
    sim
}

#[test]
fn movi_out_halt() {
    let sim = run_to_completion("MOVI S0,2A\nOUT Q,S0\nHALT");
    assert_eq!(sim.output_port(), 0x2A);
}

#[test]
fn add_wraps_and_sets_zero_flag() {
    let sim = run_to_completion(
        "MOVI S0,FF\nMOVI S1,01\nADD S0,S1\nHALT",
    );
    assert_eq!(sim.registers()[0], 0x00);
    assert!(sim.zero_flag());
}

#[test]
fn forward_jump_skips_the_first_movi() {
    let source = "JP loop\nMOVI S0,01\nloop:\nMOVI S0,02\nHALT";
    let sim = run_to_completion(source);
    assert_eq!(sim.registers()[0], 0x02);
}

#[test]
fn rcall_and_ret_through_a_user_label() {
    let source = "MOVI S0,01\nRCALL sub\nHALT\nsub:\nMOVI S0,FF\nRET";
    let sim = run_to_completion(source);
    // The caller's register file is restored by RET, so S0 is back to 01
    // by the time HALT runs.
    assert_eq!(sim.registers()[0], 0x01);
}

#[test]
fn readtable_builtin_through_rcall() {
    let source = "table:00,00,BE\nMOVI S7,02\nRCALL readtable\nHALT";
    let sim = run_to_completion(source);
    assert_eq!(sim.registers()[0], 0xBE);
}

#[test]
fn readadc_builtin_through_rcall() {
    let source = "RCALL readadc\nHALT";
    let program = parse(source).unwrap();
    let mut sim = Simulation::new();
    assemble(program, &mut sim).unwrap();
    sim.start();
    sim.set_analogue_input(5.0).unwrap();
    while sim.iterate().unwrap() {}
    assert_eq!(sim.registers()[0], 0xFF);
}

#[test]
fn duplicate_label_is_rejected() {
    let err = parse("loop:\nHALT\nloop:\nHALT").unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateLabel);
}

#[test]
fn duplicate_lookup_table_is_rejected() {
    let err = parse("table:00\ntable:11\nHALT").unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateLookupTable);
}

#[test]
fn unknown_mnemonic_is_rejected() {
    let err = parse("NOPE S0,01").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidMnemonic);
}

#[test]
fn wrong_operand_shape_is_rejected() {
    // MOVI wants (Register, Constant); two registers is a type mismatch,
    // not a missing/extra operand.
    let err = parse("MOVI S0,S1").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidOperandType);
}

#[test]
fn jump_to_an_undefined_label_is_unresolvable() {
    let err = parse("JP nowhere\nHALT").unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnresolvableLabel);
}

#[test]
fn program_too_large_for_memory_overflows() {
    let mut source = String::new();
    for _ in 0..90 {
        source.push_str("MOVI S0,01\n");
    }
    let err = parse(&source).unwrap_err();
    assert_eq!(err.kind, ErrorKind::MemoryOverflow);
}

#[test]
fn offset_map_points_back_at_the_instruction_that_produced_each_address() {
    let source = "MOVI S0,2A\nHALT";
    let program = parse(source).unwrap();
    let mut sim = Simulation::new();
    let offsets = assemble(program, &mut sim).unwrap();

    assert_eq!(offsets[0].source_offset, 0);
    assert_eq!(offsets[0].source_length as usize, "MOVI S0,2A".len());
    assert_eq!(offsets[3].source_offset, "MOVI S0,2A\n".len() as i32);
}
