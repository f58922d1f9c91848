use crate::{MasmParser, Rule};
use ::pest::*;

#[test]
fn comment_is_stripped_up_to_newline() {
    parses_to! {
        parser: MasmParser,
        input: "; a whole comment line, nothing else",
        rule: Rule::program,
        tokens: []
    };
}

#[test]
fn mnemonic() {
    parses_to! {
        parser: MasmParser,
        input: "HALT",
        rule: Rule::instruction,
        tokens: [ instruction(0, 4, [ mnemonic(0, 4) ]) ]
    };
}

#[test]
fn operand_is_one_token_regardless_of_shape() {
    parses_to! {
        parser: MasmParser,
        input: "S0",
        rule: Rule::operand,
        tokens: [ operand(0, 2) ]
    };
    parses_to! {
        parser: MasmParser,
        input: "loop",
        rule: Rule::operand,
        tokens: [ operand(0, 4) ]
    };
}

#[test]
fn instruction_with_two_operands() {
    parses_to! {
        parser: MasmParser,
        input: "MOVI S0,2A",
        rule: Rule::instruction,
        tokens: [ instruction(0, 10, [
            mnemonic(0, 4),
            operand(5, 7),
            operand(8, 10),
        ]) ]
    };
}

#[test]
fn operands_may_be_separated_by_whitespace_instead_of_comma() {
    parses_to! {
        parser: MasmParser,
        input: "MOVI S0 2A",
        rule: Rule::instruction,
        tokens: [ instruction(0, 10, [
            mnemonic(0, 4),
            operand(5, 7),
            operand(8, 10),
        ]) ]
    };
}

#[test]
fn label() {
    parses_to! {
        parser: MasmParser,
        input: "loop:",
        rule: Rule::label,
        tokens: [ label(0, 5, [ identifier(0, 4) ]) ]
    };
}

#[test]
fn identifier_cannot_start_with_a_digit() {
    fails_with! {
        parser: MasmParser,
        input: "5label",
        rule: Rule::identifier,
        positives: vec![Rule::identifier],
        negatives: vec![],
        pos: 0
    };
}

#[test]
fn lookup_table() {
    parses_to! {
        parser: MasmParser,
        input: "table:0A,FF",
        rule: Rule::lookup_table,
        tokens: [ lookup_table(0, 11, [
            hex_byte(6, 8),
            hex_byte(9, 11),
        ]) ]
    };
}

#[test]
fn lookup_table_requires_at_least_one_byte() {
    fails_with! {
        parser: MasmParser,
        input: "table:",
        rule: Rule::lookup_table,
        positives: vec![Rule::hex_byte],
        negatives: vec![],
        pos: 6
    };
}

#[test]
fn program_accepts_blank_lines_and_trailing_input_without_newline() {
    let input = "\nMOVI S0,01\n\nHALT";
    parses_to! {
        parser: MasmParser,
        input: input,
        rule: Rule::program,
        tokens: [
            instruction(1, 11, [
                mnemonic(1, 5),
                operand(6, 8),
                operand(9, 11),
            ]),
            instruction(13, 17, [
                mnemonic(13, 17),
            ]),
        ]
    };
}

#[test]
fn program_with_label_and_comment() {
    let input = "loop:       ; entry point\nJP loop";
    parses_to! {
        parser: MasmParser,
        input: input,
        rule: Rule::program,
        tokens: [
            label(0, 5, [ identifier(0, 4) ]),
            instruction(26, 33, [
                mnemonic(26, 28),
                operand(29, 33),
            ]),
        ]
    };
}
