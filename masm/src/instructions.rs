//! Turning a parsed `instruction` line into encoded bytes.
//!
//! Most instructions have no label operand and are fully encodable the
//! moment they're parsed; `JP`/`JZ`/`JNZ`/`RCALL` carry a label or constant
//! target that may refer forward, so they're kept as [`ParsedInstruction::Branch`]
//! until every label in the program has been seen.

use crate::error::{CompilerError, ErrorKind, Result};
use crate::labels;
use crate::labels::LabelMap;
use crate::operand::{self, Operand};
use crate::Rule;
use matches::debug_assert_matches;
use mcu8::instruction::{self, is_port_instruction, OperandKindTag};
use mcu8::Opcode;
use num_traits::ToPrimitive;
use pest::iterators::Pair;
use pest::Span;

#[derive(Debug, PartialEq, Eq)]
pub enum ParsedInstruction {
    /// Fully encoded; no label resolution needed.
    Complete(Vec<u8>),
    /// A `JP`/`JZ`/`JNZ`/`RCALL` whose target is resolved in a second pass,
    /// once every label (and, for `RCALL`, the instruction's own address)
    /// is known.
    Branch {
        opcode: Opcode,
        own_address: u8,
        target: Operand,
        span_start: usize,
        span_end: usize,
    },
}

/// Parses one `instruction` line into the instruction(s) it produces
/// (always exactly one, for this instruction set) appending it to `out`,
/// and returns the number of bytes it will occupy in code memory.
pub fn process<'i>(
    pair: Pair<'i, Rule>,
    own_address: u8,
    out: &mut Vec<ParsedInstruction>,
) -> Result<usize> {
    debug_assert_matches!(pair.as_rule(), Rule::instruction);
    let instruction_span = pair.as_span();
    let mut tokens = pair.into_inner();

    let mnemonic_pair = tokens.next().unwrap();
    let mnemonic = mnemonic_pair.as_str();
    let spec = instruction::spec_for_mnemonic(mnemonic).ok_or_else(|| {
        CompilerError::new(
            ErrorKind::InvalidMnemonic,
            mnemonic_pair.as_span(),
            format!("'{}' is not a recognized mnemonic", mnemonic),
        )
    })?;

    let operand_pairs: Vec<Pair<Rule>> = tokens.collect();
    if operand_pairs.len() != spec.arity {
        return Err(CompilerError::new(
            ErrorKind::InvalidOperand,
            instruction_span,
            format!(
                "{} takes {} operand(s), found {}",
                spec.mnemonic,
                spec.arity,
                operand_pairs.len()
            ),
        ));
    }

    let mut operands = Vec::with_capacity(operand_pairs.len());
    for (operand_pair, &kind) in operand_pairs.iter().zip(spec.operand_kinds.iter()) {
        let span = operand_pair.as_span();
        let classified = operand::classify(span.clone())?;
        operand::expect(&classified, kind, span)?;
        operands.push(classified);
    }

    if spec.operand_kinds.contains(&OperandKindTag::LabelOrConstant) {
        // JP / JZ / JNZ / RCALL: exactly one operand, resolved later.
        let target = operands.into_iter().next().unwrap();
        out.push(ParsedInstruction::Branch {
            opcode: spec.opcode,
            own_address,
            target,
            span_start: instruction_span.start(),
            span_end: instruction_span.end(),
        });
        return Ok(spec.size_bytes);
    }

    let mut bytes = vec![spec.opcode.to_u8().unwrap()];
    if is_port_instruction(spec.opcode) {
        // IN/OUT declare a Register alongside the implicit I/Q token, but
        // only the register index is encoded.
        let register = operands.iter().find_map(|op| match op {
            Operand::Register(index) => Some(*index),
            _ => None,
        });
        bytes.push(register.expect("IN/OUT always pair a register with the port token"));
    } else {
        for operand in &operands {
            bytes.push(operand_byte(operand));
        }
    }

    out.push(ParsedInstruction::Complete(bytes));
    Ok(spec.size_bytes)
}

fn operand_byte(operand: &Operand) -> u8 {
    match operand {
        Operand::Register(index) => *index,
        Operand::Constant(value) => *value,
        Operand::Input | Operand::Output | Operand::Label(_) => {
            unreachable!("only Register/Constant operands reach direct encoding")
        }
    }
}

/// Resolves every `Branch` against the now-complete label table, producing
/// the final byte sequence for the whole instruction stream.
pub fn finalize(instructions: &[ParsedInstruction], labels: &LabelMap, source: &str) -> Result<Vec<u8>> {
    let mut code = Vec::new();
    for instruction in instructions {
        match instruction {
            ParsedInstruction::Complete(bytes) => code.extend_from_slice(bytes),
            ParsedInstruction::Branch {
                opcode,
                own_address,
                target,
                span_start,
                span_end,
            } => {
                let span = Span::new(source, *span_start, *span_end).unwrap();
                let resolved = labels::resolve(target, *own_address, labels, span)?;
                code.push(opcode.to_u8().unwrap());
                code.push(resolved);
            }
        }
    }
    Ok(code)
}
