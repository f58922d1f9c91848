//! Assembler for the [mcu8](../mcu8/index.html) microcontroller.
//!
//! The two functions provided by this crate are [`parse`] and [`assemble`].
//! [`parse`] turns assembly source into an [`IntermediateProgram`]: every
//! label resolved, every lookup table validated, but nothing written to
//! memory yet. [`assemble`] takes that program and a fresh
//! [`mcu8::Simulation`], writes code and lookup-table bytes directly into
//! it, and returns an [`OffsetMap`] that lets a front-end translate a
//! program counter value back into the source span that produced it.
//!
//! # Assembly Language
//!
//! A program is a sequence of lines, each either blank, a comment (`;` to
//! end of line), a label declaration (`name:`), a lookup table declaration
//! (`table:` followed by one or more two-digit hex bytes), or an
//! instruction (a mnemonic followed by its operands, separated by
//! whitespace or commas).
//!
//! Operands are not tagged by syntax; their meaning is decided from their
//! shape (see [`operand::classify`]):
//!
//! Shape                        | Meaning
//! ------------------------------|--------
//! `I` / `i`                     | the input port
//! `Q` / `q`                     | the output port
//! `S` or `s` + digit `0`-`7`     | a register
//! two hex digits                | a constant
//! anything else                 | a label
//!
//! `RCALL` additionally recognises three reserved names that never enter
//! the label table: `readtable`, `wait1ms` and `readadc`, which the
//! execution engine treats as built-in subroutines (see
//! `mcu8::processor::core`).

mod error;
mod instructions;
mod labels;
mod lookup_table;
mod operand;
mod parser;

#[cfg(test)]
mod test;

pub use error::{CompilerError, ErrorKind, Result};
pub use instructions::ParsedInstruction;
pub use labels::LabelMap;

use mcu8::constants::MEMORY_SIZE;
use pest::Parser;

pub(crate) use parser::{MasmParser, Rule};

/// A line's offset and length in the original source, recorded at the code
/// address where its first byte lands. Used by front-ends to highlight the
/// source responsible for the instruction currently executing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetMapEntry {
    /// Byte offset into the source, or `-1` if no instruction starts here.
    pub source_offset: i32,
    pub source_length: u32,
}

impl Default for OffsetMapEntry {
    fn default() -> Self {
        OffsetMapEntry {
            source_offset: -1,
            source_length: 0,
        }
    }
}

pub type OffsetMap = Vec<OffsetMapEntry>;

/// A fully parsed and label-resolved program, ready to be written into a
/// [`mcu8::Simulation`] by [`assemble`].
pub struct IntermediateProgram {
    code: Vec<u8>,
    lookup_table: Option<Vec<u8>>,
    offsets: OffsetMap,
}

/// Parses assembly source into an [`IntermediateProgram`].
///
/// Resolves every label (including forward references) and validates
/// every mnemonic, operand and lookup table entry, but performs no I/O and
/// touches no [`mcu8::Simulation`].
pub fn parse(source: &str) -> Result<IntermediateProgram> {
    let program = MasmParser::parse(Rule::program, source)
        .map_err(CompilerError::from_pest)?
        .next()
        .unwrap();

    let mut parsed_instructions = Vec::new();
    let mut label_map = LabelMap::new();
    let mut lookup_table: Option<Vec<u8>> = None;
    let mut offsets: Vec<(usize, usize, usize)> = Vec::new(); // (address, source_offset, source_length)
    let mut code_size: usize = 0;

    for statement in program.into_inner() {
        match statement.as_rule() {
            Rule::EOI => {}
            Rule::lookup_table => {
                let span = statement.as_span();
                let bytes = lookup_table::process(statement)?;
                if lookup_table.is_some() {
                    return Err(CompilerError::new(
                        ErrorKind::DuplicateLookupTable,
                        span,
                        "only one lookup table may be declared per program",
                    ));
                }
                lookup_table = Some(bytes);
            }
            Rule::label => {
                labels::declare(&mut label_map, statement, code_size as u8)?;
            }
            Rule::instruction => {
                let span = statement.as_span();
                let address = code_size as u8;
                let size = instructions::process(statement, address, &mut parsed_instructions)?;
                offsets.push((code_size, span.start(), span.end() - span.start()));
                code_size += size;

                if code_size > MEMORY_SIZE {
                    return Err(CompilerError::new(
                        ErrorKind::MemoryOverflow,
                        span,
                        format!(
                            "program is {} bytes, more than the {} that fit in memory",
                            code_size, MEMORY_SIZE
                        ),
                    ));
                }
            }
            rule => unreachable!("unexpected top-level rule {:?}", rule),
        }
    }

    let code = instructions::finalize(&parsed_instructions, &label_map, source)?;

    let mut offset_map = vec![OffsetMapEntry::default(); code.len() + 1];
    for (address, source_offset, source_length) in offsets {
        offset_map[address] = OffsetMapEntry {
            source_offset: source_offset as i32,
            source_length: source_length as u32,
        };
    }

    Ok(IntermediateProgram {
        code,
        lookup_table,
        offsets: offset_map,
    })
}

/// Writes an [`IntermediateProgram`] into `sim`'s code memory and (if one
/// was declared) lookup table, and returns the resulting [`OffsetMap`].
///
/// Any code or lookup-table bytes the program didn't cover are left at
/// whatever `sim` already held; callers that want a clean slate should
/// assemble into a freshly constructed `Simulation`.
pub fn assemble(
    program: IntermediateProgram,
    sim: &mut mcu8::Simulation,
) -> Result<OffsetMap> {
    let memory = sim.memory_mut();
    memory[..program.code.len()].copy_from_slice(&program.code);

    if let Some(table) = &program.lookup_table {
        let lookup_table = sim.lookup_table_mut();
        lookup_table[..table.len()].copy_from_slice(table);
    }

    Ok(program.offsets)
}
