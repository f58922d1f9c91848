//! Operand tokens and their disambiguation.
//!
//! The grammar captures every operand as one undifferentiated token; which
//! of register, port, constant or label it denotes is decided here, purely
//! from the token's length and character shape — never from which mnemonic
//! it follows.

use crate::error::{CompilerError, ErrorKind, Result};
use mcu8::OperandKindTag;
use pest::Span;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Constant(u8),
    Register(u8),
    Input,
    Output,
    Label(String),
}

/// Classifies a raw operand token.
///
/// * one character: `I`/`i` is the input port, `Q`/`q` is the output port,
///   anything else is a label.
/// * two characters: `S`/`s` followed by a digit `0`-`7` is a register;
///   otherwise, if both characters are hex digits, a constant; otherwise a
///   label.
/// * anything else is a label.
pub fn classify(span: Span) -> Result<Operand> {
    let raw = span.as_str();
    let mut chars = raw.chars();

    match raw.len() {
        1 => {
            let c = chars.next().unwrap();
            if c.eq_ignore_ascii_case(&'i') {
                Ok(Operand::Input)
            } else if c.eq_ignore_ascii_case(&'q') {
                Ok(Operand::Output)
            } else {
                Ok(Operand::Label(raw.to_owned()))
            }
        }
        2 => {
            let first = chars.next().unwrap();
            let second = chars.next().unwrap();
            if first.eq_ignore_ascii_case(&'s') && ('0'..='7').contains(&second) {
                Ok(Operand::Register(second as u8 - b'0'))
            } else if first.is_ascii_hexdigit() && second.is_ascii_hexdigit() {
                let value = u8::from_str_radix(raw, 16).map_err(|err| {
                    CompilerError::new(ErrorKind::InvalidConstant, span.clone(), err.to_string())
                })?;
                Ok(Operand::Constant(value))
            } else {
                Ok(Operand::Label(raw.to_owned()))
            }
        }
        _ => Ok(Operand::Label(raw.to_owned())),
    }
}

/// Checks a classified operand against the shape an instruction slot
/// declares, per the instruction table.
pub fn expect(operand: &Operand, tag: OperandKindTag, span: Span) -> Result<()> {
    let matches = match (tag, operand) {
        (OperandKindTag::Register, Operand::Register(_)) => true,
        (OperandKindTag::Constant, Operand::Constant(_)) => true,
        (OperandKindTag::LabelOrConstant, Operand::Constant(_))
        | (OperandKindTag::LabelOrConstant, Operand::Label(_)) => true,
        (OperandKindTag::Input, Operand::Input) => true,
        (OperandKindTag::Output, Operand::Output) => true,
        _ => false,
    };

    if matches {
        Ok(())
    } else {
        Err(CompilerError::new(
            ErrorKind::InvalidOperandType,
            span,
            "operand does not have the expected shape for this slot",
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pest::Span;

    fn span(input: &'static str) -> Span<'static> {
        Span::new(input, 0, input.len()).unwrap()
    }

    #[test]
    fn single_letter_ports() {
        assert_eq!(classify(span("I")).unwrap(), Operand::Input);
        assert_eq!(classify(span("q")).unwrap(), Operand::Output);
    }

    #[test]
    fn single_letter_falls_back_to_label() {
        assert_eq!(classify(span("x")).unwrap(), Operand::Label("x".to_owned()));
    }

    #[test]
    fn register_wins_over_hex_when_ambiguous() {
        assert_eq!(classify(span("S5")).unwrap(), Operand::Register(5));
    }

    #[test]
    fn two_hex_digits_are_a_constant() {
        assert_eq!(classify(span("FF")).unwrap(), Operand::Constant(0xFF));
        assert_eq!(classify(span("0a")).unwrap(), Operand::Constant(0x0A));
    }

    #[test]
    fn non_register_non_hex_two_chars_is_a_label() {
        assert_eq!(classify(span("S8")).unwrap(), Operand::Label("S8".to_owned()));
        assert_eq!(classify(span("zz")).unwrap(), Operand::Label("zz".to_owned()));
    }

    #[test]
    fn long_tokens_are_labels() {
        assert_eq!(classify(span("loop")).unwrap(), Operand::Label("loop".to_owned()));
    }
}
