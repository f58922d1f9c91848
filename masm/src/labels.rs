//! The user label table, and resolution of jump/call targets against it.
//!
//! Three names never enter the table: `readtable`, `wait1ms` and `readadc`
//! resolve to synthetic addresses relative to the `RCALL` instruction that
//! names them, and always take priority over a user label of the same
//! name (mirroring how the execution engine itself recognises them, in
//! `mcu8::processor::core`).

use crate::error::{CompilerError, ErrorKind, Result};
use crate::operand::Operand;
use crate::Rule;
use pest::iterators::Pair;
use pest::Span;
use std::collections::HashMap;

pub type LabelMap = HashMap<String, u8>;

const READTABLE: &str = "readtable";
const WAIT1MS: &str = "wait1ms";
const READADC: &str = "readadc";

/// Inserts a label declaration at the given address, failing if the name
/// was already declared earlier in the program.
pub fn declare(labels: &mut LabelMap, pair: Pair<Rule>, address: u8) -> Result<()> {
    let inner = pair.into_inner().next().unwrap();
    let name = inner.as_str().to_owned();
    if labels.contains_key(&name) {
        return Err(CompilerError::new(
            ErrorKind::DuplicateLabel,
            inner.as_span(),
            format!("label '{}' is already defined", name),
        ));
    }
    labels.insert(name, address);
    Ok(())
}

/// Resolves a `JP`/`JZ`/`JNZ`/`RCALL` target: a constant is used as-is, a
/// reserved name resolves relative to `own_address`, and anything else is
/// looked up in the user label table.
pub fn resolve(
    operand: &Operand,
    own_address: u8,
    labels: &LabelMap,
    span: Span,
) -> Result<u8> {
    match operand {
        Operand::Constant(value) => Ok(*value),
        Operand::Label(name) => {
            if name == READTABLE {
                Ok(own_address)
            } else if name == WAIT1MS {
                Ok(own_address.wrapping_add(1))
            } else if name == READADC {
                Ok(own_address.wrapping_add(2))
            } else {
                labels.get(name).copied().ok_or_else(|| {
                    CompilerError::new(
                        ErrorKind::UnresolvableLabel,
                        span,
                        format!("label '{}' is not defined", name),
                    )
                })
            }
        }
        _ => unreachable!("operand shape was already checked against LabelOrConstant"),
    }
}
