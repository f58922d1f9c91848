//! The `table:` directive.

use crate::error::{CompilerError, ErrorKind, Result};
use crate::Rule;
use mcu8::constants::MEMORY_SIZE;
use matches::debug_assert_matches;
use pest::iterators::Pair;

/// Parses a `table:` statement into its raw bytes, rejecting a table with
/// more entries than fit in the 256-byte lookup table.
pub fn process(pair: Pair<Rule>) -> Result<Vec<u8>> {
    debug_assert_matches!(pair.as_rule(), Rule::lookup_table);
    let span = pair.as_span();

    let bytes: Vec<u8> = pair
        .into_inner()
        .map(|hex_byte| u8::from_str_radix(hex_byte.as_str(), 16).unwrap())
        .collect();

    if bytes.len() > MEMORY_SIZE {
        return Err(CompilerError::new(
            ErrorKind::InvalidLookupTable,
            span,
            format!(
                "lookup table has {} entries, more than the {} that fit in memory",
                bytes.len(),
                MEMORY_SIZE
            ),
        ));
    }

    Ok(bytes)
}
