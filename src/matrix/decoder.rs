//! Hex text decoding into validated byte matrices
//!
//! Input is one record per line, two hex digits per byte, high nibble first.
//! Validation is all-or-nothing: the first offending line fails the decode
//! and no partial matrix is produced.

use crate::io::error::{AnalysisError, MalformedReason, Result};
use crate::matrix::bytes::ByteMatrix;

/// Decode hex text into a byte matrix
///
/// Leading and trailing whitespace of the whole input is ignored, and each
/// line is trimmed before its length is compared against the first line.
///
/// # Errors
///
/// Returns an error if:
/// - The input holds no lines after trimming
/// - A line contains a non-hex character
/// - A line has an odd number of digits
/// - A line length differs from the first line
pub fn decode(text: &str) -> Result<ByteMatrix> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let mut lines = trimmed.lines().map(str::trim);
    let first = lines.next().ok_or(AnalysisError::EmptyInput)?;
    let expected = first.chars().count();
    if expected % 2 != 0 {
        return Err(AnalysisError::MalformedInput {
            line: 1,
            reason: MalformedReason::OddLength { length: expected },
        });
    }

    let width = expected / 2;
    let mut values = Vec::with_capacity(width * trimmed.len() / expected.max(1));
    decode_line(first, 1, &mut values)?;

    let mut records = 1;
    for (offset, line) in lines.enumerate() {
        let line_number = offset + 2;
        let found = line.chars().count();
        if found != expected {
            return Err(AnalysisError::MalformedInput {
                line: line_number,
                reason: MalformedReason::LengthMismatch { expected, found },
            });
        }
        decode_line(line, line_number, &mut values)?;
        records += 1;
    }

    tracing::debug!(records, width, "decoded hex matrix");
    ByteMatrix::from_flat(records, width, values)
}

// Appends the bytes of one even-length line to `out`
fn decode_line(line: &str, line_number: usize, out: &mut Vec<u8>) -> Result<()> {
    if let Some((offset, character)) = line.char_indices().find(|(_, c)| !c.is_ascii_hexdigit()) {
        let position = line
            .get(..offset)
            .map_or(offset, |prefix| prefix.chars().count())
            + 1;
        return Err(AnalysisError::MalformedInput {
            line: line_number,
            reason: MalformedReason::NonHexCharacter {
                position,
                character,
            },
        });
    }

    for pair in line.as_bytes().chunks_exact(2) {
        if let [high, low] = pair {
            out.push((nibble(*high) << 4) | nibble(*low));
        }
    }
    Ok(())
}

// Callers guarantee `digit` is an ASCII hex digit
const fn nibble(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}
