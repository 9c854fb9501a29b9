//! Text codec
//!
//! Human-editable `id;key` lines. No checksum: lines that do not parse are
//! dropped and the high-water mark is recovered as the largest id seen.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::dictionary::key_problem;
use crate::error::Result;
use crate::id::Id;

use super::Records;

/// Separates the id from the key on a line
pub const FIELD_SEPARATOR: char = ';';

/// Starts a comment line
pub const COMMENT_PREFIX: char = '#';

/// Outcome of parsing one line
#[derive(Debug, PartialEq, Eq)]
pub enum Line<W> {
    Entry(W, String),
    /// Blank or comment
    Ignored,
    Malformed,
}

/// Write `entries` as `id;key` lines behind a one-line header comment
pub fn write<W: Id, Wr: Write>(writer: &mut Wr, entries: &[(W, String)]) -> Result<()> {
    writeln!(
        writer,
        "{} tagdict {}-bit ids, {} entries",
        COMMENT_PREFIX,
        W::BITS,
        entries.len()
    )?;
    for (id, key) in entries {
        writeln!(writer, "{}{}{}", id, FIELD_SEPARATOR, key)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read every line of `reader`, keeping the ones that parse
pub fn read<W: Id, R: BufRead>(reader: R) -> Result<Records<W>> {
    let mut records = Records::new();
    let mut malformed = 0usize;

    for line in reader.lines() {
        match parse_line::<W>(&line?) {
            Line::Entry(id, key) => {
                if id > records.last_id {
                    records.last_id = id;
                }
                records.entries.push((id, key));
            }
            Line::Ignored => {}
            Line::Malformed => malformed += 1,
        }
    }

    debug!(
        entries = records.entries.len(),
        malformed,
        last_id = %records.last_id,
        "parsed text dictionary"
    );
    Ok(records)
}

/// Parse a single line.
///
/// The key is everything after the first `;`, kept verbatim. The id must fit
/// the width and be non-zero, and the key must pass [`crate::validate_key`].
pub fn parse_line<W: Id>(line: &str) -> Line<W> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
        return Line::Ignored;
    }

    let Some((raw_id, key)) = trimmed.split_once(FIELD_SEPARATOR) else {
        return Line::Malformed;
    };
    if key_problem(key).is_some() {
        return Line::Malformed;
    }

    match raw_id.trim().parse::<u64>().ok().and_then(W::from_u64) {
        Some(id) if !id.is_zero() => Line::Entry(id, key.to_owned()),
        _ => Line::Malformed,
    }
}
