use anyhow::Result;
use std::io::Write;

use crate::models::RecordSet;

/// Dialogue text only, one line per dialogue entry in sequence order. With
/// several files each block gets a `== source ==` header.
pub fn write_text(sets: &[RecordSet], out: &mut dyn Write) -> Result<()> {
    let headed = sets.len() > 1;
    for (i, set) in sets.iter().enumerate() {
        if headed {
            if i > 0 {
                writeln!(out)?;
            }
            writeln!(out, "== {} ==", set.source())?;
        }
        for entry in set.dialogue() {
            writeln!(out, "{}", entry.text)?;
        }
    }
    Ok(())
}
