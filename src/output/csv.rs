use anyhow::Result;
use std::io::Write;

use crate::models::RecordSet;

pub const HEADER: &str =
    "source,sequence_index,line_number,start_frame,end_frame,duration_frames,chars,is_pause,text";

/// Timing table: one row per entry, frames only.
pub fn write_csv(sets: &[RecordSet], out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{HEADER}")?;
    for set in sets {
        let source = quote(set.source());
        for e in set.entries() {
            writeln!(
                out,
                "{source},{},{},{},{},{},{},{},{}",
                e.sequence_index,
                e.line_number,
                e.start_frame,
                e.end_frame,
                e.duration_frames(),
                e.char_count(),
                e.is_pause(),
                quote(&e.text),
            )?;
        }
    }
    Ok(())
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
