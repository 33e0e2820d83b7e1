use anyhow::Result;
use std::io::Write;

use crate::analysis::patterns::{
    CharThresholds, Highlights, FAST_BELOW_FRAMES, NORMAL_MAX_FRAMES, VERY_SLOW_ABOVE_FRAMES,
};
use crate::models::{Entry, RecordSet};
use crate::session::Batch;
use crate::timing::{format_frames, FPS};

/// Markdown report: summary, then per-file statistics, patterns and flagged
/// entries.
pub fn write_report(
    batch: &Batch,
    thresholds: &CharThresholds,
    sample_size: usize,
    out: &mut dyn Write,
) -> Result<()> {
    let summary = batch.summary();

    writeln!(out, "# Cutscene Timing Report\n")?;
    writeln!(
        out,
        "**Generated:** {}  ",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out, "**Files:** {}  ", summary.files)?;
    if summary.failed_files > 0 {
        writeln!(out, "**Failed:** {}  ", summary.failed_files)?;
    }
    writeln!(
        out,
        "**Dialogue:** {} lines, {} pauses, {} malformed  ",
        summary.dialogue_lines, summary.pause_lines, summary.malformed_lines
    )?;
    writeln!(
        out,
        "**Total duration:** {} frames ({:.2}s)\n",
        summary.total_duration_frames, summary.total_duration_seconds
    )?;

    for failure in batch.failures() {
        writeln!(out, "- ⚠ {failure}")?;
    }
    if !batch.failures().is_empty() {
        writeln!(out)?;
    }

    for set in batch.record_sets() {
        write_file_section(set, thresholds, sample_size, out)?;
    }
    Ok(())
}

fn write_file_section(
    set: &RecordSet,
    thresholds: &CharThresholds,
    sample_size: usize,
    out: &mut dyn Write,
) -> Result<()> {
    let stats = set.statistics();
    let p = &stats.patterns;

    writeln!(out, "## {}\n", set.source())?;

    writeln!(out, "### Statistics\n")?;
    writeln!(out, "- **Total entries:** {}", stats.total_lines)?;
    writeln!(out, "- **Dialogue lines:** {}", stats.dialogue_lines)?;
    writeln!(out, "- **Pauses:** {}", stats.pause_lines)?;
    writeln!(out, "- **Characters:** {} (avg {:.1})", stats.total_chars, stats.avg_chars)?;
    writeln!(
        out,
        "- **Longest / shortest line:** {} / {} characters",
        stats.max_chars, stats.min_chars
    )?;
    writeln!(
        out,
        "- **Total duration:** {} frames ({:.2}s)",
        stats.total_duration_frames, stats.total_duration_seconds
    )?;
    writeln!(
        out,
        "- **Average duration:** {:.1} frames ({:.3}s)",
        stats.avg_duration_frames, stats.avg_duration_seconds
    )?;
    writeln!(
        out,
        "- **Longest / shortest timing:** {} / {}",
        format_frames(stats.max_duration_frames),
        format_frames(stats.min_duration_frames)
    )?;
    if stats.anomalous_lines > 0 {
        writeln!(out, "- **Anomalous timings:** {}", stats.anomalous_lines)?;
    }
    if !set.errors().is_empty() {
        let lines: Vec<String> = set.errors().iter().map(|e| e.line_number.to_string()).collect();
        writeln!(
            out,
            "- **Malformed lines:** {} (line {})",
            set.errors().len(),
            lines.join(", ")
        )?;
    }
    writeln!(out)?;

    writeln!(out, "### Patterns ({FPS} fps)\n")?;
    writeln!(out, "| Pattern | Rule | Lines |")?;
    writeln!(out, "|---|---|---|")?;
    writeln!(out, "| Fast | < {FAST_BELOW_FRAMES} frames | {} |", p.fast)?;
    writeln!(
        out,
        "| Normal | {FAST_BELOW_FRAMES}–{NORMAL_MAX_FRAMES} frames | {} |",
        p.normal
    )?;
    writeln!(out, "| Slow | > {NORMAL_MAX_FRAMES} frames | {} |", p.slow)?;
    writeln!(out, "| Very slow | > {VERY_SLOW_ABOVE_FRAMES} frames | {} |", p.very_slow)?;
    writeln!(out, "| Short | ≤ {} chars | {} |", thresholds.short_max_chars, p.short)?;
    writeln!(out, "| Long | > {} chars | {} |", thresholds.long_min_chars, p.long)?;
    writeln!(out)?;

    let h = Highlights::collect(set.entries(), thresholds, sample_size);
    if h.longest.is_none() {
        writeln!(out, "_No dialogue._\n")?;
        return Ok(());
    }

    writeln!(out, "### Highlights\n")?;
    write_highlight(out, "Fastest", h.fastest)?;
    write_highlight(out, "Slowest", h.slowest)?;
    write_highlight(out, "Longest", h.longest)?;
    write_highlight(out, "Shortest", h.shortest)?;
    writeln!(out)?;

    for (title, entries) in [
        ("Fast lines", &h.fast),
        ("Slow lines", &h.slow),
        ("Very slow lines", &h.very_slow),
        ("Short lines", &h.short),
        ("Long lines", &h.long),
    ] {
        if entries.is_empty() {
            continue;
        }
        writeln!(out, "#### {title}\n")?;
        for e in entries {
            writeln!(out, "- {}", describe(e))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn write_highlight(out: &mut dyn Write, label: &str, entry: Option<&Entry>) -> Result<()> {
    if let Some(e) = entry {
        writeln!(out, "- **{label}:** {}", describe(e))?;
    }
    Ok(())
}

fn describe(e: &Entry) -> String {
    format!(
        "[{}] {} _({}, {} chars)_",
        e.sequence_index,
        e.text,
        format_frames(e.duration_frames()),
        e.char_count()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::parse_record_set;

    fn render(content: &str) -> String {
        let t = CharThresholds::default();
        let batch = Batch::new(vec![parse_record_set("ca01_01.csv", content, &t)], Vec::new());
        let mut buf = Vec::new();
        write_report(&batch, &t, 5, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn report_lists_statistics_and_highlights() {
        let report = render(
            "542,596,マジでヤル気なのかよ？\n639,703,雄介… お前ビビッてんのか？\n-1,-1,……\n0,10,え？\n100,195,ゆっくりと話す\nbad\n",
        );

        assert!(report.contains("## ca01_01.csv"));
        assert!(report.contains("- **Dialogue lines:** 4"));
        assert!(report.contains("- **Pauses:** 1"));
        assert!(report.contains("| Fast | < 15 frames | 1 |"));
        assert!(report.contains("| Very slow | > 90 frames | 1 |"));
        assert!(report.contains("- **Fastest:** [4] え？"));
        assert!(report.contains("- **Slowest:** [5] ゆっくりと話す"));
        assert!(report.contains("- **Malformed lines:** 1 (line 6)"));
        assert!(report.contains("#### Very slow lines"));
    }

    #[test]
    fn anomalous_only_file_still_lists_highlights() {
        let report = render("-1,40,片方だけ\n100,40,逆向き\n");
        assert!(report.contains("### Highlights"));
        assert!(!report.contains("**Fastest:**"));
        assert!(report.contains("- **Anomalous timings:** 2"));
    }

    #[test]
    fn report_without_dialogue_says_so() {
        let report = render("-1,-1,……\n");
        assert!(report.contains("_No dialogue._"));
        assert!(!report.contains("### Highlights"));
    }
}
