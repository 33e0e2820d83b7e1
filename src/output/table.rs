use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

use crate::analysis::patterns::CharThresholds;
use crate::error::FileReadError;
use crate::models::*;
use crate::timing::format_frames;

/// Format duration in seconds to human-readable string.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    if h > 0 {
        format!("{h}h{m:02}m")
    } else if m > 0 {
        format!("{m}m{s:02}s")
    } else {
        format!("{:.2}s", seconds.max(0.0))
    }
}

/// Truncate a string to fit within max_width (respecting unicode width).
pub fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + cw + 3 > max_width {
            result.push_str("...");
            break;
        }
        result.push(ch);
        width += cw;
    }
    result
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Print discovered record files for `cinetime scan`.
pub fn print_file_list(files: &[PathBuf]) {
    if files.is_empty() {
        println!("No record files found.");
        return;
    }
    println!("{} record file{}:\n", files.len(), plural(files.len()));
    for f in files {
        println!("  {}", f.display());
    }
}

/// Print one file's statistics for `cinetime analyze`.
pub fn print_statistics(set: &RecordSet, thresholds: &CharThresholds) {
    let stats = set.statistics();
    let p = &stats.patterns;

    println!("{}", set.source());
    println!("  Entries:   {} ({} dialogue, {} pause{})", stats.total_lines, stats.dialogue_lines, stats.pause_lines, plural(stats.pause_lines));
    println!(
        "  Duration:  {} frames ({})",
        stats.total_duration_frames,
        format_duration(stats.total_duration_seconds)
    );
    println!(
        "  Average:   {:.1} frames ({:.3}s)",
        stats.avg_duration_frames, stats.avg_duration_seconds
    );
    println!(
        "  Range:     {} .. {}",
        format_frames(stats.min_duration_frames),
        format_frames(stats.max_duration_frames)
    );
    println!(
        "  Chars:     {} (avg {:.1}, {}..{})",
        stats.total_chars, stats.avg_chars, stats.min_chars, stats.max_chars
    );
    println!(
        "  Timing:    {} fast, {} normal, {} slow ({} very slow)",
        p.fast, p.normal, p.slow, p.very_slow
    );
    println!(
        "  Length:    {} short (<={}), {} long (>{})",
        p.short, thresholds.short_max_chars, p.long, thresholds.long_min_chars
    );
    if stats.anomalous_lines > 0 {
        println!("  Anomalous: {}", stats.anomalous_lines);
    }
    if !set.errors().is_empty() {
        println!("  Malformed: {} line{}", set.errors().len(), plural(set.errors().len()));
        for e in set.errors() {
            println!("    {}", truncate(&e.to_string(), 72));
        }
    }
    println!();
}

/// Print the per-entry timing table for `cinetime show`.
pub fn print_entries(set: &RecordSet, dialogue_only: bool) {
    let rows: Vec<&Entry> = set
        .entries()
        .iter()
        .filter(|e| !(dialogue_only && e.is_pause()))
        .collect();

    if rows.is_empty() {
        println!("No entries found.");
        return;
    }

    println!("{} ({} entr{}):\n", set.source(), rows.len(), if rows.len() == 1 { "y" } else { "ies" });
    println!(
        "  {:>4} {:>8} {:>8} {:>8}  {}",
        "#", "START", "END", "FRAMES", "TEXT"
    );
    println!("  {}", "-".repeat(76));

    for e in rows {
        if e.is_pause() {
            println!("  {:>4} {:>8} {:>8} {:>8}  {}", e.sequence_index, "PAUSE", "PAUSE", 0, "...");
        } else {
            let flag = if e.is_anomalous() { " !" } else { "" };
            println!(
                "  {:>4} {:>8} {:>8} {:>8}  {}{flag}",
                e.sequence_index,
                e.start_frame,
                e.end_frame,
                e.duration_frames(),
                truncate(&e.text, 50),
            );
        }
    }
    println!();
}

/// Print batch totals after `cinetime analyze`.
pub fn print_summary(summary: &BatchSummary) {
    println!("Summary:");
    println!("  Files:      {}", summary.files);
    if summary.failed_files > 0 {
        println!("  Failed:     {}", summary.failed_files);
    }
    if summary.empty_files > 0 {
        println!("  Empty:      {}", summary.empty_files);
    }
    println!("  Entries:    {}", summary.total_lines);
    println!("  Dialogue:   {}", summary.dialogue_lines);
    println!("  Pauses:     {}", summary.pause_lines);
    println!("  Malformed:  {}", summary.malformed_lines);
    println!("  Characters: {}", summary.total_chars);
    println!(
        "  Duration:   {} frames ({})",
        summary.total_duration_frames,
        format_duration(summary.total_duration_seconds)
    );
}

pub fn print_failures(failures: &[FileReadError]) {
    for f in failures {
        eprintln!("error: {f}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_read_naturally() {
        assert_eq!(format_duration(3.9333), "3.93s");
        assert_eq!(format_duration(75.0), "1m15s");
        assert_eq!(format_duration(3725.0), "1h02m");
        assert_eq!(format_duration(-1.0), "0.00s");
    }

    #[test]
    fn truncate_counts_display_width() {
        assert_eq!(truncate("short", 10), "short");
        // Each kana is two columns wide.
        assert_eq!(truncate("マジでヤル気なのかよ", 10), "マジで...");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }
}
