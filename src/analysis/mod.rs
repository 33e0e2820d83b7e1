pub mod patterns;

use crate::models::{Entry, PatternCounts, Statistics};
use crate::timing::frames_to_seconds;

use patterns::{is_very_slow, CharThresholds, DurationBand, LengthBand};

impl Statistics {
    /// Aggregate a sequence of entries. Pure: the same entries always give the
    /// same result. Averages and extremes are 0 when there is no dialogue.
    pub fn compute(entries: &[Entry], thresholds: &CharThresholds) -> Self {
        let mut stats = Statistics {
            total_lines: entries.len(),
            ..Statistics::default()
        };

        let mut max_duration: Option<i64> = None;
        let mut min_duration: Option<i64> = None;
        let mut max_chars: Option<usize> = None;
        let mut min_chars: Option<usize> = None;

        for entry in entries {
            if entry.is_pause() {
                stats.pause_lines += 1;
                continue;
            }

            stats.dialogue_lines += 1;
            if entry.is_anomalous() {
                stats.anomalous_lines += 1;
            }

            let chars = entry.char_count();
            let duration = entry.duration_frames();
            stats.total_chars += chars;
            stats.total_duration_frames = stats.total_duration_frames.saturating_add(duration);

            max_duration = Some(max_duration.map_or(duration, |m| m.max(duration)));
            min_duration = Some(min_duration.map_or(duration, |m| m.min(duration)));
            max_chars = Some(max_chars.map_or(chars, |m| m.max(chars)));
            min_chars = Some(min_chars.map_or(chars, |m| m.min(chars)));

            count_patterns(&mut stats.patterns, duration, chars, thresholds);
        }

        if stats.dialogue_lines > 0 {
            let n = stats.dialogue_lines as f64;
            stats.avg_chars = stats.total_chars as f64 / n;
            stats.avg_duration_frames = stats.total_duration_frames as f64 / n;
        }
        stats.total_duration_seconds = frames_to_seconds(stats.total_duration_frames as f64);
        stats.avg_duration_seconds = frames_to_seconds(stats.avg_duration_frames);
        stats.max_duration_frames = max_duration.unwrap_or(0);
        stats.min_duration_frames = min_duration.unwrap_or(0);
        stats.max_chars = max_chars.unwrap_or(0);
        stats.min_chars = min_chars.unwrap_or(0);

        stats
    }
}

fn count_patterns(
    counts: &mut PatternCounts,
    duration: i64,
    chars: usize,
    thresholds: &CharThresholds,
) {
    match DurationBand::classify(duration) {
        Some(DurationBand::Fast) => counts.fast += 1,
        Some(DurationBand::Normal) => counts.normal += 1,
        Some(DurationBand::Slow) => counts.slow += 1,
        None => {}
    }
    if is_very_slow(duration) {
        counts.very_slow += 1;
    }
    match LengthBand::classify(chars, thresholds) {
        Some(LengthBand::Short) => counts.short += 1,
        Some(LengthBand::Long) => counts.long += 1,
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(seq: usize, start: i64, end: i64, text: &str) -> Entry {
        Entry {
            sequence_index: seq,
            line_number: seq,
            start_frame: start,
            end_frame: end,
            text: text.to_string(),
        }
    }

    fn scene() -> Vec<Entry> {
        vec![
            entry(1, 542, 596, "マジでヤル気なのかよ？"),
            entry(2, 639, 703, "雄介… お前ビビッてんのか？"),
            entry(3, -1, -1, "……"),
        ]
    }

    #[test]
    fn counts_and_durations_for_a_scene() {
        let stats = Statistics::compute(&scene(), &CharThresholds::default());

        assert_eq!(stats.total_lines, 3);
        assert_eq!(stats.dialogue_lines, 2);
        assert_eq!(stats.pause_lines, 1);
        assert_eq!(stats.total_duration_frames, 118);
        assert!((stats.total_duration_seconds - 118.0 / 30.0).abs() < 1e-9);
        assert!((stats.avg_duration_frames - 59.0).abs() < 1e-9);
        assert!((stats.avg_duration_seconds - 59.0 / 30.0).abs() < 1e-9);
        assert_eq!(stats.max_duration_frames, 64);
        assert_eq!(stats.min_duration_frames, 54);
        assert_eq!(stats.anomalous_lines, 0);
    }

    #[test]
    fn chars_are_counted_not_bytes_and_exclude_pauses() {
        let stats = Statistics::compute(&scene(), &CharThresholds::default());

        // 11 + 14 characters; the pause text is ignored.
        assert_eq!(stats.total_chars, 25);
        assert!((stats.avg_chars - 12.5).abs() < 1e-9);
        assert_eq!(stats.max_chars, 14);
        assert_eq!(stats.min_chars, 11);
    }

    #[test]
    fn no_dialogue_degrades_to_zero() {
        let pauses = vec![entry(1, -1, -1, "……"), entry(2, -1, -1, "")];
        let stats = Statistics::compute(&pauses, &CharThresholds::default());

        assert_eq!(stats.total_lines, 2);
        assert_eq!(stats.dialogue_lines, 0);
        assert_eq!(stats.avg_chars, 0.0);
        assert_eq!(stats.avg_duration_frames, 0.0);
        assert_eq!(stats.avg_duration_seconds, 0.0);
        assert_eq!(stats.max_duration_frames, 0);
        assert_eq!(stats.min_duration_frames, 0);

        let empty = Statistics::compute(&[], &CharThresholds::default());
        assert_eq!(empty, Statistics::default());
    }

    #[test]
    fn pattern_buckets_by_duration() {
        let entries = vec![
            entry(1, 0, 10, "速い"),
            entry(2, 100, 195, "遅い"),
            entry(3, 200, 245, "普通"),
        ];
        let p = Statistics::compute(&entries, &CharThresholds::default()).patterns;

        assert_eq!(p.fast, 1);
        assert_eq!(p.normal, 1);
        assert_eq!(p.slow, 1);
        assert_eq!(p.very_slow, 1);
    }

    #[test]
    fn pattern_buckets_by_length() {
        let entries = vec![
            entry(1, 0, 30, "はい"),
            entry(2, 30, 60, "これは二十文字を超える長い台詞になるはずですよね本当に"),
            entry(3, 60, 90, "ちょうど中くらい"),
        ];
        let p = Statistics::compute(&entries, &CharThresholds::default()).patterns;
        assert_eq!(p.short, 1);
        assert_eq!(p.long, 1);
    }

    #[test]
    fn negative_durations_are_flagged_and_never_negative_seconds() {
        let entries = vec![entry(1, 100, 40, "逆"), entry(2, -1, 20, "片方")];
        let stats = Statistics::compute(&entries, &CharThresholds::default());

        assert_eq!(stats.dialogue_lines, 2);
        assert_eq!(stats.anomalous_lines, 2);
        assert_eq!(stats.total_duration_frames, -60);
        assert_eq!(stats.total_duration_seconds, 0.0);
        assert_eq!(stats.min_duration_frames, -60);
    }

    #[test]
    fn huge_frame_values_saturate_the_total() {
        let entries = vec![
            entry(1, 0, i64::MAX, "a"),
            entry(2, 0, i64::MAX, "b"),
        ];
        let stats = Statistics::compute(&entries, &CharThresholds::default());

        assert_eq!(stats.dialogue_lines, 2);
        assert_eq!(stats.total_duration_frames, i64::MAX);
        assert_eq!(stats.max_duration_frames, i64::MAX);
        assert!(stats.total_duration_seconds > 0.0);
    }

    #[test]
    fn compute_is_deterministic() {
        let entries = scene();
        let t = CharThresholds::default();
        assert_eq!(Statistics::compute(&entries, &t), Statistics::compute(&entries, &t));
    }
}
