use tracing::debug;

use crate::analysis::patterns::CharThresholds;
use crate::error::{MalformedKind, MalformedRecordError};
use crate::models::{Entry, RecordSet};

/// Entries and rejected lines from one file's content, in line order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedRecords {
    pub entries: Vec<Entry>,
    pub errors: Vec<MalformedRecordError>,
}

/// Parse `start,end,text` lines.
///
/// Only the first two commas separate fields; everything after the second is
/// the text, verbatim. Blank lines are skipped. A malformed line is recorded
/// in `errors` and does not consume a sequence index, so valid entries stay
/// numbered 1..=n.
pub fn parse_records(content: &str) -> ParsedRecords {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut parsed = ParsedRecords::default();

    for (i, raw) in content.split('\n').enumerate() {
        let line_number = i + 1;
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(line) {
            Ok((start_frame, end_frame, text)) => {
                parsed.entries.push(Entry {
                    sequence_index: parsed.entries.len() + 1,
                    line_number,
                    start_frame,
                    end_frame,
                    text: text.to_string(),
                });
            }
            Err(kind) => {
                debug!("Skipping malformed line {line_number}: {kind}");
                parsed.errors.push(MalformedRecordError {
                    line_number,
                    raw: line.to_string(),
                    kind,
                });
            }
        }
    }

    parsed
}

/// Parse file content straight into a RecordSet with computed statistics.
pub fn parse_record_set(source: &str, content: &str, thresholds: &CharThresholds) -> RecordSet {
    let ParsedRecords { entries, errors } = parse_records(content);
    RecordSet::new(source, entries, errors, thresholds)
}

fn parse_line(line: &str) -> Result<(i64, i64, &str), MalformedKind> {
    let mut parts = line.splitn(3, ',');
    let (Some(start), Some(end), Some(text)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(MalformedKind::MissingFields);
    };

    let start_frame = start
        .trim()
        .parse::<i64>()
        .map_err(|_| MalformedKind::InvalidStart(start.to_string()))?;
    let end_frame = end
        .trim()
        .parse::<i64>()
        .map_err(|_| MalformedKind::InvalidEnd(end.to_string()))?;

    Ok((start_frame, end_frame, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE: &str = "542,596,マジでヤル気なのかよ？\n639,703,雄介… お前ビビッてんのか？\n-1,-1,……\n";

    #[test]
    fn parses_a_scene() {
        let parsed = parse_records(SCENE);

        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.entries.len(), 3);

        let first = &parsed.entries[0];
        assert_eq!(first.sequence_index, 1);
        assert_eq!(first.start_frame, 542);
        assert_eq!(first.end_frame, 596);
        assert_eq!(first.text, "マジでヤル気なのかよ？");
        assert_eq!(first.duration_frames(), 54);
        assert!((first.duration_seconds() - 1.8).abs() < 1e-9);

        assert_eq!(parsed.entries[1].duration_frames(), 64);
        assert!(parsed.entries[2].is_pause());
        assert_eq!(parsed.entries[2].duration_frames(), 0);
    }

    #[test]
    fn text_keeps_extra_commas_and_spacing() {
        let parsed = parse_records("10,40,  えっ、それは,まさか ,\n");
        let e = &parsed.entries[0];
        assert_eq!(e.text, "  えっ、それは,まさか ,");
    }

    #[test]
    fn crlf_and_bom_are_stripped() {
        let parsed = parse_records("\u{feff}1,31,一\r\n31,61,二\r\n");
        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.entries[0].start_frame, 1);
        assert_eq!(parsed.entries[0].text, "一");
        assert_eq!(parsed.entries[1].text, "二");
    }

    #[test]
    fn blank_lines_are_skipped_silently() {
        let parsed = parse_records("\n1,2,a\n   \n\n3,4,b\n");
        assert_eq!(parsed.entries.len(), 2);
        assert!(parsed.errors.is_empty());
        assert_eq!(parsed.entries[1].line_number, 5);
        assert_eq!(parsed.entries[1].sequence_index, 2);
    }

    #[test]
    fn pause_is_decided_by_frames_only() {
        let parsed = parse_records("-1,-1,会話\n0,20,……\n-1,5,x\n");
        assert!(parsed.entries[0].is_pause());
        assert!(!parsed.entries[1].is_pause());
        assert!(!parsed.entries[2].is_pause());
        assert!(parsed.entries[2].is_anomalous());
    }

    #[test]
    fn malformed_lines_are_recorded_and_do_not_take_an_index() {
        let parsed = parse_records("1,2,ok\nabc,2,bad\n3,x,bad\nno commas\n4,5\n6,7,fine\n");

        assert_eq!(parsed.entries.len(), 2);
        assert_eq!(parsed.entries[1].sequence_index, 2);
        assert_eq!(parsed.entries[1].line_number, 6);

        let kinds: Vec<_> = parsed.errors.iter().map(|e| (e.line_number, e.kind.clone())).collect();
        assert_eq!(
            kinds,
            vec![
                (2, MalformedKind::InvalidStart("abc".to_string())),
                (3, MalformedKind::InvalidEnd("x".to_string())),
                (4, MalformedKind::MissingFields),
                (5, MalformedKind::MissingFields),
            ]
        );
        assert_eq!(parsed.errors[0].raw, "abc,2,bad");
    }

    #[test]
    fn one_bad_line_among_ten() {
        let mut content = String::new();
        for i in 0..10 {
            if i == 4 {
                content.push_str("oops,1,broken\n");
            } else {
                content.push_str(&format!("{},{},line {i}\n", i * 30, i * 30 + 20));
            }
        }
        let parsed = parse_records(&content);
        assert_eq!(parsed.entries.len(), 9);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].line_number, 5);
        let indices: Vec<_> = parsed.entries.iter().map(|e| e.sequence_index).collect();
        assert_eq!(indices, (1..=9).collect::<Vec<_>>());
    }

    #[test]
    fn empty_text_field_is_allowed() {
        let parsed = parse_records("0,15,\n");
        assert_eq!(parsed.entries.len(), 1);
        assert_eq!(parsed.entries[0].text, "");
    }

    #[test]
    fn maximal_frame_values_do_not_overflow_statistics() {
        let set = parse_record_set(
            "x.csv",
            "0,9223372036854775807,x\n0,9223372036854775807,x\n",
            &CharThresholds::default(),
        );
        assert_eq!(set.entries().len(), 2);
        assert_eq!(set.statistics().total_duration_frames, i64::MAX);
    }

    #[test]
    fn parsing_is_idempotent() {
        let t = CharThresholds::default();
        assert_eq!(
            parse_record_set("ca01_01.csv", SCENE, &t),
            parse_record_set("ca01_01.csv", SCENE, &t)
        );
    }

    #[test]
    fn record_set_carries_statistics() {
        let set = parse_record_set("ca01_01.csv", SCENE, &CharThresholds::default());
        let stats = set.statistics();
        assert_eq!(set.source(), "ca01_01.csv");
        assert_eq!(stats.total_lines, 3);
        assert_eq!(stats.dialogue_lines, 2);
        assert_eq!(stats.pause_lines, 1);
        assert_eq!(stats.total_duration_frames, 118);
        assert!((stats.total_duration_seconds - 3.9333).abs() < 1e-3);
        assert_eq!(set.entry(2).map(|e| e.start_frame), Some(639));
        assert!(set.entry(0).is_none());
        assert!(set.entry(4).is_none());
    }
}
