use proptest::prelude::*;

use cinetime::ingest::parse_records;
use cinetime::timing::frames_to_seconds;

// Text without line breaks; commas allowed.
fn text_field() -> impl Strategy<Value = String> {
    "[^\r\n]{0,40}"
}

proptest! {
    #[test]
    fn valid_lines_round_trip(start in -5i64..100_000, end in -5i64..100_000, text in text_field()) {
        let line = format!("{start},{end},{text}\n");
        let parsed = parse_records(&line);

        prop_assert!(parsed.errors.is_empty());
        prop_assert_eq!(parsed.entries.len(), 1);
        let e = &parsed.entries[0];
        prop_assert_eq!(e.start_frame, start);
        prop_assert_eq!(e.end_frame, end);
        prop_assert_eq!(&e.text, &text);
        prop_assert_eq!(e.is_pause(), start == -1 && end == -1);
    }

    #[test]
    fn dialogue_duration_is_end_minus_start(start in 0i64..100_000, end in 0i64..100_000) {
        let parsed = parse_records(&format!("{start},{end},台詞"));
        let e = &parsed.entries[0];
        prop_assert_eq!(e.duration_frames(), end - start);
        prop_assert_eq!(e.is_anomalous(), end < start);
    }

    #[test]
    fn sequence_indices_stay_contiguous(lines in prop::collection::vec(prop_oneof![
        (0i64..1000, 0i64..1000).prop_map(|(s, e)| format!("{s},{e},ok")),
        Just("garbage".to_string()),
        Just("x,1,bad".to_string()),
        Just(String::new()),
    ], 0..30)) {
        let parsed = parse_records(&lines.join("\n"));
        for (i, e) in parsed.entries.iter().enumerate() {
            prop_assert_eq!(e.sequence_index, i + 1);
        }
        let valid = lines.iter().filter(|l| l.ends_with(",ok")).count();
        let invalid = lines.iter().filter(|l| !l.is_empty() && !l.ends_with(",ok")).count();
        prop_assert_eq!(parsed.entries.len(), valid);
        prop_assert_eq!(parsed.errors.len(), invalid);
    }

    #[test]
    fn seconds_are_monotonic_and_never_negative(a in -1000i64..100_000, b in -1000i64..100_000) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(frames_to_seconds(lo as f64) <= frames_to_seconds(hi as f64));
        prop_assert!(frames_to_seconds(lo as f64) >= 0.0);
    }
}
