use serde::{Deserialize, Serialize};

use crate::models::Entry;

/// Below this many frames (0.5s) a line is fast.
pub const FAST_BELOW_FRAMES: i64 = 15;
/// Up to and including this many frames (2.0s) a line is normal.
pub const NORMAL_MAX_FRAMES: i64 = 60;
/// Above this many frames (3.0s) a slow line is also very slow.
pub const VERY_SLOW_ABOVE_FRAMES: i64 = 90;

pub const DEFAULT_SHORT_MAX_CHARS: usize = 5;
pub const DEFAULT_LONG_MIN_CHARS: usize = 20;

/// Duration band of a dialogue line. Zero and negative durations fall in none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationBand {
    Fast,
    Normal,
    Slow,
}

impl DurationBand {
    pub fn classify(duration_frames: i64) -> Option<Self> {
        match duration_frames {
            d if d <= 0 => None,
            d if d < FAST_BELOW_FRAMES => Some(DurationBand::Fast),
            d if d <= NORMAL_MAX_FRAMES => Some(DurationBand::Normal),
            _ => Some(DurationBand::Slow),
        }
    }
}

pub fn is_very_slow(duration_frames: i64) -> bool {
    duration_frames > VERY_SLOW_ABOVE_FRAMES
}

/// Character-length cut-offs for short/long dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharThresholds {
    /// `chars <= short_max_chars` is short.
    pub short_max_chars: usize,
    /// `chars > long_min_chars` is long.
    pub long_min_chars: usize,
}

impl Default for CharThresholds {
    fn default() -> Self {
        CharThresholds {
            short_max_chars: DEFAULT_SHORT_MAX_CHARS,
            long_min_chars: DEFAULT_LONG_MIN_CHARS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthBand {
    Short,
    Long,
}

impl LengthBand {
    pub fn classify(chars: usize, thresholds: &CharThresholds) -> Option<Self> {
        if chars <= thresholds.short_max_chars {
            Some(LengthBand::Short)
        } else if chars > thresholds.long_min_chars {
            Some(LengthBand::Long)
        } else {
            None
        }
    }
}

/// Standout dialogue entries of a RecordSet, used by reports.
#[derive(Debug, Clone, Default)]
pub struct Highlights<'a> {
    pub fastest: Option<&'a Entry>,
    pub slowest: Option<&'a Entry>,
    pub longest: Option<&'a Entry>,
    pub shortest: Option<&'a Entry>,
    pub fast: Vec<&'a Entry>,
    pub slow: Vec<&'a Entry>,
    pub very_slow: Vec<&'a Entry>,
    pub short: Vec<&'a Entry>,
    pub long: Vec<&'a Entry>,
}

impl<'a> Highlights<'a> {
    /// Ties resolve to the earliest entry. At most `sample_size` entries are
    /// kept per flagged bucket.
    pub fn collect(entries: &'a [Entry], thresholds: &CharThresholds, sample_size: usize) -> Self {
        let mut h = Highlights::default();

        for entry in entries.iter().filter(|e| !e.is_pause()) {
            let duration = entry.duration_frames();
            let chars = entry.char_count();

            if !entry.is_anomalous() {
                if h.fastest.map_or(true, |f| duration < f.duration_frames()) {
                    h.fastest = Some(entry);
                }
                if h.slowest.map_or(true, |s| duration > s.duration_frames()) {
                    h.slowest = Some(entry);
                }
            }
            if h.longest.map_or(true, |l| chars > l.char_count()) {
                h.longest = Some(entry);
            }
            if h.shortest.map_or(true, |s| chars < s.char_count()) {
                h.shortest = Some(entry);
            }

            let bucket = match DurationBand::classify(duration) {
                Some(DurationBand::Fast) => Some(&mut h.fast),
                Some(DurationBand::Slow) => Some(&mut h.slow),
                _ => None,
            };
            if let Some(bucket) = bucket {
                push_sample(bucket, entry, sample_size);
            }
            if is_very_slow(duration) {
                push_sample(&mut h.very_slow, entry, sample_size);
            }
            match LengthBand::classify(chars, thresholds) {
                Some(LengthBand::Short) => push_sample(&mut h.short, entry, sample_size),
                Some(LengthBand::Long) => push_sample(&mut h.long, entry, sample_size),
                None => {}
            }
        }

        h
    }
}

fn push_sample<'a>(bucket: &mut Vec<&'a Entry>, entry: &'a Entry, limit: usize) {
    if bucket.len() < limit {
        bucket.push(entry);
    }
}
