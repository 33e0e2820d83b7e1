/// Native frame rate of the game's cutscene timing.
pub const FPS: f64 = 30.0;

/// Convert frames to seconds. Zero or negative counts map to `0.0`.
pub fn frames_to_seconds(frames: f64) -> f64 {
    if frames > 0.0 {
        frames / FPS
    } else {
        0.0
    }
}

/// Convert frames to milliseconds. Zero or negative counts map to `0.0`.
pub fn frames_to_millis(frames: f64) -> f64 {
    frames_to_seconds(frames) * 1000.0
}

/// Human-readable duration: `"54 frames (1.80s)"`, `"10 frames (333ms)"`.
pub fn format_frames(frames: i64) -> String {
    if frames <= 0 {
        return "0 frames".to_string();
    }
    let seconds = frames_to_seconds(frames as f64);
    if seconds < 1.0 {
        format!("{frames} frames ({:.0}ms)", frames_to_millis(frames as f64))
    } else {
        format!("{frames} frames ({seconds:.2}s)")
    }
}
