use std::time::Duration;

/// `MM:SS`, zero padded. Minutes are not wrapped at an hour.
pub fn format_mmss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Whole seconds elapsed, rounded down.
pub fn elapsed_secs(elapsed: Duration) -> u64 {
    elapsed.as_secs()
}

/// Whole seconds left, rounded up so the display only reads `00:00` once
/// the countdown has actually finished.
pub fn remaining_secs(elapsed: Duration, total: Duration) -> u64 {
    let left = total.saturating_sub(elapsed);
    let secs = left.as_secs();
    if left.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}
