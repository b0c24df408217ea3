//! Clock helpers for wall time and log timestamp rendering.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in milliseconds since the Unix epoch.
#[must_use]
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Render a millisecond clock reading as a zero-padded `HH:MM:SS.mmm`
/// timestamp on a 24-hour dial.
///
/// The reading is interpreted as an offset, so engine-clock values work the
/// same as wall-clock milliseconds-since-midnight.
#[must_use]
pub fn format_clock_ms(at_ms: u64) -> String {
    let millis = at_ms % 1_000;
    let seconds = (at_ms / 1_000) % 60;
    let minutes = (at_ms / 60_000) % 60;
    let hours = (at_ms / 3_600_000) % 24;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}
