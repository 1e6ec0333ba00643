// byte size, timestamp and html formatting utilities

use chrono::{DateTime, Utc};

const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
const THRESHOLD: u64 = 1024;

/// default number of decimal digits shown by [`format_bytes`]
pub const DEFAULT_PRECISION: u32 = 2;

// f64 carries about 15 significant decimal digits
const MAX_PRECISION: u32 = 15;

/// format a byte count in human-readable form (e.g. "1.5 KB")
///
/// the value is scaled by the largest power of 1024 not exceeding it, capped
/// at terabytes, then rounded half away from zero to `precision` decimals.
/// trailing zeros are dropped, so 1024 renders as "1 KB".
pub fn format_bytes(bytes: u64, precision: u32) -> String {
    let mut power = 0;
    let mut scale = 1u64;
    while power < UNITS.len() - 1 && bytes / scale >= THRESHOLD {
        scale *= THRESHOLD;
        power += 1;
    }

    let factor = 10f64.powi(precision.min(MAX_PRECISION) as i32);
    let value = (bytes as f64 / scale as f64 * factor).round() / factor;

    format!("{} {}", value, UNITS[power])
}

/// format a timestamp for display in listings
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// escape html special characters
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
