//! Helpers for turning untrusted mail data into filesystem names.

use chrono::NaiveDateTime;

/// Directory name format for a message's received time.
pub const DIRECTORY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

const DISPLAY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Removes every character that is not alphanumeric, an underscore,
/// whitespace or a literal dot.
///
/// This is a strict allow-list: hyphens, parentheses and other characters that
/// would be legal on most filesystems are stripped as well.
///
/// - `report (final)-v2.pdf` → `report finalv2.pdf`
/// - `../../etc/passwd` → `....etcpasswd`
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_' || *c == '.')
        .collect()
}

/// Renders a received time as a per-message directory name
/// (`YYYY-MM-DD_HH-MM-SS`).
pub fn directory_timestamp(received: &NaiveDateTime) -> String {
    received.format(DIRECTORY_TIMESTAMP_FORMAT).to_string()
}

/// Renders a received time for issue descriptions and log lines.
pub fn display_timestamp(received: &NaiveDateTime) -> String {
    received.format(DISPLAY_TIMESTAMP_FORMAT).to_string()
}
