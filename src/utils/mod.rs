//! Utility functions.
//!
//! Collection of helper functions used across the bot.

pub mod args;
pub mod markup;

pub use args::split_quotes;
pub use markup::{parse_markup, unescape_alert, ButtonAction, ButtonSpec};

use std::time::Duration;

/// Escape special characters for HTML parse mode.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Parse a timespan string (e.g. "30s", "5min", "1hour", "2day").
///
/// Supported units: s, min, hour, day, month, year.
pub fn parse_timespan(input: &str) -> Option<Duration> {
    let input = input.trim();
    let digits_end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (digits, unit) = input.split_at(digits_end);
    let amount: u64 = digits.parse().ok()?;

    let seconds = match unit {
        "s" => amount,
        "min" => amount * 60,
        "hour" => amount * 3600,
        "day" => amount * 86400,
        "month" => amount * 86400 * 30,
        "year" => amount * 86400 * 365,
        _ => return None,
    };

    Some(Duration::from_secs(seconds))
}

/// Truncate to at most `max` characters, appending "..." when cut.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<b> & </b>"), "&lt;b&gt; &amp; &lt;/b&gt;");
    }

    #[test]
    fn test_parse_timespan() {
        assert_eq!(parse_timespan("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_timespan("5min"), Some(Duration::from_secs(300)));
        assert_eq!(parse_timespan("1hour"), Some(Duration::from_secs(3600)));
        assert_eq!(parse_timespan("2day"), Some(Duration::from_secs(172800)));
        assert_eq!(parse_timespan("1month"), Some(Duration::from_secs(2592000)));
        assert_eq!(parse_timespan("bogus"), None);
        assert_eq!(parse_timespan("10"), None);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_chars("this is longer", 7), "this is...");
    }
}
