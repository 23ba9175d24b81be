//! Button-markup parser.
//!
//! Scans free-form reply text for the embedded button grammar and strips
//! it out of the visible text:
//!
//! - `[label](buttonurl:https://example.com)` - URL button
//! - `[label](buttonurl:https://example.com:same)` - same row as previous
//! - `[label](buttonalert:Popup text)` - alert popup button
//!
//! Anything that does not match the grammar (including escaped `\[` forms)
//! passes through as literal text, so malformed markup never fails.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// `[label](buttonurl|buttonalert:(//)?target(:same)?)`
static BTN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\[]+?)\]\((buttonurl|buttonalert):(?:/{0,2})(.+?)(:same)?\)").unwrap()
});

/// What pressing a parsed button does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonAction {
    /// Open a URL.
    Url(String),
    /// Show a stored alert popup. The string is ready-made callback data
    /// of the form `namespace:index:keyword`; the alert text itself lives
    /// in [`ParsedMarkup::alerts`] at that index.
    Alert(String),
}

/// One button extracted from reply text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonSpec {
    pub label: String,
    pub action: ButtonAction,
}

/// Result of parsing reply text.
#[derive(Debug, Clone, Default)]
pub struct ParsedMarkup {
    /// Text with all button markup stripped.
    pub text: String,
    /// Extracted buttons (rows).
    pub buttons: Vec<Vec<ButtonSpec>>,
    /// Alert payloads, indexed by order of `buttonalert` appearance.
    pub alerts: Vec<String>,
}

/// Parse button markup out of `text`.
///
/// `keyword` identifies the saved reply the alerts belong to and
/// `alert_namespace` distinguishes the lookup table (chat filters use
/// `"alertmessage"`, global filters `"gfilteralert"`); both end up inside
/// the callback data of alert buttons.
///
/// A backslash directly before the `[` escapes the markup: the bracket
/// form stays in the text and the escaping backslash is consumed. An even
/// run of backslashes escapes itself, not the markup.
pub fn parse_markup(text: &str, keyword: &str, alert_namespace: &str) -> ParsedMarkup {
    // Alert payloads are later carried inside single-line callback lookups;
    // escape real newlines/tabs up front so they survive that round trip.
    let text = if text.contains("buttonalert") {
        text.replace('\n', "\\n").replace('\t', "\\t")
    } else {
        text.to_string()
    };

    let mut stripped = String::new();
    let mut buttons: Vec<Vec<ButtonSpec>> = Vec::new();
    let mut alerts: Vec<String> = Vec::new();
    let mut prev = 0;
    let mut alert_idx = 0;

    let bytes = text.as_bytes();
    for caps in BTN_REGEX.captures_iter(&text) {
        let whole = caps.get(0).unwrap();
        let start = whole.start();

        let mut n_escapes = 0;
        let mut at = start;
        while at > 0 && bytes[at - 1] == b'\\' {
            n_escapes += 1;
            at -= 1;
        }

        if n_escapes % 2 == 0 {
            stripped.push_str(&text[prev..start]);
            prev = whole.end();

            let label = caps[1].to_string();
            let same_row = caps.get(4).is_some();
            let button = if &caps[2] == "buttonalert" {
                alerts.push(caps[3].to_string());
                let data = format!("{alert_namespace}:{alert_idx}:{keyword}");
                alert_idx += 1;
                ButtonSpec {
                    label,
                    action: ButtonAction::Alert(data),
                }
            } else {
                ButtonSpec {
                    label,
                    action: ButtonAction::Url(caps[3].replace(' ', "")),
                }
            };

            // `:same` on the very first button has no row to join; it
            // starts a new row instead of being dropped.
            match buttons.last_mut() {
                Some(row) if same_row => row.push(button),
                _ => buttons.push(vec![button]),
            }
        } else {
            // Odd run: the innermost backslash escapes the markup. Emit
            // everything before that backslash, drop it, and let the
            // bracket region flow into the next flush as literal text.
            stripped.push_str(&text[prev..start - 1]);
            prev = start;
        }
    }
    stripped.push_str(&text[prev..]);

    ParsedMarkup {
        text: stripped,
        buttons,
        alerts,
    }
}

/// Reverse the newline/tab escaping applied by [`parse_markup`] before an
/// alert payload is shown as a popup.
pub fn unescape_alert(text: &str) -> String {
    text.replace("\\n", "\n").replace("\\t", "\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        let parsed = parse_markup("no markup here at all", "kw", "ns");
        assert_eq!(parsed.text, "no markup here at all");
        assert!(parsed.buttons.is_empty());
        assert!(parsed.alerts.is_empty());
    }

    #[test]
    fn test_basic_url_button() {
        let parsed = parse_markup("click [Go](buttonurl:http://example.com)", "kw", "ns");

        assert_eq!(parsed.text, "click ");
        assert_eq!(parsed.buttons.len(), 1);
        assert_eq!(parsed.buttons[0].len(), 1);
        assert_eq!(parsed.buttons[0][0].label, "Go");
        assert_eq!(
            parsed.buttons[0][0].action,
            ButtonAction::Url("http://example.com".to_string())
        );
        assert!(parsed.alerts.is_empty());
    }

    #[test]
    fn test_same_row_chaining() {
        let parsed = parse_markup(
            "[A](buttonurl:http://a.com)[B](buttonurl:http://b.com:same)",
            "kw",
            "ns",
        );

        assert_eq!(parsed.buttons.len(), 1);
        assert_eq!(parsed.buttons[0].len(), 2);
        assert_eq!(parsed.buttons[0][0].label, "A");
        assert_eq!(parsed.buttons[0][1].label, "B");
    }

    #[test]
    fn test_separate_rows() {
        let parsed = parse_markup(
            "[A](buttonurl:http://a.com)\n[B](buttonurl:http://b.com)",
            "kw",
            "ns",
        );

        assert_eq!(parsed.buttons.len(), 2);
        assert_eq!(parsed.text, "\n");
    }

    #[test]
    fn test_same_row_on_first_button_starts_a_row() {
        let parsed = parse_markup("[A](buttonurl:http://a.com:same)", "kw", "ns");

        assert_eq!(parsed.buttons.len(), 1);
        assert_eq!(parsed.buttons[0].len(), 1);
        assert_eq!(
            parsed.buttons[0][0].action,
            ButtonAction::Url("http://a.com".to_string())
        );
    }

    #[test]
    fn test_alert_allocation() {
        let parsed = parse_markup("[Hi](buttonalert:Hello there)", "kw", "ns");

        assert_eq!(parsed.alerts, vec!["Hello there".to_string()]);
        assert_eq!(
            parsed.buttons[0][0].action,
            ButtonAction::Alert("ns:0:kw".to_string())
        );
    }

    #[test]
    fn test_alert_indices_increment_across_rows() {
        let parsed = parse_markup(
            "[A](buttonalert:first)[B](buttonurl:http://x)[C](buttonalert:second)",
            "rules",
            "alertmessage",
        );

        assert_eq!(parsed.alerts, vec!["first", "second"]);
        assert_eq!(
            parsed.buttons[0][0].action,
            ButtonAction::Alert("alertmessage:0:rules".to_string())
        );
        assert_eq!(
            parsed.buttons[2][0].action,
            ButtonAction::Alert("alertmessage:1:rules".to_string())
        );
    }

    #[test]
    fn test_escaped_markup_stays_literal() {
        let parsed = parse_markup(r"\[a](buttonurl:http://x)", "kw", "ns");

        assert_eq!(parsed.text, "[a](buttonurl:http://x)");
        assert!(parsed.buttons.is_empty());
    }

    #[test]
    fn test_double_escape_is_live() {
        let parsed = parse_markup(r"\\[a](buttonurl:http://x)", "kw", "ns");

        assert_eq!(parsed.text, r"\\");
        assert_eq!(parsed.buttons.len(), 1);
    }

    #[test]
    fn test_escaped_markup_mid_text() {
        let parsed = parse_markup(r"before \[a](buttonurl:http://x) after", "kw", "ns");

        assert_eq!(parsed.text, "before [a](buttonurl:http://x) after");
        assert!(parsed.buttons.is_empty());
    }

    #[test]
    fn test_url_spaces_removed() {
        let parsed = parse_markup("[Go](buttonurl:http://exa mple.com)", "kw", "ns");

        assert_eq!(
            parsed.buttons[0][0].action,
            ButtonAction::Url("http://example.com".to_string())
        );
    }

    #[test]
    fn test_protocol_relative_slashes_consumed() {
        let parsed = parse_markup("[Go](buttonurl://t.me/chan)", "kw", "ns");

        assert_eq!(
            parsed.buttons[0][0].action,
            ButtonAction::Url("t.me/chan".to_string())
        );
    }

    #[test]
    fn test_alert_triggers_whole_text_newline_escaping() {
        let parsed = parse_markup("line1\nline2\t[Hi](buttonalert:see)", "kw", "ns");

        assert_eq!(parsed.text, "line1\\nline2\\t");
        assert_eq!(parsed.alerts, vec!["see"]);
    }

    #[test]
    fn test_no_alert_no_newline_escaping() {
        let parsed = parse_markup("line1\nline2 [Go](buttonurl:http://x)", "kw", "ns");

        assert_eq!(parsed.text, "line1\nline2 ");
    }

    #[test]
    fn test_unmatched_markup_left_alone() {
        let parsed = parse_markup("[dangling bracket (buttonurl:http://x", "kw", "ns");

        assert_eq!(parsed.text, "[dangling bracket (buttonurl:http://x");
        assert!(parsed.buttons.is_empty());
    }

    #[test]
    fn test_stripped_output_is_stable() {
        let first = parse_markup("click [Go](buttonurl:http://example.com) now", "kw", "ns");
        let second = parse_markup(&first.text, "kw", "ns");

        assert_eq!(second.text, first.text);
        assert!(second.buttons.is_empty());
    }

    #[test]
    fn test_unescape_alert_round_trip() {
        let parsed = parse_markup("a\nb [Hi](buttonalert:x\ny)", "kw", "ns");

        assert_eq!(parsed.alerts[0], "x\\ny");
        assert_eq!(unescape_alert(&parsed.alerts[0]), "x\ny");
    }
}
