//! Command-argument splitting.
//!
//! Filter triggers may be a single word or a quoted phrase; the rest of
//! the argument string is the reply body handed to the markup parser.

const SMART_OPEN: char = '\u{201C}';
const SMART_CLOSE: char = '\u{201D}';
const QUOTE_CHARS: [char; 3] = ['\'', '"', SMART_OPEN];

/// Split `text` into a key and the remaining text.
///
/// The key may be wrapped in single quotes, double quotes, or smart
/// quotes, with backslash escaping inside. An unterminated quote falls
/// back to plain whitespace splitting. A quoted-but-empty key becomes the
/// doubled quote character so downstream lookups never see an empty key.
pub fn split_quotes(text: &str) -> (String, Option<String>) {
    let chars: Vec<char> = text.chars().collect();
    let Some(&first) = chars.first() else {
        return (String::new(), None);
    };
    if !QUOTE_CHARS.contains(&first) {
        return split_whitespace_once(text);
    }

    let mut counter = 1;
    let mut closing = None;
    while counter < chars.len() {
        if chars[counter] == '\\' {
            counter += 1;
        } else if chars[counter] == first
            || (first == SMART_OPEN && chars[counter] == SMART_CLOSE)
        {
            closing = Some(counter);
            break;
        }
        counter += 1;
    }
    let Some(end) = closing else {
        return split_whitespace_once(text);
    };

    let inner: String = chars[1..end].iter().collect();
    let mut key = remove_escapes(inner.trim());
    if key.is_empty() {
        key = format!("{first}{first}");
    }

    let rest: String = chars[end + 1..].iter().collect();
    let rest = rest.trim().to_string();
    (key, (!rest.is_empty()).then_some(rest))
}

fn split_whitespace_once(text: &str) -> (String, Option<String>) {
    let trimmed = text.trim_start();
    match trimmed.split_once(char::is_whitespace) {
        Some((key, rest)) => {
            let rest = rest.trim();
            (
                key.to_string(),
                (!rest.is_empty()).then(|| rest.to_string()),
            )
        }
        None => (trimmed.to_string(), None),
    }
}

/// Strip backslash escapes: `\x` becomes `x`.
pub fn remove_escapes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut is_escaped = false;
    for c in text.chars() {
        if is_escaped {
            result.push(c);
            is_escaped = false;
        } else if c == '\\' {
            is_escaped = true;
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_quoted_key() {
        let (key, rest) = split_quotes("\"hello world\" rest of text");
        assert_eq!(key, "hello world");
        assert_eq!(rest.as_deref(), Some("rest of text"));
    }

    #[test]
    fn test_plain_key() {
        let (key, rest) = split_quotes("plainkey rest");
        assert_eq!(key, "plainkey");
        assert_eq!(rest.as_deref(), Some("rest"));
    }

    #[test]
    fn test_single_word_has_no_rest() {
        let (key, rest) = split_quotes("onlykey");
        assert_eq!(key, "onlykey");
        assert_eq!(rest, None);
    }

    #[test]
    fn test_empty_quoted_key_gets_sentinel() {
        let (key, rest) = split_quotes("\"\"");
        assert_eq!(key, "\"\"");
        assert_eq!(rest, None);
    }

    #[test]
    fn test_smart_quotes() {
        let (key, rest) = split_quotes("\u{201C}foo bar\u{201D} baz");
        assert_eq!(key, "foo bar");
        assert_eq!(rest.as_deref(), Some("baz"));
    }

    #[test]
    fn test_escaped_quote_inside_key() {
        let (key, rest) = split_quotes(r#""a\"b" tail"#);
        assert_eq!(key, "a\"b");
        assert_eq!(rest.as_deref(), Some("tail"));
    }

    #[test]
    fn test_unterminated_quote_falls_back_to_whitespace() {
        let (key, rest) = split_quotes("\"abc def");
        assert_eq!(key, "\"abc");
        assert_eq!(rest.as_deref(), Some("def"));
    }

    #[test]
    fn test_single_quotes() {
        let (key, rest) = split_quotes("'multi word' body here");
        assert_eq!(key, "multi word");
        assert_eq!(rest.as_deref(), Some("body here"));
    }

    #[test]
    fn test_remove_escapes() {
        assert_eq!(remove_escapes(r"a\\b\c"), r"a\bc");
        assert_eq!(remove_escapes("plain"), "plain");
    }

    #[test]
    fn test_empty_input() {
        let (key, rest) = split_quotes("");
        assert_eq!(key, "");
        assert_eq!(rest, None);
    }
}
