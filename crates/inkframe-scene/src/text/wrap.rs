//! Character-level line wrapping.

/// Limits applied while wrapping.
#[derive(Debug, Clone, Copy)]
pub struct WrapOptions<'a> {
    pub max_width: Option<f32>,
    pub max_lines: Option<usize>,
    pub truncate: bool,
    pub ellipsis: &'a str,
}

impl Default for WrapOptions<'_> {
    fn default() -> Self {
        Self {
            max_width: None,
            max_lines: None,
            truncate: false,
            ellipsis: "\u{2026}",
        }
    }
}

/// Splits `text` into lines.
///
/// Walks the string one character at a time, accumulating the measured width
/// of the current line. A line ends at `\n` or when the next character would
/// overflow `max_width`. With `max_lines` and `truncate` set, the last allowed
/// line ends with the ellipsis as soon as it cannot hold both the next
/// character and the ellipsis while more text remains.
pub fn wrap_text(text: &str, options: &WrapOptions<'_>, measure: impl Fn(&str) -> f32) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let ellipsis_width = if options.truncate {
        measure(options.ellipsis)
    } else {
        0.0
    };
    let line_limit_reached = |count: usize| options.max_lines.is_some_and(|max| count >= max);

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut width = 0.0f32;
    let mut buf = [0u8; 4];

    for (i, &ch) in chars.iter().enumerate() {
        if line_limit_reached(lines.len()) {
            return lines;
        }
        if ch == '\n' {
            lines.push(std::mem::take(&mut line));
            width = 0.0;
            continue;
        }

        let advance = measure(ch.encode_utf8(&mut buf));
        if let Some(max_width) = options.max_width {
            if width + advance > max_width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
                if line_limit_reached(lines.len()) {
                    return lines;
                }
            }

            let on_last_line = options.max_lines == Some(lines.len() + 1);
            let more_follows = i + 1 < chars.len();
            if options.truncate
                && on_last_line
                && more_follows
                && width + advance + ellipsis_width > max_width
            {
                line.push_str(options.ellipsis);
                lines.push(line);
                return lines;
            }
        }

        line.push(ch);
        width += advance;
    }

    if !line_limit_reached(lines.len()) {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(s: &str) -> f32 {
        s.chars().count() as f32
    }

    #[test]
    fn test_no_limits_keeps_single_line() {
        assert_eq!(wrap_text("hello", &WrapOptions::default(), unit), vec!["hello"]);
    }

    #[test]
    fn test_empty_text_is_one_empty_line() {
        assert_eq!(wrap_text("", &WrapOptions::default(), unit), vec![""]);
    }

    #[test]
    fn test_newline_breaks() {
        assert_eq!(
            wrap_text("ab\ncd", &WrapOptions::default(), unit),
            vec!["ab", "cd"]
        );
        assert_eq!(wrap_text("ab\n", &WrapOptions::default(), unit), vec!["ab", ""]);
    }

    #[test]
    fn test_overflow_breaks() {
        let options = WrapOptions {
            max_width: Some(2.0),
            ..Default::default()
        };
        assert_eq!(wrap_text("abcde", &options, unit), vec!["ab", "cd", "e"]);
    }

    #[test]
    fn test_max_lines_without_truncate_drops_rest() {
        let options = WrapOptions {
            max_width: Some(2.0),
            max_lines: Some(2),
            ..Default::default()
        };
        assert_eq!(wrap_text("abcdefg", &options, unit), vec!["ab", "cd"]);
    }

    #[test]
    fn test_truncate_appends_ellipsis() {
        let options = WrapOptions {
            max_width: Some(2.0),
            max_lines: Some(2),
            truncate: true,
            ..Default::default()
        };
        let lines = wrap_text("abcdefg", &options, unit);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "ab");
        assert!(lines[1].ends_with('\u{2026}'));
    }

    #[test]
    fn test_truncate_not_applied_when_text_fits() {
        let options = WrapOptions {
            max_width: Some(2.0),
            max_lines: Some(2),
            truncate: true,
            ..Default::default()
        };
        assert_eq!(wrap_text("abc", &options, unit), vec!["ab", "c"]);
    }

    #[test]
    fn test_wide_char_still_placed_on_empty_line() {
        let options = WrapOptions {
            max_width: Some(0.5),
            ..Default::default()
        };
        assert_eq!(wrap_text("ab", &options, unit), vec!["a", "b"]);
    }
}
