/// Lexical state of the [Scanner].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Outside any string literal.
    Normal,
    /// Inside a string literal.
    InString,
    /// Right after a backslash inside a string literal.
    Escaped,
}

/// Tracks string-literal state and bracket depth over a character stream.
///
/// Separators only count at depth zero in [ScanState::Normal]; commas, colons
/// and brackets inside strings or nested values are ignored. Both `{}` and
/// `[]` change the depth so that an array is kept in one piece.
///
/// ```rust
/// use pantry::codec::{ScanState, Scanner};
///
/// let mut scanner = Scanner::new();
/// for c in "{\"a\\\"".chars() {
///     scanner.feed(c);
/// }
/// assert_eq!(scanner.state(), ScanState::InString);
/// assert_eq!(scanner.depth(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Scanner {
    state: ScanState,
    depth: i32,
}

impl Scanner {
    pub fn new() -> Self {
        Scanner {
            state: ScanState::Normal,
            depth: 0,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn at_top_level(&self) -> bool {
        self.state == ScanState::Normal && self.depth == 0
    }

    pub fn feed(&mut self, c: char) {
        self.state = match (self.state, c) {
            (ScanState::Normal, '"') => ScanState::InString,
            (ScanState::Normal, '{' | '[') => {
                self.depth += 1;
                ScanState::Normal
            }
            (ScanState::Normal, '}' | ']') => {
                self.depth -= 1;
                ScanState::Normal
            }
            (ScanState::Normal, _) => ScanState::Normal,
            (ScanState::InString, '\\') => ScanState::Escaped,
            (ScanState::InString, '"') => ScanState::Normal,
            (ScanState::InString, _) => ScanState::InString,
            (ScanState::Escaped, _) => ScanState::InString,
        };
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits `body` at every top-level occurrence of `separator`.
///
/// Segments are trimmed; empty segments are dropped.
pub fn split_top_level(body: &str, separator: char) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut scanner = Scanner::new();
    let mut start = 0;

    for (index, c) in body.char_indices() {
        if c == separator && scanner.at_top_level() {
            push_segment(&mut segments, &body[start..index]);
            start = index + c.len_utf8();
        } else {
            scanner.feed(c);
        }
    }
    push_segment(&mut segments, &body[start..]);

    if scanner.state() != ScanState::Normal || scanner.depth() != 0 {
        log::warn!("Unbalanced input while splitting: {}", body);
    }
    segments
}

/// Splits a `key:value` segment at its first top-level colon.
///
/// Returns `None` if the segment has no such colon.
pub fn split_key_value(segment: &str) -> Option<(&str, &str)> {
    let mut scanner = Scanner::new();
    for (index, c) in segment.char_indices() {
        if c == ':' && scanner.at_top_level() {
            let key = segment[..index].trim();
            let value = segment[index + c.len_utf8()..].trim();
            return Some((key, value));
        }
        scanner.feed(c);
    }
    None
}

fn push_segment<'a>(segments: &mut Vec<&'a str>, segment: &'a str) {
    let segment = segment.trim();
    if !segment.is_empty() {
        segments.push(segment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_flat_pairs() {
        let parts = split_top_level(r#""a":1, "b":"x" ,"c":true"#, ',');
        assert_eq!(parts, vec![r#""a":1"#, r#""b":"x""#, r#""c":true"#]);
    }

    #[test]
    fn ignores_separators_in_strings() {
        let parts = split_top_level(r#""a":"x, y: z","b":2"#, ',');
        assert_eq!(parts, vec![r#""a":"x, y: z""#, r#""b":2"#]);
    }

    #[test]
    fn ignores_separators_in_nested_values() {
        let parts = split_top_level(r#""a":{"x":1,"y":2},"b":[1,2],"c":3"#, ',');
        assert_eq!(
            parts,
            vec![r#""a":{"x":1,"y":2}"#, r#""b":[1,2]"#, r#""c":3"#]
        );
    }

    #[test]
    fn escaped_quote_does_not_end_string() {
        let parts = split_top_level(r#""a":"say \"hi, there\"","b":1"#, ',');
        assert_eq!(parts, vec![r#""a":"say \"hi, there\"""#, r#""b":1"#]);
    }

    #[test]
    fn escaped_backslash_before_closing_quote() {
        let parts = split_top_level(r#""a":"dir\\","b":1"#, ',');
        assert_eq!(parts, vec![r#""a":"dir\\""#, r#""b":1"#]);
    }

    #[test]
    fn braces_inside_strings_do_not_change_depth() {
        let parts = split_top_level(r#""a":"}{","b":"]""#, ',');
        assert_eq!(parts, vec![r#""a":"}{""#, r#""b":"]""#]);
    }

    #[test]
    fn drops_empty_segments() {
        assert!(split_top_level("", ',').is_empty());
        assert!(split_top_level("   ", ',').is_empty());
        assert_eq!(split_top_level(r#""a":1,,"#, ','), vec![r#""a":1"#]);
    }

    #[test]
    fn splits_key_value_at_first_colon() {
        assert_eq!(
            split_key_value(r#""url" : "http://x:80""#),
            Some((r#""url""#, r#""http://x:80""#))
        );
    }

    #[test]
    fn colon_inside_key_is_skipped() {
        assert_eq!(
            split_key_value(r#""a:b":1"#),
            Some((r#""a:b""#, "1"))
        );
    }

    #[test]
    fn key_value_without_colon() {
        assert_eq!(split_key_value(r#""lonely""#), None);
    }

    #[test]
    fn scanner_state_transitions() {
        let mut scanner = Scanner::new();
        assert!(scanner.at_top_level());
        scanner.feed('"');
        assert_eq!(scanner.state(), ScanState::InString);
        scanner.feed('\\');
        assert_eq!(scanner.state(), ScanState::Escaped);
        scanner.feed('"');
        assert_eq!(scanner.state(), ScanState::InString);
        scanner.feed('"');
        assert_eq!(scanner.state(), ScanState::Normal);
        scanner.feed('[');
        assert_eq!(scanner.depth(), 1);
        assert!(!scanner.at_top_level());
    }
}
