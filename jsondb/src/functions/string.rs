use regex::Regex;

/// String helpers. Positions and lengths count characters, not bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct StringFunctions;

impl StringFunctions {
    pub fn length(&self, text: &str) -> usize {
        text.chars().count()
    }

    pub fn to_upper(&self, text: &str) -> String {
        text.to_uppercase()
    }

    pub fn to_lower(&self, text: &str) -> String {
        text.to_lowercase()
    }

    /// Returns up to `length` characters starting at `start`.
    ///
    /// A negative start counts as 0; a start past the end gives an empty
    /// string; the end is clamped to the string length.
    pub fn substring(&self, text: &str, start: i64, length: usize) -> String {
        let start = start.max(0) as usize;
        text.chars().skip(start).take(length).collect()
    }

    /// Replaces every occurrence of `from` with `to`.
    pub fn replace(&self, text: &str, from: &str, to: &str) -> String {
        text.replace(from, to)
    }

    /// Whether `pattern` matches anywhere in `text`. An invalid pattern never matches.
    pub fn matches(&self, text: &str, pattern: &str) -> bool {
        match Regex::new(pattern) {
            Ok(regex) => regex.is_match(text),
            Err(err) => {
                log::warn!("Invalid pattern {}: {}", pattern, err);
                false
            }
        }
    }
}
