//! Patterns recognized while waiting on session output

use regex::Regex;

/// A pattern to wait for in session output.
///
/// `Exact` and `Regex` search the text the process has printed. `Eof` and
/// `Timeout` are special members: instead of matching text, they turn the
/// corresponding condition from an error into a normal match, which is how a
/// caller opts into receiving whatever output was buffered when the process
/// ended or the deadline passed.
///
/// # Examples
///
/// ```
/// use clawfetch::Pattern;
///
/// let prompt = Pattern::exact("> ");
/// let number = Pattern::regex(r"\d+%").unwrap();
/// let arms = [prompt, number, Pattern::Eof, Pattern::Timeout];
/// # let _ = arms;
/// ```
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Exact substring match.
    Exact(String),

    /// Regular expression match.
    Regex(Regex),

    /// Matches when the process closes its output.
    Eof,

    /// Matches when the wait deadline passes.
    Timeout,
}

/// Location of a hit within the searched text.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Hit {
    pub start: usize,
    pub end: usize,
}

impl Pattern {
    /// Create an exact substring pattern.
    pub fn exact(s: impl Into<String>) -> Self {
        Pattern::Exact(s.into())
    }

    /// Create a regex pattern. Fails on invalid regex syntax.
    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Pattern::Regex(Regex::new(pattern)?))
    }

    /// Find the first hit in `haystack`, if any.
    ///
    /// The special `Eof` and `Timeout` members never match text; the session
    /// wait loop handles them separately.
    pub(crate) fn find_in(&self, haystack: &str) -> Option<Hit> {
        match self {
            Pattern::Exact(s) => haystack.find(s.as_str()).map(|start| Hit {
                start,
                end: start + s.len(),
            }),
            Pattern::Regex(re) => re.find(haystack).map(|m| Hit {
                start: m.start(),
                end: m.end(),
            }),
            Pattern::Eof | Pattern::Timeout => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_find() {
        let pattern = Pattern::exact("claude>");
        let hit = pattern.find_in("welcome\nclaude> ").unwrap();
        assert_eq!(hit.start, 8);
        assert_eq!(hit.end, 15);
    }

    #[test]
    fn test_exact_not_found() {
        assert!(Pattern::exact("missing").find_in("other text").is_none());
    }

    #[test]
    fn test_regex_find() {
        let pattern = Pattern::regex(r"\d+%").unwrap();
        let hit = pattern.find_in("at 42% of limit").unwrap();
        assert_eq!(&"at 42% of limit"[hit.start..hit.end], "42%");
    }

    #[test]
    fn test_regex_invalid() {
        assert!(Pattern::regex("[unclosed").is_err());
    }

    #[test]
    fn test_special_members_never_match_text() {
        assert!(Pattern::Eof.find_in("anything").is_none());
        assert!(Pattern::Timeout.find_in("anything").is_none());
    }
}
