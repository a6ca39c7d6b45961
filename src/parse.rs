//! Percentage extraction from captured terminal output

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// One entry in the priority-ordered pattern table.
struct UsagePattern {
    label: &'static str,
    regex: Regex,
}

/// Patterns from most to least specific. The table is walked in order and
/// the first entry that matches anywhere in the text wins, so the bare
/// percentage stays last as the catch-all.
static PATTERNS: Lazy<Vec<UsagePattern>> = Lazy::new(|| {
    [
        ("5-hour window", r"(?i)5-hour:\s*(\d+)%"),
        ("model usage", r"(?i)Model usage:\s*(\d+)%"),
        ("usage", r"(?i)Usage:\s*(\d+)%"),
        ("current usage", r"(?i)Current usage:\s*(\d+)%"),
        ("percent used/of", r"(?i)(\d+)%\s*(?:used|of)"),
        ("bare percent", r"(\d+)%"),
    ]
    .into_iter()
    .map(|(label, pattern)| UsagePattern {
        label,
        regex: Regex::new(pattern).expect("hand-written pattern compiles"),
    })
    .collect()
});

/// Extract the usage percentage from raw terminal output.
///
/// Tries each pattern in priority order and returns the integer captured by
/// the first one that matches, regardless of surrounding noise. No
/// cross-validation between candidates: an earlier pattern wins even if a
/// later one would also match elsewhere in the text. The value is not
/// clamped to 0..=100; a digit run too large for `u32` falls through to the
/// next pattern.
pub fn extract_percentage(text: &str) -> Option<u32> {
    for entry in PATTERNS.iter() {
        if let Some(captures) = entry.regex.captures(text) {
            if let Ok(value) = captures[1].parse::<u32>() {
                debug!(pattern = entry.label, value, "matched usage pattern");
                return Some(value);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_five_hour_label() {
        assert_eq!(extract_percentage("5-hour: 42%"), Some(42));
    }

    #[test]
    fn test_model_usage_label() {
        assert_eq!(extract_percentage("Model usage: 17%"), Some(17));
    }

    #[test]
    fn test_usage_label() {
        assert_eq!(extract_percentage("Usage: 88%"), Some(88));
    }

    #[test]
    fn test_current_usage_label() {
        assert_eq!(
            extract_percentage("Current plan usage today: Current usage: 73% of your limit"),
            Some(73)
        );
    }

    #[test]
    fn test_percent_followed_by_used() {
        assert_eq!(extract_percentage("you are at 64% used"), Some(64));
    }

    #[test]
    fn test_percent_followed_by_of() {
        assert_eq!(extract_percentage("31% of the window consumed"), Some(31));
    }

    #[test]
    fn test_bare_percent_fallback() {
        assert_eq!(extract_percentage("some banner text 55% more text"), Some(55));
    }

    #[test]
    fn test_label_beats_bare_percent() {
        // The labeled value wins even though a bare "99%" appears first.
        assert_eq!(extract_percentage("99% battery. 5-hour: 12%"), Some(12));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(extract_percentage("USAGE: 7%"), Some(7));
        assert_eq!(extract_percentage("5-HOUR: 9%"), Some(9));
    }

    #[test]
    fn test_surrounding_noise_ignored() {
        let noisy = "Welcome!\nTips for getting started...\n  5-hour: 42%  \nbye";
        assert_eq!(extract_percentage(noisy), Some(42));
    }

    #[test]
    fn test_no_percent_at_all() {
        assert_eq!(extract_percentage("no digits with a sign here"), None);
        assert_eq!(extract_percentage("100 percent but spelled out"), None);
        assert_eq!(extract_percentage(""), None);
    }

    #[test]
    fn test_overflow_falls_through_to_next_pattern() {
        // The huge "Usage:" capture cannot be a u32; the used/of pattern
        // still gets its chance.
        assert_eq!(
            extract_percentage("Usage: 99999999999999999999% and 55% used"),
            Some(55)
        );
    }

    #[test]
    fn test_overflow_everywhere_yields_none() {
        assert_eq!(extract_percentage("99999999999999999999%"), None);
    }

    #[test]
    fn test_out_of_range_value_preserved() {
        // No clamping: the writer trusts whatever the assistant printed.
        assert_eq!(extract_percentage("Usage: 250%"), Some(250));
    }

    proptest! {
        #[test]
        fn prop_labeled_value_roundtrips(
            value in 0u32..=100,
            prefix in "[a-zA-Z \n]{0,30}",
            suffix in "[a-zA-Z \n]{0,30}",
        ) {
            let text = format!("{prefix}Usage: {value}%{suffix}");
            prop_assert_eq!(extract_percentage(&text), Some(value));
        }

        #[test]
        fn prop_bare_value_roundtrips(value in 0u32..=100, noise in "[a-z ]{0,20}") {
            let text = format!("{noise}{value}%");
            prop_assert_eq!(extract_percentage(&text), Some(value));
        }
    }
}
