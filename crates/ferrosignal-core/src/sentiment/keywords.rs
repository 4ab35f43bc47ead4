use regex::{Regex, RegexBuilder};

use crate::ValidationError;

/// Trigger keywords matched when no list is configured.
pub const DEFAULT_TRIGGER_WORDS: &[&str] = &[
    "recession",
    "inflation",
    "rate hike",
    "crisis",
    "strong earnings",
    "bull market",
    "bear market",
    "volatility",
];

/// Case-insensitive whole-word matcher over a fixed keyword list.
///
/// Phrases match across any run of whitespace, so "rate  hike" in a headline
/// still counts as "rate hike".
#[derive(Debug, Clone)]
pub struct TriggerMatcher {
    keywords: Vec<(String, Regex)>,
}

impl TriggerMatcher {
    pub fn new<I, S>(words: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keywords = Vec::new();
        for word in words {
            let word = word.as_ref().trim().to_lowercase();
            if word.is_empty() || !word.chars().any(char::is_alphanumeric) {
                return Err(ValidationError::InvalidTriggerWord { value: word });
            }
            if keywords.iter().any(|(existing, _)| existing == &word) {
                continue;
            }

            let pattern = word
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s+");
            let regex = RegexBuilder::new(&format!(r"\b{pattern}\b"))
                .case_insensitive(true)
                .build()
                .map_err(|_| ValidationError::InvalidTriggerWord {
                    value: word.clone(),
                })?;
            keywords.push((word, regex));
        }

        Ok(Self { keywords })
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(|(word, _)| word.as_str())
    }

    /// Keywords found in `text`, in configured order.
    pub fn matches(&self, text: &str) -> Vec<String> {
        self.keywords
            .iter()
            .filter(|(_, regex)| regex.is_match(text))
            .map(|(word, _)| word.clone())
            .collect()
    }

    pub fn is_triggered(&self, text: &str) -> bool {
        self.keywords.iter().any(|(_, regex)| regex.is_match(text))
    }
}

impl Default for TriggerMatcher {
    fn default() -> Self {
        // Every default keyword is plain text, so construction cannot fail;
        // fall back to an empty matcher rather than panic.
        Self::new(DEFAULT_TRIGGER_WORDS.iter().copied()).unwrap_or(Self {
            keywords: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_list_matches_whole_words_case_insensitively() {
        let matcher = TriggerMatcher::default();
        assert_eq!(matcher.keywords().count(), DEFAULT_TRIGGER_WORDS.len());

        assert_eq!(
            matcher.matches("Fed signals RATE HIKE as Inflation sticks"),
            vec!["inflation".to_owned(), "rate hike".to_owned()]
        );
        assert!(matcher.matches("Crisis-hit lender rescued").contains(&"crisis".to_owned()));
        assert!(matcher.matches("Hyperinflationary spiral").is_empty());
    }

    #[test]
    fn phrases_tolerate_extra_whitespace() {
        let matcher = TriggerMatcher::new(["bear market"]).expect("valid words");
        assert!(matcher.is_triggered("Stocks enter a bear\n  market"));
        assert!(!matcher.is_triggered("A bearish market"));
    }

    #[test]
    fn rejects_blank_keywords_and_skips_duplicates() {
        assert!(matches!(
            TriggerMatcher::new(["  "]),
            Err(ValidationError::InvalidTriggerWord { .. })
        ));
        let matcher = TriggerMatcher::new(["Crisis", "crisis"]).expect("valid words");
        assert_eq!(matcher.keywords().collect::<Vec<_>>(), vec!["crisis"]);
    }

    #[test]
    fn special_characters_are_escaped() {
        let matcher = TriggerMatcher::new(["s&p"]).expect("valid words");
        assert!(matcher.is_triggered("S&P closes higher"));
    }
}
