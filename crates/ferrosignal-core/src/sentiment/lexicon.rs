//! Rule-based polarity scoring for headlines.

use std::collections::HashMap;

/// Maps a piece of text to a polarity in `[-1, 1]`.
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

const POSITIVE: &[(&str, f64)] = &[
    ("bullish", 0.8),
    ("surge", 0.7),
    ("rally", 0.7),
    ("soar", 0.8),
    ("gain", 0.5),
    ("profit", 0.6),
    ("growth", 0.6),
    ("rise", 0.5),
    ("increase", 0.5),
    ("improve", 0.5),
    ("outperform", 0.7),
    ("beat", 0.6),
    ("exceed", 0.6),
    ("strong", 0.5),
    ("positive", 0.5),
    ("optimistic", 0.6),
    ("confident", 0.5),
    ("record", 0.6),
    ("upgrade", 0.6),
    ("boost", 0.5),
    ("recovery", 0.5),
    ("rebound", 0.5),
    ("good", 0.7),
    ("great", 0.8),
    ("best", 1.0),
    ("success", 0.6),
    ("win", 0.6),
];

const NEGATIVE: &[(&str, f64)] = &[
    ("bearish", -0.8),
    ("crash", -0.9),
    ("plunge", -0.8),
    ("slump", -0.7),
    ("tumble", -0.7),
    ("drop", -0.6),
    ("fall", -0.5),
    ("decline", -0.6),
    ("loss", -0.6),
    ("down", -0.4),
    ("weak", -0.5),
    ("negative", -0.5),
    ("pessimistic", -0.6),
    ("concern", -0.5),
    ("worry", -0.5),
    ("fear", -0.6),
    ("risk", -0.4),
    ("volatile", -0.3),
    ("uncertainty", -0.5),
    ("miss", -0.6),
    ("disappoint", -0.7),
    ("underperform", -0.6),
    ("downgrade", -0.6),
    ("recession", -0.7),
    ("crisis", -0.8),
    ("warning", -0.5),
    ("trouble", -0.6),
    ("fail", -0.7),
    ("bad", -0.7),
    ("worst", -1.0),
    ("layoff", -0.6),
    ("default", -0.6),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "neither", "none", "nothing", "cannot", "cant", "don't", "dont",
    "doesn't", "doesnt", "didn't", "didnt", "won't", "wont", "isn't", "isnt", "aren't", "arent",
    "wasn't", "wasnt", "hardly", "barely",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.5),
    ("extremely", 2.0),
    ("highly", 1.5),
    ("sharply", 1.5),
    ("significantly", 1.5),
    ("dramatically", 1.8),
    ("slightly", 0.5),
    ("somewhat", 0.7),
    ("marginally", 0.5),
];

/// Financial word lexicon with negation and intensifier handling.
///
/// A negation flips the sign of the next scored word; an intensifier scales
/// it. The text score is the mean of the matched word scores, clamped to
/// `[-1, 1]`, and `0.0` when no word matches.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    words: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        let words = POSITIVE
            .iter()
            .chain(NEGATIVE)
            .map(|(word, score)| ((*word).to_owned(), *score))
            .collect();
        let intensifiers = INTENSIFIERS
            .iter()
            .map(|(word, factor)| ((*word).to_owned(), *factor))
            .collect();

        Self {
            words,
            intensifiers,
        }
    }

    /// Adds or replaces a word score. Scores are clamped to `[-1, 1]`.
    pub fn with_word(mut self, word: &str, score: f64) -> Self {
        self.words
            .insert(word.to_ascii_lowercase(), score.clamp(-1.0, 1.0));
        self
    }

    fn word_score(&self, token: &str) -> Option<f64> {
        if let Some(score) = self.words.get(token) {
            return Some(*score);
        }
        // Plain inflections: "rallies", "surged", "falling", "gains".
        for suffix in ["ies", "es", "ed", "ing", "s"] {
            if let Some(stem) = token.strip_suffix(suffix) {
                let candidates = match suffix {
                    "ies" => vec![format!("{stem}y")],
                    "ed" | "ing" | "es" => vec![stem.to_owned(), format!("{stem}e")],
                    _ => vec![stem.to_owned()],
                };
                if let Some(score) = candidates.iter().find_map(|c| self.words.get(c)) {
                    return Some(*score);
                }
            }
        }
        None
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let mut total = 0.0;
        let mut matched = 0_usize;
        let mut negate_next = false;
        let mut factor = 1.0;

        for token in tokenize(text) {
            if NEGATIONS.contains(&token.as_str()) {
                negate_next = true;
                continue;
            }
            if let Some(multiplier) = self.intensifiers.get(&token) {
                factor = *multiplier;
                continue;
            }
            if let Some(mut score) = self.word_score(&token) {
                if negate_next {
                    score = -score;
                    negate_next = false;
                }
                total += score * factor;
                factor = 1.0;
                matched += 1;
            }
        }

        if matched == 0 {
            return 0.0;
        }
        (total / matched as f64).clamp(-1.0, 1.0)
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|token| !token.is_empty())
        .map(|token| token.trim_matches('\'').to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_text_scores_zero() {
        let scorer = LexiconScorer::new();
        assert_eq!(scorer.polarity("Central bank publishes minutes"), 0.0);
        assert_eq!(scorer.polarity(""), 0.0);
    }

    #[test]
    fn positive_and_negative_words_move_the_score() {
        let scorer = LexiconScorer::new();
        assert!(scorer.polarity("Stocks rally on strong earnings") > 0.0);
        assert!(scorer.polarity("Markets plunge as recession fears grow") < 0.0);
    }

    #[test]
    fn negation_flips_the_next_scored_word() {
        let scorer = LexiconScorer::new();
        let plain = scorer.polarity("outlook is strong");
        let negated = scorer.polarity("outlook is not strong");
        assert!(plain > 0.0);
        assert!((negated + plain).abs() < 1e-12);
    }

    #[test]
    fn intensifier_scales_and_result_is_clamped() {
        let scorer = LexiconScorer::new();
        let base = scorer.polarity("shares gain");
        let boosted = scorer.polarity("shares gain very");
        assert_eq!(base, boosted, "intensifier applies only to the following word");
        assert!(scorer.polarity("very strong") > base);
        assert_eq!(scorer.polarity("extremely crash"), -1.0);
    }

    #[test]
    fn inflected_forms_are_matched() {
        let scorer = LexiconScorer::new();
        assert!(scorer.polarity("Index surged") > 0.0);
        assert!(scorer.polarity("Banks rallies") > 0.0);
        assert!(scorer.polarity("Pound falling") < 0.0);
    }
}
