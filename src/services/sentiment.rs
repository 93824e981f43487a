use regex::Regex;
use serde::Serialize;

/// Tone of a short piece of report commentary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Classifies free text into a [`Sentiment`]. Used to color single-stat cards.
pub trait SentimentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Sentiment;
}

pub const POSITIVE_KEYWORDS: &[&str] = &[
    "growth", "grow", "grew", "increase", "increased", "gain", "gains", "profit",
    "profitable", "improve", "improved", "improvement", "strong", "record", "higher",
    "rise", "rose", "up", "expansion", "positive",
];

pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "decline", "declined", "decrease", "decreased", "loss", "losses", "drop", "dropped",
    "fall", "fell", "lower", "weak", "down", "risk", "negative", "deficit", "impairment",
];

/// Fixed keyword matcher. Positive words win when both lists match.
pub struct KeywordSentiment {
    positive: Regex,
    negative: Regex,
}

impl KeywordSentiment {
    pub fn new() -> Self {
        Self {
            positive: keyword_regex(POSITIVE_KEYWORDS),
            negative: keyword_regex(NEGATIVE_KEYWORDS),
        }
    }
}

impl Default for KeywordSentiment {
    fn default() -> Self {
        Self::new()
    }
}

fn keyword_regex(words: &[&str]) -> Regex {
    let pattern = format!(r"(?i)\b(?:{})\b", words.join("|"));
    Regex::new(&pattern).expect("keyword list produces a valid pattern")
}

impl SentimentClassifier for KeywordSentiment {
    fn classify(&self, text: &str) -> Sentiment {
        if self.positive.is_match(text) {
            Sentiment::Positive
        } else if self.negative.is_match(text) {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}
