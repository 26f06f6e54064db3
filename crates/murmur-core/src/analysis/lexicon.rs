use crate::analysis::classifier::{ClassifierError, SentimentClassifier};
use crate::domain::Sentiment;
use std::collections::HashSet;

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "awesome", "best", "brilliant", "excellent", "fantastic", "fast", "glad", "good",
    "great", "happy", "helpful", "love", "loved", "nice", "perfect", "recommend", "satisfied",
    "thank", "thanks", "wonderful", "worth",
];

const NEGATIVE_WORDS: &[&str] = &[
    "awful", "bad", "broken", "disappointed", "disappointing", "expensive", "fake", "hate",
    "horrible", "late", "never", "poor", "problem", "refund", "rude", "scam", "slow", "terrible",
    "waste", "worse", "worst", "wrong",
];

const NEGATORS: &[&str] = &["not", "no", "never", "dont", "don't", "isn't", "wasn't"];

/// Word-list scorer. Construction copies two small static lists into hash
/// sets and is cheap enough to do per process.
#[derive(Debug, Clone)]
pub struct LexiconClassifier {
    positive: HashSet<&'static str>,
    negative: HashSet<&'static str>,
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconClassifier {
    pub fn new() -> Self {
        Self {
            positive: POSITIVE_WORDS.iter().copied().collect(),
            negative: NEGATIVE_WORDS.iter().copied().collect(),
        }
    }

    /// Positive hits minus negative hits. A word directly after a negator
    /// counts for the opposite side.
    pub fn score(&self, text: &str) -> i32 {
        let mut score = 0;
        let mut negated = false;
        for word in words(text) {
            let polarity = if self.positive.contains(word.as_str()) {
                1
            } else if self.negative.contains(word.as_str()) {
                -1
            } else {
                0
            };
            score += if negated { -polarity } else { polarity };
            negated = NEGATORS.contains(&word.as_str());
        }
        score
    }
}

impl SentimentClassifier for LexiconClassifier {
    fn name(&self) -> &str {
        "lexicon"
    }

    fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError> {
        let score = self.score(text);
        Ok(match score {
            s if s > 0 => Sentiment::Positive,
            s if s < 0 => Sentiment::Negative,
            _ => Sentiment::Neutral,
        })
    }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|ch: char| !(ch.is_alphanumeric() || ch == '\''))
        .filter(|word| !word.is_empty())
        .map(|word| word.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::LexiconClassifier;
    use crate::analysis::classifier::SentimentClassifier;
    use crate::domain::Sentiment;

    #[test]
    fn classifies_clear_cases() {
        let classifier = LexiconClassifier::new();
        assert_eq!(
            classifier.classify("Great service, thanks!").unwrap(),
            Sentiment::Positive
        );
        assert_eq!(
            classifier.classify("Worst purchase ever, total scam").unwrap(),
            Sentiment::Negative
        );
        assert_eq!(
            classifier.classify("Call me at 555-123-4567").unwrap(),
            Sentiment::Neutral
        );
    }

    #[test]
    fn negator_flips_the_next_word() {
        let classifier = LexiconClassifier::new();
        assert_eq!(classifier.score("not good"), -1);
        assert_eq!(classifier.score("not bad at all"), 1);
    }

    #[test]
    fn mixed_text_ties_to_neutral() {
        let classifier = LexiconClassifier::new();
        assert_eq!(
            classifier.classify("good product but slow delivery").unwrap(),
            Sentiment::Neutral
        );
    }
}
