use crate::analysis::classifier::SentimentClassifier;
use crate::domain::Sentiment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    fn bump(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentPercentages {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedComments {
    pub positive: Vec<String>,
    pub neutral: Vec<String>,
    pub negative: Vec<String>,
}

impl GroupedComments {
    pub fn bucket(&self, sentiment: Sentiment) -> &[String] {
        match sentiment {
            Sentiment::Positive => &self.positive,
            Sentiment::Neutral => &self.neutral,
            Sentiment::Negative => &self.negative,
        }
    }

    fn push(&mut self, sentiment: Sentiment, text: String) {
        match sentiment {
            Sentiment::Positive => self.positive.push(text),
            Sentiment::Neutral => self.neutral.push(text),
            Sentiment::Negative => self.negative.push(text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub total: usize,
    pub counts: SentimentCounts,
    pub percentages: SentimentPercentages,
    pub comments: GroupedComments,
    /// Texts the classifier could not label; not part of `total`.
    pub failures: usize,
}

impl ClassificationReport {
    pub fn from_labeled<I>(labeled: I) -> Self
    where
        I: IntoIterator<Item = (String, Sentiment)>,
    {
        let mut report = ClassificationReport::default();
        for (text, sentiment) in labeled {
            report.counts.bump(sentiment);
            report.comments.push(sentiment, text);
        }
        report.finish();
        report
    }

    fn finish(&mut self) {
        self.total = self.counts.total();
        self.percentages = SentimentPercentages {
            positive: percentage(self.counts.positive, self.total),
            neutral: percentage(self.counts.neutral, self.total),
            negative: percentage(self.counts.negative, self.total),
        };
    }
}

/// Classifies each text on its own. A failure on one text is counted and
/// skipped; the batch always completes.
pub fn classify_texts<C, I, S>(classifier: &C, texts: I) -> ClassificationReport
where
    C: SentimentClassifier + ?Sized,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut report = ClassificationReport::default();
    for text in texts {
        let text = text.into();
        match classifier.classify(&text) {
            Ok(sentiment) => {
                report.counts.bump(sentiment);
                report.comments.push(sentiment, text);
            }
            Err(_) => report.failures += 1,
        }
    }
    report.finish();
    report
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::{classify_texts, percentage, ClassificationReport};
    use crate::analysis::classifier::{ClassifierError, SentimentClassifier};
    use crate::analysis::lexicon::LexiconClassifier;
    use crate::domain::Sentiment;

    struct FlakyClassifier;

    impl SentimentClassifier for FlakyClassifier {
        fn name(&self) -> &str {
            "flaky"
        }

        fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError> {
            if text.contains("boom") {
                return Err(ClassifierError::Backend("boom".to_string()));
            }
            Ok(Sentiment::Neutral)
        }
    }

    #[test]
    fn percentages_round_to_two_places() {
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn report_groups_and_counts() {
        let report = classify_texts(
            &LexiconClassifier::new(),
            ["great job", "terrible support", "ok", "love it"],
        );
        assert_eq!(report.total, 4);
        assert_eq!(report.counts.positive, 2);
        assert_eq!(report.counts.negative, 1);
        assert_eq!(report.counts.neutral, 1);
        assert_eq!(report.percentages.positive, 50.0);
        assert_eq!(report.comments.positive, vec!["great job", "love it"]);
        assert_eq!(report.comments.negative, vec!["terrible support"]);
    }

    #[test]
    fn failures_do_not_abort_the_batch() {
        let report = classify_texts(&FlakyClassifier, ["fine", "boom", "also fine"]);
        assert_eq!(report.total, 2);
        assert_eq!(report.failures, 1);
        assert_eq!(report.counts.neutral, 2);
    }

    #[test]
    fn empty_input_gives_zeroed_report() {
        let report = classify_texts(&LexiconClassifier::new(), Vec::<String>::new());
        assert_eq!(report, ClassificationReport::default());
    }

    #[test]
    fn from_labeled_uses_existing_labels() {
        let report = ClassificationReport::from_labeled(vec![
            ("a".to_string(), Sentiment::Negative),
            ("b".to_string(), Sentiment::Negative),
        ]);
        assert_eq!(report.counts.negative, 2);
        assert_eq!(report.percentages.negative, 100.0);
    }
}
