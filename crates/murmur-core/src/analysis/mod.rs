pub mod classifier;
pub mod lexicon;
pub mod report;

pub use classifier::{ClassifierError, SentimentClassifier};
pub use lexicon::LexiconClassifier;
pub use report::{
    classify_texts, ClassificationReport, GroupedComments, SentimentCounts, SentimentPercentages,
};
