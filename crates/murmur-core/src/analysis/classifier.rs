use crate::domain::Sentiment;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    #[error("classifier backend error: {0}")]
    Backend(String),
    #[error("unexpected classifier output: {0}")]
    UnexpectedOutput(String),
}

/// Maps one text to a sentiment.
///
/// Implementations are built once by the caller and shared; they must not
/// rely on global state.
pub trait SentimentClassifier: Send + Sync {
    fn name(&self) -> &str;
    fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError>;
}

impl<T: SentimentClassifier + ?Sized> SentimentClassifier for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn classify(&self, text: &str) -> Result<Sentiment, ClassifierError> {
        (**self).classify(text)
    }
}
