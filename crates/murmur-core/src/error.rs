use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid sentiment label: {0}")]
    InvalidSentimentLabel(String),
    #[error("external comment id cannot be empty")]
    EmptyExternalId,
    #[error("invalid like count: {0}")]
    InvalidLikeCount(i64),
}
