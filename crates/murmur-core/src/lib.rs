pub mod analysis;
pub mod domain;
pub mod dto;
pub mod error;
pub mod extract;
pub mod takeaways;

pub use analysis::{classify_texts, ClassificationReport, LexiconClassifier, SentimentClassifier};
pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use extract::{
    extract_batch, extract_phone_numbers, extract_phone_numbers_from_bytes, CanonicalPhone,
    ExtractionResult,
};
pub use takeaways::{parse_takeaways, TakeawayRequest, Takeaways};
