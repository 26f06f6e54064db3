use crate::Result;
use serde::{Deserialize, Serialize};

/// A comment as delivered by a source, before phones are extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawComment {
    pub external_id: Option<String>,
    pub post_id: Option<String>,
    pub author_id: Option<String>,
    pub author_name: Option<String>,
    pub message: String,
    /// Source timestamp as received; see [`crate::time::parse_graph_time`].
    pub created_time: Option<String>,
    pub like_count: Option<i64>,
}

pub trait CommentSource {
    fn source_name(&self) -> &'static str;
    fn fetch_comments(&self) -> Result<Vec<RawComment>>;
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub source: String,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub with_phones: usize,
    pub phones_found: usize,
    pub warnings: Vec<String>,
}

impl ImportReport {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn processed(&self) -> usize {
        self.created + self.updated
    }

    /// Share of processed comments that carried at least one phone, in
    /// percent with one decimal.
    pub fn phone_share(&self) -> f64 {
        let processed = self.processed();
        if processed == 0 {
            return 0.0;
        }
        let share = self.with_phones as f64 * 100.0 / processed as f64;
        (share * 10.0).round() / 10.0
    }
}
