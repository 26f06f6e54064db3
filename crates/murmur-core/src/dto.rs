use crate::domain::{Comment, CommentId};
use serde::{Deserialize, Serialize};

/// One exported comment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRowDto {
    pub id: CommentId,
    pub name: String,
    pub user_id: String,
    pub profile_url: String,
    pub phone_numbers: String,
    pub has_phone: bool,
    pub phone_count: usize,
    pub comment: String,
    pub timestamp: Option<i64>,
    pub comment_id: String,
    pub sentiment: Option<String>,
}

impl From<&Comment> for CommentRowDto {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            name: comment.author.display_name().to_string(),
            user_id: comment.author.id.clone().unwrap_or_default(),
            profile_url: comment.author.profile_url().unwrap_or_default(),
            phone_numbers: comment.phones.join(", "),
            has_phone: comment.has_phone(),
            phone_count: comment.phones.len(),
            comment: comment.message.clone(),
            timestamp: comment.created_at,
            comment_id: comment.external_id.clone().unwrap_or_default(),
            sentiment: comment.sentiment.map(|s| s.as_str().to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneSummaryDto {
    pub phone: String,
    pub comment_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionDto {
    pub text: String,
    pub phones: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::CommentRowDto;
    use crate::domain::{Comment, CommentAuthor, CommentId, Sentiment};

    #[test]
    fn row_joins_phones_and_fills_author_fields() {
        let comment = Comment {
            id: CommentId::new(),
            external_id: Some("123_456".to_string()),
            post_id: None,
            author: CommentAuthor {
                id: Some("42".to_string()),
                name: Some("Grace".to_string()),
            },
            message: "call 555-123-4567 or 555-987-6543".to_string(),
            created_at: Some(1_700_000_000),
            like_count: Some(3),
            sentiment: Some(Sentiment::Neutral),
            phones: vec!["555-123-4567".to_string(), "555-987-6543".to_string()],
            imported_at: 1_700_000_100,
        };
        let row = CommentRowDto::from(&comment);
        assert_eq!(row.phone_numbers, "555-123-4567, 555-987-6543");
        assert!(row.has_phone);
        assert_eq!(row.phone_count, 2);
        assert_eq!(row.profile_url, "https://facebook.com/42");
        assert_eq!(row.sentiment.as_deref(), Some("neutral"));
    }
}
