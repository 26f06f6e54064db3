use crate::domain::ids::CommentId;
use crate::domain::sentiment::Sentiment;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

const PROFILE_BASE_URL: &str = "https://facebook.com/";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub id: Option<String>,
    pub name: Option<String>,
}

impl CommentAuthor {
    pub fn display_name(&self) -> &str {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => "Unknown",
        }
    }

    pub fn profile_url(&self) -> Option<String> {
        let id = self.id.as_deref()?.trim();
        if id.is_empty() {
            return None;
        }
        Some(format!("{PROFILE_BASE_URL}{id}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub external_id: Option<String>,
    pub post_id: Option<String>,
    pub author: CommentAuthor,
    pub message: String,
    pub created_at: Option<i64>,
    pub like_count: Option<i64>,
    pub sentiment: Option<Sentiment>,
    /// Canonical phone numbers in extraction order.
    pub phones: Vec<String>,
    pub imported_at: i64,
}

impl Comment {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(external_id) = &self.external_id {
            if external_id.trim().is_empty() {
                return Err(CoreError::EmptyExternalId);
            }
        }
        if let Some(likes) = self.like_count {
            if likes < 0 {
                return Err(CoreError::InvalidLikeCount(likes));
            }
        }
        Ok(())
    }

    pub fn has_phone(&self) -> bool {
        !self.phones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::CommentAuthor;

    #[test]
    fn profile_url_uses_author_id() {
        let author = CommentAuthor {
            id: Some("1234".to_string()),
            name: Some("Ada".to_string()),
        };
        assert_eq!(
            author.profile_url().as_deref(),
            Some("https://facebook.com/1234")
        );
    }

    #[test]
    fn anonymous_author_has_placeholder_name() {
        let author = CommentAuthor::default();
        assert_eq!(author.display_name(), "Unknown");
        assert!(author.profile_url().is_none());
    }
}
