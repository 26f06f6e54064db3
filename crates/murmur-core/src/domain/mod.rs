pub mod comment;
pub mod ids;
pub mod sentiment;

pub use comment::{Comment, CommentAuthor};
pub use ids::CommentId;
pub use sentiment::Sentiment;
