pub mod comments;
pub mod phones;

pub use comments::{CommentInsert, CommentNew, CommentQuery, CommentsRepo};
pub use phones::PhonesRepo;
