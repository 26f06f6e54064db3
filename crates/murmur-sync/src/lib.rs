pub mod classifier;
pub mod error;
pub mod export;
pub mod file;
pub mod graph;
pub mod source;
pub mod summarize;
pub mod time;

pub use error::{Result, SyncError};
pub use source::{CommentSource, ImportReport, RawComment};
