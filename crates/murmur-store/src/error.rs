use murmur_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("invalid comment: {0}")]
    Core(#[from] CoreError),
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid data path: {0}")]
    InvalidDataPath(PathBuf),
    #[error("invalid comment id: {0}")]
    InvalidCommentId(String),
    #[error("comment not found: {0}")]
    CommentNotFound(String),
    #[error("database schema version {found} is newer than this build supports ({supported})")]
    SchemaTooNew { found: i64, supported: i64 },
    #[error("migration error: {0}")]
    Migration(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Coarse classification used by callers that map errors to exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Io,
    Sql,
    InvalidComment,
    MissingHomeDir,
    InvalidDataPath,
    InvalidCommentId,
    NotFound,
    Schema,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Io(_) => StoreErrorKind::Io,
            StoreError::Sql(_) => StoreErrorKind::Sql,
            StoreError::Core(_) => StoreErrorKind::InvalidComment,
            StoreError::MissingHomeDir => StoreErrorKind::MissingHomeDir,
            StoreError::InvalidDataPath(_) => StoreErrorKind::InvalidDataPath,
            StoreError::InvalidCommentId(_) => StoreErrorKind::InvalidCommentId,
            StoreError::CommentNotFound(_) => StoreErrorKind::NotFound,
            StoreError::SchemaTooNew { .. } | StoreError::Migration(_) => StoreErrorKind::Schema,
        }
    }

    /// True for rejected comment input, which an import skips instead of
    /// aborting.
    pub fn is_rejected_comment(&self) -> bool {
        matches!(
            self.kind(),
            StoreErrorKind::InvalidComment | StoreErrorKind::InvalidCommentId
        )
    }
}
