use crate::source::{CommentSource, RawComment};
use crate::{Result, SyncError};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Text columns tried after the configured one.
const FALLBACK_TEXT_COLUMNS: &[&str] = &["comment", "message", "comment_message"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileBatch {
    pub comments: Vec<RawComment>,
    pub skipped: usize,
    pub warnings: Vec<String>,
}

/// Comments stored in a local file: a JSON array of row objects, or plain
/// text with one comment per line.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    text_column: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, text_column: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text_column: text_column.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<FileBatch> {
        let contents = fs::read_to_string(&self.path)?;
        if is_json(&self.path) {
            parse_json_rows(&contents, &self.text_column)
        } else {
            Ok(parse_lines(&contents))
        }
    }
}

impl CommentSource for FileSource {
    fn source_name(&self) -> &'static str {
        "file"
    }

    fn fetch_comments(&self) -> Result<Vec<RawComment>> {
        let batch = self.load()?;
        for warning in &batch.warnings {
            tracing::warn!(path = %self.path.display(), "{warning}");
        }
        Ok(batch.comments)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

pub fn parse_lines(contents: &str) -> FileBatch {
    let comments = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| RawComment {
            message: line.to_string(),
            ..RawComment::default()
        })
        .collect();
    FileBatch {
        comments,
        ..FileBatch::default()
    }
}

/// Parses a JSON array of row objects (or an object with a `data` array).
/// Rows without a usable text column are skipped with a warning.
pub fn parse_json_rows(contents: &str, text_column: &str) -> Result<FileBatch> {
    let value: Value = serde_json::from_str(contents)?;
    let rows = match value {
        Value::Array(rows) => rows,
        Value::Object(mut object) => match object.remove("data") {
            Some(Value::Array(rows)) => rows,
            _ => {
                return Err(SyncError::Parse(
                    "expected a JSON array of rows or an object with a data array".to_string(),
                ))
            }
        },
        _ => return Err(SyncError::Parse("expected a JSON array of rows".to_string())),
    };

    let mut batch = FileBatch::default();
    for (index, row) in rows.into_iter().enumerate() {
        let row_number = index + 1;
        let Value::Object(row) = row else {
            batch.skipped += 1;
            batch.warnings.push(format!("row {row_number}: not an object"));
            continue;
        };
        match text_of(&row, text_column) {
            Some(message) => batch.comments.push(raw_from_row(&row, message)),
            None => {
                batch.skipped += 1;
                batch
                    .warnings
                    .push(format!("row {row_number}: missing text column {text_column}"));
            }
        }
    }
    Ok(batch)
}

fn text_of(row: &Map<String, Value>, text_column: &str) -> Option<String> {
    std::iter::once(text_column)
        .chain(FALLBACK_TEXT_COLUMNS.iter().copied())
        .find_map(|column| match field(row, column) {
            Some(Value::String(text)) => Some(text.clone()),
            _ => None,
        })
}

fn raw_from_row(row: &Map<String, Value>, message: String) -> RawComment {
    let from = match field(row, "from") {
        Some(Value::Object(from)) => Some(from),
        _ => None,
    };
    RawComment {
        external_id: scalar(row, "comment_id").or_else(|| scalar(row, "id")),
        post_id: scalar(row, "post_id"),
        author_id: scalar(row, "user_id").or_else(|| from.and_then(|from| scalar(from, "id"))),
        author_name: scalar(row, "name").or_else(|| from.and_then(|from| scalar(from, "name"))),
        message,
        created_time: scalar(row, "timestamp").or_else(|| scalar(row, "created_time")),
        like_count: field(row, "like_count").and_then(Value::as_i64),
    }
}

/// Column lookup ignoring ASCII case, so `User_ID` and `user_id` both match.
fn field<'a>(row: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    row.get(name).or_else(|| {
        row.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })
}

fn scalar(row: &Map<String, Value>, name: &str) -> Option<String> {
    let value = match field(row, name)? {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
