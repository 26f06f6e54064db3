use crate::error::{Result, StoreError};
use crate::repo::phones::{load_phones, replace_phones};
use murmur_core::domain::{Comment, CommentAuthor, CommentId, Sentiment};
use murmur_core::extract_phone_numbers;
use murmur_core::CoreError;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::str::FromStr;

const COMMENT_COLUMNS: &str = "id, external_id, post_id, author_id, author_name, message,
     created_at, like_count, sentiment, imported_at";

#[derive(Debug, Clone, Default)]
pub struct CommentNew {
    pub external_id: Option<String>,
    pub post_id: Option<String>,
    pub author: CommentAuthor,
    pub message: String,
    pub created_at: Option<i64>,
    pub like_count: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentInsert {
    Created(Comment),
    Updated(Comment),
}

impl CommentInsert {
    pub fn comment(&self) -> &Comment {
        match self {
            CommentInsert::Created(comment) | CommentInsert::Updated(comment) => comment,
        }
    }

    pub fn into_comment(self) -> Comment {
        match self {
            CommentInsert::Created(comment) | CommentInsert::Updated(comment) => comment,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, CommentInsert::Created(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommentQuery {
    pub with_phones_only: bool,
    pub sentiment: Option<Sentiment>,
    pub unclassified_only: bool,
    pub limit: Option<i64>,
}

pub struct CommentsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> CommentsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Stores a comment and its extracted phones. A comment whose
    /// `external_id` already exists is refreshed in place; its sentiment is
    /// cleared when the text changed.
    pub fn insert(&self, now_utc: i64, input: CommentNew) -> Result<CommentInsert> {
        let input = normalize_new(input)?;
        let phones = extract_phone_numbers(input.message.as_str()).into_strings();

        let tx = self.conn.unchecked_transaction()?;
        let existing: Option<(String, String)> = match input.external_id.as_deref() {
            Some(external_id) => tx
                .query_row(
                    "SELECT id, message FROM comments WHERE external_id = ?1;",
                    [external_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?,
            None => None,
        };

        let outcome = match existing {
            Some((id_raw, previous_message)) => {
                let id = parse_comment_id(&id_raw)?;
                let text_changed = previous_message != input.message;
                tx.execute(
                    "UPDATE comments
                     SET post_id = ?2, author_id = ?3, author_name = ?4, message = ?5,
                         created_at = ?6, like_count = ?7, updated_at = ?8,
                         sentiment = CASE WHEN ?9 THEN NULL ELSE sentiment END
                     WHERE id = ?1;",
                    params![
                        id_raw,
                        input.post_id,
                        input.author.id,
                        input.author.name,
                        input.message,
                        input.created_at,
                        input.like_count,
                        now_utc,
                        text_changed,
                    ],
                )?;
                replace_phones(&tx, id, &phones)?;
                let comment = get_inner(&tx, id)?.ok_or_else(|| StoreError::CommentNotFound(id_raw))?;
                CommentInsert::Updated(comment)
            }
            None => {
                let id = CommentId::new();
                tx.execute(
                    "INSERT INTO comments (id, external_id, post_id, author_id, author_name,
                                           message, created_at, like_count, sentiment,
                                           imported_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL, ?9, ?9);",
                    params![
                        id.to_string(),
                        input.external_id,
                        input.post_id,
                        input.author.id,
                        input.author.name,
                        input.message,
                        input.created_at,
                        input.like_count,
                        now_utc,
                    ],
                )?;
                replace_phones(&tx, id, &phones)?;
                CommentInsert::Created(Comment {
                    id,
                    external_id: input.external_id,
                    post_id: input.post_id,
                    author: input.author,
                    message: input.message,
                    created_at: input.created_at,
                    like_count: input.like_count,
                    sentiment: None,
                    phones,
                    imported_at: now_utc,
                })
            }
        };

        tx.commit()?;
        Ok(outcome)
    }

    pub fn get(&self, id: CommentId) -> Result<Option<Comment>> {
        get_inner(self.conn, id)
    }

    pub fn get_by_external_id(&self, external_id: &str) -> Result<Option<Comment>> {
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE external_id = ?1;");
        let row = self
            .conn
            .query_row(&sql, [external_id], comment_row)
            .optional()?;
        match row {
            Some(row) => Ok(Some(hydrate(self.conn, row)?)),
            None => Ok(None),
        }
    }

    pub fn list(&self, query: &CommentQuery) -> Result<Vec<Comment>> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if query.with_phones_only {
            clauses.push(
                "EXISTS (SELECT 1 FROM comment_phones WHERE comment_phones.comment_id = comments.id)",
            );
        }
        if let Some(sentiment) = query.sentiment {
            values.push(Value::Text(sentiment.as_str().to_string()));
            clauses.push("comments.sentiment = ?1");
        }
        if query.unclassified_only {
            clauses.push("comments.sentiment IS NULL");
        }

        let mut sql = format!("SELECT {COMMENT_COLUMNS} FROM comments");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(
            " ORDER BY COALESCE(comments.created_at, comments.imported_at) ASC,
                       comments.imported_at ASC,
                       comments.id ASC",
        );
        if let Some(limit) = query.limit {
            values.push(Value::Integer(limit.max(0)));
            sql.push_str(&format!(" LIMIT ?{}", values.len()));
        }
        sql.push(';');

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(values))?;
        let mut raw = Vec::new();
        while let Some(row) = rows.next()? {
            raw.push(comment_row(row)?);
        }

        raw.into_iter().map(|row| hydrate(self.conn, row)).collect()
    }

    pub fn list_all(&self) -> Result<Vec<Comment>> {
        self.list(&CommentQuery::default())
    }

    pub fn set_sentiment(
        &self,
        now_utc: i64,
        id: CommentId,
        sentiment: Option<Sentiment>,
    ) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE comments SET sentiment = ?2, updated_at = ?3 WHERE id = ?1;",
            params![id.to_string(), sentiment.map(|s| s.as_str()), now_utc],
        )?;
        if updated == 0 {
            return Err(StoreError::CommentNotFound(id.to_string()));
        }
        Ok(())
    }

    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM comments;", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn delete(&self, id: CommentId) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM comments WHERE id = ?1;", [id.to_string()])?;
        if deleted == 0 {
            return Err(StoreError::CommentNotFound(id.to_string()));
        }
        Ok(())
    }
}

fn normalize_new(mut input: CommentNew) -> Result<CommentNew> {
    if let Some(external_id) = input.external_id.take() {
        let trimmed = external_id.trim();
        if trimmed.is_empty() {
            return Err(CoreError::EmptyExternalId.into());
        }
        input.external_id = Some(trimmed.to_string());
    }
    if let Some(likes) = input.like_count {
        if likes < 0 {
            return Err(CoreError::InvalidLikeCount(likes).into());
        }
    }
    input.post_id = non_empty(input.post_id);
    input.author.id = non_empty(input.author.id);
    input.author.name = non_empty(input.author.name);
    Ok(input)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn get_inner(conn: &Connection, id: CommentId) -> Result<Option<Comment>> {
    let sql = format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1;");
    let row = conn
        .query_row(&sql, [id.to_string()], comment_row)
        .optional()?;
    match row {
        Some(row) => Ok(Some(hydrate(conn, row)?)),
        None => Ok(None),
    }
}

struct CommentRow {
    id: String,
    external_id: Option<String>,
    post_id: Option<String>,
    author_id: Option<String>,
    author_name: Option<String>,
    message: String,
    created_at: Option<i64>,
    like_count: Option<i64>,
    sentiment: Option<String>,
    imported_at: i64,
}

fn comment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        external_id: row.get(1)?,
        post_id: row.get(2)?,
        author_id: row.get(3)?,
        author_name: row.get(4)?,
        message: row.get(5)?,
        created_at: row.get(6)?,
        like_count: row.get(7)?,
        sentiment: row.get(8)?,
        imported_at: row.get(9)?,
    })
}

fn hydrate(conn: &Connection, row: CommentRow) -> Result<Comment> {
    let id = parse_comment_id(&row.id)?;
    let sentiment = row
        .sentiment
        .as_deref()
        .map(Sentiment::parse_label)
        .transpose()?;
    Ok(Comment {
        id,
        external_id: row.external_id,
        post_id: row.post_id,
        author: CommentAuthor {
            id: row.author_id,
            name: row.author_name,
        },
        message: row.message,
        created_at: row.created_at,
        like_count: row.like_count,
        sentiment,
        phones: load_phones(conn, id)?,
        imported_at: row.imported_at,
    })
}

fn parse_comment_id(raw: &str) -> Result<CommentId> {
    CommentId::from_str(raw).map_err(|_| StoreError::InvalidCommentId(raw.to_string()))
}
