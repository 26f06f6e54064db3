use crate::error::Result;
use murmur_core::domain::CommentId;
use murmur_core::dto::PhoneSummaryDto;
use rusqlite::{params, Connection};

pub struct PhonesRepo<'a> {
    conn: &'a Connection,
}

impl<'a> PhonesRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn list_for_comment(&self, comment_id: CommentId) -> Result<Vec<String>> {
        load_phones(self.conn, comment_id)
    }

    /// Distinct phones with the number of comments mentioning each, most
    /// frequent first.
    pub fn summary(&self) -> Result<Vec<PhoneSummaryDto>> {
        let mut stmt = self.conn.prepare(
            "SELECT phone, COUNT(DISTINCT comment_id) AS cnt
             FROM comment_phones
             GROUP BY phone
             ORDER BY cnt DESC, phone ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(PhoneSummaryDto {
                phone: row.get(0)?,
                comment_count: row.get(1)?,
            });
        }
        Ok(items)
    }

    pub fn count_distinct(&self) -> Result<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT phone) FROM comment_phones;",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

pub(crate) fn load_phones(conn: &Connection, comment_id: CommentId) -> Result<Vec<String>> {
    let mut stmt = conn.prepare_cached(
        "SELECT phone FROM comment_phones
         WHERE comment_id = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([comment_id.to_string()])?;
    let mut phones = Vec::new();
    while let Some(row) = rows.next()? {
        phones.push(row.get(0)?);
    }
    Ok(phones)
}

pub(crate) fn replace_phones(
    conn: &Connection,
    comment_id: CommentId,
    phones: &[String],
) -> Result<()> {
    let id = comment_id.to_string();
    conn.execute("DELETE FROM comment_phones WHERE comment_id = ?1;", [&id])?;
    let mut stmt = conn.prepare_cached(
        "INSERT INTO comment_phones (comment_id, position, phone) VALUES (?1, ?2, ?3);",
    )?;
    for (position, phone) in phones.iter().enumerate() {
        stmt.execute(params![id, position as i64, phone])?;
    }
    Ok(())
}
