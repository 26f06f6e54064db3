use crate::Result;
use chrono::{DateTime, Utc};
use murmur_core::dto::CommentRowDto;
use std::io::Write;

pub const CSV_HEADER: &[&str] = &[
    "Name",
    "User_ID",
    "Profile_URL",
    "Phone_Numbers",
    "Has_Phone",
    "Phone_Count",
    "Comment",
    "Timestamp",
    "Comment_ID",
    "Sentiment",
];

// Spreadsheet tools need the BOM to detect UTF-8.
const UTF8_BOM: &str = "\u{feff}";

pub fn export_csv(rows: &[CommentRowDto]) -> String {
    let mut out = String::from(UTF8_BOM);
    push_record(&mut out, CSV_HEADER.iter().copied());
    for row in rows {
        let phone_count = row.phone_count.to_string();
        let timestamp = row.timestamp.map(format_timestamp).unwrap_or_default();
        let fields = [
            row.name.as_str(),
            row.user_id.as_str(),
            row.profile_url.as_str(),
            row.phone_numbers.as_str(),
            if row.has_phone { "Yes" } else { "No" },
            phone_count.as_str(),
            row.comment.as_str(),
            timestamp.as_str(),
            row.comment_id.as_str(),
            row.sentiment.as_deref().unwrap_or(""),
        ];
        push_record(&mut out, fields);
    }
    out
}

pub fn export_json(rows: &[CommentRowDto]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

pub fn write_csv<W: Write>(rows: &[CommentRowDto], mut out: W) -> Result<()> {
    out.write_all(export_csv(rows).as_bytes())?;
    Ok(())
}

fn push_record<'a>(out: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    for (index, field) in fields.into_iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
    if !field.contains([',', '"', '\n', '\r']) {
        out.push_str(field);
        return;
    }
    out.push('"');
    for ch in field.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
}

fn format_timestamp(ts: i64) -> String {
    match DateTime::<Utc>::from_timestamp(ts, 0) {
        Some(dt) => dt.format("%Y-%m-%dT%H:%M:%S%z").to_string(),
        None => ts.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{export_csv, export_json};
    use murmur_core::domain::CommentId;
    use murmur_core::dto::CommentRowDto;

    fn row(comment: &str, phones: &[&str]) -> CommentRowDto {
        CommentRowDto {
            id: CommentId::new(),
            name: "Ada".to_string(),
            user_id: "42".to_string(),
            profile_url: "https://facebook.com/42".to_string(),
            phone_numbers: phones.join(", "),
            has_phone: !phones.is_empty(),
            phone_count: phones.len(),
            comment: comment.to_string(),
            timestamp: Some(1_700_000_000),
            comment_id: "900_1".to_string(),
            sentiment: None,
        }
    }

    #[test]
    fn csv_starts_with_bom_and_header() {
        let csv = export_csv(&[]);
        assert!(csv.starts_with('\u{feff}'));
        assert_eq!(
            csv.trim_start_matches('\u{feff}'),
            "Name,User_ID,Profile_URL,Phone_Numbers,Has_Phone,Phone_Count,Comment,Timestamp,Comment_ID,Sentiment\r\n"
        );
    }

    #[test]
    fn csv_quotes_fields_with_separators() {
        let csv = export_csv(&[row(
            "say \"hi\"\nto 555-123-4567",
            &["555-123-4567", "111-222-3333"],
        )]);
        let body = csv.split_once("\r\n").expect("header").1;
        assert_eq!(
            body,
            "Ada,42,https://facebook.com/42,\"555-123-4567, 111-222-3333\",Yes,2,\
             \"say \"\"hi\"\"\nto 555-123-4567\",2023-11-14T22:13:20+0000,900_1,\r\n"
        );
    }

    #[test]
    fn csv_marks_rows_without_phones() {
        let csv = export_csv(&[row("nothing", &[])]);
        assert!(csv.contains(",No,0,nothing,"));
    }

    #[test]
    fn json_is_an_array_of_rows() {
        let json = export_json(&[row("hi", &[])]).expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value.as_array().map(Vec::len), Some(1));
        assert_eq!(value[0]["comment_id"], "900_1");
    }
}
