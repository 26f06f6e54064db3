use chrono::{DateTime, Local, Utc};
use murmur_core::domain::Sentiment;

const PREVIEW_CHARS: usize = 60;

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn format_timestamp_datetime(ts: Option<i64>) -> String {
    match ts.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)) {
        Some(dt) => dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// First line of `text`, cut to a fixed number of chars.
pub fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    let mut out: String = line.chars().take(PREVIEW_CHARS).collect();
    if line.chars().count() > PREVIEW_CHARS || text.trim().lines().nth(1).is_some() {
        out.push_str("...");
    }
    out
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum SentimentArg {
    Positive,
    Neutral,
    Negative,
}

impl From<SentimentArg> for Sentiment {
    fn from(value: SentimentArg) -> Self {
        match value {
            SentimentArg::Positive => Sentiment::Positive,
            SentimentArg::Neutral => Sentiment::Neutral,
            SentimentArg::Negative => Sentiment::Negative,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp_datetime, preview};

    #[test]
    fn preview_truncates_long_and_multiline_text() {
        assert_eq!(preview("short"), "short");
        assert_eq!(preview("first\nsecond"), "first...");
        let long = "x".repeat(80);
        assert_eq!(preview(&long), format!("{}...", "x".repeat(60)));
    }

    #[test]
    fn missing_timestamp_renders_dash() {
        assert_eq!(format_timestamp_datetime(None), "-");
    }
}
