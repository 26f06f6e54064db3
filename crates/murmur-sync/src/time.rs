use chrono::DateTime;

/// Parses the timestamp forms comment sources emit: Graph's
/// `2024-05-01T10:00:00+0000`, RFC 3339, or plain unix seconds.
pub fn parse_graph_time(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        return raw.parse().ok();
    }
    if let Ok(parsed) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(parsed.timestamp());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|parsed| parsed.timestamp())
}

#[cfg(test)]
mod tests {
    use super::parse_graph_time;

    #[test]
    fn parses_graph_offset_form() {
        assert_eq!(
            parse_graph_time("2023-11-14T22:13:20+0000"),
            Some(1_700_000_000)
        );
    }

    #[test]
    fn parses_rfc3339_and_unix_seconds() {
        assert_eq!(parse_graph_time("2023-11-14T22:13:20Z"), Some(1_700_000_000));
        assert_eq!(parse_graph_time("1700000000"), Some(1_700_000_000));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_graph_time(""), None);
        assert_eq!(parse_graph_time("yesterday"), None);
    }
}
