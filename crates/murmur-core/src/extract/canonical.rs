use crate::extract::candidate::{Candidate, Span};
use crate::extract::patterns::PatternId;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalPhone {
    normalized: String,
    span: Span,
    pattern_id: PatternId,
}

impl CanonicalPhone {
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Span of the earliest candidate that produced this number.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn pattern_id(&self) -> PatternId {
        self.pattern_id
    }

    pub fn into_string(self) -> String {
        self.normalized
    }
}

impl fmt::Display for CanonicalPhone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

impl AsRef<str> for CanonicalPhone {
    fn as_ref(&self) -> &str {
        &self.normalized
    }
}

/// Display and dedup key for a cleaned digit sequence.
///
/// `+`-prefixed sequences are kept verbatim, exactly ten digits become
/// `DDD-DDD-DDDD`, anything else is returned unformatted.
pub fn canonical_form(digit_sequence: &str) -> String {
    if digit_sequence.starts_with('+') {
        return digit_sequence.to_string();
    }

    let digits = digit_sequence.as_bytes();
    if digits.len() == 10 && digits.iter().all(u8::is_ascii_digit) {
        return format!(
            "{}-{}-{}",
            &digit_sequence[..3],
            &digit_sequence[3..6],
            &digit_sequence[6..]
        );
    }

    digit_sequence.to_string()
}

/// Maps resolved candidates to canonical numbers, keeping the first
/// occurrence of each canonical form.
pub fn canonicalize(resolved: Vec<Candidate>) -> Vec<CanonicalPhone> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(resolved.len());
    for candidate in resolved {
        let normalized = canonical_form(&candidate.digit_sequence);
        if !seen.insert(normalized.clone()) {
            continue;
        }
        out.push(CanonicalPhone {
            normalized,
            span: candidate.span,
            pattern_id: candidate.pattern_id,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{canonical_form, canonicalize};
    use crate::extract::candidate::{Candidate, Span};
    use crate::extract::patterns::PatternId;

    fn candidate(start: usize, digits: &str) -> Candidate {
        Candidate {
            raw_text: digits.to_string(),
            span: Span::new(start, start + digits.len()).unwrap(),
            digit_sequence: digits.to_string(),
            pattern_id: PatternId::Bare10,
        }
    }

    #[test]
    fn ten_digits_are_grouped() {
        assert_eq!(canonical_form("5551234567"), "555-123-4567");
    }

    #[test]
    fn plus_prefix_is_preserved_verbatim() {
        assert_eq!(canonical_form("+12025550173"), "+12025550173");
        assert_eq!(canonical_form("+4420794609"), "+4420794609");
    }

    #[test]
    fn longer_sequences_without_plus_stay_raw() {
        assert_eq!(canonical_form("12025550173"), "12025550173");
        assert_eq!(canonical_form("4420794609581"), "4420794609581");
    }

    #[test]
    fn first_occurrence_wins() {
        let phones = canonicalize(vec![
            candidate(4, "9876543210"),
            candidate(30, "1112223333"),
            candidate(50, "9876543210"),
        ]);
        let values: Vec<&str> = phones.iter().map(|p| p.as_str()).collect();
        assert_eq!(values, vec!["987-654-3210", "111-222-3333"]);
        assert_eq!(phones[0].span().start, 4);
    }
}
