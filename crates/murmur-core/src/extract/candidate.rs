use crate::extract::patterns::{self, PatternId};
use serde::{Deserialize, Serialize};

pub const MIN_PHONE_DIGITS: usize = 10;

/// Half-open `[start, end)` range of char offsets in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Option<Self> {
        if start < end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub raw_text: String,
    pub span: Span,
    pub digit_sequence: String,
    pub pattern_id: PatternId,
}

impl Candidate {
    pub fn has_international_prefix(&self) -> bool {
        self.digit_sequence.starts_with('+')
    }

    pub fn digit_count(&self) -> usize {
        count_digits(&self.digit_sequence)
    }
}

/// Runs every pattern over `text` and keeps matches carrying at least
/// [`MIN_PHONE_DIGITS`] digits. Output is in pattern order, then match order.
pub fn generate_candidates(text: &str) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    if text.is_empty() {
        return candidates;
    }

    let offsets = CharOffsets::new(text);
    for (pattern_id, regex) in patterns::compiled() {
        for found in regex.find_iter(text) {
            let digit_sequence = digit_sequence(found.as_str());
            let digits = count_digits(&digit_sequence);
            if digits < MIN_PHONE_DIGITS {
                continue;
            }
            let Some(span) = Span::new(
                offsets.char_offset(found.start()),
                offsets.char_offset(found.end()),
            ) else {
                continue;
            };
            candidates.push(Candidate {
                raw_text: found.as_str().to_string(),
                span,
                digit_sequence,
                pattern_id: *pattern_id,
            });
        }
    }

    candidates
}

/// Strips everything except ASCII digits, keeping a single leading `+`.
pub fn digit_sequence(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    if raw.starts_with('+') {
        out.push('+');
    }
    for ch in raw.chars() {
        if ch.is_ascii_digit() {
            out.push(ch);
        }
    }
    out
}

pub fn count_digits(sequence: &str) -> usize {
    sequence.chars().filter(|ch| ch.is_ascii_digit()).count()
}

struct CharOffsets<'a> {
    text: &'a str,
    ascii: bool,
}

impl<'a> CharOffsets<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            ascii: text.is_ascii(),
        }
    }

    // Regex match bounds always fall on char boundaries.
    fn char_offset(&self, byte_offset: usize) -> usize {
        if self.ascii {
            return byte_offset;
        }
        self.text[..byte_offset].chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::{digit_sequence, generate_candidates, Span, MIN_PHONE_DIGITS};
    use crate::extract::patterns::PatternId;

    #[test]
    fn digit_sequence_strips_formatting() {
        assert_eq!(digit_sequence("(415) 555-1212"), "4155551212");
    }

    #[test]
    fn digit_sequence_keeps_only_a_leading_plus() {
        assert_eq!(digit_sequence("+1 (415) 555-1212"), "+14155551212");
        assert_eq!(digit_sequence("415+555+1212"), "4155551212");
    }

    #[test]
    fn span_overlap_is_half_open() {
        let a = Span::new(0, 5).unwrap();
        let b = Span::new(5, 9).unwrap();
        let c = Span::new(4, 6).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
        assert!(Span::new(3, 3).is_none());
    }

    #[test]
    fn empty_text_yields_no_candidates() {
        assert!(generate_candidates("").is_empty());
    }

    #[test]
    fn short_matches_are_discarded() {
        assert!(generate_candidates("+44 1234 56").is_empty());
        assert!(generate_candidates("call 555-1234").is_empty());
    }

    #[test]
    fn international_match_stops_before_the_next_number() {
        let candidates = generate_candidates("+1 202 555 0173 202 555 0199");
        let international: Vec<&str> = candidates
            .iter()
            .filter(|c| c.pattern_id == PatternId::International)
            .map(|c| c.raw_text.as_str())
            .collect();
        assert_eq!(international, vec!["+1 202 555 0173"]);
        assert!(candidates.iter().any(|c| c.raw_text == "202 555 0199"));
    }

    #[test]
    fn one_number_is_matched_by_several_patterns() {
        let candidates = generate_candidates("9876543210");
        let ids: Vec<PatternId> = candidates.iter().map(|c| c.pattern_id).collect();
        assert!(ids.contains(&PatternId::NorthAmerican));
        assert!(ids.contains(&PatternId::Grouped334));
        assert!(ids.contains(&PatternId::Bare10));
        for candidate in &candidates {
            assert_eq!(candidate.span, Span::new(0, 10).unwrap());
            assert_eq!(candidate.digit_sequence, "9876543210");
        }
    }

    #[test]
    fn spans_are_char_offsets_in_the_original_text() {
        let text = "Tél: 987-654-3210";
        let candidates = generate_candidates(text);
        assert!(!candidates.is_empty());
        for candidate in &candidates {
            assert_eq!(candidate.span, Span::new(5, 17).unwrap());
            assert_eq!(candidate.raw_text, "987-654-3210");
        }
    }

    #[test]
    fn every_candidate_meets_the_digit_floor() {
        let text = "+1 202 555 0173, 12025550173, 0987 654 321 and 98765 43210";
        for candidate in generate_candidates(text) {
            assert!(candidate.digit_count() >= MIN_PHONE_DIGITS, "{candidate:?}");
        }
    }

    #[test]
    fn long_runs_are_kept() {
        let candidates = generate_candidates("id +1234567890123456");
        assert!(candidates
            .iter()
            .any(|c| c.digit_sequence == "+1234567890123456" && c.digit_count() == 16));
    }
}
