use crate::extract::candidate::{Candidate, Span};

/// Collapses overlapping candidates into non-overlapping winners.
///
/// Candidates are swept by ascending start offset, ties going to the pattern
/// declared first. A candidate intersecting any already accepted span is
/// dropped. The returned list is in sweep order.
pub fn resolve_overlaps(mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates.sort_by_key(|candidate| (candidate.span.start, candidate.pattern_id.rank()));

    let mut accepted_spans: Vec<Span> = Vec::new();
    let mut accepted = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if accepted_spans
            .iter()
            .any(|span| span.overlaps(&candidate.span))
        {
            continue;
        }
        accepted_spans.push(candidate.span);
        accepted.push(candidate);
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::resolve_overlaps;
    use crate::extract::candidate::{generate_candidates, Candidate, Span};
    use crate::extract::patterns::PatternId;

    fn candidate(start: usize, end: usize, digits: &str, pattern_id: PatternId) -> Candidate {
        Candidate {
            raw_text: digits.to_string(),
            span: Span::new(start, end).unwrap(),
            digit_sequence: digits.to_string(),
            pattern_id,
        }
    }

    #[test]
    fn earlier_pattern_wins_ties() {
        let resolved = resolve_overlaps(vec![
            candidate(0, 10, "9876543210", PatternId::Bare10),
            candidate(0, 12, "9876543210", PatternId::Grouped334),
            candidate(0, 12, "9876543210", PatternId::NorthAmerican),
        ]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].pattern_id, PatternId::NorthAmerican);
    }

    #[test]
    fn earliest_start_wins_over_declaration_order() {
        let resolved = resolve_overlaps(vec![
            candidate(3, 15, "2025550173", PatternId::International),
            candidate(1, 15, "12025550173", PatternId::NorthAmerican),
        ]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].span.start, 1);
    }

    #[test]
    fn adjacent_spans_both_survive() {
        let resolved = resolve_overlaps(vec![
            candidate(10, 20, "2345678901", PatternId::Bare10),
            candidate(0, 10, "1234567890", PatternId::Bare10),
        ]);
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].span.start, 0);
        assert_eq!(resolved[1].span.start, 10);
    }

    #[test]
    fn overlap_with_any_accepted_span_rejects() {
        let resolved = resolve_overlaps(vec![
            candidate(0, 30, "123456789012345", PatternId::International),
            candidate(12, 22, "5551234567", PatternId::Bare10),
            candidate(29, 40, "5559876543", PatternId::Grouped334),
        ]);
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn no_accepted_spans_intersect() {
        let text = "+1 (202) 555-0173 / 202.555.0173 / 2025550173, 0987 654 321 98765 43210";
        let resolved = resolve_overlaps(generate_candidates(text));
        assert!(!resolved.is_empty());
        for (index, left) in resolved.iter().enumerate() {
            for right in resolved.iter().skip(index + 1) {
                assert!(!left.span.overlaps(&right.span), "{left:?} vs {right:?}");
            }
        }
    }

    #[test]
    fn empty_input_resolves_to_nothing() {
        assert!(resolve_overlaps(Vec::new()).is_empty());
    }
}
