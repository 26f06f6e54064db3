//! Phone number extraction from free text.
//!
//! Every pattern in [`PHONE_PATTERNS`] is run over the input, overlapping
//! matches are resolved by a left-to-right sweep, and the winners are reduced
//! to unique canonical forms. The whole pipeline is pure and never fails.

pub mod candidate;
pub mod canonical;
pub mod patterns;
pub mod resolve;

pub use candidate::{digit_sequence, generate_candidates, Candidate, Span, MIN_PHONE_DIGITS};
pub use canonical::{canonical_form, canonicalize, CanonicalPhone};
pub use patterns::{PatternId, PhonePattern, PHONE_PATTERNS};
pub use resolve::resolve_overlaps;

use serde::Serialize;

/// Canonical phone numbers found in one text, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtractionResult {
    phones: Vec<CanonicalPhone>,
}

impl ExtractionResult {
    pub fn len(&self) -> usize {
        self.phones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phones.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CanonicalPhone> {
        self.phones.iter()
    }

    pub fn as_slice(&self) -> &[CanonicalPhone] {
        &self.phones
    }

    pub fn contains(&self, normalized: &str) -> bool {
        self.phones.iter().any(|phone| phone.as_str() == normalized)
    }

    pub fn numbers(&self) -> Vec<&str> {
        self.phones.iter().map(CanonicalPhone::as_str).collect()
    }

    pub fn into_strings(self) -> Vec<String> {
        self.phones
            .into_iter()
            .map(CanonicalPhone::into_string)
            .collect()
    }
}

impl IntoIterator for ExtractionResult {
    type Item = CanonicalPhone;
    type IntoIter = std::vec::IntoIter<CanonicalPhone>;

    fn into_iter(self) -> Self::IntoIter {
        self.phones.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExtractionResult {
    type Item = &'a CanonicalPhone;
    type IntoIter = std::slice::Iter<'a, CanonicalPhone>;

    fn into_iter(self) -> Self::IntoIter {
        self.phones.iter()
    }
}

/// Extracts canonical phone numbers from `text`.
///
/// Accepts `&str` or `Option<&str>`; `None` and `""` both yield an empty
/// result.
pub fn extract_phone_numbers<'a>(text: impl Into<Option<&'a str>>) -> ExtractionResult {
    let Some(text) = text.into() else {
        return ExtractionResult::default();
    };
    let candidates = generate_candidates(text);
    if candidates.is_empty() {
        return ExtractionResult::default();
    }
    ExtractionResult {
        phones: canonicalize(resolve_overlaps(candidates)),
    }
}

/// Like [`extract_phone_numbers`], treating invalid UTF-8 as text without
/// numbers.
pub fn extract_phone_numbers_from_bytes(bytes: &[u8]) -> ExtractionResult {
    match std::str::from_utf8(bytes) {
        Ok(text) => extract_phone_numbers(text),
        Err(_) => ExtractionResult::default(),
    }
}

/// Extracts every text independently; output order matches input order.
#[cfg(feature = "parallel")]
pub fn extract_batch<S>(texts: &[S]) -> Vec<ExtractionResult>
where
    S: AsRef<str> + Sync,
{
    use rayon::prelude::*;

    texts
        .par_iter()
        .map(|text| extract_phone_numbers(text.as_ref()))
        .collect()
}

/// Extracts every text independently; output order matches input order.
#[cfg(not(feature = "parallel"))]
pub fn extract_batch<S>(texts: &[S]) -> Vec<ExtractionResult>
where
    S: AsRef<str>,
{
    texts
        .iter()
        .map(|text| extract_phone_numbers(text.as_ref()))
        .collect()
}
