use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Identifies the rule that produced a candidate. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternId {
    International,
    NorthAmerican,
    Grouped334,
    Bare10,
    Grouped433,
    Grouped55,
}

#[derive(Debug, Clone, Copy)]
pub struct PhonePattern {
    pub id: PatternId,
    pub source: &'static str,
}

/// Declaration order is significant: when two candidates start at the same
/// offset, the one whose pattern appears first here wins.
pub const PHONE_PATTERNS: &[PhonePattern] = &[
    // Either one unbroken digit run, or a country code, an optional area
    // code in parentheses, at most two short groups each closed by a
    // separator, and a final group of 4 to 8 digits. The bounded shape keeps
    // a match from running on into the next number.
    PhonePattern {
        id: PatternId::International,
        source: r"\+(?:[0-9]{8,}|[0-9]{1,4}[-.\s]?(?:\([0-9]{1,4}\)[-.\s]?)?(?:[0-9]{1,4}[-.\s]){0,2}[0-9]{4,8})\b",
    },
    PhonePattern {
        id: PatternId::NorthAmerican,
        source: r"(?:(?:\+|\b)1[-.\s]?(?:\([0-9]{3}\)|[0-9]{3})|\([0-9]{3}\)|\b[0-9]{3})[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}\b",
    },
    PhonePattern {
        id: PatternId::Grouped334,
        source: r"\b[0-9]{3}[-.]?[0-9]{3}[-.]?[0-9]{4}\b",
    },
    PhonePattern {
        id: PatternId::Bare10,
        source: r"\b[0-9]{10}\b",
    },
    PhonePattern {
        id: PatternId::Grouped433,
        source: r"\b[0-9]{4}[-.\s]?[0-9]{3}[-.\s]?[0-9]{3}\b",
    },
    PhonePattern {
        id: PatternId::Grouped55,
        source: r"\b[0-9]{5}[-.\s]?[0-9]{5}\b",
    },
];

impl PatternId {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternId::International => "international",
            PatternId::NorthAmerican => "north_american",
            PatternId::Grouped334 => "grouped_3_3_4",
            PatternId::Bare10 => "bare_10",
            PatternId::Grouped433 => "grouped_4_3_3",
            PatternId::Grouped55 => "grouped_5_5",
        }
    }

    /// Position of the pattern in [`PHONE_PATTERNS`].
    pub fn rank(self) -> usize {
        PHONE_PATTERNS
            .iter()
            .position(|pattern| pattern.id == self)
            .unwrap_or(PHONE_PATTERNS.len())
    }
}

impl fmt::Display for PatternId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn compiled() -> &'static [(PatternId, Regex)] {
    static COMPILED: OnceLock<Vec<(PatternId, Regex)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        PHONE_PATTERNS
            .iter()
            .map(|pattern| {
                let regex = Regex::new(pattern.source).expect("phone pattern must compile");
                (pattern.id, regex)
            })
            .collect()
    })
}
