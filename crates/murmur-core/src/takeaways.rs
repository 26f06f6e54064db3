//! Prompt construction and response parsing for comment takeaways.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const MAX_TAKEAWAY_COMMENTS: usize = 40;

const POSITIVE_START: &str = "[POSITIVE_START]";
const POSITIVE_END: &str = "[POSITIVE_END]";
const NEGATIVE_START: &str = "[NEGATIVE_START]";
const NEGATIVE_END: &str = "[NEGATIVE_END]";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Takeaways {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
}

impl Takeaways {
    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TakeawayRequest {
    positive: Vec<String>,
    negative: Vec<String>,
}

impl TakeawayRequest {
    /// Keeps at most [`MAX_TAKEAWAY_COMMENTS`] texts per side.
    pub fn new<P, N>(positive: P, negative: N) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        Self {
            positive: take_comments(positive),
            negative: take_comments(negative),
        }
    }

    pub fn positive(&self) -> &[String] {
        &self.positive
    }

    pub fn negative(&self) -> &[String] {
        &self.negative
    }

    pub fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }

    pub fn prompt(&self) -> String {
        let positive = bullet_list(&self.positive);
        let negative = bullet_list(&self.negative);
        format!(
            "Analyze these social media comments and provide insights.

POSITIVE COMMENTS:
{positive}

NEGATIVE COMMENTS:
{negative}

Task:
1. For POSITIVE comments, extract 5-8 key takeaways and 2-3 actionable improvements.
2. For NEGATIVE comments, extract 5-8 key takeaways and 2-3 actionable improvements.

Format the output EXACTLY as follows:
{POSITIVE_START}
KEY TAKEAWAYS
* **Key Point**: Description
ACTIONABLE IMPROVEMENTS
* **Improvement**: Description
{POSITIVE_END}

{NEGATIVE_START}
KEY TAKEAWAYS
* **Key Point**: Description
ACTIONABLE IMPROVEMENTS
* **Improvement**: Description
{NEGATIVE_END}

Rules:
- NO preamble or intro/outro.
- Use neutral, professional language.
"
        )
    }
}

/// Pulls the lines between each delimiter pair out of a model response.
/// A side whose delimiters are missing yields an empty list.
pub fn parse_takeaways(response: &str) -> Takeaways {
    static SECTIONS: OnceLock<(Regex, Regex)> = OnceLock::new();
    let (positive, negative) = SECTIONS.get_or_init(|| {
        (
            section_regex(POSITIVE_START, POSITIVE_END),
            section_regex(NEGATIVE_START, NEGATIVE_END),
        )
    });

    Takeaways {
        positive: section_lines(positive, response),
        negative: section_lines(negative, response),
    }
}

fn section_regex(start: &str, end: &str) -> Regex {
    let source = format!("(?s){}(.*?){}", regex::escape(start), regex::escape(end));
    Regex::new(&source).expect("takeaway section pattern must compile")
}

fn section_lines(regex: &Regex, response: &str) -> Vec<String> {
    let Some(body) = regex.captures(response).and_then(|caps| caps.get(1)) else {
        return Vec::new();
    };
    body.as_str()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn take_comments<I>(items: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    items
        .into_iter()
        .map(|item| -> String { item.into() })
        .filter(|text| !text.trim().is_empty())
        .take(MAX_TAKEAWAY_COMMENTS)
        .collect()
}

fn bullet_list(items: &[String]) -> String {
    if items.is_empty() {
        return "None".to_string();
    }
    items
        .iter()
        .map(|item| format!("- {}", item.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::{parse_takeaways, TakeawayRequest, MAX_TAKEAWAY_COMMENTS};

    #[test]
    fn parses_both_sections() {
        let response = "[POSITIVE_START]\nKEY TAKEAWAYS\n* **Speed**: fast replies\n\n[POSITIVE_END]\n\
                        [NEGATIVE_START]\n  * **Price**: too high  \n[NEGATIVE_END]";
        let takeaways = parse_takeaways(response);
        assert_eq!(
            takeaways.positive,
            vec!["KEY TAKEAWAYS", "* **Speed**: fast replies"]
        );
        assert_eq!(takeaways.negative, vec!["* **Price**: too high"]);
    }

    #[test]
    fn missing_delimiters_yield_empty_side() {
        let takeaways = parse_takeaways("[POSITIVE_START]\n* good\n[POSITIVE_END]\n[NEGATIVE_START] cut off");
        assert_eq!(takeaways.positive, vec!["* good"]);
        assert!(takeaways.negative.is_empty());
        assert!(parse_takeaways("free text with no markers").is_empty());
    }

    #[test]
    fn request_caps_each_side() {
        let many: Vec<String> = (0..100).map(|i| format!("comment {i}")).collect();
        let request = TakeawayRequest::new(many.clone(), many);
        assert_eq!(request.positive().len(), MAX_TAKEAWAY_COMMENTS);
        assert_eq!(request.negative().len(), MAX_TAKEAWAY_COMMENTS);
        assert_eq!(request.positive()[0], "comment 0");
    }

    #[test]
    fn prompt_marks_empty_side_as_none() {
        let request = TakeawayRequest::new(vec!["love it"], Vec::<String>::new());
        let prompt = request.prompt();
        assert!(prompt.contains("POSITIVE COMMENTS:\n- love it"));
        assert!(prompt.contains("NEGATIVE COMMENTS:\nNone"));
        assert!(prompt.contains("[NEGATIVE_END]"));
    }

    #[test]
    fn blank_comments_are_dropped() {
        let request = TakeawayRequest::new(vec!["  ", ""], vec!["bad"]);
        assert!(request.positive().is_empty());
        assert!(!request.is_empty());
    }
}
