use crate::{Result, SyncError};
use murmur_core::takeaways::{parse_takeaways, TakeawayRequest, Takeaways};
use serde::Deserialize;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// A text-generation service that turns a prompt into free text.
pub trait Summarizer {
    fn summarizer_name(&self) -> &'static str;
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Asks the summarizer for takeaways. An empty request never reaches the
/// service; a response without the expected sections yields empty lists.
pub fn generate_takeaways<S>(summarizer: &S, request: &TakeawayRequest) -> Result<Takeaways>
where
    S: Summarizer + ?Sized,
{
    if request.is_empty() {
        return Ok(Takeaways::default());
    }
    tracing::debug!(
        summarizer = summarizer.summarizer_name(),
        positive = request.positive().len(),
        negative = request.negative().len(),
        "requesting takeaways"
    );
    let response = summarizer.generate(&request.prompt())?;
    Ok(parse_takeaways(&response))
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
}

/// Joins the text parts of the first candidate in a `generateContent`
/// response. No candidate means an empty answer.
pub fn parse_generate_response(body: &str) -> Result<String> {
    let parsed: GenerateResponse = serde_json::from_str(body)?;
    if let Some(error) = parsed.error {
        return Err(SyncError::Api(
            error
                .message
                .unwrap_or_else(|| "unknown generation error".to_string()),
        ));
    }
    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    Ok(text)
}

#[cfg(feature = "remote-analysis")]
mod imp {
    use super::{parse_generate_response, Summarizer, GEMINI_BASE_URL};
    use crate::{Result, SyncError};
    use reqwest::blocking::Client;
    use std::time::Duration;
    use url::Url;

    #[derive(Debug, Clone)]
    pub struct GeminiSummarizer {
        client: Client,
        url: Url,
        api_key: String,
    }

    impl GeminiSummarizer {
        /// Builds the HTTP client once; reuse the summarizer across calls.
        pub fn new(api_key: impl Into<String>, model: &str) -> Result<Self> {
            let url = Url::parse(&format!("{GEMINI_BASE_URL}/{}:generateContent", model.trim()))?;
            let client = Client::builder()
                .user_agent(concat!("murmur/", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(60))
                .connect_timeout(Duration::from_secs(10))
                .build()?;
            Ok(Self {
                client,
                url,
                api_key: api_key.into(),
            })
        }
    }

    impl Summarizer for GeminiSummarizer {
        fn summarizer_name(&self) -> &'static str {
            "gemini"
        }

        fn generate(&self, prompt: &str) -> Result<String> {
            let body = serde_json::json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            });
            let response = self
                .client
                .post(self.url.clone())
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()?;
            let status = response.status();
            let text = response.text()?;
            match parse_generate_response(&text) {
                Ok(answer) if status.is_success() => Ok(answer),
                Err(err @ SyncError::Api(_)) => Err(err),
                _ => Err(SyncError::Api(format!("unexpected status {status}"))),
            }
        }
    }
}

#[cfg(not(feature = "remote-analysis"))]
mod imp {
    use super::Summarizer;
    use crate::{Result, SyncError};

    #[derive(Debug, Clone)]
    pub struct GeminiSummarizer {
        _private: (),
    }

    impl GeminiSummarizer {
        pub fn new(_api_key: impl Into<String>, _model: &str) -> Result<Self> {
            Err(SyncError::Unavailable(
                "takeaway generation requires the remote-analysis feature".to_string(),
            ))
        }
    }

    impl Summarizer for GeminiSummarizer {
        fn summarizer_name(&self) -> &'static str {
            "gemini"
        }

        fn generate(&self, _prompt: &str) -> Result<String> {
            Err(SyncError::Unavailable(
                "takeaway generation requires the remote-analysis feature".to_string(),
            ))
        }
    }
}

pub use imp::GeminiSummarizer;
