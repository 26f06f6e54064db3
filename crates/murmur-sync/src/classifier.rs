use murmur_core::analysis::ClassifierError;
use murmur_core::domain::Sentiment;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceOutput {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
    Error { error: String },
}

/// Picks the highest-scoring label from an inference response
/// (`[[{label, score}, ...]]` or the flat variant).
pub fn parse_inference_output(body: &str) -> Result<Sentiment, ClassifierError> {
    let parsed: InferenceOutput = serde_json::from_str(body)
        .map_err(|err| ClassifierError::UnexpectedOutput(err.to_string()))?;
    let scores = match parsed {
        InferenceOutput::Nested(mut outer) => {
            if outer.is_empty() {
                Vec::new()
            } else {
                outer.swap_remove(0)
            }
        }
        InferenceOutput::Flat(scores) => scores,
        InferenceOutput::Error { error } => return Err(ClassifierError::Backend(error)),
    };
    let best = scores
        .into_iter()
        .filter(|entry| entry.score.is_finite())
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(|| ClassifierError::UnexpectedOutput("no labels returned".to_string()))?;
    Sentiment::parse_label(&best.label)
        .map_err(|_| ClassifierError::UnexpectedOutput(format!("unknown label {}", best.label)))
}

#[cfg(feature = "remote-analysis")]
mod imp {
    use super::parse_inference_output;
    use crate::Result;
    use murmur_core::analysis::{ClassifierError, SentimentClassifier};
    use murmur_core::domain::Sentiment;
    use reqwest::blocking::Client;
    use std::time::Duration;
    use url::Url;

    /// Sentiment model behind a hosted inference endpoint.
    #[derive(Debug, Clone)]
    pub struct RemoteClassifier {
        client: Client,
        url: Url,
        model: String,
        api_token: Option<String>,
    }

    impl RemoteClassifier {
        /// Builds the HTTP client; construct once and share across texts.
        pub fn new(endpoint: &str, model: &str, api_token: Option<String>) -> Result<Self> {
            let url = Url::parse(&format!(
                "{}/{}",
                endpoint.trim().trim_end_matches('/'),
                model.trim()
            ))?;
            let client = Client::builder()
                .user_agent(concat!("murmur/", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(30))
                .connect_timeout(Duration::from_secs(10))
                .build()?;
            Ok(Self {
                client,
                url,
                model: model.trim().to_string(),
                api_token,
            })
        }
    }

    impl SentimentClassifier for RemoteClassifier {
        fn name(&self) -> &str {
            &self.model
        }

        fn classify(&self, text: &str) -> std::result::Result<Sentiment, ClassifierError> {
            let mut request = self
                .client
                .post(self.url.clone())
                .json(&serde_json::json!({ "inputs": text }));
            if let Some(token) = &self.api_token {
                request = request.bearer_auth(token);
            }
            let body = request
                .send()
                .and_then(|response| response.text())
                .map_err(|err| ClassifierError::Backend(err.to_string()))?;
            parse_inference_output(&body)
        }
    }
}

#[cfg(not(feature = "remote-analysis"))]
mod imp {
    use crate::{Result, SyncError};
    use murmur_core::analysis::{ClassifierError, SentimentClassifier};
    use murmur_core::domain::Sentiment;

    #[derive(Debug, Clone)]
    pub struct RemoteClassifier {
        _private: (),
    }

    impl RemoteClassifier {
        pub fn new(_endpoint: &str, _model: &str, _api_token: Option<String>) -> Result<Self> {
            Err(SyncError::Unavailable(
                "remote classification requires the remote-analysis feature".to_string(),
            ))
        }
    }

    impl SentimentClassifier for RemoteClassifier {
        fn name(&self) -> &str {
            "remote"
        }

        fn classify(&self, _text: &str) -> std::result::Result<Sentiment, ClassifierError> {
            Err(ClassifierError::Backend(
                "remote classification requires the remote-analysis feature".to_string(),
            ))
        }
    }
}

pub use imp::RemoteClassifier;

#[cfg(test)]
mod tests {
    use super::parse_inference_output;
    use murmur_core::analysis::ClassifierError;
    use murmur_core::domain::Sentiment;

    #[test]
    fn highest_score_wins() {
        let body = r#"[[{"label": "NEU", "score": 0.2}, {"label": "NEG", "score": 0.7}, {"label": "POS", "score": 0.1}]]"#;
        assert_eq!(parse_inference_output(body), Ok(Sentiment::Negative));
    }

    #[test]
    fn flat_output_is_accepted() {
        let body = r#"[{"label": "POS", "score": 0.9}]"#;
        assert_eq!(parse_inference_output(body), Ok(Sentiment::Positive));
    }

    #[test]
    fn loading_model_is_a_backend_error() {
        let body = r#"{"error": "Model is currently loading", "estimated_time": 20.0}"#;
        assert!(matches!(
            parse_inference_output(body),
            Err(ClassifierError::Backend(_))
        ));
    }

    #[test]
    fn unknown_label_is_unexpected_output() {
        let body = r#"[[{"label": "LABEL_7", "score": 1.0}]]"#;
        assert!(matches!(
            parse_inference_output(body),
            Err(ClassifierError::UnexpectedOutput(_))
        ));
        assert!(parse_inference_output("[[]]").is_err());
    }
}
