use crate::commands::{print_json, Context};
use crate::util::now_utc;
use anyhow::{Context as _, Result};
use clap::Args;
use murmur_config::{ClassifierBackend, ClassifierConfig};
use murmur_core::analysis::{ClassificationReport, LexiconClassifier, SentimentClassifier};
use murmur_core::domain::Sentiment;
use murmur_core::takeaways::{TakeawayRequest, Takeaways};
use murmur_store::repo::CommentQuery;
use murmur_sync::classifier::RemoteClassifier;
use murmur_sync::summarize::{generate_takeaways, GeminiSummarizer};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Classify every stored comment, replacing existing labels
    #[arg(long)]
    pub reclassify: bool,
}

#[derive(Debug, Args)]
pub struct TakeawaysArgs {}

#[derive(Debug, Serialize)]
struct ClassifyOutput {
    classifier: String,
    classified: usize,
    failures: usize,
    report: ClassificationReport,
}

/// Builds the configured classifier. The lexicon backend is cheap; the
/// remote backend builds an HTTP client and is meant to be built once.
pub fn build_classifier(config: &ClassifierConfig) -> Result<Box<dyn SentimentClassifier>> {
    match config.backend {
        ClassifierBackend::Lexicon => Ok(Box::new(LexiconClassifier::new())),
        ClassifierBackend::Remote => {
            let classifier =
                RemoteClassifier::new(&config.endpoint, &config.model, config.api_token.clone())
                    .with_context(|| "build remote classifier")?;
            Ok(Box::new(classifier))
        }
    }
}

pub fn classify(ctx: &Context<'_>, args: ClassifyArgs) -> Result<()> {
    let classifier = build_classifier(&ctx.config.classifier)?;
    let pending = ctx.store.comments().list(&CommentQuery {
        unclassified_only: !args.reclassify,
        ..CommentQuery::default()
    })?;
    debug!(
        classifier = classifier.name(),
        pending = pending.len(),
        "classifying comments"
    );

    let now = now_utc();
    let mut classified = 0;
    let mut failures = 0;
    for comment in &pending {
        match classifier.classify(&comment.message) {
            Ok(sentiment) => {
                ctx.store
                    .comments()
                    .set_sentiment(now, comment.id, Some(sentiment))?;
                classified += 1;
            }
            Err(err) => {
                warn!(comment = %comment.id, error = %err, "classification failed");
                failures += 1;
            }
        }
    }

    let labeled = ctx
        .store
        .comments()
        .list_all()?
        .into_iter()
        .filter_map(|comment| comment.sentiment.map(|sentiment| (comment.message, sentiment)));
    let mut report = ClassificationReport::from_labeled(labeled);
    report.failures = failures;

    if ctx.json {
        return print_json(&ClassifyOutput {
            classifier: classifier.name().to_string(),
            classified,
            failures,
            report,
        });
    }

    println!(
        "Classified {} comments with {} ({} failed)",
        classified,
        classifier.name(),
        failures
    );
    for sentiment in Sentiment::ALL {
        let percentage = match sentiment {
            Sentiment::Positive => report.percentages.positive,
            Sentiment::Neutral => report.percentages.neutral,
            Sentiment::Negative => report.percentages.negative,
        };
        println!(
            "{}: {} ({:.2}%)",
            sentiment,
            report.counts.get(sentiment),
            percentage
        );
    }
    Ok(())
}

pub fn takeaways(ctx: &Context<'_>, _args: TakeawaysArgs) -> Result<()> {
    let request = TakeawayRequest::new(
        messages(ctx, Sentiment::Positive)?,
        messages(ctx, Sentiment::Negative)?,
    );

    let takeaways = if request.is_empty() {
        if !ctx.json {
            println!("No positive or negative comments; run `murmur classify` first.");
            return Ok(());
        }
        Takeaways::default()
    } else {
        let config = &ctx.config.summarizer;
        let summarizer = GeminiSummarizer::new(config.api_key()?, &config.model)
            .with_context(|| "build summarizer")?;
        generate_takeaways(&summarizer, &request).with_context(|| "generate takeaways")?
    };

    if ctx.json {
        return print_json(&takeaways);
    }
    print_section("Positive takeaways", &takeaways.positive);
    print_section("Negative takeaways", &takeaways.negative);
    Ok(())
}

fn messages(ctx: &Context<'_>, sentiment: Sentiment) -> Result<Vec<String>> {
    let comments = ctx.store.comments().list(&CommentQuery {
        sentiment: Some(sentiment),
        ..CommentQuery::default()
    })?;
    Ok(comments.into_iter().map(|comment| comment.message).collect())
}

fn print_section(title: &str, lines: &[String]) {
    println!("{title}:");
    if lines.is_empty() {
        println!("  (none)");
    }
    for line in lines {
        println!("  {line}");
    }
}

#[cfg(test)]
mod tests {
    use super::build_classifier;
    use murmur_config::ClassifierConfig;
    use murmur_core::domain::Sentiment;

    #[test]
    fn default_backend_is_the_lexicon() {
        let classifier = build_classifier(&ClassifierConfig::default()).expect("classifier");
        assert_eq!(
            classifier.classify("love this, great work").expect("classify"),
            Sentiment::Positive
        );
    }
}
