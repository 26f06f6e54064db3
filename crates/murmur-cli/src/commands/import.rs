use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::util::{format_timestamp_datetime, now_utc, preview};
use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use murmur_config::{AppConfig, MAX_COMMENT_LIMIT};
use murmur_core::domain::CommentAuthor;
use murmur_store::repo::{CommentInsert, CommentNew};
use murmur_sync::file::FileSource;
use murmur_sync::graph::{self, GraphAuth, GraphSource};
use murmur_sync::time::parse_graph_time;
use murmur_sync::{CommentSource, ImportReport, RawComment};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_POST_LIMIT: u32 = 10;

#[derive(Debug, Subcommand)]
pub enum ImportCommand {
    /// Fetch the comments of one page post from the Graph API
    Graph(ImportGraphArgs),
    /// Read comments from a JSON rows file or a text file
    File(ImportFileArgs),
}

#[derive(Debug, Args)]
pub struct ImportGraphArgs {
    #[arg(long)]
    pub post_id: String,
    #[arg(long)]
    pub limit: Option<u32>,
}

#[derive(Debug, Args)]
pub struct ImportFileArgs {
    pub path: PathBuf,
    /// Column holding the comment text in JSON rows
    #[arg(long)]
    pub column: Option<String>,
}

#[derive(Debug, Args)]
pub struct PostsArgs {
    #[arg(long)]
    pub limit: Option<u32>,
}

pub fn import_graph(ctx: &Context<'_>, args: ImportGraphArgs) -> Result<()> {
    let post_id = args.post_id.trim();
    if post_id.is_empty() {
        return Err(invalid_input("--post-id cannot be empty"));
    }
    let limit = comment_limit(args.limit, ctx.config.graph.comment_limit)?;
    let auth = graph_auth(ctx.config)?;
    let source = GraphSource::new(auth, post_id, limit);
    let comments = source
        .fetch_comments()
        .with_context(|| format!("fetch comments for post {post_id}"))?;

    let report = store_comments(ctx, ImportReport::new(source.source_name()), comments)?;
    print_report(ctx, &report)
}

pub fn import_file(ctx: &Context<'_>, args: ImportFileArgs) -> Result<()> {
    let column = args
        .column
        .as_deref()
        .map(str::trim)
        .filter(|column| !column.is_empty())
        .unwrap_or(ctx.config.import.text_column.as_str());
    let source = FileSource::new(&args.path, column);
    let batch = source
        .load()
        .with_context(|| format!("read comments from {}", args.path.display()))?;

    let mut report = ImportReport::new(source.source_name());
    report.skipped = batch.skipped;
    report.warnings = batch.warnings;
    let report = store_comments(ctx, report, batch.comments)?;
    print_report(ctx, &report)
}

pub fn list_posts(json: bool, config: &AppConfig, args: PostsArgs) -> Result<()> {
    let limit = comment_limit(args.limit, DEFAULT_POST_LIMIT)?;
    let auth = graph_auth(config)?;
    let posts = graph::list_posts(&auth, limit).with_context(|| "list page posts")?;

    if json {
        return print_json(&posts);
    }
    if posts.is_empty() {
        println!("No posts found.");
        return Ok(());
    }
    for post in posts {
        let created = post
            .created_time
            .as_deref()
            .and_then(parse_graph_time);
        let message = post.message.as_deref().map(preview).unwrap_or_default();
        println!(
            "{}  {}  {}",
            post.id,
            format_timestamp_datetime(created),
            message
        );
    }
    Ok(())
}

fn graph_auth(config: &AppConfig) -> Result<GraphAuth> {
    let credentials = config
        .graph
        .credentials()
        .with_context(|| "graph credentials")?;
    Ok(GraphAuth {
        page_id: credentials.page_id,
        access_token: credentials.access_token,
        api_version: config.graph.api_version.clone(),
    })
}

fn comment_limit(requested: Option<u32>, default: u32) -> Result<u32> {
    let limit = requested.unwrap_or(default);
    if limit == 0 || limit > MAX_COMMENT_LIMIT {
        return Err(invalid_input(format!(
            "--limit must be between 1 and {MAX_COMMENT_LIMIT}"
        )));
    }
    Ok(limit)
}

fn store_comments(
    ctx: &Context<'_>,
    mut report: ImportReport,
    comments: Vec<RawComment>,
) -> Result<ImportReport> {
    let now = now_utc();
    for raw in comments {
        let input = comment_new(raw, &mut report.warnings);
        match ctx.store.comments().insert(now, input) {
            Ok(outcome) => {
                let comment = outcome.comment();
                if comment.has_phone() {
                    report.with_phones += 1;
                    report.phones_found += comment.phones.len();
                }
                match outcome {
                    CommentInsert::Created(_) => report.created += 1,
                    CommentInsert::Updated(_) => report.updated += 1,
                }
            }
            Err(err) if err.is_rejected_comment() => {
                report.skipped += 1;
                report.warnings.push(format!("skipping comment: {err}"));
            }
            Err(err) => return Err(err).with_context(|| "store comment"),
        }
    }
    debug!(
        source = %report.source,
        created = report.created,
        updated = report.updated,
        "import finished"
    );
    Ok(report)
}

fn comment_new(raw: RawComment, warnings: &mut Vec<String>) -> CommentNew {
    let created_at = match raw.created_time.as_deref() {
        Some(value) => {
            let parsed = parse_graph_time(value);
            if parsed.is_none() {
                warnings.push(format!("unrecognized timestamp {value:?}; stored without one"));
            }
            parsed
        }
        None => None,
    };
    CommentNew {
        external_id: raw.external_id,
        post_id: raw.post_id,
        author: CommentAuthor {
            id: raw.author_id,
            name: raw.author_name,
        },
        message: raw.message,
        created_at,
        like_count: raw.like_count,
    }
}

fn print_report(ctx: &Context<'_>, report: &ImportReport) -> Result<()> {
    if ctx.json {
        return print_json(report);
    }

    println!(
        "Imported {} comments: created {}, updated {}, skipped {}",
        report.source, report.created, report.updated, report.skipped
    );
    println!(
        "Comments with phone numbers: {} ({:.1}%)",
        report.with_phones,
        report.phone_share()
    );
    println!("Phone numbers found: {}", report.phones_found);
    if !report.warnings.is_empty() {
        println!("Warnings:");
        for warning in &report.warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{comment_limit, comment_new};
    use murmur_sync::RawComment;

    #[test]
    fn limit_must_be_in_range() {
        assert_eq!(comment_limit(None, 100).expect("default"), 100);
        assert_eq!(comment_limit(Some(500), 100).expect("max"), 500);
        assert!(comment_limit(Some(0), 100).is_err());
        assert!(comment_limit(Some(501), 100).is_err());
    }

    #[test]
    fn bad_timestamp_is_dropped_with_warning() {
        let mut warnings = Vec::new();
        let input = comment_new(
            RawComment {
                message: "hi".to_string(),
                created_time: Some("last tuesday".to_string()),
                ..RawComment::default()
            },
            &mut warnings,
        );
        assert!(input.created_at.is_none());
        assert_eq!(warnings.len(), 1);
    }
}
