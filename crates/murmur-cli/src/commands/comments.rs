use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::util::{format_timestamp_datetime, preview, SentimentArg};
use anyhow::Result;
use clap::Args;
use murmur_core::dto::CommentRowDto;
use murmur_store::repo::CommentQuery;

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only comments that mention at least one phone number
    #[arg(long)]
    pub with_phones: bool,
    #[arg(long, value_enum)]
    pub sentiment: Option<SentimentArg>,
    #[arg(long)]
    pub limit: Option<i64>,
}

#[derive(Debug, Args)]
pub struct PhonesArgs {
    #[arg(long)]
    pub limit: Option<usize>,
}

pub fn list_comments(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    if matches!(args.limit, Some(limit) if limit <= 0) {
        return Err(invalid_input("--limit must be positive"));
    }
    let comments = ctx.store.comments().list(&CommentQuery {
        with_phones_only: args.with_phones,
        sentiment: args.sentiment.map(Into::into),
        unclassified_only: false,
        limit: args.limit,
    })?;

    if ctx.json {
        let rows: Vec<CommentRowDto> = comments.iter().map(CommentRowDto::from).collect();
        return print_json(&rows);
    }

    if comments.is_empty() {
        println!("No comments found.");
        return Ok(());
    }
    for comment in &comments {
        let phones = if comment.phones.is_empty() {
            "-".to_string()
        } else {
            comment.phones.join(", ")
        };
        let sentiment = comment.sentiment.map(|s| s.as_str()).unwrap_or("-");
        println!(
            "{}  {}  [{}]  {}  {}",
            format_timestamp_datetime(comment.created_at),
            comment.author.display_name(),
            sentiment,
            phones,
            preview(&comment.message)
        );
    }
    Ok(())
}

pub fn list_phones(ctx: &Context<'_>, args: PhonesArgs) -> Result<()> {
    if args.limit == Some(0) {
        return Err(invalid_input("--limit must be positive"));
    }
    let mut summary = ctx.store.phones().summary()?;
    if let Some(limit) = args.limit {
        summary.truncate(limit);
    }

    if ctx.json {
        return print_json(&summary);
    }
    if summary.is_empty() {
        println!("No phone numbers found.");
        return Ok(());
    }
    for row in summary {
        println!("{}\t{}", row.phone, row.comment_count);
    }
    Ok(())
}
