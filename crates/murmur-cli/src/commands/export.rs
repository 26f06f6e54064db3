use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use murmur_core::dto::CommentRowDto;
use murmur_store::repo::CommentQuery;
use murmur_sync::export;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Subcommand)]
pub enum ExportCommand {
    /// Spreadsheet-friendly CSV, one row per comment
    Csv(ExportArgs),
    Json(ExportArgs),
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Only comments that mention at least one phone number
    #[arg(long)]
    pub with_phones: bool,
}

#[derive(Debug, Serialize)]
struct ExportReport {
    format: String,
    count: usize,
    output: Option<String>,
}

pub fn export_csv(ctx: &Context<'_>, args: ExportArgs) -> Result<()> {
    let rows = load_rows(ctx, args.with_phones)?;
    let data = export::export_csv(&rows);
    write_export(ctx, "csv", rows.len(), args.out.as_deref(), &data)
}

pub fn export_json(ctx: &Context<'_>, args: ExportArgs) -> Result<()> {
    let rows = load_rows(ctx, args.with_phones)?;
    let mut data = export::export_json(&rows)?;
    data.push('\n');
    write_export(ctx, "json", rows.len(), args.out.as_deref(), &data)
}

fn load_rows(ctx: &Context<'_>, with_phones: bool) -> Result<Vec<CommentRowDto>> {
    let comments = ctx.store.comments().list(&CommentQuery {
        with_phones_only: with_phones,
        ..CommentQuery::default()
    })?;
    Ok(comments.iter().map(CommentRowDto::from).collect())
}

fn write_export(
    ctx: &Context<'_>,
    format: &str,
    count: usize,
    out: Option<&Path>,
    data: &str,
) -> Result<()> {
    if ctx.json && out.is_none() {
        return Err(invalid_input("--json requires --out for export commands"));
    }

    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("create export directory {}", parent.display()))?;
                }
            }
            fs::write(path, data)
                .with_context(|| format!("write export file {}", path.display()))?;
            if ctx.json {
                print_json(&ExportReport {
                    format: format.to_string(),
                    count,
                    output: Some(path.display().to_string()),
                })?;
            } else {
                println!("Exported {} comments to {}", count, path.display());
            }
            Ok(())
        }
        None => {
            print!("{}", data);
            Ok(())
        }
    }
}
