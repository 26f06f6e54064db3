mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{analysis, comments, completions, export, extract, import, Context};
use crate::error::{exit_code_for, report_error};
use murmur_config as config;
use murmur_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(
    name = "murmur",
    version,
    about = "Pull phone numbers and sentiment out of social media comments"
)]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the phone numbers found in free text
    Extract(extract::ExtractArgs),
    #[command(subcommand)]
    Import(import::ImportCommand),
    /// List recent page posts
    Posts(import::PostsArgs),
    /// List stored comments
    List(comments::ListArgs),
    /// Distinct phone numbers with the number of comments mentioning each
    Phones(comments::PhonesArgs),
    /// Label stored comments as positive, neutral or negative
    Classify(analysis::ClassifyArgs),
    /// Summarize what positive and negative comments have in common
    Takeaways(analysis::TakeawaysArgs),
    #[command(subcommand)]
    Export(export::ExportCommand),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    let command = match command {
        Command::Completions(args) => return completions::emit(args),
        Command::Extract(args) => return extract::extract(json, args),
        command => command,
    };

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
    if verbose {
        match config::resolve_config_path(config_path) {
            Ok(path) if path.exists() => debug!(path = %path.display(), "config resolved"),
            Ok(path) => debug!(path = %path.display(), "config missing, using defaults"),
            Err(err) => debug!(error = %err, "config unavailable"),
        }
    }

    if let Command::Posts(args) = command {
        return import::list_posts(json, &app_config, args);
    }

    let db_path = paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
    debug!(path = %db_path.display(), "database path resolved");

    let store =
        Store::open(&db_path).with_context(|| format!("open database {}", db_path.display()))?;
    store.migrate().with_context(|| "run migrations")?;

    let ctx = Context {
        store: &store,
        json,
        config: &app_config,
    };

    match command {
        Command::Import(cmd) => match cmd {
            import::ImportCommand::Graph(args) => import::import_graph(&ctx, args),
            import::ImportCommand::File(args) => import::import_file(&ctx, args),
        },
        Command::List(args) => comments::list_comments(&ctx, args),
        Command::Phones(args) => comments::list_phones(&ctx, args),
        Command::Classify(args) => analysis::classify(&ctx, args),
        Command::Takeaways(args) => analysis::takeaways(&ctx, args),
        Command::Export(cmd) => match cmd {
            export::ExportCommand::Csv(args) => export::export_csv(&ctx, args),
            export::ExportCommand::Json(args) => export::export_json(&ctx, args),
        },
        Command::Extract(_) | Command::Posts(_) | Command::Completions(_) => {
            unreachable!("command handled before store initialization")
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
