use crate::commands::print_json;
use anyhow::{Context as _, Result};
use clap::Args;
use murmur_core::dto::ExtractionDto;
use murmur_core::extract_batch;
use std::fs;
use std::io::{self, BufRead};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Texts to scan; each argument is scanned on its own
    pub text: Vec<String>,
    /// Scan each non-empty line of a file
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,
}

pub fn extract(json: bool, args: ExtractArgs) -> Result<()> {
    let texts = if let Some(path) = args.file.as_ref() {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read input file {}", path.display()))?;
        non_empty_lines(contents.lines())
    } else if !args.text.is_empty() {
        args.text
    } else {
        let stdin = io::stdin().lock();
        let lines = stdin
            .lines()
            .collect::<io::Result<Vec<String>>>()
            .with_context(|| "read stdin")?;
        non_empty_lines(lines.iter().map(String::as_str))
    };

    let results = extract_batch(&texts);
    let rows: Vec<ExtractionDto> = texts
        .into_iter()
        .zip(results)
        .map(|(text, result)| ExtractionDto {
            text,
            phones: result.into_strings(),
        })
        .collect();

    if json {
        return print_json(&rows);
    }
    for row in rows {
        println!("{}", row.phones.join(", "));
    }
    Ok(())
}

fn non_empty_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<String> {
    lines
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
