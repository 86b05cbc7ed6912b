use std::path::PathBuf;

use anyhow::{Context, Result};
use bangumi_lib::{select_monthly_best, Row};
use clap::Args;

use crate::output::{print_monthly, OutputFormat};

#[derive(Args)]
pub struct MonthlyBestArgs {
    /// JSON file holding an array of rows (e.g. from `scan --output json`)
    pub file: PathBuf,
}

pub fn run(args: &MonthlyBestArgs, format: &OutputFormat) -> Result<()> {
    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let rows: Vec<Row> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of rows", args.file.display()))?;

    let best = select_monthly_best(&rows);
    eprintln!(
        "{} rows, streak of {} consecutive months",
        rows.len(),
        best.streak_len()
    );

    print_monthly(&best, format);
    Ok(())
}
