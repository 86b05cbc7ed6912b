use std::time::Duration;

use anyhow::{anyhow, Result};
use bangumi_lib::{fetch_all_rows_with_progress, BrowseSort, Category, Client, ScanOptions};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use crate::output::{print_rows, OutputFormat};

#[derive(Args)]
pub struct ScanArgs {
    /// Subject type: anime or game
    #[arg(long = "type", default_value = "anime")]
    pub subject_type: String,

    /// Listing order: rank or date
    #[arg(long, default_value = "rank")]
    pub sort: String,

    /// Stop after this many subjects (default: all)
    #[arg(long)]
    pub max_items: Option<usize>,

    /// Pause between pages in milliseconds
    #[arg(long, default_value = "500")]
    pub delay_ms: u64,
}

pub async fn run(args: &ScanArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let category: Category = args.subject_type.parse()?;
    let sort = match args.sort.as_str() {
        "date" => BrowseSort::Date,
        "rank" => BrowseSort::Rank,
        other => return Err(anyhow!("unknown sort '{}'. Valid values: rank, date", other)),
    };

    let mut options = ScanOptions::new(category)
        .with_sort(sort)
        .with_delay(Duration::from_millis(args.delay_ms));
    if let Some(max) = args.max_items {
        options = options.with_max_items(max);
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("[{elapsed_precise}] {spinner} {pos} subjects {msg}")?);
    pb.set_message(format!("scanning {}...", category));

    let mut yielded = 0;
    let rows = fetch_all_rows_with_progress(client, options, |progress| {
        pb.inc(progress.page_len as u64);
        if let Some(total) = progress.total {
            pb.set_message(format!("of {}", total));
        }
        yielded = progress.yielded;
    })
    .await?;
    pb.finish_with_message(format!(
        "Scan complete: {} subjects, {} ranked rows",
        yielded,
        rows.len()
    ));

    print_rows(&rows, format);
    Ok(())
}
