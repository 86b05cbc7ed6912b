use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use bangumi_lib::validation;
use bangumi_lib::{filter_rows, find_subject, read_archive, Category, LocalFilters, YearMonth};
use clap::Args;

use crate::output::{print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct ArchiveArgs {
    /// Path to subject.jsonlines
    pub file: PathBuf,

    /// Subject type to print: anime or game
    #[arg(long = "type", default_value = "anime")]
    pub subject_type: String,

    /// Print the raw archive entry with this id instead
    #[arg(long)]
    pub id: Option<i64>,

    /// Match against the Chinese or original title
    #[arg(long)]
    pub name: Option<String>,

    /// First month to keep (YYYY-MM)
    #[arg(long)]
    pub from_month: Option<String>,

    /// Last month to keep (YYYY-MM)
    #[arg(long)]
    pub to_month: Option<String>,

    /// Minimum score (0-10)
    #[arg(long)]
    pub score_min: Option<f64>,

    /// Maximum score (0-10)
    #[arg(long)]
    pub score_max: Option<f64>,

    /// Minimum number of ratings
    #[arg(long, default_value = "0")]
    pub votes_min: u64,

    /// Tag that must be present; repeat or separate with commas
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Sort column: rank, score, votes, date or name
    #[arg(long, default_value = "rank")]
    pub sort: String,

    /// Sort direction: asc or desc (rank is always ascending)
    #[arg(long, default_value = "desc")]
    pub order: String,
}

fn parse_month(flag: &str, value: Option<&str>) -> Result<Option<YearMonth>> {
    value
        .map(|v| YearMonth::parse(v).ok_or_else(|| anyhow!("invalid --{} '{}', expected YYYY-MM", flag, v)))
        .transpose()
}

pub fn build_filters(args: &ArchiveArgs) -> Result<LocalFilters> {
    let (score_min, score_max) = validation::validate_rating_range(args.score_min, args.score_max)?;
    Ok(LocalFilters {
        name: args.name.clone(),
        from: parse_month("from-month", args.from_month.as_deref())?,
        to: parse_month("to-month", args.to_month.as_deref())?,
        score_min,
        score_max,
        votes_min: args.votes_min,
        tags: validation::validate_tags(&args.tags)?,
        sort: args.sort.parse()?,
        order: args.order.parse()?,
    })
}

pub fn run(args: &ArchiveArgs, format: &OutputFormat) -> Result<()> {
    let open = || {
        File::open(&args.file)
            .map(BufReader::new)
            .with_context(|| format!("failed to open {}", args.file.display()))
    };

    if let Some(id) = args.id {
        let found = find_subject(open()?, id)?;
        return match found {
            Some(value) => {
                print_json(&value);
                Ok(())
            }
            None => Err(anyhow!("subject {} not found in {}", id, args.file.display())),
        };
    }

    let category: Category = args.subject_type.parse()?;
    let filters = build_filters(args)?;
    let split = read_archive(open()?)?;
    let rows = filter_rows(split.rows(category), &filters)?;
    eprintln!(
        "{} anime, {} game; skipped {} undated, {} unranked, {} malformed lines; {} {} rows match",
        split.anime.len(),
        split.game.len(),
        split.skipped_undated,
        split.skipped_unranked,
        split.malformed,
        rows.len(),
        category
    );

    print_rows(&rows, format);
    Ok(())
}
