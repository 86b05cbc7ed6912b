use std::str::FromStr;

use bangumi_lib::{MonthlyBest, Row, UNRANKED};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(anyhow::anyhow!(
                "unknown output format '{}'. Valid values: table, json, markdown",
                other
            )),
        }
    }
}

#[derive(Tabled)]
struct RankingRow {
    #[tabled(rename = "Rank")]
    rank: String,
    #[tabled(rename = "Title")]
    name_cn: String,
    #[tabled(rename = "Original")]
    name: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Votes")]
    score_total: u64,
    #[tabled(rename = "Link")]
    link: String,
}

#[derive(Tabled, Serialize)]
struct MonthlyRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Title")]
    name_cn: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Votes")]
    score_total: u64,
    #[tabled(rename = "Link")]
    link: String,
}

// -- Row builders --

fn build_ranking_rows(rows: &[Row]) -> Vec<RankingRow> {
    rows.iter()
        .map(|r| RankingRow {
            rank: format_rank(r.rank),
            name_cn: r.name_cn.clone(),
            name: r.name.clone(),
            date: r.date.clone(),
            score: format_score(r.score),
            score_total: r.score_total,
            link: subject_link(r.id),
        })
        .collect()
}

fn build_monthly_rows(best: &MonthlyBest<'_, Row>) -> Vec<MonthlyRow> {
    best.picks
        .iter()
        .map(|p| MonthlyRow {
            month: p.month.to_string(),
            name_cn: p.record.name_cn.clone(),
            date: p.record.date.clone(),
            score: format_score(p.record.score),
            score_total: p.record.score_total,
            link: subject_link(p.record.id),
        })
        .collect()
}

fn render<T: Tabled>(rows: Vec<T>, format: &OutputFormat) -> String {
    let mut table = Table::new(rows);
    if *format == OutputFormat::Markdown {
        table.with(Style::markdown());
    }
    table.to_string()
}

pub fn print_rows(rows: &[Row], format: &OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&rows),
        _ => println!("{}", render(build_ranking_rows(rows), format)),
    }
}

pub fn print_monthly(best: &MonthlyBest<'_, Row>, format: &OutputFormat) {
    let rows = build_monthly_rows(best);
    match format {
        OutputFormat::Json => print_json(&rows),
        _ => println!("{}", render(rows, format)),
    }
}

// -- JSON output --

pub fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn format_rank(rank: i64) -> String {
    if rank == UNRANKED {
        "-".to_string()
    } else {
        rank.to_string()
    }
}

fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{:.1}", s),
        None => "-".to_string(),
    }
}

fn subject_link(id: i64) -> String {
    format!("https://bgm.tv/subject/{}", id)
}
