use anyhow::Result;
use bangumi_lib::validation;
use bangumi_lib::{fetch_ranking, Category, Client, RankedRequest, RankingFilters};
use clap::Args;

use crate::output::{print_rows, OutputFormat};

#[derive(Args)]
pub struct RankingArgs {
    /// Subject type: anime or game
    #[arg(long = "type", default_value = "anime")]
    pub subject_type: String,

    /// Number of rows to fetch
    #[arg(long, default_value = "100")]
    pub limit: usize,

    /// First air year (inclusive); requires --to-year
    #[arg(long, requires = "to_year")]
    pub from_year: Option<i32>,

    /// Last air year (inclusive); requires --from-year
    #[arg(long, requires = "from_year")]
    pub to_year: Option<i32>,

    /// Air-date bound such as ">=2020-01-01" (repeatable)
    #[arg(long)]
    pub air_date: Vec<String>,

    /// Minimum score (0-10)
    #[arg(long)]
    pub rating_min: Option<f64>,

    /// Maximum score (0-10)
    #[arg(long)]
    pub rating_max: Option<f64>,

    /// Minimum number of ratings
    #[arg(long)]
    pub rating_count_min: Option<u32>,

    /// Tag filter; repeat or separate with commas
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Free-text search term
    #[arg(long)]
    pub keyword: Option<String>,

    /// Keep subjects without a site rank (only returned when filtering)
    #[arg(long)]
    pub include_unranked: bool,
}

pub fn build_request(args: &RankingArgs) -> Result<RankedRequest> {
    let category: Category = args.subject_type.parse()?;
    let target = validation::validate_target_count(args.limit)?;

    let mut air_date = Vec::new();
    if let (Some(from), Some(to)) = (args.from_year, args.to_year) {
        air_date.extend(validation::air_date_years(from, to)?);
    }
    for expr in &args.air_date {
        air_date.push(validation::validate_air_date_expr(expr)?);
    }
    let (rating_min, rating_max) =
        validation::validate_rating_range(args.rating_min, args.rating_max)?;

    let filters = RankingFilters {
        air_date,
        rating_min,
        rating_max,
        rating_count_min: args.rating_count_min,
        meta_tags: validation::validate_tags(&args.tags)?,
        keyword: args.keyword.clone(),
    };

    Ok(RankedRequest::new(category, target)
        .with_filters(filters)
        .with_only_ranked(!args.include_unranked))
}

pub async fn run(args: &RankingArgs, client: &Client, format: &OutputFormat) -> Result<()> {
    let request = build_request(args)?;
    let rows = fetch_ranking(client, &request).await?;
    let fetched = rows.len();
    let rows = request.apply_view(rows);

    eprintln!(
        "{} {} rows via {:?} ({} shown)",
        fetched,
        request.category,
        request.strategy(),
        rows.len()
    );

    print_rows(&rows, format);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bangumi_lib::RetrievalStrategy;

    fn args() -> RankingArgs {
        RankingArgs {
            subject_type: "anime".to_string(),
            limit: 100,
            from_year: None,
            to_year: None,
            air_date: vec![],
            rating_min: None,
            rating_max: None,
            rating_count_min: None,
            tags: vec![],
            keyword: None,
            include_unranked: false,
        }
    }

    #[test]
    fn plain_args_browse() {
        let request = build_request(&args()).unwrap();
        assert_eq!(request.category, Category::Anime);
        assert_eq!(request.strategy(), RetrievalStrategy::Browse);
        assert!(request.only_ranked);
    }

    #[test]
    fn year_span_and_tags_search() {
        let mut a = args();
        a.subject_type = "game".to_string();
        a.from_year = Some(2000);
        a.to_year = Some(2010);
        a.tags = vec!["RPG, 原创".to_string()];
        a.include_unranked = true;
        let request = build_request(&a).unwrap();
        assert_eq!(request.category, Category::Game);
        assert_eq!(request.strategy(), RetrievalStrategy::Search);
        assert_eq!(request.filters.air_date, vec![">=2000-01-01", "<=2010-12-31"]);
        assert_eq!(request.filters.meta_tags, vec!["RPG", "原创"]);
        assert!(!request.only_ranked);
    }

    #[test]
    fn keyword_selects_search() {
        let mut a = args();
        a.keyword = Some("bebop".to_string());
        let request = build_request(&a).unwrap();
        assert_eq!(request.strategy(), RetrievalStrategy::Search);
    }

    #[test]
    fn invalid_input_is_rejected() {
        let mut a = args();
        a.rating_min = Some(11.0);
        assert!(build_request(&a).is_err());

        for other in ["movie", "book", "music", "real"] {
            let mut a = args();
            a.subject_type = other.to_string();
            assert!(build_request(&a).is_err(), "{other}");
        }

        let mut a = args();
        a.air_date = vec!["2020".to_string()];
        assert!(build_request(&a).is_err());
    }
}
