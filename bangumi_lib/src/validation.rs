use chrono::NaiveDate;
use regex::Regex;

use crate::error::RetrievalError;

pub const MAX_TAG_LENGTH: usize = 40;
pub const MAX_TAGS: usize = 10;
pub const MAX_TARGET_COUNT: usize = 1000;

/// Split a comparison expression into operator and operand. Operators are
/// `>=`, `<=`, `>`, `<` and `=`; whitespace around either part is ignored.
fn split_comparison(input: &str) -> Result<(String, String), RetrievalError> {
    let re = Regex::new(r"^\s*(>=|<=|>|<|=)\s*(\S+)\s*$").map_err(|e| {
        RetrievalError::InvalidFilter(format!("comparison pattern failed to compile: {}", e))
    })?;
    let caps = re.captures(input).ok_or_else(|| {
        RetrievalError::InvalidFilter(format!(
            "invalid range expression '{}'. Expected an operator (>=, <=, >, <, =) followed by a value",
            input.trim()
        ))
    })?;
    Ok((caps[1].to_string(), caps[2].to_string()))
}

/// Validate an air-date bound such as `>=2020-01-01`. Returns it in the
/// compact form the search endpoint expects.
pub fn validate_air_date_expr(input: &str) -> Result<String, RetrievalError> {
    let (op, value) = split_comparison(input)?;
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
        RetrievalError::InvalidFilter(format!(
            "invalid date '{}'. Expected format: YYYY-MM-DD (e.g., 2024-06-01)",
            value
        ))
    })?;
    Ok(format!("{}{}", op, value))
}

/// Inclusive year span as a pair of air-date bounds.
pub fn air_date_years(from_year: i32, to_year: i32) -> Result<Vec<String>, RetrievalError> {
    if from_year > to_year {
        return Err(RetrievalError::InvalidFilter(format!(
            "start year {} is after end year {}",
            from_year, to_year
        )));
    }
    Ok(vec![
        format!(">={:04}-01-01", from_year),
        format!("<={:04}-12-31", to_year),
    ])
}

/// Validate a score bound: 0.0 to 10.0 inclusive.
pub fn validate_rating(value: f64) -> Result<f64, RetrievalError> {
    if !(0.0..=10.0).contains(&value) {
        return Err(RetrievalError::InvalidFilter(format!(
            "rating must be between 0 and 10, got {}",
            value
        )));
    }
    Ok(value)
}

/// Validate a min/max score pair.
pub fn validate_rating_range(
    min: Option<f64>,
    max: Option<f64>,
) -> Result<(Option<f64>, Option<f64>), RetrievalError> {
    let min = min.map(validate_rating).transpose()?;
    let max = max.map(validate_rating).transpose()?;
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return Err(RetrievalError::InvalidFilter(format!(
                "minimum rating {} exceeds maximum rating {}",
                lo, hi
            )));
        }
    }
    Ok((min, max))
}

/// Clean a tag list: trims, drops blanks and duplicates, strips control
/// characters, and accepts comma-separated entries.
pub fn validate_tags(inputs: &[String]) -> Result<Vec<String>, RetrievalError> {
    let mut tags: Vec<String> = Vec::new();
    for raw in inputs.iter().flat_map(|s| s.split([',', '，'])) {
        let tag: String = raw
            .chars()
            .filter(|c| !c.is_control())
            .collect::<String>()
            .trim()
            .to_string();
        if tag.is_empty() || tags.contains(&tag) {
            continue;
        }
        if tag.chars().count() > MAX_TAG_LENGTH {
            return Err(RetrievalError::InvalidFilter(format!(
                "tag '{}' exceeds maximum length of {} characters",
                tag, MAX_TAG_LENGTH
            )));
        }
        tags.push(tag);
    }
    if tags.len() > MAX_TAGS {
        return Err(RetrievalError::InvalidFilter(format!(
            "at most {} tags are allowed, got {}",
            MAX_TAGS,
            tags.len()
        )));
    }
    Ok(tags)
}

/// Validate the number of rows requested: 1..=MAX_TARGET_COUNT.
pub fn validate_target_count(count: usize) -> Result<usize, RetrievalError> {
    if !(1..=MAX_TARGET_COUNT).contains(&count) {
        return Err(RetrievalError::InvalidFilter(format!(
            "limit must be between 1 and {}, got {}",
            MAX_TARGET_COUNT, count
        )));
    }
    Ok(count)
}
