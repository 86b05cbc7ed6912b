//! Reader for the offline Bangumi archive dump (`subject.jsonlines`).
//!
//! Each line is one subject in the archive's flat shape: rank, score and
//! the vote breakdown sit at the top level instead of in a rating block.

use std::io::BufRead;

use bangumi_api::types::{Subject, SubjectType};
use serde_json::Value;

use crate::category::Category;
use crate::error::RetrievalError;
use crate::normalize::{effective_rank, normalize, Row};

/// Archive rows split by category, plus what was skipped on the way.
#[derive(Debug, Default)]
pub struct ArchiveSplit {
    pub anime: Vec<Row>,
    pub game: Vec<Row>,
    /// Ranked subjects dropped for having no date.
    pub skipped_undated: usize,
    /// Subjects dropped for having no rank.
    pub skipped_unranked: usize,
    /// Lines that were not a valid subject.
    pub malformed: usize,
}

impl ArchiveSplit {
    pub fn rows(&self, category: Category) -> &[Row] {
        match category {
            Category::Anime => &self.anime,
            Category::Game => &self.game,
        }
    }
}

/// Reads a dump, keeping ranked and dated anime and game subjects.
///
/// Lines that fail to parse are logged and skipped; only I/O errors abort.
pub fn read_archive<R: BufRead>(reader: R) -> Result<ArchiveSplit, RetrievalError> {
    let mut split = ArchiveSplit::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim_start_matches('\u{feff}').trim();
        if text.is_empty() {
            continue;
        }
        let subject: Subject = match serde_json::from_str(text) {
            Ok(subject) => subject,
            Err(e) => {
                tracing::warn!("line {}: skipping malformed subject: {}", idx + 1, e);
                split.malformed += 1;
                continue;
            }
        };

        let Some(row) = normalize(&subject, false) else {
            if effective_rank(&subject).is_some() {
                split.skipped_undated += 1;
            } else {
                split.skipped_unranked += 1;
            }
            continue;
        };

        match subject
            .subject_type
            .and_then(SubjectType::from_code)
            .and_then(Category::from_subject_type)
        {
            Some(Category::Anime) => split.anime.push(row),
            Some(Category::Game) => split.game.push(row),
            None => {}
        }
    }
    tracing::info!(
        "archive: {} anime, {} game, {} undated, {} unranked, {} malformed",
        split.anime.len(),
        split.game.len(),
        split.skipped_undated,
        split.skipped_unranked,
        split.malformed
    );
    Ok(split)
}

/// Raw JSON of the subject with the given id, if the dump has it.
pub fn find_subject<R: BufRead>(reader: R, id: i64) -> Result<Option<Value>, RetrievalError> {
    for line in reader.lines() {
        let line = line?;
        let Ok(value) = serde_json::from_str::<Value>(line.trim_start_matches('\u{feff}')) else {
            continue;
        };
        if value.get("id").and_then(Value::as_i64) == Some(id) {
            return Ok(Some(value));
        }
    }
    Ok(None)
}
