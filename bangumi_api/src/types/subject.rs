use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Subject categories. Rankings only use [`SubjectType::Anime`] and
/// [`SubjectType::Game`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SubjectType {
    Book = 1,
    #[default]
    Anime = 2,
    Music = 3,
    Game = 4,
    Real = 6,
}

impl SubjectType {
    /// Numeric code used on the wire.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(SubjectType::Book),
            2 => Some(SubjectType::Anime),
            3 => Some(SubjectType::Music),
            4 => Some(SubjectType::Game),
            6 => Some(SubjectType::Real),
            _ => None,
        }
    }
}

impl fmt::Display for SubjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SubjectType::Book => "book",
            SubjectType::Anime => "anime",
            SubjectType::Music => "music",
            SubjectType::Game => "game",
            SubjectType::Real => "real",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for SubjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "book" | "1" => Ok(SubjectType::Book),
            "anime" | "2" => Ok(SubjectType::Anime),
            "music" | "3" => Ok(SubjectType::Music),
            "game" | "4" => Ok(SubjectType::Game),
            "real" | "6" => Ok(SubjectType::Real),
            other => Err(format!("unknown subject type '{}'", other)),
        }
    }
}

/// A subject as returned by the API or stored in the archive dump.
///
/// The two sources disagree on where rank, score and the vote breakdown
/// live, so nearly every field is optional. Turning this into a display
/// record is the job of the library's normalizer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    #[serde(rename = "type", default)]
    pub subject_type: Option<u8>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_cn: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default)]
    pub rating: Option<Rating>,
    /// Archive dumps keep rank at the top level.
    #[serde(default)]
    pub rank: Option<i64>,
    /// Archive dumps keep score at the top level.
    #[serde(default)]
    pub score: Option<f64>,
    /// Archive dumps keep the per-score vote breakdown at the top level.
    #[serde(default)]
    pub score_details: Option<Value>,
    #[serde(default)]
    pub meta_tags: Option<Vec<String>>,
}

/// Rating block of an API subject.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(default)]
    pub rank: Option<i64>,
    #[serde(default)]
    pub total: Option<i64>,
    /// Votes per score bucket, keyed `"1"` through `"10"`.
    #[serde(default)]
    pub count: Option<Value>,
    #[serde(default)]
    pub score: Option<f64>,
}
