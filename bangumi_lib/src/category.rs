//! The two subject categories rankings are built for.

use std::fmt;
use std::str::FromStr;

use bangumi_api::types::SubjectType;

use crate::error::RetrievalError;

/// Ranked category. Books, music and real-life subjects are not ranked here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Category {
    #[default]
    Anime,
    Game,
}

impl Category {
    pub fn subject_type(self) -> SubjectType {
        match self {
            Category::Anime => SubjectType::Anime,
            Category::Game => SubjectType::Game,
        }
    }

    pub fn from_subject_type(subject_type: SubjectType) -> Option<Self> {
        match subject_type {
            SubjectType::Anime => Some(Category::Anime),
            SubjectType::Game => Some(Category::Game),
            _ => None,
        }
    }
}

impl From<Category> for SubjectType {
    fn from(category: Category) -> Self {
        category.subject_type()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.subject_type())
    }
}

impl FromStr for Category {
    type Err = RetrievalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<SubjectType>()
            .ok()
            .and_then(Category::from_subject_type)
            .ok_or_else(|| {
                RetrievalError::InvalidFilter(format!(
                    "unsupported category '{}'. Valid values: anime, game",
                    s.trim()
                ))
            })
    }
}
