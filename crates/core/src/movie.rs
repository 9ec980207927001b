//! The movie record and its composite key.

use serde::{Deserialize, Serialize};

/// A single movie record.
///
/// `(year, title)` is the composite primary key and is immutable once the
/// record exists; changing either field means delete + insert, not update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub year: i32,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(default)]
    pub rating: f64,
}

impl Movie {
    /// Creates a movie with no plot and a zero rating.
    pub fn new(year: i32, title: impl Into<String>) -> Self {
        Self {
            year,
            title: title.into(),
            plot: None,
            rating: 0.0,
        }
    }

    /// Sets the plot.
    pub fn with_plot(mut self, plot: impl Into<String>) -> Self {
        self.plot = Some(plot.into());
        self
    }

    /// Sets the rating.
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    /// Returns the composite key identifying this record.
    pub fn key(&self) -> MovieKey {
        MovieKey {
            year: self.year,
            title: self.title.clone(),
        }
    }
}

/// Composite primary key: partition key `year`, sort key `title`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MovieKey {
    pub year: i32,
    pub title: String,
}

impl MovieKey {
    pub fn new(year: i32, title: impl Into<String>) -> Self {
        Self {
            year,
            title: title.into(),
        }
    }
}
