//! Domain types for the movie database API.
//!
//! # Design
//! Every field is optional because the remote API omits fields freely and an
//! absent value is not an error. Absent fields are skipped on serialization so
//! a decoded page re-encodes to the same set of keys it was decoded from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One movie as listed by the API, limited to the fields the UI shows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

/// One page of one category's results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieListPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_results: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<MovieEntry>>,
}

impl MovieListPage {
    /// The listed movies, or an empty slice when the API sent none.
    pub fn entries(&self) -> &[MovieEntry] {
        self.results.as_deref().unwrap_or_default()
    }
}

/// The four movie lists the API exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    TopRated,
    NowPlaying,
    Popular,
    Upcoming,
}

impl Category {
    /// All categories in tab order.
    pub const ALL: [Category; 4] = [
        Category::TopRated,
        Category::NowPlaying,
        Category::Popular,
        Category::Upcoming,
    ];

    /// URL path suffix appended after the API version.
    pub fn path(self) -> &'static str {
        match self {
            Category::TopRated => "/movie/top_rated",
            Category::NowPlaying => "/movie/now_playing",
            Category::Popular => "/movie/popular",
            Category::Upcoming => "/movie/upcoming",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Category::TopRated => "top_rated",
            Category::NowPlaying => "now_playing",
            Category::Popular => "popular",
            Category::Upcoming => "upcoming",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Returned when a string names no known category.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown movie category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.slug() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A successfully decoded movie list together with the response status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieListResponse {
    pub page: MovieListPage,
    pub status: u16,
}

/// Raw poster image bytes, returned undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterImage {
    pub poster_path: String,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub status: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_paths_match_api_routes() {
        assert_eq!(Category::TopRated.path(), "/movie/top_rated");
        assert_eq!(Category::NowPlaying.path(), "/movie/now_playing");
        assert_eq!(Category::Popular.path(), "/movie/popular");
        assert_eq!(Category::Upcoming.path(), "/movie/upcoming");
    }

    #[test]
    fn category_parses_from_slug() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), category);
        }
        let err = "latest".parse::<Category>().unwrap_err();
        assert_eq!(err, UnknownCategory("latest".to_string()));
    }

    #[test]
    fn absent_fields_are_not_serialized() {
        let entry = MovieEntry {
            title: Some("B".to_string()),
            poster_path: None,
            overview: Some("o2".to_string()),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json, serde_json::json!({"title": "B", "overview": "o2"}));
    }

    #[test]
    fn entries_defaults_to_empty() {
        assert!(MovieListPage::default().entries().is_empty());
    }
}
