//! TMDB wire types and their normalized forms.
//!
//! The raw structs mirror api.themoviedb.org/3 JSON; everything the
//! handlers touch goes through [`MediaEntry`] / [`MediaDetails`] so
//! missing fields are filled in exactly once.

use serde::Deserialize;

/// Poster/backdrop paths are expanded against this size variant.
pub const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";

fn one() -> u32 {
    1
}

/// A page of search results as TMDB returns it.
#[derive(Debug, Deserialize)]
pub struct SearchPage {
    #[serde(default = "one")]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<SearchItem>,
    #[serde(default = "one")]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// One raw multi-search result (movie, tv, or person).
#[derive(Debug, Clone, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub id: u64,
    pub media_type: Option<String>,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub name: Option<String>,
    pub original_name: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetailsRaw {
    pub id: u64,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TvDetailsRaw {
    pub id: u64,
    pub name: Option<String>,
    pub original_name: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f64>,
    pub first_air_date: Option<String>,
    pub number_of_seasons: Option<u32>,
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

/// Season stub as listed on a TV-show details response.
#[derive(Debug, Clone, Deserialize)]
pub struct SeasonSummary {
    pub season_number: u32,
    pub name: Option<String>,
    pub episode_count: Option<u32>,
}

/// Full season lookup response.
#[derive(Debug, Clone, Deserialize)]
pub struct Season {
    #[serde(default)]
    pub season_number: u32,
    pub name: Option<String>,
    pub overview: Option<String>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Episode {
    pub episode_number: u32,
    pub name: Option<String>,
    pub overview: Option<String>,
}

/// Whether an entry is a movie or a TV show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(MediaKind::Movie),
            "tv" => Some(MediaKind::Tv),
            _ => None,
        }
    }
}

/// A normalized search result.
#[derive(Debug, Clone)]
pub struct MediaEntry {
    pub kind: MediaKind,
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub rating: f64,
    pub release: String,
    pub poster: Option<String>,
}

impl MediaEntry {
    fn from_search(kind: MediaKind, item: &SearchItem) -> Self {
        let title = match kind {
            MediaKind::Movie => item.title.clone().or_else(|| item.original_title.clone()),
            MediaKind::Tv => item.name.clone().or_else(|| item.original_name.clone()),
        };
        let release = match kind {
            MediaKind::Movie => item
                .release_date
                .clone()
                .filter(|s| !s.is_empty())
                .or_else(|| item.first_air_date.clone()),
            MediaKind::Tv => item.first_air_date.clone(),
        };

        Self {
            kind,
            id: item.id,
            title: title.unwrap_or_else(|| "Untitled".to_string()),
            overview: item
                .overview
                .clone()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "No overview available".to_string()),
            rating: item.vote_average.unwrap_or(0.0),
            release: release
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            poster: item
                .poster_path
                .as_deref()
                .map(|p| format!("{POSTER_BASE}{p}")),
        }
    }
}

/// Multi-search results split by kind, movies first.
#[derive(Debug, Clone)]
pub struct MultiSearch {
    pub movies: Vec<MediaEntry>,
    pub tv: Vec<MediaEntry>,
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u32,
}

impl MultiSearch {
    pub(crate) fn from_page(page: SearchPage) -> Self {
        let mut movies = Vec::new();
        let mut tv = Vec::new();
        for item in page.results.iter().take(50) {
            match item.media_type.as_deref() {
                Some("movie") => movies.push(MediaEntry::from_search(MediaKind::Movie, item)),
                Some("tv") => tv.push(MediaEntry::from_search(MediaKind::Tv, item)),
                // people and other media types are skipped
                _ => {}
            }
        }

        Self {
            movies,
            tv,
            page: page.page,
            total_pages: page.total_pages,
            total_results: page.total_results,
        }
    }

    /// All entries in display order (movies before TV shows).
    pub fn combined(&self) -> impl Iterator<Item = &MediaEntry> {
        self.movies.iter().chain(self.tv.iter())
    }

    /// Candidate titles for the misspelling suggestion (first ten of each).
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.movies
            .iter()
            .take(10)
            .chain(self.tv.iter().take(10))
            .map(|e| e.title.as_str())
    }
}

/// Normalized details of a single movie or TV show.
#[derive(Debug, Clone)]
pub struct MediaDetails {
    pub kind: MediaKind,
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub rating: f64,
    pub release: String,
    pub runtime: Option<u32>,
    pub number_of_seasons: Option<u32>,
    pub number_of_episodes: Option<u32>,
    pub seasons: Vec<SeasonSummary>,
    pub genres: Vec<String>,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
}

fn image_url(path: Option<&str>) -> Option<String> {
    path.map(|p| format!("{POSTER_BASE}{p}"))
}

impl MediaDetails {
    pub(crate) fn from_movie(raw: MovieDetailsRaw) -> Self {
        Self {
            kind: MediaKind::Movie,
            id: raw.id,
            title: raw
                .title
                .or(raw.original_title)
                .unwrap_or_else(|| "Untitled".to_string()),
            overview: raw
                .overview
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "No overview available".to_string()),
            rating: raw.vote_average.unwrap_or(0.0),
            release: raw
                .release_date
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            runtime: raw.runtime,
            number_of_seasons: None,
            number_of_episodes: None,
            seasons: Vec::new(),
            genres: raw.genres.into_iter().map(|g| g.name).collect(),
            poster: image_url(raw.poster_path.as_deref()),
            backdrop: image_url(raw.backdrop_path.as_deref()),
        }
    }

    pub(crate) fn from_tv(raw: TvDetailsRaw) -> Self {
        Self {
            kind: MediaKind::Tv,
            id: raw.id,
            title: raw
                .name
                .or(raw.original_name)
                .unwrap_or_else(|| "Untitled".to_string()),
            overview: raw
                .overview
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "No overview available".to_string()),
            rating: raw.vote_average.unwrap_or(0.0),
            release: raw
                .first_air_date
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "Unknown".to_string()),
            runtime: None,
            number_of_seasons: raw.number_of_seasons,
            number_of_episodes: raw.number_of_episodes,
            seasons: raw.seasons,
            genres: raw.genres.into_iter().map(|g| g.name).collect(),
            poster: image_url(raw.poster_path.as_deref()),
            backdrop: image_url(raw.backdrop_path.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(media_type: &str) -> SearchItem {
        SearchItem {
            id: 42,
            media_type: Some(media_type.to_string()),
            title: None,
            original_title: None,
            name: None,
            original_name: None,
            overview: None,
            vote_average: None,
            release_date: None,
            first_air_date: None,
            poster_path: None,
        }
    }

    #[test]
    fn test_movie_normalization_fallbacks() {
        let mut raw = item("movie");
        raw.original_title = Some("Originaltitel".to_string());
        raw.overview = Some(String::new());

        let page = SearchPage {
            page: 1,
            results: vec![raw],
            total_pages: 1,
            total_results: 1,
        };
        let search = MultiSearch::from_page(page);

        let movie = &search.movies[0];
        assert_eq!(movie.title, "Originaltitel");
        assert_eq!(movie.overview, "No overview available");
        assert_eq!(movie.release, "Unknown");
        assert_eq!(movie.rating, 0.0);
        assert_eq!(movie.poster, None);
    }

    #[test]
    fn test_people_are_skipped() {
        let page = SearchPage {
            page: 1,
            results: vec![item("person"), item("movie"), item("tv")],
            total_pages: 1,
            total_results: 3,
        };
        let search = MultiSearch::from_page(page);

        assert_eq!(search.movies.len(), 1);
        assert_eq!(search.tv.len(), 1);
        assert_eq!(search.combined().count(), 2);
    }

    #[test]
    fn test_poster_path_expanded() {
        let mut raw = item("tv");
        raw.name = Some("Show".to_string());
        raw.poster_path = Some("/abc.jpg".to_string());

        let page = SearchPage {
            page: 1,
            results: vec![raw],
            total_pages: 1,
            total_results: 1,
        };
        let search = MultiSearch::from_page(page);

        assert_eq!(
            search.tv[0].poster.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg")
        );
    }

    #[test]
    fn test_combined_orders_movies_first() {
        let mut movie = item("movie");
        movie.title = Some("Film".to_string());
        let mut tv = item("tv");
        tv.name = Some("Show".to_string());

        let page = SearchPage {
            page: 1,
            results: vec![tv, movie],
            total_pages: 1,
            total_results: 2,
        };
        let search = MultiSearch::from_page(page);

        let titles: Vec<&str> = search.combined().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Film", "Show"]);
    }
}
