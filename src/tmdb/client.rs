//! TMDB REST client.
//!
//! Thin wrapper over api.themoviedb.org/3 with the api_key/language query
//! parameters applied to every request and a short-lived cache in front of
//! the search endpoint (navigation callbacks re-request the same pages).

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use thiserror::Error;
use tracing::debug;

use super::models::{
    MediaDetails, MediaEntry, MediaKind, MovieDetailsRaw, MultiSearch, SearchPage, Season,
    TvDetailsRaw,
};

const API_BASE: &str = "https://api.themoviedb.org/3";
const SEARCH_CACHE_CAPACITY: u64 = 512;
const SEARCH_CACHE_TTL: Duration = Duration::from_secs(600);

/// Errors from the TMDB API.
#[derive(Debug, Error)]
pub enum TmdbError {
    #[error("TMDB request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TMDB returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

/// TMDB API client.
pub struct TmdbClient {
    http: reqwest::Client,
    api_key: String,
    language: String,
    search_cache: Cache<(String, u32), Arc<MultiSearch>>,
}

impl TmdbClient {
    /// Create a new client.
    ///
    /// # Panics
    /// Panics if the underlying HTTP client cannot be constructed, which
    /// only happens when the TLS backend fails to initialize at startup.
    pub fn new(api_key: String, language: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            api_key,
            language,
            search_cache: Cache::builder()
                .max_capacity(SEARCH_CACHE_CAPACITY)
                .time_to_live(SEARCH_CACHE_TTL)
                .build(),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        extra_params: &[(&str, &str)],
    ) -> Result<T, TmdbError> {
        let url = format!("{API_BASE}{path}");
        let mut params: Vec<(&str, &str)> = vec![
            ("api_key", &self.api_key),
            ("language", &self.language),
        ];
        params.extend_from_slice(extra_params);

        let resp = self.http.get(&url).query(&params).send().await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(TmdbError::Status { status, body });
        }

        Ok(resp.json::<T>().await?)
    }

    /// Search movies and TV shows in one request.
    ///
    /// People and other result types are dropped during normalization.
    pub async fn search_multi(&self, query: &str, page: u32) -> Result<Arc<MultiSearch>, TmdbError> {
        let key = (query.to_lowercase(), page);
        if let Some(hit) = self.search_cache.get(&key) {
            debug!("search cache hit for '{}' page {}", query, page);
            return Ok(hit);
        }

        let page_str = page.to_string();
        let raw: SearchPage = self
            .get("/search/multi", &[("query", query), ("page", &page_str)])
            .await?;
        let results = Arc::new(MultiSearch::from_page(raw));
        self.search_cache.insert(key, results.clone());
        Ok(results)
    }

    /// Full movie details.
    pub async fn movie_details(&self, id: u64) -> Result<MediaDetails, TmdbError> {
        let raw: MovieDetailsRaw = self
            .get(
                &format!("/movie/{id}"),
                &[("append_to_response", "credits,images,release_dates")],
            )
            .await?;
        Ok(MediaDetails::from_movie(raw))
    }

    /// Full TV-show details, including the season list.
    pub async fn tv_details(&self, id: u64) -> Result<MediaDetails, TmdbError> {
        let raw: TvDetailsRaw = self
            .get(
                &format!("/tv/{id}"),
                &[("append_to_response", "credits,images")],
            )
            .await?;
        Ok(MediaDetails::from_tv(raw))
    }

    /// Details for either kind.
    pub async fn details(&self, kind: MediaKind, id: u64) -> Result<MediaDetails, TmdbError> {
        match kind {
            MediaKind::Movie => self.movie_details(id).await,
            MediaKind::Tv => self.tv_details(id).await,
        }
    }

    /// Episode listing for one season of a TV show.
    pub async fn tv_season(&self, tv_id: u64, season_number: u32) -> Result<Season, TmdbError> {
        self.get(&format!("/tv/{tv_id}/season/{season_number}"), &[])
            .await
    }

    /// Titles recommended for a movie or TV show.
    pub async fn recommendations(
        &self,
        kind: MediaKind,
        id: u64,
        page: u32,
    ) -> Result<Vec<MediaEntry>, TmdbError> {
        let page_str = page.to_string();
        let raw: SearchPage = self
            .get(
                &format!("/{}/{id}/recommendations", kind.as_str()),
                &[("page", &page_str)],
            )
            .await?;
        // Recommendation results carry their media_type like multi-search.
        let results = MultiSearch::from_page(raw);
        Ok(results.combined().cloned().collect())
    }
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("language", &self.language)
            .finish()
    }
}
