use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::TmdbConfig;
use crate::error::{CineseekError, CineseekResult};
use crate::models::{CastMember, CrewMember, Movie, MovieDetails, Review};

const MAX_GENRES: usize = 3;
const MAX_CAST: usize = 10;
const SUBTITLE_CHARS: usize = 50;
const CREW_JOBS: [&str; 4] = ["Director", "Producer", "Screenplay", "Writer"];

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
    image_base: String,
}

/// Movie metadata lookups.
///
/// The `try_*` methods surface every failure. The plain methods keep the lossy contract the
/// recommendation pipeline relies on: failures are logged and collapse to an empty list or
/// `None`, so callers cannot tell "no results" from "lookup failed".
#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn try_search_movies(&self, query: &str, limit: Option<usize>)
        -> CineseekResult<Vec<Movie>>;
    async fn try_popular_movies(&self) -> CineseekResult<Vec<Movie>>;
    async fn try_movie_details(&self, id: i64) -> CineseekResult<MovieDetails>;

    async fn search_movies(&self, query: &str, limit: Option<usize>) -> Vec<Movie> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        match self.try_search_movies(query, limit).await {
            Ok(movies) => movies,
            Err(e) => {
                warn!(query = %query, error = %e, "TMDB search failed");
                Vec::new()
            }
        }
    }

    async fn popular_movies(&self) -> Vec<Movie> {
        match self.try_popular_movies().await {
            Ok(movies) => movies,
            Err(e) => {
                warn!(error = %e, "Fetching popular movies failed");
                Vec::new()
            }
        }
    }

    async fn movie_details(&self, id: i64) -> Option<MovieDetails> {
        match self.try_movie_details(id).await {
            Ok(details) => Some(details),
            Err(e) => {
                warn!(movie_id = id, error = %e, "Fetching movie details failed");
                None
            }
        }
    }
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Result<Self> {
        let user_agent = format!("cineseek/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base: config.image_base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> CineseekResult<T> {
        let res = self
            .client
            .get(format!("{}{path}", self.base_url))
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                CineseekError::transport(
                    None,
                    format!("TMDB request to {path} failed: {}", e.without_url()),
                )
            })?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(CineseekError::transport(
                Some(status.as_u16()),
                format!("TMDB {path} -> {text}"),
            ));
        }
        serde_json::from_str(&text)
            .map_err(|e| CineseekError::Parse(format!("TMDB {path} returned unexpected JSON: {e}")))
    }

    fn summaries(&self, page: SearchResponse) -> Vec<Movie> {
        page.results
            .iter()
            .map(|r| movie_from_result(r, &self.image_base))
            .collect()
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn try_search_movies(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> CineseekResult<Vec<Movie>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let params = [
            ("query", query),
            ("language", "en-US"),
            ("page", "1"),
            ("include_adult", "false"),
        ];
        let page: SearchResponse = self.get_json("/search/movie", &params).await?;
        let mut movies = self.summaries(page);
        if let Some(limit) = limit {
            movies.truncate(limit);
        }
        debug!(query = %query, results = movies.len(), "TMDB search completed");
        Ok(movies)
    }

    async fn try_popular_movies(&self) -> CineseekResult<Vec<Movie>> {
        let page: SearchResponse = self
            .get_json("/movie/popular", &[("language", "en-US"), ("page", "1")])
            .await?;
        Ok(self.summaries(page))
    }

    async fn try_movie_details(&self, id: i64) -> CineseekResult<MovieDetails> {
        let path_detail = format!("/movie/{id}");
        let path_credits = format!("/movie/{id}/credits");
        let path_reviews = format!("/movie/{id}/reviews");

        let (detail, credits, reviews) = tokio::try_join!(
            self.get_json::<MovieDetail>(&path_detail, &[("language", "en-US")]),
            self.get_json::<Credits>(&path_credits, &[]),
            self.get_json::<Reviews>(&path_reviews, &[("language", "en-US"), ("page", "1")]),
        )
        .map_err(|e| match e {
            CineseekError::Transport {
                status: Some(404), ..
            } => CineseekError::NotFound(format!("movie {id}")),
            other => other,
        })?;

        Ok(details_from_parts(detail, credits, reviews, &self.image_base))
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResult {
    id: i64,
    title: String,
    #[serde(default)]
    overview: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    #[serde(default)]
    genre_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct Genre {
    name: String,
}

#[derive(Debug, Deserialize)]
struct MovieDetail {
    id: i64,
    title: String,
    #[serde(default)]
    overview: String,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    runtime: Option<u32>,
    #[serde(default)]
    vote_average: f64,
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Debug, Deserialize)]
struct Credits {
    #[serde(default)]
    cast: Vec<CastEntry>,
    #[serde(default)]
    crew: Vec<CrewEntry>,
}

#[derive(Debug, Deserialize)]
struct CastEntry {
    id: i64,
    name: String,
    character: Option<String>,
    profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CrewEntry {
    id: i64,
    name: String,
    job: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Reviews {
    #[serde(default)]
    results: Vec<ReviewEntry>,
}

#[derive(Debug, Deserialize)]
struct ReviewEntry {
    id: String,
    author: String,
    #[serde(default)]
    content: String,
    author_details: Option<AuthorDetails>,
}

#[derive(Debug, Deserialize)]
struct AuthorDetails {
    rating: Option<f64>,
}

pub(crate) fn movie_from_result(result: &SearchResult, image_base: &str) -> Movie {
    Movie {
        id: result.id,
        title: result.title.clone(),
        subtitle: subtitle(&result.overview),
        year: release_year(result.release_date.as_deref()),
        genres: result
            .genre_ids
            .iter()
            .take(MAX_GENRES)
            .map(|code| genre_name(*code).to_string())
            .collect(),
        poster_url: image_url(image_base, result.poster_path.as_deref()),
        background_image: image_url(image_base, result.backdrop_path.as_deref()),
    }
}

fn details_from_parts(
    detail: MovieDetail,
    credits: Credits,
    reviews: Reviews,
    image_base: &str,
) -> MovieDetails {
    let cast = credits
        .cast
        .into_iter()
        .take(MAX_CAST)
        .map(|c| CastMember {
            id: c.id,
            name: c.name,
            character: c.character.unwrap_or_default(),
            profile_url: image_url(image_base, c.profile_path.as_deref()),
        })
        .collect();
    let crew = credits
        .crew
        .into_iter()
        .filter_map(|c| {
            let job = c.job.filter(|j| CREW_JOBS.contains(&j.as_str()))?;
            Some(CrewMember {
                id: c.id,
                name: c.name,
                job,
            })
        })
        .collect();
    let reviews = reviews
        .results
        .into_iter()
        .map(|r| Review {
            id: r.id,
            author: r.author,
            content: r.content,
            rating: r
                .author_details
                .and_then(|a| a.rating)
                .filter(|v| (0.0..=10.0).contains(v)),
        })
        .collect();

    MovieDetails {
        id: detail.id,
        title: detail.title,
        overview: detail.overview,
        poster_url: image_url(image_base, detail.poster_path.as_deref()),
        backdrop_url: image_url(image_base, detail.backdrop_path.as_deref()),
        release_date: detail
            .release_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
        runtime: detail.runtime,
        vote_average: detail.vote_average.clamp(0.0, 10.0),
        genres: detail.genres.into_iter().map(|g| g.name).collect(),
        cast,
        crew,
        reviews,
    }
}

pub fn genre_name(code: i64) -> &'static str {
    match code {
        28 => "Action",
        12 => "Adventure",
        16 => "Animation",
        35 => "Comedy",
        80 => "Crime",
        99 => "Documentary",
        18 => "Drama",
        10751 => "Family",
        14 => "Fantasy",
        36 => "History",
        27 => "Horror",
        10402 => "Music",
        9648 => "Mystery",
        10749 => "Romance",
        878 => "Science Fiction",
        10770 => "TV Movie",
        53 => "Thriller",
        10752 => "War",
        37 => "Western",
        _ => "Unknown",
    }
}

fn release_year(date: Option<&str>) -> i32 {
    let Some(date) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return 0;
    };
    if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return parsed.year();
    }
    date.split('-')
        .next()
        .and_then(|y| y.parse().ok())
        .unwrap_or(0)
}

fn subtitle(overview: &str) -> Option<String> {
    let overview = overview.trim();
    if overview.is_empty() {
        return None;
    }
    if overview.chars().count() > SUBTITLE_CHARS {
        let head: String = overview.chars().take(SUBTITLE_CHARS).collect();
        Some(format!("{head}..."))
    } else {
        Some(overview.to_string())
    }
}

fn image_url(base: &str, path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty()).map(|p| format!("{base}{p}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://image.tmdb.org/t/p/w500";

    fn result(overview: &str, release_date: Option<&str>, genre_ids: Vec<i64>) -> SearchResult {
        SearchResult {
            id: 11216,
            title: "Cinema Paradiso".to_string(),
            overview: overview.to_string(),
            poster_path: Some("/poster.jpg".to_string()),
            backdrop_path: None,
            release_date: release_date.map(|s| s.to_string()),
            genre_ids,
        }
    }

    #[test]
    fn normalizes_search_result() {
        let movie = movie_from_result(&result("Short.", Some("1988-11-17"), vec![18, 10749]), BASE);
        assert_eq!(movie.id, 11216);
        assert_eq!(movie.year, 1988);
        assert_eq!(movie.subtitle.as_deref(), Some("Short."));
        assert_eq!(movie.genres, vec!["Drama", "Romance"]);
        assert_eq!(
            movie.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/poster.jpg")
        );
        assert!(movie.background_image.is_none());
    }

    #[test]
    fn genres_are_capped_and_unknown_codes_named() {
        let movie = movie_from_result(&result("", None, vec![1, 28, 12, 16, 35]), BASE);
        assert_eq!(movie.genres, vec!["Unknown", "Action", "Adventure"]);
    }

    #[test]
    fn missing_release_date_yields_zero_year() {
        assert_eq!(release_year(None), 0);
        assert_eq!(release_year(Some("")), 0);
        assert_eq!(release_year(Some("1994")), 1994);
    }

    #[test]
    fn subtitle_truncates_long_overview_on_char_boundary() {
        let long = "é".repeat(60);
        let sub = subtitle(&long).unwrap();
        assert_eq!(sub.chars().count(), SUBTITLE_CHARS + 3);
        assert!(sub.ends_with("..."));
        assert_eq!(subtitle("   "), None);
    }

    #[test]
    fn subtitle_trims_surrounding_whitespace() {
        assert_eq!(subtitle("  A quiet drama.\n"), Some("A quiet drama.".to_string()));
        assert_eq!(subtitle(""), None);
    }

    #[test]
    fn empty_image_path_leaves_url_unset() {
        assert_eq!(image_url(BASE, Some("")), None);
        assert_eq!(image_url(BASE, None), None);
    }

    #[test]
    fn details_cap_cast_and_filter_crew() {
        let cast = (0..15)
            .map(|i| CastEntry {
                id: i,
                name: format!("Actor {i}"),
                character: Some(format!("Role {i}")),
                profile_path: None,
            })
            .collect();
        let crew = ["Director", "Editor", "Writer", "Producer", "Screenplay", "Gaffer"]
            .iter()
            .enumerate()
            .map(|(i, job)| CrewEntry {
                id: i as i64,
                name: format!("Crew {i}"),
                job: Some(job.to_string()),
            })
            .collect();
        let detail = MovieDetail {
            id: 235,
            title: "Stand by Me".to_string(),
            overview: "Four boys.".to_string(),
            poster_path: None,
            backdrop_path: Some("/back.jpg".to_string()),
            release_date: Some(String::new()),
            runtime: Some(89),
            vote_average: 7.9,
            genres: vec![Genre {
                name: "Drama".to_string(),
            }],
        };
        let reviews = Reviews {
            results: vec![ReviewEntry {
                id: "abc".to_string(),
                author: "critic".to_string(),
                content: "Great".to_string(),
                author_details: Some(AuthorDetails { rating: Some(9.0) }),
            }],
        };

        let d = details_from_parts(detail, Credits { cast, crew }, reviews, BASE);
        assert_eq!(d.cast.len(), MAX_CAST);
        assert_eq!(d.crew.len(), 4);
        assert!(d.crew.iter().all(|c| CREW_JOBS.contains(&c.job.as_str())));
        assert_eq!(d.release_date, None);
        assert_eq!(d.release_date_label(), "Unknown");
        assert_eq!(d.reviews[0].rating, Some(9.0));
        assert_eq!(
            d.backdrop_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/back.jpg")
        );
    }
}
