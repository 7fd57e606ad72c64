use crate::config::Config;
use crate::error::{CineseekError, CineseekResult};
use crate::models::{Movie, MovieDetails, MoodResults, SentimentResult};
use crate::openai::{OpenAiClient, SentimentApi};
use crate::recommend::MoodRecommender;
use crate::tmdb::{TmdbApi, TmdbClient};
use anyhow::Result;
use axum::{
    extract::{DefaultBodyLimit, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub tmdb: Arc<dyn TmdbApi>,
    pub sentiment: Arc<dyn SentimentApi>,
    pub recommender: MoodRecommender,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self> {
        let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(config.tmdb.clone())?);
        let openai = Arc::new(OpenAiClient::new(config.openai.clone())?);
        let recommender = MoodRecommender::new(
            Arc::clone(&tmdb),
            openai.clone(),
            config.recommendation_count,
            config.fallback,
        );
        Ok(Self {
            tmdb,
            sentiment: openai,
            recommender,
        })
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let state = AppState::from_config(&config)?;
    info!(
        fallback = ?config.fallback,
        count = config.recommendation_count,
        "Recommendation policy configured"
    );

    let app = build_router(state);

    info!("Listening on {}", config.bind);
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/movies/popular", get(popular_movies))
        .route("/movies/search", get(search_movies))
        .route("/movies/:id", get(movie_details))
        .route("/recommendations", post(recommend))
        .route("/sentiment", post(sentiment))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: String,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct MoodRequest {
    mood: String,
}

#[derive(Debug, Deserialize)]
struct ReviewRequest {
    text: String,
}

async fn popular_movies(State(state): State<AppState>) -> Json<Vec<Movie>> {
    Json(state.tmdb.popular_movies().await)
}

async fn search_movies(
    State(state): State<AppState>,
    WithRejection(Query(params), _): WithRejection<Query<SearchParams>, CineseekError>,
) -> Json<Vec<Movie>> {
    Json(state.tmdb.search_movies(&params.query, params.limit).await)
}

async fn movie_details(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, CineseekError>,
) -> CineseekResult<Json<MovieDetails>> {
    state
        .tmdb
        .movie_details(id)
        .await
        .map(Json)
        .ok_or_else(|| CineseekError::NotFound(format!("movie {id}")))
}

async fn recommend(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<MoodRequest>, CineseekError>,
) -> CineseekResult<Json<MoodResults>> {
    info!("Received mood '{}'", req.mood.trim());
    let results = state.recommender.recommend_for_mood(&req.mood).await?;
    Ok(Json(results))
}

async fn sentiment(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<ReviewRequest>, CineseekError>,
) -> CineseekResult<Json<SentimentResult>> {
    let result = state.sentiment.analyze_sentiment(&req.text).await?;
    info!("{}", result.summary());
    Ok(Json(result))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        term.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
