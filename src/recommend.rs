use futures::future;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::{CineseekError, CineseekResult};
use crate::models::{Movie, MoodRecommendation, MoodResults};
use crate::openai::RecommendationApi;
use crate::tmdb::TmdbApi;

const MAX_CONCURRENT_LOOKUPS: usize = 8;

/// What to do when the language model cannot produce recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Substitute [`fallback_recommendation`] and keep going.
    UseFallback,
    /// Return the model error to the caller.
    Propagate,
}

pub fn fallback_recommendation() -> MoodRecommendation {
    MoodRecommendation {
        titles: [
            "The Shawshank Redemption",
            "Forrest Gump",
            "Cinema Paradiso",
            "Stand By Me",
            "The Princess Bride",
        ]
        .iter()
        .map(|t| t.to_string())
        .collect(),
        mood: "nostalgic".to_string(),
        explanation: "These classic films evoke feelings of nostalgia and wonder, perfect for \
                      when you're feeling reflective about the past."
            .to_string(),
    }
}

/// Turns a mood into resolved TMDB movies.
#[derive(Clone)]
pub struct MoodRecommender {
    tmdb: Arc<dyn TmdbApi>,
    llm: Arc<dyn RecommendationApi>,
    count: usize,
    fallback: FallbackPolicy,
}

impl MoodRecommender {
    pub fn new(
        tmdb: Arc<dyn TmdbApi>,
        llm: Arc<dyn RecommendationApi>,
        count: usize,
        fallback: FallbackPolicy,
    ) -> Self {
        Self {
            tmdb,
            llm,
            count,
            fallback,
        }
    }

    /// Returns a non-empty movie list in the model's title order, or an error.
    ///
    /// Blank moods are rejected before any provider is called. Titles TMDB cannot resolve are
    /// dropped; `NoMatches` is returned only when none resolve.
    pub async fn recommend_for_mood(&self, mood: &str) -> CineseekResult<MoodResults> {
        if mood.trim().is_empty() {
            return Err(CineseekError::InvalidInput(
                "Mood description cannot be empty".to_string(),
            ));
        }

        let recommendation = match self.llm.mood_recommendations(mood, self.count).await {
            Ok(rec) => rec,
            Err(e) => match self.fallback {
                FallbackPolicy::UseFallback => {
                    warn!(error = %e, "Recommendation model failed, using fallback titles");
                    fallback_recommendation()
                }
                FallbackPolicy::Propagate => return Err(e),
            },
        };

        info!(
            mood = %recommendation.mood,
            titles = ?recommendation.titles,
            "Resolving recommended titles"
        );
        let movies = self.resolve_titles(&recommendation.titles).await;
        if movies.is_empty() {
            return Err(CineseekError::NoMatches);
        }

        Ok(MoodResults {
            movies,
            mood: recommendation.mood,
            explanation: recommendation.explanation,
        })
    }

    async fn resolve_titles(&self, titles: &[String]) -> Vec<Movie> {
        let lookups: Vec<_> = titles
            .iter()
            .cloned()
            .map(|title| {
                let tmdb = Arc::clone(&self.tmdb);
                async move {
                    let found = tmdb.search_movies(&title, Some(1)).await.into_iter().next();
                    if found.is_none() {
                        info!(title = %title, "No TMDB match for recommended title");
                    }
                    found
                }
            })
            .collect();

        // `buffered` yields in input order regardless of completion order.
        stream::iter(lookups)
            .buffered(MAX_CONCURRENT_LOOKUPS)
            .filter_map(future::ready)
            .collect()
            .await
    }
}
