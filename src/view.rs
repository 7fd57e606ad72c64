use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{CineseekError, NO_MATCHES_MESSAGE};
use crate::models::{MoodResults, MovieDetails};
use crate::recommend::MoodRecommender;
use crate::tmdb::TmdbApi;

pub const MOOD_ERROR_MESSAGE: &str = "An error occurred while processing your mood";
pub const DETAILS_ERROR_MESSAGE: &str = "Failed to load movie details. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    MoodInput,
    Spinner,
    ErrorBanner,
    Explanation,
    ResultGrid,
    TryAnotherMood,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MoodView {
    Input,
    Loading { mood: String },
    Results(MoodResults),
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum MoodEvent {
    Submit(String),
    Succeeded(MoodResults),
    Failed(String),
    Reset,
}

impl MoodView {
    pub fn apply(self, event: MoodEvent) -> MoodView {
        match (self, event) {
            (state, MoodEvent::Submit(mood)) if mood.trim().is_empty() => state,
            (_, MoodEvent::Submit(mood)) => MoodView::Loading { mood },
            (MoodView::Loading { .. }, MoodEvent::Succeeded(results)) => {
                MoodView::Results(results)
            }
            (MoodView::Loading { .. }, MoodEvent::Failed(message)) => MoodView::Error { message },
            (_, MoodEvent::Reset) => MoodView::Input,
            // stale completion
            (state, _) => state,
        }
    }

    pub fn regions(&self) -> &'static [Region] {
        match self {
            MoodView::Input => &[Region::MoodInput],
            MoodView::Loading { .. } => &[Region::Spinner],
            MoodView::Results(_) => &[
                Region::Explanation,
                Region::TryAnotherMood,
                Region::ResultGrid,
            ],
            MoodView::Error { .. } => &[Region::ErrorBanner, Region::TryAnotherMood],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailOverlay {
    Closed,
    Loading { movie_id: i64 },
    Visible(MovieDetails),
    Failed { movie_id: i64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayEvent {
    Open(i64),
    Loaded(MovieDetails),
    Failed(i64),
    Close,
}

impl DetailOverlay {
    pub fn apply(self, event: OverlayEvent) -> DetailOverlay {
        match (self, event) {
            (_, OverlayEvent::Open(movie_id)) => DetailOverlay::Loading { movie_id },
            (DetailOverlay::Loading { movie_id }, OverlayEvent::Loaded(details))
                if details.id == movie_id =>
            {
                DetailOverlay::Visible(details)
            }
            (DetailOverlay::Loading { movie_id }, OverlayEvent::Failed(id)) if id == movie_id => {
                DetailOverlay::Failed { movie_id }
            }
            (_, OverlayEvent::Close) => DetailOverlay::Closed,
            (state, _) => state,
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, DetailOverlay::Closed)
    }

    pub fn error_message(&self) -> Option<&'static str> {
        matches!(self, DetailOverlay::Failed { .. }).then_some(DETAILS_ERROR_MESSAGE)
    }
}

/// Drives the mood and detail-overlay machines from user actions.
///
/// The two machines are independent: opening or closing the overlay never touches the mood
/// results underneath, and closing discards fetched details.
pub struct ViewController {
    recommender: MoodRecommender,
    tmdb: Arc<dyn TmdbApi>,
    mood: MoodView,
    overlay: DetailOverlay,
}

impl ViewController {
    pub fn new(recommender: MoodRecommender, tmdb: Arc<dyn TmdbApi>) -> Self {
        Self {
            recommender,
            tmdb,
            mood: MoodView::Input,
            overlay: DetailOverlay::Closed,
        }
    }

    pub fn mood_view(&self) -> &MoodView {
        &self.mood
    }

    pub fn overlay(&self) -> &DetailOverlay {
        &self.overlay
    }

    fn dispatch(&mut self, event: MoodEvent) {
        let state = std::mem::replace(&mut self.mood, MoodView::Input);
        self.mood = state.apply(event);
        debug!(regions = ?self.mood.regions(), "Mood view updated");
    }

    fn dispatch_overlay(&mut self, event: OverlayEvent) {
        let state = std::mem::replace(&mut self.overlay, DetailOverlay::Closed);
        self.overlay = state.apply(event);
    }

    pub async fn submit_mood(&mut self, mood: &str) {
        if mood.trim().is_empty() {
            return;
        }
        self.dispatch(MoodEvent::Submit(mood.to_string()));
        let event = match self.recommender.recommend_for_mood(mood).await {
            Ok(results) => {
                info!(
                    count = results.movies.len(),
                    mood = %results.mood,
                    "Showing recommendations"
                );
                MoodEvent::Succeeded(results)
            }
            Err(e) => {
                info!(error = %e, "Recommendation failed");
                MoodEvent::Failed(user_message(&e).to_string())
            }
        };
        self.dispatch(event);
    }

    pub fn reset(&mut self) {
        self.dispatch(MoodEvent::Reset);
    }

    pub async fn open_details(&mut self, movie_id: i64) {
        self.dispatch_overlay(OverlayEvent::Open(movie_id));
        let event = match self.tmdb.movie_details(movie_id).await {
            Some(details) => OverlayEvent::Loaded(details),
            None => OverlayEvent::Failed(movie_id),
        };
        self.dispatch_overlay(event);
    }

    pub fn close_details(&mut self) {
        self.dispatch_overlay(OverlayEvent::Close);
    }
}

pub fn user_message(error: &CineseekError) -> &'static str {
    match error {
        CineseekError::NoMatches => NO_MATCHES_MESSAGE,
        _ => MOOD_ERROR_MESSAGE,
    }
}
