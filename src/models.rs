use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lightweight list-view record built from a TMDB search or popular result.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    /// 0 when TMDB has no release date.
    pub year: i32,
    pub genres: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    pub id: i64,
    pub title: String,
    pub overview: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub runtime: Option<u32>,
    pub vote_average: f64,
    pub genres: Vec<String>,
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
    pub reviews: Vec<Review>,
}

impl MovieDetails {
    pub fn runtime_label(&self) -> String {
        match self.runtime {
            Some(minutes) if minutes > 0 => format!("{}h {}m", minutes / 60, minutes % 60),
            _ => "Unknown".to_string(),
        }
    }

    pub fn release_date_label(&self) -> String {
        self.release_date
            .map(|d| d.format("%B %-d, %Y").to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    pub character: String,
    pub profile_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CrewMember {
    pub id: i64,
    pub name: String,
    pub job: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub author: String,
    pub content: String,
    pub rating: Option<f64>,
}

/// Titles suggested by the language model, not yet resolved against TMDB.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MoodRecommendation {
    pub titles: Vec<String>,
    pub mood: String,
    pub explanation: String,
}

/// Resolved output of the recommendation pipeline. `movies` is never empty.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MoodResults {
    pub movies: Vec<Movie>,
    pub mood: String,
    pub explanation: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    pub text: String,
}

impl SentimentResult {
    pub fn summary(&self) -> String {
        format!(
            "Sentiment: {}, Confidence: {:.2}%",
            self.sentiment.to_string().to_uppercase(),
            self.confidence * 100.0
        )
    }
}
