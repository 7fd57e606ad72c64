use async_trait::async_trait;

use crate::error::{CineseekError, CineseekResult};
use crate::models::{MoodRecommendation, SentimentResult};

mod chat;
mod mood;
mod sentiment;

pub use chat::OpenAiClient;
pub use mood::parse_recommendation;
pub use sentiment::classify_reply;

#[async_trait]
pub trait RecommendationApi: Send + Sync {
    /// Asks the model for `count` titles matching `mood`.
    ///
    /// Fails with `InvalidInput` before any request when `mood` is blank, `Transport` when the
    /// call fails, and `Parse` when the reply is not the expected JSON object.
    async fn mood_recommendations(
        &self,
        mood: &str,
        count: usize,
    ) -> CineseekResult<MoodRecommendation>;
}

#[async_trait]
pub trait SentimentApi: Send + Sync {
    /// Classifies a review. Malformed model replies degrade to neutral / 0.5 instead of failing.
    async fn analyze_sentiment(&self, review: &str) -> CineseekResult<SentimentResult>;
}

#[async_trait]
impl RecommendationApi for OpenAiClient {
    async fn mood_recommendations(
        &self,
        mood: &str,
        count: usize,
    ) -> CineseekResult<MoodRecommendation> {
        if mood.trim().is_empty() {
            return Err(CineseekError::InvalidInput(
                "Mood description cannot be empty".to_string(),
            ));
        }
        let content = self
            .complete(
                &mood::system_prompt(count),
                &mood::user_prompt(mood),
                mood::TEMPERATURE,
                true,
            )
            .await?;
        parse_recommendation(&content, mood)
    }
}

#[async_trait]
impl SentimentApi for OpenAiClient {
    async fn analyze_sentiment(&self, review: &str) -> CineseekResult<SentimentResult> {
        if review.trim().is_empty() {
            return Err(CineseekError::InvalidInput(
                "Review text cannot be empty".to_string(),
            ));
        }
        let reply = self
            .complete(
                sentiment::SYSTEM_PROMPT,
                review,
                sentiment::TEMPERATURE,
                false,
            )
            .await?;
        let (sentiment, confidence) = classify_reply(&reply);
        Ok(SentimentResult {
            sentiment,
            confidence,
            text: review.to_string(),
        })
    }
}
