use serde::Deserialize;

use crate::error::{CineseekError, CineseekResult};
use crate::models::MoodRecommendation;

pub(super) const TEMPERATURE: f32 = 0.7;

#[derive(Deserialize)]
struct RawRecommendation {
    #[serde(default)]
    titles: Vec<String>,
    mood: Option<String>,
    explanation: Option<String>,
}

pub(super) fn system_prompt(count: usize) -> String {
    format!(
        r#"You are a movie recommendation expert. Based on the user's mood, suggest {count} movie titles that would best match their emotional state.
Respond in JSON format with the following structure:
{{
  "titles": ["Movie Title 1", "Movie Title 2", ...],
  "mood": "interpreted mood",
  "explanation": "brief explanation of why these movies fit the mood"
}}
Only include the movie titles without years or additional information - just the exact titles as they would appear in a movie database."#
    )
}

pub(super) fn user_prompt(mood: &str) -> String {
    format!("I'm feeling {}. What movies would you recommend?", mood.trim())
}

/// Parses the model's JSON reply. A missing `mood` falls back to what the user typed.
pub fn parse_recommendation(content: &str, mood: &str) -> CineseekResult<MoodRecommendation> {
    let raw: RawRecommendation = serde_json::from_str(content.trim()).map_err(|e| {
        CineseekError::Parse(format!("Failed to parse movie recommendations: {e}"))
    })?;

    let titles = raw
        .titles
        .into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();

    Ok(MoodRecommendation {
        titles,
        mood: raw
            .mood
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| mood.trim().to_string()),
        explanation: raw.explanation.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_reply() {
        let rec = parse_recommendation(
            r#"{"titles": ["Cinema Paradiso", " Stand By Me "], "mood": "nostalgic", "explanation": "..."}"#,
            "I feel nostalgic",
        )
        .unwrap();
        assert_eq!(rec.titles, vec!["Cinema Paradiso", "Stand By Me"]);
        assert_eq!(rec.mood, "nostalgic");
        assert_eq!(rec.explanation, "...");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let rec = parse_recommendation(r#"{"titles": ["Heat"]}"#, "  tense ").unwrap();
        assert_eq!(rec.mood, "tense");
        assert_eq!(rec.explanation, "");
    }

    #[test]
    fn non_json_reply_is_a_parse_error() {
        for reply in ["Sure! Here are some movies:", "", r#"["Heat"]"#] {
            assert!(matches!(
                parse_recommendation(reply, "sad"),
                Err(CineseekError::Parse(_))
            ));
        }
    }

    #[test]
    fn prompt_mentions_count() {
        assert!(system_prompt(5).contains("suggest 5 movie titles"));
        assert_eq!(
            user_prompt(" happy "),
            "I'm feeling happy. What movies would you recommend?"
        );
    }
}
