use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Sentiment;

pub(super) const TEMPERATURE: f32 = 0.0;
pub(super) const SYSTEM_PROMPT: &str = "You are a sentiment analysis assistant for movie reviews. \
Classify the sentiment of the review as positive, negative, or neutral, and give your confidence \
as a number between 0 and 1. Reply in the form: <sentiment> <confidence>";

const DEFAULT_CONFIDENCE: f64 = 0.5;

static NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?|\.\d+").expect("valid number pattern"));

/// Lenient classification of a free-text model reply.
///
/// "positive" wins over "negative" when both appear; anything else is neutral. The first number
/// in the reply is the confidence when it lies in `[0, 1]`, otherwise 0.5.
pub fn classify_reply(reply: &str) -> (Sentiment, f64) {
    let lower = reply.to_lowercase();
    let sentiment = if lower.contains("positive") {
        Sentiment::Positive
    } else if lower.contains("negative") {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };

    let confidence = NUMBER
        .find(&lower)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|c| (0.0..=1.0).contains(c))
        .unwrap_or(DEFAULT_CONFIDENCE);

    (sentiment, confidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_label_and_confidence() {
        assert_eq!(classify_reply("Positive 0.92"), (Sentiment::Positive, 0.92));
        assert_eq!(
            classify_reply("The sentiment is negative (confidence: .8)"),
            (Sentiment::Negative, 0.8)
        );
        assert_eq!(classify_reply("neutral, 1"), (Sentiment::Neutral, 1.0));
    }

    #[test]
    fn malformed_reply_degrades_to_defaults() {
        assert_eq!(classify_reply(""), (Sentiment::Neutral, 0.5));
        assert_eq!(classify_reply("I cannot tell."), (Sentiment::Neutral, 0.5));
    }

    #[test]
    fn out_of_range_confidence_is_replaced() {
        assert_eq!(classify_reply("positive 92"), (Sentiment::Positive, 0.5));
        assert_eq!(classify_reply("positive 1.5"), (Sentiment::Positive, 0.5));
    }
}
