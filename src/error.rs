use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub const NO_MATCHES_MESSAGE: &str = "Could not find details for the recommended movies";

#[derive(thiserror::Error, Debug)]
pub enum CineseekError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// `status` is `None` when the request never got a response.
    #[error("Transport error{}: {}", status_suffix(.status), .message)]
    Transport { status: Option<u16>, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("{}", NO_MATCHES_MESSAGE)]
    NoMatches,

    #[error("Not found: {0}")]
    NotFound(String),
}

impl CineseekError {
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        CineseekError::Transport {
            status,
            message: message.into(),
        }
    }
}

/// The request URL is stripped; it can carry the TMDB key.
impl From<reqwest::Error> for CineseekError {
    fn from(e: reqwest::Error) -> Self {
        let e = e.without_url();
        CineseekError::transport(e.status().map(|s| s.as_u16()), e.to_string())
    }
}

impl From<JsonRejection> for CineseekError {
    fn from(rejection: JsonRejection) -> Self {
        CineseekError::InvalidInput(rejection.body_text())
    }
}

impl From<PathRejection> for CineseekError {
    fn from(rejection: PathRejection) -> Self {
        CineseekError::InvalidInput(rejection.body_text())
    }
}

impl From<QueryRejection> for CineseekError {
    fn from(rejection: QueryRejection) -> Self {
        CineseekError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for CineseekError {
    fn into_response(self) -> Response {
        let status = match &self {
            CineseekError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CineseekError::NotFound(_) | CineseekError::NoMatches => StatusCode::NOT_FOUND,
            CineseekError::Transport { .. } | CineseekError::Parse(_) => StatusCode::BAD_GATEWAY,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

pub type CineseekResult<T> = Result<T, CineseekError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_message_includes_status_when_known() {
        let e = CineseekError::transport(Some(503), "OpenAI API error");
        assert_eq!(e.to_string(), "Transport error (status 503): OpenAI API error");
        let e = CineseekError::transport(None, "connection refused");
        assert_eq!(e.to_string(), "Transport error: connection refused");
    }

    #[test]
    fn maps_kinds_to_status_codes() {
        let cases = [
            (CineseekError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (CineseekError::NoMatches, StatusCode::NOT_FOUND),
            (CineseekError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (CineseekError::Parse("x".into()), StatusCode::BAD_GATEWAY),
            (CineseekError::transport(Some(500), "x"), StatusCode::BAD_GATEWAY),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn reqwest_errors_lose_their_url() {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:1/movie/popular?api_key=SECRET-KEY-123")
            .send()
            .await
            .expect_err("nothing listens on port 1");
        let converted = CineseekError::from(err);
        assert!(matches!(
            converted,
            CineseekError::Transport { status: None, .. }
        ));
        assert!(!converted.to_string().contains("SECRET-KEY-123"));
    }
}
