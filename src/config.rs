use anyhow::{anyhow, Context, Result};
use std::env;
use std::net::SocketAddr;

use crate::recommend::FallbackPolicy;

pub const DEFAULT_TMDB_BASE: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
pub const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_RECOMMENDATION_COUNT: usize = 5;
const DEFAULT_BIND: &str = "0.0.0.0:3146";

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub image_base_url: String,
}

impl TmdbConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_TMDB_BASE.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_OPENAI_BASE.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub tmdb: TmdbConfig,
    pub openai: OpenAiConfig,
    pub recommendation_count: usize,
    pub fallback: FallbackPolicy,
    pub bind: SocketAddr,
}

impl Config {
    /// Reads configuration from the process environment. Both API keys are required.
    pub fn from_env() -> Result<Self> {
        let tmdb = TmdbConfig {
            api_key: required("TMDB_API_KEY")?,
            base_url: optional("TMDB_BASE_URL").unwrap_or_else(|| DEFAULT_TMDB_BASE.to_string()),
            image_base_url: optional("TMDB_IMAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_IMAGE_BASE.to_string()),
        };
        let openai = OpenAiConfig {
            api_key: required("OPENAI_API_KEY")?,
            base_url: optional("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE.to_string()),
            model: optional("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
        };

        let recommendation_count = match optional("RECOMMENDATION_COUNT") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow!("RECOMMENDATION_COUNT must be a positive integer"))?,
            None => DEFAULT_RECOMMENDATION_COUNT,
        };

        let fallback = match optional("RECOMMENDATION_FALLBACK") {
            Some(raw) => parse_fallback(&raw)?,
            None => FallbackPolicy::UseFallback,
        };

        let bind = optional("CINESEEK_BIND")
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
            .parse()
            .context("CINESEEK_BIND must be a socket address")?;

        Ok(Self {
            tmdb,
            openai,
            recommendation_count,
            fallback,
            bind,
        })
    }
}

fn required(key: &str) -> Result<String> {
    optional(key).ok_or_else(|| anyhow!("Missing required environment variable: {}", key))
}

fn optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_fallback(raw: &str) -> Result<FallbackPolicy> {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(FallbackPolicy::UseFallback),
        "false" | "0" | "no" | "off" => Ok(FallbackPolicy::Propagate),
        other => Err(anyhow!(
            "RECOMMENDATION_FALLBACK must be true or false, got '{}'",
            other
        )),
    }
}
