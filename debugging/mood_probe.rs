//! Run a mood through the recommendation pipeline against the live providers and print what
//! the view would show.
//! Usage:
//!   cargo run --bin mood_probe -- "I feel nostalgic"
//!   cargo run --bin mood_probe -- "I feel nostalgic" --details
//!   cargo run --bin mood_probe -- --review "This movie was absolutely fantastic!"
//! Requires TMDB_API_KEY and OPENAI_API_KEY in the environment (.env supported).

use anyhow::{anyhow, Result};
use cineseek::app::AppState;
use cineseek::config::Config;
use cineseek::view::{DetailOverlay, MoodView, ViewController};
use dotenvy::dotenv;
use std::env;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("warn"))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = Config::from_env()?;
    let state = AppState::from_config(&config)?;

    if args.first().map(String::as_str) == Some("--review") {
        let text = args
            .get(1)
            .ok_or_else(|| anyhow!("--review needs the review text"))?;
        let result = state.sentiment.analyze_sentiment(text).await?;
        println!("{}", result.summary());
        return Ok(());
    }

    let mood = args
        .first()
        .ok_or_else(|| anyhow!("usage: mood_probe <mood> [--details]"))?;
    let with_details = args.iter().any(|a| a == "--details");

    let mut view = ViewController::new(state.recommender.clone(), state.tmdb.clone());
    view.submit_mood(mood).await;
    println!("Regions: {:?}", view.mood_view().regions());

    let first_id = match view.mood_view() {
        MoodView::Results(results) => {
            println!("Based on your \"{}\" mood:", results.mood);
            println!("{}\n", results.explanation);
            for movie in &results.movies {
                println!(
                    "[{}] {} ({}) {}",
                    movie.id,
                    movie.title,
                    movie.year,
                    movie.genres.join(", ")
                );
                if let Some(poster) = &movie.poster_url {
                    println!("    {}", poster);
                }
            }
            results.movies.first().map(|m| m.id)
        }
        MoodView::Error { message } => {
            println!("Error: {}", message);
            None
        }
        other => {
            println!("Unexpected state: {:?}", other);
            None
        }
    };

    if let (true, Some(id)) = (with_details, first_id) {
        view.open_details(id).await;
        match view.overlay() {
            DetailOverlay::Visible(details) => {
                println!("\n{} - {}", details.title, details.release_date_label());
                println!(
                    "Runtime: {}  Rating: {:.1}",
                    details.runtime_label(),
                    details.vote_average
                );
                println!("Genres: {}", details.genres.join(", "));
                for member in &details.cast {
                    println!("  {} as {}", member.name, member.character);
                }
                for member in &details.crew {
                    println!("  {}: {}", member.job, member.name);
                }
                println!("Reviews: {}", details.reviews.len());
            }
            overlay => {
                println!("\n{}", overlay.error_message().unwrap_or("Details not loaded"));
            }
        }
        view.close_details();
    }

    Ok(())
}
