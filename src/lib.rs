pub mod app;
pub mod config;
pub mod error;
pub mod models;
pub mod openai;
pub mod recommend;
pub mod tmdb;
pub mod view;
