//! Fetch a GitHub account's repositories and their languages, cache the responses on disk,
//! and render a static HTML page listing them newest first.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod render;
