mod build;
mod cache;
mod config;

pub use self::build::{build, fetch, render};
pub use self::cache::cache;
pub use self::config::config;
