pub mod config;
pub mod tweet;
