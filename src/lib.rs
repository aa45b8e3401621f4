//! Markov Bot — short generated phrases, decorated for social media.
//!
//! Samples a first-order Markov chain trained on a text corpus, trims the
//! phrase, tags content words as hashtags, appends emoji and standalone
//! hashtags, and keeps the result inside a tweet-sized length budget.

pub mod core;
pub mod logging;
pub mod post;
pub mod schema;
