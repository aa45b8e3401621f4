pub mod classifier;
pub mod composer;
pub mod emoji;
pub mod hashtag;
pub mod markov;
pub mod sampler;
pub mod text;
