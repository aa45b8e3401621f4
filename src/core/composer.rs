/// Tweet composition: sample → trim → tag → embellish → length check.
///
/// Each attempt runs the whole pipeline from a fresh phrase. An over-long
/// result is discarded, never truncated.

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::core::classifier::{ClassifierError, LexicalClassifier};
use crate::core::emoji;
use crate::core::hashtag::HashtagDecorator;
use crate::core::sampler::{PhraseSampler, SamplerError};
use crate::core::text::{trim_trailing_punctuation, utf16_len};
use crate::schema::tweet::Tweet;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("sampler error: {0}")]
    Sampler(#[from] SamplerError),
    #[error("classifier error: {0}")]
    Classifier(#[from] ClassifierError),
    #[error("no tweet within {max_length} characters after {attempts} attempts")]
    AttemptsExhausted { attempts: u32, max_length: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerSettings {
    /// (min, max) token window of the main phrase.
    pub phrase_tokens: (usize, usize),
    /// Standalone tag count is drawn uniformly from `0..=max_standalone_hashtags`.
    pub max_standalone_hashtags: usize,
    pub max_length: usize,
    pub max_attempts: u32,
}

impl Default for ComposerSettings {
    fn default() -> Self {
        Self {
            phrase_tokens: (8, 12),
            max_standalone_hashtags: 2,
            max_length: 137,
            max_attempts: 100,
        }
    }
}

/// Why an attempt was thrown away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    EmptyPhrase,
    TooLong(usize),
}

/// Drives the composition pipeline. All randomness flows through `rng`.
pub struct TweetComposer<C, R> {
    sampler: PhraseSampler,
    hashtags: HashtagDecorator,
    classifier: C,
    rng: R,
    settings: ComposerSettings,
}

impl<C, R> TweetComposer<C, R>
where
    C: LexicalClassifier,
    R: Rng,
{
    pub fn new(sampler: PhraseSampler, classifier: C, rng: R) -> Self {
        Self {
            sampler,
            hashtags: HashtagDecorator::default(),
            classifier,
            rng,
            settings: ComposerSettings::default(),
        }
    }

    pub fn with_hashtags(mut self, hashtags: HashtagDecorator) -> Self {
        self.hashtags = hashtags;
        self
    }

    pub fn with_settings(mut self, settings: ComposerSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &ComposerSettings {
        &self.settings
    }

    /// Compose one tweet within `max_length`, restarting from a fresh phrase
    /// until it fits or the attempt budget runs out.
    pub async fn compose(&mut self) -> Result<Tweet, ComposeError> {
        for attempt in 1..=self.settings.max_attempts {
            match self.attempt().await? {
                Ok(text) => {
                    let tweet = Tweet::new(text, attempt);
                    info!(attempt, length = tweet.length(), "composed tweet");
                    return Ok(tweet);
                }
                Err(Rejection::EmptyPhrase) => {
                    debug!(attempt, "phrase trimmed to nothing, restarting");
                }
                Err(Rejection::TooLong(length)) => {
                    debug!(
                        attempt,
                        length,
                        max_length = self.settings.max_length,
                        "tweet over length budget, restarting"
                    );
                }
            }
        }

        Err(ComposeError::AttemptsExhausted {
            attempts: self.settings.max_attempts,
            max_length: self.settings.max_length,
        })
    }

    /// One pass through the pipeline.
    async fn attempt(&mut self) -> Result<Result<String, Rejection>, ComposeError> {
        let (min, max) = self.settings.phrase_tokens;
        let phrase = self.sampler.sample(&mut self.rng, min, max)?;

        let trimmed = trim_trailing_punctuation(&phrase);
        if trimmed.is_empty() {
            return Ok(Err(Rejection::EmptyPhrase));
        }

        let tagged = self
            .hashtags
            .tag_inline(trimmed, &self.classifier, &mut self.rng)
            .await?;
        let emoji = emoji::pick_option(&mut self.rng);
        let count = self.rng.gen_range(0..=self.settings.max_standalone_hashtags);
        let standalone = self.hashtags.standalone(count, &self.sampler, &mut self.rng)?;

        let text = format!("{tagged}{emoji} {standalone}").trim().to_string();
        let length = utf16_len(&text);
        if length <= self.settings.max_length {
            Ok(Ok(text))
        } else {
            Ok(Err(Rejection::TooLong(length)))
        }
    }
}
