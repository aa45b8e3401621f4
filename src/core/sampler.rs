/// Phrase sampler — bounded walks over the corpus chain with rejection-resampling.

use rand::Rng;
use thiserror::Error;
use tracing::trace;

use crate::core::markov::Corpus;

/// Tokens at the head of the corpus that a walk never starts from.
pub const DEFAULT_START_OFFSET: usize = 5;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SamplerError {
    #[error("invalid token window [{min}, {max}]")]
    InvalidWindow { min: usize, max: usize },
    #[error("no phrase of {min}..={max} tokens after {attempts} attempts")]
    Exhausted {
        min: usize,
        max: usize,
        attempts: u32,
    },
}

/// Draws phrases from a corpus chain within a token-count window.
#[derive(Debug, Clone)]
pub struct PhraseSampler {
    corpus: Corpus,
    start_offset: usize,
    max_attempts: u32,
}

impl PhraseSampler {
    pub fn new(corpus: Corpus) -> Self {
        Self {
            corpus,
            start_offset: DEFAULT_START_OFFSET,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_start_offset(mut self, start_offset: usize) -> Self {
        self.start_offset = start_offset;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Sample a phrase of `min_tokens..=max_tokens` tokens joined by single spaces.
    ///
    /// Walks that stop short of `min_tokens` are discarded and redrawn, up to
    /// the configured attempt budget.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        min_tokens: usize,
        max_tokens: usize,
    ) -> Result<String, SamplerError> {
        if min_tokens == 0 || min_tokens > max_tokens {
            return Err(SamplerError::InvalidWindow {
                min: min_tokens,
                max: max_tokens,
            });
        }

        for attempt in 1..=self.max_attempts {
            let tokens = self.walk(rng, max_tokens);
            if (min_tokens..=max_tokens).contains(&tokens.len()) {
                return Ok(tokens.join(" "));
            }
            trace!(attempt, len = tokens.len(), min_tokens, "rejected walk");
        }

        Err(SamplerError::Exhausted {
            min: min_tokens,
            max: max_tokens,
            attempts: self.max_attempts,
        })
    }

    /// One walk from a random start token, at most `max_tokens` long.
    fn walk<R: Rng + ?Sized>(&self, rng: &mut R, max_tokens: usize) -> Vec<&str> {
        let mut current = self.start_token(rng);
        let mut tokens = vec![current];
        let model = self.corpus.model();

        while tokens.len() < max_tokens {
            match model.next_token(current, rng) {
                Some(next) => {
                    tokens.push(next);
                    current = next;
                }
                None => break,
            }
        }
        tokens
    }

    fn start_token<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        let tokens = self.corpus.tokens();
        // Short corpora have nothing past the offset; start anywhere instead.
        let low = if self.start_offset < tokens.len() {
            self.start_offset
        } else {
            0
        };
        &tokens[rng.gen_range(low..tokens.len())]
    }
}
