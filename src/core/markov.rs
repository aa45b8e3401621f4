/// Corpus model — whitespace tokenization and a first-order Markov chain.

use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;
use rustc_hash::FxHashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CorpusError {
    #[error("corpus contains no tokens")]
    Empty,
    #[error("token {0:?} has an empty successor list")]
    EmptySuccessors(String),
}

/// A trained first-order Markov model.
///
/// Every key maps to the tokens observed directly after it in the corpus,
/// each with its occurrence count. Successor lists are never empty.
#[derive(Debug, Clone, Default)]
pub struct MarkovModel {
    /// Transition table: token → [(next_token, count)], in first-seen order.
    transitions: FxHashMap<String, Vec<(String, u32)>>,
}

impl MarkovModel {
    /// Build a model from explicit transitions.
    pub fn from_transitions<I, S>(transitions: I) -> Result<Self, CorpusError>
    where
        I: IntoIterator<Item = (S, Vec<(S, u32)>)>,
        S: Into<String>,
    {
        let mut table = FxHashMap::default();
        for (token, successors) in transitions {
            let token = token.into();
            let successors: Vec<(String, u32)> = successors
                .into_iter()
                .filter(|(_, count)| *count > 0)
                .map(|(next, count)| (next.into(), count))
                .collect();
            if successors.is_empty() {
                return Err(CorpusError::EmptySuccessors(token));
            }
            table.insert(token, successors);
        }
        Ok(Self { transitions: table })
    }

    /// Draw a successor of `current`, weighted by observed count.
    ///
    /// Returns `None` when `current` was never followed by anything.
    pub fn next_token<R: Rng + ?Sized>(&self, current: &str, rng: &mut R) -> Option<&str> {
        let options = self.transitions.get(current)?;
        if options.len() == 1 {
            return Some(options[0].0.as_str());
        }
        let dist = WeightedIndex::<u32>::new(options.iter().map(|(_, count)| *count)).ok()?;
        Some(options[dist.sample(rng)].0.as_str())
    }

    pub fn successors(&self, token: &str) -> Option<&[(String, u32)]> {
        self.transitions.get(token).map(Vec::as_slice)
    }

    /// Number of distinct tokens with at least one successor.
    pub fn state_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

/// Trains Markov models from token sequences.
pub struct MarkovTrainer;

impl MarkovTrainer {
    /// Record every adjacent pair `(tokens[i], tokens[i + 1])` as a transition.
    pub fn train<S: AsRef<str>>(tokens: &[S]) -> MarkovModel {
        let mut transitions: FxHashMap<String, Vec<(String, u32)>> = FxHashMap::default();
        for window in tokens.windows(2) {
            add_transition(&mut transitions, window[0].as_ref(), window[1].as_ref());
        }
        MarkovModel { transitions }
    }
}

/// Add a transition to a transition table, incrementing the count.
fn add_transition(table: &mut FxHashMap<String, Vec<(String, u32)>>, prefix: &str, next: &str) {
    let entries = table.entry(prefix.to_string()).or_default();
    if let Some(entry) = entries.iter_mut().find(|(tok, _)| tok == next) {
        entry.1 += 1;
    } else {
        entries.push((next.to_string(), 1));
    }
}

/// The loaded corpus: its token sequence and the chain trained on it.
///
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct Corpus {
    tokens: Vec<String>,
    model: MarkovModel,
}

impl Corpus {
    /// Tokenize raw text on whitespace and train the chain over it.
    ///
    /// Casing and punctuation attached to words are preserved.
    pub fn load(raw: &str) -> Result<Self, CorpusError> {
        let tokens: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
        if tokens.is_empty() {
            return Err(CorpusError::Empty);
        }
        let model = MarkovTrainer::train(&tokens);
        Ok(Self { tokens, model })
    }

    /// Wrap an explicit token list and model.
    pub fn from_parts(tokens: Vec<String>, model: MarkovModel) -> Result<Self, CorpusError> {
        if tokens.is_empty() {
            return Err(CorpusError::Empty);
        }
        Ok(Self { tokens, model })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn model(&self) -> &MarkovModel {
        &self.model
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
