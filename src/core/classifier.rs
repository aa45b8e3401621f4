/// Lexical classification — which words count as content words.
///
/// The decorators only see the [`LexicalClassifier`] trait, so a dictionary
/// lookup in production and a fixed stub in tests are interchangeable.

use async_trait::async_trait;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("failed to read dictionary file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("lookup failed for {word:?}: {reason}")]
    Lookup { word: String, reason: String },
}

/// Part-of-speech flags for a single word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartsOfSpeech {
    pub noun: bool,
    pub verb: bool,
    pub adjective: bool,
}

impl PartsOfSpeech {
    /// A content word is a noun, verb or adjective.
    pub fn is_content_word(&self) -> bool {
        self.noun || self.verb || self.adjective
    }
}

/// Answers part-of-speech questions about a single letters-only word.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LexicalClassifier: Send + Sync {
    async fn classify(&self, word: &str) -> Result<PartsOfSpeech, ClassifierError>;
}

/// Dictionary-backed classifier over WordNet lemma indexes.
#[derive(Debug, Clone, Default)]
pub struct DictionaryClassifier {
    nouns: FxHashSet<String>,
    verbs: FxHashSet<String>,
    adjectives: FxHashSet<String>,
}

impl DictionaryClassifier {
    /// Build from in-memory word lists. Words are matched case-insensitively.
    pub fn from_words<N, V, A>(nouns: N, verbs: V, adjectives: A) -> Self
    where
        N: IntoIterator,
        N::Item: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
        A: IntoIterator,
        A::Item: AsRef<str>,
    {
        Self {
            nouns: lowercase_set(nouns),
            verbs: lowercase_set(verbs),
            adjectives: lowercase_set(adjectives),
        }
    }

    /// Load `index.noun`, `index.verb` and `index.adj` from a WordNet dict directory.
    pub async fn load_wordnet(dir: &Path) -> Result<Self, ClassifierError> {
        let nouns = read_index(&dir.join("index.noun")).await?;
        let verbs = read_index(&dir.join("index.verb")).await?;
        let adjectives = read_index(&dir.join("index.adj")).await?;
        debug!(
            nouns = nouns.len(),
            verbs = verbs.len(),
            adjectives = adjectives.len(),
            "loaded WordNet indexes"
        );
        Ok(Self {
            nouns,
            verbs,
            adjectives,
        })
    }

    pub fn len(&self) -> usize {
        self.nouns.len() + self.verbs.len() + self.adjectives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LexicalClassifier for DictionaryClassifier {
    async fn classify(&self, word: &str) -> Result<PartsOfSpeech, ClassifierError> {
        if word.is_empty() {
            return Ok(PartsOfSpeech::default());
        }
        let lemma = word.to_lowercase();
        Ok(PartsOfSpeech {
            noun: self.nouns.contains(&lemma),
            verb: self.verbs.contains(&lemma),
            adjective: self.adjectives.contains(&lemma),
        })
    }
}

fn lowercase_set<I>(words: I) -> FxHashSet<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| w.as_ref().to_lowercase())
        .collect()
}

async fn read_index(path: &Path) -> Result<FxHashSet<String>, ClassifierError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ClassifierError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(parse_index(&contents))
}

/// Parse the lemma column of a WordNet `index.*` file.
///
/// License header lines begin with a space; the lemma is the first field.
fn parse_index(contents: &str) -> FxHashSet<String> {
    contents
        .lines()
        .filter(|line| !line.starts_with(' '))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_lowercase)
        .collect()
}
