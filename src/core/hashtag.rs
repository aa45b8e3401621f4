/// Hashtag decoration — inline tagging of content words and standalone
/// multi-word tags built from freshly sampled phrases.

use futures::future::try_join_all;
use rand::Rng;
use rustc_hash::FxHashSet;

use crate::core::classifier::{ClassifierError, LexicalClassifier, PartsOfSpeech};
use crate::core::sampler::{PhraseSampler, SamplerError};
use crate::core::text::{capitalize_first, strip_non_letters};

/// Function words that never become hashtags.
pub const STOPLIST: &[&str] = &[
    "in", "on", "or", "about", "an", "a", "i", "be", "is", "am", "are", "do", "does", "go", "as",
    "no", "there", "i'll", "he", "she", "they", "have", "may", "at", "so", "here", "it", "out",
    "much", "o'", "like", "such",
];

pub const DEFAULT_TAG_CHANCE: f64 = 0.25;
pub const DEFAULT_TAG_TOKENS: (usize, usize) = (3, 5);

/// A word paired with its classification, in phrase order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedWord<'a> {
    pub word: &'a str,
    pub parts: PartsOfSpeech,
}

/// Rewrites words into hashtags.
#[derive(Debug, Clone)]
pub struct HashtagDecorator {
    stoplist: FxHashSet<&'static str>,
    tag_chance: f64,
    tag_tokens: (usize, usize),
}

impl Default for HashtagDecorator {
    fn default() -> Self {
        Self {
            stoplist: STOPLIST.iter().copied().collect(),
            tag_chance: DEFAULT_TAG_CHANCE,
            tag_tokens: DEFAULT_TAG_TOKENS,
        }
    }
}

impl HashtagDecorator {
    /// `tag_chance` is clamped to `0.0..=1.0`; NaN means never tag.
    pub fn new(tag_chance: f64, tag_tokens: (usize, usize)) -> Self {
        let tag_chance = if tag_chance.is_nan() {
            0.0
        } else {
            tag_chance.clamp(0.0, 1.0)
        };
        Self {
            tag_chance,
            tag_tokens,
            ..Self::default()
        }
    }

    /// Whether a word may ever become a hashtag.
    pub fn is_allowed(&self, word: &str) -> bool {
        !self.stoplist.contains(word.to_lowercase().as_str())
    }

    /// Tag content words of `phrase` with probability `tag_chance`.
    ///
    /// Every word is classified concurrently; word order and spacing are kept.
    pub async fn tag_inline<C, R>(
        &self,
        phrase: &str,
        classifier: &C,
        rng: &mut R,
    ) -> Result<String, ClassifierError>
    where
        C: LexicalClassifier + ?Sized,
        R: Rng + ?Sized,
    {
        let classified = classify_words(phrase, classifier).await?;
        Ok(self.apply_tags(&classified, rng))
    }

    /// Rebuild the phrase from classified words, rolling for each content word.
    pub fn apply_tags<R: Rng + ?Sized>(&self, words: &[ClassifiedWord<'_>], rng: &mut R) -> String {
        words
            .iter()
            .map(|item| {
                if item.parts.is_content_word()
                    && rng.gen_bool(self.tag_chance)
                    && self.is_allowed(item.word)
                {
                    format!("#{}", item.word)
                } else {
                    item.word.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Build `count` standalone tags, joined by single spaces.
    pub fn standalone<R: Rng + ?Sized>(
        &self,
        count: usize,
        sampler: &PhraseSampler,
        rng: &mut R,
    ) -> Result<String, SamplerError> {
        let tags = (0..count)
            .map(|_| self.make_hashtag(sampler, rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tags.join(" "))
    }

    /// One `#TitleCasedPhrase` tag from a freshly sampled phrase.
    fn make_hashtag<R: Rng + ?Sized>(
        &self,
        sampler: &PhraseSampler,
        rng: &mut R,
    ) -> Result<String, SamplerError> {
        let (min, max) = self.tag_tokens;
        for _ in 0..sampler.max_attempts() {
            let phrase = sampler.sample(rng, min, max)?;
            let tag = hashtag_from_tokens(phrase.split(' '));
            if tag.len() > 1 {
                return Ok(tag);
            }
        }
        Err(SamplerError::Exhausted {
            min,
            max,
            attempts: sampler.max_attempts(),
        })
    }
}

/// Classify each word of `phrase` concurrently, returning results in phrase order.
pub async fn classify_words<'a, C>(
    phrase: &'a str,
    classifier: &C,
) -> Result<Vec<ClassifiedWord<'a>>, ClassifierError>
where
    C: LexicalClassifier + ?Sized,
{
    let lookups = phrase.split(' ').map(|word| async move {
        let parts = classifier.classify(&strip_non_letters(word)).await?;
        Ok::<_, ClassifierError>(ClassifiedWord { word, parts })
    });
    try_join_all(lookups).await
}

/// `["quick", "brown", "fox"]` → `#QuickBrownFox`.
pub fn hashtag_from_tokens<'a, I>(tokens: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let joined: String = tokens.into_iter().map(capitalize_first).collect();
    format!("#{}", strip_non_letters(&joined))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::DictionaryClassifier;
    use crate::core::markov::{Corpus, MarkovModel};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Mutex;
    use std::time::Duration;

    fn always() -> HashtagDecorator {
        HashtagDecorator::new(1.0, DEFAULT_TAG_TOKENS)
    }

    fn never() -> HashtagDecorator {
        HashtagDecorator::new(0.0, DEFAULT_TAG_TOKENS)
    }

    fn nouns(words: &[&str]) -> DictionaryClassifier {
        DictionaryClassifier::from_words(words.iter().copied(), [] as [&str; 0], [] as [&str; 0])
    }

    const NOUN: PartsOfSpeech = PartsOfSpeech {
        noun: true,
        verb: false,
        adjective: false,
    };

    /// Calls every word a noun.
    struct AllNouns;

    #[async_trait]
    impl LexicalClassifier for AllNouns {
        async fn classify(&self, _word: &str) -> Result<PartsOfSpeech, ClassifierError> {
            Ok(NOUN)
        }
    }

    /// Answers later the earlier a word sits in `words`, and records the
    /// order lookups finish in. Words at even positions are nouns.
    struct Staggered {
        words: Vec<&'static str>,
        finished: Mutex<Vec<String>>,
    }

    impl Staggered {
        fn new(words: &[&'static str]) -> Self {
            Self {
                words: words.to_vec(),
                finished: Mutex::new(Vec::new()),
            }
        }

        fn delay(&self, index: usize) -> Duration {
            Duration::from_millis(100 * (self.words.len() - index) as u64)
        }
    }

    #[async_trait]
    impl LexicalClassifier for Staggered {
        async fn classify(&self, word: &str) -> Result<PartsOfSpeech, ClassifierError> {
            let index = self
                .words
                .iter()
                .position(|w| *w == word)
                .ok_or_else(|| ClassifierError::Lookup {
                    word: word.to_string(),
                    reason: "unknown".to_string(),
                })?;
            tokio::time::sleep(self.delay(index)).await;
            self.finished.lock().unwrap().push(word.to_string());
            Ok(PartsOfSpeech {
                noun: index % 2 == 0,
                ..PartsOfSpeech::default()
            })
        }
    }

    #[test]
    fn hashtag_from_tokens_title_cases_and_strips() {
        assert_eq!(hashtag_from_tokens(["quick", "brown", "fox"]), "#QuickBrownFox");
        assert_eq!(hashtag_from_tokens(["to", "be,", "or", "not!"]), "#ToBeOrNot");
        assert_eq!(hashtag_from_tokens(["don't", "42", "stop"]), "#DontStop");
    }

    #[test]
    fn stoplist_is_case_insensitive() {
        let decorator = HashtagDecorator::default();
        assert!(!decorator.is_allowed("They"));
        assert!(!decorator.is_allowed("I'll"));
        assert!(!decorator.is_allowed("SUCH"));
        assert!(decorator.is_allowed("cat"));
        // Attached punctuation makes it a different word.
        assert!(decorator.is_allowed("in,"));
    }

    #[tokio::test]
    async fn content_words_always_tagged_at_full_chance() {
        let classifier = nouns(&["cat", "mat"]);
        let mut rng = StdRng::seed_from_u64(3);
        let tagged = always()
            .tag_inline("the Cat sat on the mat.", &classifier, &mut rng)
            .await
            .unwrap();
        assert_eq!(tagged, "the #Cat sat on the #mat.");
    }

    #[tokio::test]
    async fn nothing_tagged_at_zero_chance() {
        let classifier = nouns(&["cat", "mat"]);
        let mut rng = StdRng::seed_from_u64(3);
        let phrase = "the cat sat on the mat";
        let tagged = never().tag_inline(phrase, &classifier, &mut rng).await.unwrap();
        assert_eq!(tagged, phrase);
    }

    #[tokio::test]
    async fn stoplisted_content_words_pass_through() {
        let classifier = nouns(&["go", "out", "dog"]);
        let mut rng = StdRng::seed_from_u64(3);
        let tagged = always()
            .tag_inline("Go out dog", &classifier, &mut rng)
            .await
            .unwrap();
        assert_eq!(tagged, "Go out #dog");
    }

    #[tokio::test]
    async fn spacing_and_word_count_preserved() {
        let classifier = nouns(&["cat"]);
        let mut rng = StdRng::seed_from_u64(3);
        let tagged = always()
            .tag_inline("a  cat ", &classifier, &mut rng)
            .await
            .unwrap();
        assert_eq!(tagged, "a  #cat ");
    }

    #[tokio::test]
    async fn classifier_sees_letters_only() {
        let classifier = nouns(&["dont"]);
        let classified = classify_words("don't stop", &classifier).await.unwrap();
        assert_eq!(classified[0].word, "don't");
        assert!(classified[0].parts.noun);
        assert!(!classified[1].parts.noun);
    }

    #[tokio::test(start_paused = true)]
    async fn lookups_run_together_and_keep_phrase_order() {
        let words = ["alpha", "bravo", "charlie", "delta", "echo"];
        let classifier = Staggered::new(&words);
        let longest = classifier.delay(0);
        let total: Duration = (0..words.len()).map(|i| classifier.delay(i)).sum();

        let start = tokio::time::Instant::now();
        let classified = classify_words("alpha bravo charlie delta echo", &classifier)
            .await
            .unwrap();
        let elapsed = start.elapsed();

        let order: Vec<&str> = classified.iter().map(|c| c.word).collect();
        assert_eq!(order, words);
        for (index, item) in classified.iter().enumerate() {
            assert_eq!(item.parts.noun, index % 2 == 0, "{}", item.word);
        }

        // Later words answered first.
        let reversed: Vec<String> = words.iter().rev().map(|w| w.to_string()).collect();
        assert_eq!(*classifier.finished.lock().unwrap(), reversed);

        assert!(elapsed >= longest, "{elapsed:?}");
        assert!(elapsed < longest + Duration::from_millis(100), "{elapsed:?} vs sum {total:?}");
    }

    #[test]
    fn nan_chance_never_tags() {
        let decorator = HashtagDecorator::new(f64::NAN, DEFAULT_TAG_TOKENS);
        let words = [
            ClassifiedWord { word: "cat", parts: NOUN },
            ClassifiedWord { word: "mat", parts: NOUN },
        ];
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(decorator.apply_tags(&words, &mut rng), "cat mat");
    }

    #[test]
    fn chance_is_clamped() {
        let words = [ClassifiedWord { word: "cat", parts: NOUN }];
        let mut rng = StdRng::seed_from_u64(3);
        let high = HashtagDecorator::new(7.5, DEFAULT_TAG_TOKENS);
        assert_eq!(high.apply_tags(&words, &mut rng), "#cat");
        let low = HashtagDecorator::new(-1.0, DEFAULT_TAG_TOKENS);
        assert_eq!(low.apply_tags(&words, &mut rng), "cat");
    }

    #[tokio::test]
    async fn classifier_failure_propagates() {
        let mut classifier = crate::core::classifier::MockLexicalClassifier::new();
        classifier.expect_classify().returning(|word| {
            Err(ClassifierError::Lookup {
                word: word.to_string(),
                reason: "offline".to_string(),
            })
        });
        let mut rng = StdRng::seed_from_u64(3);
        let err = always()
            .tag_inline("cat", &classifier, &mut rng)
            .await
            .unwrap_err();
        assert!(matches!(err, ClassifierError::Lookup { .. }));
    }

    #[test]
    fn standalone_tags_from_fixed_walk() {
        let model = MarkovModel::from_transitions([
            ("quick", vec![("brown", 1)]),
            ("brown", vec![("fox!", 1)]),
        ])
        .unwrap();
        let mut tokens = vec!["-".to_string(); 5];
        tokens.push("quick".to_string());
        let sampler = PhraseSampler::new(Corpus::from_parts(tokens, model).unwrap());
        let mut rng = StdRng::seed_from_u64(11);

        let decorator = HashtagDecorator::default();
        assert_eq!(decorator.standalone(0, &sampler, &mut rng).unwrap(), "");
        assert_eq!(
            decorator.standalone(2, &sampler, &mut rng).unwrap(),
            "#QuickBrownFox #QuickBrownFox"
        );
    }

    #[test]
    fn standalone_tag_without_letters_is_exhausted() {
        let model = MarkovModel::from_transitions([("1", vec![("2", 1)]), ("2", vec![("3", 1)])])
            .unwrap();
        let mut tokens = vec!["-".to_string(); 5];
        tokens.push("1".to_string());
        let sampler =
            PhraseSampler::new(Corpus::from_parts(tokens, model).unwrap()).with_max_attempts(2);
        let mut rng = StdRng::seed_from_u64(11);

        let err = HashtagDecorator::default()
            .standalone(1, &sampler, &mut rng)
            .unwrap_err();
        assert!(matches!(err, SamplerError::Exhausted { attempts: 2, .. }));
    }

    fn word() -> impl Strategy<Value = String> {
        prop_oneof![
            prop::sample::select(STOPLIST.to_vec()).prop_map(str::to_string),
            "[a-zA-Z]{1,8}",
        ]
    }

    proptest! {
        #[test]
        fn inline_tagging_keeps_words_and_skips_stoplist(
            words in prop::collection::vec(word(), 1..12),
            seed in any::<u64>(),
        ) {
            let phrase = words.join(" ");
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let tagged = runtime
                .block_on(always().tag_inline(&phrase, &AllNouns, &mut rng))
                .unwrap();

            let out: Vec<&str> = tagged.split(' ').collect();
            prop_assert_eq!(out.len(), words.len());
            for (before, after) in words.iter().zip(&out) {
                if STOPLIST.contains(&before.to_lowercase().as_str()) {
                    prop_assert_eq!(*after, before.as_str());
                } else {
                    prop_assert_eq!(after.to_string(), format!("#{before}"));
                }
            }
        }
    }
}
