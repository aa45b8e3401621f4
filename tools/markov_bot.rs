/// Markov Bot — compose tweets from a corpus and post them.
///
/// Usage: markov_bot [--config <bot.ron>] [--corpus <file.txt>] [--wordnet <dir>]
///                   [--seed <n>] [--count <n>] [--dry-run]
///
/// Credentials are read from BOT_CONSUMER_KEY, BOT_CONSUMER_SECRET,
/// BOT_ACCESS_TOKEN and BOT_ACCESS_TOKEN_SECRET unless --dry-run is given.
use anyhow::Context;
use clap::Parser;
use markov_bot::core::classifier::DictionaryClassifier;
use markov_bot::core::composer::TweetComposer;
use markov_bot::core::hashtag::HashtagDecorator;
use markov_bot::core::markov::Corpus;
use markov_bot::core::sampler::PhraseSampler;
use markov_bot::logging::init_subscriber;
use markov_bot::post::{DryRunPoster, Poster, TwitterPoster};
use markov_bot::schema::config::{BotConfig, Credentials};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "markov_bot", version, about = "Compose and post Markov-chain tweets")]
struct Args {
    /// RON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Corpus text file (overrides the config).
    #[arg(long)]
    corpus: Option<PathBuf>,
    /// WordNet dict directory (overrides the config).
    #[arg(long)]
    wordnet: Option<PathBuf>,
    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of tweets to compose.
    #[arg(long, default_value_t = 1)]
    count: u32,
    /// Log tweets instead of posting them.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => BotConfig::load_from_ron(path)
            .with_context(|| format!("loading config from '{}'", path.display()))?,
        None => BotConfig::default(),
    };
    if let Some(corpus) = args.corpus {
        config.corpus_path = corpus;
    }
    if let Some(wordnet) = args.wordnet {
        config.wordnet_dir = wordnet;
    }
    config.validate()?;
    init_subscriber(&config.log_level);

    let text = tokio::fs::read_to_string(&config.corpus_path)
        .await
        .with_context(|| format!("reading corpus '{}'", config.corpus_path.display()))?;
    let corpus = Corpus::load(&text)
        .with_context(|| format!("loading corpus '{}'", config.corpus_path.display()))?;
    info!(
        tokens = corpus.len(),
        states = corpus.model().state_count(),
        "corpus loaded"
    );

    let classifier = DictionaryClassifier::load_wordnet(&config.wordnet_dir).await?;

    let poster: Box<dyn Poster> = if args.dry_run {
        Box::new(DryRunPoster)
    } else {
        Box::new(TwitterPoster::new(
            Credentials::from_env()?,
            &config.api_base_url,
        )?)
    };

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let sampler = PhraseSampler::new(corpus)
        .with_start_offset(config.start_offset)
        .with_max_attempts(config.max_sample_attempts);
    let mut composer = TweetComposer::new(sampler, classifier, rng)
        .with_hashtags(HashtagDecorator::new(
            config.hashtag_chance,
            config.hashtag_tokens,
        ))
        .with_settings(config.composer_settings());

    for _ in 0..args.count {
        let tweet = composer.compose().await?;
        let receipt = poster.post(&tweet).await?;
        info!(id = ?receipt.id, "{}", tweet);
    }

    Ok(())
}
