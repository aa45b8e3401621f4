/// Emoji embellishment appended after the phrase.

use rand::seq::SliceRandom;
use rand::Rng;

pub const PALETTE: &[&str] = &[
    "🙏", "❤️", "👀", "👌", "😍", "🌈", "😎", "🔥", "✨", "⚡️", "😂", "🙃", "😏", "😘", "🙂", "😱",
    "💅", "💁",
];

/// How many emoji to append, and whether they repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmojiOption {
    None,
    Single,
    Triple,
    TwoDifferent,
}

impl EmojiOption {
    pub const ALL: [EmojiOption; 4] = [
        EmojiOption::None,
        EmojiOption::Single,
        EmojiOption::Triple,
        EmojiOption::TwoDifferent,
    ];

    /// Uniformly pick one of the four options.
    pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    /// Render this option; every non-empty rendering starts with a space.
    ///
    /// `TwoDifferent` draws twice independently, so the two glyphs may match.
    pub fn render<R: Rng + ?Sized>(self, rng: &mut R) -> String {
        match self {
            EmojiOption::None => String::new(),
            EmojiOption::Single => format!(" {}", random_emoji(rng)),
            EmojiOption::Triple => format!(" {}", random_emoji(rng).repeat(3)),
            EmojiOption::TwoDifferent => {
                let first = random_emoji(rng);
                let second = random_emoji(rng);
                format!(" {first}{second}")
            }
        }
    }
}

/// Pick an option and render it in one step.
pub fn pick_option<R: Rng + ?Sized>(rng: &mut R) -> String {
    EmojiOption::pick(rng).render(rng)
}

fn random_emoji<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    PALETTE.choose(rng).copied().unwrap_or("✨")
}
