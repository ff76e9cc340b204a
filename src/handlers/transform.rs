//! Per-connection text transforms.
//!
//! Obnoxious mode is applied before misspell mode, so the appended suffix
//! is scrambled along with the rest of the line.

use crate::state::ModeState;
use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;
use std::sync::LazyLock;

/// Suffix appended to every line in obnoxious mode.
pub const OBNOXIOUS_SUFFIX: &str = ", ay?";

/// Runs of non-word characters separate the tokens misspell mode scrambles.
static WORD_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("word boundary pattern is valid"));

/// Rewrites chat text according to a connection's modes.
#[derive(Debug, Clone, Copy)]
pub struct TextTransformer {
    misspell_aggressiveness: f64,
}

impl Default for TextTransformer {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl TextTransformer {
    /// Create a transformer. `misspell_aggressiveness` is clamped to `[0, 1]`;
    /// NaN is treated as 1.0.
    pub fn new(misspell_aggressiveness: f64) -> Self {
        let misspell_aggressiveness = if misspell_aggressiveness.is_nan() {
            1.0
        } else {
            misspell_aggressiveness.clamp(0.0, 1.0)
        };
        Self {
            misspell_aggressiveness,
        }
    }

    /// Apply every active mode to `text`.
    pub fn apply<R: Rng + ?Sized>(&self, modes: ModeState, text: &str, rng: &mut R) -> String {
        let mut text = text.to_string();
        if modes.obnoxious {
            text.push_str(OBNOXIOUS_SUFFIX);
        }
        if modes.misspell {
            text = self.misspell(&text, rng);
        }
        text
    }

    /// Split `sentence` on non-word runs, scramble each token's interior and
    /// rejoin the tokens with single spaces.
    ///
    /// Punctuation is consumed by the split, so `"hi, you"` comes back as
    /// `"hi you"` and a trailing separator leaves a trailing space.
    pub fn misspell<R: Rng + ?Sized>(&self, sentence: &str, rng: &mut R) -> String {
        WORD_BOUNDARY
            .split(sentence)
            .map(|word| self.scramble_word(word, rng))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn scramble_word<R: Rng + ?Sized>(&self, word: &str, rng: &mut R) -> String {
        let mut letters: Vec<char> = word.chars().collect();
        let len = letters.len();
        if len < 2 {
            return word.to_string();
        }
        shuffle_interior(&mut letters[1..len - 1], self.misspell_aggressiveness, rng);
        letters.into_iter().collect()
    }
}

/// Fisher–Yates pass where each swap step fires with probability
/// `aggressiveness`. At 1.0 this is a uniform permutation.
fn shuffle_interior<R: Rng + ?Sized>(letters: &mut [char], aggressiveness: f64, rng: &mut R) {
    if aggressiveness >= 1.0 {
        letters.shuffle(rng);
        return;
    }
    for i in (1..letters.len()).rev() {
        if rng.gen_bool(aggressiveness) {
            let j = rng.gen_range(0..=i);
            letters.swap(i, j);
        }
    }
}
