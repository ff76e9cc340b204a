//! Chat behavior configuration.

use serde::Deserialize;

/// Chat behavior tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Probability in `[0, 1]` that each shuffle step of misspell mode swaps
    /// a pair of interior letters. 1.0 (default) is a full uniform permutation.
    #[serde(default = "default_misspell_aggressiveness")]
    pub misspell_aggressiveness: f64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            misspell_aggressiveness: default_misspell_aggressiveness(),
        }
    }
}

fn default_misspell_aggressiveness() -> f64 {
    1.0
}
