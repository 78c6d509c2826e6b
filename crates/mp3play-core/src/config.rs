//! Runtime configuration from environment variables.
//!
//! There is no config file. Two knobs:
//!
//! - `MP3PLAY_MAX_FILES` — how many directory matches to collect (`0` = no limit)
//! - `MP3PLAY_SEED` — fixed shuffle seed, for reproducible orders

use rand::rngs::StdRng;
use rand::SeedableRng;

pub const DEFAULT_MAX_FILES: usize = 256;

pub const ENV_MAX_FILES: &str = "MP3PLAY_MAX_FILES";
pub const ENV_SEED: &str = "MP3PLAY_SEED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Collection capacity for directory input. `None` collects everything.
    pub max_files: Option<usize>,
    /// Shuffle seed. `None` seeds from the wall clock.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_files: Some(DEFAULT_MAX_FILES),
            seed: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Bad values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_MAX_FILES) {
            match raw.trim().parse::<usize>() {
                Ok(0) => config.max_files = None,
                Ok(n) => config.max_files = Some(n),
                Err(_) => log::warn!("mp3play: ignoring invalid {}={:?}", ENV_MAX_FILES, raw),
            }
        }

        if let Some(raw) = lookup(ENV_SEED) {
            match raw.trim().parse::<u64>() {
                Ok(seed) => config.seed = Some(seed),
                Err(_) => log::warn!("mp3play: ignoring invalid {}={:?}", ENV_SEED, raw),
            }
        }

        config
    }

    /// The process-wide shuffle generator. Call once at startup.
    pub fn rng(&self) -> StdRng {
        let seed = self.seed.unwrap_or_else(clock_seed);
        log::debug!("mp3play: shuffle seed {}", seed);
        StdRng::seed_from_u64(seed)
    }
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(42)
}
