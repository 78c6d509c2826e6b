//! mp3play-core — sequential MP3 playback.
//!
//! Collect paths, optionally shuffle, then play each file in turn.
//!
//! # Architecture
//!
//! ```text
//! collect  → input path to an ordered list of MP3 paths
//! shuffle  → in-place Fisher–Yates over that list
//! player   → per file: decoder session → output device → block loop
//! session  → the interactive prompt flow over any BufRead/Write
//! effects  → AudioBackend seam (symphonia decode, cpal output)
//! ```

pub mod collect;
pub mod config;
pub mod effects;
pub mod error;
pub mod models;
pub mod player;
pub mod session;
pub mod shuffle;

#[cfg(test)]
pub(crate) mod testing;

pub use collect::{collect_paths, Collected, InputKind};
pub use config::Config;
pub use error::{PlayerError, Result};
pub use models::*;
pub use player::{PlaybackSummary, Player};
pub use session::SessionOutcome;
pub use shuffle::shuffle;

#[cfg(feature = "native")]
pub use effects::native::NativeBackend;
