//! The interactive prompt flow.
//!
//! Ask for a path, collect, ask about shuffling (directories with matches
//! only), then hand the list to the player. Generic over the input and output
//! streams so the whole conversation can be driven from memory.

use std::io::{self, BufRead, Write};

use rand::Rng;

use crate::collect::{collect_paths, path_from_bytes, trim_input, InputKind};
use crate::config::Config;
use crate::effects::AudioBackend;
use crate::error::Result;
use crate::player::{PlaybackSummary, Player};
use crate::shuffle::shuffle;

pub const PATH_PROMPT: &str = "Enter the path to the MP3 file or directory: ";
pub const SHUFFLE_PROMPT: &str = "Shuffle files? (y/n): ";

#[derive(Debug)]
pub enum SessionOutcome {
    /// Directory input with nothing matching; no prompt, no playback.
    NoFiles,
    Played(PlaybackSummary),
}

/// Run one full session. Only fatal errors are returned.
pub fn run<R, W, B, G>(
    input: &mut R,
    out: &mut W,
    player: &Player<B>,
    config: &Config,
    rng: &mut G,
) -> Result<SessionOutcome>
where
    R: BufRead,
    W: Write,
    B: AudioBackend,
    G: Rng + ?Sized,
{
    prompt(out, PATH_PROMPT)?;
    let mut line = Vec::new();
    input.read_until(b'\n', &mut line)?;

    let collected = collect_paths(path_from_bytes(trim_input(&line)), config)?;
    let mut paths = collected.paths;

    if collected.kind == InputKind::Directory {
        if paths.is_empty() {
            log::warn!("mp3play: no MP3 files found in the directory");
            return Ok(SessionOutcome::NoFiles);
        }
        prompt(out, SHUFFLE_PROMPT)?;
        if read_shuffle_answer(input)? {
            shuffle(&mut paths, rng);
        }
    }

    Ok(SessionOutcome::Played(player.play_all(&paths, out)))
}

/// `y` or `Y` opts in; anything else opts out.
pub fn wants_shuffle(answer: u8) -> bool {
    matches!(answer, b'y' | b'Y')
}

fn prompt<W: Write>(out: &mut W, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes())?;
    out.flush()
}

/// First non-whitespace byte, skipping blank lines. EOF opts out.
fn read_shuffle_answer<R: BufRead>(input: &mut R) -> io::Result<bool> {
    let mut line = Vec::new();
    loop {
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            return Ok(false);
        }
        if let Some(&b) = line.iter().find(|b| !b.is_ascii_whitespace()) {
            return Ok(wants_shuffle(b));
        }
    }
}
