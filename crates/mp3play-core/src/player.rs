//! Sequential playback over an [`AudioBackend`].
//!
//! Per file: open decoder → query format → open device → decode/write until
//! end of stream or the first error. Decoder, device and PCM buffer are scoped
//! locals, so every exit path releases them before the next file starts.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::effects::AudioBackend;
use crate::error::{PlayerError, Result};
use crate::models::ReadStatus;

/// What happened across one `play_all` run.
#[derive(Debug, Default)]
pub struct PlaybackSummary {
    pub attempted: usize,
    pub completed: usize,
    pub failures: Vec<(PathBuf, PlayerError)>,
}

pub struct Player<B> {
    backend: B,
}

impl<B: AudioBackend> Player<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Play every path in order. Per-file errors are logged and skipped.
    ///
    /// Writes one `Playing <path>` line to `out` per attempted file.
    pub fn play_all<W: Write>(&self, paths: &[PathBuf], out: &mut W) -> PlaybackSummary {
        let mut summary = PlaybackSummary::default();

        for path in paths {
            summary.attempted += 1;
            writeln!(out, "Playing {}", path.display()).ok();
            out.flush().ok();

            match self.play_file(path) {
                Ok(samples) => {
                    log::debug!("mp3play: finished {} ({} samples)", path.display(), samples);
                    summary.completed += 1;
                }
                Err(e) => {
                    log::error!("mp3play: {}: {}", path.display(), e);
                    summary.failures.push((path.clone(), e));
                }
            }
        }

        summary
    }

    /// Play one file to the end. Returns the number of samples written.
    pub fn play_file(&self, path: &Path) -> Result<u64> {
        let mut session = self.backend.open_decoder(path)?;
        let format = session.format();
        let mut device = self.backend.open_device(&format)?;

        let mut buf = vec![0i16; session.block_size().max(1)];
        let mut written = 0u64;

        loop {
            match session.read(&mut buf)? {
                ReadStatus::Done => break,
                ReadStatus::Block(0) => continue,
                ReadStatus::Block(n) => {
                    device.write(&buf[..n])?;
                    written += n as u64;
                }
            }
        }

        // Device closes (and drains) before the decoder.
        drop(device);
        drop(session);
        Ok(written)
    }
}
