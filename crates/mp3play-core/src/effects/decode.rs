//! MP3 decode sessions on symphonia.
//!
//! Each session owns a probed format reader and a codec decoder for the first
//! audio track. Packets are decoded to interleaved i16 through a scratch
//! `SampleBuffer` that lives as long as the session.

use std::fs::File;
use std::path::{Path, PathBuf};

use symphonia::core::audio::{SampleBuffer, SignalSpec};
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_MP3, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::effects::DecoderSession;
use crate::error::{PlayerError, Result};
use crate::models::{ReadStatus, StreamFormat};

/// MP3 frames per packet for layer III at 32/44.1/48 kHz.
const DEFAULT_FRAMES_PER_PACKET: u64 = 1152;

/// Fails when the symphonia registry has no MP3 decoder compiled in.
pub fn ensure_mp3_support() -> Result<()> {
    match symphonia::default::get_codecs().get_codec(CODEC_TYPE_MP3) {
        Some(_) => Ok(()),
        None => Err(PlayerError::Init("MP3 decoder not available".into())),
    }
}

pub struct SymphoniaSession {
    path: PathBuf,
    reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    format: StreamFormat,
    frames_per_packet: u64,
    scratch: Option<SampleBuffer<i16>>,
}

impl SymphoniaSession {
    pub fn open(path: &Path) -> Result<Self> {
        let open_err = |source: SymphoniaError| PlayerError::Open {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(|e| open_err(SymphoniaError::IoError(e)))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        hint.with_extension("mp3");

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .map_err(open_err)?;
        let reader = probed.format;

        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| PlayerError::Unsupported {
                path: path.to_path_buf(),
                reason: "no audio track".into(),
            })?;

        let params = &track.codec_params;
        if params.codec != CODEC_TYPE_MP3 {
            return Err(PlayerError::Unsupported {
                path: path.to_path_buf(),
                reason: "not an MP3 stream".into(),
            });
        }

        let unsupported = |reason: &str| PlayerError::Unsupported {
            path: path.to_path_buf(),
            reason: reason.into(),
        };
        let sample_rate = params.sample_rate.ok_or_else(|| unsupported("unknown sample rate"))?;
        let channels = params
            .channels
            .map(|c| c.count() as u16)
            .filter(|&c| c > 0)
            .ok_or_else(|| unsupported("unknown channel layout"))?;

        let track_id = track.id;
        let frames_per_packet = params
            .max_frames_per_packet
            .unwrap_or(DEFAULT_FRAMES_PER_PACKET);

        let decoder = symphonia::default::get_codecs()
            .make(params, &DecoderOptions::default())
            .map_err(open_err)?;

        let format = StreamFormat::new(sample_rate, channels);
        log::info!("mp3play: opened {} ({})", path.display(), format);

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            decoder,
            track_id,
            format,
            frames_per_packet,
            scratch: None,
        })
    }
}

impl DecoderSession for SymphoniaSession {
    fn format(&self) -> StreamFormat {
        self.format
    }

    fn block_size(&self) -> usize {
        self.frames_per_packet as usize * self.format.channels as usize
    }

    fn read(&mut self, buf: &mut [i16]) -> Result<ReadStatus> {
        loop {
            let packet = match self.reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    return Ok(ReadStatus::Done);
                }
                Err(e) => return Err(PlayerError::Read(e)),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(msg)) => {
                    // Corrupt frame: resync on the next packet.
                    log::warn!("mp3play: skipping bad frame in {}: {}", self.path.display(), msg);
                    continue;
                }
                Err(e) => return Err(PlayerError::Read(e)),
            };

            let spec = *decoded.spec();
            let actual = StreamFormat::new(spec.rate, spec.channels.count() as u16);
            if actual != self.format {
                return Err(PlayerError::FormatMismatch {
                    expected: self.format,
                    actual,
                });
            }

            let needed = decoded.frames() * spec.channels.count();
            if needed > buf.len() {
                return Err(PlayerError::BlockOverflow {
                    needed,
                    capacity: buf.len(),
                });
            }

            let scratch = scratch_for(&mut self.scratch, decoded.capacity() as u64, spec);
            scratch.copy_interleaved_ref(decoded);
            let samples = scratch.samples();
            buf[..samples.len()].copy_from_slice(samples);
            return Ok(ReadStatus::Block(samples.len()));
        }
    }
}

/// Reuse the scratch buffer unless this packet needs a larger one.
fn scratch_for(
    slot: &mut Option<SampleBuffer<i16>>,
    frames: u64,
    spec: SignalSpec,
) -> &mut SampleBuffer<i16> {
    let needed = frames as usize * spec.channels.count();
    if slot.as_ref().is_some_and(|s| s.capacity() < needed) {
        *slot = None;
    }
    slot.get_or_insert_with(|| SampleBuffer::new(frames, spec))
}
