use std::path::Path;

use crate::error::Result;
use crate::models::{ReadStatus, StreamFormat};

/// Source of per-file decoder sessions and output devices.
///
/// The player only talks to this trait. The native backend pairs symphonia
/// with cpal; tests script their own.
pub trait AudioBackend {
    fn open_decoder(&self, path: &Path) -> Result<Box<dyn DecoderSession>>;
    fn open_device(&self, format: &StreamFormat) -> Result<Box<dyn OutputDevice>>;
}

/// One open MP3 stream. Dropping it releases the decoder.
pub trait DecoderSession {
    fn format(&self) -> StreamFormat;

    /// Recommended buffer length in samples for [`DecoderSession::read`].
    fn block_size(&self) -> usize;

    /// Decode the next block into the front of `buf`.
    fn read(&mut self, buf: &mut [i16]) -> Result<ReadStatus>;
}

/// One open live output stream. Dropping it drains and closes the device.
pub trait OutputDevice {
    /// Blocking write of interleaved samples.
    fn write(&mut self, samples: &[i16]) -> Result<()>;
}

pub mod decode;
#[cfg(feature = "native")]
pub mod native;
#[cfg(feature = "native")]
pub mod output;
