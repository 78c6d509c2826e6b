use std::path::Path;

use crate::effects::decode::{self, SymphoniaSession};
use crate::effects::output::CpalDevice;
use crate::effects::{AudioBackend, DecoderSession, OutputDevice};
use crate::error::Result;
use crate::models::StreamFormat;

/// symphonia decode + cpal output on the platform's default host.
pub struct NativeBackend {
    host: cpal::Host,
}

impl NativeBackend {
    /// Failing here is fatal: nothing could be played.
    pub fn init() -> Result<Self> {
        decode::ensure_mp3_support()?;
        let host = cpal::default_host();
        log::debug!("mp3play: audio host {:?}", host.id());
        Ok(Self { host })
    }
}

impl AudioBackend for NativeBackend {
    fn open_decoder(&self, path: &Path) -> Result<Box<dyn DecoderSession>> {
        Ok(Box::new(SymphoniaSession::open(path)?))
    }

    fn open_device(&self, format: &StreamFormat) -> Result<Box<dyn OutputDevice>> {
        Ok(Box::new(CpalDevice::open(&self.host, format)?))
    }
}
