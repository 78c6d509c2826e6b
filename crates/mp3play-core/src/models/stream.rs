//! Decoded stream description and decode results.

use std::fmt;

/// Sample encoding handed to the output device.
///
/// Decoding always produces interleaved signed 16-bit samples in native byte
/// order. The enum leaves room for the device side to report what it got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleEncoding {
    #[default]
    Signed16,
}

impl SampleEncoding {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleEncoding::Signed16 => 2,
        }
    }

    pub fn bits_per_sample(self) -> u16 {
        self.bytes_per_sample() as u16 * 8
    }
}

/// Rate, channel count and encoding of one decoded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub encoding: SampleEncoding,
}

impl StreamFormat {
    pub fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            encoding: SampleEncoding::Signed16,
        }
    }
}

impl fmt::Display for StreamFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz, {} ch, {}-bit",
            self.sample_rate,
            self.channels,
            self.encoding.bits_per_sample()
        )
    }
}

/// Outcome of one successful decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// This many samples (not frames) were written to the front of the buffer.
    Block(usize),
    /// Clean end of stream.
    Done,
}
