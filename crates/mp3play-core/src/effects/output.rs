//! Live output on cpal.
//!
//! cpal pulls samples from a callback thread; the player pushes them from the
//! control thread. A bounded ring sits between the two, so `write` blocks
//! while the device catches up. Stream errors are latched and fail the next
//! write.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample};
use parking_lot::Mutex;

use crate::effects::OutputDevice;
use crate::error::{PlayerError, Result};
use crate::models::StreamFormat;

/// Device sample formats we can feed from i16, best first.
const PREFERRED_FORMATS: [SampleFormat; 3] = [SampleFormat::I16, SampleFormat::F32, SampleFormat::U16];

const BACKPRESSURE_WAIT: Duration = Duration::from_millis(5);
const DRAIN_POLL: Duration = Duration::from_millis(10);
const MIN_RING_SAMPLES: usize = 4096;

/// Fixed-capacity FIFO of interleaved i16 samples.
struct SampleRing {
    buf: Vec<i16>,
    read_pos: usize,
    write_pos: usize,
    len: usize,
}

impl SampleRing {
    fn new(capacity: usize) -> Self {
        Self {
            buf: vec![0; capacity],
            read_pos: 0,
            write_pos: 0,
            len: 0,
        }
    }

    /// Push as much of `samples` as fits. Returns how many were taken.
    fn push(&mut self, samples: &[i16]) -> usize {
        let n = samples.len().min(self.buf.len() - self.len);
        for &s in &samples[..n] {
            self.buf[self.write_pos] = s;
            self.write_pos = (self.write_pos + 1) % self.buf.len();
        }
        self.len += n;
        n
    }

    /// Fill `out`, converting to the device format. Underflow plays silence.
    fn pull<T: Sample + FromSample<i16>>(&mut self, out: &mut [T]) -> usize {
        let n = out.len().min(self.len);
        for sample in out.iter_mut().take(n) {
            *sample = T::from_sample(self.buf[self.read_pos]);
            self.read_pos = (self.read_pos + 1) % self.buf.len();
        }
        self.len -= n;
        for sample in out.iter_mut().skip(n) {
            *sample = T::EQUILIBRIUM;
        }
        n
    }
}

/// State shared with the cpal callback threads.
struct Shared {
    ring: Mutex<SampleRing>,
    failed: AtomicBool,
    error: Mutex<Option<String>>,
}

impl Shared {
    fn fail(&self, msg: String) {
        self.error.lock().get_or_insert(msg);
        self.failed.store(true, Ordering::SeqCst);
    }

    fn is_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if !self.is_failed() {
            return Ok(());
        }
        let msg = self
            .error
            .lock()
            .clone()
            .unwrap_or_else(|| "output stream failed".into());
        Err(PlayerError::Write(msg))
    }
}

/// The default output device, opened for one file's format.
pub struct CpalDevice {
    stream: cpal::Stream,
    shared: Arc<Shared>,
    name: String,
}

impl CpalDevice {
    pub fn open(host: &cpal::Host, format: &StreamFormat) -> Result<Self> {
        let device = host
            .default_output_device()
            .ok_or_else(|| PlayerError::Device("no default output device".into()))?;
        let name = device.name().unwrap_or_else(|_| "unknown device".into());

        let offered: Vec<SampleFormat> = device
            .supported_output_configs()
            .map_err(|e| PlayerError::Device(e.to_string()))?
            .filter(|range| {
                range.channels() == format.channels
                    && range.min_sample_rate().0 <= format.sample_rate
                    && range.max_sample_rate().0 >= format.sample_rate
            })
            .map(|range| range.sample_format())
            .collect();

        let sample_format = choose_sample_format(&offered)
            .ok_or_else(|| PlayerError::Device(format!("{} does not support {}", name, format)))?;

        let config = cpal::StreamConfig {
            channels: format.channels,
            sample_rate: cpal::SampleRate(format.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let shared = Arc::new(Shared {
            ring: Mutex::new(SampleRing::new(ring_capacity(format))),
            failed: AtomicBool::new(false),
            error: Mutex::new(None),
        });

        let stream = match sample_format {
            SampleFormat::I16 => build_stream::<i16>(&device, &config, &shared),
            SampleFormat::F32 => build_stream::<f32>(&device, &config, &shared),
            SampleFormat::U16 => build_stream::<u16>(&device, &config, &shared),
            other => Err(PlayerError::Device(format!("unsupported sample format {:?}", other))),
        }?;
        stream.play().map_err(|e| PlayerError::Device(e.to_string()))?;

        log::debug!("mp3play: opened {} as {:?} ({})", name, sample_format, format);
        Ok(Self { stream, shared, name })
    }
}

impl OutputDevice for CpalDevice {
    fn write(&mut self, samples: &[i16]) -> Result<()> {
        let mut rest = samples;
        while !rest.is_empty() {
            self.shared.check()?;
            let taken = self.shared.ring.lock().push(rest);
            rest = &rest[taken..];
            if !rest.is_empty() {
                thread::sleep(BACKPRESSURE_WAIT);
            }
        }
        Ok(())
    }
}

impl Drop for CpalDevice {
    fn drop(&mut self) {
        // Play out what is queued unless the stream is already dead.
        while !self.shared.is_failed() && self.shared.ring.lock().len > 0 {
            thread::sleep(DRAIN_POLL);
        }
        if let Err(e) = self.stream.pause() {
            log::debug!("mp3play: pausing {} on close: {}", self.name, e);
        }
        log::debug!("mp3play: closed {}", self.name);
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    shared: &Arc<Shared>,
) -> Result<cpal::Stream>
where
    T: SizedSample + FromSample<i16>,
{
    let cb_shared = Arc::clone(shared);
    let err_shared = Arc::clone(shared);
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                cb_shared.ring.lock().pull(data);
            },
            move |err| {
                log::error!("mp3play: output stream error: {}", err);
                err_shared.fail(err.to_string());
            },
            None,
        )
        .map_err(|e| PlayerError::Device(e.to_string()))
}

fn choose_sample_format(offered: &[SampleFormat]) -> Option<SampleFormat> {
    PREFERRED_FORMATS
        .iter()
        .copied()
        .find(|f| offered.contains(f))
}

/// About half a second of audio.
fn ring_capacity(format: &StreamFormat) -> usize {
    (format.sample_rate as usize * format.channels as usize / 2).max(MIN_RING_SAMPLES)
}
