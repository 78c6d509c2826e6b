//! Scripted in-memory backend for player and session tests.
//!
//! Every open and close is appended to a shared event log, and a live-handle
//! counter lets tests assert nothing leaks from one file into the next.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use symphonia::core::errors::Error as SymphoniaError;

use crate::effects::{AudioBackend, DecoderSession, OutputDevice};
use crate::error::{PlayerError, Result};
use crate::models::{ReadStatus, StreamFormat};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    OpenDecoder(PathBuf),
    CloseDecoder(PathBuf),
    OpenDevice(StreamFormat),
    CloseDevice,
    Write(usize),
    /// Live decoder/device handles at the moment a decoder open was attempted.
    LiveAtOpen(usize),
}

/// How one path behaves.
#[derive(Debug, Clone)]
pub enum Script {
    /// Decoder open fails.
    OpenFails,
    /// Device open fails.
    DeviceFails,
    /// Yields these block sizes, then end of stream.
    Blocks(Vec<usize>),
    /// Yields these block sizes, then a read error.
    ReadFailsAfter(Vec<usize>),
    /// Yields these block sizes; the device rejects the write of block `n`.
    WriteFailsAt(Vec<usize>, usize),
}

#[derive(Default)]
struct Shared {
    events: RefCell<Vec<Event>>,
    live: Cell<usize>,
}

impl Shared {
    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

pub struct MockBackend {
    scripts: HashMap<PathBuf, Script>,
    shared: Rc<Shared>,
    pending_write_failure: Cell<Option<usize>>,
    format: StreamFormat,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            scripts: HashMap::new(),
            shared: Rc::new(Shared::default()),
            pending_write_failure: Cell::new(None),
            format: StreamFormat::new(44_100, 2),
        }
    }

    pub fn script(mut self, path: impl Into<PathBuf>, script: Script) -> Self {
        self.scripts.insert(path.into(), script);
        self
    }

    pub fn events(&self) -> Vec<Event> {
        self.shared.events.borrow().clone()
    }

    pub fn live(&self) -> usize {
        self.shared.live.get()
    }

    /// Paths whose decoder open was attempted, in order.
    pub fn attempted(&self) -> Vec<PathBuf> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::OpenDecoder(p) => Some(p),
                _ => None,
            })
            .collect()
    }
}

impl AudioBackend for MockBackend {
    fn open_decoder(&self, path: &Path) -> Result<Box<dyn DecoderSession>> {
        self.shared.push(Event::LiveAtOpen(self.shared.live.get()));
        self.shared.push(Event::OpenDecoder(path.to_path_buf()));

        let script = self
            .scripts
            .get(path)
            .cloned()
            .unwrap_or_else(|| Script::Blocks(vec![4, 4]));

        let (blocks, fail_read) = match script {
            Script::OpenFails => {
                return Err(PlayerError::Unsupported {
                    path: path.to_path_buf(),
                    reason: "mock open failure".into(),
                });
            }
            Script::DeviceFails => {
                self.pending_write_failure.set(Some(usize::MAX));
                (vec![4], false)
            }
            Script::Blocks(b) => (b, false),
            Script::ReadFailsAfter(b) => (b, true),
            Script::WriteFailsAt(b, n) => {
                self.pending_write_failure.set(Some(n));
                (b, false)
            }
        };

        self.shared.live.set(self.shared.live.get() + 1);
        Ok(Box::new(MockSession {
            path: path.to_path_buf(),
            blocks: blocks.into_iter().collect(),
            fail_read,
            format: self.format,
            shared: Rc::clone(&self.shared),
        }))
    }

    fn open_device(&self, format: &StreamFormat) -> Result<Box<dyn OutputDevice>> {
        let fail_at = self.pending_write_failure.take();
        if fail_at == Some(usize::MAX) {
            return Err(PlayerError::Device("mock device busy".into()));
        }
        self.shared.push(Event::OpenDevice(*format));
        self.shared.live.set(self.shared.live.get() + 1);
        Ok(Box::new(MockDevice {
            fail_at,
            writes: 0,
            shared: Rc::clone(&self.shared),
        }))
    }
}

struct MockSession {
    path: PathBuf,
    blocks: std::collections::VecDeque<usize>,
    fail_read: bool,
    format: StreamFormat,
    shared: Rc<Shared>,
}

impl DecoderSession for MockSession {
    fn format(&self) -> StreamFormat {
        self.format
    }

    fn block_size(&self) -> usize {
        8
    }

    fn read(&mut self, buf: &mut [i16]) -> Result<ReadStatus> {
        match self.blocks.pop_front() {
            Some(n) => {
                buf[..n].fill(1);
                Ok(ReadStatus::Block(n))
            }
            None if self.fail_read => Err(PlayerError::Read(SymphoniaError::DecodeError(
                "mock read error",
            ))),
            None => Ok(ReadStatus::Done),
        }
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.shared.live.set(self.shared.live.get() - 1);
        self.shared.push(Event::CloseDecoder(self.path.clone()));
    }
}

struct MockDevice {
    fail_at: Option<usize>,
    writes: usize,
    shared: Rc<Shared>,
}

impl OutputDevice for MockDevice {
    fn write(&mut self, samples: &[i16]) -> Result<()> {
        let index = self.writes;
        self.writes += 1;
        if self.fail_at == Some(index) {
            return Err(PlayerError::Write("mock device gone".into()));
        }
        self.shared.push(Event::Write(samples.len()));
        Ok(())
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.shared.live.set(self.shared.live.get() - 1);
        self.shared.push(Event::CloseDevice);
    }
}
