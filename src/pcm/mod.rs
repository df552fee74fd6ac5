//! Interleaved 16 bit stereo playback over the ALSA PCM ioctl interface.

mod abi;
mod device;
mod params;

pub use device::Device;
pub use params::{HwParams, Param, SwParams};

use crate::config::PcmConfig;
use nix::errno::Errno;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Device level failures, each carrying the errno reported by the kernel.
#[derive(Debug, Error)]
pub enum PcmError {
    /// The pcm was already closed
    #[error("not open")]
    NotOpen,
    /// The device node could not be opened
    #[error("cannot open device '{}': {source}", path.display())]
    Open {
        /// Device node
        path: PathBuf,
        /// Underlying io failure
        source: io::Error,
    },
    /// `SNDRV_PCM_IOCTL_INFO` failed
    #[error("cannot get info: {0}")]
    Info(Errno),
    /// The hardware rejected the parameter space
    #[error("cannot set hw params: {0}")]
    HwParams(Errno),
    /// The software parameters were rejected
    #[error("cannot set sw params: {0}")]
    SwParams(Errno),
    /// `SNDRV_PCM_IOCTL_PREPARE` failed
    #[error("cannot prepare channel: {0}")]
    Prepare(Errno),
    /// The write that fills the fifo before starting failed
    #[error("cannot write initial data: {0}")]
    InitialWrite(Errno),
    /// `SNDRV_PCM_IOCTL_START` failed
    #[error("cannot start channel: {0}")]
    Start(Errno),
    /// A write to the running stream failed with something other than an underrun
    #[error("cannot write stream data: {0}")]
    Write(Errno),
}

/// The three calls the write loop makes on a configured device.
pub trait Stream {
    /// Reset the stream into the prepared state.
    fn prepare(&mut self) -> Result<(), Errno>;
    /// Start playback of the queued frames.
    fn start(&mut self) -> Result<(), Errno>;
    /// Queue `frames` interleaved frames from the start of `data`, blocking
    /// until they fit. Returns the number of frames the kernel accepted.
    fn write_frames(&mut self, data: &[u8], frames: usize) -> Result<usize, Errno>;
}

/// A playback channel that is either stopped or running.
///
/// The first write, and the first write after an underrun, prepares the
/// stream, queues the data and starts playback.
#[derive(Debug)]
pub struct Pcm<S: Stream = Device> {
    stream: Option<S>,
    running: bool,
    underruns: u32,
    buffer_size: usize,
    frame_bytes: usize,
}

impl Pcm<Device> {
    /// Open and configure the device named in `config`.
    pub fn open(config: &PcmConfig) -> Result<Self, PcmError> {
        let device = Device::open(config)?;
        Ok(Self::with_stream(device, config))
    }
}

impl<S: Stream> Pcm<S> {
    /// Wrap an already configured stream.
    pub fn with_stream(stream: S, config: &PcmConfig) -> Self {
        Pcm {
            stream: Some(stream),
            running: false,
            underruns: 0,
            buffer_size: config.write_size,
            frame_bytes: config.frame_bytes().max(1),
        }
    }

    /// Bytes that should be handed to each [`Pcm::write`], half the fifo.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Number of underruns recovered from so far.
    pub fn underruns(&self) -> u32 {
        self.underruns
    }

    /// Whether the stream has been started and has not underrun since.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Queue `data` for playback. Trailing bytes that do not fill a whole
    /// frame are dropped.
    pub fn write(&mut self, data: &[u8]) -> Result<(), PcmError> {
        let stream = self.stream.as_mut().ok_or(PcmError::NotOpen)?;
        let frames = data.len() / self.frame_bytes;

        loop {
            if !self.running {
                stream.prepare().map_err(PcmError::Prepare)?;
                let written = stream
                    .write_frames(data, frames)
                    .map_err(PcmError::InitialWrite)?;
                short_write(written, frames);
                stream.start().map_err(PcmError::Start)?;
                self.running = true;
                return Ok(());
            }

            match stream.write_frames(data, frames) {
                Ok(written) => {
                    short_write(written, frames);
                    return Ok(());
                }
                Err(Errno::EPIPE) => {
                    self.running = false;
                    self.underruns += 1;
                    warn!(underruns = self.underruns, "underrun, restarting stream");
                }
                Err(e) => {
                    self.running = false;
                    return Err(PcmError::Write(e));
                }
            }
        }
    }

    /// Release the stream.
    pub fn close(&mut self) -> Result<(), PcmError> {
        self.stream.take().ok_or(PcmError::NotOpen)?;
        self.running = false;
        self.buffer_size = 0;
        debug!(underruns = self.underruns, "pcm closed");
        Ok(())
    }
}

// Blocking writes only come back short when interrupted by a signal.
fn short_write(written: usize, frames: usize) {
    if written < frames {
        trace!(written, frames, "short write");
    }
}
