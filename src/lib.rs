//! Minimal wav player for Linux.
//!
//! Reads a canonical 44 byte RIFF/WAVE header, checks that the payload is
//! 16 bit PCM and streams it to an ALSA playback device through the kernel
//! PCM ioctls, without going through alsa-lib.
//!
//! ```no_run
//! use std::path::Path;
//! use playwav::{play_wav, PcmConfig};
//!
//! fn main() -> Result<(), playwav::Error> {
//!     play_wav(Path::new("./sine_stereo.wav"), &PcmConfig::default())
//! }
//! ```
//!
//! The hardware is always configured for 44.1kHz 16 bit stereo; files with a
//! different rate or channel count play at the wrong speed.

#![warn(missing_docs)]

mod chunk;
mod config;
mod error;
mod header;
pub mod pcm;
mod player;

pub use chunk::ChunkTag;
pub use config::{PcmConfig, DEFAULT_DEVICE};
pub use error::{Error, HeaderError};
pub use header::{Header, FORMAT_PCM};
pub use pcm::{Pcm, PcmError, Stream};
pub use player::{play_samples, play_wav};
