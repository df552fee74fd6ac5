use crate::pcm::PcmError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a wav header is rejected
#[derive(Debug, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// Fewer bytes than a canonical header
    #[error("header too short: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Required number of bytes
        expected: usize,
        /// Number of bytes available
        actual: usize,
    },
    /// Missing RIFF, WAVE or fmt tag
    #[error("is not a riff/wave file")]
    NotRiffWave,
    /// Format tag other than PCM, or an extended fmt chunk
    #[error("is not pcm format")]
    NotPcm {
        /// Audio format tag found in the header
        format: u16,
        /// Size of the fmt chunk
        fmt_size: u32,
    },
    /// Anything other than 16 bits per sample
    #[error("is not 16bit per sample")]
    UnsupportedBitDepth(u16),
}

/// Error type for playback failures
#[derive(Debug, Error)]
pub enum Error {
    /// Input file could not be opened
    #[error("cannot open '{}'", path.display())]
    Open {
        /// Path given on the command line
        path: PathBuf,
        /// Underlying io failure
        source: io::Error,
    },
    /// Input file ended before the header did
    #[error("cannot read header")]
    ReadHeader(#[source] io::Error),
    /// Header failed validation
    #[error("'{}' {kind}", path.display())]
    InvalidHeader {
        /// Path given on the command line
        path: PathBuf,
        /// What was wrong with it
        kind: HeaderError,
    },
    /// No memory for the declared payload
    #[error("could not allocate {len} bytes")]
    Alloc {
        /// Payload size declared in the header
        len: usize,
    },
    /// Input file ended before the declared payload did
    #[error("could not read {len} bytes")]
    ReadData {
        /// Payload size declared in the header
        len: u32,
        /// Underlying io failure
        source: io::Error,
    },
    /// Device failure
    #[error("pcm error: {0}")]
    Pcm(#[from] PcmError),
}
