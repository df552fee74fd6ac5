use std::path::PathBuf;

/// First playback device of the first card
pub const DEFAULT_DEVICE: &str = "/dev/snd/pcmC0D0p";

/// Playback parameters negotiated with the kernel.
///
/// Everything except the device path is fixed at 44.1kHz 16 bit stereo
/// with a two period fifo; the values in the wav header are not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmConfig {
    /// PCM character device to open
    pub device: PathBuf,
    /// Frames per second
    pub rate: u32,
    /// Interleaved channels per frame
    pub channels: u32,
    /// Bits per sample
    pub sample_bits: u32,
    /// Periods in the kernel fifo
    pub periods: u32,
    /// Lower bound for the fifo size in bytes
    pub min_buffer_bytes: u32,
    /// Frames queued before the kernel starts playback on its own
    pub start_threshold: u64,
    /// Fill level (in frames) at which the kernel declares an underrun
    pub stop_threshold: u64,
    /// Frames of silence the kernel fills in after the application data
    pub silence_size: u64,
    /// Bytes handed to each write, half the fifo
    pub write_size: usize,
}

impl PcmConfig {
    /// Bytes in one interleaved frame.
    pub fn frame_bytes(&self) -> usize {
        (self.channels.saturating_mul(self.sample_bits) / 8) as usize
    }

    /// Use a different device, keeping every other parameter.
    pub fn with_device(mut self, device: impl Into<PathBuf>) -> Self {
        self.device = device.into();
        self
    }
}

impl Default for PcmConfig {
    fn default() -> Self {
        PcmConfig {
            device: PathBuf::from(DEFAULT_DEVICE),
            rate: 44_100,
            channels: 2,
            sample_bits: 16,
            periods: 2,
            min_buffer_bytes: 8192,
            start_threshold: 2048,
            stop_threshold: 2048,
            silence_size: 1 << 30,
            write_size: 4096,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_cd_audio() {
        let config = PcmConfig::default();

        assert_eq!(config.device, PathBuf::from("/dev/snd/pcmC0D0p"));
        assert_eq!(config.frame_bytes(), 4);
        assert_eq!(config.write_size * 2, config.min_buffer_bytes as usize);
    }

    #[test]
    fn frame_bytes_saturates() {
        let config = PcmConfig {
            channels: u32::MAX,
            ..PcmConfig::default()
        };

        assert_eq!(config.frame_bytes(), (u32::MAX / 8) as usize);
    }

    #[test]
    fn override_device_only() {
        let config = PcmConfig::default().with_device("/dev/snd/pcmC1D0p");

        assert_eq!(config.device, PathBuf::from("/dev/snd/pcmC1D0p"));
        assert_eq!(config.rate, 44_100);
    }
}
