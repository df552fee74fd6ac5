use super::abi::{self, snd_interval, snd_mask, snd_pcm_hw_params, snd_pcm_info, snd_pcm_sw_params};
use crate::config::PcmConfig;
use std::borrow::Cow;
use std::ffi::CStr;
use tracing::debug;

/// Hardware parameter indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Param {
    /// Access type, a mask
    Access = 0,
    /// Sample format, a mask
    Format = 1,
    /// Subformat, a mask
    Subformat = 2,
    /// Bits per sample
    SampleBits = 8,
    /// Bits per frame
    FrameBits = 9,
    /// Channels per frame
    Channels = 10,
    /// Frames per second
    Rate = 11,
    /// Period length in microseconds
    PeriodTime = 12,
    /// Period length in frames
    PeriodSize = 13,
    /// Period length in bytes
    PeriodBytes = 14,
    /// Periods per buffer
    Periods = 15,
    /// Buffer length in microseconds
    BufferTime = 16,
    /// Buffer length in frames
    BufferSize = 17,
    /// Buffer length in bytes
    BufferBytes = 18,
    /// Timer tick in microseconds
    TickTime = 19,
}

impl Param {
    /// Mask parameters, in kernel order.
    pub const MASKS: [Param; 3] = [Param::Access, Param::Format, Param::Subformat];

    /// Interval parameters, in kernel order.
    pub const INTERVALS: [Param; 12] = [
        Param::SampleBits,
        Param::FrameBits,
        Param::Channels,
        Param::Rate,
        Param::PeriodTime,
        Param::PeriodSize,
        Param::PeriodBytes,
        Param::Periods,
        Param::BufferTime,
        Param::BufferSize,
        Param::BufferBytes,
        Param::TickTime,
    ];

    /// Name used in debug dumps.
    pub fn name(self) -> &'static str {
        match self {
            Param::Access => "access",
            Param::Format => "format",
            Param::Subformat => "subformat",
            Param::SampleBits => "sample_bits",
            Param::FrameBits => "frame_bits",
            Param::Channels => "channels",
            Param::Rate => "rate",
            Param::PeriodTime => "period_time",
            Param::PeriodSize => "period_size",
            Param::PeriodBytes => "period_bytes",
            Param::Periods => "periods",
            Param::BufferTime => "buffer_time",
            Param::BufferSize => "buffer_size",
            Param::BufferBytes => "buffer_bytes",
            Param::TickTime => "tick_time",
        }
    }

    fn mask_index(self) -> Option<usize> {
        let n = self as usize;
        (abi::FIRST_MASK..=abi::LAST_MASK)
            .contains(&n)
            .then(|| n - abi::FIRST_MASK)
    }

    fn interval_index(self) -> Option<usize> {
        let n = self as usize;
        (abi::FIRST_INTERVAL..=abi::LAST_INTERVAL)
            .contains(&n)
            .then(|| n - abi::FIRST_INTERVAL)
    }
}

/// Hardware parameter space handed to `SNDRV_PCM_IOCTL_HW_PARAMS`.
///
/// The kernel narrows every mask and interval to a single configuration
/// and writes the result back in place.
#[derive(Clone, Copy)]
pub struct HwParams {
    raw: snd_pcm_hw_params,
}

impl HwParams {
    /// Unrestricted space: every mask bit set, every interval `[0, u32::MAX]`.
    pub fn any() -> Self {
        let mut raw = snd_pcm_hw_params::zeroed();

        for mask in raw.masks.iter_mut() {
            mask.bits = [!0; abi::MASK_WORDS];
        }
        for interval in raw.intervals.iter_mut() {
            interval.min = 0;
            interval.max = !0;
        }

        HwParams { raw }
    }

    /// The fixed playback configuration.
    pub fn for_playback(config: &PcmConfig) -> Self {
        let mut params = Self::any();

        params.set_mask(Param::Access, abi::SNDRV_PCM_ACCESS_RW_INTERLEAVED);
        params.set_mask(Param::Format, abi::SNDRV_PCM_FORMAT_S16_LE);
        params.set_mask(Param::Subformat, abi::SNDRV_PCM_SUBFORMAT_STD);
        params.set_min(Param::BufferBytes, config.min_buffer_bytes);
        params.set_int(Param::SampleBits, config.sample_bits);
        params.set_int(Param::FrameBits, config.sample_bits * config.channels);
        params.set_int(Param::Channels, config.channels);
        params.set_int(Param::Periods, config.periods);
        params.set_int(Param::Rate, config.rate);

        params
    }

    /// Restrict a mask parameter to the single value `bit`.
    pub fn set_mask(&mut self, param: Param, bit: u32) {
        if bit >= abi::SNDRV_MASK_MAX {
            return;
        }
        if let Some(i) = param.mask_index() {
            let mask = &mut self.raw.masks[i];
            mask.bits = [0; abi::MASK_WORDS];
            mask.bits[(bit >> 5) as usize] |= 1 << (bit & 31);
        }
    }

    /// Raise the lower bound of an interval parameter.
    pub fn set_min(&mut self, param: Param, val: u32) {
        if let Some(i) = param.interval_index() {
            self.raw.intervals[i].min = val;
        }
    }

    /// Lower the upper bound of an interval parameter.
    pub fn set_max(&mut self, param: Param, val: u32) {
        if let Some(i) = param.interval_index() {
            self.raw.intervals[i].max = val;
        }
    }

    /// Pin an interval parameter to exactly `val`.
    pub fn set_int(&mut self, param: Param, val: u32) {
        if let Some(i) = param.interval_index() {
            let interval = &mut self.raw.intervals[i];
            interval.min = val;
            interval.max = val;
            interval.flags |= abi::INTERVAL_INTEGER;
        }
    }

    /// Mask bits of a mask parameter.
    pub(crate) fn mask(&self, param: Param) -> Option<&snd_mask> {
        param.mask_index().map(|i| &self.raw.masks[i])
    }

    /// Bounds of an interval parameter.
    pub(crate) fn interval(&self, param: Param) -> Option<&snd_interval> {
        param.interval_index().map(|i| &self.raw.intervals[i])
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut snd_pcm_hw_params {
        &mut self.raw
    }

    /// Log every mask and interval at debug level.
    pub fn dump(&self) {
        for param in Param::MASKS {
            if let Some(m) = self.mask(param) {
                debug!("{} = {:08x}{:08x}", param.name(), m.bits[1], m.bits[0]);
            }
        }
        for param in Param::INTERVALS {
            if let Some(i) = self.interval(param) {
                debug!(
                    "{} = ({},{}) omin={} omax={} int={} empty={}",
                    param.name(),
                    i.min,
                    i.max,
                    (i.flags & abi::INTERVAL_OPENMIN != 0) as u8,
                    (i.flags & abi::INTERVAL_OPENMAX != 0) as u8,
                    (i.flags & abi::INTERVAL_INTEGER != 0) as u8,
                    (i.flags & abi::INTERVAL_EMPTY != 0) as u8,
                );
            }
        }
    }
}

/// Software parameters handed to `SNDRV_PCM_IOCTL_SW_PARAMS`.
#[derive(Clone, Copy)]
pub struct SwParams {
    raw: snd_pcm_sw_params,
}

impl SwParams {
    /// Thresholds for the fixed playback configuration.
    pub fn for_playback(config: &PcmConfig) -> Self {
        let mut raw = snd_pcm_sw_params::zeroed();

        raw.tstamp_mode = abi::SNDRV_PCM_TSTAMP_NONE;
        raw.period_step = 1;
        raw.avail_min = 1;
        raw.start_threshold = config.start_threshold as _;
        raw.stop_threshold = config.stop_threshold as _;
        raw.silence_size = config.silence_size as _;
        raw.silence_threshold = 0;

        SwParams { raw }
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut snd_pcm_sw_params {
        &mut self.raw
    }
}

fn c_str(bytes: &[u8]) -> Cow<'_, str> {
    match CStr::from_bytes_until_nul(bytes) {
        Ok(s) => s.to_string_lossy(),
        Err(_) => String::from_utf8_lossy(bytes),
    }
}

/// Log the device description at debug level.
pub(crate) fn dump_info(info: &snd_pcm_info) {
    debug!("device = {}", info.device);
    debug!("subdevice = {}", info.subdevice);
    debug!("stream = {}", info.stream);
    debug!("card = {}", info.card);
    debug!("id = '{}'", c_str(&info.id));
    debug!("name = '{}'", c_str(&info.name));
    debug!("subname = '{}'", c_str(&info.subname));
    debug!("dev_class = {}", info.dev_class);
    debug!("dev_subclass = {}", info.dev_subclass);
    debug!("subdevices_count = {}", info.subdevices_count);
    debug!("subdevices_avail = {}", info.subdevices_avail);
}
