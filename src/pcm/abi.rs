//! Mirrors of the `<sound/asound.h>` structures and ioctls used for playback.
#![allow(non_camel_case_types)]

use nix::libc::{c_int, c_long, c_uchar, c_uint, c_ulong, c_void};
use std::mem;

pub type snd_pcm_uframes_t = c_ulong;
pub type snd_pcm_sframes_t = c_long;

pub const SNDRV_PCM_ACCESS_RW_INTERLEAVED: u32 = 3;
pub const SNDRV_PCM_FORMAT_S16_LE: u32 = 2;
pub const SNDRV_PCM_SUBFORMAT_STD: u32 = 0;
pub const SNDRV_PCM_TSTAMP_NONE: c_int = 0;

pub const SNDRV_MASK_MAX: u32 = 256;
pub const MASK_WORDS: usize = (SNDRV_MASK_MAX as usize + 31) / 32;

pub const FIRST_MASK: usize = 0;
pub const LAST_MASK: usize = 2;
pub const FIRST_INTERVAL: usize = 8;
pub const LAST_INTERVAL: usize = 19;

// snd_interval bitfield, lowest bit first
pub const INTERVAL_OPENMIN: c_uint = 1 << 0;
pub const INTERVAL_OPENMAX: c_uint = 1 << 1;
pub const INTERVAL_INTEGER: c_uint = 1 << 2;
pub const INTERVAL_EMPTY: c_uint = 1 << 3;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct snd_mask {
    pub bits: [u32; MASK_WORDS],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct snd_interval {
    pub min: c_uint,
    pub max: c_uint,
    pub flags: c_uint,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct snd_pcm_info {
    pub device: c_uint,
    pub subdevice: c_uint,
    pub stream: c_int,
    pub card: c_int,
    pub id: [c_uchar; 64],
    pub name: [c_uchar; 80],
    pub subname: [c_uchar; 32],
    pub dev_class: c_int,
    pub dev_subclass: c_int,
    pub subdevices_count: c_uint,
    pub subdevices_avail: c_uint,
    pub sync: [c_uchar; 16],
    pub reserved: [c_uchar; 64],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct snd_pcm_hw_params {
    pub flags: c_uint,
    pub masks: [snd_mask; LAST_MASK - FIRST_MASK + 1],
    pub mres: [snd_mask; 5],
    pub intervals: [snd_interval; LAST_INTERVAL - FIRST_INTERVAL + 1],
    pub ires: [snd_interval; 9],
    pub rmask: c_uint,
    pub cmask: c_uint,
    pub info: c_uint,
    pub msbits: c_uint,
    pub rate_num: c_uint,
    pub rate_den: c_uint,
    pub fifo_size: snd_pcm_uframes_t,
    pub reserved: [c_uchar; 64],
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct snd_pcm_sw_params {
    pub tstamp_mode: c_int,
    pub period_step: c_uint,
    pub sleep_min: c_uint,
    pub avail_min: snd_pcm_uframes_t,
    pub xfer_align: snd_pcm_uframes_t,
    pub start_threshold: snd_pcm_uframes_t,
    pub stop_threshold: snd_pcm_uframes_t,
    pub silence_threshold: snd_pcm_uframes_t,
    pub silence_size: snd_pcm_uframes_t,
    pub boundary: snd_pcm_uframes_t,
    pub proto: c_uint,
    pub tstamp_type: c_uint,
    pub reserved: [c_uchar; 56],
}

#[repr(C)]
#[derive(Debug)]
pub struct snd_xferi {
    pub result: snd_pcm_sframes_t,
    pub buf: *mut c_void,
    pub frames: snd_pcm_uframes_t,
}

macro_rules! zeroed {
    ($($ty:ty),*) => {$(
        impl $ty {
            pub fn zeroed() -> Self {
                // SAFETY: plain integers and integer arrays, all-zero is valid
                unsafe { mem::zeroed() }
            }
        }
    )*};
}

zeroed!(snd_pcm_info, snd_pcm_hw_params, snd_pcm_sw_params);

const SNDRV_PCM_IOCTL_MAGIC: u8 = b'A';

nix::ioctl_read!(pcm_info, SNDRV_PCM_IOCTL_MAGIC, 0x01, snd_pcm_info);
nix::ioctl_readwrite!(pcm_hw_params, SNDRV_PCM_IOCTL_MAGIC, 0x11, snd_pcm_hw_params);
nix::ioctl_readwrite!(pcm_sw_params, SNDRV_PCM_IOCTL_MAGIC, 0x13, snd_pcm_sw_params);
nix::ioctl_none!(pcm_prepare, SNDRV_PCM_IOCTL_MAGIC, 0x40);
nix::ioctl_none!(pcm_start, SNDRV_PCM_IOCTL_MAGIC, 0x42);
nix::ioctl_write_ptr!(pcm_writei_frames, SNDRV_PCM_IOCTL_MAGIC, 0x50, snd_xferi);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn struct_sizes_match_the_kernel() {
        assert_eq!(mem::size_of::<snd_interval>(), 12);
        assert_eq!(mem::size_of::<snd_mask>(), 32);
        assert_eq!(mem::size_of::<snd_pcm_info>(), 288);
        assert_eq!(mem::size_of::<snd_pcm_hw_params>(), 608);
        assert_eq!(mem::size_of::<snd_pcm_sw_params>(), 136);
        assert_eq!(mem::size_of::<snd_xferi>(), 24);
    }

    #[test]
    fn interval_flags_fit_one_nibble() {
        let all = INTERVAL_OPENMIN | INTERVAL_OPENMAX | INTERVAL_INTEGER | INTERVAL_EMPTY;
        assert_eq!(all, 0xf);
    }
}
