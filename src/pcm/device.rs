use super::abi::{self, snd_pcm_info, snd_xferi};
use super::params::{self, HwParams, SwParams};
use super::{PcmError, Stream};
use crate::config::PcmConfig;
use nix::errno::Errno;
use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use tracing::debug;

/// An open and configured ALSA PCM playback device.
///
/// The file descriptor is closed when the device is dropped.
#[derive(Debug)]
pub struct Device {
    file: File,
}

impl Device {
    /// Open `config.device` and negotiate the fixed hardware and software
    /// parameters.
    pub fn open(config: &PcmConfig) -> Result<Self, PcmError> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.device)
            .map_err(|source| PcmError::Open {
                path: config.device.clone(),
                source,
            })?;

        let fd = file.as_raw_fd();

        let mut info = snd_pcm_info::zeroed();
        // SAFETY: fd is open and info is a correctly sized snd_pcm_info
        unsafe { abi::pcm_info(fd, &mut info) }.map_err(PcmError::Info)?;
        params::dump_info(&info);

        let mut hw = HwParams::for_playback(config);
        // SAFETY: as above, the kernel writes the refined space back in place
        unsafe { abi::pcm_hw_params(fd, hw.as_mut_ptr()) }.map_err(PcmError::HwParams)?;
        hw.dump();

        let mut sw = SwParams::for_playback(config);
        // SAFETY: as above
        unsafe { abi::pcm_sw_params(fd, sw.as_mut_ptr()) }.map_err(PcmError::SwParams)?;

        debug!(path = %config.device.display(), "pcm configured");
        Ok(Device { file })
    }
}

impl Stream for Device {
    fn prepare(&mut self) -> Result<(), Errno> {
        // SAFETY: fd is open for the lifetime of self
        unsafe { abi::pcm_prepare(self.file.as_raw_fd()) }.map(drop)
    }

    fn start(&mut self) -> Result<(), Errno> {
        // SAFETY: fd is open for the lifetime of self
        unsafe { abi::pcm_start(self.file.as_raw_fd()) }.map(drop)
    }

    fn write_frames(&mut self, data: &[u8], frames: usize) -> Result<usize, Errno> {
        let mut xfer = snd_xferi {
            result: 0,
            buf: data.as_ptr() as *mut _,
            frames: frames as _,
        };

        // SAFETY: buf points at `frames` whole frames inside `data`, the kernel
        // only reads from it and stores the transferred count in `result`
        unsafe { abi::pcm_writei_frames(self.file.as_raw_fd(), &mut xfer) }?;

        Ok(xfer.result as usize)
    }
}
