use crate::chunk::ChunkTag;
use crate::error::HeaderError;
use core::fmt;

/// PCM format tag
pub const FORMAT_PCM: u16 = 1;

/// Struct representing the canonical 44 byte header of a WAV file
///
/// for more information see [`here`]
///
/// [`here`]: http://soundfile.sapp.org/doc/WaveFormat/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Should be `RIFF`
    pub riff_id: ChunkTag,
    /// Size of the file minus the first 8 bytes
    pub riff_size: u32,
    /// Should be `WAVE`
    pub riff_format: ChunkTag,
    /// Should be `fmt `
    pub fmt_id: ChunkTag,
    /// Size of the fmt chunk, 16 for plain PCM
    pub fmt_size: u32,
    /// Audio format tag, `1` for PCM
    pub audio_format: u16,
    /// number of audio channels in the sample data, channels are interleaved
    pub num_channels: u16,
    /// sample rate, typical values are `44_100`, `48_000` or `96_000`
    pub sample_rate: u32,
    /// `sample_rate * num_channels * bit_depth / 8`
    pub byte_rate: u32,
    /// `num_channels * bit_depth / 8`
    pub block_align: u16,
    /// bit depth for each sample
    pub bit_depth: u16,
    /// Should be `data`, never checked
    pub data_id: ChunkTag,
    /// Number of payload bytes following the header
    pub data_size: u32,
}

fn tag(bytes: &[u8], at: usize) -> ChunkTag {
    let b: [u8; 4] = bytes[at..at + 4].try_into().unwrap_or([0; 4]);
    ChunkTag::from_bytes(&b)
}

fn u16_at(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn u32_at(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

impl Header {
    /// Size of the canonical header in bytes
    pub const SIZE: usize = 44;

    /// Decode the first [`Header::SIZE`] bytes of a file.
    ///
    /// No validation is done here, see [`Header::validate`].
    ///
    /// ```
    /// use playwav::Header;
    ///
    /// let header = Header::pcm16(48_000, 2, 16);
    /// let parsed = Header::from_bytes(&header.to_bytes()).unwrap();
    ///
    /// assert_eq!(parsed.sample_rate, 48_000);
    /// assert_eq!(parsed.num_channels, 2);
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HeaderError> {
        if bytes.len() < Self::SIZE {
            return Err(HeaderError::Truncated {
                expected: Self::SIZE,
                actual: bytes.len(),
            });
        }

        Ok(Header {
            riff_id: tag(bytes, 0),
            riff_size: u32_at(bytes, 4),
            riff_format: tag(bytes, 8),
            fmt_id: tag(bytes, 12),
            fmt_size: u32_at(bytes, 16),
            audio_format: u16_at(bytes, 20),
            num_channels: u16_at(bytes, 22),
            sample_rate: u32_at(bytes, 24),
            byte_rate: u32_at(bytes, 28),
            block_align: u16_at(bytes, 32),
            bit_depth: u16_at(bytes, 34),
            data_id: tag(bytes, 36),
            data_size: u32_at(bytes, 40),
        })
    }

    /// Check that the header describes a plain 16 bit PCM file.
    pub fn validate(&self) -> Result<(), HeaderError> {
        if self.riff_id != ChunkTag::Riff
            || self.riff_format != ChunkTag::Wave
            || self.fmt_id != ChunkTag::Fmt
        {
            return Err(HeaderError::NotRiffWave);
        }

        if self.audio_format != FORMAT_PCM || self.fmt_size != 16 {
            return Err(HeaderError::NotPcm {
                format: self.audio_format,
                fmt_size: self.fmt_size,
            });
        }

        if self.bit_depth != 16 {
            return Err(HeaderError::UnsupportedBitDepth(self.bit_depth));
        }

        Ok(())
    }

    /// Canonical header for `data_len` bytes of 16 bit PCM.
    ///
    /// Derived sizes wrap like the 32 bit fields they are stored in.
    pub fn pcm16(sample_rate: u32, num_channels: u16, data_len: u32) -> Self {
        let block_align = num_channels.wrapping_mul(2);

        Header {
            riff_id: ChunkTag::Riff,
            riff_size: data_len.wrapping_add(Self::SIZE as u32 - 8),
            riff_format: ChunkTag::Wave,
            fmt_id: ChunkTag::Fmt,
            fmt_size: 16,
            audio_format: FORMAT_PCM,
            num_channels,
            sample_rate,
            byte_rate: sample_rate.wrapping_mul(u32::from(block_align)),
            block_align,
            bit_depth: 16,
            data_id: ChunkTag::Data,
            data_size: data_len,
        }
    }

    /// Serialize into the canonical layout.
    pub fn to_bytes(&self) -> [u8; Header::SIZE] {
        let mut bytes = [0; Header::SIZE];

        bytes[0..4].copy_from_slice(&self.riff_id.to_bytes());
        bytes[4..8].copy_from_slice(&self.riff_size.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.riff_format.to_bytes());
        bytes[12..16].copy_from_slice(&self.fmt_id.to_bytes());
        bytes[16..20].copy_from_slice(&self.fmt_size.to_le_bytes());
        bytes[20..22].copy_from_slice(&self.audio_format.to_le_bytes());
        bytes[22..24].copy_from_slice(&self.num_channels.to_le_bytes());
        bytes[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        bytes[28..32].copy_from_slice(&self.byte_rate.to_le_bytes());
        bytes[32..34].copy_from_slice(&self.block_align.to_le_bytes());
        bytes[34..36].copy_from_slice(&self.bit_depth.to_le_bytes());
        bytes[36..40].copy_from_slice(&self.data_id.to_bytes());
        bytes[40..44].copy_from_slice(&self.data_size.to_le_bytes());

        bytes
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ch, {} hz, {} bit, {}",
            self.num_channels,
            self.sample_rate,
            self.bit_depth,
            if self.audio_format == FORMAT_PCM {
                "PCM"
            } else {
                "unknown"
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEREO_16: [u8; 44] = [
        0x52, 0x49, 0x46, 0x46, // RIFF
        0x34, 0x00, 0x00, 0x00, // chunk size
        0x57, 0x41, 0x56, 0x45, // WAVE
        0x66, 0x6d, 0x74, 0x20, // fmt_
        0x10, 0x00, 0x00, 0x00, // chunk size
        0x01, 0x00, // audio format
        0x02, 0x00, // num channels
        0x44, 0xac, 0x00, 0x00, // sample rate
        0x10, 0xb1, 0x02, 0x00, // byte rate
        0x04, 0x00, // block align
        0x10, 0x00, // bits per sample
        0x64, 0x61, 0x74, 0x61, // data
        0x10, 0x00, 0x00, 0x00, // chunk size
    ];

    #[test]
    fn parse_16_bit_stereo() {
        let header = Header::from_bytes(&STEREO_16).unwrap();

        assert_eq!(header.riff_id, ChunkTag::Riff);
        assert_eq!(header.riff_size, 52);
        assert_eq!(header.audio_format, 1);
        assert_eq!(header.num_channels, 2);
        assert_eq!(header.sample_rate, 44_100);
        assert_eq!(header.byte_rate, 176_400);
        assert_eq!(header.block_align, 4);
        assert_eq!(header.bit_depth, 16);
        assert_eq!(header.data_id, ChunkTag::Data);
        assert_eq!(header.data_size, 16);
        assert_eq!(header.validate(), Ok(()));
    }

    #[test]
    fn ignore_bytes_past_the_header() {
        let mut bytes = STEREO_16.to_vec();
        bytes.extend_from_slice(&[0xaa; 16]);

        let header = Header::from_bytes(&bytes).unwrap();

        assert_eq!(header.to_bytes(), STEREO_16);
    }

    #[test]
    fn fail_on_short_input() {
        assert_eq!(
            Header::from_bytes(&STEREO_16[..43]).unwrap_err(),
            HeaderError::Truncated {
                expected: 44,
                actual: 43
            }
        );
    }

    #[test]
    fn fail_on_non_wave_files() {
        for at in [0, 8, 12] {
            let mut bytes = STEREO_16;
            bytes[at] = b'X';

            let header = Header::from_bytes(&bytes).unwrap();
            assert_eq!(header.validate(), Err(HeaderError::NotRiffWave));
        }
    }

    #[test]
    fn fail_on_non_pcm_format() {
        let mut bytes = STEREO_16;
        bytes[20] = 0x03; // IEEE float

        let header = Header::from_bytes(&bytes).unwrap();
        assert_eq!(
            header.validate(),
            Err(HeaderError::NotPcm {
                format: 3,
                fmt_size: 16
            })
        );
    }

    #[test]
    fn fail_on_extended_fmt_chunk() {
        let mut bytes = STEREO_16;
        bytes[16] = 0x12;

        let header = Header::from_bytes(&bytes).unwrap();
        assert_eq!(
            header.validate(),
            Err(HeaderError::NotPcm {
                format: 1,
                fmt_size: 18
            })
        );
    }

    #[test]
    fn fail_on_24_bit() {
        let mut bytes = STEREO_16;
        bytes[34] = 0x18;

        let header = Header::from_bytes(&bytes).unwrap();
        assert_eq!(
            header.validate(),
            Err(HeaderError::UnsupportedBitDepth(24))
        );
    }

    #[test]
    fn riff_check_comes_before_format_check() {
        let mut bytes = STEREO_16;
        bytes[8] = b'X';
        bytes[20] = 0x03;
        bytes[34] = 0x08;

        let header = Header::from_bytes(&bytes).unwrap();
        assert_eq!(header.validate(), Err(HeaderError::NotRiffWave));
    }

    #[test]
    fn data_tag_is_not_checked() {
        let mut bytes = STEREO_16;
        bytes[36..40].copy_from_slice(b"LIST");

        let header = Header::from_bytes(&bytes).unwrap();
        assert_eq!(header.data_id, ChunkTag::Unknown(*b"LIST"));
        assert_eq!(header.validate(), Ok(()));
    }

    #[test]
    fn build_canonical_header() {
        assert_eq!(Header::pcm16(44_100, 2, 16).to_bytes(), STEREO_16);
    }

    #[test]
    fn derived_sizes_wrap_at_field_width() {
        let header = Header::pcm16(44_100, 2, u32::MAX);
        assert_eq!(header.riff_size, 35);
        assert_eq!(header.data_size, u32::MAX);

        let header = Header::pcm16(u32::MAX, u16::MAX, 0);
        assert_eq!(header.block_align, 0xfffe);
        assert_eq!(header.byte_rate, 0xffff_0002);
    }

    #[test]
    fn summary_line() {
        let mut header = Header::pcm16(22_050, 1, 0);
        assert_eq!(header.to_string(), "1 ch, 22050 hz, 16 bit, PCM");

        header.audio_format = 3;
        assert_eq!(header.to_string(), "1 ch, 22050 hz, 16 bit, unknown");
    }
}
