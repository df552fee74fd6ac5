use crate::config::PcmConfig;
use crate::error::Error;
use crate::header::Header;
use crate::pcm::{Pcm, PcmError, Stream};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Play a 16 bit PCM wav file on the device described by `config`.
///
/// The whole payload is read into memory before the device is opened.
pub fn play_wav(path: &Path, config: &PcmConfig) -> Result<(), Error> {
    let mut file = File::open(path).map_err(|source| Error::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut bytes = [0; Header::SIZE];
    file.read_exact(&mut bytes).map_err(Error::ReadHeader)?;

    let header = Header::from_bytes(&bytes).map_err(|kind| Error::InvalidHeader {
        path: path.to_path_buf(),
        kind,
    })?;
    info!("{}", header);

    header.validate().map_err(|kind| Error::InvalidHeader {
        path: path.to_path_buf(),
        kind,
    })?;

    let mut data = alloc_payload(header.data_size as usize)?;
    file.read_exact(&mut data).map_err(|source| Error::ReadData {
        len: header.data_size,
        source,
    })?;
    drop(file);

    if header.sample_rate != config.rate || u32::from(header.num_channels) != config.channels {
        warn!(
            file_rate = header.sample_rate,
            file_channels = header.num_channels,
            device_rate = config.rate,
            device_channels = config.channels,
            "playing at the device rate and channel count"
        );
    }

    let mut pcm = Pcm::open(config)?;
    play_samples(&mut pcm, &data)?;

    Ok(())
}

// The size comes straight from the file, so a failed allocation is an error
// rather than an abort.
fn alloc_payload(len: usize) -> Result<Vec<u8>, Error> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| Error::Alloc { len })?;
    data.resize(len, 0);
    Ok(data)
}

/// Feed `data` to `pcm` in [`Pcm::buffer_size`] chunks, then close it.
pub fn play_samples<S: Stream>(pcm: &mut Pcm<S>, data: &[u8]) -> Result<(), PcmError> {
    let chunk_size = pcm.buffer_size().max(1);

    for chunk in data.chunks(chunk_size) {
        pcm.write(chunk)?;
    }

    let underruns = pcm.underruns();
    pcm.close()?;

    if underruns > 0 {
        warn!(underruns, "playback finished with underruns");
    } else {
        info!(bytes = data.len(), "playback finished");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HeaderError;
    use crate::pcm::tests::{Call, MockStream};
    use nix::errno::Errno;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn wav_file(header: &Header, data: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&header.to_bytes()).unwrap();
        file.write_all(data).unwrap();
        file.flush().unwrap();
        file
    }

    fn no_device() -> PcmConfig {
        PcmConfig::default().with_device("/nonexistent/pcmC9D9p")
    }

    #[test]
    fn writes_in_buffer_sized_chunks_then_closes() {
        let stream = MockStream::default();
        let calls = stream.calls.clone();
        let mut pcm = Pcm::with_stream(stream, &PcmConfig::default());

        play_samples(&mut pcm, &[0; 10_000]).unwrap();

        assert_eq!(
            *calls.borrow(),
            [
                Call::Prepare,
                Call::Write(1024),
                Call::Start,
                Call::Write(1024),
                Call::Write(452),
            ]
        );
        assert_eq!(pcm.buffer_size(), 0);
        assert!(matches!(pcm.close(), Err(PcmError::NotOpen)));
    }

    #[test]
    fn empty_payload_never_touches_the_device() {
        let stream = MockStream::default();
        let calls = stream.calls.clone();
        let mut pcm = Pcm::with_stream(stream, &PcmConfig::default());

        play_samples(&mut pcm, &[]).unwrap();

        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn recovers_from_underruns_while_playing() {
        let stream = MockStream::failing_writes(&[None, Some(Errno::EPIPE), None]);
        let mut pcm = Pcm::with_stream(stream, &PcmConfig::default());

        play_samples(&mut pcm, &[0; 4096 * 3]).unwrap();

        assert_eq!(pcm.underruns(), 1);
    }

    #[test]
    fn stops_on_write_errors() {
        let stream = MockStream::failing_writes(&[None, Some(Errno::ENODEV)]);
        let mut pcm = Pcm::with_stream(stream, &PcmConfig::default());

        let err = play_samples(&mut pcm, &[0; 4096 * 3]).unwrap_err();

        assert!(matches!(err, PcmError::Write(Errno::ENODEV)));
    }

    #[test]
    fn missing_file() {
        let err = play_wav(Path::new("/nonexistent/file.wav"), &no_device()).unwrap_err();

        assert!(matches!(err, Error::Open { .. }));
        assert_eq!(err.to_string(), "cannot open '/nonexistent/file.wav'");
    }

    #[test]
    fn short_header() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"RIFF\x24\x00\x00\x00WAVE").unwrap();

        let err = play_wav(file.path(), &no_device()).unwrap_err();

        assert!(matches!(err, Error::ReadHeader(_)));
        assert_eq!(err.to_string(), "cannot read header");
    }

    #[test]
    fn rejects_24_bit_files() {
        let mut header = Header::pcm16(48_000, 2, 0);
        header.bit_depth = 24;
        let file = wav_file(&header, &[]);

        let err = play_wav(file.path(), &no_device()).unwrap_err();

        match &err {
            Error::InvalidHeader { kind, .. } => {
                assert_eq!(*kind, HeaderError::UnsupportedBitDepth(24))
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            err.to_string(),
            format!("'{}' is not 16bit per sample", file.path().display())
        );
    }

    #[test]
    fn rejects_non_wave_files() {
        let mut header = Header::pcm16(44_100, 2, 0);
        header.riff_format = crate::chunk::ChunkTag::Unknown(*b"AVI ");
        let file = wav_file(&header, &[]);

        let err = play_wav(file.path(), &no_device()).unwrap_err();

        assert_eq!(
            err.to_string(),
            format!("'{}' is not a riff/wave file", file.path().display())
        );
    }

    #[test]
    fn truncated_payload() {
        let file = wav_file(&Header::pcm16(44_100, 2, 64), &[0; 32]);

        let err = play_wav(file.path(), &no_device()).unwrap_err();

        assert!(matches!(err, Error::ReadData { len: 64, .. }));
        assert_eq!(err.to_string(), "could not read 64 bytes");
    }

    #[test]
    fn oversized_payload_is_an_error() {
        let err = alloc_payload(usize::MAX).unwrap_err();

        assert!(matches!(err, Error::Alloc { len: usize::MAX }));
        assert_eq!(
            err.to_string(),
            format!("could not allocate {} bytes", usize::MAX)
        );
        assert_eq!(alloc_payload(16).unwrap(), [0; 16]);
    }

    #[test]
    fn device_errors_come_after_the_file_is_read() {
        let file = wav_file(&Header::pcm16(44_100, 2, 16), &[0; 16]);

        let err = play_wav(file.path(), &no_device()).unwrap_err();

        assert!(matches!(err, Error::Pcm(PcmError::Open { .. })));
        assert!(err
            .to_string()
            .starts_with("pcm error: cannot open device '/nonexistent/pcmC9D9p'"));
    }
}
