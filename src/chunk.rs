use core::fmt;

/// RIFF chunks are tagged with 4 byte identifiers.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ChunkTag {
    /// Root level "chunk"
    Riff,
    /// File identifier, located right after the RIFF tag and chunk size
    Wave,
    /// Format chunk, contains the sample rate, bit depth, and number of channels.
    Fmt,
    /// Contains the (interleaved) samples.
    Data,
    /// Unknown/unhandled chunk tag
    Unknown([u8; 4]),
}

impl ChunkTag {
    /// Map four raw bytes onto a tag.
    pub fn from_bytes(bytes: &[u8; 4]) -> Self {
        match bytes {
            [b'R', b'I', b'F', b'F'] => ChunkTag::Riff,
            [b'W', b'A', b'V', b'E'] => ChunkTag::Wave,
            [b'f', b'm', b't', b' '] => ChunkTag::Fmt,
            [b'd', b'a', b't', b'a'] => ChunkTag::Data,
            _ => ChunkTag::Unknown(*bytes),
        }
    }

    /// Raw bytes as they appear in the file.
    pub fn to_bytes(self) -> [u8; 4] {
        match self {
            ChunkTag::Riff => *b"RIFF",
            ChunkTag::Wave => *b"WAVE",
            ChunkTag::Fmt => *b"fmt ",
            ChunkTag::Data => *b"data",
            ChunkTag::Unknown(bytes) => bytes,
        }
    }
}

impl fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.to_bytes() {
            write!(f, "{}", core::ascii::escape_default(b))?;
        }
        Ok(())
    }
}
