//! PNG chunk container — parse and re-encode the chunk list.
//!
//! A PNG is an 8-byte signature followed by chunks of the form
//! `length (u32 BE) | type (4 bytes) | data | crc32 (u32 BE)`, where the
//! CRC covers the type and data fields. Parsing preserves every chunk,
//! known or not, in order; encoding is the bit-exact inverse for valid
//! input. That makes chunk-list mutation a minimal-diff operation.

use flate2::Crc;
use tavernkit_core::error::PngError;

/// The fixed 8-byte PNG file signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Chunk type of the mandatory terminal chunk.
pub const IEND: [u8; 4] = *b"IEND";

/// One PNG chunk: a 4-byte type and its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub kind: [u8; 4],
    pub data: Vec<u8>,
}

impl Chunk {
    pub fn new(kind: [u8; 4], data: Vec<u8>) -> Self {
        Self { kind, data }
    }

    /// The chunk type as text (e.g. `tEXt`, `IHDR`).
    pub fn kind_str(&self) -> String {
        self.kind.iter().map(|&b| b as char).collect()
    }

    fn crc(&self) -> u32 {
        let mut crc = Crc::new();
        crc.update(&self.kind);
        crc.update(&self.data);
        crc.sum()
    }
}

/// Parse a PNG byte stream into its ordered chunk list.
///
/// Verifies the signature and every chunk CRC. Parsing stops after the
/// `IEND` chunk; trailing bytes beyond it are ignored.
pub fn parse_chunks(bytes: &[u8]) -> Result<Vec<Chunk>, PngError> {
    if bytes.len() < PNG_SIGNATURE.len() || bytes[..8] != PNG_SIGNATURE {
        return Err(PngError::BadSignature);
    }

    let mut chunks = Vec::new();
    let mut pos = PNG_SIGNATURE.len();

    while pos < bytes.len() {
        if bytes.len() - pos < 8 {
            return Err(PngError::Truncated("chunk header"));
        }
        let length = u32::from_be_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]]);
        let kind: [u8; 4] = [bytes[pos + 4], bytes[pos + 5], bytes[pos + 6], bytes[pos + 7]];
        pos += 8;

        let data_len = length as usize;
        if bytes.len() - pos < data_len + 4 {
            return Err(PngError::OversizedChunk(length));
        }
        let data = bytes[pos..pos + data_len].to_vec();
        pos += data_len;

        let stored = u32::from_be_bytes([bytes[pos], bytes[pos + 1], bytes[pos + 2], bytes[pos + 3]]);
        pos += 4;

        let chunk = Chunk::new(kind, data);
        let computed = chunk.crc();
        if stored != computed {
            return Err(PngError::CrcMismatch {
                kind: chunk.kind_str(),
                stored,
                computed,
            });
        }

        let terminal = chunk.kind == IEND;
        chunks.push(chunk);
        if terminal {
            break;
        }
    }

    if chunks.is_empty() {
        return Err(PngError::Truncated("no chunks"));
    }
    Ok(chunks)
}

/// Serialize a chunk list back into PNG bytes, recomputing each CRC.
pub fn encode_chunks(chunks: &[Chunk]) -> Vec<u8> {
    let total: usize = chunks.iter().map(|c| 12 + c.data.len()).sum();
    let mut out = Vec::with_capacity(PNG_SIGNATURE.len() + total);
    out.extend_from_slice(&PNG_SIGNATURE);
    for chunk in chunks {
        out.extend_from_slice(&(chunk.data.len() as u32).to_be_bytes());
        out.extend_from_slice(&chunk.kind);
        out.extend_from_slice(&chunk.data);
        out.extend_from_slice(&chunk.crc().to_be_bytes());
    }
    out
}
