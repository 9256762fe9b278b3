//! Keyword/value codec for PNG text chunks.
//!
//! Three ancillary chunk kinds carry textual metadata:
//! - `tEXt` — `keyword NUL text`, both Latin-1
//! - `zTXt` — `keyword NUL method(1) zlib-deflated-text`
//! - `iTXt` — `keyword NUL compressed(1) method(1) language NUL
//!   translated-keyword NUL text`, text in UTF-8
//!
//! Decoding handles all three; encoding always produces `tEXt`, which is
//! what every card tool in the wild writes.

use flate2::read::ZlibDecoder;
use std::io::Read;
use tavernkit_core::error::CardError;

use crate::png::Chunk;

pub const TEXT: [u8; 4] = *b"tEXt";
pub const ZTXT: [u8; 4] = *b"zTXt";
pub const ITXT: [u8; 4] = *b"iTXt";

/// A decoded keyword/value pair from a text chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub keyword: String,
    pub text: String,
}

/// Whether a chunk is one of the three text kinds.
pub fn is_text_chunk(chunk: &Chunk) -> bool {
    chunk.kind == TEXT || chunk.kind == ZTXT || chunk.kind == ITXT
}

/// Decode a text chunk's keyword and text.
pub fn decode_text_chunk(chunk: &Chunk) -> Result<TextChunk, CardError> {
    let (keyword_bytes, rest) = split_nul(&chunk.data)
        .ok_or_else(|| CardError::MalformedPayload("text chunk missing keyword separator".into()))?;
    let keyword = latin1(keyword_bytes);

    let text = match chunk.kind {
        TEXT => latin1(rest),
        ZTXT => {
            if rest.is_empty() {
                return Err(CardError::MalformedPayload("zTXt chunk missing method byte".into()));
            }
            // rest[0] is the compression method; 0 (zlib deflate) is the
            // only defined value
            latin1(&inflate(&rest[1..])?)
        }
        ITXT => {
            if rest.len() < 2 {
                return Err(CardError::MalformedPayload("iTXt chunk header too short".into()));
            }
            let compressed = rest[0] == 1;
            let after_flags = &rest[2..];
            let (_language, after_lang) = split_nul(after_flags).ok_or_else(|| {
                CardError::MalformedPayload("iTXt chunk missing language tag".into())
            })?;
            let (_translated, body) = split_nul(after_lang).ok_or_else(|| {
                CardError::MalformedPayload("iTXt chunk missing translated keyword".into())
            })?;
            let bytes = if compressed {
                inflate(body)?
            } else {
                body.to_vec()
            };
            String::from_utf8(bytes)
                .map_err(|e| CardError::MalformedPayload(format!("iTXt text not UTF-8: {e}")))?
        }
        _ => {
            return Err(CardError::MalformedPayload(format!(
                "'{}' is not a text chunk",
                chunk.kind_str()
            )));
        }
    };

    Ok(TextChunk { keyword, text })
}

/// Encode a keyword/value pair as a `tEXt` chunk.
pub fn encode_text_chunk(keyword: &str, text: &str) -> Chunk {
    let mut data = Vec::with_capacity(keyword.len() + 1 + text.len());
    data.extend_from_slice(keyword.as_bytes());
    data.push(0);
    data.extend_from_slice(text.as_bytes());
    Chunk::new(TEXT, data)
}

fn split_nul(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    let pos = bytes.iter().position(|&b| b == 0)?;
    Some((&bytes[..pos], &bytes[pos + 1..]))
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn inflate(bytes: &[u8]) -> Result<Vec<u8>, CardError> {
    let mut out = Vec::new();
    ZlibDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(|e| CardError::MalformedPayload(format!("inflate failed: {e}")))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn deflate(bytes: &[u8]) -> Vec<u8> {
        let mut enc = ZlibEncoder::new(Vec::new(), Compression::default());
        enc.write_all(bytes).unwrap();
        enc.finish().unwrap()
    }

    #[test]
    fn text_chunk_roundtrip() {
        let chunk = encode_text_chunk("chara", "eyJmb28iOiJiYXIifQ==");
        assert_eq!(chunk.kind, TEXT);
        let decoded = decode_text_chunk(&chunk).unwrap();
        assert_eq!(decoded.keyword, "chara");
        assert_eq!(decoded.text, "eyJmb28iOiJiYXIifQ==");
    }

    #[test]
    fn ztxt_chunk_decodes() {
        let mut data = b"chara\0\0".to_vec();
        data.extend_from_slice(&deflate(b"payload text"));
        let decoded = decode_text_chunk(&Chunk::new(ZTXT, data)).unwrap();
        assert_eq!(decoded.keyword, "chara");
        assert_eq!(decoded.text, "payload text");
    }

    #[test]
    fn itxt_chunk_decodes_uncompressed() {
        // keyword NUL flag method lang NUL translated NUL text
        let data = b"chara\0\0\0en\0\0utf8 text \xc3\xa9".to_vec();
        let decoded = decode_text_chunk(&Chunk::new(ITXT, data)).unwrap();
        assert_eq!(decoded.keyword, "chara");
        assert_eq!(decoded.text, "utf8 text é");
    }

    #[test]
    fn itxt_chunk_decodes_compressed() {
        let mut data = b"chara\0\x01\0\0\0".to_vec();
        data.extend_from_slice(&deflate("texte compressé".as_bytes()));
        let decoded = decode_text_chunk(&Chunk::new(ITXT, data)).unwrap();
        assert_eq!(decoded.text, "texte compressé");
    }

    #[test]
    fn missing_nul_is_malformed() {
        let err = decode_text_chunk(&Chunk::new(TEXT, b"no separator".to_vec())).unwrap_err();
        assert!(matches!(err, CardError::MalformedPayload(_)));
    }

    #[test]
    fn non_text_kind_rejected() {
        let err = decode_text_chunk(&Chunk::new(*b"IDAT", b"k\0v".to_vec())).unwrap_err();
        assert!(matches!(err, CardError::MalformedPayload(_)));
    }
}
