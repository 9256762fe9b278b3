//! Character-card codec — the `chara` convention over PNG text chunks.
//!
//! A card PNG carries base64(UTF-8(JSON)) in a text chunk under the
//! reserved keyword `chara`. The first matching chunk in chunk order is
//! authoritative on decode; encode replaces an existing `chara` tEXt
//! chunk in place (keeping its position) or inserts a new one right
//! before `IEND`, never reordering or dropping unrelated chunks.
//!
//! Two API levels:
//! - byte-level (`decode_payload` / `embed_payload`) propagates typed
//!   `CardError`s for library callers and tests;
//! - file-level (`decode_file` / `parse_file` / `decode_card` /
//!   `encode_file` / `encode_card`) catches everything, logs a
//!   diagnostic, and degrades to `None`/`false` — one-shot command
//!   handlers upstream have no other recovery path.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tavernkit_core::card::CharacterCard;
use tavernkit_core::error::CardError;
use tracing::{debug, error};

use crate::png;
use crate::text::{self, TextChunk};

/// Reserved text-chunk keyword for character data.
pub const CARD_KEYWORD: &str = "chara";

// --- Byte-level operations -----------------------------------------------

/// Extract the embedded card payload from PNG bytes.
///
/// Filters the three text-chunk kinds for the reserved keyword, takes the
/// first match, and decodes base64 then UTF-8.
pub fn decode_payload(png_bytes: &[u8]) -> Result<String, CardError> {
    let chunks = png::parse_chunks(png_bytes)?;

    let payload = chunks
        .iter()
        .filter(|c| text::is_text_chunk(c))
        .filter_map(|c| match text::decode_text_chunk(c) {
            Ok(tc) => Some(tc),
            Err(e) => {
                debug!(kind = %c.kind_str(), error = %e, "skipping undecodable text chunk");
                None
            }
        })
        .find(|tc| tc.keyword == CARD_KEYWORD)
        .ok_or_else(|| CardError::NotFound {
            keyword: CARD_KEYWORD.into(),
        })?;

    let raw = BASE64
        .decode(payload.text.as_bytes())
        .map_err(|e| CardError::MalformedPayload(format!("invalid base64: {e}")))?;
    String::from_utf8(raw).map_err(|e| CardError::MalformedPayload(format!("invalid UTF-8: {e}")))
}

/// Embed a base64 payload into PNG bytes under the reserved keyword.
///
/// Minimal-diff mutation: an existing `chara` tEXt chunk is rewritten in
/// place; otherwise the new chunk goes immediately before the terminal
/// chunk so `IEND` stays last.
pub fn embed_payload(png_bytes: &[u8], payload_base64: &str) -> Result<Vec<u8>, CardError> {
    let mut chunks = png::parse_chunks(png_bytes)?;
    let new_chunk = text::encode_text_chunk(CARD_KEYWORD, payload_base64);

    let existing = chunks.iter().position(|c| {
        c.kind == text::TEXT
            && matches!(
                text::decode_text_chunk(c),
                Ok(TextChunk { ref keyword, .. }) if keyword == CARD_KEYWORD
            )
    });

    match existing {
        Some(pos) => chunks[pos] = new_chunk,
        None => {
            let insert_at = chunks.len().saturating_sub(1);
            chunks.insert(insert_at, new_chunk);
        }
    }

    Ok(png::encode_chunks(&chunks))
}

/// Base64-encode a JSON value as a card payload (pretty-printed, the way
/// card editors write it).
pub fn payload_from_value(value: &Value) -> Result<String, CardError> {
    let json = serde_json::to_string_pretty(value)?;
    Ok(BASE64.encode(json.as_bytes()))
}

// --- File-level operations -----------------------------------------------

/// Extract the decoded card JSON text from a PNG file.
///
/// Returns `None` (with a logged diagnostic) on any failure: missing
/// file, missing chunk, malformed payload.
pub fn decode_file(card_path: impl AsRef<Path>) -> Option<String> {
    let path = card_path.as_ref();
    let attempt = || -> Result<String, CardError> {
        let bytes = fs::read(path)?;
        decode_payload(&bytes)
    };
    match attempt() {
        Ok(text) => Some(text),
        Err(e) => {
            error!(path = %path.display(), error = %e, "error decoding character card");
            None
        }
    }
}

/// Extract and JSON-parse the embedded card document from a PNG file.
pub fn parse_file(card_path: impl AsRef<Path>) -> Option<Value> {
    let text = decode_file(&card_path)?;
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            error!(path = %card_path.as_ref().display(), error = %e, "error parsing character card");
            None
        }
    }
}

/// Decode a PNG file into a normalized character card.
pub fn decode_card(card_path: impl AsRef<Path>) -> Option<CharacterCard> {
    let value = parse_file(card_path)?;
    Some(CharacterCard::normalize(Some(&value)))
}

/// Embed a card payload into `input_png`, writing the result to
/// `output_png`. Returns `true` on success.
///
/// `source` that parses as JSON is re-serialized pretty-printed before
/// encoding (stray formatting never reaches the payload); anything else
/// is treated as a path whose raw bytes are embedded verbatim.
pub fn encode_file(
    source: &str,
    input_png: impl AsRef<Path>,
    output_png: impl AsRef<Path>,
) -> bool {
    let attempt = || -> Result<(), CardError> {
        let payload = match serde_json::from_str::<Value>(source) {
            Ok(value) => payload_from_value(&value)?,
            Err(_) => BASE64.encode(fs::read(source)?),
        };
        let bytes = fs::read(input_png.as_ref())?;
        let encoded = embed_payload(&bytes, &payload)?;
        fs::write(output_png.as_ref(), encoded)?;
        Ok(())
    };
    match attempt() {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "error encoding character card");
            false
        }
    }
}

/// Embed a typed card into `input_png`, writing to `output_png`.
pub fn encode_card(
    card: &CharacterCard,
    input_png: impl AsRef<Path>,
    output_png: impl AsRef<Path>,
) -> bool {
    let attempt = || -> Result<(), CardError> {
        let value = serde_json::to_value(card)?;
        let payload = payload_from_value(&value)?;
        let bytes = fs::read(input_png.as_ref())?;
        let encoded = embed_payload(&bytes, &payload)?;
        fs::write(output_png.as_ref(), encoded)?;
        Ok(())
    };
    match attempt() {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "error encoding character card");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::png::tests::minimal_png;
    use crate::png::Chunk;
    use serde_json::json;

    #[test]
    fn payload_roundtrip() {
        let png = minimal_png();
        let payload = payload_from_value(&json!({"data": {"name": "Bot"}})).unwrap();
        let with_card = embed_payload(&png, &payload).unwrap();
        let text = decode_payload(&with_card).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["data"]["name"], json!("Bot"));
    }

    #[test]
    fn missing_chunk_is_not_found() {
        let err = decode_payload(&minimal_png()).unwrap_err();
        assert!(matches!(err, CardError::NotFound { .. }));
    }

    #[test]
    fn invalid_base64_is_malformed() {
        let png = minimal_png();
        let mut chunks = png::parse_chunks(&png).unwrap();
        chunks.insert(2, text::encode_text_chunk(CARD_KEYWORD, "!!! not base64 !!!"));
        let err = decode_payload(&png::encode_chunks(&chunks)).unwrap_err();
        assert!(matches!(err, CardError::MalformedPayload(_)));
    }

    #[test]
    fn new_chunk_inserted_before_iend() {
        let png = minimal_png();
        let payload = payload_from_value(&json!({})).unwrap();
        let with_card = embed_payload(&png, &payload).unwrap();
        let chunks = png::parse_chunks(&with_card).unwrap();
        assert_eq!(chunks[chunks.len() - 2].kind, text::TEXT);
        assert_eq!(chunks.last().unwrap().kind_str(), "IEND");
    }

    #[test]
    fn existing_chunk_replaced_in_place() {
        let png = minimal_png();
        let first = embed_payload(&png, &payload_from_value(&json!({"v": 1})).unwrap()).unwrap();
        let second = embed_payload(&first, &payload_from_value(&json!({"v": 2})).unwrap()).unwrap();

        let before = png::parse_chunks(&first).unwrap();
        let after = png::parse_chunks(&second).unwrap();
        assert_eq!(before.len(), after.len());
        let pos_before = before.iter().position(|c| c.kind == text::TEXT).unwrap();
        let pos_after = after.iter().position(|c| c.kind == text::TEXT).unwrap();
        assert_eq!(pos_before, pos_after);

        let value: Value =
            serde_json::from_str(&decode_payload(&second).unwrap()).unwrap();
        assert_eq!(value["v"], json!(2));
    }

    #[test]
    fn unrelated_chunks_untouched() {
        let base = png::encode_chunks(&[
            Chunk::new(*b"IHDR", vec![0; 13]),
            Chunk::new(*b"pHYs", vec![1; 9]),
            Chunk::new(*b"IDAT", vec![2; 8]),
            Chunk::new(png::IEND, Vec::new()),
        ]);
        let with_card = embed_payload(&base, "cGF5bG9hZA==").unwrap();
        let chunks = png::parse_chunks(&with_card).unwrap();
        let kinds: Vec<String> = chunks.iter().map(|c| c.kind_str()).collect();
        assert_eq!(kinds, vec!["IHDR", "pHYs", "IDAT", "tEXt", "IEND"]);
        assert_eq!(chunks[1].data, vec![1; 9]);
        assert_eq!(chunks[2].data, vec![2; 8]);
    }

    #[test]
    fn first_matching_chunk_wins() {
        let png = minimal_png();
        let mut chunks = png::parse_chunks(&png).unwrap();
        let first = BASE64.encode(b"{\"v\":\"first\"}");
        let second = BASE64.encode(b"{\"v\":\"second\"}");
        chunks.insert(1, text::encode_text_chunk(CARD_KEYWORD, &first));
        chunks.insert(3, text::encode_text_chunk(CARD_KEYWORD, &second));
        let text = decode_payload(&png::encode_chunks(&chunks)).unwrap();
        assert!(text.contains("first"));
    }

    #[test]
    fn file_level_contract() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        fs::write(&input, minimal_png()).unwrap();

        // JSON string source
        assert!(encode_file(r#"{"data":{"name":"Bot"}}"#, &input, &output));
        let card = decode_card(&output).unwrap();
        assert_eq!(card.data.name, "Bot");

        // Missing input degrades to false / None, never panics
        assert!(!encode_file("{}", dir.path().join("missing.png"), &output));
        assert!(decode_file(dir.path().join("missing.png")).is_none());

        // PNG without a card chunk decodes to None
        assert!(decode_card(&input).is_none());
    }

    #[test]
    fn non_json_source_embeds_file_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        let json_file = dir.path().join("card.json");
        fs::write(&input, minimal_png()).unwrap();
        fs::write(&json_file, br#"{"data":{"name":"FromFile"}}"#).unwrap();

        assert!(encode_file(json_file.to_str().unwrap(), &input, &output));
        let card = decode_card(&output).unwrap();
        assert_eq!(card.data.name, "FromFile");
    }
}
