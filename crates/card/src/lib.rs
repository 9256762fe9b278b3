//! # TavernKit Card
//!
//! Embeds and extracts character-card documents in PNG metadata.
//!
//! Layering, bottom up:
//! - [`png`] — the generic chunk container: signature + length/type/data/crc
//!   records, parsed and re-encoded without touching unrelated chunks.
//! - [`text`] — the keyword/value codec for the three PNG text-chunk kinds
//!   (`tEXt`, `zTXt`, `iTXt`).
//! - [`codec`] — the card convention on top: a base64(UTF-8(JSON)) payload
//!   in a text chunk under the reserved keyword `chara`, plus the
//!   file-level decode/parse/encode operations with their recoverable
//!   sentinel contract.

pub mod codec;
pub mod png;
pub mod text;

pub use codec::{
    decode_card, decode_file, decode_payload, embed_payload, encode_card, encode_file,
    parse_file, payload_from_value, CARD_KEYWORD,
};
pub use png::{encode_chunks, parse_chunks, Chunk};
pub use text::{decode_text_chunk, encode_text_chunk, TextChunk};
