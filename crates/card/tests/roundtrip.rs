//! End-to-end card round-trip over a synthetic PNG file.

use serde_json::json;
use tavernkit_card::{decode_card, encode_card, encode_chunks, Chunk};
use tavernkit_core::card::CharacterCard;

fn source_png() -> Vec<u8> {
    encode_chunks(&[
        Chunk::new(*b"IHDR", vec![0, 0, 0, 1, 0, 0, 0, 1, 8, 0, 0, 0, 0]),
        Chunk::new(*b"IDAT", vec![0u8; 32]),
        Chunk::new(*b"IEND", Vec::new()),
    ])
}

#[test]
fn encode_then_decode_returns_normalized_card() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("avatar.png");
    let output = dir.path().join("card.png");
    std::fs::write(&input, source_png()).unwrap();

    let raw = json!({
        "name": "Hermione",
        "description": "A studious witch",
        "first_mes": "Hello, {{user}}!",
        "mes_example": "<START>\n{{user}}: Hi\n{{char}}: Hello",
    });
    let card = CharacterCard::normalize(Some(&raw));

    assert!(encode_card(&card, &input, &output));
    let decoded = decode_card(&output).unwrap();
    assert_eq!(decoded, card);
}

#[test]
fn extensions_survive_decode_mutate_encode() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("avatar.png");
    let step1 = dir.path().join("step1.png");
    let step2 = dir.path().join("step2.png");
    std::fs::write(&input, source_png()).unwrap();

    let raw = json!({
        "data": {
            "name": "Bot",
            "extensions": { "vendor": { "nested": { "depth": 3 } } }
        }
    });
    let card = CharacterCard::normalize(Some(&raw));
    assert!(encode_card(&card, &input, &step1));

    let mut decoded = decode_card(&step1).unwrap();
    decoded.add_tag("mutated");
    assert!(encode_card(&decoded, &step1, &step2));

    let round = decode_card(&step2).unwrap();
    assert_eq!(
        round.data.extensions["vendor"]["nested"]["depth"],
        json!(3)
    );
    assert_eq!(round.data.tags, vec!["mutated"]);
}
