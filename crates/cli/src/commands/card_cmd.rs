//! `tavernkit card` — Card PNG codec commands.

use std::path::Path;
use tavernkit_card::{codec, png, text};
use tavernkit_core::card::CharacterCard;
use tracing::debug;

pub fn decode(png_path: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(json) = codec::decode_file(png_path) else {
        return Err(format!("no character card found in {}", png_path.display()).into());
    };
    debug!(path = %png_path.display(), bytes = json.len(), "decoded card payload");

    match output {
        Some(path) => {
            std::fs::write(path, &json)?;
            println!("✅ Wrote card JSON to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn encode(
    source: &str,
    input: &Path,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if !codec::encode_file(source, input, output) {
        return Err(format!("failed to embed card into {}", input.display()).into());
    }
    println!("✅ Wrote {}", output.display());
    Ok(())
}

pub fn inspect(png_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(png_path)?;
    let chunks = png::parse_chunks(&bytes)?;

    println!("🔍 {}", png_path.display());
    println!("==========================");
    for chunk in &chunks {
        let mut note = String::new();
        if text::is_text_chunk(chunk) {
            if let Ok(tc) = text::decode_text_chunk(chunk) {
                note = format!("  keyword: {}", tc.keyword);
            }
        }
        println!("  {:<4}  {:>8} bytes{}", chunk.kind_str(), chunk.data.len(), note);
    }

    match codec::decode_card(png_path) {
        Some(card) => {
            let CharacterCard { spec, spec_version, data } = &card;
            println!("\n  Card: {} ({spec} {spec_version})", data.name);
            if !data.description.is_empty() {
                println!("  Description: {} bytes", data.description.len());
            }
            if !data.example_dialogue.is_empty() {
                println!("  Example dialogue: {} bytes", data.example_dialogue.len());
            }
            if !data.alternate_greetings.is_empty() {
                println!("  Alternate greetings: {}", data.alternate_greetings.len());
            }
            if !data.tags.is_empty() {
                println!("  Tags: {}", data.tags.join(", "));
            }
        }
        None => println!("\n  No embedded character card"),
    }
    Ok(())
}
