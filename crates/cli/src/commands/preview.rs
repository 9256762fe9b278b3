//! `tavernkit preview` — Assemble and print a prompt without calling a model.

use std::path::Path;
use tavernkit_card::codec;
use tavernkit_config::AppConfig;
use tavernkit_prompt::{approx_tokens, AssemblerDefaults, AssemblyInput, NewMessage, PromptAssembler};

pub fn run(
    card_path: Option<&Path>,
    user_name: &str,
    message: Option<&str>,
    memory: bool,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    let bot_card = match card_path {
        Some(path) => Some(
            codec::decode_card(path)
                .ok_or_else(|| format!("no character card found in {}", path.display()))?,
        ),
        None => None,
    };

    let assembler = PromptAssembler::new(AssemblerDefaults::from(&config));
    let output = assembler.assemble(&AssemblyInput {
        bot_card: bot_card.as_ref(),
        stored_prompt: None,
        user_name,
        history: &[],
        memory_enabled: memory,
        new_message: message.map(NewMessage::user),
    });

    if json {
        println!("{}", serde_json::to_string_pretty(&output.messages)?);
        return Ok(());
    }

    for msg in &output.messages {
        match &msg.name {
            Some(name) => println!("[{} {name}]\n{}\n", msg.role, msg.content),
            None => println!("[{}]\n{}\n", msg.role, msg.content),
        }
    }
    println!(
        "{} messages, {} content bytes, ~{} tokens",
        output.messages.len(),
        output.estimated_bytes,
        approx_tokens(output.estimated_bytes, config.bytes_per_token),
    );
    Ok(())
}
