//! Context-size estimation.
//!
//! `estimate_size` walks a JSON value and sums string lengths, optionally
//! restricted to an allow-listed set of object keys. Wrapper containers
//! are always traversed regardless of the allow-list, so callers can size
//! just the `content` fields of a message list without losing nesting.
//!
//! The byte total divided by an empirical bytes-per-token ratio gives a
//! rough context-consumption figure — an approximation, not tokenization.

use serde_json::Value;
use tavernkit_core::message::PromptMessage;

/// Estimate the byte size of a JSON value.
///
/// - Strings count `len + per_field_overhead`.
/// - Object members are included when the member value is itself a
///   container (always traversed), when no allow-list is given, or when
///   the member's key is allow-listed.
/// - Array elements that are containers are always traversed; scalar
///   elements count only when no allow-list is given (they have no key
///   to match).
/// - Numbers, booleans, and null contribute nothing.
pub fn estimate_size(value: &Value, allowed: Option<&[&str]>, per_field_overhead: usize) -> usize {
    match value {
        Value::String(s) => s.len() + per_field_overhead,
        Value::Object(map) => map
            .iter()
            .filter(|(key, member)| {
                is_container(member) || allowed.is_none_or(|keys| keys.contains(&key.as_str()))
            })
            .map(|(_, member)| estimate_size(member, allowed, per_field_overhead))
            .sum(),
        Value::Array(items) => items
            .iter()
            .filter(|item| is_container(item) || allowed.is_none())
            .map(|item| estimate_size(item, allowed, per_field_overhead))
            .sum(),
        _ => 0,
    }
}

/// Estimate the content bytes of a message list (the figure used for
/// LLM context accounting).
pub fn estimate_content_bytes(messages: &[PromptMessage]) -> usize {
    match serde_json::to_value(messages) {
        Ok(value) => estimate_size(&value, Some(&["content"]), 0),
        Err(_) => messages.iter().map(|m| m.content.len()).sum(),
    }
}

/// Convert a byte estimate to an approximate token count.
pub fn approx_tokens(bytes: usize, bytes_per_token: f32) -> usize {
    if bytes_per_token <= 0.0 {
        return 0;
    }
    (bytes as f32 / bytes_per_token) as usize
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}
