//! Persona placeholder substitution ("detokenization").
//!
//! A `Replacements` set is an ordered list of pattern/value pairs.
//! Patterns compile as case-insensitive regexes up front, so the
//! substitution pass itself can never fail. Pairs are applied in
//! insertion order, and a later pattern can match text produced by an
//! earlier replacement — existing cards depend on that, so it is kept.

use regex::{NoExpand, Regex, RegexBuilder};
use serde_json::Value;
use tavernkit_core::message::PromptMessage;

/// Placeholder token for the human participant.
pub const USER_TOKEN: &str = "{{user}}";

/// Placeholder token for the character.
pub const CHAR_TOKEN: &str = "{{char}}";

/// An ordered, pre-compiled set of pattern/value pairs.
#[derive(Debug, Clone, Default)]
pub struct Replacements {
    pairs: Vec<(Regex, String)>,
}

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pattern/value pair. The pattern is a regular expression,
    /// compiled case-insensitively unless `case_insensitive(false)` was
    /// applied via an inline flag.
    pub fn add(mut self, pattern: &str, value: impl Into<String>) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        self.pairs.push((regex, value.into()));
        Ok(self)
    }

    /// Add a literal (regex-escaped) pattern/value pair.
    pub fn add_literal(self, token: &str, value: impl Into<String>) -> Self {
        // Escaped patterns always compile
        self.add(&regex::escape(token), value)
            .expect("escaped pattern is always a valid regex")
    }

    /// The standard persona pair set: `{{user}}` → user name,
    /// `{{char}}` → character name.
    pub fn persona(user_name: &str, char_name: &str) -> Self {
        Self::new()
            .add_literal(USER_TOKEN, user_name)
            .add_literal(CHAR_TOKEN, char_name)
    }

    /// Rewrite all occurrences of every pattern in a string.
    pub fn apply_str(&self, input: &str) -> String {
        let mut text = input.to_string();
        for (regex, value) in &self.pairs {
            text = regex.replace_all(&text, NoExpand(value)).into_owned();
        }
        text
    }

    /// Rewrite a JSON value tree in place: strings through the string
    /// rule, arrays and objects recursed, other scalars untouched.
    pub fn apply_value(&self, value: &mut Value) {
        match value {
            Value::String(s) => *s = self.apply_str(s),
            Value::Array(items) => items.iter_mut().for_each(|v| self.apply_value(v)),
            Value::Object(map) => map.values_mut().for_each(|v| self.apply_value(v)),
            _ => {}
        }
    }

    /// Rewrite a message's speaker name and content in place.
    pub fn apply_message(&self, message: &mut PromptMessage) {
        if let Some(name) = &mut message.name {
            *name = self.apply_str(name);
        }
        message.content = self.apply_str(&message.content);
    }

    /// Rewrite every message in a list in place.
    pub fn apply_messages(&self, messages: &mut [PromptMessage]) {
        messages.iter_mut().for_each(|m| self.apply_message(m));
    }
}
