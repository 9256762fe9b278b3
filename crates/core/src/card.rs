//! Character card schema — versioned persona documents.
//!
//! A `CharacterCard` is the `chara_card_v2` JSON document embedded in a
//! card PNG. Wire names follow the published card convention
//! (`first_mes`, `mes_example`, …) so encoded PNGs interoperate with
//! third-party card readers; field names in Rust are spelled out.
//!
//! Normalization turns arbitrary, possibly partial or legacy JSON into a
//! fully-shaped card. It never fails: a missing or malformed field takes
//! its default. Legacy flat (v1) cards — `name` present, no `data`
//! wrapper — are promoted by treating the whole object as the `data`
//! payload. Unrecognized keys are preserved verbatim so a
//! decode→mutate→encode round-trip never destroys data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Format discriminator for the card schema family.
pub const CARD_SPEC: &str = "chara_card_v2";

/// Current schema version.
pub const CARD_SPEC_VERSION: &str = "2.0";

/// Data keys owned by the typed schema; everything else is carried in
/// the flattened unknown-key map.
const KNOWN_DATA_KEYS: &[&str] = &[
    "name",
    "description",
    "personality",
    "scenario",
    "first_mes",
    "mes_example",
    "creator_notes",
    "system_prompt",
    "post_history_instructions",
    "alternate_greetings",
    "character_book",
    "tags",
    "creator",
    "character_version",
    "extensions",
];

/// A versioned character-card document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterCard {
    /// Fixed format discriminator (`chara_card_v2`)
    #[serde(default = "default_spec")]
    pub spec: String,

    /// Schema version string
    #[serde(default = "default_spec_version")]
    pub spec_version: String,

    /// The persona definition
    #[serde(default)]
    pub data: CardData,
}

fn default_spec() -> String {
    CARD_SPEC.into()
}
fn default_spec_version() -> String {
    CARD_SPEC_VERSION.into()
}

/// The persona definition inside a card.
///
/// Every string field is always present — absence in the source is
/// normalized to an empty string, never to null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardData {
    pub name: String,
    pub description: String,
    pub personality: String,
    pub scenario: String,

    /// The character's opening greeting
    #[serde(rename = "first_mes")]
    pub first_message: String,

    /// Free-text example dialogue, `<START>`-separated
    #[serde(rename = "mes_example")]
    pub example_dialogue: String,

    pub creator_notes: String,
    pub system_prompt: String,

    /// Steering instructions inserted after the chat history
    pub post_history_instructions: String,

    /// Order-significant alternative opening greetings
    pub alternate_greetings: Vec<String>,

    /// Nested lore-entry collection, opaque to this crate.
    /// Never defaulted to an empty object — absent stays absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_book: Option<Value>,

    pub tags: Vec<String>,
    pub creator: String,
    pub character_version: String,

    /// Arbitrary namespaced key-value pairs; unknown keys must survive
    /// round-trips unless explicitly overwritten.
    pub extensions: Map<String, Value>,

    /// Unrecognized keys at the data level, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for CharacterCard {
    fn default() -> Self {
        Self {
            spec: default_spec(),
            spec_version: default_spec_version(),
            data: CardData::default(),
        }
    }
}

impl CharacterCard {
    /// Normalize arbitrary JSON into a fully-shaped card.
    ///
    /// Accepts `None`, non-objects, partial v2 documents, and legacy v1
    /// flat documents. Idempotent: normalizing a normalized card is a
    /// no-op.
    pub fn normalize(raw: Option<&Value>) -> Self {
        let empty = Map::new();
        let root = raw.and_then(Value::as_object).unwrap_or(&empty);

        let spec = nonempty_str(root.get("spec")).unwrap_or(CARD_SPEC).to_string();
        let spec_version = nonempty_str(root.get("spec_version"))
            .unwrap_or(CARD_SPEC_VERSION)
            .to_string();

        // v1 flat card: `name` present without a `data` wrapper means the
        // whole object is the data payload.
        let data_map = match root.get("data").and_then(Value::as_object) {
            Some(data) => data,
            None if root.contains_key("name") => root,
            None => &empty,
        };

        Self {
            spec,
            spec_version,
            data: CardData::from_map(data_map),
        }
    }

    /// Append an alternate greeting.
    pub fn add_alternate_greeting(&mut self, greeting: impl Into<String>) {
        self.data.alternate_greetings.push(greeting.into());
    }

    /// Append a tag.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        self.data.tags.push(tag.into());
    }
}

impl CardData {
    fn from_map(map: &Map<String, Value>) -> Self {
        let mut extra = Map::new();
        for (key, value) in map {
            if !KNOWN_DATA_KEYS.contains(&key.as_str()) {
                extra.insert(key.clone(), value.clone());
            }
        }

        Self {
            name: str_field(map, "name"),
            description: str_field(map, "description"),
            personality: str_field(map, "personality"),
            scenario: str_field(map, "scenario"),
            first_message: str_field(map, "first_mes"),
            example_dialogue: str_field(map, "mes_example"),
            creator_notes: str_field(map, "creator_notes"),
            system_prompt: str_field(map, "system_prompt"),
            post_history_instructions: str_field(map, "post_history_instructions"),
            alternate_greetings: string_list(map, "alternate_greetings"),
            character_book: map.get("character_book").cloned(),
            tags: string_list(map, "tags"),
            creator: str_field(map, "creator"),
            character_version: str_field(map, "character_version"),
            extensions: map
                .get("extensions")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            extra,
        }
    }
}

fn nonempty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn str_field(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn string_list(map: &Map<String, Value>, key: &str) -> Vec<String> {
    map.get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn none_input_takes_all_defaults() {
        let card = CharacterCard::normalize(None);
        assert_eq!(card.spec, CARD_SPEC);
        assert_eq!(card.spec_version, CARD_SPEC_VERSION);
        assert_eq!(card.data.name, "");
        assert!(card.data.alternate_greetings.is_empty());
        assert!(card.data.extensions.is_empty());
        assert!(card.data.character_book.is_none());
    }

    #[test]
    fn non_object_input_takes_defaults() {
        let card = CharacterCard::normalize(Some(&json!("not a card")));
        assert_eq!(card, CharacterCard::default());
    }

    #[test]
    fn legacy_flat_card_is_promoted() {
        let raw = json!({
            "name": "Hermione",
            "description": "A studious witch",
            "first_mes": "Hello!"
        });
        let card = CharacterCard::normalize(Some(&raw));
        assert_eq!(card.spec, CARD_SPEC);
        assert_eq!(card.data.name, "Hermione");
        assert_eq!(card.data.description, "A studious witch");
        assert_eq!(card.data.first_message, "Hello!");
        assert_eq!(card.data.personality, "");
    }

    #[test]
    fn wrapped_card_fields_pass_through() {
        let raw = json!({
            "spec": "chara_card_v2",
            "spec_version": "2.0",
            "data": {
                "name": "Bot",
                "tags": ["fantasy", "helper"],
                "alternate_greetings": ["Hi", "Hey"],
                "extensions": { "talkativeness": 0.5 }
            }
        });
        let card = CharacterCard::normalize(Some(&raw));
        assert_eq!(card.data.tags, vec!["fantasy", "helper"]);
        assert_eq!(card.data.alternate_greetings, vec!["Hi", "Hey"]);
        assert_eq!(card.data.extensions["talkativeness"], json!(0.5));
    }

    #[test]
    fn character_book_is_never_defaulted() {
        let absent = CharacterCard::normalize(Some(&json!({"data": {"name": "A"}})));
        assert!(absent.data.character_book.is_none());

        let present = CharacterCard::normalize(Some(&json!({
            "data": { "name": "A", "character_book": { "entries": [] } }
        })));
        assert_eq!(
            present.data.character_book,
            Some(json!({ "entries": [] }))
        );
    }

    #[test]
    fn unknown_data_keys_are_preserved() {
        let raw = json!({
            "data": { "name": "A", "avatar": "a.png", "chat": "log.jsonl" }
        });
        let card = CharacterCard::normalize(Some(&raw));
        assert_eq!(card.data.extra["avatar"], json!("a.png"));
        assert_eq!(card.data.extra["chat"], json!("log.jsonl"));

        // ...and survive serialization at the data level
        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["data"]["avatar"], json!("a.png"));
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = json!({
            "name": "Legacy",
            "mes_example": "<START>\n{{user}}: hi",
            "custom_field": 42
        });
        let once = CharacterCard::normalize(Some(&raw));
        let twice =
            CharacterCard::normalize(Some(&serde_json::to_value(&once).unwrap()));
        assert_eq!(once, twice);
    }

    #[test]
    fn serialization_uses_wire_names() {
        let mut card = CharacterCard::default();
        card.data.first_message = "Greetings".into();
        card.data.example_dialogue = "<START>".into();
        let json = serde_json::to_string(&card).unwrap();
        assert!(json.contains("\"first_mes\""));
        assert!(json.contains("\"mes_example\""));
        assert!(!json.contains("first_message"));
    }

    #[test]
    fn append_mutators() {
        let mut card = CharacterCard::default();
        card.add_alternate_greeting("Well met");
        card.add_tag("fantasy");
        assert_eq!(card.data.alternate_greetings, vec!["Well met"]);
        assert_eq!(card.data.tags, vec!["fantasy"]);
    }

    #[test]
    fn empty_string_spec_falls_back() {
        let card = CharacterCard::normalize(Some(&json!({"spec": "", "data": {}})));
        assert_eq!(card.spec, CARD_SPEC);
    }
}
