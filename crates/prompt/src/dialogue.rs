//! Example-dialogue parsing.
//!
//! A card's `mes_example` field is free text with inline speaker markers
//! (`{{user}}:` / `{{char}}:` at line start) and a `<START>` separator
//! between example conversations. This module parses it into ordered
//! structured turns with an explicit two-state machine:
//!
//! - `Idle` — no turn in progress; unmarked lines are discarded
//! - `Accumulating` — a turn is building; unmarked lines continue it
//!
//! A line carrying the *same* speaker marker as the current turn is
//! treated as a continuation of that turn — content is never dropped.

use regex::Regex;
use std::sync::LazyLock;
use tavernkit_core::message::{ConversationTurn, Role};

/// Separator between example conversations (matched by containment,
/// case-insensitively, as card tooling in the wild writes it loosely).
pub const TURN_SEPARATOR: &str = "<START>";

static SPEAKER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\{\{(user|char)\}\}").unwrap());

static SPEAKER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\{\{(user|char)\}\}:?[ ]*").unwrap());

enum State {
    Idle,
    Accumulating {
        speaker: String,
        role: Role,
        content: String,
    },
}

impl State {
    fn flush(&mut self, turns: &mut Vec<ConversationTurn>) {
        if let State::Accumulating {
            speaker,
            role,
            content,
        } = std::mem::replace(self, State::Idle)
        {
            if !content.is_empty() {
                turns.push(ConversationTurn {
                    speaker_name: speaker,
                    role,
                    content,
                });
            }
        }
    }
}

/// Parse an example-dialogue field into ordered conversation turns.
///
/// Turn order follows input line order; turns that never accumulated
/// content are not emitted.
pub fn parse_example_dialogue(text: &str) -> Vec<ConversationTurn> {
    let mut turns = Vec::new();
    let mut state = State::Idle;

    for line in text.split('\n') {
        if line.to_ascii_lowercase().contains("<start>") {
            state.flush(&mut turns);
            continue;
        }

        match SPEAKER_MARKER.find(line) {
            Some(marker) => {
                let stripped = SPEAKER_PREFIX.replace(line, "");
                let marker_text = marker.as_str();

                match &mut state {
                    State::Accumulating {
                        speaker, content, ..
                    } if speaker == marker_text => {
                        // Same speaker again: continuation, not a new turn
                        content.push('\n');
                        content.push_str(&stripped);
                    }
                    _ => {
                        state.flush(&mut turns);
                        let lowered = marker_text.to_ascii_lowercase();
                        let role = if lowered.contains("user") {
                            Role::User
                        } else {
                            Role::Assistant
                        };
                        state = State::Accumulating {
                            speaker: marker_text.to_string(),
                            role,
                            content: stripped.into_owned(),
                        };
                    }
                }
            }
            None => {
                if let State::Accumulating { content, .. } = &mut state {
                    content.push('\n');
                    content.push_str(line);
                }
                // Idle: no turn started yet, the line is discarded
            }
        }
    }

    state.flush(&mut turns);
    turns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_exchange() {
        let turns = parse_example_dialogue(
            "<START>\n{{user}}: Hi\n{{char}}: Hello\nHow are you?\n<START>\n{{user}}: Bye",
        );
        assert_eq!(turns.len(), 3);

        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].speaker_name, "{{user}}");
        assert_eq!(turns[0].content, "Hi");

        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[1].content, "Hello\nHow are you?");

        assert_eq!(turns[2].role, Role::User);
        assert_eq!(turns[2].content, "Bye");
    }

    #[test]
    fn separator_matches_case_insensitively_by_containment() {
        let turns =
            parse_example_dialogue("{{user}}: One\n  <start>  \n{{user}}: Two");
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].content, "One");
        assert_eq!(turns[1].content, "Two");
    }

    #[test]
    fn marker_without_colon_still_strips() {
        let turns = parse_example_dialogue("{{char}} waves at you");
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].content, "waves at you");
        assert_eq!(turns[0].role, Role::Assistant);
    }

    #[test]
    fn spaces_after_marker_stripped_with_and_without_colon() {
        let turns = parse_example_dialogue("{{user}}:   padded\n{{char}}   also padded");
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].content, "padded");
        assert_eq!(turns[1].content, "also padded");
    }

    #[test]
    fn lines_before_any_marker_are_discarded() {
        let turns = parse_example_dialogue("narration line\nmore text\n{{user}}: Hi");
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].content, "Hi");
    }

    #[test]
    fn same_speaker_marker_continues_turn() {
        let turns = parse_example_dialogue("{{user}}: First\n{{user}}: Second");
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].content, "First\nSecond");
    }

    #[test]
    fn marker_case_difference_starts_new_turn() {
        // Raw marker text is compared exactly, as stored in the source
        let turns = parse_example_dialogue("{{user}}: a\n{{USER}}: b");
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].speaker_name, "{{user}}");
        assert_eq!(turns[1].speaker_name, "{{USER}}");
        assert_eq!(turns[1].role, Role::User);
    }

    #[test]
    fn empty_turns_are_not_emitted() {
        let turns = parse_example_dialogue("<START>\n{{user}}:\n<START>");
        assert!(turns.is_empty());
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse_example_dialogue("").is_empty());
    }

    #[test]
    fn trailing_turn_flushes_at_end_of_input() {
        let turns = parse_example_dialogue("{{char}}: Farewell");
        assert_eq!(turns.len(), 1);
        assert_eq!(turns[0].content, "Farewell");
    }
}
