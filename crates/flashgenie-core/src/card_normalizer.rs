//! Response Normalizer: coerces an untrusted model reply into exactly 6
//! well-formed study cards. The model frequently wraps its JSON in prose or
//! drops fields; per-element repair substitutes placeholders instead of
//! failing the whole request. The only fatal points are "no array at all"
//! and "array that does not parse".

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::cards::{CardMode, ChoiceCard, Flashcard, StudyCard, CARD_COUNT, PLACEHOLDER_OPTIONS};
use crate::error::GenerateError;

/// Greedy bracket match: first `[` to last `]`, newlines included.
fn array_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\[.*\]").expect("array pattern is valid"))
}

/// Extracts, parses and repairs the model reply into exactly `CARD_COUNT`
/// cards of the given variant.
pub fn normalize_cards(raw: &str, mode: CardMode) -> Result<Vec<StudyCard>, GenerateError> {
    let json_text = array_pattern()
        .find(raw)
        .ok_or(GenerateError::NoJsonFound)?
        .as_str();

    let parsed: Value =
        serde_json::from_str(json_text).map_err(|_| GenerateError::MalformedJson)?;
    let Value::Array(items) = parsed else {
        return Err(GenerateError::MalformedJson);
    };

    let mut cards: Vec<StudyCard> = items
        .iter()
        .take(CARD_COUNT)
        .enumerate()
        .map(|(index, item)| repair_element(item, index, mode))
        .collect();

    while cards.len() < CARD_COUNT {
        cards.push(StudyCard::placeholder(mode, cards.len() + 1));
    }

    Ok(cards)
}

/// Repairs one element by its 1-based position. Never fails, never looks at
/// other elements.
fn repair_element(value: &Value, index: usize, mode: CardMode) -> StudyCard {
    let n = index + 1;
    let id = value.get("id").and_then(Value::as_i64).unwrap_or(n as i64);
    let question = repaired_text(value.get("question"), || format!("Question {}", n));

    match mode {
        CardMode::Flashcards => StudyCard::Flashcard(Flashcard {
            id,
            question,
            answer: repaired_text(value.get("answer"), || format!("Answer {}", n)),
        }),
        CardMode::MultipleChoice => {
            let options = repaired_options(value.get("options"));
            let correct_answer = value
                .get("correctAnswer")
                .and_then(Value::as_str)
                .filter(|s| options.iter().any(|o| o == s))
                .map(str::to_string)
                .unwrap_or_else(|| options[0].clone());
            StudyCard::Choice(ChoiceCard {
                id,
                question,
                options,
                correct_answer,
            })
        }
    }
}

/// Kept trimmed when present, a string and non-blank; placeholder otherwise.
fn repaired_text(value: Option<&Value>, placeholder: impl FnOnce() -> String) -> String {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(placeholder)
}

/// First 4 options kept as-is when the value is an array of at least 4
/// distinct strings; the fixed placeholder set otherwise.
fn repaired_options(value: Option<&Value>) -> Vec<String> {
    let kept = value.and_then(Value::as_array).and_then(|items| {
        if items.len() < 4 {
            return None;
        }
        let first_four: Vec<&str> = items.iter().take(4).filter_map(Value::as_str).collect();
        if first_four.len() < 4 {
            return None;
        }
        let distinct = first_four
            .iter()
            .collect::<std::collections::HashSet<_>>()
            .len();
        if distinct < 4 {
            return None;
        }
        Some(first_four.iter().map(|s| s.to_string()).collect())
    });
    kept.unwrap_or_else(|| PLACEHOLDER_OPTIONS.iter().map(|s| s.to_string()).collect())
}
