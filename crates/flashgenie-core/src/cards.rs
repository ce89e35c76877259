//! Study card shapes and the deployment variant selector.

use serde::{Deserialize, Serialize};

/// Every reply to the client carries exactly this many cards.
pub const CARD_COUNT: usize = 6;

/// Placeholder option set used when a model reply has unusable options.
pub const PLACEHOLDER_OPTIONS: [&str; 4] = ["Option A", "Option B", "Option C", "Option D"];

/// Which card shape this deployment produces. One binary, two configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardMode {
    #[default]
    Flashcards,
    MultipleChoice,
}

impl CardMode {
    /// Parses the `FLASHGENIE_MODE` value. Anything unrecognized falls back
    /// to flashcards, the original deployment.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "multiple-choice" | "multiple_choice" | "mcq" => CardMode::MultipleChoice,
            _ => CardMode::Flashcards,
        }
    }
}

/// Front/back card: question on the front, answer on the back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: i64,
    pub question: String,
    pub answer: String,
}

/// Multiple-choice card: four distinct options, `correct_answer` is one of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceCard {
    pub id: i64,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// One study card, serialized as its bare variant shape (no enum tag on the wire).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudyCard {
    Flashcard(Flashcard),
    Choice(ChoiceCard),
}

impl StudyCard {
    pub fn id(&self) -> i64 {
        match self {
            StudyCard::Flashcard(c) => c.id,
            StudyCard::Choice(c) => c.id,
        }
    }

    /// Fully-placeholder card for the 1-based position `n`.
    pub fn placeholder(mode: CardMode, n: usize) -> Self {
        match mode {
            CardMode::Flashcards => StudyCard::Flashcard(Flashcard {
                id: n as i64,
                question: format!("Question {}", n),
                answer: format!("Answer {}", n),
            }),
            CardMode::MultipleChoice => StudyCard::Choice(ChoiceCard {
                id: n as i64,
                question: format!("Question {}", n),
                options: PLACEHOLDER_OPTIONS.iter().map(|s| s.to_string()).collect(),
                correct_answer: PLACEHOLDER_OPTIONS[0].to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_mode_parses_known_spellings() {
        assert_eq!(CardMode::parse("multiple-choice"), CardMode::MultipleChoice);
        assert_eq!(CardMode::parse("MCQ"), CardMode::MultipleChoice);
        assert_eq!(CardMode::parse("flashcards"), CardMode::Flashcards);
        assert_eq!(CardMode::parse("anything else"), CardMode::Flashcards);
    }

    #[test]
    fn flashcard_serializes_without_enum_tag() {
        let card = StudyCard::placeholder(CardMode::Flashcards, 3);
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 3, "question": "Question 3", "answer": "Answer 3"})
        );
    }

    #[test]
    fn choice_card_serializes_camel_case() {
        let card = StudyCard::placeholder(CardMode::MultipleChoice, 1);
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["correctAnswer"], "Option A");
        assert_eq!(json["options"].as_array().unwrap().len(), 4);
    }
}
