//! FlashGenie — Core library.
//! Turns a text prompt and/or an image into exactly 6 study cards via Gemini.

pub mod card_normalizer;
pub mod cards;
pub mod config;
pub mod error;
pub mod gemini_bridge;
pub mod prompt_assembler;

pub use card_normalizer::normalize_cards;
pub use cards::{CardMode, ChoiceCard, Flashcard, StudyCard, CARD_COUNT};
pub use config::AppConfig;
pub use error::GenerateError;
pub use gemini_bridge::{GeminiBridge, LlmMode, Part};
pub use prompt_assembler::{assemble_prompt, GenerationRequest, ImageData};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
