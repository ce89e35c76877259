//! Request Assembler: turns caller input into the ordered prompt segments
//! sent to Gemini. The system instruction always comes first, then the image
//! (when present), then the user's text or a per-mode fallback instruction.

use crate::cards::CardMode;
use crate::error::GenerateError;
use crate::gemini_bridge::Part;

const DEFAULT_IMAGE_MIME: &str = "image/png";

const FLASHCARD_SYSTEM_INSTRUCTION: &str = "You generate exactly 6 flashcards as a JSON array. Each flashcard has: id (number), question (string), answer (string). The question goes on the front of the card and the answer goes on the back. Respond with only the JSON array, no additional text.";

const CHOICE_SYSTEM_INSTRUCTION: &str = "You generate exactly 6 multiple-choice questions as a JSON array. Each question has: id (number), question (string), options (array of exactly 4 distinct strings), correctAnswer (string, one of the options). Respond with only the JSON array, no additional text.";

const FLASHCARD_IMAGE_FALLBACK: &str = "Generate flashcards based on this image. Create question-answer pairs that help users learn the key concepts.";

const CHOICE_IMAGE_FALLBACK: &str = "Generate multiple-choice questions based on this image. Create questions with four answer options that help users learn the key concepts.";

const FLASHCARD_TEXT_CLOSING: &str = "Generate flashcards with questions on the front and answers on the back.";

const CHOICE_TEXT_CLOSING: &str = "Generate multiple-choice questions with four answer options and one correct answer each.";

/// Inline image payload: bare base64 plus its MIME type.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub mime_type: String,
    pub data: String,
}

impl ImageData {
    /// Accepts either a `data:<mime>;base64,<payload>` URL or a bare base64
    /// string. MIME comes from the envelope when present, `image/png` otherwise.
    pub fn from_raw(raw: &str) -> Self {
        if let Some(rest) = raw.strip_prefix("data:") {
            let mime = rest.split(';').next().unwrap_or("").trim();
            let data = raw.split_once(',').map(|(_, d)| d).unwrap_or(raw);
            Self {
                mime_type: if mime.is_empty() {
                    DEFAULT_IMAGE_MIME.to_string()
                } else {
                    mime.to_string()
                },
                data: data.to_string(),
            }
        } else {
            Self {
                mime_type: DEFAULT_IMAGE_MIME.to_string(),
                data: raw.to_string(),
            }
        }
    }
}

/// Caller input for one generation. At least one field must be non-empty.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub prompt_text: Option<String>,
    pub image: Option<ImageData>,
}

impl GenerationRequest {
    /// Builds a request from the wire fields: `quiz` is trimmed (blank means
    /// absent), `image_base64` is decoded from its data-URL envelope if any.
    pub fn from_raw(quiz: Option<&str>, image_base64: Option<&str>) -> Self {
        let prompt_text = quiz
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let image = image_base64
            .filter(|s| !s.is_empty())
            .map(ImageData::from_raw);
        Self { prompt_text, image }
    }
}

fn system_instruction(mode: CardMode) -> &'static str {
    match mode {
        CardMode::Flashcards => FLASHCARD_SYSTEM_INSTRUCTION,
        CardMode::MultipleChoice => CHOICE_SYSTEM_INSTRUCTION,
    }
}

fn image_fallback(mode: CardMode) -> &'static str {
    match mode {
        CardMode::Flashcards => FLASHCARD_IMAGE_FALLBACK,
        CardMode::MultipleChoice => CHOICE_IMAGE_FALLBACK,
    }
}

fn text_closing(mode: CardMode) -> &'static str {
    match mode {
        CardMode::Flashcards => FLASHCARD_TEXT_CLOSING,
        CardMode::MultipleChoice => CHOICE_TEXT_CLOSING,
    }
}

/// Assembles the ordered prompt segments for one request.
///
/// Fails with `GenerateError::InvalidInput` when both fields are empty; this
/// is the only local validation and runs before any external call.
pub fn assemble_prompt(
    request: &GenerationRequest,
    mode: CardMode,
) -> Result<Vec<Part>, GenerateError> {
    let text = request
        .prompt_text
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    if text.is_none() && request.image.is_none() {
        return Err(GenerateError::InvalidInput);
    }

    let mut parts = vec![Part::text(system_instruction(mode))];

    if let Some(image) = &request.image {
        parts.push(Part::inline_data(&image.mime_type, &image.data));
        parts.push(Part::text(text.unwrap_or(image_fallback(mode))));
    } else {
        parts.push(Part::text(format!(
            "Topic or Prompt: {}\n\n{}",
            text.unwrap_or_default(),
            text_closing(mode)
        )));
    }

    Ok(parts)
}
