//! Error taxonomy for the generate pipeline. Every variant is caught at the
//! gateway boundary and mapped to a JSON error body; nothing crashes the process.

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Provide either quiz text or imageBase64.")]
    InvalidInput,
    #[error("GEMINI_API_KEY is missing on the server.")]
    MissingApiKey,
    #[error("all model candidates failed: {0}")]
    Upstream(String),
    #[error("No valid JSON found in the AI response.")]
    NoJsonFound,
    #[error("Malformed JSON response from AI.")]
    MalformedJson,
}
