//! Application configuration, built once at startup and passed into handlers
//! through the gateway state. Handlers never read the environment ad hoc.

use crate::cards::CardMode;
use crate::gemini_bridge::LlmMode;

const ENV_PORT: &str = "PORT";
const ENV_API_KEY: &str = "GEMINI_API_KEY";
const ENV_MODEL: &str = "GEMINI_MODEL";
const ENV_FALLBACK_MODELS: &str = "GEMINI_FALLBACK_MODELS";
const ENV_CARD_MODE: &str = "FLASHGENIE_MODE";
const ENV_LLM_MODE: &str = "FLASHGENIE_LLM_MODE";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
/// Fallback tail tried after the primary model in multiple-choice deployments.
const DEFAULT_MCQ_FALLBACKS: [&str; 2] = ["gemini-2.0-flash-lite", "gemini-1.5-flash"];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// May be empty: the server still boots for /health, and live /generate
    /// requests answer SERVER_CONFIG until a key is supplied.
    pub api_key: String,
    pub model: String,
    pub fallback_models: Vec<String>,
    pub card_mode: CardMode,
    pub llm_mode: LlmMode,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port = std::env::var(ENV_PORT)
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);
        let api_key = std::env::var(ENV_API_KEY)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        let model = std::env::var(ENV_MODEL)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let card_mode = std::env::var(ENV_CARD_MODE)
            .map(|s| CardMode::parse(&s))
            .unwrap_or_default();
        let llm_mode = std::env::var(ENV_LLM_MODE)
            .map(|s| LlmMode::parse(&s))
            .unwrap_or_default();
        let fallback_models = match std::env::var(ENV_FALLBACK_MODELS) {
            Ok(list) => list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Err(_) => match card_mode {
                CardMode::Flashcards => Vec::new(),
                CardMode::MultipleChoice => DEFAULT_MCQ_FALLBACKS
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            },
        };

        Self {
            port,
            api_key,
            model,
            fallback_models,
            card_mode,
            llm_mode,
        }
    }

    /// Ordered candidate list for the sequential fallback pass: primary first,
    /// then the configured tail, duplicates skipped.
    pub fn candidate_models(&self) -> Vec<String> {
        let mut candidates = vec![self.model.clone()];
        for m in &self.fallback_models {
            if !candidates.contains(m) {
                candidates.push(m.clone());
            }
        }
        candidates
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            fallback_models: Vec::new(),
            card_mode: CardMode::Flashcards,
            llm_mode: LlmMode::Live,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_models_dedupes_and_keeps_order() {
        let config = AppConfig {
            model: "gemini-2.0-flash".to_string(),
            fallback_models: vec![
                "gemini-2.0-flash".to_string(),
                "gemini-2.0-flash-lite".to_string(),
                "gemini-1.5-flash".to_string(),
            ],
            ..AppConfig::default()
        };
        assert_eq!(
            config.candidate_models(),
            vec!["gemini-2.0-flash", "gemini-2.0-flash-lite", "gemini-1.5-flash"]
        );
    }

    #[test]
    fn default_config_has_single_candidate() {
        let config = AppConfig::default();
        assert_eq!(config.candidate_models(), vec![DEFAULT_MODEL]);
    }
}
