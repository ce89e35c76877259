//! Gemini bridge: wire types for the `generateContent` REST API and a client
//! that supports mock (deterministic, offline) and live modes.
//!
//! Live calls walk the configured model candidates strictly in order and stop
//! at the first success — never in parallel, one billing attempt at a time.

use serde::{Deserialize, Serialize};

use crate::cards::CardMode;
use crate::error::GenerateError;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Mode for LLM invocation: mock (returns a canned prose-wrapped reply) or
/// live (calls the Gemini API).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmMode {
    #[default]
    Live,
    Mock,
}

impl LlmMode {
    /// Parses the `FLASHGENIE_LLM_MODE` value. Anything but `mock` is live.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => LlmMode::Mock,
            _ => LlmMode::Live,
        }
    }
}

/// One prompt segment. Gemini v1beta requires structured parts: text is
/// wrapped as `{"text": ...}`, images as `{"inlineData": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Part::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Bare base64 payload, no data-URL envelope.
    pub data: String,
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: Option<String>,
}

/// Client for the Gemini `generateContent` endpoint.
pub struct GeminiBridge {
    mode: LlmMode,
    card_mode: CardMode,
    client: reqwest::Client,
}

impl GeminiBridge {
    pub fn new(mode: LlmMode, card_mode: CardMode) -> Self {
        Self {
            mode,
            card_mode,
            client: reqwest::Client::new(),
        }
    }

    pub fn mode(&self) -> LlmMode {
        self.mode
    }

    /// Sends the assembled parts and returns the raw completion text.
    ///
    /// Candidates are tried one at a time; the first success wins. When every
    /// candidate fails the per-attempt errors are aggregated into
    /// `GenerateError::Upstream`.
    pub async fn generate(
        &self,
        api_key: &str,
        candidates: &[String],
        parts: Vec<Part>,
    ) -> Result<String, GenerateError> {
        match self.mode {
            LlmMode::Mock => Ok(mock_reply(self.card_mode)),
            LlmMode::Live => {
                let mut attempts: Vec<String> = Vec::new();
                for model in candidates {
                    tracing::info!(
                        target: "flashgenie::bridge",
                        model = %model,
                        "dispatching generateContent request"
                    );
                    match self.attempt(api_key, model, parts.clone()).await {
                        Ok(text) => return Ok(text),
                        Err(e) => {
                            tracing::warn!(
                                target: "flashgenie::bridge",
                                model = %model,
                                "model attempt failed: {}",
                                e
                            );
                            attempts.push(format!("{}: {}", model, e));
                        }
                    }
                }
                Err(GenerateError::Upstream(attempts.join("; ")))
            }
        }
    }

    /// One live call to one model. Errors are strings so the fallback loop
    /// can aggregate them without losing the per-model context.
    async fn attempt(
        &self,
        api_key: &str,
        model: &str,
        parts: Vec<Part>,
    ) -> Result<String, String> {
        let url = format!("{}/models/{}:generateContent?key={}", BASE_URL, model, api_key);
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!("HTTP {}: {}", status, error_text));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| format!("invalid response body: {}", e))?;

        let text = reply
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err("empty candidate list in response".to_string());
        }
        Ok(text)
    }
}

/// Deterministic canned completion, prose-wrapped the way Gemini tends to
/// answer, so mock mode exercises the full normalization path.
fn mock_reply(card_mode: CardMode) -> String {
    let cards = match card_mode {
        CardMode::Flashcards => serde_json::json!([
            {"id": 1, "question": "What does HTTP stand for?", "answer": "HyperText Transfer Protocol"},
            {"id": 2, "question": "What does DNS resolve?", "answer": "Domain names to IP addresses"},
            {"id": 3, "question": "What is the default HTTPS port?", "answer": "443"},
            {"id": 4, "question": "What does TCP guarantee that UDP does not?", "answer": "Ordered, reliable delivery"},
            {"id": 5, "question": "What does TLS provide?", "answer": "Encryption and authentication in transit"},
            {"id": 6, "question": "What is a CDN used for?", "answer": "Serving content from edge locations near users"}
        ]),
        CardMode::MultipleChoice => serde_json::json!([
            {"id": 1, "question": "What does HTTP stand for?",
             "options": ["HyperText Transfer Protocol", "High Throughput Transfer Protocol", "Hyperlink Text Protocol", "Host Transfer Protocol"],
             "correctAnswer": "HyperText Transfer Protocol"},
            {"id": 2, "question": "Which record maps a hostname to an IPv4 address?",
             "options": ["A", "MX", "TXT", "CNAME"],
             "correctAnswer": "A"},
            {"id": 3, "question": "What is the default HTTPS port?",
             "options": ["443", "80", "8080", "22"],
             "correctAnswer": "443"},
            {"id": 4, "question": "Which protocol guarantees ordered delivery?",
             "options": ["TCP", "UDP", "ICMP", "ARP"],
             "correctAnswer": "TCP"},
            {"id": 5, "question": "What does TLS provide?",
             "options": ["Encryption in transit", "Data compression", "Load balancing", "Caching"],
             "correctAnswer": "Encryption in transit"},
            {"id": 6, "question": "What is a CDN primarily used for?",
             "options": ["Serving content from edge locations", "Compiling code", "Database replication", "Packet routing"],
             "correctAnswer": "Serving content from edge locations"}
        ]),
    };
    format!(
        "Here are your 6 study cards:\n\n{}\n\nLet me know if you want another set.",
        cards
    )
}
