//! FlashGenie Gateway — JSON API in front of the Gemini bridge.
//! Routes: /health, /version (flashcard deployments), /generate.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use flashgenie_core::{
    assemble_prompt, normalize_cards, AppConfig, CardMode, GeminiBridge, GenerateError,
    GenerationRequest, LlmMode, StudyCard,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Base64 image payloads get big; mirror the original 50 MB body allowance.
const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

#[derive(Clone)]
struct AppState {
    config: Arc<AppConfig>,
    bridge: Arc<GeminiBridge>,
}

#[derive(Deserialize)]
struct GenerateBody {
    #[serde(default)]
    quiz: Option<String>,
    #[serde(default, rename = "imageBase64")]
    image_base64: Option<String>,
}

/// Maps every pipeline error to the JSON error body at the request boundary.
struct ApiError(GenerateError);

impl From<GenerateError> for ApiError {
    fn from(err: GenerateError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(target: "flashgenie::gateway", "request handling error: {}", self.0);
        let (status, body) = match &self.0 {
            GenerateError::InvalidInput => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({
                    "error": "INVALID_INPUT",
                    "message": self.0.to_string(),
                }),
            ),
            GenerateError::MissingApiKey => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "error": "SERVER_CONFIG",
                    "details": self.0.to_string(),
                }),
            ),
            GenerateError::Upstream(_)
            | GenerateError::NoJsonFound
            | GenerateError::MalformedJson => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({
                    "error": "An error occurred while processing your request.",
                    "details": self.0.to_string(),
                }),
            ),
        };
        (status, Json(body)).into_response()
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    tracing::info!(
        target: "flashgenie::gateway",
        card_mode = ?config.card_mode,
        llm_mode = ?config.llm_mode,
        models = ?config.candidate_models(),
        "starting FlashGenie gateway"
    );

    let addr = format!("0.0.0.0:{}", config.port);
    let state = AppState {
        bridge: Arc::new(GeminiBridge::new(config.llm_mode, config.card_mode)),
        config: Arc::new(config),
    };
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    tracing::info!(target: "flashgenie::gateway", "listening on {}", addr);
    axum::serve(listener, app).await.unwrap();
}

fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .route("/health", get(health))
        .route("/generate", post(generate));

    // /version belongs to the flashcard deployment only.
    if state.config.card_mode == CardMode::Flashcards {
        router = router.route("/version", get(version));
    }

    router
        .with_state(state)
        .layer(cors)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn version(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "version": flashgenie_core::version(),
        "model": state.config.model,
        "features": ["text-to-flashcards", "image-to-flashcards"],
    }))
}

async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<Vec<StudyCard>>, ApiError> {
    let request = GenerationRequest::from_raw(body.quiz.as_deref(), body.image_base64.as_deref());
    let parts = assemble_prompt(&request, state.config.card_mode)?;

    // Key presence is checked per request so the server still boots for /health.
    if state.bridge.mode() == LlmMode::Live && state.config.api_key.is_empty() {
        return Err(GenerateError::MissingApiKey.into());
    }

    let raw = state
        .bridge
        .generate(
            &state.config.api_key,
            &state.config.candidate_models(),
            parts,
        )
        .await?;
    tracing::debug!(target: "flashgenie::gateway", "raw AI response: {}", raw);

    let cards = normalize_cards(&raw, state.config.card_mode)?;
    Ok(Json(cards))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_state(card_mode: CardMode, llm_mode: LlmMode) -> AppState {
        let config = AppConfig {
            card_mode,
            llm_mode,
            ..AppConfig::default()
        };
        AppState {
            bridge: Arc::new(GeminiBridge::new(llm_mode, card_mode)),
            config: Arc::new(config),
        }
    }

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_generate(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/generate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = build_app(test_state(CardMode::Flashcards, LlmMode::Mock));
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(body_json(res).await, serde_json::json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn version_reports_model_and_features() {
        let app = build_app(test_state(CardMode::Flashcards, LlmMode::Mock));
        let req = Request::builder().uri("/version").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        assert_eq!(json["model"], "gemini-2.0-flash");
        assert_eq!(
            json["features"],
            serde_json::json!(["text-to-flashcards", "image-to-flashcards"])
        );
    }

    #[tokio::test]
    async fn version_is_absent_in_multiple_choice_deployments() {
        let app = build_app(test_state(CardMode::MultipleChoice, LlmMode::Mock));
        let req = Request::builder().uri("/version").body(Body::empty()).unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn empty_generate_body_is_rejected_with_invalid_input() {
        let app = build_app(test_state(CardMode::Flashcards, LlmMode::Mock));
        let res = app.oneshot(post_generate(serde_json::json!({}))).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let json = body_json(res).await;
        assert_eq!(json["error"], "INVALID_INPUT");
        assert!(json["message"].is_string());
    }

    #[tokio::test]
    async fn generate_returns_six_flashcards_in_mock_mode() {
        let app = build_app(test_state(CardMode::Flashcards, LlmMode::Mock));
        let res = app
            .oneshot(post_generate(serde_json::json!({
                "quiz": "What is the capital of France?"
            })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        let cards = json.as_array().unwrap();
        assert_eq!(cards.len(), 6);
        for card in cards {
            assert!(card["id"].is_number());
            assert!(card["question"].is_string());
            assert!(card["answer"].is_string());
        }
    }

    #[tokio::test]
    async fn generate_returns_choice_shape_in_multiple_choice_mode() {
        let app = build_app(test_state(CardMode::MultipleChoice, LlmMode::Mock));
        let res = app
            .oneshot(post_generate(serde_json::json!({"quiz": "networking"})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        let cards = json.as_array().unwrap();
        assert_eq!(cards.len(), 6);
        for card in cards {
            let options = card["options"].as_array().unwrap();
            assert_eq!(options.len(), 4);
            let correct = card["correctAnswer"].as_str().unwrap();
            assert!(options.iter().any(|o| o.as_str() == Some(correct)));
        }
    }

    #[tokio::test]
    async fn generate_accepts_image_only_requests() {
        let app = build_app(test_state(CardMode::Flashcards, LlmMode::Mock));
        let res = app
            .oneshot(post_generate(serde_json::json!({
                "imageBase64": "data:image/jpeg;base64,/9j/4AAQ"
            })))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let json = body_json(res).await;
        assert_eq!(json.as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn live_mode_without_key_reports_server_config() {
        let app = build_app(test_state(CardMode::Flashcards, LlmMode::Live));
        let res = app
            .oneshot(post_generate(serde_json::json!({"quiz": "anything"})))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(res).await;
        assert_eq!(json["error"], "SERVER_CONFIG");
        assert!(json["details"].is_string());
    }
}
