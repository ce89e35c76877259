//! Model preflight — verifies the configured Gemini key and lists the models
//! that support generateContent. Run before a deployment: cargo run --bin check_models

use serde::Deserialize;

const MODELS_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let api_key = std::env::var("GEMINI_API_KEY")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();

    if api_key.is_empty() {
        eprintln!("[CHECK MODELS] GEMINI_API_KEY is not set. Add it to .env or the environment.");
        std::process::exit(1);
    }
    println!("[CHECK MODELS] Key present ({} chars)", api_key.len());
    if !api_key.starts_with("AIza") {
        println!("[CHECK MODELS] Warning: key does not start with 'AIza' — double-check it is a Gemini API key.");
    }

    let url = format!("{}?key={}", MODELS_URL, api_key);
    let response = match reqwest::get(&url).await {
        Ok(r) => r,
        Err(e) => {
            eprintln!("[CHECK MODELS] Request failed: {}", e);
            std::process::exit(1);
        }
    };

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        eprintln!("[CHECK MODELS] HTTP {}: {}", status, body);
        std::process::exit(1);
    }

    let list: ModelList = match response.json().await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("[CHECK MODELS] Invalid response body: {}", e);
            std::process::exit(1);
        }
    };

    let mut usable = 0;
    for model in &list.models {
        if model
            .supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
        {
            usable += 1;
            println!("[CHECK MODELS]   {}", model.name.trim_start_matches("models/"));
        }
    }
    println!(
        "[CHECK MODELS] {} of {} models support generateContent.",
        usable,
        list.models.len()
    );
}
