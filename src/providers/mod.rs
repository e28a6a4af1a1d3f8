use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures::future::BoxFuture;
use reqwest::Client;

use crate::grading::image::ImagePayload;
use crate::grading::GradingError;
use crate::settings::Settings;

pub mod gemini;
pub mod openai;

pub use gemini::GeminiClient;
pub use openai::OpenAIClient;

/// A hosted multimodal model that answers a text prompt about one image.
pub trait VisionModel: Send + Sync {
    /// Provider and model, for logs.
    fn describe(&self) -> String;

    /// Send `prompt` and `image` in a single request and return the model's
    /// free-text reply.
    fn analyze_image<'a>(&'a self, prompt: &'a str, image: &'a ImagePayload) -> BoxFuture<'a, Result<String>>;
}

// AI Provider enum to pick the upstream grading service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AIProvider {
    Gemini,
    OpenAI,
}

impl AIProvider {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Some(AIProvider::Gemini),
            "openai" => Some(AIProvider::OpenAI),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AIProvider::Gemini => "gemini",
            AIProvider::OpenAI => "openai",
        }
    }

    pub fn api_key_var(&self) -> &'static str {
        match self {
            AIProvider::Gemini => "GEMINI_API_KEY",
            AIProvider::OpenAI => "OPENAI_API_KEY",
        }
    }
}

/// Build the configured provider client.
///
/// Fails with [`GradingError::Configuration`] when the provider name is
/// unknown or its API key is missing.
pub fn build_vision_model(settings: &Settings) -> std::result::Result<Arc<dyn VisionModel>, GradingError> {
    let provider = AIProvider::from_str(&settings.provider)
        .ok_or_else(|| GradingError::Configuration(format!("Unknown AI provider '{}'", settings.provider)))?;

    let api_key = match provider {
        AIProvider::Gemini => settings.gemini_api_key.clone(),
        AIProvider::OpenAI => settings.openai_api_key.clone(),
    }
    .ok_or_else(|| GradingError::Configuration(format!("{} environment variable not set", provider.api_key_var())))?;

    let client = http_client(settings.upstream_timeout_secs);

    let model: Arc<dyn VisionModel> = match provider {
        AIProvider::Gemini => Arc::new(GeminiClient::new(
            client,
            api_key,
            settings.gemini_base_url.clone(),
            settings.gemini_model.clone(),
        )),
        AIProvider::OpenAI => Arc::new(OpenAIClient::new(
            client,
            api_key,
            settings.openai_base_url.clone(),
            settings.openai_model.clone(),
        )),
    };
    Ok(model)
}

fn http_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Reject HTML error pages some proxies return with a 200.
pub(crate) fn looks_like_html(body: &str) -> bool {
    let trimmed = body.trim_start();
    trimmed.starts_with("<!DOCTYPE html>") || trimmed.starts_with("<html")
}
