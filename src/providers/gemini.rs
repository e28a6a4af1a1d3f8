use anyhow::Result;
use futures::future::BoxFuture;
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{looks_like_html, VisionModel};
use crate::grading::image::ImagePayload;

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum GeminiPart<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
struct InlineData<'a> {
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiReplyContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct GeminiReplyContent {
    #[serde(default)]
    parts: Vec<GeminiReplyPart>,
}

#[derive(Deserialize)]
struct GeminiReplyPart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GeminiUsage {
    #[serde(rename = "promptTokenCount", default)]
    prompt_token_count: u32,
    #[serde(rename = "candidatesTokenCount", default)]
    candidates_token_count: u32,
    #[serde(rename = "totalTokenCount", default)]
    total_token_count: u32,
}

/// Google Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(client: Client, api_key: String, base_url: String, model: String) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    pub async fn generate_with_image(&self, prompt: &str, image: &ImagePayload) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![
                    GeminiPart::Text { text: prompt },
                    GeminiPart::InlineData {
                        inline_data: InlineData {
                            mime_type: &image.mime_type,
                            data: &image.base64,
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.4,
                max_output_tokens: 2048,
            },
        };

        info!("📤 Sending homework image to Gemini model: {} ({} bytes)", self.model, image.decoded_len);

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, self.model))
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("❌ Gemini API error {}: {}", status, error_text);
            return Err(anyhow::anyhow!("Gemini API error {}: {}", status, error_text));
        }

        let body = response.text().await?;
        if looks_like_html(&body) {
            return Err(anyhow::anyhow!("Received HTML response instead of JSON"));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body)?;
        if let Some(usage) = &gemini_response.usage_metadata {
            info!(
                "Token usage - Prompt: {}, Completion: {}, Total: {}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        extract_reply_text(gemini_response)
    }
}

fn extract_reply_text(response: GeminiResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("No candidates in Gemini response"))?;

    let text: String = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(anyhow::anyhow!(
            "Empty Gemini reply (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        ));
    }

    info!("✅ Received reply from Gemini: {} characters", text.len());
    Ok(text)
}

impl VisionModel for GeminiClient {
    fn describe(&self) -> String {
        format!("gemini/{}", self.model)
    }

    fn analyze_image<'a>(&'a self, prompt: &'a str, image: &'a ImagePayload) -> BoxFuture<'a, Result<String>> {
        Box::pin(self.generate_with_image(prompt, image))
    }
}
