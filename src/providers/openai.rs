use anyhow::Result;
use futures::future::BoxFuture;
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{looks_like_html, VisionModel};
use crate::grading::image::ImagePayload;

#[derive(Serialize)]
struct OpenAIMessage {
    role: String,
    content: serde_json::Value,
}

#[derive(Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    max_tokens: u32,
    temperature: f64,
    stream: bool,
}

#[derive(Deserialize)]
struct OpenAIReplyMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIReplyMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

/// Chat-completions client for OpenAI or any compatible endpoint that
/// accepts `image_url` content parts.
#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAIClient {
    pub fn new(client: Client, api_key: String, base_url: String, model: String) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    fn build_request(&self, prompt: &str, image: &ImagePayload) -> OpenAIRequest {
        OpenAIRequest {
            model: self.model.clone(),
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: json!([
                    {
                        "type": "text",
                        "text": prompt
                    },
                    {
                        "type": "image_url",
                        "image_url": {
                            "url": image.data_uri()
                        }
                    }
                ]),
            }],
            max_tokens: 2048,
            temperature: 0.4,
            stream: false,
        }
    }

    pub async fn generate_with_image(&self, prompt: &str, image: &ImagePayload) -> Result<String> {
        let request = self.build_request(prompt, image);

        info!("📤 Sending homework image to OpenAI model: {} ({} bytes)", self.model, image.decoded_len);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("❌ OpenAI API error {}: {}", status, error_text);
            return Err(anyhow::anyhow!("OpenAI API error {}: {}", status, error_text));
        }

        let body = response.text().await?;
        if looks_like_html(&body) {
            return Err(anyhow::anyhow!("Received HTML response instead of JSON"));
        }

        let openai_response: OpenAIResponse = serde_json::from_str(&body)?;
        if let Some(usage) = &openai_response.usage {
            info!(
                "Token usage - Prompt: {}, Completion: {}, Total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        first_choice_text(openai_response)
    }
}

fn first_choice_text(response: OpenAIResponse) -> Result<String> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("No response choices from OpenAI"))?;

    match choice.message.content {
        Some(content) if !content.trim().is_empty() => {
            info!("✅ Received reply from OpenAI: {} characters", content.len());
            Ok(content)
        }
        _ => Err(anyhow::anyhow!(
            "Empty OpenAI reply (finish reason: {})",
            choice.finish_reason.as_deref().unwrap_or("unknown")
        )),
    }
}

impl VisionModel for OpenAIClient {
    fn describe(&self) -> String {
        format!("openai/{}", self.model)
    }

    fn analyze_image<'a>(&'a self, prompt: &'a str, image: &'a ImagePayload) -> BoxFuture<'a, Result<String>> {
        Box::pin(self.generate_with_image(prompt, image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OpenAIClient {
        OpenAIClient::new(
            Client::new(),
            "sk-test".to_string(),
            "https://api.openai.com/v1/".to_string(),
            "gpt-4o-mini".to_string(),
        )
    }

    #[test]
    fn image_travels_as_data_uri_content_part() {
        let image = ImagePayload {
            base64: "QUJD".to_string(),
            mime_type: "image/jpeg".to_string(),
            decoded_len: 3,
        };
        let value = serde_json::to_value(client().build_request("grade this", &image)).unwrap();
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["messages"][0]["content"][0]["text"], "grade this");
        assert_eq!(
            value["messages"][0]["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,QUJD"
        );
        assert_eq!(value["stream"], false);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        assert_eq!(client().base_url, "https://api.openai.com/v1");
        assert_eq!(client().describe(), "openai/gpt-4o-mini");
    }

    #[test]
    fn empty_choice_is_an_error() {
        let response: OpenAIResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":null},"finish_reason":"length"}]}"#,
        )
        .unwrap();
        let err = first_choice_text(response).unwrap_err();
        assert!(err.to_string().contains("length"));

        let response: OpenAIResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"hi"}}]}"#).unwrap();
        assert_eq!(first_choice_text(response).unwrap(), "hi");
    }
}
