use std::sync::Arc;
use std::time::Instant;

use log::{error, info, warn};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use super::extract::{extract_json, Extraction};
use super::fallback::fallback_result;
use super::image::prepare_image;
use super::models::{GradeHomeworkRequest, GradingOutcome, GradingResult};
use super::prompts::grading_prompt;
use super::{GradingError, Result};
use crate::providers::{build_vision_model, VisionModel};
use crate::settings::Settings;

/// Sections every grading document must carry.
pub const REQUIRED_SECTIONS: [&str; 3] = ["parent_analysis", "child_encouragement", "scores"];

/// Bridges an uploaded homework photo to the configured vision model.
///
/// Holds no per-request state; one instance is shared by every request.
pub struct GradingGateway {
    model: Option<Arc<dyn VisionModel>>,
    /// Why `model` is absent, reported on every request.
    config_error: Option<String>,
    max_image_bytes: usize,
}

impl GradingGateway {
    /// Build the gateway from settings. A missing credential does not fail
    /// here; each grading request reports it instead.
    pub fn from_settings(settings: &Settings) -> Self {
        match build_vision_model(settings) {
            Ok(model) => {
                info!("✅ Grading provider ready: {}", model.describe());
                Self::with_model(model, settings.max_image_bytes)
            }
            Err(e) => {
                warn!("❌ Grading provider unavailable: {}", e);
                Self {
                    model: None,
                    config_error: Some(config_detail(e)),
                    max_image_bytes: settings.max_image_bytes,
                }
            }
        }
    }

    pub fn with_model(model: Arc<dyn VisionModel>, max_image_bytes: usize) -> Self {
        Self {
            model: Some(model),
            config_error: None,
            max_image_bytes,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    /// Grade one homework photo.
    ///
    /// Order matters: configuration is checked before the image is touched,
    /// and the image is validated before any upstream call.
    pub async fn grade(&self, request: &GradeHomeworkRequest) -> Result<GradingOutcome> {
        let request_id = Uuid::new_v4();

        let model = self.model.as_ref().ok_or_else(|| {
            GradingError::Configuration(
                self.config_error
                    .clone()
                    .unwrap_or_else(|| "No AI provider configured".to_string()),
            )
        })?;

        let raw_image = match request.image_data() {
            Some(raw) if request.validate().is_ok() => raw,
            _ => {
                info!("[{}] Rejected grading request without an image", request_id);
                return Err(GradingError::InvalidRequest("No image provided".to_string()));
            }
        };

        let image = prepare_image(raw_image, self.max_image_bytes)?;
        info!(
            "[{}] Processing homework analysis request: file={} type={} size={} via {}",
            request_id,
            request.filename.as_deref().unwrap_or("<unnamed>"),
            image.mime_type,
            image.decoded_len,
            model.describe()
        );

        let started = Instant::now();
        let reply = model
            .analyze_image(grading_prompt(), &image)
            .await
            .map_err(|e| {
                error!("[{}] ❌ Upstream model call failed: {}", request_id, e);
                GradingError::Upstream(e.to_string())
            })?;
        info!(
            "[{}] Model replied in {:?} with {} characters",
            request_id,
            started.elapsed(),
            reply.len()
        );

        let outcome = interpret_reply(&reply);
        match &outcome {
            Ok(GradingOutcome::Authoritative { result, .. }) => {
                if !result.is_score_consistent() {
                    warn!(
                        "[{}] total_score {} does not equal component sum {}",
                        request_id,
                        result.total_score,
                        result.scores.component_sum()
                    );
                }
                info!("[{}] ✅ Homework analysis completed, total score {}", request_id, result.total_score);
            }
            Ok(GradingOutcome::Degraded { reason, .. }) => {
                warn!("[{}] Returning fallback grading result: {}", request_id, reason);
            }
            Err(e) => error!("[{}] ❌ {}", request_id, e),
        }
        outcome
    }
}

fn config_detail(error: GradingError) -> String {
    match error {
        GradingError::Configuration(detail) => detail,
        other => other.to_string(),
    }
}

/// Turn a model's free-text reply into a grading outcome.
///
/// No JSON, or unparseable JSON, degrades to the canned fallback. JSON that
/// parses but lacks a required section (or has a section of the wrong shape)
/// is a contract violation.
pub fn interpret_reply(reply: &str) -> Result<GradingOutcome> {
    let (tier, value) = match extract_json(reply) {
        Extraction::Parsed { tier, value } => (tier, value),
        Extraction::Malformed { tier, error } => {
            return Ok(GradingOutcome::Degraded {
                result: fallback_result(),
                reason: format!("JSON from {} failed to parse: {}", tier.as_str(), error),
            });
        }
        Extraction::NotFound => {
            return Ok(GradingOutcome::Degraded {
                result: fallback_result(),
                reason: "No JSON document found in model reply".to_string(),
            });
        }
    };

    let missing = missing_sections(&value);
    if !missing.is_empty() {
        return Err(GradingError::ContractViolation(format!(
            "Invalid response structure from AI model: missing {}",
            missing.join(", ")
        )));
    }

    // The typed parse only checks the shape; the client gets `value` untouched.
    let result = GradingResult::deserialize(&value).map_err(|e| {
        GradingError::ContractViolation(format!("Malformed grading document ({}): {}", tier.as_str(), e))
    })?;

    Ok(GradingOutcome::Authoritative {
        result,
        document: value,
    })
}

fn missing_sections(value: &Value) -> Vec<&'static str> {
    REQUIRED_SECTIONS
        .iter()
        .copied()
        .filter(|section| value.get(section).map_or(true, Value::is_null))
        .collect()
}
