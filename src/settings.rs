use anyhow::{Context, Result};
use config::{Config, Environment, File};
use log::{info, warn};
use serde::Deserialize;

/// Upload limit enforced by the parent-facing grader page.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Runtime configuration for the server and the grading providers.
///
/// Non-secret keys are layered by the `config` crate: built-in defaults, an
/// optional `dr-owl.{toml,yaml,json}` file, then `DR_OWL_*` environment
/// variables. Provider credentials are looked up separately through
/// [`get_env_var`] so they never end up in a config file.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bind_addr: String,
    pub provider: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub max_image_bytes: usize,
    pub upstream_timeout_secs: u64,
    #[serde(skip)]
    pub gemini_api_key: Option<String>,
    #[serde(skip)]
    pub openai_api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            provider: "gemini".to_string(),
            gemini_model: "gemini-1.5-flash".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            upstream_timeout_secs: 60,
            gemini_api_key: None,
            openai_api_key: None,
        }
    }
}

impl Settings {
    /// Load settings from defaults, optional config file and environment.
    pub fn load() -> Result<Self> {
        let defaults = Settings::default();

        let mut settings: Settings = Config::builder()
            .set_default("bind_addr", defaults.bind_addr)?
            .set_default("provider", defaults.provider)?
            .set_default("gemini_model", defaults.gemini_model)?
            .set_default("gemini_base_url", defaults.gemini_base_url)?
            .set_default("openai_model", defaults.openai_model)?
            .set_default("openai_base_url", defaults.openai_base_url)?
            .set_default("max_image_bytes", defaults.max_image_bytes as u64)?
            .set_default("upstream_timeout_secs", defaults.upstream_timeout_secs)?
            .add_source(File::with_name("dr-owl").required(false))
            .add_source(Environment::with_prefix("DR_OWL").try_parsing(true))
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Invalid configuration values")?;

        settings.gemini_api_key = get_env_var("GEMINI_API_KEY");
        settings.openai_api_key = get_env_var("OPENAI_API_KEY");

        Ok(settings)
    }

    /// Largest accepted HTTP body: base64 inflates by 4/3, plus room for the
    /// data-URI prefix and the JSON envelope.
    pub fn max_body_bytes(&self) -> usize {
        self.max_image_bytes / 3 * 4 + 64 * 1024
    }

    pub fn log_status(&self) {
        info!("🔧 Configuration status:");
        info!("✅ bind_addr: {}", self.bind_addr);
        info!("✅ provider: {}", self.provider);
        info!("✅ max_image_bytes: {}", self.max_image_bytes);
        info!("✅ upstream_timeout_secs: {}", self.upstream_timeout_secs);

        log_key_status("GEMINI_API_KEY", self.gemini_api_key.as_deref());
        log_key_status("OPENAI_API_KEY", self.openai_api_key.as_deref());
    }
}

/// Read an environment variable, loading `.env` first. Empty values count as unset.
pub fn get_env_var(key: &str) -> Option<String> {
    let _ = dotenvy::dotenv();

    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

/// Masked form of a secret suitable for logs.
pub fn key_preview(key: &str) -> String {
    if key.len() > 8 && key.is_ascii() {
        format!("{}...{}", &key[..4], &key[key.len() - 4..])
    } else {
        "***".to_string()
    }
}

fn log_key_status(name: &str, value: Option<&str>) {
    match value {
        Some(key) => info!("✅ {}: {} (length: {})", name, key_preview(key), key.len()),
        None => warn!("❌ {}: Not available", name),
    }
}
