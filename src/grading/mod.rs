pub mod extract;
pub mod fallback;
pub mod gateway;
pub mod image;
pub mod models;
pub mod prompts;

pub use gateway::GradingGateway;
pub use models::{GradeHomeworkRequest, GradingOutcome, GradingResult, ScoreBand, Scores};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GradingError {
    /// Missing or malformed upload. Reported as 400.
    #[error("{0}")]
    InvalidRequest(String),
    /// Missing provider credentials or an unknown provider.
    #[error("Server configuration error: {0}")]
    Configuration(String),
    /// Transport or HTTP failure talking to the model provider.
    #[error("Upstream model request failed: {0}")]
    Upstream(String),
    /// The model answered with JSON that lacks the required sections.
    #[error("Model reply violated the grading contract: {0}")]
    ContractViolation(String),
}

impl GradingError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, GradingError::InvalidRequest(_))
    }

    /// Short message for the `error` field of the HTTP body.
    pub fn public_message(&self) -> String {
        match self {
            GradingError::InvalidRequest(message) => message.clone(),
            GradingError::Configuration(_) => "Server configuration error".to_string(),
            GradingError::Upstream(_) | GradingError::ContractViolation(_) => {
                "Failed to process homework grading".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, GradingError>;
