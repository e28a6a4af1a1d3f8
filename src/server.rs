use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{info, warn};
use serde_json::json;

use crate::grading::{GradeHomeworkRequest, GradingError, GradingGateway};

pub const GRADE_HOMEWORK_PATH: &str = "/api/grade-homework";
pub const GRADING_MODE_HEADER: &str = "x-grading-mode";

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<GradingGateway>,
}

impl AppState {
    pub fn new(gateway: GradingGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}

pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route(
            GRADE_HOMEWORK_PATH,
            post(grade_homework).options(grade_homework_preflight),
        )
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

async fn grade_homework(
    State(state): State<AppState>,
    payload: Result<Json<GradeHomeworkRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected grading request body: {}", rejection.body_text());
            let status = match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::BAD_REQUEST,
            };
            return with_cors(
                (
                    status,
                    Json(json!({ "error": "Invalid request body", "details": rejection.body_text() })),
                )
                    .into_response(),
            );
        }
    };

    let response = match state.gateway.grade(&request).await {
        Ok(outcome) => {
            let mode = outcome.mode();
            let mut response = Json(outcome.into_document()).into_response();
            response
                .headers_mut()
                .insert(GRADING_MODE_HEADER, HeaderValue::from_static(mode));
            response
        }
        Err(e) => e.into_response(),
    };
    with_cors(response)
}

/// CORS preflight for the grading route.
async fn grade_homework_preflight() -> impl IntoResponse {
    (StatusCode::OK, cors_headers())
}

async fn health() -> &'static str {
    "ok"
}

fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers
}

fn with_cors(mut response: Response) -> Response {
    response.headers_mut().extend(cors_headers());
    response
}

impl GradingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GradingError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GradingError::Configuration(_)
            | GradingError::Upstream(_)
            | GradingError::ContractViolation(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GradingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = if self.is_client_error() {
            json!({ "error": self.public_message() })
        } else {
            json!({ "error": self.public_message(), "details": self.to_string() })
        };
        info!("Grading request finished with {}: {}", status, self);
        (status, Json(body)).into_response()
    }
}
