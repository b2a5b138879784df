use crate::errors::SubmissionError;
use crate::models::{SimulationForm, SimulationResponse};
use crate::services::SubmissionService;
use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde_json::json;
use std::any::Any;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Submission workflow (owns the lead store).
    pub submissions: SubmissionService,
}

/// Health check endpoint.
///
/// Returns the service status and version.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-leads-api",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /simulacao
///
/// Receives the simulation form, stores the lead and answers with the
/// business contact number and a pre-filled message.
///
/// # Returns
///
/// * `200` with `SimulationResponse` on success.
/// * `400` `{"success": false, "message": "invalid identifier"}` when the CPF fails validation.
/// * `500` `{"success": false, "message": "internal error"}` for anything else.
pub async fn submit_simulation(
    State(state): State<Arc<AppState>>,
    form: Result<Form<SimulationForm>, FormRejection>,
) -> Result<Json<SimulationResponse>, SubmissionError> {
    let Form(form) = form.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            SubmissionError::Rejected(StatusCode::PAYLOAD_TOO_LARGE)
        } else {
            SubmissionError::UnexpectedFailure(format!("unreadable form body: {}", rejection))
        }
    })?;

    tracing::info!(
        "POST /simulacao - service: {}",
        form.service_type.as_deref().unwrap_or("-")
    );

    let payload = state.submissions.handle_submission(form).await?;

    Ok(Json(SimulationResponse::from(payload)))
}

/// Turns a handler panic into the generic internal-error response.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    SubmissionError::UnexpectedFailure(format!("handler panicked: {}", detail)).into_response()
}

/// Rewrites plain-text middleware rejections (body limit, rate limit, key
/// extraction) into the JSON error body, keeping status and headers such as
/// `retry-after`.
pub async fn json_rejections(response: Response) -> Response {
    let status = response.status();
    if !matches!(
        status,
        StatusCode::PAYLOAD_TOO_LARGE
            | StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
    ) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json {
        return response;
    }

    let (parts, _) = response.into_parts();
    let mut rewritten = SubmissionError::Rejected(status).into_response();
    for (name, value) in parts.headers.iter() {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            rewritten.headers_mut().insert(name.clone(), value.clone());
        }
    }
    rewritten
}
