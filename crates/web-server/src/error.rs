use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use engine::{EngineError, ErrorKind};
use serde_json::json;
use thiserror::Error;

/// Non-standard status used by proxies for "client closed request".
const CLIENT_CLOSED_REQUEST: u16 = 499;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let AppError::Engine(engine_err) = self;

        let (status, error_message) = match engine_err.kind() {
            ErrorKind::NoListingsFound => {
                // Zero listings for an exchange means the backend is unhealthy, not that the answer is empty.
                tracing::error!(error = %engine_err, "No listings found.");
                (StatusCode::INTERNAL_SERVER_ERROR, engine_err.to_string())
            }
            ErrorKind::ProviderFailure => {
                tracing::error!(error = ?engine_err, "Company info service failure.");
                (
                    StatusCode::BAD_GATEWAY,
                    "The company info service returned an error".to_string(),
                )
            }
            ErrorKind::ContractViolation => {
                tracing::error!(error = %engine_err, "Company info service returned inconsistent data.");
                (
                    StatusCode::BAD_GATEWAY,
                    "The company info service returned inconsistent data".to_string(),
                )
            }
            ErrorKind::Cancelled => {
                tracing::info!("Request cancelled before completion.");
                let status = StatusCode::from_u16(CLIENT_CLOSED_REQUEST)
                    .unwrap_or(StatusCode::BAD_REQUEST);
                return status.into_response();
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
