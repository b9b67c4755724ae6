use crate::{error::AppError, AppState};
use axum::{extract::State, Json};
use core_types::ExecutiveCompensationResult;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// # GET /api/v1/companies/executives/compensation
/// Executives on the configured exchange whose compensation is at least the configured
/// multiple (10% above by default) of their industry's average.
pub async fn get_executives_compensation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ExecutiveCompensationResult>>, AppError> {
    let cancel = CancellationToken::new();
    // axum drops this future when the client disconnects; the guard then cancels the run.
    let _guard = cancel.clone().drop_guard();

    let results = state.engine.run(&state.exchange, &cancel).await?;
    Ok(Json(results))
}
