use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{HistoryEntry, PortfolioView};
use crate::services;
use crate::session::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/history", get(history))
}

pub async fn index(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<PortfolioView>, AppError> {
    info!("GET / - Valuing portfolio for user {}", user.id);
    let view = services::portfolio_service::portfolio(
        &state.pool,
        state.price_provider.as_ref(),
        user.id,
    )
    .await
    .map_err(|e| {
        error!("Failed to value portfolio for user {}: {}", user.id, e);
        e
    })?;
    Ok(Json(view))
}

pub async fn history(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    info!("GET /history - Fetching transactions for user {}", user.id);
    let entries = services::portfolio_service::history(&state.pool, user.id)
        .await
        .map_err(|e| {
            error!("Failed to fetch history for user {}: {}", user.id, e);
            e
        })?;
    Ok(Json(entries))
}
