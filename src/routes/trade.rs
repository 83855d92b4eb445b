use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::{Form, Router};
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::TradeForm;
use crate::routes::pages;
use crate::services;
use crate::session::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/buy", get(buy_form).post(buy))
        .route("/sell", get(sell_form).post(sell))
}

fn log_failure(action: &str, user_id: i64, e: &AppError) {
    match e {
        AppError::Db(_) | AppError::Internal(_) | AppError::External(_) => {
            error!("{} failed for user {}: {}", action, user_id, e)
        }
        _ => warn!("{} rejected for user {}: {}", action, user_id, e),
    }
}

pub async fn buy_form(_user: CurrentUser) -> Html<String> {
    pages::buy()
}

pub async fn buy(
    State(state): State<AppState>,
    user: CurrentUser,
    form: Result<Form<TradeForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form?;
    info!("POST /buy - User {} buying {:?}", user.id, form.symbol);
    services::trade_service::buy(
        &state.pool,
        state.price_provider.as_ref(),
        &state.account_locks,
        user.id,
        form,
    )
    .await
    .map_err(|e| {
        log_failure("Buy", user.id, &e);
        e
    })?;
    Ok(Redirect::to("/"))
}

pub async fn sell_form(_user: CurrentUser) -> Html<String> {
    pages::sell()
}

pub async fn sell(
    State(state): State<AppState>,
    user: CurrentUser,
    form: Result<Form<TradeForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form?;
    info!("POST /sell - User {} selling {:?}", user.id, form.symbol);
    services::trade_service::sell(
        &state.pool,
        state.price_provider.as_ref(),
        &state.account_locks,
        user.id,
        form,
    )
    .await
    .map_err(|e| {
        log_failure("Sell", user.id, &e);
        e
    })?;
    Ok(Redirect::to("/"))
}
