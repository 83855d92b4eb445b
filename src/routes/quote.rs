use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Form, Json, Router};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{QuoteForm, QuoteView};
use crate::routes::pages;
use crate::services;
use crate::session::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/quote", get(quote_form).post(quote))
}

pub async fn quote_form(_user: CurrentUser) -> Html<String> {
    pages::quote()
}

pub async fn quote(
    State(state): State<AppState>,
    user: CurrentUser,
    form: Result<Form<QuoteForm>, FormRejection>,
) -> Result<Json<QuoteView>, AppError> {
    let Form(form) = form?;
    info!("POST /quote - User {} quoting {:?}", user.id, form.symbol);
    let view = services::quote_service::quote(state.price_provider.as_ref(), form)
        .await
        .map_err(|e| {
            warn!("Quote failed: {}", e);
            e
        })?;
    Ok(Json(view))
}
