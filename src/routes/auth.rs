use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use http::header::SET_COOKIE;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::{LoginForm, RegisterForm};
use crate::routes::pages;
use crate::services;
use crate::session::logout_cookie;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
        .route("/register", get(register_form).post(register))
}

fn start_session(state: &AppState, user_id: i64) -> Result<Response, AppError> {
    let token = state.sessions.issue(user_id)?;
    let cookie = state.sessions.login_cookie(&token);
    Ok(([(SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

/// Showing the login form forgets any current session.
pub async fn login_form() -> impl IntoResponse {
    ([(SET_COOKIE, logout_cookie())], pages::login())
}

pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Form(form) = form?;
    info!("POST /login - Login attempt for {:?}", form.username);
    let account = services::auth_service::login(&state.pool, form)
        .await
        .map_err(|e| {
            warn!("Login failed: {}", e);
            e
        })?;
    info!("User {} logged in", account.id);
    start_session(&state, account.id)
}

pub async fn logout() -> impl IntoResponse {
    info!("GET /logout - Clearing session");
    ([(SET_COOKIE, logout_cookie())], Redirect::to("/"))
}

pub async fn register_form() -> Html<String> {
    pages::register()
}

pub async fn register(
    State(state): State<AppState>,
    form: Result<Form<RegisterForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Form(form) = form?;
    info!("POST /register - Registering {:?}", form.username);
    let account = services::auth_service::register(&state.pool, form, state.starting_cash)
        .await
        .map_err(|e| {
            warn!("Registration failed: {}", e);
            e
        })?;
    start_session(&state, account.id)
}
