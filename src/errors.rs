use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use thiserror::Error;

use crate::external::price_provider::PriceProviderError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Invalid symbol")]
    InvalidSymbol,
    #[error("Shares must be a positive whole number")]
    InvalidShares,
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Not enough shares")]
    InsufficientShares,
    #[error("{0}")]
    AuthFailure(String),
    #[error("Not found")]
    NotFound,
    #[error("Price lookup failed: {0}")]
    External(String),
    #[error("Database error: {0}")]
    Db(sqlx::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_)
            | AppError::InvalidSymbol
            | AppError::InvalidShares
            | AppError::InsufficientFunds
            | AppError::InsufficientShares => StatusCode::BAD_REQUEST,
            AppError::AuthFailure(_) => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::External(_) => StatusCode::BAD_GATEWAY,
            AppError::Db(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        match self {
            // store and hashing details stay in the logs
            AppError::Db(_) | AppError::Internal(_) => {
                (status, "Internal server error").into_response()
            }
            other => (status, other.to_string()).into_response(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        AppError::Db(value)
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        AppError::InvalidInput(rejection.body_text())
    }
}

impl From<PriceProviderError> for AppError {
    fn from(value: PriceProviderError) -> Self {
        AppError::External(value.to_string())
    }
}
