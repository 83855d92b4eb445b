use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::response::Redirect;
use chrono::{Duration, Utc};
use http::header::COOKIE;
use http::request::Parts;
use http::HeaderMap;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: i64,
    exp: usize,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

/// Signs and checks the session tokens carried in the `session` cookie.
#[derive(Clone)]
pub struct SessionKeys {
    keys: Arc<Keys>,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl_hours: i64) -> Self {
        Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
                ttl: Duration::try_hours(ttl_hours).unwrap_or(Duration::MAX),
            }),
        }
    }

    pub fn issue(&self, user_id: i64) -> Result<String, AppError> {
        let expires = Utc::now()
            .checked_add_signed(self.keys.ttl)
            .ok_or_else(|| AppError::Internal("session lifetime out of range".into()))?;
        let claims = Claims {
            sub: user_id,
            exp: expires.timestamp().max(0) as usize,
        };
        encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|e| AppError::Internal(format!("failed to sign session: {}", e)))
    }

    /// User id carried by a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Option<i64> {
        decode::<Claims>(token, &self.keys.decoding, &Validation::default())
            .ok()
            .map(|data| data.claims.sub)
    }

    pub fn login_cookie(&self, token: &str) -> String {
        format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            SESSION_COOKIE,
            token,
            self.keys.ttl.num_seconds()
        )
    }
}

pub fn logout_cookie() -> String {
    format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE)
}

fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value)
}

/// The logged-in user for this request. Requests without a valid session are
/// redirected to the login form.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    pub id: i64,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        read_cookie(&parts.headers, SESSION_COOKIE)
            .and_then(|token| state.sessions.verify(token))
            .map(|id| CurrentUser { id })
            .ok_or_else(|| Redirect::to("/login"))
    }
}
