use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use crate::db;
use crate::errors::AppError;
use crate::models::{Account, LoginForm, RegisterForm};

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            AppError::Internal(e.to_string())
        })
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.is_empty())
}

pub async fn register(
    pool: &SqlitePool,
    form: RegisterForm,
    starting_cash: i64,
) -> Result<Account, AppError> {
    let (Some(username), Some(password), Some(confirmation)) = (
        non_empty(form.username),
        non_empty(form.password),
        non_empty(form.confirmation),
    ) else {
        return Err(AppError::InvalidInput("Please fill in all fields".into()));
    };

    if password != confirmation {
        return Err(AppError::InvalidInput("Passwords do not match".into()));
    }

    if db::account_queries::username_taken(pool, &username).await? {
        return Err(AppError::AuthFailure("Username already taken".into()));
    }

    let hash = hash_password(&password)?;

    match db::account_queries::create(pool, &username, &hash, starting_cash).await {
        Ok(account) => {
            info!("Registered user {} (id {})", account.username, account.id);
            Ok(account)
        }
        // lost a race with a concurrent registration of the same name
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            warn!("Username {} taken during registration", username);
            Err(AppError::AuthFailure("Username already taken".into()))
        }
        Err(e) => {
            error!("Failed to create user {}: {}", username, e);
            Err(AppError::Db(e))
        }
    }
}

pub async fn login(pool: &SqlitePool, form: LoginForm) -> Result<Account, AppError> {
    let username = non_empty(form.username)
        .ok_or_else(|| AppError::AuthFailure("must provide username".into()))?;
    let password = non_empty(form.password)
        .ok_or_else(|| AppError::AuthFailure("must provide password".into()))?;

    let mut rows = db::account_queries::find_by_username(pool, &username).await?;

    if rows.len() != 1 || !verify_password(&password, &rows[0].hash) {
        return Err(AppError::AuthFailure("invalid username and/or password".into()));
    }

    Ok(rows.remove(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::memory_pool;

    fn register_form(username: &str, password: &str, confirmation: &str) -> RegisterForm {
        RegisterForm {
            username: Some(username.into()),
            password: Some(password.into()),
            confirmation: Some(confirmation.into()),
        }
    }

    fn login_form(username: &str, password: &str) -> LoginForm {
        LoginForm {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    async fn user_count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[test]
    fn hash_is_salted_and_verifies() {
        let a = hash_password("hunter2").unwrap();
        let b = hash_password("hunter2").unwrap();
        assert_ne!(a, b);
        assert!(!a.contains("hunter2"));
        assert!(verify_password("hunter2", &a));
        assert!(!verify_password("hunter3", &a));
        assert!(!verify_password("hunter2", "garbage"));
    }

    #[tokio::test]
    async fn registration_stores_hash_and_starting_cash() {
        let pool = memory_pool().await;
        let account = register(&pool, register_form("alice", "pw", "pw"), 1_000_000)
            .await
            .unwrap();
        assert_eq!(account.cash, 1_000_000);
        assert_ne!(account.hash, "pw");
        assert!(verify_password("pw", &account.hash));
    }

    #[tokio::test]
    async fn duplicate_username_creates_nothing() {
        let pool = memory_pool().await;
        register(&pool, register_form("alice", "pw", "pw"), 1_000_000)
            .await
            .unwrap();

        let err = register(&pool, register_form("alice", "other", "other"), 1_000_000)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthFailure(_)));
        assert_eq!(user_count(&pool).await, 1);
    }

    #[tokio::test]
    async fn mismatched_confirmation_creates_nothing() {
        let pool = memory_pool().await;
        let err = register(&pool, register_form("bob", "pw", "pW"), 1_000_000)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(user_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn empty_fields_are_rejected() {
        let pool = memory_pool().await;
        let form = RegisterForm {
            username: Some("carol".into()),
            password: Some(String::new()),
            confirmation: None,
        };
        assert!(matches!(
            register(&pool, form, 1_000_000).await,
            Err(AppError::InvalidInput(_))
        ));
        assert_eq!(user_count(&pool).await, 0);
    }

    #[tokio::test]
    async fn login_checks_password() {
        let pool = memory_pool().await;
        let created = register(&pool, register_form("alice", "pw", "pw"), 1_000_000)
            .await
            .unwrap();

        let account = login(&pool, login_form("alice", "pw")).await.unwrap();
        assert_eq!(account.id, created.id);

        assert!(matches!(
            login(&pool, login_form("alice", "wrong")).await,
            Err(AppError::AuthFailure(_))
        ));
        assert!(matches!(
            login(&pool, login_form("nobody", "pw")).await,
            Err(AppError::AuthFailure(_))
        ));
        assert!(matches!(
            login(&pool, LoginForm { username: Some("alice".into()), password: None }).await,
            Err(AppError::AuthFailure(_))
        ));
    }
}
