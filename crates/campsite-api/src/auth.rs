use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::{info, warn};
use uuid::Uuid;

use campsite_db::Database;
use campsite_types::api::{Claims, LoginRequest, LoginResponse};

use crate::error::{ApiError, blocking};

/// Admin sessions last one working day.
const TOKEN_TTL_HOURS: i64 = 12;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    /// Public origin used in robots.txt and the sitemap, without trailing slash.
    pub site_url: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let username = req.username.clone();
    let admin = blocking(move || Ok(db.db.get_admin_by_username(&username)?))
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let parsed_hash = PasswordHash::new(&admin.password)
        .map_err(|e| anyhow!("Stored hash for '{}' is unreadable: {}", admin.username, e))?;

    if Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        warn!("Failed admin login for '{}'", admin.username);
        return Err(ApiError::Unauthorized);
    }

    let user_id: Uuid = admin
        .id
        .parse()
        .map_err(|e| anyhow!("Corrupt admin id '{}': {}", admin.id, e))?;

    let token = create_token(&state.jwt_secret, user_id, &admin.username)?;

    Ok(Json(LoginResponse {
        user_id,
        username: admin.username,
        token,
    }))
}

pub fn create_token(secret: &str, user_id: Uuid, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("Password hashing failed: {}", e))?
        .to_string();
    Ok(hash)
}

/// Create the admin account if it does not exist yet. Returns whether a new
/// account was created; an existing password is never overwritten.
pub fn ensure_admin(db: &Database, username: &str, password: &str) -> anyhow::Result<bool> {
    if db.get_admin_by_username(username)?.is_some() {
        info!("Admin '{}' already exists", username);
        return Ok(false);
    }

    let hash = hash_password(password)?;
    db.create_admin(&Uuid::new_v4().to_string(), username, &hash, chrono::Utc::now())?;
    info!("Admin '{}' created", username);
    Ok(true)
}
