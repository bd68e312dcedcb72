use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{request::Parts, HeaderMap, StatusCode},
    Json,
};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::sync::Arc;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_email, validate_language, validate_name, validate_phone};
use crate::db::{
    LoginRequest, LoginResponse, RegisterRequest, Session, SetLanguageRequest,
    UpdateProfileRequest, User, UserResponse,
};
use crate::{AppState, DbPool};

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Generate a random session token
fn generate_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    hex::encode(bytes)
}

/// Hash a token for storage
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Validate password strength
/// Returns None if valid, or Some(error_message) if invalid
fn validate_password(password: &str) -> Option<String> {
    if password.len() < 8 {
        return Some("Password must be at least 8 characters".to_string());
    }
    if !password.chars().any(|c| c.is_alphabetic()) {
        return Some("Password must contain at least one letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain at least one digit".to_string());
    }
    None
}

/// Create a session for a user and return the raw bearer token
async fn create_session(pool: &DbPool, user_id: &str, ttl_days: i64) -> Result<String, sqlx::Error> {
    let token = generate_token();
    let token_hash = hash_token(&token);

    let expires_at = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::days(ttl_days))
        .unwrap_or_else(chrono::Utc::now)
        .to_rfc3339();

    let session_id = uuid::Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO sessions (id, user_id, token_hash, expires_at) VALUES (?, ?, ?, ?)")
        .bind(&session_id)
        .bind(user_id)
        .bind(&token_hash)
        .bind(&expires_at)
        .execute(pool)
        .await?;

    Ok(token)
}

/// Register endpoint - creates a customer account and logs it in
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_name(&request.name) {
        errors.add("name", e);
    }
    if let Err(e) = validate_email(&request.email) {
        errors.add("email", e);
    }
    if let Err(e) = validate_phone(&request.phone) {
        errors.add("phone", e);
    }
    if let Some(e) = validate_password(&request.password) {
        errors.add("password", e);
    }
    errors.finish()?;

    let existing: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&request.email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(ApiError::conflict("An account with this email already exists"));
    }

    let id = uuid::Uuid::new_v4().to_string();
    let password_hash = hash_password(&request.password)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

    sqlx::query(
        "INSERT INTO users (id, email, password_hash, name, phone, role) VALUES (?, ?, ?, ?, ?, 'customer')",
    )
    .bind(&id)
    .bind(&request.email)
    .bind(&password_hash)
    .bind(&request.name)
    .bind(&request.phone)
    .execute(&state.db)
    .await?;

    tracing::info!("Registered new customer account: {}", request.email);

    let token = create_session(&state.db, &id, state.config.auth.session_ttl_days).await?;
    let user: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            token,
            user: UserResponse::from(user),
        }),
    ))
}

/// Login endpoint
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(&request.email)
        .fetch_optional(&state.db)
        .await?;

    let user = user.ok_or_else(|| ApiError::unauthorized("Invalid email or password"))?;

    if !verify_password(&request.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = create_session(&state.db, &user.id, state.config.auth.session_ttl_days).await?;

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}

/// Logout endpoint - invalidates the presented session token
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let token =
        extract_token(&headers).ok_or_else(|| ApiError::unauthorized("Authentication required"))?;
    let token_hash = hash_token(&token);

    sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
        .bind(&token_hash)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Current user endpoint
pub async fn me(user: User) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

/// Profile update endpoint
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    user: User,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_name(&request.name) {
        errors.add("name", e);
    }
    if let Err(e) = validate_email(&request.email) {
        errors.add("email", e);
    }
    if let Err(e) = validate_phone(&request.phone) {
        errors.add("phone", e);
    }
    errors.finish()?;

    let now = chrono::Utc::now().to_rfc3339();
    sqlx::query("UPDATE users SET name = ?, email = ?, phone = ?, updated_at = ? WHERE id = ?")
        .bind(&request.name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&now)
        .bind(&user.id)
        .execute(&state.db)
        .await?;

    let updated: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&user.id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(UserResponse::from(updated)))
}

/// Language preference endpoint
pub async fn set_language(
    State(state): State<Arc<AppState>>,
    user: User,
    Json(request): Json<SetLanguageRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if let Err(e) = validate_language(&request.language) {
        return Err(ApiError::validation_field("language", e));
    }

    let now = chrono::Utc::now().to_rfc3339();
    sqlx::query("UPDATE users SET language = ?, updated_at = ? WHERE id = ?")
        .bind(&request.language)
        .bind(&now)
        .bind(&user.id)
        .execute(&state.db)
        .await?;

    let updated: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&user.id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(UserResponse::from(updated)))
}

/// Ensure the configured admin account exists; called once at startup.
pub async fn ensure_admin_user(pool: &DbPool, email: &str, password: &str) -> anyhow::Result<()> {
    let existing: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let id = uuid::Uuid::new_v4().to_string();
    let password_hash = hash_password(password)
        .map_err(|e| anyhow::anyhow!("Failed to hash admin password: {}", e))?;

    sqlx::query(
        "INSERT INTO users (id, email, password_hash, name, role) VALUES (?, ?, ?, 'Administrator', 'admin')",
    )
    .bind(&id)
    .bind(email)
    .bind(&password_hash)
    .execute(pool)
    .await?;

    tracing::info!("Created default admin user: {}", email);
    Ok(())
}

/// Require the admin role, for back-office handlers.
pub fn require_admin(user: &User) -> Result<(), ApiError> {
    if !user.is_admin() {
        return Err(ApiError::forbidden("Administrator access required"));
    }
    Ok(())
}

/// Extract the bearer token from request headers
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get("Authorization").and_then(|h| h.to_str().ok())?;
    auth_header.strip_prefix("Bearer ").map(|t| t.to_string())
}

/// Get the current user from a token
pub async fn get_current_user(pool: &DbPool, token: &str) -> Result<User, ApiError> {
    let token_hash = hash_token(token);
    let session: Option<Session> = sqlx::query_as(
        "SELECT * FROM sessions WHERE token_hash = ? AND expires_at > datetime('now')",
    )
    .bind(&token_hash)
    .fetch_optional(pool)
    .await?;

    let session = session.ok_or_else(|| ApiError::unauthorized("Session expired or invalid"))?;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&session.user_id)
        .fetch_optional(pool)
        .await?;

    user.ok_or_else(|| ApiError::unauthorized("Session expired or invalid"))
}

/// Extractor for getting the current authenticated user from a request
#[async_trait]
impl FromRequestParts<Arc<AppState>> for User {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;
        get_current_user(&state.db, &token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("villa1234").unwrap();
        assert!(verify_password("villa1234", &hash));
        assert!(!verify_password("villa12345", &hash));
        assert!(!verify_password("villa1234", "not-a-hash"));
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("sunset55").is_none());
        assert!(validate_password("short1").is_some());
        assert!(validate_password("onlyletters").is_some());
        assert!(validate_password("12345678").is_some());
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_hash_token_is_stable() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
    }

    #[tokio::test]
    async fn test_ensure_admin_user_is_idempotent() {
        let pool = crate::db::test_pool().await;

        ensure_admin_user(&pool, "admin@example.com", "admin123pw").await.unwrap();
        ensure_admin_user(&pool, "admin@example.com", "different-pw1").await.unwrap();

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = 'admin'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1);

        let admin: User = sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind("admin@example.com")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(admin.is_admin());
        // First password wins; the second call must not rotate it
        assert!(verify_password("admin123pw", &admin.password_hash));
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let pool = crate::db::test_pool().await;
        ensure_admin_user(&pool, "admin@example.com", "admin123pw").await.unwrap();

        let admin: User = sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind("admin@example.com")
            .fetch_one(&pool)
            .await
            .unwrap();

        let token = create_session(&pool, &admin.id, 7).await.unwrap();
        let current = get_current_user(&pool, &token).await.unwrap();
        assert_eq!(current.id, admin.id);

        assert!(get_current_user(&pool, "bogus-token").await.is_err());
    }
}
