// src/handlers/auth.rs

use validator::Validate;

use crate::{
    config::REGISTRATION_POINTS,
    error::AppError,
    models::user::{LoginRequest, RegisterRequest, User},
    state::AppContext,
    utils::hash::{hash_password, verify_password},
};

/// Registers a new account against the local registry.
///
/// Hashes the password using Argon2 before storing it. A case-insensitive
/// name collision is a conflict; a fresh account starts with 100 points at
/// level 1 and is signed in immediately. Registration also seeds the
/// remote profile record; if that write fails the local account stands and
/// the failure is logged.
pub async fn register(ctx: &AppContext, payload: RegisterRequest) -> Result<User, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let name = payload.name.trim().to_string();

    let duplicate = ctx
        .registry()
        .iter()
        .any(|u| u.name.to_lowercase() == name.to_lowercase());
    if duplicate {
        return Err(AppError::Conflict(format!(
            "Name '{}' is already registered",
            name
        )));
    }

    let password_hash = hash_password(&payload.password)?;

    let user = User {
        id: format!("user_{}", uuid::Uuid::new_v4()),
        name: name.clone(),
        password_hash,
        points: REGISTRATION_POINTS,
        level: 1,
        avatar: format!("https://api.dicebear.com/7.x/avataaars/svg?seed={}", name),
    };

    ctx.insert_user(user.clone())?;
    ctx.set_session(Some(user.clone()))?;

    if let Err(e) = ctx.profiles.create_profile(&user.profile()).await {
        tracing::warn!("failed to seed remote profile for {}: {}", user.name, e);
    }

    tracing::info!("registered {}", user.name);
    Ok(user)
}

/// Signs a user in against the cached registry.
///
/// The name matches case-insensitively; the password must verify against
/// the stored hash. Any mismatch is the same auth error, so login does not
/// leak which half was wrong.
pub async fn login(ctx: &AppContext, payload: LoginRequest) -> Result<User, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = ctx
        .registry()
        .into_iter()
        .find(|u| u.name.to_lowercase() == payload.name.trim().to_lowercase())
        .ok_or_else(|| AppError::AuthError("Invalid credentials".to_string()))?;

    let is_valid = verify_password(&payload.password, &user.password_hash)?;
    if !is_valid {
        return Err(AppError::AuthError("Invalid credentials".to_string()));
    }

    ctx.set_session(Some(user.clone()))?;
    Ok(user)
}

/// Clears the session and leaves admin mode.
pub fn logout(ctx: &AppContext) -> Result<(), AppError> {
    ctx.set_admin(false);
    ctx.set_session(None)
}

/// Unlocks teacher (admin) mode with the configured access key.
pub fn admin_unlock(ctx: &AppContext, access_key: &str) -> Result<(), AppError> {
    ctx.require_user()?;

    let expected = ctx
        .config
        .admin_access_key
        .as_deref()
        .ok_or_else(|| AppError::AuthError("Admin access is not configured".to_string()))?;

    if access_key != expected {
        return Err(AppError::AuthError("Invalid access key".to_string()));
    }

    ctx.set_admin(true);
    Ok(())
}

/// Leaves admin mode without touching the session.
pub fn admin_logout(ctx: &AppContext) {
    ctx.set_admin(false);
}
