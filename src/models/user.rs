// src/models/user.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A registered account as cached in the local registry.
///
/// The registry snapshot is the authority for login/registration checks;
/// the remote `users` collection only mirrors the public profile fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,

    /// Display name, unique within the registry (case-insensitive).
    pub name: String,

    /// Argon2 password hash. Lives only in the local registry snapshot;
    /// it is never part of the remote profile record.
    pub password_hash: String,

    pub points: i64,

    /// Always `points / 100 + 1`.
    pub level: i64,

    /// Avatar URL, seeded deterministically from the name.
    pub avatar: String,
}

/// Document shape of the remote `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteProfile {
    pub id: String,
    pub name: String,
    pub points: i64,
    pub level: i64,
}

impl User {
    pub fn profile(&self) -> RemoteProfile {
        RemoteProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            points: self.points,
            level: self.level,
        }
    }
}

/// DTO for registration.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(
        min = 2,
        max = 50,
        message = "Name length must be between 2 and 50 characters."
    ))]
    pub name: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
}

/// DTO for login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}
