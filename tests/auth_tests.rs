// tests/auth_tests.rs

mod common;

use common::{register_user, reopen, spawn_app};
use mkway::{
    error::AppError,
    handlers::auth,
    models::user::{LoginRequest, RegisterRequest},
    utils::hash::verify_password,
};

#[tokio::test]
async fn register_works() {
    // Arrange
    let app = spawn_app();

    // Act
    let user = register_user(&app.ctx, "Alice").await;

    // Assert
    assert_eq!(user.points, 100);
    assert_eq!(user.level, 1);
    assert_eq!(app.ctx.current_user().unwrap().id, user.id);

    // The remote profile is seeded with the same values as the local user.
    let profiles = app.ctx.profiles.top_profiles(5).await.unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].points, 100);
    assert_eq!(profiles[0].level, 1);
}

#[tokio::test]
async fn register_fails_validation() {
    // Arrange
    let app = spawn_app();

    // Act: password below the minimum length
    let result = auth::register(
        &app.ctx,
        RegisterRequest {
            name: "Bob".to_string(),
            password: "abc".to_string(),
        },
    )
    .await;

    // Assert
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn register_rejects_case_insensitive_duplicate() {
    let app = spawn_app();
    register_user(&app.ctx, "Alice").await;

    let result = auth::register(
        &app.ctx,
        RegisterRequest {
            name: "aLiCe".to_string(),
            password: "password456".to_string(),
        },
    )
    .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn password_is_stored_hashed() {
    let app = spawn_app();

    let user = register_user(&app.ctx, "Alice").await;

    assert_ne!(user.password_hash, "password123");
    assert!(verify_password("password123", &user.password_hash).unwrap());
    assert!(!verify_password("password124", &user.password_hash).unwrap());
}

#[tokio::test]
async fn login_round_trip() {
    let app = spawn_app();
    let registered = register_user(&app.ctx, "Alice").await;
    auth::logout(&app.ctx).unwrap();
    assert!(app.ctx.current_user().is_none());

    // Exact credentials return the stored user unchanged.
    let user = auth::login(
        &app.ctx,
        LoginRequest {
            name: "alice".to_string(),
            password: "password123".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(user, registered);
    assert_eq!(app.ctx.current_user().unwrap().id, registered.id);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = spawn_app();
    register_user(&app.ctx, "Alice").await;
    auth::logout(&app.ctx).unwrap();

    let wrong_password = auth::login(
        &app.ctx,
        LoginRequest {
            name: "Alice".to_string(),
            password: "password124".to_string(),
        },
    )
    .await;
    assert!(matches!(wrong_password, Err(AppError::AuthError(_))));

    let unknown_name = auth::login(
        &app.ctx,
        LoginRequest {
            name: "Mallory".to_string(),
            password: "password123".to_string(),
        },
    )
    .await;
    assert!(matches!(unknown_name, Err(AppError::AuthError(_))));
}

#[tokio::test]
async fn snapshots_survive_reopen() {
    // Arrange: register and keep the session signed in.
    let app = spawn_app();
    let user = register_user(&app.ctx, "Alice").await;

    // Act: reopen on the same data directory, like an app restart.
    let reopened = reopen(&app);

    // Assert: registry and session snapshots were restored from disk.
    let registry = reopened.ctx.registry();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry[0], user);
    assert_eq!(reopened.ctx.current_user().unwrap(), user);
}

#[tokio::test]
async fn logout_clears_session_snapshot() {
    let app = spawn_app();
    register_user(&app.ctx, "Alice").await;
    auth::logout(&app.ctx).unwrap();

    let reopened = reopen(&app);
    assert!(reopened.ctx.current_user().is_none());
    // The registry still knows the account for the next login.
    assert_eq!(reopened.ctx.registry().len(), 1);
}

#[tokio::test]
async fn admin_unlock_checks_the_configured_key() {
    let app = spawn_app();
    register_user(&app.ctx, "Teacher").await;

    assert!(matches!(
        auth::admin_unlock(&app.ctx, "wrong"),
        Err(AppError::AuthError(_))
    ));
    assert!(!app.ctx.is_admin());

    auth::admin_unlock(&app.ctx, "staff-room").unwrap();
    assert!(app.ctx.is_admin());

    auth::admin_logout(&app.ctx);
    assert!(!app.ctx.is_admin());
}
