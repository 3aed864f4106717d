// src/handlers/points.rs

use crate::{
    config::{LEADERBOARD_SIZE, POINTS_PER_LEVEL},
    error::AppError,
    models::user::{RemoteProfile, User},
    state::AppContext,
};

/// Derived level for a point total: one level per 100 points, starting at 1.
pub fn level_for(points: i64) -> i64 {
    points / POINTS_PER_LEVEL + 1
}

/// Awards points to the signed-in user.
///
/// The session user and registry entry are updated and persisted first
/// (optimistic, so the UI reflects the award immediately), then the remote
/// profile receives an atomic increment plus the recomputed level. A remote
/// failure is returned to the caller; the local update stands either way,
/// so the mirrored value may transiently diverge from the authoritative
/// one until the next successful sync.
pub async fn award_points(ctx: &AppContext, delta: i64) -> Result<User, AppError> {
    if delta < 0 {
        return Err(AppError::BadRequest("point awards are non-negative".to_string()));
    }

    let mut user = ctx.require_user()?;
    user.points += delta;
    user.level = level_for(user.points);
    ctx.update_user(&user)?;

    ctx.profiles
        .add_points(&user.id, delta, user.level)
        .await
        .map_err(|e| {
            tracing::error!("point award for {} not persisted remotely: {}", user.name, e);
            e
        })?;

    Ok(user)
}

/// Top profiles by points, for the rankings view.
pub async fn leaderboard(ctx: &AppContext) -> Result<Vec<RemoteProfile>, AppError> {
    ctx.profiles.top_profiles(LEADERBOARD_SIZE).await
}
