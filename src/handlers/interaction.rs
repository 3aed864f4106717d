// src/handlers/interaction.rs

use validator::Validate;

use crate::{
    error::AppError,
    models::comment::{Comment, CreateCommentRequest},
    state::AppContext,
    utils::{text::clean, time::now_ms},
};

/// Toggle Like on a post.
///
/// The cached mirror decides the direction; the store applies it as an
/// array-union or array-remove, so toggling twice restores the original
/// like set. Returns whether the post is liked after the call.
pub async fn toggle_like(ctx: &AppContext, post_id: &str) -> Result<bool, AppError> {
    let user = ctx.require_user()?;

    let post = ctx
        .find_cached_post(post_id)
        .ok_or_else(|| AppError::NotFound(format!("post {} not found", post_id)))?;

    let is_liked = post.likes.iter().any(|id| *id == user.id);

    if is_liked {
        ctx.posts.remove_like(post_id, &user.id).await?;
    } else {
        ctx.posts.add_like(post_id, &user.id).await?;
    }

    Ok(!is_liked)
}

/// Appends a comment to a post. Comments are immutable once created.
pub async fn add_comment(
    ctx: &AppContext,
    post_id: &str,
    payload: CreateCommentRequest,
) -> Result<Comment, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = ctx.require_user()?;

    if ctx.find_cached_post(post_id).is_none() {
        return Err(AppError::NotFound(format!("post {} not found", post_id)));
    }

    let comment = Comment {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user.id,
        user_name: user.name,
        text: clean(payload.text.trim()),
        timestamp: now_ms(),
    };

    ctx.posts.add_comment(post_id, &comment).await.map_err(|e| {
        tracing::error!("comment on {} failed: {}", post_id, e);
        e
    })?;

    Ok(comment)
}
