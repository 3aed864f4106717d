// src/handlers/feed.rs

use validator::Validate;

use crate::{
    ai::TUTOR_FALLBACK_ANSWER,
    config::{AI_QUESTION_POINTS, PUBLIC_POST_POINTS, TEACHER_QUESTION_POINTS},
    error::AppError,
    handlers::{notifications, points},
    models::{
        notification::NotificationKind,
        post::{AskQuestionRequest, Post, PublicPostRequest, Target},
    },
    state::AppContext,
    utils::{text::clean, time::now_ms},
};

/// Public feed: everything not private, newest first.
pub fn public_feed(posts: &[Post]) -> Vec<Post> {
    let mut feed: Vec<Post> = posts.iter().filter(|p| !p.is_private).cloned().collect();
    feed.sort_by_key(|p| std::cmp::Reverse(p.timestamp));
    feed
}

/// One student's private thread with the AI tutor or the teacher,
/// oldest first (chat order).
pub fn private_thread(posts: &[Post], user_id: &str, target: Target) -> Vec<Post> {
    let mut thread: Vec<Post> = posts
        .iter()
        .filter(|p| p.is_private && p.student_id == user_id && p.target == target)
        .cloned()
        .collect();
    thread.sort_by_key(|p| p.timestamp);
    thread
}

/// Submits a private question.
///
/// For the AI target the answer is fetched inline before the record is
/// written, so the question and its answer land in one document; a tutor
/// failure becomes the fallback answer string rather than losing the
/// question. Awards 5 (AI) or 10 (teacher) points; an award failure is
/// logged and the created post is still returned.
pub async fn submit_question(
    ctx: &AppContext,
    payload: AskQuestionRequest,
) -> Result<Post, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = ctx.require_user()?;
    let text = clean(payload.text.trim());

    let answer = match payload.target {
        Target::Gemini => {
            let answer = match ctx.tutor.ask(&text, payload.image.as_deref()).await {
                Ok(answer) => clean(&answer),
                Err(e) => {
                    tracing::error!("tutor request failed: {}", e);
                    TUTOR_FALLBACK_ANSWER.to_string()
                }
            };
            Some(answer)
        }
        Target::Teacher => None,
    };

    let earned = match payload.target {
        Target::Gemini => AI_QUESTION_POINTS,
        Target::Teacher => TEACHER_QUESTION_POINTS,
    };

    let post = Post {
        id: uuid::Uuid::new_v4().to_string(),
        student_id: user.id.clone(),
        student_name: user.name.clone(),
        text,
        image: payload.image,
        target: payload.target,
        timestamp: now_ms(),
        answer,
        points: earned,
        tags: vec!["General".to_string()],
        likes: Vec::new(),
        comments: Vec::new(),
        is_private: true,
        replied_by: None,
        replied_at: None,
    };

    ctx.posts.create_post(&post).await.map_err(|e| {
        tracing::error!("question creation failed: {}", e);
        e
    })?;

    if let Err(e) = points::award_points(ctx, earned).await {
        tracing::error!("points for question not awarded: {}", e);
    }

    Ok(post)
}

/// Publishes a post to the public feed. Awards a flat 20 points; an award
/// failure is logged and the created post is still returned.
pub async fn post_public(ctx: &AppContext, payload: PublicPostRequest) -> Result<Post, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = ctx.require_user()?;

    let post = Post {
        id: uuid::Uuid::new_v4().to_string(),
        student_id: user.id.clone(),
        student_name: user.name.clone(),
        text: clean(payload.text.trim()),
        image: payload.image,
        target: Target::Teacher,
        timestamp: now_ms(),
        answer: None,
        points: PUBLIC_POST_POINTS,
        tags: vec!["Community".to_string()],
        likes: Vec::new(),
        comments: Vec::new(),
        is_private: false,
        replied_by: None,
        replied_at: None,
    };

    ctx.posts.create_post(&post).await.map_err(|e| {
        tracing::error!("public post creation failed: {}", e);
        e
    })?;

    if let Err(e) = points::award_points(ctx, PUBLIC_POST_POINTS).await {
        tracing::error!("points for public post not awarded: {}", e);
    }

    Ok(post)
}

/// Teacher reply to a private question. Teacher mode only.
///
/// The answer field is set exactly once: replying to an already answered
/// question is a conflict. Files an `answer` notification for the student.
pub async fn reply(ctx: &AppContext, post_id: &str, answer: &str) -> Result<(), AppError> {
    if !ctx.is_admin() {
        return Err(AppError::AuthError("Teacher mode required".to_string()));
    }

    let answer = answer.trim();
    if answer.is_empty() {
        return Err(AppError::BadRequest("Reply must not be empty".to_string()));
    }

    let post = ctx
        .find_cached_post(post_id)
        .ok_or_else(|| AppError::NotFound(format!("post {} not found", post_id)))?;

    if post.answer.is_some() {
        return Err(AppError::Conflict("Question is already answered".to_string()));
    }

    let replied_by = ctx
        .current_user()
        .map(|u| u.name)
        .unwrap_or_else(|| "Teacher".to_string());

    ctx.posts
        .set_answer(post_id, &clean(answer), &replied_by, now_ms())
        .await
        .map_err(|e| {
            tracing::error!("reply to {} failed: {}", post_id, e);
            e
        })?;

    notifications::notify_user(
        ctx,
        &post.student_id,
        NotificationKind::Answer,
        &format!("{} answered your question", replied_by),
        Some(post_id.to_string()),
    );

    Ok(())
}
