use serde::{Deserialize, Serialize};
use validator::Validate;

/// A comment attached to a post. Immutable after creation; belongs to
/// exactly one post and is stored inline on the post document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub text: String,
    /// Millisecond epoch.
    pub timestamp: i64,
}

/// DTO for creating a new comment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(
        min = 1,
        max = 1000,
        message = "Comment must be between 1 and 1000 characters"
    ))]
    pub text: String,
}
