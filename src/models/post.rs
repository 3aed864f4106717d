use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::comment::Comment;

/// Who a private thread is directed at.
///
/// The wire values are fixed by the `posts` collection: `GEMINI` for the AI
/// tutor, `TEACHER` for a human teacher. Public posts reuse `TEACHER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target {
    #[serde(rename = "GEMINI")]
    Gemini,
    #[serde(rename = "TEACHER")]
    Teacher,
}

/// A record of the `posts` collection: a public feed entry or one message
/// of a private AI/teacher thread, depending on `is_private` and `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,

    pub student_id: String,
    pub student_name: String,

    pub text: String,

    /// Inline image payload (base64 data URL), if attached.
    pub image: Option<String>,

    pub target: Target,

    /// Millisecond epoch.
    pub timestamp: i64,

    /// Absent until the AI or the teacher responds; set exactly once.
    pub answer: Option<String>,

    /// Points the author earned for this record.
    pub points: i64,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Ids of users who liked this post.
    #[serde(default)]
    pub likes: Vec<String>,

    #[serde(default)]
    pub comments: Vec<Comment>,

    pub is_private: bool,

    /// Name of the teacher who replied, for teacher threads.
    #[serde(default)]
    pub replied_by: Option<String>,

    /// Millisecond epoch of the teacher reply.
    #[serde(default)]
    pub replied_at: Option<i64>,
}

/// DTO for a private question to the AI tutor or the teacher.
#[derive(Debug, Deserialize, Validate)]
pub struct AskQuestionRequest {
    #[validate(length(
        min = 1,
        max = 2000,
        message = "Question must be between 1 and 2000 characters"
    ))]
    pub text: String,

    /// Optional inline image (base64 data URL).
    pub image: Option<String>,

    pub target: Target,
}

/// DTO for a public feed post.
#[derive(Debug, Deserialize, Validate)]
pub struct PublicPostRequest {
    #[validate(length(
        min = 1,
        max = 2000,
        message = "Post must be between 1 and 2000 characters"
    ))]
    pub text: String,

    pub image: Option<String>,
}
