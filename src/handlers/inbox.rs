// src/handlers/inbox.rs

use std::collections::HashMap;

use serde::Serialize;

use crate::models::post::{Post, Target};

/// One row of the teacher inbox: a student's private conversation,
/// summarized by its most recent message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub student_id: String,
    pub student_name: String,
    pub last_message: String,
    /// Millisecond epoch of the latest message.
    pub timestamp: i64,
    /// Posts in this conversation still lacking an answer.
    pub unreplied_count: usize,
}

/// Groups private teacher-targeted posts into per-student conversations.
///
/// Summaries carry the latest message and the unanswered backlog per
/// student, ordered by latest activity descending; equal timestamps keep
/// first-seen order.
pub fn group_conversations(posts: &[Post]) -> Vec<ConversationSummary> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<ConversationSummary> = Vec::new();

    for post in posts.iter().filter(|p| p.is_private && p.target == Target::Teacher) {
        let i = *index.entry(post.student_id.clone()).or_insert_with(|| {
            groups.push(ConversationSummary {
                student_id: post.student_id.clone(),
                student_name: post.student_name.clone(),
                last_message: post.text.clone(),
                timestamp: post.timestamp,
                unreplied_count: 0,
            });
            groups.len() - 1
        });

        let group = &mut groups[i];
        if post.timestamp > group.timestamp {
            group.student_name = post.student_name.clone();
            group.last_message = post.text.clone();
            group.timestamp = post.timestamp;
        }
        if post.answer.is_none() {
            group.unreplied_count += 1;
        }
    }

    groups.sort_by_key(|g| std::cmp::Reverse(g.timestamp));
    groups
}

/// One student's conversation, oldest first (chat order).
pub fn student_thread(posts: &[Post], student_id: &str) -> Vec<Post> {
    let mut thread: Vec<Post> = posts
        .iter()
        .filter(|p| p.is_private && p.target == Target::Teacher && p.student_id == student_id)
        .cloned()
        .collect();
    thread.sort_by_key(|p| p.timestamp);
    thread
}
