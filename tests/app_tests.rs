// tests/app_tests.rs

mod common;

use std::time::Duration;

use common::{register_user, sample_post, spawn_app, sync_cache};
use mkway::{
    error::AppError,
    handlers::{auth, feed, inbox, interaction, notifications, points, quiz},
    models::{
        comment::CreateCommentRequest,
        notification::NotificationKind,
        post::{AskQuestionRequest, PublicPostRequest, Target},
    },
};

#[test]
fn relative_time_labels() {
    use mkway::utils::time::format_relative_time;

    let now = 1_700_000_000_000;
    assert_eq!(format_relative_time(now, now), "Just now");
    assert_eq!(format_relative_time(now - 59_000, now), "Just now");
    assert_eq!(format_relative_time(now - 5 * 60_000, now), "5m");
    assert_eq!(format_relative_time(now - 3 * 3_600_000, now), "3h");
    assert_eq!(format_relative_time(now - 2 * 86_400_000, now), "2d");
    // Clock skew clamps instead of going negative.
    assert_eq!(format_relative_time(now + 10_000, now), "Just now");
}

#[test]
fn post_records_use_the_collection_wire_names() {
    let post = sample_post("p1", "a", "Alice", "hi", Target::Gemini, true, 42, None);
    let value = serde_json::to_value(&post).unwrap();

    assert_eq!(value["studentId"], "a");
    assert_eq!(value["isPrivate"], true);
    assert_eq!(value["target"], "GEMINI");
    assert_eq!(value["timestamp"], 42);
    assert!(value["answer"].is_null());
}

#[test]
fn level_matches_formula() {
    for total in [0i64, 1, 99, 100, 101, 199, 200, 350, 1000, 12345] {
        assert_eq!(points::level_for(total), total / 100 + 1, "points={}", total);
    }
}

#[tokio::test]
async fn award_rejects_negative_delta() {
    let app = spawn_app();
    register_user(&app.ctx, "Alice").await;

    let result = points::award_points(&app.ctx, -5).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn feed_filter_is_a_pure_partition() {
    // Arrange: two public posts and one private thread entry per student.
    let posts = vec![
        sample_post("p1", "a", "Alice", "public one", Target::Teacher, false, 100, None),
        sample_post("p2", "a", "Alice", "ai question", Target::Gemini, true, 200, Some("answer")),
        sample_post("p3", "b", "Bob", "teacher question", Target::Teacher, true, 300, None),
        sample_post("p4", "b", "Bob", "public two", Target::Teacher, false, 400, None),
    ];

    // Act
    let public = feed::public_feed(&posts);
    let alice_ai = feed::private_thread(&posts, "a", Target::Gemini);
    let alice_teacher = feed::private_thread(&posts, "a", Target::Teacher);
    let bob_ai = feed::private_thread(&posts, "b", Target::Gemini);
    let bob_teacher = feed::private_thread(&posts, "b", Target::Teacher);

    // Assert: newest-first feed, oldest-first threads.
    let feed_ids: Vec<&str> = public.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(feed_ids, ["p4", "p1"]);
    assert_eq!(alice_ai.len(), 1);
    assert_eq!(alice_ai[0].id, "p2");
    assert!(alice_teacher.is_empty());
    assert!(bob_ai.is_empty());
    assert_eq!(bob_teacher[0].id, "p3");

    // Every post lands in exactly one view.
    let total = public.len() + alice_ai.len() + alice_teacher.len() + bob_ai.len() + bob_teacher.len();
    assert_eq!(total, posts.len());
}

#[tokio::test]
async fn teacher_inbox_groups_by_student() {
    let posts = vec![
        sample_post("a1", "a", "Alice", "first from alice", Target::Teacher, true, 100, None),
        sample_post("b1", "b", "Bob", "first from bob", Target::Teacher, true, 200, None),
        sample_post("b2", "b", "Bob", "second from bob", Target::Teacher, true, 250, None),
        sample_post("a2", "a", "Alice", "latest from alice", Target::Teacher, true, 300, Some("done")),
        // Noise the inbox must ignore.
        sample_post("x1", "a", "Alice", "ai chat", Target::Gemini, true, 400, None),
        sample_post("x2", "b", "Bob", "public", Target::Teacher, false, 500, None),
    ];

    let groups = inbox::group_conversations(&posts);

    assert_eq!(groups.len(), 2);

    // Alice's latest private teacher message is newest overall.
    assert_eq!(groups[0].student_id, "a");
    assert_eq!(groups[0].last_message, "latest from alice");
    assert_eq!(groups[0].timestamp, 300);
    assert_eq!(groups[0].unreplied_count, 1);

    assert_eq!(groups[1].student_id, "b");
    assert_eq!(groups[1].last_message, "second from bob");
    assert_eq!(groups[1].unreplied_count, 2);

    // Selecting a group yields the thread oldest-first.
    let thread = inbox::student_thread(&posts, "a");
    let thread_ids: Vec<&str> = thread.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(thread_ids, ["a1", "a2"]);
}

#[tokio::test]
async fn alice_earns_points_for_posting_and_quizzing() {
    // The walkthrough: register (100) -> public post (+20, level 2)
    // -> quiz 4/5 (+40) -> 160 points, still level 2.
    let app = spawn_app();
    register_user(&app.ctx, "Alice").await;

    feed::post_public(
        &app.ctx,
        PublicPostRequest {
            text: "I discovered something today".to_string(),
            image: None,
        },
    )
    .await
    .unwrap();

    let after_post = app.ctx.current_user().unwrap();
    assert_eq!(after_post.points, 120);
    assert_eq!(after_post.level, 2);

    let mut session = quiz::start_quiz(&app.ctx, "Science").await.unwrap();
    for i in 0..5 {
        // Option 0 is correct in the scripted quiz; miss the last one.
        let choice = if i < 4 { 0 } else { 1 };
        session.select(choice);
        session.advance();
    }
    assert_eq!(session.score(), 4);

    let after_quiz = quiz::complete_quiz(&app.ctx, &session).await.unwrap();
    assert_eq!(after_quiz.points, 160);
    assert_eq!(after_quiz.level, 2);

    // The remote profile followed both awards.
    let profiles = app.ctx.profiles.top_profiles(5).await.unwrap();
    assert_eq!(profiles[0].points, 160);
    assert_eq!(profiles[0].level, 2);
}

#[tokio::test]
async fn leaderboard_orders_by_points_descending() {
    let app = spawn_app();

    register_user(&app.ctx, "Cara").await;
    points::award_points(&app.ctx, 20).await.unwrap();

    register_user(&app.ctx, "Bella").await;
    points::award_points(&app.ctx, 50).await.unwrap();

    register_user(&app.ctx, "Anna").await;

    let board = points::leaderboard(&app.ctx).await.unwrap();
    let names: Vec<&str> = board.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Bella", "Cara", "Anna"]);
    assert_eq!(board[0].points, 150);
}

#[tokio::test]
async fn toggling_a_like_twice_restores_the_original_set() {
    let app = spawn_app();
    let user = register_user(&app.ctx, "Alice").await;

    let post = feed::post_public(
        &app.ctx,
        PublicPostRequest {
            text: "like me".to_string(),
            image: None,
        },
    )
    .await
    .unwrap();
    sync_cache(&app.ctx).await;

    let liked = interaction::toggle_like(&app.ctx, &post.id).await.unwrap();
    assert!(liked);
    sync_cache(&app.ctx).await;
    assert_eq!(
        app.ctx.find_cached_post(&post.id).unwrap().likes,
        vec![user.id.clone()]
    );

    let liked_again = interaction::toggle_like(&app.ctx, &post.id).await.unwrap();
    assert!(!liked_again);
    sync_cache(&app.ctx).await;
    assert!(app.ctx.find_cached_post(&post.id).unwrap().likes.is_empty());
}

#[tokio::test]
async fn comments_append_in_order() {
    let app = spawn_app();
    let user = register_user(&app.ctx, "Alice").await;

    let post = feed::post_public(
        &app.ctx,
        PublicPostRequest {
            text: "discuss".to_string(),
            image: None,
        },
    )
    .await
    .unwrap();
    sync_cache(&app.ctx).await;

    for text in ["first", "second"] {
        interaction::add_comment(
            &app.ctx,
            &post.id,
            CreateCommentRequest {
                text: text.to_string(),
            },
        )
        .await
        .unwrap();
    }

    sync_cache(&app.ctx).await;
    let cached = app.ctx.find_cached_post(&post.id).unwrap();
    assert_eq!(cached.comments.len(), 2);
    assert_eq!(cached.comments[0].text, "first");
    assert_eq!(cached.comments[1].text, "second");
    assert_eq!(cached.comments[0].user_id, user.id);
}

#[tokio::test]
async fn teacher_reply_is_set_exactly_once() {
    let app = spawn_app();
    register_user(&app.ctx, "MsSmith").await;

    let post = feed::submit_question(
        &app.ctx,
        AskQuestionRequest {
            text: "When is the deadline?".to_string(),
            image: None,
            target: Target::Teacher,
        },
    )
    .await
    .unwrap();
    assert!(post.answer.is_none());
    sync_cache(&app.ctx).await;

    // Teacher mode is required.
    let denied = feed::reply(&app.ctx, &post.id, "Friday").await;
    assert!(matches!(denied, Err(AppError::AuthError(_))));

    auth::admin_unlock(&app.ctx, "staff-room").unwrap();
    feed::reply(&app.ctx, &post.id, "Friday").await.unwrap();

    sync_cache(&app.ctx).await;
    let answered = app.ctx.find_cached_post(&post.id).unwrap();
    assert_eq!(answered.answer.as_deref(), Some("Friday"));
    assert_eq!(answered.replied_by.as_deref(), Some("MsSmith"));
    assert!(answered.replied_at.is_some());

    // The answer field is set exactly once.
    let second = feed::reply(&app.ctx, &post.id, "Monday").await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    // The student got an answer notification linking the question.
    let inbox = notifications::visible(&app.ctx);
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].kind, NotificationKind::Answer);
    assert_eq!(inbox[0].question_id.as_deref(), Some(post.id.as_str()));
}

#[tokio::test]
async fn ai_outage_becomes_the_fallback_answer() {
    let app = common::spawn_app_with_tutor(common::ScriptedTutor {
        answer: None,
        quiz_json: None,
    });
    register_user(&app.ctx, "Alice").await;

    let post = feed::submit_question(
        &app.ctx,
        AskQuestionRequest {
            text: "What is osmosis?".to_string(),
            image: None,
            target: Target::Gemini,
        },
    )
    .await
    .unwrap();

    // The question is not lost; the answer carries the fallback string.
    assert_eq!(
        post.answer.as_deref(),
        Some(mkway::ai::TUTOR_FALLBACK_ANSWER)
    );
    // Points are still awarded for asking.
    assert_eq!(app.ctx.current_user().unwrap().points, 105);
}

#[tokio::test]
async fn submitted_text_is_sanitized() {
    let app = spawn_app();
    register_user(&app.ctx, "Alice").await;

    let post = feed::submit_question(
        &app.ctx,
        AskQuestionRequest {
            text: "<script>alert(1)</script>What is photosynthesis?".to_string(),
            image: None,
            target: Target::Teacher,
        },
    )
    .await
    .unwrap();

    assert!(!post.text.contains("<script"));
    assert!(post.text.contains("What is photosynthesis?"));
}

#[tokio::test]
async fn notification_ledger_is_scoped_per_user() {
    let app = spawn_app();
    let alice = register_user(&app.ctx, "Alice").await;

    let entry = notifications::notify(&app.ctx, "Saved!", NotificationKind::Success);
    assert_eq!(entry.user_id, alice.id);
    assert_eq!(notifications::unread_count(&app.ctx), 1);
    assert!(notifications::active_toast(&app.ctx).is_some());

    // Entries for someone else never show up in Alice's list.
    notifications::notify_user(
        &app.ctx,
        "someone-else",
        NotificationKind::Info,
        "not for alice",
        None,
    );
    let visible = notifications::visible(&app.ctx);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].message, "Saved!");

    notifications::mark_read(&app.ctx, &entry.id).unwrap();
    assert_eq!(notifications::unread_count(&app.ctx), 0);
    assert!(notifications::visible(&app.ctx)[0].is_read);

    // clear_all removes only the current user's entries.
    notifications::clear_all(&app.ctx).unwrap();
    assert!(notifications::visible(&app.ctx).is_empty());
    let ledger = app.ctx.notifications.lock().unwrap();
    assert_eq!(ledger.entries_for("someone-else").len(), 1);
}

#[tokio::test]
async fn toast_expires_after_its_display_window() {
    let app = spawn_app();
    register_user(&app.ctx, "Alice").await;

    let entry = notifications::notify(&app.ctx, "Heads up", NotificationKind::Info);

    let ledger = app.ctx.notifications.lock().unwrap();
    assert!(ledger.active_toast(entry.timestamp).is_some());
    assert!(ledger.active_toast(entry.timestamp + 2_999).is_some());
    assert!(ledger.active_toast(entry.timestamp + 3_000).is_none());
    // The ledger entry itself outlives the toast.
    assert_eq!(ledger.entries_for(&entry.user_id).len(), 1);
}

#[tokio::test]
async fn live_subscription_delivers_and_tears_down() {
    let app = spawn_app();
    register_user(&app.ctx, "Alice").await;

    let mut subscription = app.ctx.subscribe_posts();

    feed::post_public(
        &app.ctx,
        PublicPostRequest {
            text: "hello world".to_string(),
            image: None,
        },
    )
    .await
    .unwrap();

    let snapshot = tokio::time::timeout(Duration::from_secs(5), subscription.changed())
        .await
        .expect("subscription never delivered")
        .unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].text, "hello world");

    app.ctx.apply_posts_snapshot(snapshot);
    assert_eq!(app.ctx.cached_posts().len(), 1);
    assert_eq!(subscription.latest().len(), 1);

    subscription.shutdown();
}
