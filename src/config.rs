// src/config.rs

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use url::Url;

/// Points granted to a freshly registered account.
pub const REGISTRATION_POINTS: i64 = 100;

/// One level per this many points: level = points / 100 + 1.
pub const POINTS_PER_LEVEL: i64 = 100;

/// Flat award for publishing a post to the public feed.
pub const PUBLIC_POST_POINTS: i64 = 20;

/// Award for a private question to the AI tutor.
pub const AI_QUESTION_POINTS: i64 = 5;

/// Award for a private question to the teacher.
pub const TEACHER_QUESTION_POINTS: i64 = 10;

/// Maximum XP a perfect quiz can earn: round(score / total * 50).
pub const QUIZ_MAX_XP: i64 = 50;

/// Number of questions requested from the quiz generator.
pub const QUIZ_QUESTION_COUNT: usize = 5;

/// How long a toast stays pinned before it self-clears.
pub const TOAST_TTL_MS: i64 = 3_000;

/// Number of entries shown on the leaderboard.
pub const LEADERBOARD_SIZE: usize = 5;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote document-store service.
    pub store_url: String,

    /// Optional API key sent as a bearer token to the document store.
    pub store_api_key: Option<String>,

    /// Base URL of the generative-AI service.
    pub ai_url: String,

    /// API key for the generative-AI service.
    pub ai_api_key: String,

    /// Model identifier used for tutor answers and quiz generation.
    pub ai_model: String,

    /// Directory holding the registry/session snapshots and log files.
    pub data_dir: PathBuf,

    /// Access key unlocking teacher (admin) mode, if configured.
    pub admin_access_key: Option<String>,

    /// Interval between live-query refreshes of the posts collection, in ms.
    pub sync_interval_ms: u64,

    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let store_url = env::var("MKWAY_STORE_URL").expect("MKWAY_STORE_URL must be set");

        let ai_api_key = env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set");

        let ai_url = env::var("MKWAY_AI_URL")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string());

        let ai_model =
            env::var("MKWAY_AI_MODEL").unwrap_or_else(|_| "gemini-3-flash-preview".to_string());

        let data_dir = env::var("MKWAY_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let sync_interval_ms = env::var("MKWAY_SYNC_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2_000);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        // Fail fast on unparseable endpoints instead of erroring per-request.
        Url::parse(&store_url).expect("MKWAY_STORE_URL must be a valid URL");
        Url::parse(&ai_url).expect("MKWAY_AI_URL must be a valid URL");

        Self {
            store_url,
            store_api_key: env::var("MKWAY_STORE_API_KEY").ok(),
            ai_url,
            ai_api_key,
            ai_model,
            data_dir,
            admin_access_key: env::var("MKWAY_ADMIN_KEY").ok(),
            sync_interval_ms,
            rust_log,
        }
    }
}
