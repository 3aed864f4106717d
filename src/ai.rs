// src/ai.rs

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::{config::Config, error::AppError, models::quiz::Quiz};

/// System instruction for free-text tutor answers.
const TUTOR_SYSTEM_PROMPT: &str = "You are a helpful educational tutor. Provide clear, \
     concise, and accurate explanations for student questions. Use markdown for formatting.";

/// Fallback string inserted as the answer when the tutor cannot be reached.
pub const TUTOR_FALLBACK_ANSWER: &str = "Error: Could not reach the AI tutor.";

/// The generative-AI boundary: free-text tutoring and quiz generation.
#[async_trait]
pub trait Tutor: Send + Sync {
    /// Answers a student question, optionally with an inline JPEG payload
    /// (base64 data URL or bare base64).
    async fn ask(&self, prompt: &str, image_base64: Option<&str>) -> Result<String, AppError>;

    /// Generates a multiple-choice quiz for a subject, validated against
    /// the fixed quiz schema.
    async fn generate_quiz(&self, subject: &str) -> Result<Quiz, AppError>;
}

/// REST client for the hosted Gemini-style generateContent API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// First text part of the first candidate, if any.
    fn text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| content.parts.into_iter().find_map(|p| p.text))
    }
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.ai_url.trim_end_matches('/').to_string(),
            api_key: config.ai_api_key.clone(),
            model: config.ai_model.clone(),
        }
    }

    async fn generate_content(&self, body: serde_json::Value) -> Result<String, AppError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Ai(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Ai(format!(
                "generateContent failed with status {}",
                response.status()
            )));
        }

        let parsed = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| AppError::Ai(e.to_string()))?;

        parsed
            .text()
            .ok_or_else(|| AppError::Ai("empty response from model".to_string()))
    }
}

#[async_trait]
impl Tutor for GeminiClient {
    async fn ask(&self, prompt: &str, image_base64: Option<&str>) -> Result<String, AppError> {
        let mut parts = vec![json!({ "text": prompt })];
        if let Some(image) = image_base64 {
            // Accept both a data URL and bare base64.
            let data = image.split_once(',').map(|(_, d)| d).unwrap_or(image);
            parts.push(json!({
                "inline_data": { "mime_type": "image/jpeg", "data": data }
            }));
        }

        let body = json!({
            "contents": [{ "parts": parts }],
            "system_instruction": { "parts": [{ "text": TUTOR_SYSTEM_PROMPT }] },
        });

        self.generate_content(body).await
    }

    async fn generate_quiz(&self, subject: &str) -> Result<Quiz, AppError> {
        let prompt = format!(
            "Generate a {}-question multiple choice quiz about {} for a student.",
            crate::config::QUIZ_QUESTION_COUNT,
            subject
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generation_config": {
                "response_mime_type": "application/json",
                "response_schema": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "questions": {
                            "type": "ARRAY",
                            "items": {
                                "type": "OBJECT",
                                "properties": {
                                    "question": { "type": "STRING" },
                                    "options": {
                                        "type": "ARRAY",
                                        "items": { "type": "STRING" }
                                    },
                                    "correctAnswer": {
                                        "type": "INTEGER",
                                        "description": "0-based index of correct option"
                                    }
                                },
                                "required": ["question", "options", "correctAnswer"]
                            }
                        }
                    },
                    "required": ["title", "questions"]
                }
            }
        });

        let text = self.generate_content(body).await?;
        parse_quiz(&text)
    }
}

static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(?:json)?\s*").expect("fence regex"));
static FENCE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```$").expect("fence regex"));

/// Parses and validates a quiz payload.
///
/// The model sometimes wraps JSON output in markdown code fences even when
/// a JSON response type was requested; those are stripped before parsing.
pub fn parse_quiz(text: &str) -> Result<Quiz, AppError> {
    let trimmed = text.trim();
    let without_open = FENCE_OPEN.replace(trimmed, "");
    let cleaned = FENCE_CLOSE.replace(&without_open, "");

    let quiz: Quiz =
        serde_json::from_str(cleaned.trim()).map_err(|e| AppError::Ai(e.to_string()))?;
    quiz.validate()?;
    Ok(quiz)
}
