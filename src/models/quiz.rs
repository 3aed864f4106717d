// src/models/quiz.rs

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One generated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,

    /// Options to choose from.
    pub options: Vec<String>,

    /// 0-based index of the correct option.
    pub correct_answer: usize,
}

/// A generated quiz as returned by the AI interface:
/// `{title, questions:[{question, options, correctAnswer}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub title: String,
    pub questions: Vec<QuizQuestion>,
}

impl Quiz {
    /// Validates a payload at the AI boundary before a session is built
    /// from it. A quiz with no questions, a question with no options, or a
    /// correct index outside its options is malformed and must abort the
    /// session instead of surfacing mid-quiz.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.questions.is_empty() {
            return Err(AppError::Ai("quiz payload has no questions".to_string()));
        }
        for (i, q) in self.questions.iter().enumerate() {
            if q.options.is_empty() {
                return Err(AppError::Ai(format!("question {} has no options", i)));
            }
            if q.correct_answer >= q.options.len() {
                return Err(AppError::Ai(format!(
                    "question {} has correct index {} out of {} options",
                    i,
                    q.correct_answer,
                    q.options.len()
                )));
            }
        }
        Ok(())
    }
}
