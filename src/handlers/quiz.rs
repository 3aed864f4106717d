// src/handlers/quiz.rs

use crate::{
    config::QUIZ_MAX_XP,
    error::AppError,
    handlers::points,
    models::{
        quiz::{Quiz, QuizQuestion},
        user::User,
    },
    state::AppContext,
};

/// Subjects offered on the quiz start screen.
pub const QUIZ_SUBJECTS: [&str; 5] = [
    "Mathematics",
    "Science",
    "History",
    "Computer Science",
    "Geography",
];

/// Where the quiz view currently is.
///
/// `SubjectSelect` and `Loading` belong to the shell, before a session
/// exists: picking a subject, then waiting on generation. A failed or
/// malformed generation drops back to `SubjectSelect`. A live session
/// reports only `InProgress`/`Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    SubjectSelect,
    Loading,
    InProgress { index: usize },
    Completed,
}

/// Result of selecting an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Correct,
    Incorrect { correct: usize },
    /// The question was already answered (or the index is out of range);
    /// nothing changed.
    Ignored,
}

/// Result of advancing past an answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next { index: usize },
    Completed { score: usize, total: usize },
}

/// A running quiz: a fixed set of generated questions walked in order.
///
/// Selecting an option is one-shot per question; the UI shows correctness
/// during a fixed delay and then calls `advance`. Discarded on completion
/// or on navigation away, never persisted.
#[derive(Debug, Clone)]
pub struct QuizSession {
    subject: String,
    quiz: Quiz,
    index: usize,
    score: usize,
    selected: Option<usize>,
    done: bool,
}

impl QuizSession {
    /// Builds a session from a generated payload, rejecting malformed ones
    /// so a bad quiz aborts up front instead of mid-walk.
    pub fn new(subject: &str, quiz: Quiz) -> Result<Self, AppError> {
        quiz.validate()?;
        Ok(Self {
            subject: subject.to_string(),
            quiz,
            index: 0,
            score: 0,
            selected: None,
            done: false,
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn title(&self) -> &str {
        &self.quiz.title
    }

    pub fn total(&self) -> usize {
        self.quiz.questions.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn phase(&self) -> QuizPhase {
        if self.done {
            QuizPhase::Completed
        } else {
            QuizPhase::InProgress { index: self.index }
        }
    }

    /// The question currently shown, if the session is still in progress.
    pub fn current(&self) -> Option<&QuizQuestion> {
        if self.done {
            None
        } else {
            self.quiz.questions.get(self.index)
        }
    }

    /// Index selected for the current question, once one is locked in.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Locks in an option for the current question.
    ///
    /// Only the first selection counts; later calls on the same question
    /// are ignored. The score moves only on an exact correct-index match.
    pub fn select(&mut self, option: usize) -> Answer {
        let Some(question) = self.current() else {
            return Answer::Ignored;
        };
        if self.selected.is_some() || option >= question.options.len() {
            return Answer::Ignored;
        }

        let correct = question.correct_answer;
        self.selected = Some(option);

        if option == correct {
            self.score += 1;
            Answer::Correct
        } else {
            Answer::Incorrect { correct }
        }
    }

    /// Moves to the next question after a selection, or completes the
    /// session on the last one. Returns `None` until an option is locked
    /// in, and after completion.
    pub fn advance(&mut self) -> Option<Advance> {
        if self.done || self.selected.is_none() {
            return None;
        }

        if self.index + 1 < self.total() {
            self.index += 1;
            self.selected = None;
            Some(Advance::Next { index: self.index })
        } else {
            self.done = true;
            Some(Advance::Completed {
                score: self.score,
                total: self.total(),
            })
        }
    }

    /// XP earned: round(score / total * 50).
    pub fn xp(&self) -> i64 {
        ((self.score as f64 / self.total() as f64) * QUIZ_MAX_XP as f64).round() as i64
    }
}

/// Generates a quiz for a subject and opens a session on it.
///
/// A generation failure or malformed payload is returned as-is; the shell
/// drops back to subject selection and shows the error. No automatic
/// retry.
pub async fn start_quiz(ctx: &AppContext, subject: &str) -> Result<QuizSession, AppError> {
    ctx.require_user()?;

    let quiz = ctx.tutor.generate_quiz(subject).await.map_err(|e| {
        tracing::error!("quiz generation for '{}' failed: {}", subject, e);
        e
    })?;

    QuizSession::new(subject, quiz)
}

/// Applies the XP for a completed session via the points engine.
pub async fn complete_quiz(ctx: &AppContext, session: &QuizSession) -> Result<User, AppError> {
    if session.phase() != QuizPhase::Completed {
        return Err(AppError::BadRequest("quiz is not finished".to_string()));
    }
    points::award_points(ctx, session.xp()).await
}
