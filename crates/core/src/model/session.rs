use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::model::Question;

/// Accumulated answers, keyed by stringified question index.
///
/// Values are the raw submitted option keys; a step submitted without any
/// option selected is stored as `None`. Keys are strings because that is the
/// shape the form layer produces and the scoring engine re-parses, keeping
/// the scoring skip rules in one place instead of two.
pub type ResponseMap = HashMap<String, Option<String>>;

/// Per-browser quiz state: who is answering, which questions, how far along.
///
/// Owned by exactly one browser session. The index only ever moves forward;
/// once it reaches the question count the session is complete and routes to
/// scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    username: String,
    questions: Vec<Question>,
    current: usize,
    responses: ResponseMap,
    started_at: DateTime<Utc>,
}

impl QuizSession {
    /// Start a session at question zero with no answers recorded.
    ///
    /// An empty username is allowed. An empty question list yields a
    /// degenerate session that is complete from the start.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            username: username.into(),
            questions,
            current: 0,
            responses: ResponseMap::new(),
            started_at,
        }
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Zero-based index of the question presented next.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn responses(&self) -> &ResponseMap {
        &self.responses
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= self.questions.len()
    }

    /// The question to present next, or `None` once the session is complete.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// Record the submitted option for the current question and advance.
    ///
    /// A missing selection is stored as `None` so the index still moves on;
    /// scoring later skips it. Writing the same index twice overwrites; last
    /// write wins. No-op once the session is complete.
    pub fn record_response(&mut self, selected: Option<String>) {
        if self.is_complete() {
            return;
        }
        self.responses.insert(self.current.to_string(), selected);
        self.current += 1;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
