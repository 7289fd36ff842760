use std::sync::Arc;

use quiz_core::model::{Question, QuizSession, Score, SessionToken};
use quiz_core::scoring::calculate_score;
use quiz_core::time::Clock;
use storage::repository::{QuestionRepository, ResultLogRepository, SessionRepository};

use crate::error::FlowError;

/// Username rendered when no session exists at result time.
const ANONYMOUS: &str = "Anonymous";

/// What the quiz endpoint should present for a session.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizStep {
    /// Present this question, labeled `number` of `total` (1-based).
    Question {
        number: usize,
        total: usize,
        question: Question,
    },
    /// Every question has been answered; route to scoring.
    Complete,
}

/// Outcome of answering one quiz step.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerResult {
    /// False when the session was already complete and nothing was stored.
    pub recorded: bool,
    /// The step the session is in after this submit.
    pub step: QuizStep,
}

/// Scored result for a finished (or absent) session.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizOutcome {
    pub username: String,
    pub score: Score,
}

/// Drives session state transitions over the storage traits.
///
/// Each operation reads the session in, mutates a local copy, and writes it
/// back; nothing is shared across concurrent requests. Two racing submits on
/// one token are last-writer-wins.
#[derive(Clone)]
pub struct QuizFlowService {
    clock: Clock,
    questions: Arc<dyn QuestionRepository>,
    sessions: Arc<dyn SessionRepository>,
    results: Arc<dyn ResultLogRepository>,
}

impl QuizFlowService {
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionRepository>,
        sessions: Arc<dyn SessionRepository>,
        results: Arc<dyn ResultLogRepository>,
    ) -> Self {
        Self {
            clock,
            questions,
            sessions,
            results,
        }
    }

    /// Start a fresh session and return its token.
    ///
    /// A failed question load is logged and degrades to an empty list: the
    /// session then completes immediately with all-zero scores instead of
    /// surfacing an error to the browser.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Storage` if the session cannot be stored.
    pub async fn start(&self, username: &str) -> Result<SessionToken, FlowError> {
        let questions = match self.questions.load_questions().await {
            Ok(questions) => questions,
            Err(e) => {
                tracing::warn!("failed to load questions: {e}");
                Vec::new()
            }
        };

        let session = QuizSession::new(username, questions, self.clock.now());
        let token = SessionToken::generate();
        self.sessions.put(token, session).await?;
        Ok(token)
    }

    /// The step the session is currently in.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::SessionNotFound` for an unknown token, or
    /// `FlowError::Storage` for adapter faults.
    pub async fn current_step(&self, token: SessionToken) -> Result<QuizStep, FlowError> {
        let session = self
            .sessions
            .get(token)
            .await?
            .ok_or(FlowError::SessionNotFound)?;
        Ok(step_of(&session))
    }

    /// Record the submitted option for the current question and advance.
    ///
    /// An absent option is stored as a missing marker so the index still
    /// moves on. When the session is already complete nothing is recorded
    /// and `recorded` is false.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::SessionNotFound` for an unknown token, or
    /// `FlowError::Storage` if the updated session cannot be stored.
    pub async fn record_answer(
        &self,
        token: SessionToken,
        option: Option<String>,
    ) -> Result<AnswerResult, FlowError> {
        let mut session = self
            .sessions
            .get(token)
            .await?
            .ok_or(FlowError::SessionNotFound)?;

        if session.is_complete() {
            return Ok(AnswerResult {
                recorded: false,
                step: QuizStep::Complete,
            });
        }

        session.record_response(option);
        let step = step_of(&session);
        self.sessions.put(token, session).await?;

        Ok(AnswerResult {
            recorded: true,
            step,
        })
    }

    /// Score the session and best-effort append a result-log line.
    ///
    /// A missing or unknown token degrades to the anonymous outcome (empty
    /// responses, all-zero score) rather than failing, so the result page
    /// always renders. The log append is fire-and-forget: failures are
    /// logged and discarded. The session is left in place, so re-rendering
    /// the result page appends another line.
    ///
    /// # Errors
    ///
    /// Returns `FlowError::Storage` only for session-store adapter faults.
    pub async fn finish(&self, token: Option<SessionToken>) -> Result<QuizOutcome, FlowError> {
        let session = match token {
            Some(token) => self.sessions.get(token).await?,
            None => None,
        };

        let (username, score) = match &session {
            Some(session) => (
                session.username().to_owned(),
                calculate_score(session.responses(), session.questions()),
            ),
            None => (ANONYMOUS.to_owned(), Score::new()),
        };

        if let Err(e) = self.results.append(&username, &score).await {
            tracing::warn!("failed to append result for {username}: {e}");
        }

        Ok(QuizOutcome { username, score })
    }
}

fn step_of(session: &QuizSession) -> QuizStep {
    match session.current_question() {
        Some(question) => QuizStep::Question {
            number: session.current_index() + 1,
            total: session.total(),
            question: question.clone(),
        },
        None => QuizStep::Complete,
    }
}
