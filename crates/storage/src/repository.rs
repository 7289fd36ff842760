use async_trait::async_trait;
use chrono::Duration;
use quiz_core::model::{Question, QuizSession, Score, SessionToken, TraitParseError};
use quiz_core::time::Clock;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),

    #[error("malformed question row: {0}")]
    MalformedRow(String),

    #[error("lock error: {0}")]
    Lock(String),
}

/// Persisted shape for one question source row.
///
/// This mirrors a raw tabular record so readers can deserialize without
/// leaking the source format into the domain layer. The `reverse` column is
/// kept as the literal string it held in the file; only the exact value
/// `"True"` marks a reversed question.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub reverse: String,
    #[serde(rename = "trait")]
    pub trait_name: String,
}

impl QuestionRecord {
    /// Convert the record into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `TraitParseError` if the trait column is not one of the five
    /// canonical trait names (exact, case-sensitive match).
    pub fn into_question(self) -> Result<Question, TraitParseError> {
        let reverse = self.reverse == "True";
        let trait_name = self.trait_name.parse()?;
        Ok(Question::new(self.question, reverse, trait_name))
    }
}

/// Repository contract for the question source.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Load the full ordered question list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the source is missing, unreadable, or holds
    /// a malformed row.
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError>;
}

/// Repository contract for per-browser session state.
///
/// Handlers read a session in, mutate a local copy, and write it back; the
/// store never hands out shared mutable state. Two concurrent writes for the
/// same token are last-writer-wins.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert or overwrite the session for a token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be stored.
    async fn put(&self, token: SessionToken, session: QuizSession) -> Result<(), StorageError>;

    /// Fetch a cloned snapshot of the session for a token, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for adapter faults; an unknown token is `None`.
    async fn get(&self, token: SessionToken) -> Result<Option<QuizSession>, StorageError>;
}

/// Repository contract for the append-only result log.
#[async_trait]
pub trait ResultLogRepository: Send + Sync {
    /// Append one completed-quiz line.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the line cannot be written.
    async fn append(&self, username: &str, score: &Score) -> Result<(), StorageError>;
}

/// In-memory session store keyed by token.
///
/// Sessions older than `ttl` are pruned on insert, bounding the map for a
/// long-lived process. Each `get` returns a clone so request handlers own
/// their working copy.
#[derive(Clone)]
pub struct InMemorySessionStore {
    clock: Clock,
    ttl: Duration,
    sessions: Arc<Mutex<HashMap<SessionToken, QuizSession>>>,
}

impl InMemorySessionStore {
    /// Default session time-to-live: two hours.
    #[must_use]
    pub fn new(clock: Clock) -> Self {
        Self::with_ttl(clock, Duration::hours(2))
    }

    #[must_use]
    pub fn with_ttl(clock: Clock, ttl: Duration) -> Self {
        Self {
            clock,
            ttl,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionStore {
    async fn put(&self, token: SessionToken, session: QuizSession) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        let cutoff = self.clock.now() - self.ttl;
        guard.retain(|_, existing| existing.started_at() > cutoff);
        guard.insert(token, session);
        Ok(())
    }

    async fn get(&self, token: SessionToken) -> Result<Option<QuizSession>, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        Ok(guard.get(&token).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::TraitName;
    use quiz_core::time::{fixed_clock, fixed_now};

    fn build_session(name: &str) -> QuizSession {
        let questions = vec![Question::new("Q0", false, TraitName::Openness)];
        QuizSession::new(name, questions, fixed_now())
    }

    #[test]
    fn record_reversal_requires_the_exact_literal() {
        for raw in ["True"] {
            let record = QuestionRecord {
                question: "Q".into(),
                reverse: raw.into(),
                trait_name: "Openness".into(),
            };
            assert!(record.into_question().unwrap().reverse());
        }
        for raw in ["true", "TRUE", "False", "1", ""] {
            let record = QuestionRecord {
                question: "Q".into(),
                reverse: raw.into(),
                trait_name: "Openness".into(),
            };
            assert!(!record.into_question().unwrap().reverse());
        }
    }

    #[test]
    fn record_with_unknown_trait_is_rejected() {
        let record = QuestionRecord {
            question: "Q".into(),
            reverse: "False".into(),
            trait_name: "Honesty".into(),
        };
        assert!(record.into_question().is_err());
    }

    #[tokio::test]
    async fn store_round_trips_a_session() {
        let store = InMemorySessionStore::new(fixed_clock());
        let token = SessionToken::generate();
        let session = build_session("ada");

        store.put(token, session.clone()).await.unwrap();
        let fetched = store.get(token).await.unwrap();
        assert_eq!(fetched, Some(session));
    }

    #[tokio::test]
    async fn unknown_token_is_none() {
        let store = InMemorySessionStore::new(fixed_clock());
        let fetched = store.get(SessionToken::generate()).await.unwrap();
        assert_eq!(fetched, None);
    }

    #[tokio::test]
    async fn put_overwrites_an_existing_session() {
        let store = InMemorySessionStore::new(fixed_clock());
        let token = SessionToken::generate();

        store.put(token, build_session("first")).await.unwrap();
        store.put(token, build_session("second")).await.unwrap();

        let fetched = store.get(token).await.unwrap().unwrap();
        assert_eq!(fetched.username(), "second");
    }

    #[tokio::test]
    async fn expired_sessions_are_pruned_on_insert() {
        let later = fixed_now() + Duration::hours(3);
        let store = InMemorySessionStore::new(Clock::fixed(later));
        let stale_token = SessionToken::generate();

        // started_at is fixed_now(), three hours before the store's clock
        store.put(stale_token, build_session("stale")).await.unwrap();

        let fresh_token = SessionToken::generate();
        let fresh = QuizSession::new("fresh", Vec::new(), later);
        store.put(fresh_token, fresh).await.unwrap();

        assert_eq!(store.get(stale_token).await.unwrap(), None);
        assert!(store.get(fresh_token).await.unwrap().is_some());
    }
}
