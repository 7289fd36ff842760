//! CSV-backed question source.

use async_trait::async_trait;
use quiz_core::model::Question;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::repository::{QuestionRecord, QuestionRepository, StorageError};

/// Loads the ordered question list from a CSV file with a header row and
/// columns `question`, `reverse`, `trait`.
///
/// The file is re-read on every load, so edits show up at the next quiz
/// start without a restart. Any failure (missing file, I/O error, missing
/// column, unknown trait) fails the whole load; degrading to an empty list
/// is the caller's policy, not the store's.
#[derive(Debug, Clone)]
pub struct CsvQuestionStore {
    path: PathBuf,
}

impl CsvQuestionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuestionRepository for CsvQuestionStore {
    async fn load_questions(&self) -> Result<Vec<Question>, StorageError> {
        let file = File::open(&self.path).map_err(|e| StorageError::Io(e.to_string()))?;
        let mut reader = csv::Reader::from_reader(file);

        let mut questions = Vec::new();
        for row in reader.deserialize() {
            let record: QuestionRecord =
                row.map_err(|e| StorageError::MalformedRow(e.to_string()))?;
            let question = record
                .into_question()
                .map_err(|e| StorageError::MalformedRow(e.to_string()))?;
            questions.push(question);
        }
        Ok(questions)
    }
}
