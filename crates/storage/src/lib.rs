#![forbid(unsafe_code)]

pub mod csv_store;
pub mod repository;
pub mod result_log;

pub use csv_store::CsvQuestionStore;
pub use repository::{
    InMemorySessionStore, QuestionRecord, QuestionRepository, ResultLogRepository,
    SessionRepository, StorageError,
};
pub use result_log::FileResultLog;
