#![forbid(unsafe_code)]

pub mod error;
pub mod flow;

pub use quiz_core::Clock;

pub use error::FlowError;
pub use flow::{AnswerResult, QuizFlowService, QuizOutcome, QuizStep};
