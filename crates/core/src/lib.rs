#![forbid(unsafe_code)]

pub mod model;
pub mod scoring;
pub mod time;

pub use model::{
    ANSWER_OPTIONS, Question, QuizSession, ResponseMap, Score, SessionToken, TraitName,
    TraitParseError,
};
pub use scoring::calculate_score;
pub use time::Clock;
