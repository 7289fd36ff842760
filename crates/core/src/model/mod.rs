mod question;
mod score;
mod session;
mod token;

pub use question::{ANSWER_OPTIONS, Question, TraitName, TraitParseError};
pub use score::Score;
pub use session::{QuizSession, ResponseMap};
pub use token::SessionToken;
