//! Folds a session's raw responses into the five trait totals.

use crate::model::{Question, ResponseMap, Score};

/// Compute trait totals from accumulated responses.
///
/// Every entry goes through an explicit parse step: the key must parse as a
/// question index, the value must be present and parse as an integer, and the
/// index must land inside `questions`. Entries failing any of those are
/// skipped without affecting the rest. For reversed questions the answer `v`
/// contributes `6 - v`, otherwise `v`.
///
/// Deterministic for identical inputs; iteration order over the map cannot
/// change the totals.
#[must_use]
pub fn calculate_score(responses: &ResponseMap, questions: &[Question]) -> Score {
    let mut score = Score::new();

    for (raw_index, raw_value) in responses {
        let Ok(index) = raw_index.parse::<usize>() else {
            continue;
        };
        let Some(raw_value) = raw_value else {
            continue;
        };
        let Ok(value) = raw_value.parse::<i64>() else {
            continue;
        };
        let Some(question) = questions.get(index) else {
            continue;
        };

        let value = if question.reverse() { 6 - value } else { value };
        score.add(question.trait_name(), value);
    }

    score
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
