use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::TraitName;

/// Accumulated totals for the five personality traits.
///
/// All totals start at zero; `add` folds one (possibly reversed) answer value
/// into a trait. Addition is commutative, so the order answers arrive in
/// never changes the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    extraversion: i64,
    agreeableness: i64,
    conscientiousness: i64,
    neuroticism: i64,
    openness: i64,
}

impl Score {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, trait_name: TraitName, value: i64) {
        *self.slot_mut(trait_name) += value;
    }

    #[must_use]
    pub fn get(&self, trait_name: TraitName) -> i64 {
        match trait_name {
            TraitName::Extraversion => self.extraversion,
            TraitName::Agreeableness => self.agreeableness,
            TraitName::Conscientiousness => self.conscientiousness,
            TraitName::Neuroticism => self.neuroticism,
            TraitName::Openness => self.openness,
        }
    }

    fn slot_mut(&mut self, trait_name: TraitName) -> &mut i64 {
        match trait_name {
            TraitName::Extraversion => &mut self.extraversion,
            TraitName::Agreeableness => &mut self.agreeableness,
            TraitName::Conscientiousness => &mut self.conscientiousness,
            TraitName::Neuroticism => &mut self.neuroticism,
            TraitName::Openness => &mut self.openness,
        }
    }
}

/// The textual mapping form used by the result log, traits in fixed order.
impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, name) in TraitName::ALL.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{}': {}", name, self.get(*name))?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_score_is_all_zero() {
        let score = Score::new();
        for name in TraitName::ALL {
            assert_eq!(score.get(name), 0);
        }
    }

    #[test]
    fn add_accumulates_per_trait() {
        let mut score = Score::new();
        score.add(TraitName::Neuroticism, 3);
        score.add(TraitName::Neuroticism, 4);
        score.add(TraitName::Openness, 5);

        assert_eq!(score.get(TraitName::Neuroticism), 7);
        assert_eq!(score.get(TraitName::Openness), 5);
        assert_eq!(score.get(TraitName::Extraversion), 0);
    }

    #[test]
    fn display_uses_fixed_trait_order() {
        let mut score = Score::new();
        score.add(TraitName::Agreeableness, 12);
        score.add(TraitName::Extraversion, 9);

        assert_eq!(
            score.to_string(),
            "{'Extraversion': 9, 'Agreeableness': 12, 'Conscientiousness': 0, \
             'Neuroticism': 0, 'Openness': 0}"
        );
    }
}
