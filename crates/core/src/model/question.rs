use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── TRAITS ────────────────────────────────────────────────────────────────────
//

/// Error type for parsing a trait name from a string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown trait name: {0}")]
pub struct TraitParseError(pub String);

/// The five personality dimensions a question can contribute to.
///
/// The variant order is the presentation order used everywhere a full score
/// is rendered: Extraversion, Agreeableness, Conscientiousness, Neuroticism,
/// Openness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraitName {
    Extraversion,
    Agreeableness,
    Conscientiousness,
    Neuroticism,
    Openness,
}

impl TraitName {
    /// All five traits in presentation order.
    pub const ALL: [TraitName; 5] = [
        TraitName::Extraversion,
        TraitName::Agreeableness,
        TraitName::Conscientiousness,
        TraitName::Neuroticism,
        TraitName::Openness,
    ];

    /// The canonical name, as it appears in the question source file.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TraitName::Extraversion => "Extraversion",
            TraitName::Agreeableness => "Agreeableness",
            TraitName::Conscientiousness => "Conscientiousness",
            TraitName::Neuroticism => "Neuroticism",
            TraitName::Openness => "Openness",
        }
    }
}

impl fmt::Display for TraitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraitName {
    type Err = TraitParseError;

    /// Matching is exact and case-sensitive: `"extraversion"` is not a trait.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Extraversion" => Ok(TraitName::Extraversion),
            "Agreeableness" => Ok(TraitName::Agreeableness),
            "Conscientiousness" => Ok(TraitName::Conscientiousness),
            "Neuroticism" => Ok(TraitName::Neuroticism),
            "Openness" => Ok(TraitName::Openness),
            other => Err(TraitParseError(other.to_owned())),
        }
    }
}

//
// ─── QUESTIONS ─────────────────────────────────────────────────────────────────
//

/// The fixed five-point Likert option set, keyed 1..=5 in ascending agreement.
///
/// Every question shares this set; the key is what the browser submits and
/// what the scoring engine parses back out of the response map.
pub const ANSWER_OPTIONS: [(u8, &str); 5] = [
    (1, "Strongly Disagree"),
    (2, "Disagree"),
    (3, "Neutral"),
    (4, "Agree"),
    (5, "Strongly Agree"),
];

/// A single Likert-scale question.
///
/// Immutable once constructed. `reverse` marks negatively-phrased items whose
/// raw 1–5 answer is flipped (`6 - v`) before it is added to the trait total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    text: String,
    reverse: bool,
    trait_name: TraitName,
}

impl Question {
    #[must_use]
    pub fn new(text: impl Into<String>, reverse: bool, trait_name: TraitName) -> Self {
        Self {
            text: text.into(),
            reverse,
            trait_name,
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn reverse(&self) -> bool {
        self.reverse
    }

    #[must_use]
    pub fn trait_name(&self) -> TraitName {
        self.trait_name
    }

    /// The shared option set, ordered by key.
    #[must_use]
    pub fn options(&self) -> &'static [(u8, &'static str)] {
        &ANSWER_OPTIONS
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
