//! Statistical intent of a survey question.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::period::Period;
use super::rules::{first_match, AverageVocabulary};

/// Aggregation a question asks for, which decides the weighting clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "category", content = "period")]
pub enum Intent {
    /// Income or expense mean converted from monthly to another period.
    Periodized(Period),
    /// Plain weighted mean.
    Average,
    /// Percentage, proportion or share of a total.
    Share,
    /// Distribution or breakdown across categories.
    Distribution,
    /// Nothing recognised; a generic weighting reminder applies.
    Unweighted,
}

impl Intent {
    /// Returns the period transform for periodized intents.
    pub fn period(self) -> Option<Period> {
        match self {
            Self::Periodized(period) => Some(period),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Periodized(period) => write!(f, "{period} average"),
            Self::Average => write!(f, "average"),
            Self::Share => write!(f, "percentage"),
            Self::Distribution => write!(f, "distribution"),
            Self::Unweighted => write!(f, "default"),
        }
    }
}

/// Classifies a question by walking the rule table in priority order.
///
/// Matching is case-insensitive. Questions that match no rule, including
/// the empty string, are [`Intent::Unweighted`].
pub fn classify(question: &str, vocabulary: AverageVocabulary) -> Intent {
    let lowered = question.to_lowercase();
    first_match(vocabulary, &lowered).map_or(Intent::Unweighted, |rule| rule.intent)
}
