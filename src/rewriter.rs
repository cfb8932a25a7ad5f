//! Weighted-query rewriting.
//!
//! Free-text questions about a household survey are classified by
//! statistical intent and rewritten into instructions that force any
//! downstream query generator to apply the survey expansion factor:
//!
//! - periodized income/expense means (annual, biweekly, quarterly, weekly,
//!   daily) get the weighted monthly mean plus the period transform,
//! - plain averages get the weighted mean formula,
//! - percentages and distributions get a weighting reminder,
//! - everything else gets a generic weighting reminder.
//!
//! The rewriter is a pure function of the question and its options; it
//! holds no state between calls.

pub mod clause;
pub mod intent;
pub mod period;
pub mod rules;

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use clause::weighted_mean_formula;
pub use intent::{classify, Intent};
pub use period::{Period, PeriodTransform, DAYS_PER_MONTH, WEEKS_PER_MONTH};
pub use rules::AverageVocabulary;

/// Expansion-factor column of the ENIGH household table.
pub const DEFAULT_WEIGHT_COLUMN: &str = "Factor_expasion";

/// Row-limiting clause some query generators add on their own.
pub const ROW_LIMIT_CLAUSE: &str = "LIMIT 10";

static ALL_ROWS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:todas|todos|all)\b").unwrap());

// "LIMIT 10" but not the head of "LIMIT 100".
static ROW_LIMIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bLIMIT\s+10\b").unwrap());

/// How the question text is carried into the rewritten instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    /// Keep the question exactly as typed.
    #[default]
    Preserve,
    /// Lowercase the question before appending the clause.
    Lowercase,
}

impl FromStr for CaseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preserve" => Ok(Self::Preserve),
            "lowercase" => Ok(Self::Lowercase),
            other => Err(format!(
                "unknown case mode '{other}' (expected 'preserve' or 'lowercase')"
            )),
        }
    }
}

/// Options controlling a [`WeightedQueryRewriter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Name of the survey expansion-factor column.
    pub weight_column: String,
    /// Casing of the question text in the output.
    pub case_mode: CaseMode,
    /// Phrase set for the generic average rule.
    pub average_vocabulary: AverageVocabulary,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            weight_column: DEFAULT_WEIGHT_COLUMN.to_string(),
            case_mode: CaseMode::default(),
            average_vocabulary: AverageVocabulary::default(),
        }
    }
}

impl RewriteOptions {
    /// Default options with a different weight column.
    pub fn with_weight_column(weight_column: impl Into<String>) -> Self {
        Self {
            weight_column: weight_column.into(),
            ..Self::default()
        }
    }
}

/// Result of rewriting one question.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RewrittenQuestion {
    /// Question as supplied by the caller.
    pub original: String,
    /// Detected category.
    pub intent: Intent,
    /// Instruction to forward to the query-answering collaborator.
    pub instruction: String,
}

/// Stateless rewriter configured with a weight column and matching options.
#[derive(Clone, Debug, Default)]
pub struct WeightedQueryRewriter {
    options: RewriteOptions,
}

impl WeightedQueryRewriter {
    /// Creates a rewriter with the given options.
    pub fn new(options: RewriteOptions) -> Self {
        Self { options }
    }

    /// Returns the active options.
    pub fn options(&self) -> &RewriteOptions {
        &self.options
    }

    /// Returns the configured weight column.
    pub fn weight_column(&self) -> &str {
        &self.options.weight_column
    }

    /// Classifies a question without rewriting it.
    pub fn classify(&self, question: &str) -> Intent {
        classify(question, self.options.average_vocabulary)
    }

    /// Rewrites a question into a weighted instruction.
    pub fn rewrite(&self, question: &str) -> RewrittenQuestion {
        let intent = self.classify(question);
        let weight_column = self.weight_column();

        let body = match self.options.case_mode {
            CaseMode::Preserve => question.to_string(),
            CaseMode::Lowercase => question.to_lowercase(),
        };
        let clause = clause::render(intent, weight_column);
        let body = body.trim_end();
        let joined = if body.trim_start().is_empty() {
            clause
        } else if body.ends_with(['?', '.', '!']) {
            format!("{body} {clause}")
        } else {
            format!("{body}. {clause}")
        };
        let instruction = strip_row_limit(question, &joined);

        debug!(
            intent = %intent,
            weight_column = %weight_column,
            question_len = question.len(),
            instruction_len = instruction.len(),
            "Rewrote survey question"
        );

        RewrittenQuestion {
            original: question.to_string(),
            intent,
            instruction,
        }
    }
}

/// Rewrites a question with default matching options.
///
/// Total over all inputs: unrecognised and empty questions receive the
/// default weighting clause.
pub fn rewrite(question: &str, weight_column: &str) -> String {
    WeightedQueryRewriter::new(RewriteOptions::with_weight_column(weight_column))
        .rewrite(question)
        .instruction
}

/// Removes [`ROW_LIMIT_CLAUSE`] from `text` when the question asks for all rows.
///
/// Questions such as "muéstrame todas las entidades" must not be answered
/// from a truncated result set. Larger limits such as `LIMIT 100` are left
/// alone.
pub fn strip_row_limit(question: &str, text: &str) -> String {
    if ALL_ROWS.is_match(question) && ROW_LIMIT.is_match(text) {
        debug!("Removing row limit from rewritten question");
        ROW_LIMIT.replace_all(text, "").into_owned()
    } else {
        text.to_string()
    }
}
