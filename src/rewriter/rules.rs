//! Ordered keyword dispatch table.
//!
//! Each [`Rule`] pairs a phrase list with the [`Intent`] it selects. Tables
//! are evaluated top to bottom and the first rule with a matching phrase
//! wins, so periodized rules sit above the generic average rule: a question
//! such as "ingreso promedio anual" contains both "promedio" and "anual".
//!
//! Phrases are matched as whole words of the lowercased question, so
//! "mediana" is not "media" and "meaning" is not "mean". Socioeconomic class
//! labels such as "clase media" are blanked out before matching.

use std::sync::LazyLock;

use regex::{Regex, RegexSet};

use super::intent::Intent;
use super::period::Period;

/// A single classification rule.
#[derive(Clone, Copy, Debug)]
pub struct Rule {
    /// Category selected when the rule matches.
    pub intent: Intent,
    /// Lowercase phrases, any of which selects the rule.
    pub phrases: &'static [&'static str],
}

impl Rule {
    /// Regex alternation of the rule's phrases, anchored on word boundaries.
    pub fn pattern(&self) -> String {
        let alternatives: Vec<String> = self.phrases.iter().map(|p| regex::escape(p)).collect();
        format!(r"\b(?:{})\b", alternatives.join("|"))
    }
}

/// Which set of average phrases the generic average rule uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AverageVocabulary {
    /// Full list, including bare "promedio", "media", "average" and "mean".
    #[default]
    Broad,
    /// Only the explicit "promedio de" / "media de" / "average of" / "mean of".
    Explicit,
}

impl std::str::FromStr for AverageVocabulary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "broad" => Ok(Self::Broad),
            "explicit" => Ok(Self::Explicit),
            other => Err(format!(
                "unknown average vocabulary '{other}' (expected 'broad' or 'explicit')"
            )),
        }
    }
}

const ANNUAL: &[&str] = &[
    "ingreso anual",
    "ingreso promedio anual",
    "ingresos anuales",
    "ingresos promedio anuales",
    "gasto anual",
    "gasto promedio anual",
    "gastos anuales",
    "gastos promedio anuales",
    "annual income",
    "annual expense",
    "yearly income",
    "yearly expense",
];

const BIWEEKLY: &[&str] = &[
    "ingreso quincenal",
    "ingreso promedio quincenal",
    "ingresos quincenales",
    "gasto quincenal",
    "gasto promedio quincenal",
    "gastos quincenales",
    "biweekly income",
    "biweekly expense",
    "fortnightly income",
    "fortnightly expense",
];

const QUARTERLY: &[&str] = &[
    "ingreso trimestral",
    "ingreso promedio trimestral",
    "ingresos trimestrales",
    "gasto trimestral",
    "gasto promedio trimestral",
    "gastos trimestrales",
    "quarterly income",
    "quarterly expense",
];

const WEEKLY: &[&str] = &[
    "ingreso semanal",
    "ingreso promedio semanal",
    "ingresos semanales",
    "gasto semanal",
    "gasto promedio semanal",
    "gastos semanales",
    "weekly income",
    "weekly expense",
];

const DAILY: &[&str] = &[
    "ingreso diario",
    "ingreso promedio diario",
    "ingresos diarios",
    "gasto diario",
    "gasto promedio diario",
    "gastos diarios",
    "daily income",
    "daily expense",
];

const AVERAGE_BROAD: &[&str] = &[
    "media de",
    "promedio de",
    "ingreso promedio",
    "gasto promedio",
    "valor medio",
    "media",
    "promedio",
    "mean of",
    "average of",
    "average income",
    "average expense",
    "mean value",
    "mean",
    "average",
];

const AVERAGE_EXPLICIT: &[&str] = &["media de", "promedio de", "mean of", "average of"];

const SHARE: &[&str] = &[
    "porcentaje",
    "proporción",
    "proporcion",
    "representa",
    "representación",
    "representacion",
    "cuánto representa",
    "cuanto representa",
    "qué proporción",
    "que proporcion",
    "percentage",
    "proportion",
    "represents",
    "what share",
];

const DISTRIBUTION: &[&str] = &[
    "distribución",
    "distribucion",
    "cómo se distribuye",
    "como se distribuye",
    "reparto",
    "segmentación",
    "segmentacion",
    "distribution",
    "how is it distributed",
    "breakdown",
    "segmentation",
];

const ANNUAL_RULE: Rule = Rule {
    intent: Intent::Periodized(Period::Annual),
    phrases: ANNUAL,
};

const BIWEEKLY_RULE: Rule = Rule {
    intent: Intent::Periodized(Period::Biweekly),
    phrases: BIWEEKLY,
};

const QUARTERLY_RULE: Rule = Rule {
    intent: Intent::Periodized(Period::Quarterly),
    phrases: QUARTERLY,
};

const WEEKLY_RULE: Rule = Rule {
    intent: Intent::Periodized(Period::Weekly),
    phrases: WEEKLY,
};

const DAILY_RULE: Rule = Rule {
    intent: Intent::Periodized(Period::Daily),
    phrases: DAILY,
};

const SHARE_RULE: Rule = Rule {
    intent: Intent::Share,
    phrases: SHARE,
};

const DISTRIBUTION_RULE: Rule = Rule {
    intent: Intent::Distribution,
    phrases: DISTRIBUTION,
};

static BROAD_RULES: [Rule; 8] = [
    ANNUAL_RULE,
    BIWEEKLY_RULE,
    QUARTERLY_RULE,
    WEEKLY_RULE,
    DAILY_RULE,
    Rule {
        intent: Intent::Average,
        phrases: AVERAGE_BROAD,
    },
    SHARE_RULE,
    DISTRIBUTION_RULE,
];

static EXPLICIT_RULES: [Rule; 8] = [
    ANNUAL_RULE,
    BIWEEKLY_RULE,
    QUARTERLY_RULE,
    WEEKLY_RULE,
    DAILY_RULE,
    Rule {
        intent: Intent::Average,
        phrases: AVERAGE_EXPLICIT,
    },
    SHARE_RULE,
    DISTRIBUTION_RULE,
];

static BROAD_SET: LazyLock<RegexSet> =
    LazyLock::new(|| RegexSet::new(BROAD_RULES.iter().map(Rule::pattern)).unwrap());

static EXPLICIT_SET: LazyLock<RegexSet> =
    LazyLock::new(|| RegexSet::new(EXPLICIT_RULES.iter().map(Rule::pattern)).unwrap());

// Class names, not statistics: "¿qué porcentaje son de clase media?" is a share.
static CLASS_LABELS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:clase\s+media(?:\s+(?:alta|baja))?|nse\s+medio|nivel\s+socioecon[oó]mico\s+medio)\b",
    )
    .unwrap()
});

/// Returns the ordered rule table for the given average vocabulary.
pub fn rule_table(vocabulary: AverageVocabulary) -> &'static [Rule] {
    match vocabulary {
        AverageVocabulary::Broad => &BROAD_RULES,
        AverageVocabulary::Explicit => &EXPLICIT_RULES,
    }
}

/// Returns the highest-priority rule matching a lowercased question.
pub fn first_match(vocabulary: AverageVocabulary, lowered: &str) -> Option<&'static Rule> {
    let set: &RegexSet = match vocabulary {
        AverageVocabulary::Broad => &BROAD_SET,
        AverageVocabulary::Explicit => &EXPLICIT_SET,
    };
    let cleaned = CLASS_LABELS.replace_all(lowered, " ");

    // Set indices follow table order, so the smallest index wins.
    set.matches(&cleaned)
        .iter()
        .next()
        .and_then(|index| rule_table(vocabulary).get(index))
}
