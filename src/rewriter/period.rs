//! Reporting periods and their conversion from monthly aggregates.
//!
//! Survey income and expense variables are recorded as monthly figures.
//! Questions about any other reporting period are answered by computing the
//! weighted monthly mean first and then applying the period's transform.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Months in a year.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Months in a quarter.
pub const MONTHS_PER_QUARTER: f64 = 3.0;

/// Two-week periods ("quincenas") in a month.
pub const BIWEEKS_PER_MONTH: f64 = 2.0;

/// Average number of weeks in a month (52.14 / 12).
pub const WEEKS_PER_MONTH: f64 = 4.345;

/// Average number of days in a month (365 / 12, rounded).
pub const DAYS_PER_MONTH: f64 = 30.4;

/// Arithmetic step that turns a monthly mean into another period's mean.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PeriodTransform {
    /// Multiply the monthly value by the factor.
    Multiply(f64),
    /// Divide the monthly value by the factor.
    Divide(f64),
}

impl PeriodTransform {
    /// Applies the transform to a monthly value.
    pub fn apply(self, monthly: f64) -> f64 {
        match self {
            Self::Multiply(factor) => monthly * factor,
            Self::Divide(factor) => monthly / factor,
        }
    }

    /// Returns the SQL operator suffix, e.g. `* 12` or `/ 4.345`.
    pub fn sql_suffix(self) -> String {
        match self {
            Self::Multiply(factor) => format!("* {factor}"),
            Self::Divide(factor) => format!("/ {factor}"),
        }
    }

    /// Spanish description of the step, used in the rendered clause.
    pub(crate) fn describe_es(self) -> String {
        match self {
            Self::Multiply(factor) => format!("multiplicando el promedio ponderado mensual por {factor}"),
            Self::Divide(factor) => format!("dividiendo el promedio ponderado mensual entre {factor}"),
        }
    }
}

/// Reporting period a question asks about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// Twelve months.
    Annual,
    /// Three months.
    Quarterly,
    /// Half a month.
    Biweekly,
    /// One week.
    Weekly,
    /// One day.
    Daily,
}

impl Period {
    /// All periods in classification priority order.
    pub const ALL: [Self; 5] = [
        Self::Annual,
        Self::Biweekly,
        Self::Quarterly,
        Self::Weekly,
        Self::Daily,
    ];

    /// Returns the transform from a monthly figure to this period.
    pub fn transform(self) -> PeriodTransform {
        match self {
            Self::Annual => PeriodTransform::Multiply(MONTHS_PER_YEAR),
            Self::Quarterly => PeriodTransform::Multiply(MONTHS_PER_QUARTER),
            Self::Biweekly => PeriodTransform::Divide(BIWEEKS_PER_MONTH),
            Self::Weekly => PeriodTransform::Divide(WEEKS_PER_MONTH),
            Self::Daily => PeriodTransform::Divide(DAYS_PER_MONTH),
        }
    }

    /// Spanish adjective for the period, as it appears in questions.
    pub fn adjective_es(self) -> &'static str {
        match self {
            Self::Annual => "anual",
            Self::Quarterly => "trimestral",
            Self::Biweekly => "quincenal",
            Self::Weekly => "semanal",
            Self::Daily => "diario",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Annual => write!(f, "annual"),
            Self::Quarterly => write!(f, "quarterly"),
            Self::Biweekly => write!(f, "biweekly"),
            Self::Weekly => write!(f, "weekly"),
            Self::Daily => write!(f, "daily"),
        }
    }
}
