//! Weighting clauses appended to rewritten questions.

use super::intent::Intent;
use super::period::Period;

/// Returns the weighted-mean SQL expression for a weight column.
pub fn weighted_mean_formula(weight_column: &str) -> String {
    format!("SUM(variable * {weight_column}) / SUM({weight_column})")
}

/// Renders the instruction clause for an intent.
pub(crate) fn render(intent: Intent, weight_column: &str) -> String {
    match intent {
        Intent::Periodized(period) => periodized(period, weight_column),
        Intent::Average => format!(
            "Recuerda calcular el promedio ponderado como {}.",
            weighted_mean_formula(weight_column)
        ),
        Intent::Share | Intent::Distribution => format!(
            "Recuerda ponderar por la columna '{weight_column}' para que la estimación sea representativa."
        ),
        Intent::Unweighted => format!(
            "Recuerda que cualquier cálculo o comparación debe ponderarse usando la columna \
             '{weight_column}' para asegurar representatividad estadística."
        ),
    }
}

fn periodized(period: Period, weight_column: &str) -> String {
    let transform = period.transform();
    format!(
        "Recuerda calcular el ingreso o gasto {adjective} a partir del valor mensual promedio, \
         {step}. Es decir: {formula} {suffix}.",
        adjective = period.adjective_es(),
        step = transform.describe_es(),
        formula = weighted_mean_formula(weight_column),
        suffix = transform.sql_suffix(),
    )
}
