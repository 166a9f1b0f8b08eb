use ndarray::Array1;
use skein_core::Objective;

use crate::ObjectiveFailure;

/// Computes the fitness of every objective, in order.
///
/// The result is aligned with `objectives` by position. Downstream weights and
/// utopia values rely on this alignment, so the order is never changed.
///
/// # Errors
///
/// Returns the first objective failure, identified by its 1-based position.
pub fn evaluate_objectives<O: Objective>(objectives: &[O]) -> Result<Array1<f64>, ObjectiveFailure> {
    objectives
        .iter()
        .enumerate()
        .map(|(index, objective)| {
            objective.fitness().map_err(|source| ObjectiveFailure {
                position: index + 1,
                objective: objective.name().into_owned(),
                source,
            })
        })
        .collect()
}
