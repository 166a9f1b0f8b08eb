use std::borrow::Cow;

use crate::{BoxError, short_type_name};

/// A weighted unit of comparison between model and reference.
///
/// An objective owns everything it needs to locate one model observable and
/// its reference, and reduces their disagreement to a single fitness value.
/// The returned value is the objective's contribution to the global cost
/// (typically a model-vs-reference distance), not the raw observable.
///
/// `fitness` is only meaningful after the task pipeline has run for the
/// current parameters. The evaluator guarantees that ordering.
pub trait Objective {
    /// Relative importance of this objective. Must be finite and non-negative.
    fn weight(&self) -> f64;

    /// Computes the fitness of the current model state.
    ///
    /// # Errors
    ///
    /// Returns an error if the model results cannot be read or compared.
    fn fitness(&self) -> Result<f64, BoxError>;

    /// Human-readable name used in diagnostics.
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(short_type_name::<Self>())
    }
}

impl<T: Objective + ?Sized> Objective for Box<T> {
    fn weight(&self) -> f64 {
        (**self).weight()
    }

    fn fitness(&self) -> Result<f64, BoxError> {
        (**self).fitness()
    }

    fn name(&self) -> Cow<'_, str> {
        (**self).name()
    }
}

/// An [`Objective`] backed by a closure.
///
/// ```
/// use skein_core::{FnObjective, Objective};
///
/// let gap = FnObjective::new("band gap", 2.0, || Ok((1.12_f64 - 1.10).abs()));
///
/// assert_eq!(gap.name(), "band gap");
/// assert_eq!(gap.weight(), 2.0);
/// ```
pub struct FnObjective<F> {
    name: String,
    weight: f64,
    fitness: F,
}

impl<F> FnObjective<F>
where
    F: Fn() -> Result<f64, BoxError>,
{
    /// Creates a named, weighted objective from a fitness closure.
    pub fn new(name: impl Into<String>, weight: f64, fitness: F) -> Self {
        Self {
            name: name.into(),
            weight,
            fitness,
        }
    }
}

impl<F> Objective for FnObjective<F>
where
    F: Fn() -> Result<f64, BoxError>,
{
    fn weight(&self) -> f64 {
        self.weight
    }

    fn fitness(&self) -> Result<f64, BoxError> {
        (self.fitness)()
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}
