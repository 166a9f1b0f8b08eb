//! Cost functions that reduce weighted deviations to a single value.

use std::fmt;

use ndarray::{Array, Array1, ArrayView, ArrayView1, Dimension, IxDyn, Zip};

use crate::{ErrorFn, MetricError, absolute_error};

/// The value produced by a [`CostFunction`].
///
/// Most cost functions return a single number, but some report a small vector
/// (for example a cost alongside the worst deviation).
#[derive(Debug, Clone, PartialEq)]
pub enum Cost {
    Scalar(f64),
    Vector(Array1<f64>),
}

impl Cost {
    /// Returns the cost as an array with at least one dimension.
    ///
    /// A scalar becomes a length-1 array; a vector is returned as is.
    #[must_use]
    pub fn into_array(self) -> Array1<f64> {
        match self {
            Self::Scalar(value) => Array1::from_elem(1, value),
            Self::Vector(values) => values,
        }
    }
}

impl From<f64> for Cost {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Array1<f64>> for Cost {
    fn from(values: Array1<f64>) -> Self {
        Self::Vector(values)
    }
}

/// Aggregates a model vector against a reference vector into a cost.
///
/// Arguments are aligned element by element: `weights[i]` applies to the
/// deviation of `model[i]` from `reference[i]`.
///
/// Functions and closures with the same signature implement this trait.
pub trait CostFunction {
    /// Computes the cost.
    ///
    /// # Errors
    ///
    /// Returns a [`MetricError`] if the arrays disagree in shape.
    fn cost(
        &self,
        reference: ArrayView1<'_, f64>,
        model: ArrayView1<'_, f64>,
        weights: ArrayView1<'_, f64>,
    ) -> Result<Cost, MetricError>;
}

impl<F> CostFunction for F
where
    F: Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> Result<Cost, MetricError>,
{
    fn cost(
        &self,
        reference: ArrayView1<'_, f64>,
        model: ArrayView1<'_, f64>,
        weights: ArrayView1<'_, f64>,
    ) -> Result<Cost, MetricError> {
        self(reference, model, weights)
    }
}

/// Returns the weighted root-mean-square of the absolute deviation.
///
/// Computes `sqrt(sum(weights * (model - reference)^2))`. With weights that
/// sum to one this is the weighted RMS deviation.
///
/// # Errors
///
/// Returns a [`MetricError`] unless `reference`, `model`, and `weights` all
/// share one shape.
pub fn weighted_rms<D: Dimension>(
    reference: ArrayView<'_, f64, D>,
    model: ArrayView<'_, f64, D>,
    weights: ArrayView<'_, f64, D>,
) -> Result<f64, MetricError> {
    weighted_rms_with(reference, model, weights, absolute_error)
}

/// Returns the weighted root-mean-square of a chosen deviation metric.
///
/// Same as [`weighted_rms`] with `error` in place of the absolute error.
///
/// # Errors
///
/// Returns a [`MetricError`] unless `reference`, `model`, and `weights` all
/// share one shape, or if `error` fails.
pub fn weighted_rms_with<'r, 'm, D, F>(
    reference: ArrayView<'r, f64, D>,
    model: ArrayView<'m, f64, D>,
    weights: ArrayView<'_, f64, D>,
    error: F,
) -> Result<f64, MetricError>
where
    D: Dimension,
    F: FnOnce(ArrayView<'r, f64, D>, ArrayView<'m, f64, D>) -> Result<Array<f64, D>, MetricError>,
{
    MetricError::check_model(reference.shape(), model.shape())?;
    MetricError::check_weights(reference.shape(), weights.shape())?;

    let deviation = error(reference, model)?;
    MetricError::check_weights(deviation.shape(), weights.shape())?;

    let sum = Zip::from(&weights)
        .and(&deviation)
        .fold(0.0, |acc, &w, &e| acc + w * e * e);

    Ok(sum.sqrt())
}

/// Weighted RMS cost over a configurable deviation metric.
#[derive(Clone, Copy)]
pub struct WeightedRms {
    error: ErrorFn,
}

impl WeightedRms {
    /// Creates a weighted RMS cost over the given deviation metric.
    #[must_use]
    pub fn new(error: ErrorFn) -> Self {
        Self { error }
    }
}

impl Default for WeightedRms {
    fn default() -> Self {
        Self::new(absolute_error::<IxDyn>)
    }
}

impl fmt::Debug for WeightedRms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeightedRms").finish_non_exhaustive()
    }
}

impl CostFunction for WeightedRms {
    fn cost(
        &self,
        reference: ArrayView1<'_, f64>,
        model: ArrayView1<'_, f64>,
        weights: ArrayView1<'_, f64>,
    ) -> Result<Cost, MetricError> {
        weighted_rms_with(
            reference.into_dyn(),
            model.into_dyn(),
            weights.into_dyn(),
            self.error,
        )
        .map(Cost::Scalar)
    }
}
