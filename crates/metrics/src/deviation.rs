//! Per-element deviation between reference and model arrays.
//!
//! Both metrics require `reference` and `model` to have identical shapes and
//! return an array of that same shape.

use ndarray::{Array, ArrayD, ArrayView, ArrayViewD, Dimension, Zip};

use crate::MetricError;

/// Signature shared by error metrics, over arrays of any dimension.
///
/// [`absolute_error`] and [`relative_error`] coerce to this type when
/// instantiated with [`ndarray::IxDyn`].
pub type ErrorFn = for<'r, 'm> fn(
    ArrayViewD<'r, f64>,
    ArrayViewD<'m, f64>,
) -> Result<ArrayD<f64>, MetricError>;

/// Returns `model - reference`, element by element.
///
/// # Errors
///
/// Returns [`MetricError::ShapeMismatch`] if the shapes differ.
pub fn absolute_error<D: Dimension>(
    reference: ArrayView<'_, f64, D>,
    model: ArrayView<'_, f64, D>,
) -> Result<Array<f64, D>, MetricError> {
    MetricError::check_model(reference.shape(), model.shape())?;
    Ok(Zip::from(&model)
        .and(&reference)
        .map_collect(|&m, &r| m - r))
}

/// Returns the deviation of `model` relative to `reference`, element by element.
///
/// Where `reference` vanishes the model value is used as denominator, so a
/// non-zero model against a zero reference yields exactly `1`. Where the
/// absolute deviation is zero the result is zero, including when both
/// reference and model vanish. Exact matches therefore never produce NaN or
/// infinity.
///
/// The caller's reference is left untouched; the substituted denominator is a
/// separate array.
///
/// # Errors
///
/// Returns [`MetricError::ShapeMismatch`] if the shapes differ.
pub fn relative_error<D: Dimension>(
    reference: ArrayView<'_, f64, D>,
    model: ArrayView<'_, f64, D>,
) -> Result<Array<f64, D>, MetricError> {
    let deviation = absolute_error(reference.view(), model.view())?;

    let mut denominator = reference.to_owned();
    Zip::from(&mut denominator).and(&model).for_each(|d, &m| {
        if *d == 0.0 {
            *d = m;
        }
    });

    Ok(Zip::from(&deviation)
        .and(&denominator)
        .map_collect(|&e, &d| if e == 0.0 { 0.0 } else { e / d }))
}
