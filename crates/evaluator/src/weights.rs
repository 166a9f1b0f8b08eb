use ndarray::{Array1, ArrayView1};

use crate::ConfigError;

/// Objective weights, normalized to sum to one.
///
/// Normalization preserves relative proportions: raw weights `[1, 3]` become
/// `[0.25, 0.75]`. Once built the weights never change.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights(Array1<f64>);

impl Weights {
    /// Normalizes raw weights so they sum to one.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no weights, if any weight is negative or
    /// non-finite, or if all weights are zero.
    pub fn normalize(raw: impl IntoIterator<Item = f64>) -> Result<Self, ConfigError> {
        let raw: Array1<f64> = raw.into_iter().collect();
        if raw.is_empty() {
            return Err(ConfigError::NoObjectives);
        }

        if let Some((index, &weight)) = raw
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(ConfigError::InvalidWeight {
                position: index + 1,
                weight,
            });
        }

        let total = raw.sum();
        if total <= 0.0 {
            return Err(ConfigError::ZeroWeightSum);
        }
        if total.is_finite() {
            return Ok(Self(raw / total));
        }

        // The sum overflowed; rescale by the largest weight first.
        let largest = raw.fold(0.0_f64, |acc, &w| acc.max(w));
        let scaled = raw / largest;
        let total = scaled.sum();
        Ok(Self(scaled / total))
    }

    /// Returns the normalized weights.
    #[must_use]
    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.0.view()
    }

    /// Returns the number of weights.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`: construction rejects empty weights.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
